// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Merging of near-duplicate parallel line segments
//!
//! Line detectors report each drawn wall several times (both edges of a thick
//! stroke, broken runs, overlapping Hough peaks). Segments that point the same
//! way and lie close to each other are collapsed into one representative.
//!
//! The default [`ClusterPolicy::Seeded`] is a greedy single pass: the first
//! unconsumed segment becomes the seed and every later unconsumed segment is
//! tested against the seed only. Membership is therefore order dependent and
//! not transitive; a chain A~B~C where C is too far from A yields two outputs.
//! [`ClusterPolicy::Connected`] closes the relation with union-find instead.

use crate::config::MergeConfig;
use crate::types::{Point2D, RawSegment};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// How segments are grouped before merging
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClusterPolicy {
    /// Compare every candidate against the cluster seed only
    #[default]
    Seeded,
    /// Connected components of the pairwise "parallel and close" relation
    Connected,
}

/// Collapse parallel, nearby segments into bounding segments
///
/// Output count never exceeds input count. Single-member clusters are passed
/// through unchanged.
pub fn merge_parallel_segments(segments: &[RawSegment], config: &MergeConfig) -> Vec<RawSegment> {
    if segments.is_empty() {
        return Vec::new();
    }

    let clusters = match config.policy {
        ClusterPolicy::Seeded => seeded_clusters(segments, config),
        ClusterPolicy::Connected => connected_clusters(segments, config),
    };

    let merged: Vec<RawSegment> = clusters
        .iter()
        .map(|members| merge_cluster(segments, members))
        .collect();

    tracing::debug!(
        input = segments.len(),
        merged = merged.len(),
        policy = ?config.policy,
        "Merged parallel segments"
    );

    merged
}

fn seeded_clusters(segments: &[RawSegment], config: &MergeConfig) -> Vec<Vec<usize>> {
    let mut used = vec![false; segments.len()];
    let mut clusters = Vec::new();

    for (i, seed) in segments.iter().enumerate() {
        if used[i] {
            continue;
        }
        used[i] = true;

        let mut members = vec![i];
        for (j, candidate) in segments.iter().enumerate().skip(i + 1) {
            if !used[j] && is_mergeable(seed, candidate, config) {
                members.push(j);
                used[j] = true;
            }
        }

        clusters.push(members);
    }

    clusters
}

fn connected_clusters(segments: &[RawSegment], config: &MergeConfig) -> Vec<Vec<usize>> {
    let mut parent: Vec<usize> = (0..segments.len()).collect();

    for i in 0..segments.len() {
        for j in i + 1..segments.len() {
            if is_mergeable(&segments[i], &segments[j], config) {
                let (ri, rj) = (find_root(&mut parent, i), find_root(&mut parent, j));
                if ri != rj {
                    // Smaller index stays root so cluster order follows input order
                    parent[ri.max(rj)] = ri.min(rj);
                }
            }
        }
    }

    let mut by_root: FxHashMap<usize, usize> = FxHashMap::default();
    let mut clusters: Vec<Vec<usize>> = Vec::new();
    for i in 0..segments.len() {
        let root = find_root(&mut parent, i);
        let slot = *by_root.entry(root).or_insert_with(|| {
            clusters.push(Vec::new());
            clusters.len() - 1
        });
        clusters[slot].push(i);
    }

    clusters
}

fn find_root(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

/// `candidate` joins `reference` when both thresholds are strictly undercut
fn is_mergeable(reference: &RawSegment, candidate: &RawSegment, config: &MergeConfig) -> bool {
    angle_difference(reference, candidate) < config.max_angle_deg
        && point_to_line_distance(&candidate.start(), reference) < config.max_distance_px
}

/// Absolute direction difference in degrees, folded into [0, 180]
///
/// Segments drawn in opposite directions differ by 180 degrees and do not match.
pub fn angle_difference(a: &RawSegment, b: &RawSegment) -> f64 {
    let diff = (a.angle_degrees() - b.angle_degrees()).abs();
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

/// Perpendicular distance from `point` to the infinite line through `line`
///
/// Infinite for a zero-length line, so nothing ever merges into it.
pub fn point_to_line_distance(point: &Point2D, line: &RawSegment) -> f64 {
    let dx = line.x2 - line.x1;
    let dy = line.y2 - line.y1;
    let den = (dx * dx + dy * dy).sqrt();

    if den == 0.0 {
        return f64::INFINITY;
    }

    (dy * point.x - dx * point.y + line.x2 * line.y1 - line.y2 * line.x1).abs() / den
}

/// Axis-aligned bounding extent of all member endpoints
///
/// This is (min x, min y) → (max x, max y), not a fitted centerline; for
/// descending diagonals the result runs along the other diagonal.
fn merge_cluster(segments: &[RawSegment], members: &[usize]) -> RawSegment {
    if members.len() == 1 {
        return segments[members[0]];
    }

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for s in members.iter().map(|&i| &segments[i]) {
        min_x = min_x.min(s.x1).min(s.x2);
        min_y = min_y.min(s.y1).min(s.y2);
        max_x = max_x.max(s.x1).max(s.x2);
        max_y = max_y.max(s.y1).max(s.y2);
    }

    RawSegment::new(min_x, min_y, max_x, max_y)
}
