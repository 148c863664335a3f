// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door and window reconciliation
//!
//! A door swing arc matches the template at a whole cloud of neighbouring
//! offsets, so raw door candidates are heavily redundant. They are reduced to
//! spatially distinct doors by greedy spacing. Window boxes come from two
//! independent morphology passes and are only filtered by size.

use crate::config::{BuildingConfig, OpeningConfig};
use crate::types::{Door, DoorCandidate, Point2D, Wall, Window, WindowBoxes};
use rustc_hash::FxHashMap;

/// Convert template matches into distinct doors
pub fn reconcile_doors(
    candidates: &[DoorCandidate],
    openings: &OpeningConfig,
    building: &BuildingConfig,
) -> Vec<Door> {
    let doors: Vec<Door> = candidates
        .iter()
        .filter(|c| c.score.map_or(true, |s| s >= openings.door_match_threshold))
        .map(|c| Door {
            position: Point2D::new(c.x, c.y).scaled(building.scale_factor),
            width: openings.door_width,
            wall_index: None,
        })
        .collect();

    let unique = deduplicate_doors(&doors, openings.door_min_spacing);

    tracing::debug!(
        candidates = candidates.len(),
        above_threshold = doors.len(),
        doors = unique.len(),
        "Reconciled doors"
    );

    unique
}

/// Greedy spacing filter: keep a door unless it lies closer than
/// `min_spacing` to a door kept before it
///
/// Accepted doors are bucketed in a grid of `min_spacing` cells, so only the
/// 3x3 neighbourhood is scanned. The result equals the all-pairs scan and the
/// filter is idempotent.
pub fn deduplicate_doors(doors: &[Door], min_spacing: f64) -> Vec<Door> {
    if min_spacing.is_nan() || min_spacing <= 0.0 {
        return doors.to_vec();
    }

    let cell_of = |p: &Point2D| {
        (
            (p.x / min_spacing).floor() as i64,
            (p.y / min_spacing).floor() as i64,
        )
    };

    let mut grid: FxHashMap<(i64, i64), Vec<usize>> = FxHashMap::default();
    let mut unique: Vec<Door> = Vec::new();

    for door in doors {
        let (cx, cy) = cell_of(&door.position);

        let is_duplicate = (cx - 1..=cx + 1)
            .flat_map(|x| (cy - 1..=cy + 1).map(move |y| (x, y)))
            .filter_map(|cell| grid.get(&cell))
            .flatten()
            .any(|&i| unique[i].position.distance_to(&door.position) < min_spacing);

        if !is_duplicate {
            grid.entry((cx, cy)).or_default().push(unique.len());
            unique.push(door.clone());
        }
    }

    unique
}

/// Keep window-sized boxes from both orientation passes
///
/// Horizontal boxes come first, then vertical ones. A box reported by both
/// passes yields two windows.
pub fn detect_windows(
    boxes: &WindowBoxes,
    openings: &OpeningConfig,
    building: &BuildingConfig,
) -> Vec<Window> {
    let scale = building.scale_factor;

    let windows: Vec<Window> = boxes
        .horizontal
        .iter()
        .chain(boxes.vertical.iter())
        .filter(|b| {
            b.width > openings.window_min_width_px
                && b.width < openings.window_max_width_px
                && b.height > openings.window_min_height_px
                && b.height < openings.window_max_height_px
        })
        .map(|b| Window {
            position: Point2D::new(b.x, b.y).scaled(scale),
            width: b.width * scale,
            height: b.height * scale,
            wall_index: None,
        })
        .collect();

    tracing::debug!(
        horizontal = boxes.horizontal.len(),
        vertical = boxes.vertical.len(),
        windows = windows.len(),
        "Detected windows"
    );

    windows
}

/// Link every opening to the nearest wall within `tolerance` meters
///
/// Openings with no wall in range are left unassociated. Ties go to the
/// lower wall index.
pub fn associate_with_walls(
    doors: &[Door],
    windows: &[Window],
    walls: &[Wall],
    tolerance: f64,
) -> (Vec<Door>, Vec<Window>) {
    let doors: Vec<Door> = doors
        .iter()
        .map(|d| Door {
            wall_index: nearest_wall(&d.position, walls, tolerance),
            ..d.clone()
        })
        .collect();

    let windows: Vec<Window> = windows
        .iter()
        .map(|w| Window {
            wall_index: nearest_wall(&w.position, walls, tolerance),
            ..w.clone()
        })
        .collect();

    tracing::debug!(
        doors_attached = doors.iter().filter(|d| d.wall_index.is_some()).count(),
        windows_attached = windows.iter().filter(|w| w.wall_index.is_some()).count(),
        tolerance,
        "Associated openings with walls"
    );

    (doors, windows)
}

fn nearest_wall(point: &Point2D, walls: &[Wall], tolerance: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (i, wall) in walls.iter().enumerate() {
        let dist = point_to_segment_distance(point, &wall.start_point, &wall.end_point);
        if dist <= tolerance && best.map_or(true, |(_, d)| dist < d) {
            best = Some((i, dist));
        }
    }

    best.map(|(i, _)| i)
}

/// Distance from a point to the closest point of a finite segment
pub fn point_to_segment_distance(point: &Point2D, start: &Point2D, end: &Point2D) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_sq = dx * dx + dy * dy;

    if length_sq < 1e-18 {
        return point.distance_to(start);
    }

    let t = (((point.x - start.x) * dx + (point.y - start.y) * dy) / length_sq).clamp(0.0, 1.0);
    point.distance_to(&Point2D::new(start.x + t * dx, start.y + t * dy))
}
