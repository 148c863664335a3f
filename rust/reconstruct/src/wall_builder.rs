// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion of merged pixel segments into metric walls
//!
//! Every wall gets the configured thickness and height. Measuring thickness
//! from nearby parallel strokes is not implemented; thick and thin walls in
//! the drawing come out identical.

use crate::config::BuildingConfig;
use crate::types::{RawSegment, Wall};

/// Walls shorter than this (meters) are treated as zero-length
const MIN_WALL_LENGTH: f64 = 1e-9;

/// Build one wall per merged segment, dropping zero-length results
pub fn build_walls(merged: &[RawSegment], building: &BuildingConfig) -> Vec<Wall> {
    let walls: Vec<Wall> = merged
        .iter()
        .filter_map(|segment| segment_to_wall(segment, building))
        .collect();

    let dropped = merged.len() - walls.len();
    if dropped > 0 {
        tracing::debug!(dropped, "Dropped zero-length walls");
    }
    tracing::debug!(walls = walls.len(), "Built walls");

    walls
}

fn segment_to_wall(segment: &RawSegment, building: &BuildingConfig) -> Option<Wall> {
    let wall = Wall {
        start_point: segment.start().scaled(building.scale_factor),
        end_point: segment.end().scaled(building.scale_factor),
        thickness: building.wall_thickness,
        height: building.wall_height,
    };

    (wall.length() > MIN_WALL_LENGTH).then_some(wall)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point2D;
    use approx::assert_relative_eq;

    #[test]
    fn test_scales_endpoints_with_defaults() {
        let walls = build_walls(
            &[RawSegment::new(0.0, 0.0, 200.0, 0.0)],
            &BuildingConfig::default(),
        );

        assert_eq!(walls.len(), 1);
        assert_eq!(walls[0].start_point, Point2D::new(0.0, 0.0));
        assert_eq!(walls[0].end_point, Point2D::new(10.0, 0.0));
        assert_relative_eq!(walls[0].length(), 10.0);
        assert_eq!(walls[0].thickness, Wall::DEFAULT_THICKNESS);
        assert_eq!(walls[0].height, Wall::DEFAULT_HEIGHT);
    }

    #[test]
    fn test_drops_zero_length_segments() {
        let walls = build_walls(
            &[
                RawSegment::new(3.0, 3.0, 3.0, 3.0),
                RawSegment::new(0.0, 0.0, 0.0, 40.0),
            ],
            &BuildingConfig::default(),
        );

        assert_eq!(walls.len(), 1);
        assert_relative_eq!(walls[0].length(), 2.0);
    }

    #[test]
    fn test_uses_configured_dimensions() {
        let building = BuildingConfig {
            scale_factor: 0.01,
            wall_thickness: 0.35,
            wall_height: 2.7,
            ..Default::default()
        };
        let walls = build_walls(&[RawSegment::new(0.0, 0.0, 0.0, 500.0)], &building);

        assert_relative_eq!(walls[0].length(), 5.0);
        assert_eq!(walls[0].thickness, 0.35);
        assert_eq!(walls[0].height, 2.7);
    }
}
