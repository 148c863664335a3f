// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model assembly

use crate::config::BuildingConfig;
use crate::types::{BimModel, Door, ModelMetadata, Room, Wall, Window};

/// Round to two decimals, half away from zero
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Bundle reconstructed entities into a model and record its totals
///
/// Pure aggregation: entities are taken as they are, nothing is filtered.
pub fn assemble_model(
    walls: Vec<Wall>,
    rooms: Vec<Room>,
    doors: Vec<Door>,
    windows: Vec<Window>,
    building: &BuildingConfig,
) -> BimModel {
    let total_wall_length: f64 = walls.iter().map(Wall::length).sum();
    let total_floor_area: f64 = rooms.iter().map(|r| r.area).sum();

    tracing::debug!(
        walls = walls.len(),
        rooms = rooms.len(),
        doors = doors.len(),
        windows = windows.len(),
        total_wall_length,
        total_floor_area,
        "Assembled model"
    );

    BimModel {
        walls,
        rooms,
        doors,
        windows,
        floors: building.floors,
        floor_height: building.floor_height,
        metadata: ModelMetadata {
            total_wall_length: round2(total_wall_length),
            total_floor_area: round2(total_floor_area),
            scale_factor: building.scale_factor,
            room_metrics: None,
            material_quantities: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point2D;
    use approx::assert_relative_eq;

    fn wall(x1: f64, y1: f64, x2: f64, y2: f64) -> Wall {
        Wall {
            start_point: Point2D::new(x1, y1),
            end_point: Point2D::new(x2, y2),
            thickness: Wall::DEFAULT_THICKNESS,
            height: Wall::DEFAULT_HEIGHT,
        }
    }

    #[test]
    fn test_total_wall_length() {
        let model = assemble_model(
            vec![wall(0.0, 0.0, 10.0, 0.0), wall(10.0, 0.0, 10.0, 5.0)],
            vec![],
            vec![],
            vec![],
            &BuildingConfig::default(),
        );

        assert_relative_eq!(model.metadata.total_wall_length, 15.0);
        assert_eq!(model.metadata.total_floor_area, 0.0);
        assert_eq!(model.metadata.scale_factor, 0.05);
        assert_eq!(model.floors, 1);
        assert_eq!(model.floor_height, 3.0);
        assert!(model.metadata.room_metrics.is_none());
    }

    #[test]
    fn test_totals_are_rounded() {
        let room = |name: &str, area: f64| Room {
            name: name.to_string(),
            corners: vec![],
            area,
        };

        let model = assemble_model(
            vec![wall(0.0, 0.0, 1.0, 1.0)],
            vec![room("Room_0", 12.3456), room("Room_1", 0.001)],
            vec![],
            vec![],
            &BuildingConfig {
                floors: 3,
                ..Default::default()
            },
        );

        assert_relative_eq!(model.metadata.total_wall_length, 1.41);
        assert_relative_eq!(model.metadata.total_floor_area, 12.35);
        assert_eq!(model.rooms.len(), 2);
        assert_relative_eq!(model.total_height(), 9.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(2.345678), 2.35);
        assert_eq!(round2(-1.005001), -1.01);
        assert_eq!(round2(0.0), 0.0);
    }
}
