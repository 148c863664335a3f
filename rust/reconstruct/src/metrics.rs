// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room metrics and construction quantity estimates
//!
//! Both are derived from a finished [`BimModel`] and never feed back into it;
//! [`BimModel::with_analysis`] attaches them to the metadata.

use crate::assembler::round2;
use crate::types::{BimModel, MaterialQuantities, Point2D, Room, RoomMetrics};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Floor slab thickness (meters), for concrete volume and massing alike
pub const SLAB_THICKNESS: f64 = 0.15;

/// Bricks per square meter of wall face
pub const BRICKS_PER_M2: f64 = 80.0;

/// Flooring tile allowance for cutting waste
pub const TILE_WASTE_FACTOR: f64 = 1.1;

/// Area, perimeter, centroid and corner count for every room, keyed by name
pub fn room_metrics(rooms: &[Room]) -> BTreeMap<String, RoomMetrics> {
    rooms
        .par_iter()
        .map(|room| (room.name.clone(), metrics_for(room)))
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

fn metrics_for(room: &Room) -> RoomMetrics {
    RoomMetrics {
        area: round2(room.area),
        perimeter: round2(perimeter(&room.corners)),
        centroid: vertex_mean(&room.corners),
        corner_count: room.corners.len(),
    }
}

/// Closed-cycle length around the corners
fn perimeter(corners: &[Point2D]) -> f64 {
    let n = corners.len();
    (0..n)
        .map(|i| corners[i].distance_to(&corners[(i + 1) % n]))
        .sum()
}

/// Mean of the corner coordinates, unrounded
///
/// Matches the area centroid for rectangles and other centrally symmetric
/// shapes only; corner-heavy sides pull it off center.
fn vertex_mean(corners: &[Point2D]) -> Point2D {
    if corners.is_empty() {
        return Point2D::default();
    }

    let n = corners.len() as f64;
    let (sx, sy) = corners
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));

    Point2D::new(sx / n, sy / n)
}

/// Estimate bulk material quantities for a model
pub fn estimate_materials(model: &BimModel) -> MaterialQuantities {
    let floor_area: f64 = model.rooms.iter().map(|r| r.area).sum();
    let wall_area: f64 = model
        .walls
        .iter()
        .map(|w| w.length() * model.floor_height)
        .sum();

    MaterialQuantities {
        floor_slab_concrete_m3: round2(floor_area * SLAB_THICKNESS),
        wall_area_m2: round2(wall_area),
        brick_count: (wall_area * BRICKS_PER_M2).round().max(0.0) as u64,
        flooring_tiles_m2: round2(floor_area * TILE_WASTE_FACTOR),
        door_count: model.doors.len(),
        window_count: model.windows.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble_model;
    use crate::config::BuildingConfig;
    use crate::types::{Door, Wall};
    use approx::assert_relative_eq;

    fn rect_room(name: &str, w: f64, h: f64) -> Room {
        Room {
            name: name.to_string(),
            corners: vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(w, 0.0),
                Point2D::new(w, h),
                Point2D::new(0.0, h),
            ],
            area: w * h,
        }
    }

    #[test]
    fn test_rectangle_metrics() {
        let metrics = room_metrics(&[rect_room("Room_2", 4.0, 3.0)]);
        let m = &metrics["Room_2"];

        assert_relative_eq!(m.perimeter, 14.0);
        assert_relative_eq!(m.area, 12.0);
        assert_eq!(m.centroid, Point2D::new(2.0, 1.5));
        assert_eq!(m.corner_count, 4);
    }

    #[test]
    fn test_centroid_is_vertex_mean() {
        // Extra corner on the bottom edge drags the mean down
        let room = Room {
            name: "Room_0".to_string(),
            corners: vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(1.0, 0.0),
                Point2D::new(2.0, 0.0),
                Point2D::new(2.0, 2.0),
                Point2D::new(0.0, 2.0),
            ],
            area: 4.0,
        };

        let metrics = room_metrics(&[room]);
        assert_eq!(metrics["Room_0"].centroid, Point2D::new(1.0, 0.8));
        assert_relative_eq!(metrics["Room_0"].perimeter, 8.0);
    }

    #[test]
    fn test_centroid_is_not_rounded() {
        let room = Room {
            name: "Room_3".to_string(),
            corners: vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(1.0, 0.0),
                Point2D::new(0.0, 1.0),
            ],
            area: 0.5,
        };

        let centroid = room_metrics(&[room])["Room_3"].centroid;
        assert_relative_eq!(centroid.x, 1.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(centroid.y, 1.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_room_without_corners() {
        let room = Room {
            name: "Room_9".to_string(),
            corners: vec![],
            area: 0.0,
        };

        let metrics = room_metrics(&[room]);
        assert_eq!(metrics["Room_9"].perimeter, 0.0);
        assert_eq!(metrics["Room_9"].centroid, Point2D::new(0.0, 0.0));
        assert_eq!(metrics["Room_9"].corner_count, 0);
    }

    #[test]
    fn test_metrics_keyed_by_name() {
        let rooms = vec![rect_room("Room_7", 1.0, 1.0), rect_room("Room_12", 2.0, 2.0)];
        let keys: Vec<_> = room_metrics(&rooms).into_keys().collect();
        assert_eq!(keys, vec!["Room_12".to_string(), "Room_7".to_string()]);
    }

    #[test]
    fn test_material_estimate() {
        let wall = Wall {
            start_point: Point2D::new(0.0, 0.0),
            end_point: Point2D::new(10.0, 0.0),
            thickness: 0.2,
            height: 3.0,
        };
        let door = Door {
            position: Point2D::new(1.0, 0.0),
            width: 0.9,
            wall_index: None,
        };

        let model = assemble_model(
            vec![wall],
            vec![rect_room("Room_0", 5.0, 4.0)],
            vec![door],
            vec![],
            &BuildingConfig::default(),
        );

        let q = estimate_materials(&model);
        assert_eq!(q.brick_count, 2400);
        assert_relative_eq!(q.floor_slab_concrete_m3, 3.0);
        assert_relative_eq!(q.wall_area_m2, 30.0);
        assert_relative_eq!(q.flooring_tiles_m2, 22.0);
        assert_eq!(q.door_count, 1);
        assert_eq!(q.window_count, 0);
    }

    #[test]
    fn test_empty_model_estimate() {
        let model = assemble_model(vec![], vec![], vec![], vec![], &BuildingConfig::default());
        let q = estimate_materials(&model);
        assert_eq!(q.brick_count, 0);
        assert_eq!(q.floor_slab_concrete_m3, 0.0);
        assert_eq!(q.wall_area_m2, 0.0);
    }
}
