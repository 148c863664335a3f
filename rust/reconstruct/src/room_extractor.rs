// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room extraction from closed contours
//!
//! Contours come from an external border-following stage and include noise
//! specks, room interiors and the outer frame of the sheet. The frame and the
//! specks are filtered by area; survivors are simplified to a few corners and
//! scaled to meters.

use crate::config::{BuildingConfig, RoomConfig};
use crate::types::{Point2D, Room};
use rayon::prelude::*;

/// Turn raw contours into rooms
///
/// Rooms are named after the contour's index in `contours`, so gaps in the
/// numbering mark filtered contours.
pub fn extract_rooms(
    contours: &[Vec<Point2D>],
    image_area: f64,
    rooms: &RoomConfig,
    building: &BuildingConfig,
) -> Vec<Room> {
    if image_area <= 0.0 && !contours.is_empty() {
        tracing::warn!("Image area is zero, every contour will be rejected as background");
    }

    let max_area = image_area * rooms.max_image_fraction;
    let scale = building.scale_factor;

    let extracted: Vec<Room> = contours
        .par_iter()
        .enumerate()
        .filter_map(|(idx, contour)| {
            let area = polygon_area(contour);
            if area <= rooms.min_room_area_px || area >= max_area {
                return None;
            }

            let epsilon = rooms.approximation_ratio * closed_perimeter(contour);
            let approx = approximate_closed_polygon(contour, epsilon);
            if approx.len() < 3 {
                return None;
            }

            Some(Room {
                name: format!("Room_{}", idx),
                corners: approx.iter().map(|p| p.scaled(scale)).collect(),
                area: area * scale * scale,
            })
        })
        .collect();

    tracing::debug!(
        contours = contours.len(),
        rooms = extracted.len(),
        "Extracted rooms"
    );

    extracted
}

/// Absolute shoelace area of a closed ring
pub fn polygon_area(points: &[Point2D]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }

    (area / 2.0).abs()
}

/// Length of a ring including the closing edge
pub fn closed_perimeter(points: &[Point2D]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }

    (0..n)
        .map(|i| points[i].distance_to(&points[(i + 1) % n]))
        .sum()
}

/// Douglas-Peucker simplification of a closed ring
///
/// The ring is split at the vertex farthest from the first one and both
/// halves are simplified as open chains, so the first vertex and that
/// farthest vertex always survive. Vertex order (winding) is preserved.
pub fn approximate_closed_polygon(points: &[Point2D], epsilon: f64) -> Vec<Point2D> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let first = points[0];
    let (split, max_dist) = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, first.distance_to(p)))
        .fold((0, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });

    if max_dist == 0.0 {
        return vec![first];
    }

    let mut back_half: Vec<Point2D> = points[split..].to_vec();
    back_half.push(first);

    let mut ring = douglas_peucker(&points[..=split], epsilon);
    let back = douglas_peucker(&back_half, epsilon);

    // Drop the shared split vertex and the closing copy of the first vertex
    ring.extend_from_slice(&back[1..back.len() - 1]);
    ring
}

/// Douglas-Peucker line simplification algorithm
fn douglas_peucker(points: &[Point2D], epsilon: f64) -> Vec<Point2D> {
    if points.len() < 3 {
        return points.to_vec();
    }

    // Find the point with maximum distance from line between first and last
    let first = &points[0];
    let last = &points[points.len() - 1];

    let mut max_dist = 0.0;
    let mut max_idx = 0;

    for (i, point) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let dist = perpendicular_distance(point, first, last);
        if dist > max_dist {
            max_dist = dist;
            max_idx = i;
        }
    }

    if max_dist > epsilon {
        let left = douglas_peucker(&points[..=max_idx], epsilon);
        let right = douglas_peucker(&points[max_idx..], epsilon);

        let mut result = left;
        result.extend_from_slice(&right[1..]);
        result
    } else {
        vec![*first, *last]
    }
}

/// Calculate perpendicular distance from point to line
fn perpendicular_distance(point: &Point2D, line_start: &Point2D, line_end: &Point2D) -> f64 {
    let dx = line_end.x - line_start.x;
    let dy = line_end.y - line_start.y;
    let length_sq = dx * dx + dy * dy;

    if length_sq < 1e-10 {
        return point.distance_to(line_start);
    }

    ((point.x - line_start.x) * dy - (point.y - line_start.y) * dx).abs() / length_sq.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Rectangle traced pixel by pixel, like a border-following contour
    fn traced_rectangle(x0: f64, y0: f64, w: usize, h: usize) -> Vec<Point2D> {
        let mut pts = Vec::new();
        for i in 0..w {
            pts.push(Point2D::new(x0 + i as f64, y0));
        }
        for i in 0..h {
            pts.push(Point2D::new(x0 + w as f64, y0 + i as f64));
        }
        for i in 0..w {
            pts.push(Point2D::new(x0 + (w - i) as f64, y0 + h as f64));
        }
        for i in 0..h {
            pts.push(Point2D::new(x0, y0 + (h - i) as f64));
        }
        pts
    }

    fn square(x0: f64, y0: f64, side: f64) -> Vec<Point2D> {
        vec![
            Point2D::new(x0, y0),
            Point2D::new(x0 + side, y0),
            Point2D::new(x0 + side, y0 + side),
            Point2D::new(x0, y0 + side),
        ]
    }

    #[test]
    fn test_calculate_room_area() {
        assert_relative_eq!(polygon_area(&square(0.0, 0.0, 10.0)), 100.0);

        let mut clockwise = square(0.0, 0.0, 10.0);
        clockwise.reverse();
        assert_relative_eq!(polygon_area(&clockwise), 100.0);
        assert_relative_eq!(closed_perimeter(&clockwise), 40.0);
    }

    #[test]
    fn test_douglas_peucker() {
        let points = vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.1),
            Point2D::new(2.0, -0.1),
            Point2D::new(3.0, 0.0),
            Point2D::new(4.0, 0.0),
        ];

        assert_eq!(douglas_peucker(&points, 0.5).len(), 2);
    }

    #[test]
    fn test_closed_approximation_recovers_corners() {
        let contour = traced_rectangle(10.0, 20.0, 100, 60);
        let epsilon = 0.02 * closed_perimeter(&contour);
        let approx = approximate_closed_polygon(&contour, epsilon);

        assert_eq!(
            approx,
            vec![
                Point2D::new(10.0, 20.0),
                Point2D::new(110.0, 20.0),
                Point2D::new(110.0, 80.0),
                Point2D::new(10.0, 80.0),
            ]
        );
    }

    #[test]
    fn test_closed_approximation_keeps_winding() {
        let mut contour = traced_rectangle(0.0, 0.0, 80, 80);
        contour.reverse();
        let approx = approximate_closed_polygon(&contour, 2.0);

        assert_eq!(approx.len(), 4);
        // Reversed trace is clockwise in image coordinates: signed area flips
        let signed: f64 = (0..4)
            .map(|i| {
                let (p, q) = (approx[i], approx[(i + 1) % 4]);
                p.x * q.y - q.x * p.y
            })
            .sum();
        assert!(signed < 0.0);
    }

    #[test]
    fn test_area_filter_and_naming() {
        let contours = vec![
            square(0.0, 0.0, 20.0),       // 400 px², noise
            square(100.0, 100.0, 200.0),  // room
            square(0.0, 0.0, 950.0),      // sheet frame
            square(400.0, 100.0, 100.0),  // room
        ];

        let rooms = extract_rooms(
            &contours,
            1000.0 * 1000.0,
            &RoomConfig::default(),
            &BuildingConfig::default(),
        );

        let names: Vec<&str> = rooms.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Room_1", "Room_3"]);
    }

    #[test]
    fn test_area_bounds_are_exclusive() {
        // 1000 px² exactly is still noise, 80% of the image is still frame
        let contours = vec![
            vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(50.0, 0.0),
                Point2D::new(50.0, 20.0),
                Point2D::new(0.0, 20.0),
            ],
            vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(80.0, 0.0),
                Point2D::new(80.0, 100.0),
                Point2D::new(0.0, 100.0),
            ],
        ];

        let rooms = extract_rooms(&contours, 100.0 * 100.0, &RoomConfig::default(), &BuildingConfig::default());
        assert!(rooms.is_empty());
    }

    #[test]
    fn test_area_scales_quadratically() {
        let contour = traced_rectangle(0.0, 0.0, 173, 91);
        let pixel_area = polygon_area(&contour);
        let building = BuildingConfig {
            scale_factor: 0.037,
            ..Default::default()
        };

        let rooms = extract_rooms(&[contour], 1.0e6, &RoomConfig::default(), &building);
        assert_eq!(rooms.len(), 1);
        assert_relative_eq!(rooms[0].area, pixel_area * 0.037 * 0.037, max_relative = 1e-9);
        assert_relative_eq!(rooms[0].corners[1].x, 173.0 * 0.037, max_relative = 1e-9);
    }

    #[test]
    fn test_collapsed_approximation_is_dropped() {
        // Thin sliver: large enough area but approximates to a line
        let mut sliver = Vec::new();
        for i in 0..=2000 {
            sliver.push(Point2D::new(i as f64, 0.0));
        }
        for i in (0..=2000).rev() {
            sliver.push(Point2D::new(i as f64, 1.5));
        }

        let rooms = extract_rooms(&[sliver], 1.0e7, &RoomConfig::default(), &BuildingConfig::default());
        assert!(rooms.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let rooms = extract_rooms(&[], 1.0e6, &RoomConfig::default(), &BuildingConfig::default());
        assert!(rooms.is_empty());
    }
}
