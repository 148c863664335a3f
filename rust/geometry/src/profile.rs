// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar profiles (wall footprints, slab outlines) and their triangulation

use crate::error::{Error, Result};
use nalgebra::Point2;

/// Closed planar outline in the XY plane
#[derive(Debug, Clone, PartialEq)]
pub struct Profile2D {
    /// Boundary ring, implicitly closed (last point connects to first)
    pub outer: Vec<Point2<f64>>,
}

/// Triangulated profile: cap vertices and triangle indices into them
#[derive(Debug, Clone)]
pub struct Triangulation {
    pub points: Vec<Point2<f64>>,
    pub indices: Vec<usize>,
}

impl Profile2D {
    pub fn new(outer: Vec<Point2<f64>>) -> Self {
        Self { outer }
    }

    /// Shoelace area, positive for counter-clockwise rings
    pub fn signed_area(&self) -> f64 {
        let n = self.outer.len();
        if n < 3 {
            return 0.0;
        }

        let mut twice_area = 0.0;
        for i in 0..n {
            let p = &self.outer[i];
            let q = &self.outer[(i + 1) % n];
            twice_area += p.x * q.y - q.x * p.y;
        }
        twice_area / 2.0
    }

    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Reorder the ring counter-clockwise so side normals point outward.
    ///
    /// Room corners keep the source contour's winding, which may be either.
    pub fn into_counter_clockwise(mut self) -> Self {
        if self.signed_area() < 0.0 {
            self.outer.reverse();
        }
        self
    }

    /// Triangulate the outline for cap generation
    pub fn triangulate(&self) -> Result<Triangulation> {
        let n = self.outer.len();
        if n < 3 {
            return Err(Error::InvalidProfile(format!(
                "Profile must have at least 3 vertices, got {}",
                n
            )));
        }
        if self.signed_area().abs() < 1e-12 {
            return Err(Error::InvalidProfile("Profile has zero area".to_string()));
        }

        let indices = match n {
            3 => vec![0, 1, 2],
            // Wall footprints are always convex quads
            4 if is_convex(&self.outer) => vec![0, 1, 2, 0, 2, 3],
            _ if n <= 8 && is_convex(&self.outer) => fan_triangulate(n),
            _ => {
                let flat: Vec<f64> = self.outer.iter().flat_map(|p| [p.x, p.y]).collect();
                earcutr::earcut(&flat, &[], 2)
                    .map_err(|e| Error::TriangulationError(format!("{:?}", e)))?
            }
        };

        if indices.is_empty() {
            return Err(Error::TriangulationError(
                "earcut produced no triangles".to_string(),
            ));
        }

        Ok(Triangulation {
            points: self.outer.clone(),
            indices,
        })
    }
}

/// All turns in the same direction
fn is_convex(points: &[Point2<f64>]) -> bool {
    let n = points.len();
    let mut sign = 0i8;

    for i in 0..n {
        let p0 = &points[i];
        let p1 = &points[(i + 1) % n];
        let p2 = &points[(i + 2) % n];
        let cross = (p1.x - p0.x) * (p2.y - p1.y) - (p1.y - p0.y) * (p2.x - p1.x);

        if cross.abs() > 1e-10 {
            let current = if cross > 0.0 { 1 } else { -1 };
            if sign == 0 {
                sign = current;
            } else if sign != current {
                return false;
            }
        }
    }

    true
}

fn fan_triangulate(n: usize) -> Vec<usize> {
    (1..n - 1).flat_map(|i| [0, i, i + 1]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn l_shape() -> Profile2D {
        Profile2D::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 3.0),
            Point2::new(0.0, 3.0),
        ])
    }

    #[test]
    fn test_signed_area_orientation() {
        let ccw = Profile2D::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 3.0),
            Point2::new(0.0, 3.0),
        ]);
        assert_relative_eq!(ccw.signed_area(), 6.0);

        let mut cw = ccw.clone();
        cw.outer.reverse();
        assert_relative_eq!(cw.signed_area(), -6.0);
        assert!(cw.into_counter_clockwise().is_counter_clockwise());
    }

    #[test]
    fn test_triangulate_concave_uses_earcut() {
        let tri = l_shape().triangulate().unwrap();
        // n - 2 triangles for a simple polygon
        assert_eq!(tri.indices.len(), 4 * 3);
    }

    #[test]
    fn test_triangulate_rejects_degenerate() {
        let line = Profile2D::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ]);
        assert!(matches!(line.triangulate(), Err(Error::InvalidProfile(_))));

        let two = Profile2D::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
        assert!(two.triangulate().is_err());
    }
}
