// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion operations - converting 2D profiles to closed prisms

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::profile::{Profile2D, Triangulation};
use nalgebra::{Matrix4, Point2, Point3, Vector3};

/// Extrude a 2D profile along +Z from z = 0 to z = `depth`
///
/// The profile is normalised to counter-clockwise order first so that cap and
/// side normals point out of the solid regardless of the input winding.
pub fn extrude_profile(
    profile: &Profile2D,
    depth: f64,
    transform: Option<Matrix4<f64>>,
) -> Result<Mesh> {
    if depth <= 0.0 || !depth.is_finite() {
        return Err(Error::InvalidExtrusion(format!(
            "Depth must be positive, got {}",
            depth
        )));
    }

    let profile = profile.clone().into_counter_clockwise();
    let triangulation = profile.triangulate()?;

    let n = profile.outer.len();
    let mut mesh = Mesh::with_capacity(
        triangulation.points.len() * 2 + n * 4,
        triangulation.indices.len() * 2 + n * 6,
    );

    create_cap(&triangulation, 0.0, false, &mut mesh);
    create_cap(&triangulation, depth, true, &mut mesh);
    create_side_walls(&profile.outer, depth, &mut mesh);

    if let Some(mat) = transform {
        apply_transform(&mut mesh, &mat);
    }

    Ok(mesh)
}

fn create_cap(triangulation: &Triangulation, z: f64, facing_up: bool, mesh: &mut Mesh) {
    let normal = if facing_up {
        Vector3::z()
    } else {
        -Vector3::z()
    };

    let base = mesh.vertex_count() as u32;
    for point in &triangulation.points {
        mesh.add_vertex(Point3::new(point.x, point.y, z), normal);
    }

    for tri in triangulation.indices.chunks_exact(3) {
        let (a, b, c) = (tri[0], tri[1], tri[2]);
        let ccw = triangle_signed_area(
            &triangulation.points[a],
            &triangulation.points[b],
            &triangulation.points[c],
        ) >= 0.0;

        // Top faces wind counter-clockwise seen from +Z, bottom faces the opposite
        let (b, c) = if ccw == facing_up { (b, c) } else { (c, b) };
        mesh.add_triangle(base + a as u32, base + b as u32, base + c as u32);
    }
}

fn triangle_signed_area(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)) / 2.0
}

/// One outward-facing quad per boundary edge of a counter-clockwise ring
fn create_side_walls(boundary: &[Point2<f64>], depth: f64, mesh: &mut Mesh) {
    for i in 0..boundary.len() {
        let p0 = &boundary[i];
        let p1 = &boundary[(i + 1) % boundary.len()];

        let normal = match Vector3::new(p1.y - p0.y, p0.x - p1.x, 0.0).try_normalize(1e-10) {
            Some(n) => n,
            None => continue, // repeated vertex
        };

        let v0 = mesh.add_vertex(Point3::new(p0.x, p0.y, 0.0), normal);
        let v1 = mesh.add_vertex(Point3::new(p1.x, p1.y, 0.0), normal);
        let v2 = mesh.add_vertex(Point3::new(p1.x, p1.y, depth), normal);
        let v3 = mesh.add_vertex(Point3::new(p0.x, p0.y, depth), normal);

        mesh.add_triangle(v0, v1, v2);
        mesh.add_triangle(v0, v2, v3);
    }
}

/// Apply an affine transform to positions and normals in place
pub fn apply_transform(mesh: &mut Mesh, transform: &Matrix4<f64>) {
    mesh.positions.chunks_exact_mut(3).for_each(|chunk| {
        let point = Point3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
        let transformed = transform.transform_point(&point);
        chunk[0] = transformed.x as f32;
        chunk[1] = transformed.y as f32;
        chunk[2] = transformed.z as f32;
    });

    // Normals go through the inverse transpose
    let normal_matrix = transform.try_inverse().unwrap_or(*transform).transpose();

    mesh.normals.chunks_exact_mut(3).for_each(|chunk| {
        let normal = Vector3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
        let transformed = (normal_matrix * normal.to_homogeneous()).xyz();
        let transformed = transformed.try_normalize(1e-12).unwrap_or(transformed);
        chunk[0] = transformed.x as f32;
        chunk[1] = transformed.y as f32;
        chunk[2] = transformed.z as f32;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Profile2D {
        Profile2D::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ])
    }

    #[test]
    fn test_extrude_box_counts() {
        let mesh = extrude_profile(&unit_square(), 3.0, None).unwrap();

        // 4 + 4 cap vertices, 4 quads of 4 vertices
        assert_eq!(mesh.vertex_count(), 24);
        // 2 + 2 cap triangles, 8 side triangles
        assert_eq!(mesh.triangle_count(), 12);

        let (min, max) = mesh.bounds();
        assert_relative_eq!(min.z, 0.0);
        assert_relative_eq!(max.z, 3.0);
    }

    #[test]
    fn test_side_normals_point_outward_for_clockwise_input() {
        let mut profile = unit_square();
        profile.outer.reverse();
        let mesh = extrude_profile(&profile, 1.0, None).unwrap();

        // Side vertices start after the 8 cap vertices
        for (pos, normal) in mesh.positions.chunks_exact(3).zip(mesh.normals.chunks_exact(3)).skip(8) {
            let to_vertex = Vector3::new(pos[0] - 0.5, pos[1] - 0.5, 0.0);
            let n = Vector3::new(normal[0], normal[1], normal[2]);
            assert!(to_vertex.dot(&n) > 0.0);
        }
    }

    #[test]
    fn test_extrude_with_translation() {
        let transform = Matrix4::new_translation(&Vector3::new(0.0, 0.0, 6.0));
        let mesh = extrude_profile(&unit_square(), 3.0, Some(transform)).unwrap();

        let (min, max) = mesh.bounds();
        assert_relative_eq!(min.z, 6.0);
        assert_relative_eq!(max.z, 9.0);
    }

    #[test]
    fn test_rejects_non_positive_depth() {
        assert!(matches!(
            extrude_profile(&unit_square(), 0.0, None),
            Err(Error::InvalidExtrusion(_))
        ));
        assert!(extrude_profile(&unit_square(), -1.0, None).is_err());
    }
}
