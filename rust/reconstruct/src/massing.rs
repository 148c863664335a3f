// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Volumetric massing of a reconstructed model
//!
//! Walls become prisms around their centerlines, rooms become floor slabs.
//! Every storey repeats the same plan; slabs are laid at each level from the
//! ground floor up to the roof.

use crate::error::Result;
use crate::metrics::SLAB_THICKNESS;
use crate::types::{BimModel, Room, Wall};
use blueprint_bim_geometry::{extrude_profile, Matrix4, Mesh, Point2, Profile2D, Vector3};

/// Footprint extent of the wall centerlines (meters)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootprintBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// Geometry of one storey
#[derive(Debug, Clone)]
pub struct StoreyMassing {
    /// 0 for the ground floor
    pub index: u32,
    /// Base elevation (meters)
    pub elevation: f64,
    pub wall_count: usize,
    /// Slabs hung at this storey's level (the top storey also carries the roof)
    pub slab_count: usize,
    pub mesh: Mesh,
}

/// Complete building massing
#[derive(Debug, Clone)]
pub struct BuildingMassing {
    pub total_height: f64,
    pub bounds: FootprintBounds,
    pub storeys: Vec<StoreyMassing>,
}

impl BuildingMassing {
    /// All storeys merged into one mesh
    pub fn combined_mesh(&self) -> Mesh {
        let mut mesh = Mesh::new();
        for storey in &self.storeys {
            mesh.merge(&storey.mesh);
        }
        mesh
    }
}

/// Build wall prisms and floor slabs for every storey of `model`
pub fn build_massing(model: &BimModel) -> Result<BuildingMassing> {
    let floor_height = model.floor_height;
    let mut storeys = Vec::with_capacity(model.floors as usize);

    for index in 0..model.floors {
        let elevation = index as f64 * floor_height;
        let mut mesh = Mesh::new();

        let mut wall_count = 0;
        for wall in &model.walls {
            let Some(profile) = wall_profile(wall) else {
                continue;
            };

            let transform = Matrix4::new_translation(&Vector3::new(0.0, 0.0, elevation));
            mesh.merge(&extrude_profile(&profile, floor_height, Some(transform))?);
            wall_count += 1;
        }

        let mut slab_count = generate_slabs(&model.rooms, elevation, &mut mesh);
        // Roof level
        if index + 1 == model.floors {
            slab_count += generate_slabs(&model.rooms, model.total_height(), &mut mesh);
        }

        storeys.push(StoreyMassing {
            index,
            elevation,
            wall_count,
            slab_count,
            mesh,
        });
    }

    let massing = BuildingMassing {
        total_height: model.total_height(),
        bounds: footprint_bounds(&model.walls),
        storeys,
    };

    tracing::debug!(
        storeys = massing.storeys.len(),
        total_height = massing.total_height,
        "Built massing"
    );

    Ok(massing)
}

/// Rectangle around the centerline, offset by half the thickness on each side
fn wall_profile(wall: &Wall) -> Option<Profile2D> {
    let start = &wall.start_point;
    let end = &wall.end_point;

    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length = (dx * dx + dy * dy).sqrt();

    if length < 1e-10 || wall.thickness <= 0.0 {
        return None;
    }

    let half_thick = wall.thickness / 2.0;
    let perp_x = -dy / length * half_thick;
    let perp_y = dx / length * half_thick;

    Some(Profile2D::new(vec![
        Point2::new(start.x - perp_x, start.y - perp_y),
        Point2::new(end.x - perp_x, end.y - perp_y),
        Point2::new(end.x + perp_x, end.y + perp_y),
        Point2::new(start.x + perp_x, start.y + perp_y),
    ]))
}

/// Extrude every room polygon into a slab of [`SLAB_THICKNESS`] whose top
/// sits at `level`
fn generate_slabs(rooms: &[Room], level: f64, mesh: &mut Mesh) -> usize {
    let transform = Matrix4::new_translation(&Vector3::new(0.0, 0.0, level - SLAB_THICKNESS));
    let mut count = 0;

    for room in rooms.iter().filter(|r| r.corners.len() >= 3) {
        let profile = Profile2D::new(room.corners.iter().map(|c| c.to_nalgebra()).collect());

        match extrude_profile(&profile, SLAB_THICKNESS, Some(transform)) {
            Ok(slab) => {
                mesh.merge(&slab);
                count += 1;
            }
            Err(e) => tracing::warn!(room = %room.name, error = %e, "Skipping degenerate slab"),
        }
    }

    count
}

fn footprint_bounds(walls: &[Wall]) -> FootprintBounds {
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;

    for point in walls.iter().flat_map(|w| [&w.start_point, &w.end_point]) {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    if walls.is_empty() {
        return FootprintBounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 10.0,
            max_y: 10.0,
        };
    }

    FootprintBounds {
        min_x,
        min_y,
        max_x,
        max_y,
    }
}
