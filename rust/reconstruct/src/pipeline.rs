// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end reconstruction
//!
//! Stages run in a fixed order and pass their results along explicitly:
//!
//! 1. merge parallel segments, then build walls
//! 2. extract rooms from contours
//! 3. reconcile doors and detect windows (each optional)
//! 4. attach openings to walls (when a tolerance is configured)
//! 5. assemble the model
//! 6. attach room metrics and material quantities (optional)

use crate::assembler::assemble_model;
use crate::config::ReconstructionConfig;
use crate::error::Result;
use crate::metrics::{estimate_materials, room_metrics};
use crate::opening_reconciler::{associate_with_walls, detect_windows, reconcile_doors};
use crate::room_extractor::extract_rooms;
use crate::segment_merger::merge_parallel_segments;
use crate::types::{BimModel, FloorPlanPrimitives};
use crate::wall_builder::build_walls;

/// Reconstructs BIM models with a validated configuration
#[derive(Debug, Clone)]
pub struct Reconstructor {
    config: ReconstructionConfig,
}

impl Reconstructor {
    /// Validate `config` and build a reconstructor around it
    pub fn new(config: ReconstructionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run every enabled stage over one floor plan
    pub fn reconstruct(&self, primitives: &FloorPlanPrimitives) -> BimModel {
        let config = &self.config;
        let building = &config.building;

        let merged = merge_parallel_segments(&primitives.segments, &config.merge);
        let walls = build_walls(&merged, building);

        let rooms = extract_rooms(
            &primitives.contours,
            primitives.image_area(),
            &config.rooms,
            building,
        );

        let mut doors = if config.stages.doors {
            reconcile_doors(&primitives.door_candidates, &config.openings, building)
        } else {
            Vec::new()
        };

        let mut windows = if config.stages.windows {
            detect_windows(&primitives.window_boxes, &config.openings, building)
        } else {
            Vec::new()
        };

        if let Some(tolerance) = config.openings.wall_association_tolerance {
            (doors, windows) = associate_with_walls(&doors, &windows, &walls, tolerance);
        }

        let model = assemble_model(walls, rooms, doors, windows, building);

        let model = if config.stages.analysis {
            let metrics = room_metrics(&model.rooms);
            let quantities = estimate_materials(&model);
            model.with_analysis(metrics, quantities)
        } else {
            model
        };

        tracing::info!(
            segments = primitives.segments.len(),
            merged_segments = merged.len(),
            walls = model.walls.len(),
            rooms = model.rooms.len(),
            doors = model.doors.len(),
            windows = model.windows.len(),
            total_wall_length = model.metadata.total_wall_length,
            total_floor_area = model.metadata.total_floor_area,
            "Reconstructed BIM model"
        );

        model
    }
}
