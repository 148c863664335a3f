// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor plan primitives to BIM model reconstruction
//!
//! This crate turns the raw output of blueprint detection stages (line
//! segments, closed contours, door template matches, window line boxes) into
//! a metric building model:
//! 1. Merging near-duplicate parallel segments and building walls
//! 2. Extracting rooms from contours
//! 3. Reconciling doors and windows
//! 4. Assembling the model with room metrics and material estimates
//! 5. Generating volumetric massing for export
//!
//! # Usage
//!
//! ```rust,ignore
//! use blueprint_bim_reconstruct::{build_massing, FloorPlanPrimitives, ReconstructionConfig, Reconstructor};
//!
//! let primitives: FloorPlanPrimitives = serde_json::from_str(&json)?;
//!
//! let reconstructor = Reconstructor::new(ReconstructionConfig::default())?;
//! let model = reconstructor.reconstruct(&primitives);
//!
//! println!("{}", model.to_json_pretty()?);
//! let massing = build_massing(&model)?;
//! ```

pub mod assembler;
pub mod config;
pub mod error;
pub mod massing;
pub mod metrics;
pub mod opening_reconciler;
pub mod pipeline;
pub mod room_extractor;
pub mod segment_merger;
pub mod types;
pub mod wall_builder;

// Re-export commonly used types and functions
pub use assembler::assemble_model;
pub use config::{
    BuildingConfig, MergeConfig, OpeningConfig, PipelineStages, ReconstructionConfig, RoomConfig,
};
pub use error::{Error, Result};
pub use massing::{build_massing, BuildingMassing, FootprintBounds, StoreyMassing};
pub use metrics::{estimate_materials, room_metrics};
pub use opening_reconciler::{
    associate_with_walls, deduplicate_doors, detect_windows, reconcile_doors,
};
pub use pipeline::Reconstructor;
pub use room_extractor::extract_rooms;
pub use segment_merger::{merge_parallel_segments, ClusterPolicy};
pub use types::{
    BimModel, Door, DoorCandidate, FloorPlanPrimitives, MaterialQuantities, ModelMetadata,
    PixelBox, Point2D, RawSegment, Room, RoomMetrics, Wall, Window, WindowBoxes,
};
pub use wall_builder::build_walls;
