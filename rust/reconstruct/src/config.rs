// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reconstruction configuration
//!
//! Every field has a default, so a partial JSON document (or none at all)
//! yields a usable configuration. Call [`ReconstructionConfig::validate`]
//! before processing any geometry; [`crate::Reconstructor::new`] does this.

use crate::error::{Error, Result};
use crate::segment_merger::ClusterPolicy;
use crate::types::{Door, Wall};
use serde::{Deserialize, Serialize};

/// Building-level scalars
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BuildingConfig {
    /// Meters per pixel (0.05 = 1 pixel is 5 cm)
    pub scale_factor: f64,
    /// Storey height in meters
    pub floor_height: f64,
    /// Number of stacked storeys
    pub floors: u32,
    /// Wall thickness assigned to every wall (meters)
    pub wall_thickness: f64,
    /// Wall height assigned to every wall (meters)
    pub wall_height: f64,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self {
            scale_factor: 0.05,
            floor_height: 3.0,
            floors: 1,
            wall_thickness: Wall::DEFAULT_THICKNESS,
            wall_height: Wall::DEFAULT_HEIGHT,
        }
    }
}

/// Parallel segment clustering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MergeConfig {
    /// Maximum orientation difference (degrees, exclusive)
    pub max_angle_deg: f64,
    /// Maximum perpendicular distance (pixels, exclusive)
    pub max_distance_px: f64,
    pub policy: ClusterPolicy,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            max_angle_deg: 5.0,
            max_distance_px: 10.0,
            policy: ClusterPolicy::Seeded,
        }
    }
}

/// Contour filtering and polygon approximation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoomConfig {
    /// Contours at or below this pixel area are noise
    pub min_room_area_px: f64,
    /// Contours at or above this fraction of the image are the frame
    pub max_image_fraction: f64,
    /// Douglas-Peucker tolerance as a fraction of the contour perimeter
    pub approximation_ratio: f64,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_room_area_px: 1000.0,
            max_image_fraction: 0.8,
            approximation_ratio: 0.02,
        }
    }
}

/// Door and window reconciliation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OpeningConfig {
    /// Minimum template score for scored door candidates
    pub door_match_threshold: f64,
    /// Width given to every door (meters)
    pub door_width: f64,
    /// Doors closer than this to an accepted door are duplicates (meters)
    pub door_min_spacing: f64,
    /// Exclusive window box bounds (pixels)
    pub window_min_width_px: f64,
    pub window_max_width_px: f64,
    pub window_min_height_px: f64,
    pub window_max_height_px: f64,
    /// Attach openings to the nearest wall within this distance (meters)
    pub wall_association_tolerance: Option<f64>,
}

impl Default for OpeningConfig {
    fn default() -> Self {
        Self {
            door_match_threshold: 0.6,
            door_width: Door::DEFAULT_WIDTH,
            door_min_spacing: 1.0,
            window_min_width_px: 30.0,
            window_max_width_px: 200.0,
            window_min_height_px: 10.0,
            window_max_height_px: 50.0,
            wall_association_tolerance: None,
        }
    }
}

/// Optional pipeline stages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineStages {
    pub doors: bool,
    pub windows: bool,
    /// Attach room metrics and material quantities to the model metadata
    pub analysis: bool,
}

impl Default for PipelineStages {
    fn default() -> Self {
        Self {
            doors: true,
            windows: true,
            analysis: true,
        }
    }
}

/// Complete configuration for one reconstruction run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReconstructionConfig {
    pub building: BuildingConfig,
    pub merge: MergeConfig,
    pub rooms: RoomConfig,
    pub openings: OpeningConfig,
    pub stages: PipelineStages,
}

impl ReconstructionConfig {
    /// Reject non-finite or out-of-range values, reporting the first one found
    pub fn validate(&self) -> Result<()> {
        let b = &self.building;
        positive("building.scale_factor", b.scale_factor)?;
        positive("building.floor_height", b.floor_height)?;
        if b.floors < 1 {
            return Err(Error::invalid("building.floors", "at least 1", b.floors as f64));
        }
        positive("building.wall_thickness", b.wall_thickness)?;
        positive("building.wall_height", b.wall_height)?;

        positive("merge.max_angle_deg", self.merge.max_angle_deg)?;
        positive("merge.max_distance_px", self.merge.max_distance_px)?;

        let r = &self.rooms;
        non_negative("rooms.min_room_area_px", r.min_room_area_px)?;
        positive("rooms.max_image_fraction", r.max_image_fraction)?;
        if r.max_image_fraction > 1.0 {
            return Err(Error::invalid(
                "rooms.max_image_fraction",
                "at most 1",
                r.max_image_fraction,
            ));
        }
        non_negative("rooms.approximation_ratio", r.approximation_ratio)?;

        let o = &self.openings;
        finite("openings.door_match_threshold", o.door_match_threshold)?;
        positive("openings.door_width", o.door_width)?;
        positive("openings.door_min_spacing", o.door_min_spacing)?;
        non_negative("openings.window_min_width_px", o.window_min_width_px)?;
        non_negative("openings.window_min_height_px", o.window_min_height_px)?;
        above(
            "openings.window_max_width_px",
            "greater than window_min_width_px",
            o.window_max_width_px,
            o.window_min_width_px,
        )?;
        above(
            "openings.window_max_height_px",
            "greater than window_min_height_px",
            o.window_max_height_px,
            o.window_min_height_px,
        )?;
        if let Some(tolerance) = o.wall_association_tolerance {
            non_negative("openings.wall_association_tolerance", tolerance)?;
        }

        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid(field, "a finite number", value))
    }
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(field, "a positive finite number", value))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(field, "a non-negative finite number", value))
    }
}

fn above(field: &'static str, requirement: &'static str, value: f64, lower: f64) -> Result<()> {
    if value.is_finite() && value > lower {
        Ok(())
    } else {
        Err(Error::invalid(field, requirement, value))
    }
}
