// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use blueprint_bim_reconstruct::ReconstructionConfig;
use clap::Parser;
use std::path::PathBuf;

/// Reconstruct a BIM model from detected floor plan primitives
#[derive(Parser, Debug)]
#[command(name = "blueprint-bim")]
#[command(about = "Reconstruct walls, rooms and openings from floor plan primitives", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Primitives JSON (segments, contours, door candidates, window boxes)
    pub input: PathBuf,

    /// Reconstruction config JSON; missing fields keep their defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Where to write the model JSON
    #[arg(short, long, default_value = "model.json")]
    pub output: PathBuf,

    /// Write a construction planning report
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Write wall and slab massing as Wavefront OBJ
    #[arg(long)]
    pub obj: Option<PathBuf>,

    /// Meters per pixel
    #[arg(long)]
    pub scale: Option<f64>,

    /// Number of storeys
    #[arg(long)]
    pub floors: Option<u32>,

    /// Storey height in meters
    #[arg(long)]
    pub floor_height: Option<f64>,

    /// Skip door reconciliation
    #[arg(long)]
    pub no_doors: bool,

    /// Skip window detection
    #[arg(long)]
    pub no_windows: bool,

    /// Attach openings to the nearest wall within this many meters
    #[arg(long, value_name = "TOLERANCE")]
    pub associate_walls: Option<f64>,
}

impl Cli {
    /// Command-line flags win over the config file
    pub fn apply_overrides(&self, config: &mut ReconstructionConfig) {
        if let Some(scale) = self.scale {
            config.building.scale_factor = scale;
        }
        if let Some(floors) = self.floors {
            config.building.floors = floors;
        }
        if let Some(height) = self.floor_height {
            config.building.floor_height = height;
        }
        if self.no_doors {
            config.stages.doors = false;
        }
        if self.no_windows {
            config.stages.windows = false;
        }
        if let Some(tolerance) = self.associate_walls {
            config.openings.wall_association_tolerance = Some(tolerance);
        }
    }
}
