// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! blueprint-bim: floor plan primitives in, BIM model out
//!
//! Usage:
//!   blueprint-bim plan.json --output model.json --report report.txt --obj building.obj
//!
//! Set `RUST_LOG=debug` for per-stage counts.

mod cli;
mod obj;
mod report;

use anyhow::{Context, Result};
use blueprint_bim_reconstruct::{
    build_massing, FloorPlanPrimitives, ReconstructionConfig, Reconstructor,
};
use clap::Parser;
use cli::Cli;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ReconstructionConfig::default(),
    };
    cli.apply_overrides(&mut config);

    let reconstructor = Reconstructor::new(config).context("Invalid reconstruction configuration")?;

    let primitives = load_primitives(&cli.input)?;
    tracing::info!(
        input = %cli.input.display(),
        width = primitives.image_width,
        height = primitives.image_height,
        segments = primitives.segments.len(),
        contours = primitives.contours.len(),
        "Loaded floor plan primitives"
    );

    let model = reconstructor.reconstruct(&primitives);

    let json = model.to_json_pretty().context("Failed to serialize model")?;
    fs::write(&cli.output, json)
        .with_context(|| format!("Failed to write model to {}", cli.output.display()))?;
    tracing::info!(output = %cli.output.display(), "Wrote BIM model");

    if let Some(path) = &cli.report {
        fs::write(path, report::construction_report(&model))
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!(report = %path.display(), "Wrote construction report");
    }

    if let Some(path) = &cli.obj {
        let massing = build_massing(&model).context("Failed to build massing")?;

        let file = fs::File::create(path)
            .with_context(|| format!("Cannot create OBJ file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        obj::write_obj(&mut writer, &massing)
            .and_then(|_| writer.flush())
            .with_context(|| format!("Failed to write OBJ to {}", path.display()))?;

        tracing::info!(
            obj = %path.display(),
            storeys = massing.storeys.len(),
            total_height = massing.total_height,
            "Wrote massing"
        );
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<ReconstructionConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse config {}", path.display()))
}

fn load_primitives(path: &Path) -> Result<FloorPlanPrimitives> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read primitives {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse primitives {}", path.display()))
}
