// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plain-text construction planning report

use blueprint_bim_reconstruct::{estimate_materials, room_metrics, BimModel};

const RULE_WIDTH: usize = 60;

/// Render the overview, per-room details and material estimates
///
/// Metrics and quantities are recomputed from the model, so a model written
/// without analysis still gets a full report.
pub fn construction_report(model: &BimModel) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut lines = vec![
        heavy.clone(),
        "CONSTRUCTION PLANNING REPORT".to_string(),
        heavy,
        String::new(),
    ];

    lines.push("BUILDING OVERVIEW".to_string());
    lines.push(light.clone());
    lines.push(format!("Number of floors: {}", model.floors));
    lines.push(format!("Floor height: {} m", model.floor_height));
    lines.push(format!(
        "Total floor area: {:.2} m²",
        model.metadata.total_floor_area
    ));
    lines.push(format!(
        "Total wall length: {:.2} m",
        model.metadata.total_wall_length
    ));
    lines.push(String::new());

    lines.push("ROOM DETAILS".to_string());
    lines.push(light.clone());
    // Detection order, not the name order of the metrics map
    let metrics_by_name = room_metrics(&model.rooms);
    for room in &model.rooms {
        let Some(metrics) = metrics_by_name.get(&room.name) else {
            continue;
        };
        lines.push(format!("\n{}:", room.name));
        lines.push(format!("  Area: {:.2} m²", metrics.area));
        lines.push(format!("  Perimeter: {:.2} m", metrics.perimeter));
        lines.push(format!("  Corners: {}", metrics.corner_count));
    }
    lines.push(String::new());

    let quantities = estimate_materials(model);
    lines.push("ESTIMATED MATERIAL QUANTITIES".to_string());
    lines.push(light);
    lines.push("\nConcrete:".to_string());
    lines.push(format!(
        "  Floor slabs: {:.2} m³",
        quantities.floor_slab_concrete_m3
    ));
    lines.push("\nWalls:".to_string());
    lines.push(format!("  Total wall area: {:.2} m²", quantities.wall_area_m2));
    lines.push(format!(
        "  Estimated bricks: {}",
        group_thousands(quantities.brick_count)
    ));
    lines.push("\nFlooring:".to_string());
    lines.push(format!(
        "  Tiles required: {:.2} m²",
        quantities.flooring_tiles_m2
    ));
    lines.push("\nDoors and Windows:".to_string());
    lines.push(format!("  Doors: {}", quantities.door_count));
    lines.push(format!("  Windows: {}", quantities.window_count));
    lines.push(String::new());

    lines.join("\n")
}

/// `53223` → `53,223`
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}
