// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wavefront OBJ export of building massing

use blueprint_bim_geometry::Mesh;
use blueprint_bim_reconstruct::BuildingMassing;
use std::io::{self, Write};

/// Write one OBJ object per storey
///
/// Massing is Z-up; OBJ is Y-up. Vertices map as (x, y, z) → (x, z, -y),
/// a proper rotation, so triangle winding is kept as is.
pub fn write_obj<W: Write>(out: &mut W, massing: &BuildingMassing) -> io::Result<()> {
    writeln!(out, "# Generated by blueprint-bim")?;
    writeln!(
        out,
        "# Building: {:.1}m tall, {} storeys",
        massing.total_height,
        massing.storeys.len()
    )?;
    writeln!(out, "# Coordinate system: Y-up (OBJ convention)")?;
    writeln!(out)?;

    let mut vertex_offset: u32 = 0;

    for storey in &massing.storeys {
        writeln!(
            out,
            "# Storey {}: elevation {:.2} m, {} walls, {} slabs",
            storey.index, storey.elevation, storey.wall_count, storey.slab_count
        )?;
        writeln!(out, "o storey_{}", storey.index)?;

        write_mesh(out, &storey.mesh, vertex_offset)?;

        vertex_offset += storey.mesh.vertex_count() as u32;
        writeln!(out)?;
    }

    Ok(())
}

fn write_mesh<W: Write>(out: &mut W, mesh: &Mesh, vertex_offset: u32) -> io::Result<()> {
    for p in mesh.positions.chunks_exact(3) {
        writeln!(out, "v {:.6} {:.6} {:.6}", p[0], p[2], -p[1])?;
    }

    for n in mesh.normals.chunks_exact(3) {
        writeln!(out, "vn {:.6} {:.6} {:.6}", n[0], n[2], -n[1])?;
    }

    // OBJ indices are 1-based and global across objects
    for tri in mesh.indices.chunks_exact(3) {
        let (a, b, c) = (
            tri[0] + vertex_offset + 1,
            tri[1] + vertex_offset + 1,
            tri[2] + vertex_offset + 1,
        );
        writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }

    Ok(())
}
