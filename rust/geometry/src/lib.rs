// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Blueprint-BIM geometry primitives
//!
//! Small mesh toolkit used to turn reconstructed floor plans into volumes:
//! planar profiles triangulated with earcutr, straight extrusion along Z, and
//! an indexed triangle mesh with per-vertex normals.

pub mod error;
pub mod extrusion;
pub mod mesh;
pub mod profile;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point2, Point3, Vector3};

pub use error::{Error, Result};
pub use extrusion::{apply_transform, extrude_profile};
pub use mesh::Mesh;
pub use profile::{Profile2D, Triangulation};
