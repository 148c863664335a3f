// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for reconstruction operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the reconstruction engine
///
/// Degenerate geometry and empty inputs are not errors: they are filtered or
/// produce empty entity lists.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid configuration: {field} must be {requirement} (got {value})")]
    InvalidConfiguration {
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },

    #[error("Massing error: {0}")]
    Massing(#[from] blueprint_bim_geometry::Error),
}

impl Error {
    pub(crate) fn invalid(field: &'static str, requirement: &'static str, value: f64) -> Self {
        Error::InvalidConfiguration {
            field,
            requirement,
            value,
        }
    }
}
