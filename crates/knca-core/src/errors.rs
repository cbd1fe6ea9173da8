//! Error types shared by the core crate.
//!
//! Transport errors live in their own crates (`BackendError`,
//! `NcaLayerError`). The controller never propagates them; it reports them
//! as notifications. `CoreError` covers the local operations that can fail
//! outright, such as reading a template or CA file.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A local file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A card template is missing a required placeholder.
    #[error("card template is missing the {{{{{0}}}}} placeholder")]
    Template(String),
}
