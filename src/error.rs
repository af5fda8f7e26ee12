use thiserror::Error;

use crate::config::ConfigError;
use crate::mesh::LoadError;

/// Result type for decal operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers.
///
/// Geometric degeneracies are not errors; they are absorbed by the clipping
/// code. Only broken call contracts, capacity-independent I/O and bad
/// configuration end up here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("source triangle count {count} exceeds buffer length {len}")]
    InvalidInput { count: usize, len: usize },

    #[error("Mesh load error: {0}")]
    Load(#[from] LoadError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
