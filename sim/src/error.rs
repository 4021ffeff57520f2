//! Error types for building a simulation.
//!
//! The per-frame path never fails; everything here is raised while loading
//! configuration or level geometry.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("invalid config value `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("level static {id}: non-finite vertex")]
    NonFiniteVertex { id: u32 },

    #[error("level static {id}: triangle index {index} out of range ({len} vertices)")]
    IndexOutOfRange { id: u32, index: u32, len: usize },

    #[error("level static {id}: invalid shape ({reason})")]
    InvalidShape { id: u32, reason: String },

    #[error("level has no collision triangles")]
    EmptyWorld,
}

pub type Result<T> = std::result::Result<T, SimError>;
