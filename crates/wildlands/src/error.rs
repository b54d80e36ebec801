//! # World Error Types
//!
//! Everything in here is reported at the edges (config loading, asset
//! loading). Nothing inside a simulation tick can fail.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the world crate.
#[derive(Error, Debug)]
pub enum WorldError {
    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::WorldConfig`].
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config parsed but holds an unusable value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Skeleton/animation/model load failed.
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Asset load failures reported by an animation collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// Nothing exists at the given path.
    #[error("asset not found: {0}")]
    NotFound(String),

    /// The file exists but could not be decoded.
    #[error("failed to load {path}: {reason}")]
    Malformed {
        /// Asset path.
        path: String,
        /// Decoder message.
        reason: String,
    },

    /// Animation does not target the given skeleton.
    #[error("animation {animation} does not match skeleton {skeleton}")]
    SkeletonMismatch {
        /// Skeleton path.
        skeleton: String,
        /// Animation path.
        animation: String,
    },
}

/// Result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;
