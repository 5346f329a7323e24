//! Error Types
//!
//! This module defines the error types used throughout the stage.
//!
//! # Overview
//!
//! The main error type [`StageError`] covers:
//! - Configuration loading and validation
//! - Model override input (empty paths, malformed URLs, duplicate use)
//! - Asset and engine failures surfaced by the rendering layer
//!
//! All fallible APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, StageError>`.

use thiserror::Error;

use crate::avatar::AvatarKind;

/// The main error type for the stage.
#[derive(Error, Debug)]
pub enum StageError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// The configuration file could not be read.
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        /// Path that was attempted
        path: String,
        /// Underlying I/O failure
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`StageConfig`](crate::config::StageConfig).
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A configuration value is outside its accepted range.
    #[error("Invalid config value for {field}: {message}")]
    InvalidConfig {
        /// Dotted path of the offending field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },

    // ========================================================================
    // Model Override Errors
    // ========================================================================
    /// An empty string was submitted as a model path.
    #[error("Invalid model path provided: empty input")]
    EmptyModelPath,

    /// An `http`/`https` input that does not parse as a URL.
    #[error("Invalid model URL {input}: {source}")]
    InvalidModelUrl {
        /// The rejected input
        input: String,
        /// Parser failure
        source: url::ParseError,
    },

    /// The requested model is already shown by the other avatar.
    #[error("This model is already in use by the other avatar ({0})")]
    ModelInUse(AvatarKind),

    // ========================================================================
    // Asset & Engine Errors
    // ========================================================================
    /// A model or clip file failed to load.
    #[error("Failed to load asset {uri}: {message}")]
    AssetLoad {
        /// Path or URL of the asset
        uri: String,
        /// Loader message
        message: String,
    },

    /// The rendering engine reported an error.
    #[error("Engine error: {0}")]
    Engine(String),
}

/// Alias for `Result<T, StageError>`.
pub type Result<T> = std::result::Result<T, StageError>;
