//! # mapdisplay
//!
//! Display configuration model for a tile map engine.
//!
//! The central type is [`DisplayModel`], which derives the effective on-screen
//! pixel size of a map tile from the device pixel density, a per-instance user
//! scale preference, and an alignment constraint, and keeps dependent values
//! (maximum text-wrap width) consistent with that derived size. Device-level
//! scale configuration shared between components lives in [`ScaleConfig`].
//!
//! The [`graphics`] module carries the backend-agnostic graphics factory
//! contract together with a headless stub for environments without a real
//! graphics backend.

pub mod core;
pub mod graphics;

pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::ScaleConfig,
    display::{DisplayModel, ObserverId},
};

pub use graphics::{
    headless::HeadlessGraphicFactory, Color, GraphicCapability, GraphicFactory,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, DisplayError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unsupported graphics operation: {0}")]
    Unsupported(&'static str),

    #[error("color parse error: {0}")]
    ColorParse(String),
}

/// Error type alias for convenience
pub type Error = DisplayError;
