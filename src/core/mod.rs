pub mod config;
pub mod constants;
pub mod display;

// Re-export main types
pub use config::ScaleConfig;
pub use display::{DisplayModel, ObserverId};
