//! Shared scale configuration service.
//!
//! Device pixel density and the default user scale preference are shared
//! between every component that sizes tiles (UI thread applying preferences,
//! rendering thread reading them). Instead of ambient globals, whatever
//! composes the system creates one [`ScaleConfig`] at startup and hands an
//! `Arc<ScaleConfig>` to each component that needs live access.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Copy)]
struct ScaleFactors {
    device: f32,
    default_user: f32,
}

/// Lock-protected pair of process-wide scale factors.
///
/// Both fields default to `1.0`. Reads and writes go through a single
/// `RwLock` so a reader never observes a torn update of the pair.
#[derive(Debug)]
pub struct ScaleConfig {
    inner: RwLock<ScaleFactors>,
}

impl ScaleConfig {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(ScaleFactors {
                device: 1.0,
                default_user: 1.0,
            }),
        }
    }

    /// Returns the device scale factor, the hardware pixel-density multiplier.
    pub fn device_scale_factor(&self) -> f32 {
        self.read().device
    }

    /// Sets the device scale factor.
    ///
    /// Existing [`DisplayModel`](crate::DisplayModel) instances do not
    /// recompute their tile size in response; recomputation only happens
    /// through an instance's own mutators. Their `scale_factor()` does
    /// reflect the new value immediately.
    pub fn set_device_scale_factor(&self, scale_factor: f32) {
        log::debug!("device scale factor set to {}", scale_factor);
        self.write().device = scale_factor;
    }

    /// Returns the user scale factor applied to newly created display models.
    pub fn default_user_scale_factor(&self) -> f32 {
        self.read().default_user
    }

    /// Sets the user scale factor for all display models created afterwards,
    /// so it can be used to apply user settings from a device. Instances
    /// already constructed keep their snapshot.
    pub fn set_default_user_scale_factor(&self, scale_factor: f32) {
        log::debug!("default user scale factor set to {}", scale_factor);
        self.write().default_user = scale_factor;
    }

    fn read(&self) -> RwLockReadGuard<'_, ScaleFactors> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ScaleFactors> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self::new()
    }
}
