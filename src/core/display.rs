//! Display characteristics for a map view, such as tile size and background
//! color.
//!
//! The size of map tiles is used to adapt to devices with differing pixel
//! densities and to users with different preferences: the larger the tile,
//! the larger everything is rendered, the effect being one of stretching the
//! whole map. The device-dependent part of the scaling comes from the shared
//! [`ScaleConfig`], while each [`DisplayModel`] allows further per-view
//! adaptation (maybe a small map and a large map side by side, or preventing
//! upscaling for downloaded tiles that do not scale well).

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::config::ScaleConfig;
use crate::core::constants::{
    DEFAULT_BACKGROUND_COLOR, DEFAULT_MAX_TEXT_WIDTH_FACTOR, DEFAULT_TILE_SIZE,
};
use crate::{DisplayError, Result};

/// Handle returned by [`DisplayModel::add_observer`], used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type ObserverCallback = Arc<dyn Fn() + Send + Sync>;

struct DisplayState {
    background_color: u32,
    fixed_tile_size: u32,
    tile_size_multiple: u32,
    user_scale_factor: f32,
    max_text_width_factor: f32,
    tile_size: u32,
    max_text_width: u32,
}

impl DisplayState {
    /// Recomputes the effective tile size and, from it, the text-wrap width.
    ///
    /// Without a fixed override the raw size is snapped to the nearest
    /// multiple of `tile_size_multiple`, never dropping below the multiple
    /// itself.
    fn derive_tile_size(&mut self, device_scale_factor: f32) {
        if self.fixed_tile_size == 0 {
            let raw = DEFAULT_TILE_SIZE as f32 * device_scale_factor * self.user_scale_factor;
            let multiple = self.tile_size_multiple;
            let snapped = (raw / multiple as f32).round() as u32 * multiple;
            self.tile_size = snapped.max(multiple);
        } else {
            self.tile_size = self.fixed_tile_size;
        }
        log::trace!(
            "tile size derived: {} (fixed {}, multiple {})",
            self.tile_size,
            self.fixed_tile_size,
            self.tile_size_multiple
        );
        self.derive_max_text_width();
    }

    fn derive_max_text_width(&mut self) {
        self.max_text_width = (self.tile_size as f32 * self.max_text_width_factor) as u32;
    }
}

/// Per-view display parameters with derived tile sizing.
///
/// All getters and setters serialize through one internal lock, so the
/// derived `tile_size`/`max_text_width` pair is never observed
/// mid-recomputation. Setters that change a value notify registered
/// observers exactly once, synchronously, after the state lock has been
/// released; setting a field to its current value is a no-op and fires no
/// notification.
pub struct DisplayModel {
    config: Arc<ScaleConfig>,
    state: Mutex<DisplayState>,
    observers: Mutex<Vec<(ObserverId, ObserverCallback)>>,
    next_observer_id: AtomicU64,
}

impl DisplayModel {
    /// Creates a display model bound to the given scale configuration.
    ///
    /// The configuration's `default_user_scale_factor` is snapshotted into
    /// this instance; later changes to the default do not affect it. The
    /// device scale factor, in contrast, is read live from `config`.
    pub fn new(config: Arc<ScaleConfig>) -> Self {
        let mut state = DisplayState {
            background_color: DEFAULT_BACKGROUND_COLOR,
            fixed_tile_size: 0,
            tile_size_multiple: 1,
            user_scale_factor: config.default_user_scale_factor(),
            max_text_width_factor: DEFAULT_MAX_TEXT_WIDTH_FACTOR,
            tile_size: DEFAULT_TILE_SIZE,
            max_text_width: 0,
        };
        state.derive_tile_size(config.device_scale_factor());

        Self {
            config,
            state: Mutex::new(state),
            observers: Mutex::new(Vec::new()),
            next_observer_id: AtomicU64::new(0),
        }
    }

    /// Returns the background color as a packed ARGB integer.
    pub fn background_color(&self) -> u32 {
        self.lock_state().background_color
    }

    /// Sets the background color.
    pub fn set_background_color(&self, color: u32) {
        let changed = {
            let mut state = self.lock_state();
            if state.background_color == color {
                false
            } else {
                state.background_color = color;
                true
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Returns the fixed tile size override, 0 if automatic derivation is
    /// active.
    pub fn fixed_tile_size(&self) -> u32 {
        self.lock_state().fixed_tile_size
    }

    /// Forces the tile size to a fixed value, bypassing the scale factors
    /// and the multiple constraint. A value of 0 re-enables automatic
    /// derivation.
    pub fn set_fixed_tile_size(&self, tile_size: u32) {
        let changed = {
            let mut state = self.lock_state();
            if state.fixed_tile_size == tile_size {
                false
            } else {
                state.fixed_tile_size = tile_size;
                state.derive_tile_size(self.config.device_scale_factor());
                true
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Returns the maximum width of text beyond which it is broken into
    /// lines.
    pub fn max_text_width(&self) -> u32 {
        self.lock_state().max_text_width
    }

    /// Returns the factor used to compute the maximum text width.
    pub fn max_text_width_factor(&self) -> f32 {
        self.lock_state().max_text_width_factor
    }

    /// Sets the factor used to compute the maximum text width. Only the
    /// text width is recomputed, from the current tile size.
    pub fn set_max_text_width_factor(&self, factor: f32) {
        let changed = {
            let mut state = self.lock_state();
            if state.max_text_width_factor == factor {
                false
            } else {
                state.max_text_width_factor = factor;
                state.derive_max_text_width();
                true
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Returns the overall scale factor: the live product of the shared
    /// device scale factor and this instance's user scale factor.
    pub fn scale_factor(&self) -> f32 {
        self.config.device_scale_factor() * self.lock_state().user_scale_factor
    }

    /// Width and height of a map tile in pixels after device and user
    /// scaling is applied.
    pub fn tile_size(&self) -> u32 {
        self.lock_state().tile_size
    }

    /// Returns the tile size multiple.
    pub fn tile_size_multiple(&self) -> u32 {
        self.lock_state().tile_size_multiple
    }

    /// Clamps the tile size to a multiple of the supplied value.
    ///
    /// Fails with [`DisplayError::InvalidArgument`] for a multiple of 0,
    /// which would otherwise divide by zero during derivation.
    pub fn set_tile_size_multiple(&self, multiple: u32) -> Result<()> {
        if multiple == 0 {
            return Err(DisplayError::InvalidArgument(
                "tile size multiple must be >= 1".to_string(),
            ));
        }
        let changed = {
            let mut state = self.lock_state();
            if state.tile_size_multiple == multiple {
                false
            } else {
                state.tile_size_multiple = multiple;
                state.derive_tile_size(self.config.device_scale_factor());
                true
            }
        };
        if changed {
            self.notify();
        }
        Ok(())
    }

    /// Returns the smallest repeating tile size, used for sizing shader
    /// bitmaps. This differs from the visual tile size while a multiple
    /// constraint is active.
    pub fn tiling_size(&self) -> u32 {
        let state = self.lock_state();
        if state.fixed_tile_size != 0 {
            state.fixed_tile_size
        } else if state.tile_size_multiple == 1 {
            state.tile_size
        } else {
            state.tile_size_multiple
        }
    }

    /// Returns the user scale factor.
    pub fn user_scale_factor(&self) -> f32 {
        self.lock_state().user_scale_factor
    }

    /// Sets the user scale factor and re-derives the tile size.
    pub fn set_user_scale_factor(&self, scale_factor: f32) {
        let changed = {
            let mut state = self.lock_state();
            if state.user_scale_factor == scale_factor {
                false
            } else {
                state.user_scale_factor = scale_factor;
                state.derive_tile_size(self.config.device_scale_factor());
                true
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Registers a callback invoked synchronously after every effective
    /// mutation. The callback receives no payload; observers re-read
    /// whatever state they depend on.
    pub fn add_observer<F>(&self, callback: F) -> ObserverId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = ObserverId(self.next_observer_id.fetch_add(1, Ordering::Relaxed));
        self.lock_observers().push((id, Arc::new(callback)));
        id
    }

    /// Unregisters a previously added observer. Returns false if the id is
    /// unknown.
    pub fn remove_observer(&self, id: ObserverId) -> bool {
        let mut observers = self.lock_observers();
        let before = observers.len();
        observers.retain(|(observer_id, _)| *observer_id != id);
        observers.len() != before
    }

    // Callbacks are cloned out so none of them runs under either lock; a
    // callback may therefore call back into this model.
    fn notify(&self) {
        let callbacks: Vec<ObserverCallback> = self
            .lock_observers()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback();
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, DisplayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_observers(&self) -> MutexGuard<'_, Vec<(ObserverId, ObserverCallback)>> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for DisplayModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock_state();
        f.debug_struct("DisplayModel")
            .field("background_color", &state.background_color)
            .field("fixed_tile_size", &state.fixed_tile_size)
            .field("tile_size_multiple", &state.tile_size_multiple)
            .field("user_scale_factor", &state.user_scale_factor)
            .field("max_text_width_factor", &state.max_text_width_factor)
            .field("tile_size", &state.tile_size)
            .field("max_text_width", &state.max_text_width)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn model() -> DisplayModel {
        DisplayModel::new(Arc::new(ScaleConfig::new()))
    }

    #[test]
    fn test_default_derivation() {
        let model = model();
        assert_eq!(model.tile_size(), 256);
        assert_eq!(model.max_text_width(), 179); // floor(256 * 0.7)
        assert_eq!(model.background_color(), 0xFFEE_EEEE);
        assert_eq!(model.scale_factor(), 1.0);
    }

    #[test]
    fn test_tile_size_snaps_to_multiple() {
        let config = Arc::new(ScaleConfig::new());
        config.set_device_scale_factor(1.5);
        let model = DisplayModel::new(config);
        model.set_tile_size_multiple(32).unwrap();
        // 256 * 1.5 = 384, already a multiple of 32
        assert_eq!(model.tile_size(), 384);

        model.set_user_scale_factor(1.1);
        // 256 * 1.5 * 1.1 = 422.4, nearest multiple of 32 is 416
        assert_eq!(model.tile_size(), 416);
        assert_eq!(model.tile_size() % 32, 0);
    }

    #[test]
    fn test_tile_size_never_below_multiple() {
        let model = model();
        model.set_user_scale_factor(0.01);
        model.set_tile_size_multiple(64).unwrap();
        assert_eq!(model.tile_size(), 64);
    }

    #[test]
    fn test_fixed_tile_size_overrides_derivation() {
        let model = model();
        model.set_tile_size_multiple(32).unwrap();
        model.set_fixed_tile_size(100);
        assert_eq!(model.tile_size(), 100);

        // Scale changes are ignored while the override is active
        model.set_user_scale_factor(3.0);
        assert_eq!(model.tile_size(), 100);

        // 0 re-enables derivation: 256 * 3.0 = 768, a multiple of 32
        model.set_fixed_tile_size(0);
        assert_eq!(model.tile_size(), 768);
    }

    #[test]
    fn test_zero_multiple_rejected() {
        let model = model();
        let err = model.set_tile_size_multiple(0).unwrap_err();
        assert!(matches!(err, DisplayError::InvalidArgument(_)));
        // State is untouched by the rejected call
        assert_eq!(model.tile_size_multiple(), 1);
        assert_eq!(model.tile_size(), 256);
    }

    #[test]
    fn test_max_text_width_tracks_tile_size() {
        let model = model();
        model.set_user_scale_factor(2.0);
        assert_eq!(model.tile_size(), 512);
        assert_eq!(model.max_text_width(), 358); // floor(512 * 0.7)

        model.set_max_text_width_factor(0.5);
        assert_eq!(model.max_text_width(), 256);
    }

    #[test]
    fn test_tiling_size() {
        let model = model();
        assert_eq!(model.tiling_size(), 256);

        model.set_tile_size_multiple(32).unwrap();
        assert_eq!(model.tiling_size(), 32);

        model.set_fixed_tile_size(100);
        assert_eq!(model.tiling_size(), 100);
    }

    #[test]
    fn test_scale_factor_is_live() {
        let config = Arc::new(ScaleConfig::new());
        let model = DisplayModel::new(Arc::clone(&config));
        assert_eq!(model.tile_size(), 256);

        // Device scale changes are visible in the product immediately but
        // do not re-derive the tile size of an existing instance.
        config.set_device_scale_factor(2.0);
        assert_eq!(model.scale_factor(), 2.0);
        assert_eq!(model.tile_size(), 256);

        // The next instance mutation picks the new device scale up.
        model.set_user_scale_factor(1.5);
        assert_eq!(model.tile_size(), 768);
    }

    #[test]
    fn test_default_user_scale_snapshot() {
        let config = Arc::new(ScaleConfig::new());
        config.set_default_user_scale_factor(2.0);
        let model = DisplayModel::new(Arc::clone(&config));
        assert_eq!(model.user_scale_factor(), 2.0);
        assert_eq!(model.tile_size(), 512);

        // Changing the default later does not touch the snapshot
        config.set_default_user_scale_factor(1.0);
        assert_eq!(model.user_scale_factor(), 2.0);
    }

    #[test]
    fn test_observer_fires_once_per_change() {
        let model = model();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        model.add_observer(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        model.set_user_scale_factor(2.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // No-op set, no notification
        model.set_user_scale_factor(2.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        model.set_background_color(0xFF00_0000);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_observer_can_read_state() {
        let model = Arc::new(model());
        let observed = Arc::new(AtomicUsize::new(0));
        let model_ref = Arc::clone(&model);
        let observed_ref = Arc::clone(&observed);
        model.add_observer(move || {
            observed_ref.store(model_ref.tile_size() as usize, Ordering::SeqCst);
        });
        model.set_user_scale_factor(2.0);
        assert_eq!(observed.load(Ordering::SeqCst), 512);
    }

    #[test]
    fn test_remove_observer() {
        let model = model();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let id = model.add_observer(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert!(model.remove_observer(id));
        assert!(!model.remove_observer(id));

        model.set_user_scale_factor(2.0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
