//! Engine-wide display defaults. Keeping them in a single place makes it
//! easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels, before any scaling is applied.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Default tile background fill, packed ARGB (light grey, fully opaque).
pub const DEFAULT_BACKGROUND_COLOR: u32 = 0xFFEE_EEEE;

/// Fraction of the tile size beyond which label text is broken into lines.
pub const DEFAULT_MAX_TEXT_WIDTH_FACTOR: f32 = 0.7;
