//! Backend-agnostic graphics factory contract.
//!
//! Rendering backends (desktop, mobile, headless test harnesses) implement
//! [`GraphicFactory`] to hand out bitmap, canvas, paint, path and matrix
//! handles. The handles themselves are opaque to this crate; only their
//! creation surface is specified here. [`headless`] provides the stub used
//! when no real graphics backend is available.

pub mod headless;

use std::io::Read;

use crate::Result;

/// Named colors understood by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Blue,
    Green,
    Red,
    Transparent,
    White,
}

impl Color {
    /// The packed ARGB value of this color.
    pub fn argb(self) -> u32 {
        match self {
            Color::Black => 0xFF00_0000,
            Color::Blue => 0xFF00_00FF,
            Color::Green => 0xFF00_FF00,
            Color::Red => 0xFFFF_0000,
            Color::Transparent => 0x0000_0000,
            Color::White => 0xFFFF_FFFF,
        }
    }
}

/// Packs alpha, red, green and blue channels into a single ARGB integer.
pub fn argb(alpha: u8, red: u8, green: u8, blue: u8) -> u32 {
    (alpha as u32) << 24 | (red as u32) << 16 | (green as u32) << 8 | blue as u32
}

/// Operations a [`GraphicFactory`] may or may not implement.
///
/// Factories that deliberately leave operations unimplemented (test stubs)
/// report them here so callers can query support before invoking; invoking an
/// unsupported operation still fails hard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphicCapability {
    BitmapFromStream,
    BitmapSized,
    Canvas,
    NamedColor,
    ColorChannels,
    ColorString,
    Matrix,
    Paint,
    Path,
}

/// Decoded raster image handle.
pub trait Bitmap: Send {}

/// Drawing surface handle.
pub trait Canvas: Send {}

/// 2D transformation matrix handle.
pub trait Matrix: Send {}

/// Stroke/fill style handle.
pub trait Paint: Send {}

/// Vector path handle.
pub trait Path: Send {}

/// Factory for backend-specific graphics primitives.
pub trait GraphicFactory: Send + Sync {
    /// Decodes a bitmap from a byte stream.
    fn create_bitmap_from_stream(&self, stream: &mut dyn Read) -> Result<Box<dyn Bitmap>>;

    /// Creates an empty bitmap of the given pixel dimensions.
    fn create_bitmap(&self, width: u32, height: u32) -> Result<Box<dyn Bitmap>>;

    fn create_canvas(&self) -> Result<Box<dyn Canvas>>;

    /// Resolves a named color to the backend's packed integer form.
    fn create_color(&self, color: Color) -> u32;

    /// Packs explicit channel values into the backend's integer form.
    fn create_color_argb(&self, alpha: u8, red: u8, green: u8, blue: u8) -> u32;

    /// Parses a color string (e.g. `#RRGGBB`) into the backend's integer
    /// form.
    fn create_color_from_str(&self, color: &str) -> Result<u32>;

    fn create_matrix(&self) -> Result<Box<dyn Matrix>>;

    fn create_paint(&self) -> Result<Box<dyn Paint>>;

    fn create_path(&self) -> Result<Box<dyn Path>>;

    /// Whether this factory actually implements the given operation.
    fn supports(&self, capability: GraphicCapability) -> bool;
}
