//! Inert graphics factory for environments without a real backend.
//!
//! Only the operations that headless tests actually exercise are
//! implemented: decoding a bitmap from a stream (the bytes are discarded)
//! and creating a paint, plus the named-color mapping, which returns enum
//! ordinals. The channel and string color forms return a constant
//! placeholder rather than a real pack and are not reported as supported.
//! Every other operation fails with [`DisplayError::Unsupported`], which
//! guards against accidentally running stub-only code against unimplemented
//! capabilities.

use std::io::Read;

use crate::graphics::{
    Bitmap, Canvas, Color, GraphicCapability, GraphicFactory, Matrix, Paint, Path,
};
use crate::{DisplayError, Result};

#[derive(Debug, Default)]
pub struct HeadlessGraphicFactory;

impl HeadlessGraphicFactory {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug)]
struct HeadlessBitmap;

impl Bitmap for HeadlessBitmap {}

#[derive(Debug)]
struct HeadlessPaint;

impl Paint for HeadlessPaint {}

impl GraphicFactory for HeadlessGraphicFactory {
    fn create_bitmap_from_stream(&self, stream: &mut dyn Read) -> Result<Box<dyn Bitmap>> {
        // The handle only needs to exist; the stream is never decoded.
        let _ = stream;
        Ok(Box::new(HeadlessBitmap))
    }

    fn create_bitmap(&self, _width: u32, _height: u32) -> Result<Box<dyn Bitmap>> {
        Err(DisplayError::Unsupported("create_bitmap"))
    }

    fn create_canvas(&self) -> Result<Box<dyn Canvas>> {
        Err(DisplayError::Unsupported("create_canvas"))
    }

    fn create_color(&self, color: Color) -> u32 {
        color as u32
    }

    fn create_color_argb(&self, _alpha: u8, _red: u8, _green: u8, _blue: u8) -> u32 {
        0
    }

    fn create_color_from_str(&self, _color: &str) -> Result<u32> {
        Ok(0)
    }

    fn create_matrix(&self) -> Result<Box<dyn Matrix>> {
        Err(DisplayError::Unsupported("create_matrix"))
    }

    fn create_paint(&self) -> Result<Box<dyn Paint>> {
        Ok(Box::new(HeadlessPaint))
    }

    fn create_path(&self) -> Result<Box<dyn Path>> {
        Err(DisplayError::Unsupported("create_path"))
    }

    fn supports(&self, capability: GraphicCapability) -> bool {
        matches!(
            capability,
            GraphicCapability::BitmapFromStream
                | GraphicCapability::NamedColor
                | GraphicCapability::Paint
        )
    }
}
