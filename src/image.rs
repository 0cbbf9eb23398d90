//! Decoded image attachments
//!
//! This module wraps the `image` crate behind the small surface the
//! notification daemon needs: an 8-bit RGBA pixel buffer plus the geometry
//! fields of the `image-data` hint.

use std::path::Path;

use image::error::{ImageError, ParameterError, ParameterErrorKind};

use crate::debug_log;
use crate::error::Result;

/// An in-memory decoded image, ready to attach to a notification.
///
/// Pixels are always stored as tightly packed 8-bit RGBA, so the wire
/// rowstride is `width * 4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// Decode an image file into a bitmap.
    ///
    /// Any unreadable or undecodable input yields [`NotifyError::Decode`]
    /// (unreadable paths surface as decode errors too, matching
    /// `image::open`).
    ///
    /// [`NotifyError::Decode`]: crate::NotifyError::Decode
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug_log!("loading image from {}", path.display());

        let decoded = image::open(path)?.to_rgba8();
        let (width, height) = decoded.dimensions();
        Ok(Self {
            width,
            height,
            data: decoded.into_raw(),
        })
    }

    /// Build a bitmap from raw RGBA bytes.
    ///
    /// `data` must hold exactly `width * height * 4` bytes.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(ImageError::Parameter(ParameterError::from_kind(
                ParameterErrorKind::DimensionMismatch,
            ))
            .into());
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row on the wire
    pub fn rowstride(&self) -> u32 {
        self.width * 4
    }

    /// Channel count (always RGBA)
    pub fn channels(&self) -> u8 {
        4
    }

    pub fn has_alpha(&self) -> bool {
        true
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// True for a zero-pixel bitmap, which no daemon can render
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
