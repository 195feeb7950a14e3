#![forbid(unsafe_code)]

//! The decoded bitmap type.

use alloc::vec::Vec;
use pixel_formats::r8g8b8a8_Srgb;

use crate::{BitmapFlags, BitmapHeader, Palette};

/// Converts an `(x,y)` position within a given `width` 2D space into a linear
/// index.
#[inline]
#[must_use]
pub const fn xy_width_to_index(x: u32, y: u32, width: u32) -> usize {
  y.wrapping_mul(width).wrapping_add(x) as usize
}

/// One bitmap out of a container.
///
/// `pixels` is row-major RGBA and always holds exactly `width * height`
/// entries. Bitmaps without renderable pixel data (and all bitmaps read in
/// headers-only mode) are 0x0 with no pixels, but keep their full header.
#[derive(Debug, Clone, Default)]
pub struct Bitmap {
  /// Width of `pixels`.
  pub width: u32,
  /// Height of `pixels`.
  pub height: u32,
  /// The bitmap's header. For chunked bitmaps, `width` and `height` here are
  /// the decoded grid size rather than what the file declared.
  pub header: BitmapHeader,
  /// Empty unless the bitmap is 8-bit.
  pub palette: Palette,
  /// The decoded pixels.
  pub pixels: Vec<r8g8b8a8_Srgb>,
}
impl Bitmap {
  /// A bitmap with a header but no pixels.
  #[inline]
  #[must_use]
  pub fn empty(header: BitmapHeader) -> Self {
    Self { width: 0, height: 0, header, palette: Palette::default(), pixels: Vec::new() }
  }

  /// Shorthand for `self.header.flags()`.
  #[inline]
  #[must_use]
  pub fn flags(&self) -> BitmapFlags {
    self.header.flags()
  }

  /// If there are no pixels.
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.pixels.is_empty()
  }

  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get(&self, x: u32, y: u32) -> Option<r8g8b8a8_Srgb> {
    if x < self.width && y < self.height {
      self.pixels.get(xy_width_to_index(x, y, self.width)).copied()
    } else {
      None
    }
  }

  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut r8g8b8a8_Srgb> {
    if x < self.width && y < self.height {
      let i = xy_width_to_index(x, y, self.width);
      self.pixels.get_mut(i)
    } else {
      None
    }
  }

  /// The pixels as tightly packed `[r, g, b, a]` bytes, ready for a texture
  /// upload.
  #[must_use]
  pub fn to_rgba_bytes(&self) -> Vec<u8> {
    self.pixels.iter().flat_map(|p| [p.r, p.g, p.b, p.a]).collect()
  }
}
