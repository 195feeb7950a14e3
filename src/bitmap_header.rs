#![forbid(unsafe_code)]

//! The fixed 72 byte header in front of every embedded bitmap.
//!
//! All fields are little-endian `u32` values, in this order:
//!
//! | offset | field |
//! |-------:|-------|
//! | 0 | width |
//! | 4 | height |
//! | 8 | registration point x |
//! | 12 | registration point y |
//! | 16 | flags, see [`BitmapFlags`] |
//! | 20 | drawing mode |
//! | 24 | key color |
//! | 28 | alias buffer size |
//! | 32 | alias buffer offset |
//! | 36 | alpha buffer size |
//! | 40 | alpha buffer offset |
//! | 44 | z-buffer size |
//! | 48 | z-buffer offset |
//! | 52 | normal buffer size |
//! | 56 | normal buffer offset |
//! | 60 | palette size |
//! | 64 | palette offset |
//! | 68 | pixel data size |
//!
//! The pixel data (`data_size` bytes) follows the header directly, and for
//! 8-bit bitmaps a 512 byte palette block follows the pixel data.

use crate::{put_u32_le_at, try_pull_byte_array, u32_le_at, BitmapFlags, ImageryError};

/// Size in bytes of a [`BitmapHeader`].
pub const BITMAP_HEADER_LEN: usize = 72;

/// Per-bitmap descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BitmapHeader {
  /// Width in pixels.
  ///
  /// For chunked bitmaps this is replaced by the tile grid's width once the
  /// pixels are decoded.
  pub width: u32,
  /// Height in pixels.
  ///
  /// For chunked bitmaps this is replaced by the tile grid's height once the
  /// pixels are decoded.
  pub height: u32,
  pub reg_point_x: u32,
  pub reg_point_y: u32,
  /// Raw flags word. Use [`flags`](Self::flags) for the decoded form.
  pub flags: u32,
  pub drawing_mode: u32,
  pub key_color: u32,
  pub alias_size: u32,
  pub alias_offset: u32,
  pub alpha_size: u32,
  pub alpha_offset: u32,
  pub zbuffer_size: u32,
  pub zbuffer_offset: u32,
  pub normal_size: u32,
  pub normal_offset: u32,
  /// Palette size in bytes.
  pub palette_size: u32,
  pub palette_offset: u32,
  /// Byte length of the pixel payload that follows this header.
  pub data_size: u32,
}
impl From<[u8; BITMAP_HEADER_LEN]> for BitmapHeader {
  #[inline]
  #[must_use]
  fn from(a: [u8; BITMAP_HEADER_LEN]) -> Self {
    Self {
      width: u32_le_at(&a, 0),
      height: u32_le_at(&a, 4),
      reg_point_x: u32_le_at(&a, 8),
      reg_point_y: u32_le_at(&a, 12),
      flags: u32_le_at(&a, 16),
      drawing_mode: u32_le_at(&a, 20),
      key_color: u32_le_at(&a, 24),
      alias_size: u32_le_at(&a, 28),
      alias_offset: u32_le_at(&a, 32),
      alpha_size: u32_le_at(&a, 36),
      alpha_offset: u32_le_at(&a, 40),
      zbuffer_size: u32_le_at(&a, 44),
      zbuffer_offset: u32_le_at(&a, 48),
      normal_size: u32_le_at(&a, 52),
      normal_offset: u32_le_at(&a, 56),
      palette_size: u32_le_at(&a, 60),
      palette_offset: u32_le_at(&a, 64),
      data_size: u32_le_at(&a, 68),
    }
  }
}
impl From<BitmapHeader> for [u8; BITMAP_HEADER_LEN] {
  #[inline]
  fn from(h: BitmapHeader) -> Self {
    let mut a = [0; BITMAP_HEADER_LEN];
    let fields = [
      h.width,
      h.height,
      h.reg_point_x,
      h.reg_point_y,
      h.flags,
      h.drawing_mode,
      h.key_color,
      h.alias_size,
      h.alias_offset,
      h.alpha_size,
      h.alpha_offset,
      h.zbuffer_size,
      h.zbuffer_offset,
      h.normal_size,
      h.normal_offset,
      h.palette_size,
      h.palette_offset,
      h.data_size,
    ];
    for (i, field) in fields.into_iter().enumerate() {
      put_u32_le_at(&mut a, i * 4, field);
    }
    a
  }
}
impl BitmapHeader {
  /// Tries to get the bitmap header and remaining bytes from the front of
  /// some bytes.
  ///
  /// The remaining bytes start with the pixel payload.
  #[inline]
  pub fn try_from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), ImageryError> {
    let (a, rest) = try_pull_byte_array::<BITMAP_HEADER_LEN>(bytes)?;
    Ok((Self::from(a), rest))
  }

  /// The decoded capability flags.
  #[inline]
  #[must_use]
  pub fn flags(&self) -> BitmapFlags {
    BitmapFlags::from(self.flags)
  }

  /// Length of the pixel payload as a `usize`.
  #[inline]
  pub fn payload_len(&self) -> Result<usize, ImageryError> {
    Ok(usize::try_from(self.data_size)?)
  }
}
