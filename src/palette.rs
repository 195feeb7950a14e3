#![forbid(unsafe_code)]

//! The 256 entry, 15-bit color palette that follows paletted pixel data.
//!
//! A palette block is always 512 bytes: 256 little-endian `u16` values, each
//! a packed `x_rrrrr_ggggg_bbbbb` color. The top bit is unused.

use alloc::vec::Vec;
use bytemuck::cast_slice;
use pixel_formats::r8g8b8a8_Srgb;

use crate::{try_pull_byte_array, ImageryError};

/// Size in bytes of a palette block.
pub const PALETTE_BLOCK_LEN: usize = 512;

/// Entries in a full palette block.
pub const PALETTE_MAX_ENTRIES: usize = PALETTE_BLOCK_LEN / 2;

/// Expands a packed 5-5-5 color into an opaque RGBA value.
///
/// Each channel is scaled by 8, so full intensity is 248 rather than 255.
#[inline]
#[must_use]
pub const fn rgb555_to_rgba(c: u16) -> r8g8b8a8_Srgb {
  r8g8b8a8_Srgb {
    r: ((c >> 10) & 0x1F) as u8 * 8,
    g: ((c >> 5) & 0x1F) as u8 * 8,
    b: (c & 0x1F) as u8 * 8,
    a: 0xFF,
  }
}

/// How many palette entries a bitmap header's `palette_size` declares.
///
/// The size is in bytes, two per entry. A size of zero (or anything past a
/// full block) means the whole 256 entry block is in use.
#[inline]
#[must_use]
pub const fn declared_palette_len(palette_size: u32) -> usize {
  let entries = (palette_size / 2) as usize;
  if entries == 0 || entries > PALETTE_MAX_ENTRIES {
    PALETTE_MAX_ENTRIES
  } else {
    entries
  }
}

/// An ordered list of RGBA colors, looked up by palette index.
#[derive(Debug, Clone, Default)]
pub struct Palette {
  entries: Vec<r8g8b8a8_Srgb>,
}
impl Palette {
  /// Expands a full 512 byte palette block into 256 entries.
  #[inline]
  #[must_use]
  pub fn from_block(block: &[u8; PALETTE_BLOCK_LEN]) -> Self {
    let entries = cast_slice::<u8, [u8; 2]>(block.as_slice())
      .iter()
      .copied()
      .map(|c| rgb555_to_rgba(u16::from_le_bytes(c)))
      .collect();
    Self { entries }
  }

  /// Tries to get a palette and the remaining bytes from the front of some
  /// bytes.
  #[inline]
  pub fn try_from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), ImageryError> {
    let (block, rest) = try_pull_byte_array::<PALETTE_BLOCK_LEN>(bytes)?;
    Ok((Self::from_block(&block), rest))
  }

  /// Cuts the palette down to the entry count a header declares.
  #[inline]
  #[must_use]
  pub fn with_declared_size(mut self, palette_size: u32) -> Self {
    self.entries.truncate(declared_palette_len(palette_size));
    self
  }

  /// All entries, in index order.
  #[inline]
  #[must_use]
  pub fn entries(&self) -> &[r8g8b8a8_Srgb] {
    &self.entries
  }

  /// Number of entries.
  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// If the palette has no entries at all.
  ///
  /// Bitmaps that aren't 8-bit carry an empty palette.
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// The color for an index, if the palette is long enough.
  #[inline]
  #[must_use]
  pub fn get(&self, index: u8) -> Option<r8g8b8a8_Srgb> {
    self.entries.get(usize::from(index)).copied()
  }

  #[inline]
  pub(crate) fn lookup(&self, index: u8) -> Result<r8g8b8a8_Srgb, ImageryError> {
    self
      .get(index)
      .ok_or(ImageryError::PaletteIndexOutOfRange { index, palette_len: self.entries.len() })
  }
}
