#![forbid(unsafe_code)]

//! Turns a bitmap's payload into RGBA pixels.
//!
//! Exactly one of three renderers runs for a bitmap, picked from its flags:
//!
//! * 15-bit direct color: two bytes per pixel.
//! * 8-bit flat: one palette index per pixel.
//! * 8-bit chunked: palette indexes in compressed 64x64 tiles.
//!
//! Everything else (16/24/32-bit, or no pixel data at all) gives an empty
//! bitmap. That's not an error.

use alloc::vec::Vec;
use bytemuck::cast_slice;
use pixel_formats::r8g8b8a8_Srgb;

use crate::{
  checked_pixel_count, decompress_tiles, Bitmap, BitmapFlags, BitmapHeader, ChunkedBitmap,
  ChunksHeader, ImageryError, Palette, TILE_HEIGHT, TILE_WIDTH,
};

/// Which renderer a bitmap's flags select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PixelFormat {
  /// 15-bit direct color.
  Direct15,
  /// Uncompressed 8-bit palette indexes.
  Paletted8,
  /// Tiled, compressed 8-bit palette indexes.
  Chunked8,
  /// Nothing that gets rendered.
  NoPixels,
}
impl PixelFormat {
  /// Picks the format for some flags.
  ///
  /// `NO_BITMAP` wins over everything. After that 15-bit is checked before
  /// 8-bit, and an 8-bit bitmap is chunked whenever it's compressed.
  #[inline]
  #[must_use]
  pub fn from_flags(flags: BitmapFlags) -> Self {
    if flags.no_bitmap() {
      Self::NoPixels
    } else if flags.is_15bit() {
      Self::Direct15
    } else if flags.is_8bit() {
      if flags.is_compressed() {
        Self::Chunked8
      } else {
        Self::Paletted8
      }
    } else {
      Self::NoPixels
    }
  }

  /// If a palette block follows the payload.
  #[inline]
  #[must_use]
  pub const fn needs_palette(self) -> bool {
    matches!(self, Self::Paletted8 | Self::Chunked8)
  }
}

/// Converts one 15-bit direct color pixel.
///
/// Alpha is the top bit truncated into a `u8`, which always leaves 0. Files
/// rely on exactly that, so it isn't "fixed" here.
#[inline]
#[must_use]
pub const fn direct15_to_rgba(p: u16) -> r8g8b8a8_Srgb {
  r8g8b8a8_Srgb {
    r: (((p & 0b0111_1100_0000_0000) >> 10) as u8) << 3,
    g: (((p & 0b0000_0011_1110_0000) >> 5) as u8) << 3,
    b: ((p & 0b0000_0000_0001_1111) as u8) << 3,
    a: (p & 0b1000_0000_0000_0000) as u8,
  }
}

fn check_dimensions(width: u32, height: u32, max_dimension: u32) -> Result<(), ImageryError> {
  if width > max_dimension || height > max_dimension {
    Err(ImageryError::DimensionsTooLarge)
  } else {
    Ok(())
  }
}

fn check_payload(data: &[u8], required: usize) -> Result<&[u8], ImageryError> {
  data
    .get(..required)
    .ok_or(ImageryError::PixelDataIllegalLength { required, available: data.len() })
}

/// Renders 15-bit direct color pixel data.
///
/// Rows are `width * 2` bytes with no padding.
pub fn render_direct15(
  width: u32, height: u32, data: &[u8],
) -> Result<Vec<r8g8b8a8_Srgb>, ImageryError> {
  let pixel_count = checked_pixel_count(width, height)?;
  let required = pixel_count.checked_mul(2).ok_or(ImageryError::CheckedMath)?;
  let data = check_payload(data, required)?;
  let mut pixels = Vec::new();
  pixels.try_reserve_exact(pixel_count)?;
  pixels.extend(
    cast_slice::<u8, [u8; 2]>(data)
      .iter()
      .copied()
      .map(|d| direct15_to_rgba(u16::from_le_bytes(d))),
  );
  Ok(pixels)
}

/// Renders uncompressed 8-bit palette index data.
///
/// Rows are `width` bytes with no padding.
pub fn render_paletted8(
  width: u32, height: u32, data: &[u8], palette: &Palette,
) -> Result<Vec<r8g8b8a8_Srgb>, ImageryError> {
  let pixel_count = checked_pixel_count(width, height)?;
  let data = check_payload(data, pixel_count)?;
  let mut pixels = Vec::new();
  pixels.try_reserve_exact(pixel_count)?;
  for index in data.iter().copied() {
    pixels.push(palette.lookup(index)?);
  }
  Ok(pixels)
}

/// Lays decoded tiles out on their grid and expands them through the palette.
///
/// Returns the grid's pixel width and height along with the pixels.
pub fn render_chunked8(
  chunked: &ChunkedBitmap, palette: &Palette,
) -> Result<(u32, u32, Vec<r8g8b8a8_Srgb>), ImageryError> {
  let header = &chunked.header;
  let width = header.effective_width().ok_or(ImageryError::CheckedMath)?;
  let height = header.effective_height().ok_or(ImageryError::CheckedMath)?;
  let pixel_count = checked_pixel_count(width, height)?;
  let row_len = width as usize;
  let grid_width = header.grid_width as usize;

  let mut pixels = Vec::new();
  pixels.try_reserve_exact(pixel_count)?;
  pixels.resize(pixel_count, r8g8b8a8_Srgb::default());
  for (i, chunk) in chunked.chunks.iter().enumerate() {
    let x_origin = (i % grid_width) * TILE_WIDTH;
    let y_origin = (i / grid_width) * TILE_HEIGHT;
    for (y, tile_row) in chunk.indexes.chunks_exact(TILE_WIDTH).enumerate() {
      let start = (y_origin + y) * row_len + x_origin;
      let out_row = pixels.get_mut(start..start + TILE_WIDTH).ok_or(
        ImageryError::PixelDataIllegalLength { required: start + TILE_WIDTH, available: pixel_count },
      )?;
      for (out, index) in out_row.iter_mut().zip(tile_row.iter().copied()) {
        *out = palette.lookup(index)?;
      }
    }
  }
  Ok((width, height, pixels))
}

/// Decodes one bitmap's pixels.
///
/// * `payload` is the `data_size` bytes that follow the header.
/// * `palette` is required for the 8-bit formats and ignored otherwise.
/// * Width or height past `max_dimension` is
///   [`ImageryError::DimensionsTooLarge`].
///
/// For chunked bitmaps the header's width and height are replaced with the
/// grid's dimensions.
pub fn decode_bitmap(
  mut header: BitmapHeader, payload: &[u8], palette: Option<Palette>, max_dimension: u32,
) -> Result<Bitmap, ImageryError> {
  let format = PixelFormat::from_flags(header.flags());
  log::debug!(
    "bitmap {}x{} flags {:#06x}: {format:?}",
    header.width,
    header.height,
    header.flags
  );
  match format {
    PixelFormat::NoPixels => Ok(Bitmap::empty(header)),
    PixelFormat::Direct15 => {
      check_dimensions(header.width, header.height, max_dimension)?;
      let pixels = render_direct15(header.width, header.height, payload)?;
      let (width, height) = (header.width, header.height);
      Ok(Bitmap { width, height, header, palette: Palette::default(), pixels })
    }
    PixelFormat::Paletted8 => {
      check_dimensions(header.width, header.height, max_dimension)?;
      let palette = palette.ok_or(ImageryError::InsufficientBytes)?;
      let pixels = render_paletted8(header.width, header.height, payload, &palette)?;
      let (width, height) = (header.width, header.height);
      Ok(Bitmap { width, height, header, palette, pixels })
    }
    PixelFormat::Chunked8 => {
      let palette = palette.ok_or(ImageryError::InsufficientBytes)?;
      // size check before any tile gets allocated
      let (grid, _) = ChunksHeader::try_from_bytes(payload)?;
      let width = grid.effective_width().ok_or(ImageryError::DimensionsTooLarge)?;
      let height = grid.effective_height().ok_or(ImageryError::DimensionsTooLarge)?;
      check_dimensions(width, height, max_dimension)?;
      let chunked = decompress_tiles(grid, payload)?;
      let (width, height, pixels) = render_chunked8(&chunked, &palette)?;
      header.width = width;
      header.height = height;
      Ok(Bitmap { width, height, header, palette, pixels })
    }
  }
}
