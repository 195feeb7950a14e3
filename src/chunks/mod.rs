#![forbid(unsafe_code)]

//! Decompression of chunked 8-bit pixel data.
//!
//! ## The Payload Layout
//!
//! * 12 bytes of fixed header: `type`, `grid_width`, and `grid_height`, each a
//!   little-endian `u32`.
//! * `grid_width * grid_height` little-endian `u32` tile offsets, in row-major
//!   grid order. A nonzero offset is counted from the start of its own slot in
//!   this table. A zero offset means the tile has no data and is all index 0.
//! * The compressed tiles, wherever the offsets point.
//!
//! ## A Tile
//!
//! Each present tile starts with a 6 byte prologue: a chunk id, 3 bytes we
//! don't know the meaning of, the RLE marker byte, and the LZ marker byte. The
//! marker values are picked per tile. Compressed bytes follow, and decode into
//! a 64x64 buffer of palette indexes:
//!
//! * `rle, 0`: end of the current row.
//! * `rle, n` with `n` in `1..=0x7F`, then `v`: write `v`, `n` times.
//! * `rle, n` with `n` in `0x80..=0xFF`: skip `n & 0x7F` pixels, leaving them as
//!   they were.
//! * `lz, n, o_lo, o_hi`: copy `n` pixels from `o + 4` pixels back in the
//!   output. The copy goes one pixel at a time, so a source window that
//!   overlaps the pixels being written repeats the pattern.
//! * anything else: a literal index value.
//!
//! A tile is done when its 64th end-of-row has been seen. Anything after that
//! is ignored.

use alloc::{vec, vec::Vec};
use bytemuck::cast_slice;

use crate::{try_pull_byte_array, try_pull_slice, u32_le_at, ChunkFault, ImageryError};


/// Width of one tile, in pixels.
pub const TILE_WIDTH: usize = 64;

/// Height of one tile, in pixels.
pub const TILE_HEIGHT: usize = 64;

/// Size in bytes of a decoded tile.
pub const TILE_LEN: usize = TILE_WIDTH * TILE_HEIGHT;

/// Size of the fixed part of a [`ChunksHeader`].
pub const CHUNKS_HEADER_PREFIX_LEN: usize = 12;

const TILE_PROLOGUE_LEN: usize = 6;

/// The tile grid at the start of a compressed payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ChunksHeader {
  /// Format type word. Observed but never interpreted.
  pub kind: u32,
  /// Columns of tiles.
  pub grid_width: u32,
  /// Rows of tiles.
  pub grid_height: u32,
  /// One entry per tile, row-major.
  pub offsets: Vec<u32>,
}
impl ChunksHeader {
  /// Tries to get the chunks header and remaining bytes from the front of a
  /// compressed payload.
  ///
  /// ## Failure
  /// * Less than 12 bytes: [`ImageryError::InsufficientBytes`].
  /// * The offset table doesn't fit in the payload:
  ///   [`ImageryError::PixelDataIllegalLength`].
  pub fn try_from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), ImageryError> {
    let (prefix, rest) = try_pull_byte_array::<CHUNKS_HEADER_PREFIX_LEN>(bytes)?;
    let kind = u32_le_at(&prefix, 0);
    let grid_width = u32_le_at(&prefix, 4);
    let grid_height = u32_le_at(&prefix, 8);
    let tile_count = usize::try_from(
      grid_width.checked_mul(grid_height).ok_or(ImageryError::CheckedMath)?,
    )?;
    let table_len = tile_count.checked_mul(4).ok_or(ImageryError::CheckedMath)?;
    let (table, rest) = try_pull_slice(rest, table_len).map_err(|_| {
      ImageryError::PixelDataIllegalLength {
        required: CHUNKS_HEADER_PREFIX_LEN.saturating_add(table_len),
        available: bytes.len(),
      }
    })?;
    let mut offsets = Vec::new();
    offsets.try_reserve_exact(tile_count)?;
    offsets.extend(cast_slice::<u8, [u8; 4]>(table).iter().copied().map(u32::from_le_bytes));
    Ok((Self { kind, grid_width, grid_height, offsets }, rest))
  }

  /// Number of tiles in the grid.
  #[inline]
  #[must_use]
  pub fn tile_count(&self) -> usize {
    self.offsets.len()
  }

  /// Pixel width of the assembled bitmap.
  #[inline]
  #[must_use]
  pub fn effective_width(&self) -> Option<u32> {
    self.grid_width.checked_mul(TILE_WIDTH as u32)
  }

  /// Pixel height of the assembled bitmap.
  #[inline]
  #[must_use]
  pub fn effective_height(&self) -> Option<u32> {
    self.grid_height.checked_mul(TILE_HEIGHT as u32)
  }

  /// Where tile `i`'s data begins within the payload, or `None` for an empty
  /// tile (or an index past the grid).
  #[inline]
  #[must_use]
  pub fn tile_start(&self, i: usize) -> Option<usize> {
    let offset = usize::try_from(*self.offsets.get(i)?).ok()?;
    if offset == 0 {
      None
    } else {
      let slot = CHUNKS_HEADER_PREFIX_LEN.checked_add(i.checked_mul(4)?)?;
      slot.checked_add(offset)
    }
  }
}

/// One decoded 64x64 tile of palette indexes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chunk {
  /// Id byte from the tile prologue. Zero for empty tiles.
  pub chunk_id: u8,
  /// Marker that introduced run and skip instructions.
  pub rle_marker: u8,
  /// Marker that introduced back-reference instructions.
  pub lz_marker: u8,
  /// Exactly [`TILE_LEN`] indexes, row-major.
  pub indexes: Vec<u8>,
}
impl Chunk {
  /// A tile with no data: every index is 0.
  #[inline]
  #[must_use]
  pub fn empty() -> Self {
    Self { chunk_id: 0, rle_marker: 0, lz_marker: 0, indexes: vec![0; TILE_LEN] }
  }

  /// The 64 indexes of row `y` within the tile.
  #[inline]
  #[must_use]
  pub fn row(&self, y: usize) -> Option<&[u8]> {
    self.indexes.get(y * TILE_WIDTH..(y + 1) * TILE_WIDTH)
  }
}

/// A tile grid and all of its decoded tiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ChunkedBitmap {
  /// The grid description.
  pub header: ChunksHeader,
  /// One tile per grid cell, in the same order as `header.offsets`.
  pub chunks: Vec<Chunk>,
}

/// Decompresses every tile of a chunked payload.
///
/// Tiles don't depend on each other, only on the payload bytes.
///
/// ## Failure
/// * Header problems, see [`ChunksHeader::try_from_bytes`].
/// * Any tile failing is [`ImageryError::CorruptChunk`], with that tile's
///   index.
pub fn decompress_chunked(payload: &[u8]) -> Result<ChunkedBitmap, ImageryError> {
  let (header, _) = ChunksHeader::try_from_bytes(payload)?;
  decompress_tiles(header, payload)
}

/// Decompresses the tiles of an already parsed grid.
///
/// `payload` is the whole compressed payload, grid header included, since
/// tile offsets are counted from their slots in the header's table.
pub fn decompress_tiles(
  header: ChunksHeader, payload: &[u8],
) -> Result<ChunkedBitmap, ImageryError> {
  log::trace!(
    "tile grid {}x{} (type {}), {} tiles",
    header.grid_width,
    header.grid_height,
    header.kind,
    header.tile_count()
  );
  let mut chunks = Vec::new();
  chunks.try_reserve_exact(header.tile_count())?;
  for tile in 0..header.tile_count() {
    let chunk = match header.tile_start(tile) {
      None => {
        log::debug!("tile {tile} is empty");
        Chunk::empty()
      }
      Some(start) => {
        let tile_bytes = payload
          .get(start..)
          .ok_or(ImageryError::CorruptChunk { tile, fault: ChunkFault::TileOffsetOutOfRange })?;
        decode_tile(tile_bytes).map_err(|fault| ImageryError::CorruptChunk { tile, fault })?
      }
    };
    chunks.push(chunk);
  }
  Ok(ChunkedBitmap { header, chunks })
}

/// Decodes one tile, starting at its prologue.
///
/// Bytes past the tile's 64th end-of-row are not looked at.
pub fn decode_tile(tile: &[u8]) -> Result<Chunk, ChunkFault> {
  let (prologue, compressed) =
    try_pull_slice(tile, TILE_PROLOGUE_LEN).map_err(|_| ChunkFault::SourceExhausted)?;
  // prologue bytes 1..4 are unknown
  let chunk_id = prologue[0];
  let rle_marker = prologue[4];
  let lz_marker = prologue[5];
  let mut indexes = vec![0; TILE_LEN];
  decode_tile_body(compressed, rle_marker, lz_marker, &mut indexes)?;
  Ok(Chunk { chunk_id, rle_marker, lz_marker, indexes })
}

/// Pulls bytes off the compressed stream of a tile.
struct TileSource<'b> {
  bytes: &'b [u8],
  pos: usize,
}
impl TileSource<'_> {
  #[inline]
  fn byte(&mut self) -> Result<u8, ChunkFault> {
    let b = *self.bytes.get(self.pos).ok_or(ChunkFault::SourceExhausted)?;
    self.pos += 1;
    Ok(b)
  }

  #[inline]
  fn u16_le(&mut self) -> Result<u16, ChunkFault> {
    let lo = self.byte()?;
    let hi = self.byte()?;
    Ok(u16::from_le_bytes([lo, hi]))
  }
}

/// Runs the instruction stream of one tile into `out`.
///
/// `out` keeps whatever it held for pixels that get skipped.
pub(crate) fn decode_tile_body(
  compressed: &[u8], rle_marker: u8, lz_marker: u8, out: &mut [u8],
) -> Result<(), ChunkFault> {
  let mut src = TileSource { bytes: compressed, pos: 0 };
  let mut di: usize = 0;
  let mut row: usize = 0;
  while row < TILE_HEIGHT {
    let b = src.byte()?;
    if b == rle_marker {
      let count = src.byte()?;
      if count == 0 {
        // end of row. Short rows get padded out to the row boundary, long
        // rows are not rewound.
        row += 1;
        di = di.max(row * TILE_WIDTH);
      } else if count < 0x80 {
        let value = src.byte()?;
        let end = di + usize::from(count);
        out.get_mut(di..end).ok_or(ChunkFault::DestinationOverrun)?.fill(value);
        di = end;
      } else {
        di += usize::from(count & 0x7F);
        if di > out.len() {
          return Err(ChunkFault::DestinationOverrun);
        }
      }
    } else if b == lz_marker {
      let count = src.byte()?;
      let offset = src.u16_le()?;
      let mut from =
        di.checked_sub(usize::from(offset) + 4).ok_or(ChunkFault::BackReferenceOutOfRange)?;
      // one byte at a time: the window may overlap what this copy writes.
      for _ in 0..count {
        let value = *out.get(from).ok_or(ChunkFault::BackReferenceOutOfRange)?;
        *out.get_mut(di).ok_or(ChunkFault::DestinationOverrun)? = value;
        di += 1;
        from += 1;
      }
    } else {
      *out.get_mut(di).ok_or(ChunkFault::DestinationOverrun)? = b;
      di += 1;
    }
  }
  Ok(())
}
