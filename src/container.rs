#![forbid(unsafe_code)]

//! Reading whole containers (`.i2d` and `.dat` files).
//!
//! ## Parsing The Format
//!
//! Note: All multi-byte values are little-endian.
//!
//! * A container always starts with a 20 byte [`ContainerHeader`].
//! * If the header's `header_size` is nonzero, that many bytes of
//!   [`ImageryHeader`] follow.
//! * Next is the offset table, one `u32` per bitmap (`bitmap_count` of them).
//! * Every offset is counted from the position right after the **whole**
//!   table. They aren't cumulative, and they don't have to be in order.
//! * At each offset there's a 72 byte [`BitmapHeader`], then `data_size` bytes
//!   of pixel payload, then (for 8-bit bitmaps only) a 512 byte palette block.
//!
//! The magic bytes are read but not checked. File extensions aren't checked
//! either, that's up to the caller.

use alloc::vec::Vec;
use bytemuck::cast_slice;
use core::fmt;

use crate::{
  decode_bitmap, put_u16_le_at, put_u32_le_at, try_pull_byte_array, u16_le_at, u32_le_at, Bitmap,
  BitmapFlags, BitmapHeader, ByteSource, ContainerError, ImageryError, ImageryHeader, Palette,
  PixelFormat, SliceSource, BITMAP_HEADER_LEN, PALETTE_BLOCK_LEN,
};

/// Size in bytes of a [`ContainerHeader`].
pub const CONTAINER_HEADER_LEN: usize = 20;

/// Default for [`ReadOptions::max_dimension`].
pub const DEFAULT_MAX_DIMENSION: u32 = 17_000;

/// The four magic bytes at the start of a container.
///
/// `Debug` and `Display` show the bytes as (escaped) ascii.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Magic(pub [u8; 4]);
impl fmt::Display for Magic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for ch in self.0.iter().copied().flat_map(core::ascii::escape_default) {
      fmt::Write::write_char(f, ch as char)?;
    }
    Ok(())
  }
}
impl fmt::Debug for Magic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "\"{self}\"")
  }
}
impl From<[u8; 4]> for Magic {
  #[inline]
  fn from(array: [u8; 4]) -> Self {
    Self(array)
  }
}

/// The header at the start of every container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ContainerHeader {
  /// Not validated.
  pub magic: Magic,
  /// Entries in the offset table.
  pub bitmap_count: u16,
  /// Compression type. Observed but never interpreted.
  pub comp_type: u8,
  pub version: u8,
  pub data_size: u32,
  pub obj_size: u32,
  /// Size of the imagery block, 0 if there isn't one.
  pub header_size: u32,
}
impl From<[u8; CONTAINER_HEADER_LEN]> for ContainerHeader {
  #[inline]
  #[must_use]
  fn from(a: [u8; CONTAINER_HEADER_LEN]) -> Self {
    Self {
      magic: Magic([a[0], a[1], a[2], a[3]]),
      bitmap_count: u16_le_at(&a, 4),
      comp_type: a[6],
      version: a[7],
      data_size: u32_le_at(&a, 8),
      obj_size: u32_le_at(&a, 12),
      header_size: u32_le_at(&a, 16),
    }
  }
}
impl From<ContainerHeader> for [u8; CONTAINER_HEADER_LEN] {
  #[inline]
  fn from(h: ContainerHeader) -> Self {
    let mut a = [0; CONTAINER_HEADER_LEN];
    a[0..4].copy_from_slice(h.magic.0.as_slice());
    put_u16_le_at(&mut a, 4, h.bitmap_count);
    a[6] = h.comp_type;
    a[7] = h.version;
    put_u32_le_at(&mut a, 8, h.data_size);
    put_u32_le_at(&mut a, 12, h.obj_size);
    put_u32_le_at(&mut a, 16, h.header_size);
    a
  }
}
impl ContainerHeader {
  /// Tries to get the container header and remaining bytes from the bytes of
  /// a container.
  #[inline]
  pub fn try_from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), ImageryError> {
    let (a, rest) = try_pull_byte_array::<CONTAINER_HEADER_LEN>(bytes)?;
    Ok((Self::from(a), rest))
  }
}

/// Settings for reading a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReadOptions {
  /// Only read headers: every bitmap comes back empty, and no pixel or
  /// palette bytes are touched. Useful for quickly inspecting many files.
  pub headers_only: bool,
  /// Largest width or height a bitmap may decode to.
  pub max_dimension: u32,
}
impl Default for ReadOptions {
  #[inline]
  fn default() -> Self {
    Self { headers_only: false, max_dimension: DEFAULT_MAX_DIMENSION }
  }
}
impl ReadOptions {
  /// The default options, but headers only.
  #[inline]
  #[must_use]
  pub fn headers_only() -> Self {
    Self { headers_only: true, ..Self::default() }
  }
}

/// Everything read out of one container.
#[derive(Debug, Clone, Default)]
pub struct Container {
  pub header: ContainerHeader,
  /// Present when `header.header_size` is nonzero.
  pub imagery: Option<ImageryHeader>,
  /// The raw offset table.
  pub offsets: Vec<u32>,
  /// One bitmap per offset, in table order.
  pub bitmaps: Vec<Bitmap>,
}
impl Container {
  /// Each distinct flags word used by the bitmaps, in first-seen order.
  #[must_use]
  pub fn distinct_flags(&self) -> Vec<BitmapFlags> {
    let mut out: Vec<BitmapFlags> = Vec::new();
    for flags in self.bitmaps.iter().map(Bitmap::flags) {
      if !out.contains(&flags) {
        out.push(flags);
      }
    }
    out
  }
}

/// Reads a container out of any [`ByteSource`].
#[derive(Debug)]
pub struct ContainerReader<S> {
  source: S,
  options: ReadOptions,
}
impl<S: ByteSource> ContainerReader<S> {
  /// The source should be positioned at the container's first byte.
  #[inline]
  #[must_use]
  pub const fn new(source: S, options: ReadOptions) -> Self {
    Self { source, options }
  }

  /// Reads the whole container.
  ///
  /// ## Failure
  /// * Problems before the first bitmap are [`ContainerError::Header`].
  /// * The first bitmap that fails stops everything, and is reported as
  ///   [`ContainerError::Bitmap`] with its offset table index.
  pub fn read(mut self) -> Result<Container, ContainerError> {
    let header = ContainerHeader::from(self.source.pull_array::<CONTAINER_HEADER_LEN>()?);
    log::trace!(
      "container {:?} v{}: {} bitmaps, imagery block {} bytes",
      header.magic,
      header.version,
      header.bitmap_count,
      header.header_size
    );
    let imagery = if header.header_size > 0 {
      let len = usize::try_from(header.header_size).map_err(ImageryError::from)?;
      let block = self.source.pull_vec(len)?;
      Some(ImageryHeader::try_from_block(&block)?)
    } else {
      None
    };
    let offsets = self.read_offset_table(header.bitmap_count)?;
    let after_table = self.source.position()?;
    log::trace!("offset table ends at {after_table}: {offsets:?}");

    let mut bitmaps = Vec::new();
    bitmaps.try_reserve_exact(offsets.len()).map_err(ImageryError::from)?;
    for (index, offset) in offsets.iter().copied().enumerate() {
      let bitmap = self
        .read_bitmap_at(after_table, offset)
        .map_err(|error| ContainerError::Bitmap { index, error })?;
      bitmaps.push(bitmap);
    }
    Ok(Container { header, imagery, offsets, bitmaps })
  }

  fn read_offset_table(&mut self, count: u16) -> Result<Vec<u32>, ImageryError> {
    let table = self.source.pull_vec(usize::from(count) * 4)?;
    Ok(cast_slice::<u8, [u8; 4]>(&table).iter().copied().map(u32::from_le_bytes).collect())
  }

  fn read_bitmap_at(&mut self, after_table: u64, offset: u32) -> Result<Bitmap, ImageryError> {
    let start = after_table.checked_add(u64::from(offset)).ok_or(ImageryError::CheckedMath)?;
    self.source.seek_to(start)?;
    let header = BitmapHeader::from(self.source.pull_array::<BITMAP_HEADER_LEN>()?);
    if self.options.headers_only {
      return Ok(Bitmap::empty(header));
    }
    let format = PixelFormat::from_flags(header.flags());
    if format == PixelFormat::NoPixels {
      log::debug!("bitmap at {start} has no renderable pixels (flags {:#06x})", header.flags);
      return Ok(Bitmap::empty(header));
    }
    let payload = self.source.pull_vec(header.payload_len()?)?;
    let palette = if format.needs_palette() {
      let block = self.source.pull_array::<PALETTE_BLOCK_LEN>()?;
      Some(Palette::from_block(&block).with_declared_size(header.palette_size))
    } else {
      None
    };
    decode_bitmap(header, &payload, palette, self.options.max_dimension)
  }
}

/// Reads a container that's entirely in memory.
#[inline]
pub fn i2d_try_container(bytes: &[u8], options: ReadOptions) -> Result<Container, ContainerError> {
  ContainerReader::new(SliceSource::new(bytes), options).read()
}

/// Reads a container from a file or other seekable reader.
///
/// The reader should be positioned at the container's first byte. Pass
/// `&mut reader` to keep using it afterwards.
#[cfg(feature = "std")]
#[cfg_attr(docs_rs, doc(cfg(feature = "std")))]
#[inline]
pub fn i2d_read_container<R>(reader: R, options: ReadOptions) -> Result<Container, ContainerError>
where
  R: std::io::Read + std::io::Seek,
{
  ContainerReader::new(crate::IoSource(reader), options).read()
}

/// Gets just the container header, if there are enough bytes for one.
#[inline]
#[must_use]
pub fn i2d_get_header(bytes: &[u8]) -> Option<ContainerHeader> {
  ContainerHeader::try_from_bytes(bytes).ok().map(|(h, _)| h)
}
