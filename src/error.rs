use core::{fmt, num::TryFromIntError};

/// An error from decoding one structure of an imagery container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ImageryError {
  /// Fewer bytes were available than a fixed-size structure requires.
  InsufficientBytes,

  /// The underlying reader failed for a reason other than running out of
  /// bytes.
  #[cfg(feature = "std")]
  #[cfg_attr(docs_rs, doc(cfg(feature = "std")))]
  Io(std::io::ErrorKind),

  /// A pixel used a palette index the palette doesn't have.
  PaletteIndexOutOfRange {
    /// The offending index value.
    index: u8,
    /// How many entries the palette actually has.
    palette_len: usize,
  },

  /// The declared sizes need more pixel data than the payload holds.
  PixelDataIllegalLength {
    /// Bytes the header's geometry requires.
    required: usize,
    /// Bytes that were actually available.
    available: usize,
  },

  /// The imagery block is non-empty but too short to hold its id and state
  /// count.
  ImageryHeaderTooShort,

  /// A compressed tile could not be decoded.
  CorruptChunk {
    /// Row-major index of the tile within its grid.
    tile: usize,
    /// What went wrong.
    fault: ChunkFault,
  },

  /// The image is too large.
  ///
  /// The limit is [`ReadOptions::max_dimension`](crate::ReadOptions), which
  /// guards against accidental out-of-memory problems with hostile files.
  DimensionsTooLarge,

  /// A checked math operation failed.
  CheckedMath,

  /// The allocator couldn't give us enough space.
  Alloc,
}

/// Ways that decoding a single 64x64 tile can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkFault {
  /// The compressed bytes ran out before 64 rows were finished.
  SourceExhausted,
  /// An instruction would write past the 4096 byte tile buffer.
  DestinationOverrun,
  /// A back-reference points before the start of the tile buffer.
  BackReferenceOutOfRange,
  /// The tile's offset points outside of the compressed payload.
  TileOffsetOutOfRange,
}

/// An error from reading a whole container.
///
/// Parsing stops at the first failure, so there's never a partial list of
/// bitmaps to go with one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerError {
  /// The container header, imagery block, or offset table was bad.
  Header(ImageryError),
  /// The bitmap at this offset table index was bad.
  Bitmap {
    /// Index into the offset table.
    index: usize,
    /// The underlying failure.
    error: ImageryError,
  },
}
impl ContainerError {
  /// The offset table index of the failing bitmap, if a bitmap failed.
  #[inline]
  #[must_use]
  pub const fn bitmap_index(&self) -> Option<usize> {
    match self {
      Self::Header(_) => None,
      Self::Bitmap { index, .. } => Some(*index),
    }
  }

  /// The underlying error, regardless of where it happened.
  #[inline]
  #[must_use]
  pub const fn error(&self) -> ImageryError {
    match self {
      Self::Header(error) | Self::Bitmap { error, .. } => *error,
    }
  }
}

impl From<alloc::collections::TryReserveError> for ImageryError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::Alloc
  }
}
impl From<TryFromIntError> for ImageryError {
  #[inline]
  fn from(_: TryFromIntError) -> Self {
    Self::CheckedMath
  }
}
#[cfg(feature = "std")]
impl From<std::io::Error> for ImageryError {
  #[inline]
  fn from(e: std::io::Error) -> Self {
    match e.kind() {
      std::io::ErrorKind::UnexpectedEof => Self::InsufficientBytes,
      kind => Self::Io(kind),
    }
  }
}
impl From<ImageryError> for ContainerError {
  #[inline]
  fn from(error: ImageryError) -> Self {
    Self::Header(error)
  }
}

impl fmt::Display for ChunkFault {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::SourceExhausted => "compressed bytes ran out before the tile was complete",
      Self::DestinationOverrun => "tile data overflows the 64x64 tile",
      Self::BackReferenceOutOfRange => "back-reference points before the start of the tile",
      Self::TileOffsetOutOfRange => "tile offset points outside the payload",
    })
  }
}
impl fmt::Display for ImageryError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::InsufficientBytes => f.write_str("not enough bytes for the structure"),
      #[cfg(feature = "std")]
      Self::Io(kind) => write!(f, "read failed: {kind}"),
      Self::PaletteIndexOutOfRange { index, palette_len } => {
        write!(f, "palette index {index} out of range for a {palette_len} entry palette")
      }
      Self::PixelDataIllegalLength { required, available } => {
        write!(f, "pixel data needs {required} bytes but only {available} are present")
      }
      Self::ImageryHeaderTooShort => f.write_str("imagery header block is too short"),
      Self::CorruptChunk { tile, fault } => write!(f, "corrupt tile {tile}: {fault}"),
      Self::DimensionsTooLarge => f.write_str("image dimensions are too large"),
      Self::CheckedMath => f.write_str("size arithmetic overflowed"),
      Self::Alloc => f.write_str("allocation failed"),
    }
  }
}
impl fmt::Display for ContainerError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Header(error) => write!(f, "container header: {error}"),
      Self::Bitmap { index, error } => write!(f, "bitmap {index}: {error}"),
    }
  }
}

#[cfg(feature = "std")]
impl std::error::Error for ImageryError {}
#[cfg(feature = "std")]
impl std::error::Error for ContainerError {}
