#![forbid(unsafe_code)]

//! Where container bytes come from.

use alloc::vec::Vec;

use crate::ImageryError;

/// A readable, seekable byte source.
///
/// Positions are absolute byte offsets from the start of the container.
pub trait ByteSource {
  /// Fills all of `buf`, or fails.
  ///
  /// Running out of bytes is [`ImageryError::InsufficientBytes`].
  fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<(), ImageryError>;

  /// The current position.
  fn position(&mut self) -> Result<u64, ImageryError>;

  /// Moves to an absolute position. Moving past the end is allowed, the next
  /// read will fail.
  fn seek_to(&mut self, position: u64) -> Result<(), ImageryError>;

  /// Bytes left after the current position, if the source can tell.
  fn remaining(&mut self) -> Option<u64> {
    None
  }

  /// Reads a fixed size array.
  #[inline]
  fn pull_array<const N: usize>(&mut self) -> Result<[u8; N], ImageryError>
  where
    Self: Sized,
  {
    let mut a = [0_u8; N];
    self.read_exact_into(&mut a)?;
    Ok(a)
  }

  /// Reads `len` bytes into a new vec.
  ///
  /// When the source knows its length, a `len` past the end fails before
  /// anything is allocated.
  fn pull_vec(&mut self, len: usize) -> Result<Vec<u8>, ImageryError>
  where
    Self: Sized,
  {
    if let Some(remaining) = self.remaining() {
      if u64::try_from(len)? > remaining {
        return Err(ImageryError::InsufficientBytes);
      }
    }
    let mut v = Vec::new();
    v.try_reserve_exact(len)?;
    v.resize(len, 0);
    self.read_exact_into(&mut v)?;
    Ok(v)
  }
}

/// A [`ByteSource`] over bytes already in memory.
#[derive(Debug, Clone, Copy)]
pub struct SliceSource<'b> {
  bytes: &'b [u8],
  pos: u64,
}
impl<'b> SliceSource<'b> {
  /// Starts at position 0.
  #[inline]
  #[must_use]
  pub const fn new(bytes: &'b [u8]) -> Self {
    Self { bytes, pos: 0 }
  }

  #[inline]
  fn rest(&self) -> &'b [u8] {
    usize::try_from(self.pos).ok().and_then(|p| self.bytes.get(p..)).unwrap_or(&[])
  }
}
impl ByteSource for SliceSource<'_> {
  #[inline]
  fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<(), ImageryError> {
    let src = self.rest().get(..buf.len()).ok_or(ImageryError::InsufficientBytes)?;
    buf.copy_from_slice(src);
    self.pos += buf.len() as u64;
    Ok(())
  }

  #[inline]
  fn position(&mut self) -> Result<u64, ImageryError> {
    Ok(self.pos)
  }

  #[inline]
  fn seek_to(&mut self, position: u64) -> Result<(), ImageryError> {
    self.pos = position;
    Ok(())
  }

  #[inline]
  fn remaining(&mut self) -> Option<u64> {
    Some(self.rest().len() as u64)
  }
}

/// A [`ByteSource`] over any `Read + Seek` value, such as a `File` or a
/// `Cursor`.
#[cfg(feature = "std")]
#[cfg_attr(docs_rs, doc(cfg(feature = "std")))]
#[derive(Debug)]
pub struct IoSource<R>(pub R);

#[cfg(feature = "std")]
impl<R: std::io::Read + std::io::Seek> ByteSource for IoSource<R> {
  #[inline]
  fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<(), ImageryError> {
    Ok(self.0.read_exact(buf)?)
  }

  #[inline]
  fn position(&mut self) -> Result<u64, ImageryError> {
    Ok(self.0.stream_position()?)
  }

  #[inline]
  fn seek_to(&mut self, position: u64) -> Result<(), ImageryError> {
    self.0.seek(std::io::SeekFrom::Start(position))?;
    Ok(())
  }

  fn remaining(&mut self) -> Option<u64> {
    let here = self.0.stream_position().ok()?;
    let end = self.0.seek(std::io::SeekFrom::End(0)).ok()?;
    self.0.seek(std::io::SeekFrom::Start(here)).ok()?;
    Some(end.saturating_sub(here))
  }
}
