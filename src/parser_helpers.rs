#![forbid(unsafe_code)]

//! Just has shorthands for the little-endian field pulls the headers do.

use crate::ImageryError;

#[inline]
#[must_use]
pub(crate) fn u16_le_at(bytes: &[u8], at: usize) -> u16 {
  u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

#[inline]
#[must_use]
pub(crate) fn u32_le_at(bytes: &[u8], at: usize) -> u32 {
  u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

#[inline]
pub(crate) fn put_u16_le_at(bytes: &mut [u8], at: usize, value: u16) {
  bytes[at..at + 2].copy_from_slice(value.to_le_bytes().as_slice());
}

#[inline]
pub(crate) fn put_u32_le_at(bytes: &mut [u8], at: usize, value: u32) {
  bytes[at..at + 4].copy_from_slice(value.to_le_bytes().as_slice());
}

/// Splits a fixed size array off the front of the bytes.
#[inline]
pub(crate) fn try_pull_byte_array<const N: usize>(
  bytes: &[u8],
) -> Result<([u8; N], &[u8]), ImageryError> {
  if bytes.len() >= N {
    let (head, tail) = bytes.split_at(N);
    let mut a = [0_u8; N];
    a.copy_from_slice(head);
    Ok((a, tail))
  } else {
    Err(ImageryError::InsufficientBytes)
  }
}

/// Splits `len` bytes off the front of the bytes.
#[inline]
pub(crate) fn try_pull_slice(bytes: &[u8], len: usize) -> Result<(&[u8], &[u8]), ImageryError> {
  if bytes.len() >= len {
    Ok(bytes.split_at(len))
  } else {
    Err(ImageryError::InsufficientBytes)
  }
}

/// `width * height` as a `usize`, or an error if that can't be represented.
#[inline]
pub(crate) fn checked_pixel_count(width: u32, height: u32) -> Result<usize, ImageryError> {
  let count = width.checked_mul(height).ok_or(ImageryError::CheckedMath)?;
  Ok(usize::try_from(count)?)
}
