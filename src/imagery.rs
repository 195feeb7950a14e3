#![forbid(unsafe_code)]

//! The optional imagery (animation) block after the container header.

use alloc::vec::Vec;

use crate::{try_pull_slice, u32_le_at, ImageryError};

/// The animation metadata block.
///
/// Only the id and the state count have a known layout. The per-state records
/// that follow are kept as raw bytes and not interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ImageryHeader {
  /// Id of this imagery.
  pub imagery_id: u32,
  /// How many animation states the block declares.
  pub state_count: u32,
  /// Everything after the first 8 bytes of the block.
  pub unparsed_states: Vec<u8>,
}
impl ImageryHeader {
  /// Parses a whole imagery block (exactly `header_size` bytes).
  ///
  /// ## Failure
  /// * Less than 8 bytes: [`ImageryError::ImageryHeaderTooShort`].
  pub fn try_from_block(block: &[u8]) -> Result<Self, ImageryError> {
    if block.len() < 8 {
      return Err(ImageryError::ImageryHeaderTooShort);
    }
    let mut unparsed_states = Vec::new();
    unparsed_states.try_reserve_exact(block.len() - 8)?;
    unparsed_states.extend_from_slice(&block[8..]);
    Ok(Self { imagery_id: u32_le_at(block, 0), state_count: u32_le_at(block, 4), unparsed_states })
  }

  /// Tries to get an imagery header of `header_size` bytes and the remaining
  /// bytes from the front of some bytes.
  #[inline]
  pub fn try_from_bytes(bytes: &[u8], header_size: u32) -> Result<(Self, &[u8]), ImageryError> {
    let (block, rest) = try_pull_slice(bytes, usize::try_from(header_size)?)?;
    Ok((Self::try_from_block(block)?, rest))
  }
}
