#![forbid(unsafe_code)]

//! The capability bitmask stored in every bitmap header.
//!
//! Only the 8-bit and 15-bit pixel formats are ever rendered. The other depth
//! bits and the auxiliary buffer bits (z-buffer, normals, alias, alpha) are
//! reported but otherwise ignored.

bitflags::bitflags! {
  /// Decoded `flags` word of a [`BitmapHeader`](crate::BitmapHeader).
  ///
  /// Bits that don't have a name here are kept, see
  /// [`unknown_bits`](Self::unknown_bits).
  #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
  pub struct BitmapFlags: u32 {
    /// Pixel data is 8-bit palette indexes.
    const BITS_8 = 0x0001;
    /// Pixel data is 15-bit direct color.
    const BITS_15 = 0x0002;
    /// Pixel data is 16-bit direct color.
    const BITS_16 = 0x0004;
    /// Pixel data is 24-bit direct color.
    const BITS_24 = 0x0008;
    /// Pixel data is 32-bit direct color.
    const BITS_32 = 0x0010;
    /// Has a z-buffer.
    const ZBUFFER = 0x0020;
    /// Has a normal buffer.
    const NORMALS = 0x0040;
    /// Has an alias buffer.
    const ALIAS = 0x0080;
    /// Has an alpha buffer.
    const ALPHA = 0x0100;
    /// Has a 256 color palette.
    const PALETTE = 0x0200;
    /// Has a registration point.
    const REG_POINT = 0x0400;
    /// Has no pixel data at all.
    const NO_BITMAP = 0x0800;
    /// Palette channels are 5 bits instead of 8.
    const PALETTE_5BIT = 0x1000;
    /// Pixel data is compressed.
    const COMPRESSED = 0x4000;
    /// Pixel data is split into 64x64 tiles.
    const CHUNKED = 0x8000;
  }
}

impl Default for BitmapFlags {
  #[inline]
  fn default() -> Self {
    Self::empty()
  }
}
impl From<u32> for BitmapFlags {
  #[inline]
  fn from(word: u32) -> Self {
    Self::from_bits_retain(word)
  }
}
impl From<BitmapFlags> for u32 {
  #[inline]
  fn from(flags: BitmapFlags) -> Self {
    flags.bits()
  }
}

impl BitmapFlags {
  /// Any set bits that aren't one of the named flags.
  #[inline]
  #[must_use]
  pub fn unknown_bits(self) -> u32 {
    self.bits() & !Self::all().bits()
  }

  #[inline]
  #[must_use]
  pub fn is_8bit(self) -> bool {
    self.contains(Self::BITS_8)
  }
  #[inline]
  #[must_use]
  pub fn is_15bit(self) -> bool {
    self.contains(Self::BITS_15)
  }
  #[inline]
  #[must_use]
  pub fn is_16bit(self) -> bool {
    self.contains(Self::BITS_16)
  }
  #[inline]
  #[must_use]
  pub fn is_24bit(self) -> bool {
    self.contains(Self::BITS_24)
  }
  #[inline]
  #[must_use]
  pub fn is_32bit(self) -> bool {
    self.contains(Self::BITS_32)
  }
  #[inline]
  #[must_use]
  pub fn has_zbuffer(self) -> bool {
    self.contains(Self::ZBUFFER)
  }
  #[inline]
  #[must_use]
  pub fn has_normals(self) -> bool {
    self.contains(Self::NORMALS)
  }
  #[inline]
  #[must_use]
  pub fn has_alias(self) -> bool {
    self.contains(Self::ALIAS)
  }
  #[inline]
  #[must_use]
  pub fn has_alpha(self) -> bool {
    self.contains(Self::ALPHA)
  }
  #[inline]
  #[must_use]
  pub fn has_palette(self) -> bool {
    self.contains(Self::PALETTE)
  }
  #[inline]
  #[must_use]
  pub fn has_reg_point(self) -> bool {
    self.contains(Self::REG_POINT)
  }
  #[inline]
  #[must_use]
  pub fn no_bitmap(self) -> bool {
    self.contains(Self::NO_BITMAP)
  }
  #[inline]
  #[must_use]
  pub fn is_5bit_palette(self) -> bool {
    self.contains(Self::PALETTE_5BIT)
  }
  #[inline]
  #[must_use]
  pub fn is_compressed(self) -> bool {
    self.contains(Self::COMPRESSED)
  }
  #[inline]
  #[must_use]
  pub fn is_chunked(self) -> bool {
    self.contains(Self::CHUNKED)
  }
}
