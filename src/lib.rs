#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
//#![warn(missing_docs)]

//! A crate for decoding the bitmap containers (`.i2d` and `.dat` files) of an
//! old game engine.
//!
//! A container holds a header, an optional imagery (animation) block, an
//! offset table, and then any number of bitmaps. Bitmaps come in 15-bit direct
//! color, flat 8-bit paletted, or 8-bit paletted data compressed into 64x64
//! tiles. All of them decode to row-major RGBA pixels.
//!
//! ```no_run
//! # fn main() -> Result<(), imagery::ContainerError> {
//! let bytes: &[u8] = &[];
//! let container = imagery::i2d_try_container(bytes, imagery::ReadOptions::default())?;
//! for bitmap in &container.bitmaps {
//!   let _rgba: Vec<u8> = bitmap.to_rgba_bytes();
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//! * `std` (default): [`i2d_read_container`] and [`IoSource`], for reading
//!   straight from files. Without it the crate is `no_std` + `alloc`.
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade and never
//! prints anything itself.

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

pub use pixel_formats::r8g8b8a8_Srgb;

mod parser_helpers;
pub(crate) use parser_helpers::*;

pub mod error;
pub use error::*;

pub mod palette;
pub use palette::*;

pub mod flags;
pub use flags::*;

pub mod bitmap_header;
pub use bitmap_header::*;

pub mod chunks;
pub use chunks::*;

pub mod bitmap;
pub use bitmap::*;

pub mod render;
pub use render::*;

pub mod imagery;
pub use imagery::*;

pub mod source;
pub use source::*;

pub mod container;
pub use container::*;
