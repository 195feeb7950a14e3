use std::io::Cursor;

use imagery::{
  i2d_get_header, i2d_read_container, i2d_try_container, rgb555_to_rgba, BitmapFlags,
  BitmapHeader, ContainerError, ImageryError, ReadOptions,
};
use walkdir::WalkDir;

use super::{bitmap_bytes, container_bytes, container_with_offsets, rand_bytes, u32s};

const WHITE: u16 = 0x7FFF;
const RED: u16 = 0x7C00;
const BLUE: u16 = 0x001F;

fn paletted_header(width: u32, height: u32, palette_size: u32) -> BitmapHeader {
  BitmapHeader {
    width,
    height,
    flags: (BitmapFlags::BITS_8 | BitmapFlags::PALETTE).bits(),
    palette_size,
    ..BitmapHeader::default()
  }
}

fn direct15_header(width: u32, height: u32) -> BitmapHeader {
  BitmapHeader { width, height, flags: BitmapFlags::BITS_15.bits(), ..BitmapHeader::default() }
}

fn two_pixel_container() -> Vec<u8> {
  let b = bitmap_bytes(paletted_header(2, 1, 512), &[0, 1], Some(&[RED, BLUE]));
  container_bytes(&[], &[b])
}

#[test]
fn test_palette_colors() {
  let black = rgb555_to_rgba(0x0000);
  assert_eq!([black.r, black.g, black.b, black.a], [0, 0, 0, 255]);
  let white = rgb555_to_rgba(WHITE);
  assert_eq!([white.r, white.g, white.b, white.a], [248, 248, 248, 255]);
  let red = rgb555_to_rgba(RED);
  assert_eq!([red.r, red.g, red.b, red.a], [248, 0, 0, 255]);
  // the top bit doesn't matter
  let also_red = rgb555_to_rgba(RED | 0x8000);
  assert_eq!([also_red.r, also_red.g, also_red.b, also_red.a], [248, 0, 0, 255]);
}

#[test]
fn test_flat_paletted_bitmap() {
  let container = i2d_try_container(&two_pixel_container(), ReadOptions::default()).unwrap();
  assert_eq!(container.bitmaps.len(), 1);
  let bitmap = &container.bitmaps[0];
  assert_eq!((bitmap.width, bitmap.height), (2, 1));
  assert_eq!(bitmap.to_rgba_bytes(), vec![248, 0, 0, 255, 0, 0, 248, 255]);
  assert_eq!(bitmap.palette.len(), 256);
  assert!(container.imagery.is_none());
}

#[test]
fn test_direct15_bitmap() {
  let payload = u32s(&[u32::from(WHITE) | (0x8000 << 16)]);
  let b = bitmap_bytes(direct15_header(1, 2), &payload, None);
  let container = i2d_try_container(&container_bytes(&[], &[b]), ReadOptions::default()).unwrap();
  let bitmap = &container.bitmaps[0];
  assert_eq!((bitmap.width, bitmap.height), (1, 2));
  // alpha always ends up 0
  assert_eq!(bitmap.to_rgba_bytes(), vec![248, 248, 248, 0, 0, 0, 0, 0]);
  assert!(bitmap.palette.is_empty());
}

#[test]
fn test_chunked_bitmap_takes_grid_size() {
  let rle = 0xFE;
  let lz = 0xFD;
  // grid 2x1, tile 0 empty, tile 1 right after the table: 12 + 4 + 4 = 20
  let mut payload = u32s(&[0, 2, 1, 0, 4]);
  payload.extend([1, 0, 0, 0, rle, lz, rle, 3, 1]);
  payload.extend([rle, 0].repeat(64));
  let header = BitmapHeader {
    width: 5,
    height: 5,
    flags: (BitmapFlags::BITS_8 | BitmapFlags::COMPRESSED | BitmapFlags::CHUNKED).bits(),
    ..BitmapHeader::default()
  };
  let b = bitmap_bytes(header, &payload, Some(&[0x0000, WHITE]));
  let container = i2d_try_container(&container_bytes(&[], &[b]), ReadOptions::default()).unwrap();
  let bitmap = &container.bitmaps[0];
  assert_eq!((bitmap.width, bitmap.height), (128, 64));
  assert_eq!((bitmap.header.width, bitmap.header.height), (128, 64));
  assert_eq!(bitmap.pixels.len(), 128 * 64);
  let px = |x, y| {
    let p = bitmap.get(x, y).unwrap();
    [p.r, p.g, p.b, p.a]
  };
  assert_eq!(px(0, 0), [0, 0, 0, 255]);
  assert_eq!(px(63, 63), [0, 0, 0, 255]);
  assert_eq!(px(64, 0), [248, 248, 248, 255]);
  assert_eq!(px(66, 0), [248, 248, 248, 255]);
  assert_eq!(px(67, 0), [0, 0, 0, 255]);
  assert_eq!(px(64, 1), [0, 0, 0, 255]);
  assert!(bitmap.get(128, 0).is_none());
}

#[test]
fn test_offsets_count_from_the_end_of_the_table() {
  let first = bitmap_bytes(paletted_header(1, 1, 0), &[1], Some(&[RED, BLUE]));
  let second = bitmap_bytes(direct15_header(1, 1), &WHITE.to_le_bytes(), None);
  // stored backwards: table entry 0 points past entry 1's bytes
  let mut body = second.clone();
  body.extend_from_slice(&first);
  let imagery_block = [u32s(&[7, 2]), vec![9, 9, 9, 9]].concat();
  let bytes = container_with_offsets(&imagery_block, &[second.len() as u32, 0], &body);

  let container = i2d_try_container(&bytes, ReadOptions::default()).unwrap();
  assert_eq!(container.offsets, vec![second.len() as u32, 0]);
  assert_eq!(container.bitmaps[0].to_rgba_bytes(), vec![0, 0, 248, 255]);
  assert_eq!(container.bitmaps[1].to_rgba_bytes(), vec![248, 248, 248, 0]);
  let imagery = container.imagery.unwrap();
  assert_eq!(imagery.imagery_id, 7);
  assert_eq!(imagery.state_count, 2);
  assert_eq!(imagery.unparsed_states, vec![9, 9, 9, 9]);
}

#[test]
fn test_headers_only_skips_pixel_data() {
  let header = BitmapHeader { data_size: 1000, ..paletted_header(10, 100, 0) };
  // the declared payload and palette are missing entirely
  let bytes = container_bytes(&[], &[bitmap_bytes(header, &[], None)]);

  let container = i2d_try_container(&bytes, ReadOptions::headers_only()).unwrap();
  let bitmap = &container.bitmaps[0];
  assert!(bitmap.is_empty());
  assert_eq!((bitmap.width, bitmap.height), (0, 0));
  assert_eq!(bitmap.header, header);

  let err = i2d_try_container(&bytes, ReadOptions::default()).unwrap_err();
  assert_eq!(err, ContainerError::Bitmap { index: 0, error: ImageryError::InsufficientBytes });
}

#[test]
fn test_short_reads() {
  let bytes = two_pixel_container();
  let err = i2d_try_container(&bytes[..10], ReadOptions::default()).unwrap_err();
  assert_eq!(err, ContainerError::Header(ImageryError::InsufficientBytes));
  assert_eq!(err.bitmap_index(), None);

  // the offset table is cut short
  let err = i2d_try_container(&bytes[..22], ReadOptions::default()).unwrap_err();
  assert_eq!(err.bitmap_index(), None);

  // the palette block is cut short
  let err = i2d_try_container(&bytes[..bytes.len() - 1], ReadOptions::default()).unwrap_err();
  assert_eq!(err.bitmap_index(), Some(0));
  assert_eq!(err.error(), ImageryError::InsufficientBytes);
}

#[test]
fn test_second_bitmap_failure_reports_its_index() {
  let good = bitmap_bytes(direct15_header(1, 1), &[0, 0], None);
  let bad = bitmap_bytes(BitmapHeader { data_size: 2, ..direct15_header(2, 2) }, &[0, 0], None);
  let bytes = container_bytes(&[], &[good, bad]);
  let err = i2d_try_container(&bytes, ReadOptions::default()).unwrap_err();
  assert_eq!(
    err,
    ContainerError::Bitmap {
      index: 1,
      error: ImageryError::PixelDataIllegalLength { required: 8, available: 2 }
    }
  );
}

#[test]
fn test_palette_index_out_of_range() {
  // palette_size 4 is two entries
  let b = bitmap_bytes(paletted_header(2, 1, 4), &[1, 5], Some(&[RED, BLUE, WHITE]));
  let err = i2d_try_container(&container_bytes(&[], &[b]), ReadOptions::default()).unwrap_err();
  assert_eq!(
    err,
    ContainerError::Bitmap {
      index: 0,
      error: ImageryError::PaletteIndexOutOfRange { index: 5, palette_len: 2 }
    }
  );
}

#[test]
fn test_dimension_limit() {
  let options = ReadOptions { max_dimension: 1, ..ReadOptions::default() };
  let err = i2d_try_container(&two_pixel_container(), options).unwrap_err();
  assert_eq!(err.error(), ImageryError::DimensionsTooLarge);
}

#[test]
fn test_no_bitmap_flag_gives_empty_bitmap() {
  let header = BitmapHeader {
    flags: (BitmapFlags::BITS_15 | BitmapFlags::NO_BITMAP).bits(),
    ..direct15_header(4, 4)
  };
  let bytes = container_bytes(&[], &[bitmap_bytes(header, &[], None)]);
  let container = i2d_try_container(&bytes, ReadOptions::default()).unwrap();
  assert!(container.bitmaps[0].is_empty());
  assert_eq!(container.bitmaps[0].header.width, 4);
  assert!(container.bitmaps[0].flags().no_bitmap());
}

#[test]
fn test_decoding_is_repeatable() {
  let bytes = two_pixel_container();
  let a = i2d_try_container(&bytes, ReadOptions::default()).unwrap();
  let b = i2d_try_container(&bytes, ReadOptions::default()).unwrap();
  assert_eq!(a.header, b.header);
  assert_eq!(a.bitmaps[0].to_rgba_bytes(), b.bitmaps[0].to_rgba_bytes());
}

#[test]
fn test_reading_from_io() {
  let bytes = two_pixel_container();
  let mut cursor = Cursor::new(bytes.clone());
  let from_io = i2d_read_container(&mut cursor, ReadOptions::default()).unwrap();
  let from_slice = i2d_try_container(&bytes, ReadOptions::default()).unwrap();
  assert_eq!(from_io.header, from_slice.header);
  assert_eq!(from_io.bitmaps[0].to_rgba_bytes(), from_slice.bitmaps[0].to_rgba_bytes());

  let err = i2d_read_container(Cursor::new(&bytes[..30]), ReadOptions::default()).unwrap_err();
  assert_eq!(err.error(), ImageryError::InsufficientBytes);
}

#[test]
fn test_distinct_flags_keep_first_seen_order() {
  let a = bitmap_bytes(direct15_header(1, 1), &[0, 0], None);
  let b = bitmap_bytes(paletted_header(1, 1, 0), &[0], Some(&[]));
  let bytes = container_bytes(&[], &[a.clone(), b, a]);
  let container = i2d_try_container(&bytes, ReadOptions::default()).unwrap();
  assert_eq!(
    container.distinct_flags(),
    vec![BitmapFlags::BITS_15, BitmapFlags::BITS_8 | BitmapFlags::PALETTE]
  );
}

#[test]
fn test_flags_predicates() {
  let flags = BitmapFlags::from(0x0001 | 0x4000 | 0x8000 | 0x2000);
  assert!(flags.is_8bit());
  assert!(flags.is_compressed());
  assert!(flags.is_chunked());
  assert!(!flags.is_15bit());
  assert!(!flags.has_palette());
  assert_eq!(flags.unknown_bits(), 0x2000);
  assert_eq!(u32::from(flags), 0xE001);
}

#[test]
fn test_get_header() {
  let bytes = two_pixel_container();
  let header = i2d_get_header(&bytes).unwrap();
  assert_eq!(header.bitmap_count, 1);
  assert_eq!(format!("{:?}", header.magic), "\"BM8\\x00\"");
  assert!(i2d_get_header(&bytes[..19]).is_none());
}

#[test]
fn test_i2d_random_bytes_do_not_panic() {
  for _ in 0..50 {
    let v = rand_bytes(1024);
    let _ = i2d_try_container(&v, ReadOptions::default());
  }
  // a believable header in front of random data gets further along
  for _ in 0..50 {
    let mut v = two_pixel_container()[..24].to_vec();
    v.extend(rand_bytes(2048));
    let _ = i2d_try_container(&v, ReadOptions::default());
  }
}

#[test]
fn test_i2d_files_do_not_panic() {
  // any sample files dropped into the test folder shouldn't panic the reader.
  for entry in WalkDir::new("tests/").into_iter().filter_map(|e| e.ok()) {
    let is_container = entry
      .path()
      .extension()
      .and_then(|ext| ext.to_str())
      .map_or(false, |ext| ext.eq_ignore_ascii_case("i2d") || ext.eq_ignore_ascii_case("dat"));
    if !is_container {
      continue;
    }
    println!("{}", entry.path().display());
    let v = match std::fs::read(entry.path()) {
      Ok(v) => v,
      Err(e) => {
        println!("Error reading file: {e:?}");
        continue;
      }
    };
    let _ = i2d_try_container(&v, ReadOptions::default());
    let _ = i2d_try_container(&v, ReadOptions::headers_only());
  }
}

#[test]
fn test_flat_black_and_white() {
  let b = bitmap_bytes(paletted_header(2, 1, 512), &[0, 1], Some(&[0x0000, WHITE]));
  let container = i2d_try_container(&container_bytes(&[], &[b]), ReadOptions::default()).unwrap();
  assert_eq!(container.bitmaps[0].to_rgba_bytes(), vec![0, 0, 0, 255, 248, 248, 248, 255]);
  assert_eq!(container.bitmaps[0].pixels.len(), 2);
}

#[test]
fn test_imagery_block_too_short() {
  let b = bitmap_bytes(direct15_header(1, 1), &[0, 0], None);
  let bytes = container_bytes(&[1, 2, 3], &[b]);
  let err = i2d_try_container(&bytes, ReadOptions::default()).unwrap_err();
  assert_eq!(err, ContainerError::Header(ImageryError::ImageryHeaderTooShort));
}
