//! # tiff-blocks
//!
//! Block-level decoder for TIFF-family images whose pixel data is
//! stored as a grid of independently compressed blocks (strips or
//! tiles), each described by directory metadata.
//!
//! This crate deliberately sits below container parsing: it does not
//! read TIFF headers or walk IFD chains. An external parser fills a
//! [`Directory`] with typed tag values, and this crate turns block
//! coordinates plus a seekable byte stream into pixels.
//!
//! ## Features
//!
//! - **Codecs**: raw, PackBits, LZW (TIFF variant), zlib deflate,
//!   CCITT Group 3/4 fax, and baseline JPEG with shared-table
//!   reconstruction
//! - **Geometry**: strip and tile grids, edge clipping, offset/count
//!   array validation
//! - **Predictor**: horizontal differencing reversal at 8- and 16-bit
//!   depths
//! - **Unpacking**: bilevel, gray, paletted, RGB/RGBA/NRGBA, CMYK and
//!   YCbCr-via-JPEG destinations, honoring bit depth, byte order, and
//!   inversion
//!
//! ## Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`dir`] - tag directory access with explicit presence and defaults
//! - [`geometry`] - block grid shape, bounds, and byte ranges
//! - [`codec`] - per-compression-scheme block decoding
//! - [`predictor`] - horizontal differencing reversal
//! - [`pixel`] - destination buffers and pixel unpacking
//! - [`block`] - the per-block pipeline tying the stages together
//!
//! ## Example
//!
//! ```rust
//! use tiff_blocks::{decode_image, ByteOrder, Directory, PixelBuffer, TagValue, TiffTag};
//! use std::io::Cursor;
//!
//! // Tag values normally come from an IFD parser.
//! let dir = Directory::new(ByteOrder::LittleEndian)
//!     .with(TiffTag::ImageWidth, TagValue::Ints(vec![2]))
//!     .with(TiffTag::ImageLength, TagValue::Ints(vec![2]))
//!     .with(TiffTag::PhotometricInterpretation, TagValue::Ints(vec![1]))
//!     .with(TiffTag::BitsPerSample, TagValue::Ints(vec![8]))
//!     .with(TiffTag::StripOffsets, TagValue::Ints(vec![0]))
//!     .with(TiffTag::StripByteCounts, TagValue::Ints(vec![4]));
//!
//! let mut stream = Cursor::new(vec![10u8, 20, 30, 40]);
//! let buffer = decode_image(&dir, &mut stream).unwrap();
//! assert!(matches!(buffer, PixelBuffer::Gray8 { .. }));
//! ```

pub mod bits;
pub mod block;
pub mod codec;
pub mod dir;
pub mod error;
pub mod geometry;
pub mod order;
pub mod pixel;
pub mod predictor;
pub mod tags;

// Re-export commonly used types
pub use bits::BitReader;
pub use block::{decode_block, decode_image};
pub use codec::{merge_jpeg_tables, DecodedBlock};
pub use dir::{Directory, TagValue};
pub use error::{Result, TiffError};
pub use geometry::BlockRect;
pub use order::ByteOrder;
pub use pixel::{unpack_block, PixelBuffer, PixelFormat, SubsampleRatio};
pub use tags::{CompressionType, Photometric, PredictorType, TiffTag};
