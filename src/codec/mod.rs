//! Block compression codecs.
//!
//! Each strip or tile of a TIFF image is an independently compressed
//! byte range. This module dispatches on the directory's compression
//! tag and decodes exactly one block from a length-limited reader.
//!
//! Most codecs produce raw sample bytes which then flow through
//! predictor reversal and pixel unpacking. JPEG is the exception: it
//! yields a fully decoded image that is blitted onto the destination
//! directly, so the result type is a tagged union of the two shapes.
//!
//! Codec families:
//! - `packbits` - byte-oriented run-length decoding
//! - `lzw` - TIFF-variant LZW (MSB-first, early code-size switch)
//! - `deflate` - zlib-wrapped deflate (both the Adobe and legacy tags)
//! - `fax` - CCITT Group 3/4 two-dimensional fax decoding
//! - `jpeg` - baseline JPEG with shared-table reconstruction

mod deflate;
mod fax;
mod jpeg;
mod lzw;
mod packbits;

pub use jpeg::merge_jpeg_tables;

use std::io::Read;

use image::DynamicImage;

use crate::dir::Directory;
use crate::error::{Result, TiffError};
use crate::tags::CompressionType;

// =============================================================================
// DecodedBlock
// =============================================================================

/// Output of decoding one compressed block.
#[derive(Debug)]
pub enum DecodedBlock {
    /// Raw sample bytes, still subject to predictor reversal and pixel
    /// unpacking
    Raw(Vec<u8>),
    /// A fully decoded image (JPEG path), blitted onto the destination
    /// as-is
    Image(DynamicImage),
}

impl DecodedBlock {
    /// The raw sample bytes, if this block decoded to bytes.
    pub fn as_raw(&self) -> Option<&[u8]> {
        match self {
            DecodedBlock::Raw(data) => Some(data),
            DecodedBlock::Image(_) => None,
        }
    }
}

// =============================================================================
// Dispatch
// =============================================================================

impl CompressionType {
    /// Decode one block's compressed bytes.
    ///
    /// `reader` must be limited to exactly the block's compressed byte
    /// count, positioned at its start. `width` and `height` are the
    /// block's pixel bounds (needed by the fax decoder); `dir` supplies
    /// shared directory state (needed by JPEG for its table blob).
    ///
    /// # Errors
    ///
    /// `Ccitt` (the 1D scheme), `JpegOld`, and any tag value outside
    /// the closed enumeration fail with `UnsupportedCompression`,
    /// never a silent empty result.
    pub fn decode<R: Read>(
        self,
        reader: &mut R,
        width: u32,
        height: u32,
        dir: &Directory,
    ) -> Result<DecodedBlock> {
        match self {
            CompressionType::None => {
                let mut data = Vec::new();
                reader.read_to_end(&mut data)?;
                Ok(DecodedBlock::Raw(data))
            }
            CompressionType::G3 | CompressionType::G4 => {
                fax::decode(reader, width, height).map(DecodedBlock::Raw)
            }
            CompressionType::Lzw => lzw::decode(reader).map(DecodedBlock::Raw),
            CompressionType::Jpeg => jpeg::decode(reader, dir).map(DecodedBlock::Image),
            CompressionType::Deflate | CompressionType::DeflateOld => {
                deflate::decode(reader).map(DecodedBlock::Raw)
            }
            CompressionType::PackBits => packbits::decode(reader).map(DecodedBlock::Raw),
            CompressionType::Ccitt | CompressionType::JpegOld => Err(
                TiffError::UnsupportedCompression(self.name().to_string()),
            ),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
