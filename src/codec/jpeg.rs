//! Baseline JPEG decoding with shared-table reconstruction.
//!
//! JPEG-compressed TIFF blocks are frequently "abbreviated" streams:
//! the quantization (DQT) and Huffman (DHT) tables are stored once in
//! the directory's JPEGTables blob instead of being repeated in every
//! block. Before such a block can be decoded, the two pieces must be
//! spliced into one standalone stream:
//!
//! 1. The tables blob starts with SOI (FFD8) and ends with EOI (FFD9)
//! 2. The block data also starts with SOI and ends with EOI
//! 3. Merge: tables without their trailing EOI, then block data without
//!    its leading SOI
//!
//! Framing violations on either input are format errors, not a
//! best-effort merge. The decode always yields a full image (raw
//! sample bytes never leave this codec), so the block pipeline blits
//! the result directly and skips the predictor/unpack stages.

use std::io::{Cursor, Read};

use bytes::{Bytes, BytesMut};
use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::debug;

use crate::dir::Directory;
use crate::error::{Result, TiffError};

/// Start Of Image marker
pub const SOI: [u8; 2] = [0xFF, 0xD8];

/// End Of Image marker
pub const EOI: [u8; 2] = [0xFF, 0xD9];

/// Decode one JPEG-compressed block into an image.
///
/// When the directory carries a usable JPEGTables blob (longer than the
/// 4 bytes a bare SOI/EOI pair occupies), it is merged with the block
/// data first; otherwise the block is decoded as a standalone JPEG.
pub fn decode<R: Read>(reader: &mut R, dir: &Directory) -> Result<DynamicImage> {
    let mut block = Vec::new();
    reader.read_to_end(&mut block)?;

    let stream = match dir.jpeg_tables() {
        Some(tables) if tables.len() > 4 => merge_jpeg_tables(tables, &block)?,
        _ => {
            debug!(len = block.len(), "decoding block as standalone JPEG");
            Bytes::from(block)
        }
    };

    ImageReader::with_format(Cursor::new(stream), ImageFormat::Jpeg)
        .decode()
        .map_err(|e| TiffError::JpegDecodeFailure {
            message: e.to_string(),
        })
}

/// Merge a shared JPEGTables blob with one block's abbreviated stream.
///
/// Both inputs must be SOI/EOI framed. The result keeps the tables'
/// leading SOI and the block's trailing EOI:
/// `SOI + table segments + block segments + EOI`.
pub fn merge_jpeg_tables(tables: &[u8], block: &[u8]) -> Result<Bytes> {
    if tables.len() < 2 || tables[0..2] != SOI {
        return Err(TiffError::MalformedJpegTables {
            reason: "jpeg tables do not begin with SOI marker",
        });
    }
    if tables[tables.len() - 2..] != EOI {
        return Err(TiffError::MalformedJpegTables {
            reason: "jpeg tables do not end with EOI marker",
        });
    }
    if block.len() < 4 || block[0..2] != SOI {
        return Err(TiffError::MalformedJpegTables {
            reason: "image data does not begin with SOI marker",
        });
    }
    if block[block.len() - 2..] != EOI {
        return Err(TiffError::MalformedJpegTables {
            reason: "image data does not end with EOI marker",
        });
    }

    let mut merged = BytesMut::with_capacity(tables.len() + block.len() - 4);
    // Tables without their trailing EOI, block without its leading SOI.
    merged.extend_from_slice(&tables[..tables.len() - 2]);
    merged.extend_from_slice(&block[2..]);
    Ok(merged.freeze())
}

// =============================================================================
// Tests
// =============================================================================
