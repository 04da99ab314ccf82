//! Deflate (zlib) decoding.
//!
//! TIFF deflate blocks are zlib-wrapped streams, not raw deflate. Two
//! tag values name the same format: 8 (the Adobe registration) and
//! 32946 (the legacy experimental value); both land here.

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::error::{Result, TiffError};

/// Decode one zlib-wrapped deflate block to raw bytes.
pub fn decode<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut dst = Vec::new();
    ZlibDecoder::new(reader)
        .read_to_end(&mut dst)
        .map_err(|e| TiffError::Decompress {
            codec: "deflate",
            message: e.to_string(),
        })?;
    Ok(dst)
}

// =============================================================================
// Tests
// =============================================================================
