//! LZW decoding, TIFF variant.
//!
//! TIFF LZW packs variable-width codes MSB-first with an 8-bit root
//! size, so codes start at 9 bits and widen as the dictionary fills,
//! with the standard clear-code reset and end-of-information code. The
//! TIFF flavor also switches code width one code early compared to the
//! GIF flavor. `weezl` implements exactly this variant via
//! `Decoder::with_tiff_size_switch`.

use std::io::Read;

use weezl::{decode::Decoder, BitOrder};

use crate::error::{Result, TiffError};

/// Decode one LZW-compressed block to raw bytes.
pub fn decode<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut src = Vec::new();
    reader.read_to_end(&mut src)?;

    Decoder::with_tiff_size_switch(BitOrder::Msb, 8)
        .decode(&src)
        .map_err(|e| TiffError::Decompress {
            codec: "LZW",
            message: e.to_string(),
        })
}

// =============================================================================
// Tests
// =============================================================================
