//! PackBits run-length decoding.
//!
//! PackBits is a byte-oriented RLE scheme: a signed control byte `c`
//! introduces either a literal run (`c >= 0`: copy the next `c + 1`
//! bytes) or a repeat run (`c < -1`: repeat the next byte `1 - c`
//! times). The control value -128 is a no-op. The stream carries no
//! length header; it simply ends. End of stream on a fresh control byte
//! is normal termination, end of stream inside a run is corruption.

use std::io::Read;

use crate::error::{Result, TiffError};

/// Decode one PackBits-compressed block to raw bytes.
pub fn decode<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut src = Vec::new();
    reader.read_to_end(&mut src)?;

    let mut dst = Vec::with_capacity(src.len() * 2);
    let mut i = 0usize;

    while i < src.len() {
        let code = src[i] as i8;
        i += 1;

        match code {
            0.. => {
                let count = code as usize + 1;
                if i + count > src.len() {
                    return Err(TiffError::Decompress {
                        codec: "PackBits",
                        message: format!(
                            "literal run of {count} bytes truncated at offset {i}"
                        ),
                    });
                }
                dst.extend_from_slice(&src[i..i + count]);
                i += count;
            }
            -128 => {
                // No-op control byte.
            }
            _ => {
                let count = 1 - code as isize;
                if i >= src.len() {
                    return Err(TiffError::Decompress {
                        codec: "PackBits",
                        message: format!("repeat run truncated at offset {i}"),
                    });
                }
                let value = src[i];
                i += 1;
                dst.resize(dst.len() + count as usize, value);
            }
        }
    }

    Ok(dst)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference PackBits encoder used to verify round-trips.
    fn encode(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut i = 0usize;

        while i < data.len() {
            let mut run = 1usize;
            while i + run < data.len() && run < 128 && data[i + run] == data[i] {
                run += 1;
            }

            if run > 1 {
                out.push((1i16 - run as i16) as i8 as u8);
                out.push(data[i]);
                i += run;
            } else {
                let start = i;
                let mut literal = 1usize;
                i += 1;
                while i < data.len() && literal < 128 {
                    if i + 1 < data.len() && data[i] == data[i + 1] {
                        break;
                    }
                    literal += 1;
                    i += 1;
                }
                out.push((literal - 1) as u8);
                out.extend_from_slice(&data[start..start + literal]);
            }
        }

        out
    }

    fn decode_slice(data: &[u8]) -> Result<Vec<u8>> {
        decode(&mut &data[..])
    }

    // -------------------------------------------------------------------------
    // Decoding
    // -------------------------------------------------------------------------

    #[test]
    fn test_literal_run() {
        // Control 2 -> copy 3 literal bytes
        assert_eq!(decode_slice(&[2, 0xAA, 0xBB, 0xCC]).unwrap(), vec![0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn test_repeat_run() {
        // Control -3 (0xFD) -> repeat next byte 4 times
        assert_eq!(decode_slice(&[0xFD, 0x7F]).unwrap(), vec![0x7F; 4]);
    }

    #[test]
    fn test_noop_control_byte() {
        assert_eq!(decode_slice(&[0x80, 0x00, 0x42]).unwrap(), vec![0x42]);
    }

    #[test]
    fn test_empty_stream_is_empty_output() {
        assert_eq!(decode_slice(&[]).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_apple_reference_vector() {
        // The classic PackBits example from the TIFF specification.
        let compressed = [
            0xFEu8, 0xAA, 0x02, 0x80, 0x00, 0x2A, 0xFD, 0xAA, 0x03, 0x80, 0x00, 0x2A, 0x22,
            0xF7, 0xAA,
        ];
        let expected = [
            0xAAu8, 0xAA, 0xAA, 0x80, 0x00, 0x2A, 0xAA, 0xAA, 0xAA, 0xAA, 0x80, 0x00, 0x2A,
            0x22, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA,
        ];
        assert_eq!(decode_slice(&compressed).unwrap(), expected);
    }

    // -------------------------------------------------------------------------
    // Truncation errors
    // -------------------------------------------------------------------------

    #[test]
    fn test_truncated_literal_is_an_error() {
        // Control 4 promises 5 bytes, only 2 follow
        let err = decode_slice(&[4, 0x01, 0x02]).unwrap_err();
        assert!(matches!(err, TiffError::Decompress { codec: "PackBits", .. }));
    }

    #[test]
    fn test_truncated_repeat_is_an_error() {
        // Repeat control with no value byte
        let err = decode_slice(&[0xFE]).unwrap_err();
        assert!(matches!(err, TiffError::Decompress { codec: "PackBits", .. }));
    }

    // -------------------------------------------------------------------------
    // Round-trips
    // -------------------------------------------------------------------------

    #[test]
    fn test_roundtrip_literal_lengths() {
        // Literal runs of every length 1..=128
        for len in 1usize..=128 {
            let data: Vec<u8> = (0..len).map(|i| (i % 256) as u8).collect();
            let decoded = decode_slice(&encode(&data)).unwrap();
            assert_eq!(decoded, data, "literal length {len}");
        }
    }

    #[test]
    fn test_roundtrip_repeat_lengths() {
        // Repeat runs of every length 1..=128
        for len in 1usize..=128 {
            let data = vec![0x5Au8; len];
            let decoded = decode_slice(&encode(&data)).unwrap();
            assert_eq!(decoded, data, "repeat length {len}");
        }
    }

    #[test]
    fn test_roundtrip_mixed_runs() {
        let mut data = Vec::new();
        data.extend_from_slice(&[9; 40]);
        data.extend((0..60).map(|i| (i * 7 % 256) as u8));
        data.extend_from_slice(&[0; 200]);
        data.extend((0..130).map(|i| (255 - i % 256) as u8));
        let decoded = decode_slice(&encode(&data)).unwrap();
        assert_eq!(decoded, data);
    }
}
