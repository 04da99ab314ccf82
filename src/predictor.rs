//! Horizontal differencing predictor reversal.
//!
//! With the horizontal predictor, the encoder stores every sample as a
//! delta from the same channel's previous sample in the row, which
//! makes smooth gradients compress well. After decompression the
//! differencing must be undone: each sample becomes the wrapping sum of
//! itself and the sample `samples_per_pixel` positions earlier. The
//! running accumulation restarts on every row; deltas never carry
//! across row boundaries.

use crate::error::{Result, TiffError};
use crate::geometry::BlockRect;
use crate::order::ByteOrder;
use crate::tags::PredictorType;

/// Undo the configured predictor on one decompressed block, in place.
///
/// `PredictorType::None` leaves the data untouched. Only horizontal
/// differencing is implemented; any other predictor value is an error,
/// since skipping a transform the encoder applied would silently
/// produce garbage pixels.
pub fn reverse(
    predictor: PredictorType,
    data: &mut [u8],
    bounds: &BlockRect,
    depth: u8,
    samples_per_pixel: u32,
    byte_order: ByteOrder,
) -> Result<()> {
    match predictor {
        PredictorType::None => Ok(()),
        PredictorType::Horizontal => {
            reverse_horizontal(data, bounds, depth, samples_per_pixel, byte_order)
        }
        other => Err(TiffError::UnsupportedPredictor(other.as_u16())),
    }
}

/// Undo horizontal differencing on one decompressed block, in place.
///
/// Works row by row over the block's pixel bounds. For 16-bit samples
/// the configured byte order governs both the read and the write-back.
/// Depths other than 8 and 16 are unsupported, and a buffer too short
/// for the block's pixels is a hard decode error.
pub fn reverse_horizontal(
    data: &mut [u8],
    bounds: &BlockRect,
    depth: u8,
    samples_per_pixel: u32,
    byte_order: ByteOrder,
) -> Result<()> {
    let width = bounds.width() as usize;
    let height = bounds.height() as usize;
    let spp = samples_per_pixel as usize;

    match depth {
        8 => {
            let mut off = 0usize;
            for _y in 0..height {
                // First pixel of the row is stored verbatim.
                off += spp;
                for _ in 0..width.saturating_sub(1) * spp {
                    if off >= data.len() {
                        return Err(TiffError::BufferUnderrun {
                            required: off + 1,
                            available: data.len(),
                        });
                    }
                    data[off] = data[off].wrapping_add(data[off - spp]);
                    off += 1;
                }
            }
        }
        16 => {
            let mut off = 0usize;
            for _y in 0..height {
                off += spp * 2;
                for _ in 0..width.saturating_sub(1) * spp {
                    if off + 2 > data.len() {
                        return Err(TiffError::BufferUnderrun {
                            required: off + 2,
                            available: data.len(),
                        });
                    }
                    let prev = byte_order.read_u16(&data[off - spp * 2..off - spp * 2 + 2]);
                    let cur = byte_order.read_u16(&data[off..off + 2]);
                    byte_order.write_u16(&mut data[off..off + 2], cur.wrapping_add(prev));
                    off += 2;
                }
            }
        }
        other => return Err(TiffError::UnsupportedBitDepth(other)),
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(width: u32, height: u32) -> BlockRect {
        BlockRect::new(0, 0, width, height)
    }

    /// Apply horizontal differencing the way an encoder would, so the
    /// tests can verify the decoder restores the original bytes.
    fn apply_horizontal_8(data: &mut [u8], width: usize, spp: usize) {
        for row in data.chunks_mut(width * spp) {
            for i in (spp..row.len()).rev() {
                row[i] = row[i].wrapping_sub(row[i - spp]);
            }
        }
    }

    fn apply_horizontal_16(data: &mut [u8], width: usize, spp: usize, order: ByteOrder) {
        for row in data.chunks_mut(width * spp * 2) {
            for i in (spp..row.len() / 2).rev() {
                let cur = order.read_u16(&row[i * 2..i * 2 + 2]);
                let prev = order.read_u16(&row[(i - spp) * 2..(i - spp) * 2 + 2]);
                order.write_u16(&mut row[i * 2..i * 2 + 2], cur.wrapping_sub(prev));
            }
        }
    }

    // -------------------------------------------------------------------------
    // 8-bit
    // -------------------------------------------------------------------------

    #[test]
    fn test_reverse_8bit_single_channel() {
        // Deltas 10, +5, +5, -3 over one row
        let mut data = vec![10, 5, 5, 253];
        reverse_horizontal(&mut data, &rect(4, 1), 8, 1, ByteOrder::LittleEndian).unwrap();
        assert_eq!(data, vec![10, 15, 20, 17]);
    }

    #[test]
    fn test_reverse_8bit_resets_each_row() {
        // Two rows; the second row's first pixel must not inherit the
        // first row's accumulator.
        let mut data = vec![100, 1, 200, 2];
        reverse_horizontal(&mut data, &rect(2, 2), 8, 1, ByteOrder::LittleEndian).unwrap();
        assert_eq!(data, vec![100, 101, 200, 202]);
    }

    #[test]
    fn test_reverse_8bit_wraps() {
        let mut data = vec![250, 10];
        reverse_horizontal(&mut data, &rect(2, 1), 8, 1, ByteOrder::LittleEndian).unwrap();
        assert_eq!(data, vec![250, 4]);
    }

    #[test]
    fn test_roundtrip_8bit_multi_channel() {
        for spp in [1usize, 3, 4] {
            let width = 7usize;
            let height = 3usize;
            let original: Vec<u8> = (0..width * height * spp)
                .map(|i| (i * 31 % 251) as u8)
                .collect();

            let mut data = original.clone();
            apply_horizontal_8(&mut data, width, spp);
            reverse_horizontal(
                &mut data,
                &rect(width as u32, height as u32),
                8,
                spp as u32,
                ByteOrder::LittleEndian,
            )
            .unwrap();
            assert_eq!(data, original, "spp = {spp}");
        }
    }

    // -------------------------------------------------------------------------
    // 16-bit
    // -------------------------------------------------------------------------

    #[test]
    fn test_roundtrip_16bit_both_orders() {
        for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
            for spp in [1usize, 3, 4] {
                let width = 5usize;
                let height = 2usize;
                let mut original = vec![0u8; width * height * spp * 2];
                for (i, chunk) in original.chunks_mut(2).enumerate() {
                    order.write_u16(chunk, (i * 4099 % 65521) as u16);
                }

                let mut data = original.clone();
                apply_horizontal_16(&mut data, width, spp, order);
                reverse_horizontal(
                    &mut data,
                    &rect(width as u32, height as u32),
                    16,
                    spp as u32,
                    order,
                )
                .unwrap();
                assert_eq!(data, original, "order = {order:?}, spp = {spp}");
            }
        }
    }

    #[test]
    fn test_reverse_16bit_wraps() {
        let order = ByteOrder::BigEndian;
        let mut data = vec![0u8; 4];
        order.write_u16(&mut data[0..2], 0xFFF0);
        order.write_u16(&mut data[2..4], 0x0020);
        reverse_horizontal(&mut data, &rect(2, 1), 16, 1, order).unwrap();
        assert_eq!(order.read_u16(&data[2..4]), 0x0010);
    }

    // -------------------------------------------------------------------------
    // Errors
    // -------------------------------------------------------------------------

    #[test]
    fn test_underrun_is_an_error() {
        // 4x1 pixels at 8-bit need 4 bytes; give 2.
        let mut data = vec![1, 2];
        let err =
            reverse_horizontal(&mut data, &rect(4, 1), 8, 1, ByteOrder::LittleEndian).unwrap_err();
        assert!(matches!(err, TiffError::BufferUnderrun { .. }));
    }

    #[test]
    fn test_underrun_16bit() {
        let mut data = vec![0u8; 5];
        let err =
            reverse_horizontal(&mut data, &rect(3, 1), 16, 1, ByteOrder::LittleEndian).unwrap_err();
        assert!(matches!(err, TiffError::BufferUnderrun { .. }));
    }

    #[test]
    fn test_unsupported_depth() {
        let mut data = vec![0u8; 8];
        let err =
            reverse_horizontal(&mut data, &rect(4, 1), 4, 1, ByteOrder::LittleEndian).unwrap_err();
        assert!(matches!(err, TiffError::UnsupportedBitDepth(4)));
    }

    // -------------------------------------------------------------------------
    // Predictor gate
    // -------------------------------------------------------------------------

    #[test]
    fn test_none_predictor_is_untouched() {
        let mut data = vec![9, 9, 9];
        reverse(
            PredictorType::None,
            &mut data,
            &rect(3, 1),
            8,
            1,
            ByteOrder::LittleEndian,
        )
        .unwrap();
        assert_eq!(data, vec![9, 9, 9]);
    }

    #[test]
    fn test_unknown_predictor_is_an_error() {
        let mut data = vec![0u8; 4];
        let err = reverse(
            PredictorType::Unknown(3),
            &mut data,
            &rect(2, 1),
            8,
            1,
            ByteOrder::LittleEndian,
        )
        .unwrap_err();
        assert!(matches!(err, TiffError::UnsupportedPredictor(3)));
    }
}
