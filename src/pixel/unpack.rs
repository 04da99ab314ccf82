//! Block unpacking into the destination buffer.
//!
//! Takes one block's raw (decompressed, predictor-reversed) bytes and
//! writes typed pixels into the destination's sub-rectangle, branching
//! on the pixel format and bit depth. Writes are clipped to the
//! intersection of the block bounds, the destination bounds, and the
//! image bounds, which defends against tiles that overhang the image
//! edge. Source offsets are always computed from the block's nominal
//! row stride, so clipped columns are skipped rather than smeared into
//! the next row, and no read ever passes the end of the buffer; a
//! short buffer is a hard error naming the byte counts.

use crate::bits::BitReader;
use crate::dir::Directory;
use crate::error::{Result, TiffError};
use crate::geometry::BlockRect;
use crate::pixel::{PixelBuffer, PixelFormat};
use crate::tags::CompressionType;

/// Write one block's raw bytes into the destination buffer.
///
/// `bounds` is the block's nominal pixel rectangle as reported by the
/// geometry calculator; `buf` holds exactly that rectangle's samples,
/// row-aligned to byte boundaries for sub-byte depths.
pub fn unpack_block(
    dir: &Directory,
    buf: &[u8],
    dst: &mut PixelBuffer,
    bounds: &BlockRect,
) -> Result<()> {
    let format = dir.pixel_format()?;
    let depth = dir.depth();
    let order = dir.byte_order();

    let xmin = bounds.min_x;
    let ymin = bounds.min_y;

    // Clip against destination and image bounds; a tile's nominal
    // rectangle may overhang the image edge.
    let max_x = bounds
        .max_x
        .min(dst.width())
        .min(dir.image_width());
    let max_y = bounds
        .max_y
        .min(dst.height())
        .min(dir.image_height());
    if max_x <= xmin || max_y <= ymin {
        return Ok(());
    }
    let visible_w = (max_x - xmin) as usize;
    let visible_h = (max_y - ymin) as usize;

    // Nominal block width governs the source row stride even when the
    // visible region is narrower.
    let block_w = bounds.width() as usize;

    let dst_w = dst.width() as usize;
    let compression = dir.compression();

    match (format, depth) {
        // Fax-decoded bilevel data arrives as packed one-bit-per-pixel
        // rows; expand each row's bits into gray bytes.
        (
            PixelFormat::Bilevel
            | PixelFormat::BilevelInvert
            | PixelFormat::Gray
            | PixelFormat::GrayInvert,
            1,
        ) if compression == CompressionType::G3 || compression == CompressionType::G4 => {
            let PixelBuffer::Gray8 { pix, .. } = dst else {
                return Err(TiffError::UnknownPixelFormat(dir.photometric_raw()));
            };
            let stride = block_w.div_ceil(8);
            for y in 0..visible_h {
                let row = row_slice(buf, y, stride, stride)?;
                let mut bits = BitReader::new(row);
                let dst_row = (ymin as usize + y) * dst_w + xmin as usize;
                for x in 0..visible_w {
                    let v = bits.read_bits(1).ok_or(TiffError::BufferUnderrun {
                        required: (y + 1) * stride,
                        available: buf.len(),
                    })?;
                    let mut v = (v * 0xff) as u8;
                    if format.is_inverted() {
                        v = 0xff - v;
                    }
                    pix[dst_row + x] = v;
                }
            }
        }

        // 16-bit grayscale: two bytes per sample in the configured
        // byte order.
        (PixelFormat::Gray | PixelFormat::GrayInvert, 16) => {
            let PixelBuffer::Gray16 { pix, .. } = dst else {
                return Err(TiffError::UnknownPixelFormat(dir.photometric_raw()));
            };
            let stride = block_w * 2;
            for y in 0..visible_h {
                let row = row_slice(buf, y, stride, visible_w * 2)?;
                let dst_row = (ymin as usize + y) * dst_w + xmin as usize;
                for x in 0..visible_w {
                    let mut v = order.read_u16(&row[x * 2..x * 2 + 2]);
                    if format == PixelFormat::GrayInvert {
                        v = 0xffff - v;
                    }
                    pix[dst_row + x] = v;
                }
            }
        }

        // Sub-16-bit grayscale and bilevel: bit-packed samples,
        // linearly rescaled to the full 8-bit range.
        (
            PixelFormat::Bilevel
            | PixelFormat::BilevelInvert
            | PixelFormat::Gray
            | PixelFormat::GrayInvert,
            1..=15,
        ) => {
            let PixelBuffer::Gray8 { pix, .. } = dst else {
                return Err(TiffError::UnknownPixelFormat(dir.photometric_raw()));
            };
            let depth = depth as u32;
            let stride = (block_w * depth as usize).div_ceil(8);
            let max = (1u32 << depth) - 1;
            for y in 0..visible_h {
                let row = row_slice(buf, y, stride, stride)?;
                let mut bits = BitReader::new(row);
                let dst_row = (ymin as usize + y) * dst_w + xmin as usize;
                for x in 0..visible_w {
                    let v = bits.read_bits(depth).ok_or(TiffError::BufferUnderrun {
                        required: (y + 1) * stride,
                        available: buf.len(),
                    })?;
                    let mut v = (v * 0xff / max) as u8;
                    if format.is_inverted() {
                        v = 0xff - v;
                    }
                    pix[dst_row + x] = v;
                }
            }
        }

        // Palette indices are used directly, no rescaling.
        (PixelFormat::Paletted, 1..=15) => {
            let PixelBuffer::Indexed8 { pix, .. } = dst else {
                return Err(TiffError::UnknownPixelFormat(dir.photometric_raw()));
            };
            let depth = depth as u32;
            let stride = (block_w * depth as usize).div_ceil(8);
            for y in 0..visible_h {
                let row = row_slice(buf, y, stride, stride)?;
                let mut bits = BitReader::new(row);
                let dst_row = (ymin as usize + y) * dst_w + xmin as usize;
                for x in 0..visible_w {
                    let v = bits.read_bits(depth).ok_or(TiffError::BufferUnderrun {
                        required: (y + 1) * stride,
                        available: buf.len(),
                    })?;
                    pix[dst_row + x] = v as u8;
                }
            }
        }

        // RGB without stored alpha: synthesize a fully opaque alpha.
        (PixelFormat::Rgb, 8) => {
            let PixelBuffer::Rgba8 { pix, .. } = dst else {
                return Err(TiffError::UnknownPixelFormat(dir.photometric_raw()));
            };
            let stride = block_w * 3;
            for y in 0..visible_h {
                let row = row_slice(buf, y, stride, visible_w * 3)?;
                let dst_row = ((ymin as usize + y) * dst_w + xmin as usize) * 4;
                for x in 0..visible_w {
                    let d = dst_row + x * 4;
                    pix[d] = row[x * 3];
                    pix[d + 1] = row[x * 3 + 1];
                    pix[d + 2] = row[x * 3 + 2];
                    pix[d + 3] = 0xff;
                }
            }
        }

        (PixelFormat::Rgb, 16) => {
            let PixelBuffer::Rgba16 { pix, .. } = dst else {
                return Err(TiffError::UnknownPixelFormat(dir.photometric_raw()));
            };
            let stride = block_w * 6;
            for y in 0..visible_h {
                let row = row_slice(buf, y, stride, visible_w * 6)?;
                let dst_row = ((ymin as usize + y) * dst_w + xmin as usize) * 4;
                for x in 0..visible_w {
                    let s = x * 6;
                    let d = dst_row + x * 4;
                    pix[d] = order.read_u16(&row[s..s + 2]);
                    pix[d + 1] = order.read_u16(&row[s + 2..s + 4]);
                    pix[d + 2] = order.read_u16(&row[s + 4..s + 6]);
                    pix[d + 3] = 0xffff;
                }
            }
        }

        // Stored alpha copies through as-is, premultiplied or not.
        (PixelFormat::Rgba, 8) | (PixelFormat::Nrgba, 8) => {
            let pix = match (format, &mut *dst) {
                (PixelFormat::Rgba, PixelBuffer::Rgba8 { pix, .. }) => pix,
                (PixelFormat::Nrgba, PixelBuffer::Nrgba8 { pix, .. }) => pix,
                _ => return Err(TiffError::UnknownPixelFormat(dir.photometric_raw())),
            };
            let stride = block_w * 4;
            for y in 0..visible_h {
                let row = row_slice(buf, y, stride, visible_w * 4)?;
                let dst_row = ((ymin as usize + y) * dst_w + xmin as usize) * 4;
                pix[dst_row..dst_row + visible_w * 4].copy_from_slice(&row[..visible_w * 4]);
            }
        }

        (PixelFormat::Rgba, 16) | (PixelFormat::Nrgba, 16) => {
            let pix = match (format, &mut *dst) {
                (PixelFormat::Rgba, PixelBuffer::Rgba16 { pix, .. }) => pix,
                (PixelFormat::Nrgba, PixelBuffer::Nrgba16 { pix, .. }) => pix,
                _ => return Err(TiffError::UnknownPixelFormat(dir.photometric_raw())),
            };
            let stride = block_w * 8;
            for y in 0..visible_h {
                let row = row_slice(buf, y, stride, visible_w * 8)?;
                let dst_row = ((ymin as usize + y) * dst_w + xmin as usize) * 4;
                for i in 0..visible_w * 4 {
                    pix[dst_row + i] = order.read_u16(&row[i * 2..i * 2 + 2]);
                }
            }
        }

        // CMYK: one byte per channel, four channels, direct copy.
        (PixelFormat::Cmyk, 8) => {
            let PixelBuffer::Cmyk8 { pix, .. } = dst else {
                return Err(TiffError::UnknownPixelFormat(dir.photometric_raw()));
            };
            let stride = block_w * 4;
            for y in 0..visible_h {
                let row = row_slice(buf, y, stride, visible_w * 4)?;
                let dst_row = ((ymin as usize + y) * dst_w + xmin as usize) * 4;
                pix[dst_row..dst_row + visible_w * 4].copy_from_slice(&row[..visible_w * 4]);
            }
        }

        // YCbCr raw sample unpacking is only defined through the JPEG
        // path, which bypasses this function entirely.
        (PixelFormat::YCbCr, _) => {
            return Err(TiffError::UnknownPixelFormat(dir.photometric_raw()))
        }

        (_, depth) => return Err(TiffError::UnsupportedBitDepth(depth)),
    }

    Ok(())
}

/// Slice row `y` out of the block buffer.
///
/// `stride` is the nominal row stride; `needed` is how many of the
/// row's bytes this branch will actually read. Errors with the exact
/// expected vs. available counts when the buffer is short.
fn row_slice(buf: &[u8], y: usize, stride: usize, needed: usize) -> Result<&[u8]> {
    let start = y * stride;
    let end = start + needed;
    if end > buf.len() {
        return Err(TiffError::BufferUnderrun {
            required: end,
            available: buf.len(),
        });
    }
    Ok(&buf[start..start + stride.min(buf.len() - start)])
}

// =============================================================================
// Tests
// =============================================================================
