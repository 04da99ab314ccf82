//! Destination buffer allocation.
//!
//! Each color-model/depth combination maps to one concrete buffer
//! variant, mirroring the closed [`PixelFormat`] set. The variant is
//! chosen once per decode from directory state; every block of the
//! image then writes into its own sub-rectangle of the same buffer.

use image::DynamicImage;
use tracing::debug;

use crate::dir::Directory;
use crate::error::{Result, TiffError};
use crate::pixel::PixelFormat;
use crate::tags::CompressionType;

// =============================================================================
// SubsampleRatio
// =============================================================================

/// YCbCr chroma subsampling ratio.
///
/// Derived from the two-integer YCbCrSubSampling tag. Only the pairs
/// below are accepted; anything else is a hard error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubsampleRatio {
    /// 4:4:4 - chroma at full resolution
    Ratio444,
    /// 4:2:2 - chroma halved horizontally
    Ratio422,
    /// 4:2:0 - chroma halved in both directions
    Ratio420,
    /// 4:4:0 - chroma halved vertically
    Ratio440,
    /// 4:1:1 - chroma quartered horizontally
    Ratio411,
    /// 4:1:0 - chroma quartered horizontally, halved vertically
    Ratio410,
}

impl SubsampleRatio {
    /// Map the stored subsampling pair to a ratio.
    pub fn from_pair(horizontal: u64, vertical: u64) -> Result<Self> {
        match (horizontal, vertical) {
            (4, 4) => Ok(SubsampleRatio::Ratio444),
            (2, 2) => Ok(SubsampleRatio::Ratio422),
            (2, 0) => Ok(SubsampleRatio::Ratio420),
            (4, 0) => Ok(SubsampleRatio::Ratio440),
            (1, 1) => Ok(SubsampleRatio::Ratio411),
            (1, 0) => Ok(SubsampleRatio::Ratio410),
            (h, v) => Err(TiffError::UnknownSubsamplingRatio(h, v)),
        }
    }

    /// Chroma plane dimensions for a luma plane of `width` x `height`.
    pub fn chroma_dims(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            SubsampleRatio::Ratio444 => (width, height),
            SubsampleRatio::Ratio422 => (width.div_ceil(2), height),
            SubsampleRatio::Ratio420 => (width.div_ceil(2), height.div_ceil(2)),
            SubsampleRatio::Ratio440 => (width, height.div_ceil(2)),
            SubsampleRatio::Ratio411 => (width.div_ceil(4), height),
            SubsampleRatio::Ratio410 => (width.div_ceil(4), height.div_ceil(2)),
        }
    }
}

// =============================================================================
// PixelBuffer
// =============================================================================

/// Typed destination buffer for a decoded image.
///
/// Interleaved variants store samples row-major; 16-bit variants store
/// native `u16` samples. `Rgb` images allocate as `Rgba8`/`Rgba16` with
/// synthesized opaque alpha, since no alpha-less interleaved variant is
/// kept.
#[derive(Debug, Clone)]
pub enum PixelBuffer {
    /// 8-bit grayscale (also bilevel; 1-bit samples expand to bytes)
    Gray8 {
        width: u32,
        height: u32,
        pix: Vec<u8>,
    },
    /// 16-bit grayscale
    Gray16 {
        width: u32,
        height: u32,
        pix: Vec<u16>,
    },
    /// Palette-indexed, with the directory's color table attached
    Indexed8 {
        width: u32,
        height: u32,
        pix: Vec<u8>,
        palette: Vec<[u16; 3]>,
    },
    /// 8-bit interleaved RGBA (premultiplied or synthesized alpha)
    Rgba8 {
        width: u32,
        height: u32,
        pix: Vec<u8>,
    },
    /// 16-bit interleaved RGBA
    Rgba16 {
        width: u32,
        height: u32,
        pix: Vec<u16>,
    },
    /// 8-bit interleaved RGBA, non-premultiplied alpha
    Nrgba8 {
        width: u32,
        height: u32,
        pix: Vec<u8>,
    },
    /// 16-bit interleaved RGBA, non-premultiplied alpha
    Nrgba16 {
        width: u32,
        height: u32,
        pix: Vec<u16>,
    },
    /// 8-bit interleaved CMYK
    Cmyk8 {
        width: u32,
        height: u32,
        pix: Vec<u8>,
    },
    /// Planar YCbCr with subsampled chroma
    YCbCr8 {
        width: u32,
        height: u32,
        ratio: SubsampleRatio,
        y: Vec<u8>,
        cb: Vec<u8>,
        cr: Vec<u8>,
    },
}

impl PixelBuffer {
    /// Allocate the destination buffer an image directory calls for,
    /// sized to the full image bounds.
    ///
    /// # Errors
    ///
    /// - `UnknownSubsamplingRatio` for a YCbCr image whose subsampling
    ///   pair is missing, not two values, or outside the accepted set
    /// - `UnknownPixelFormat` when no variant matches the directory
    pub fn for_directory(dir: &Directory) -> Result<Self> {
        let width = dir.image_width();
        let height = dir.image_height();
        let n = width as usize * height as usize;

        let buffer = match dir.pixel_format()? {
            PixelFormat::Bilevel | PixelFormat::BilevelInvert => PixelBuffer::Gray8 {
                width,
                height,
                pix: vec![0; n],
            },
            PixelFormat::Gray | PixelFormat::GrayInvert => {
                if dir.depth() == 16 {
                    PixelBuffer::Gray16 {
                        width,
                        height,
                        pix: vec![0; n],
                    }
                } else {
                    PixelBuffer::Gray8 {
                        width,
                        height,
                        pix: vec![0; n],
                    }
                }
            }
            PixelFormat::Paletted => PixelBuffer::Indexed8 {
                width,
                height,
                pix: vec![0; n],
                palette: dir.color_map().unwrap_or_default(),
            },
            PixelFormat::Nrgba => {
                if dir.depth() == 16 {
                    PixelBuffer::Nrgba16 {
                        width,
                        height,
                        pix: vec![0; n * 4],
                    }
                } else {
                    PixelBuffer::Nrgba8 {
                        width,
                        height,
                        pix: vec![0; n * 4],
                    }
                }
            }
            PixelFormat::Rgb | PixelFormat::Rgba => {
                if dir.depth() == 16 {
                    PixelBuffer::Rgba16 {
                        width,
                        height,
                        pix: vec![0; n * 4],
                    }
                } else {
                    PixelBuffer::Rgba8 {
                        width,
                        height,
                        pix: vec![0; n * 4],
                    }
                }
            }
            PixelFormat::YCbCr => {
                // The JPEG path decodes to a drawable image; YCbCr has
                // no addressable pixels under subsampling, so the
                // destination is RGBA and blocks are blitted onto it.
                if dir.compression() == CompressionType::Jpeg {
                    PixelBuffer::Rgba8 {
                        width,
                        height,
                        pix: vec![0; n * 4],
                    }
                } else {
                    let sub = dir
                        .ycbcr_subsampling()
                        .ok_or(TiffError::UnknownSubsamplingRatio(0, 0))?;
                    if sub.len() != 2 {
                        return Err(TiffError::UnknownSubsamplingRatio(0, 0));
                    }
                    let ratio = SubsampleRatio::from_pair(sub[0], sub[1])?;
                    let (cw, ch) = ratio.chroma_dims(width, height);
                    let chroma = cw as usize * ch as usize;
                    PixelBuffer::YCbCr8 {
                        width,
                        height,
                        ratio,
                        y: vec![0; n],
                        cb: vec![0; chroma],
                        cr: vec![0; chroma],
                    }
                }
            }
            PixelFormat::Cmyk => PixelBuffer::Cmyk8 {
                width,
                height,
                pix: vec![0; n * 4],
            },
        };

        Ok(buffer)
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> u32 {
        match self {
            PixelBuffer::Gray8 { width, .. }
            | PixelBuffer::Gray16 { width, .. }
            | PixelBuffer::Indexed8 { width, .. }
            | PixelBuffer::Rgba8 { width, .. }
            | PixelBuffer::Rgba16 { width, .. }
            | PixelBuffer::Nrgba8 { width, .. }
            | PixelBuffer::Nrgba16 { width, .. }
            | PixelBuffer::Cmyk8 { width, .. }
            | PixelBuffer::YCbCr8 { width, .. } => *width,
        }
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> u32 {
        match self {
            PixelBuffer::Gray8 { height, .. }
            | PixelBuffer::Gray16 { height, .. }
            | PixelBuffer::Indexed8 { height, .. }
            | PixelBuffer::Rgba8 { height, .. }
            | PixelBuffer::Rgba16 { height, .. }
            | PixelBuffer::Nrgba8 { height, .. }
            | PixelBuffer::Nrgba16 { height, .. }
            | PixelBuffer::Cmyk8 { height, .. }
            | PixelBuffer::YCbCr8 { height, .. } => *height,
        }
    }

    /// Copy a decoded image onto this buffer with its top-left corner
    /// at `(min_x, min_y)`, clipped to the buffer bounds.
    ///
    /// Used by the JPEG path, whose codec yields whole images. RGBA-like
    /// and 8-bit gray destinations accept the blit; a destination that
    /// cannot hold drawable pixels skips it.
    pub fn blit_image(&mut self, img: &DynamicImage, min_x: u32, min_y: u32) {
        let dst_w = self.width();
        let dst_h = self.height();

        match self {
            PixelBuffer::Rgba8 { pix, .. } | PixelBuffer::Nrgba8 { pix, .. } => {
                let src = img.to_rgba8();
                let copy_w = src.width().min(dst_w.saturating_sub(min_x)) as usize;
                let copy_h = src.height().min(dst_h.saturating_sub(min_y));
                for y in 0..copy_h {
                    let src_row = &src.as_raw()[(y * src.width()) as usize * 4..];
                    let dst_start = ((min_y + y) * dst_w + min_x) as usize * 4;
                    pix[dst_start..dst_start + copy_w * 4]
                        .copy_from_slice(&src_row[..copy_w * 4]);
                }
            }
            PixelBuffer::Gray8 { pix, .. } => {
                let src = img.to_luma8();
                let copy_w = src.width().min(dst_w.saturating_sub(min_x)) as usize;
                let copy_h = src.height().min(dst_h.saturating_sub(min_y));
                for y in 0..copy_h {
                    let src_row = &src.as_raw()[(y * src.width()) as usize..];
                    let dst_start = ((min_y + y) * dst_w + min_x) as usize;
                    pix[dst_start..dst_start + copy_w].copy_from_slice(&src_row[..copy_w]);
                }
            }
            _ => {
                debug!("destination cannot hold a decoded image, skipping blit");
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
