//! Destination pixel buffers and block unpacking.
//!
//! The decode pipeline ends in one of the typed buffers defined here:
//! the allocator picks the concrete [`PixelBuffer`] variant from the
//! directory's color model and bit depth, and [`unpack_block`]
//! converts a decompressed block's bytes into pixels of that variant,
//! clipped to the image bounds.

mod buffer;
mod unpack;

pub use buffer::{PixelBuffer, SubsampleRatio};
pub use unpack::unpack_block;

// =============================================================================
// PixelFormat
// =============================================================================

/// Color model of the decoded image, the closed set the pipeline
/// branches over.
///
/// The `Invert` variants correspond to the WhiteIsZero photometric:
/// sample values are complemented after rescaling so that 0 renders
/// white. `Nrgba` carries non-premultiplied (unassociated) alpha,
/// `Rgba` premultiplied (associated) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 1-bit black-is-zero
    Bilevel,
    /// 1-bit white-is-zero
    BilevelInvert,
    /// Grayscale, black-is-zero
    Gray,
    /// Grayscale, white-is-zero
    GrayInvert,
    /// Palette-indexed color
    Paletted,
    /// RGB with non-premultiplied alpha
    Nrgba,
    /// RGB without stored alpha
    Rgb,
    /// RGB with premultiplied alpha
    Rgba,
    /// Luminance/chrominance color
    YCbCr,
    /// Separated color, CMYK
    Cmyk,
}

impl PixelFormat {
    /// Whether samples are complemented after rescaling.
    #[inline]
    pub fn is_inverted(self) -> bool {
        matches!(self, PixelFormat::BilevelInvert | PixelFormat::GrayInvert)
    }

    /// Whether this is one of the single-channel gray/bilevel models.
    #[inline]
    pub fn is_gray(self) -> bool {
        matches!(
            self,
            PixelFormat::Bilevel
                | PixelFormat::BilevelInvert
                | PixelFormat::Gray
                | PixelFormat::GrayInvert
        )
    }
}
