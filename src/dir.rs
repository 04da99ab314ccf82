//! Directory tag access.
//!
//! The block decoder does not parse TIFF containers. It consumes a
//! [`Directory`]: the tag-keyed metadata of a single image, produced by
//! an external IFD parser, together with the file's byte order. Every
//! raw lookup reports presence explicitly (an absent tag is `None`,
//! never a zero that looks like a valid value) and the typed
//! convenience getters apply the defaults the TIFF specification
//! documents for absent tags.

use std::collections::HashMap;

use bytes::Bytes;

use crate::error::{Result, TiffError};
use crate::order::ByteOrder;
use crate::pixel::PixelFormat;
use crate::tags::{CompressionType, Photometric, PredictorType, TiffTag};

// =============================================================================
// TagValue
// =============================================================================

/// A typed tag value set, as delivered by the IFD parser.
///
/// TIFF field types collapse into these groups once decoded: all the
/// integer types (BYTE/SHORT/LONG/LONG8) widen to u64, RATIONAL keeps
/// its numerator/denominator pair, and UNDEFINED data stays raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// Integer values (BYTE, SHORT, LONG, LONG8)
    Ints(Vec<u64>),
    /// Unsigned rational values as (numerator, denominator) pairs
    Rationals(Vec<(u32, u32)>),
    /// Floating point values (FLOAT, DOUBLE)
    Floats(Vec<f64>),
    /// ASCII string, null terminator stripped
    Ascii(String),
    /// Raw bytes (UNDEFINED), e.g. the JPEGTables blob
    Bytes(Bytes),
}

impl TagValue {
    /// View the value as an integer slice, if it is one.
    pub fn as_ints(&self) -> Option<&[u64]> {
        match self {
            TagValue::Ints(v) => Some(v),
            _ => None,
        }
    }

    /// View the value as raw bytes, if it is one.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            TagValue::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

// =============================================================================
// Directory
// =============================================================================

/// Tag directory for one image, the decoder's read-only input.
///
/// Holds the typed tag values of a single IFD plus the byte order of
/// the containing file. The byte order governs every multi-byte sample
/// read during predictor reversal and 16-bit pixel unpacking.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    byte_order: ByteOrder,
    entries: HashMap<TiffTag, TagValue>,
}

impl Directory {
    /// Create an empty directory with the given byte order.
    pub fn new(byte_order: ByteOrder) -> Self {
        Self {
            byte_order,
            entries: HashMap::new(),
        }
    }

    /// Byte order of the containing file.
    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Insert or replace a tag value.
    pub fn set(&mut self, tag: TiffTag, value: TagValue) {
        self.entries.insert(tag, value);
    }

    /// Builder-style tag insertion.
    pub fn with(mut self, tag: TiffTag, value: TagValue) -> Self {
        self.set(tag, value);
        self
    }

    /// Raw lookup: the tag's value set and an explicit presence flag.
    pub fn get(&self, tag: TiffTag) -> Option<&TagValue> {
        self.entries.get(&tag)
    }

    // -------------------------------------------------------------------------
    // Typed getters
    // -------------------------------------------------------------------------

    /// Single integer value of a tag, if present with exactly one value.
    fn get_int(&self, tag: TiffTag) -> Option<u64> {
        match self.get(tag)?.as_ints()? {
            [v] => Some(*v),
            _ => None,
        }
    }

    /// Image width in pixels; 0 when absent.
    pub fn image_width(&self) -> u32 {
        self.get_int(TiffTag::ImageWidth).unwrap_or(0) as u32
    }

    /// Image height in pixels; 0 when absent.
    pub fn image_height(&self) -> u32 {
        self.get_int(TiffTag::ImageLength).unwrap_or(0) as u32
    }

    /// Tile width in pixels. Presence of this tag is what marks an
    /// image as tiled rather than stripped.
    pub fn tile_width(&self) -> Option<u32> {
        self.get_int(TiffTag::TileWidth).map(|v| v as u32)
    }

    /// Tile height in pixels.
    pub fn tile_length(&self) -> Option<u32> {
        self.get_int(TiffTag::TileLength).map(|v| v as u32)
    }

    /// Rows per strip, as stored. Callers clamp 0 or oversized values
    /// to the image height.
    pub fn rows_per_strip(&self) -> Option<u32> {
        self.get_int(TiffTag::RowsPerStrip).map(|v| v as u32)
    }

    /// Uniform bits-per-sample across all channels.
    ///
    /// Returns 1 (the TIFF default) when the tag is absent, and 0 when
    /// the channels disagree; mixed-depth images have no uniform depth
    /// and fail downstream as unsupported.
    pub fn bits_per_sample(&self) -> u8 {
        match self.get(TiffTag::BitsPerSample).and_then(TagValue::as_ints) {
            None | Some([]) => 1,
            Some(values) => {
                if values.iter().any(|v| *v != values[0]) {
                    0
                } else {
                    values[0] as u8
                }
            }
        }
    }

    /// Channel count per pixel; defaults to 1.
    pub fn samples_per_pixel(&self) -> u32 {
        self.get_int(TiffTag::SamplesPerPixel).unwrap_or(1) as u32
    }

    /// Compression scheme; an absent tag means uncompressed.
    pub fn compression(&self) -> CompressionType {
        match self.get_int(TiffTag::Compression) {
            Some(v) => CompressionType::from_u16(v as u16).unwrap_or(CompressionType::None),
            None => CompressionType::None,
        }
    }

    /// Raw compression tag value, preserved for error messages about
    /// schemes outside the closed enumeration.
    pub fn compression_raw(&self) -> Option<u16> {
        self.get_int(TiffTag::Compression).map(|v| v as u16)
    }

    /// Predictor; an absent tag means no prediction.
    pub fn predictor(&self) -> PredictorType {
        match self.get_int(TiffTag::Predictor) {
            Some(v) => PredictorType::from_u16(v as u16),
            None => PredictorType::None,
        }
    }

    /// Photometric interpretation; defaults to WhiteIsZero.
    pub fn photometric(&self) -> Photometric {
        match self.get_int(TiffTag::PhotometricInterpretation) {
            Some(v) => Photometric::from_u16(v as u16).unwrap_or(Photometric::WhiteIsZero),
            None => Photometric::WhiteIsZero,
        }
    }

    /// Raw photometric tag value for error reporting.
    pub fn photometric_raw(&self) -> u16 {
        self.get_int(TiffTag::PhotometricInterpretation)
            .unwrap_or(Photometric::WhiteIsZero.as_u16() as u64) as u16
    }

    /// Shared JPEG tables blob, if the file carries one.
    pub fn jpeg_tables(&self) -> Option<&[u8]> {
        self.get(TiffTag::JpegTables)?.as_bytes()
    }

    /// YCbCr chroma subsampling factors, as stored.
    pub fn ycbcr_subsampling(&self) -> Option<&[u64]> {
        self.get(TiffTag::YCbCrSubSampling)?.as_ints()
    }

    /// First ExtraSamples value, if present.
    pub fn extra_samples(&self) -> Option<u64> {
        self.get(TiffTag::ExtraSamples)?.as_ints()?.first().copied()
    }

    /// Block byte offsets: tile offsets for tiled images, strip offsets
    /// otherwise.
    pub fn block_offsets(&self) -> Option<&[u64]> {
        let tag = if self.tile_width().is_some() {
            TiffTag::TileOffsets
        } else {
            TiffTag::StripOffsets
        };
        self.get(tag)?.as_ints()
    }

    /// Block byte counts, parallel to [`Self::block_offsets`].
    pub fn block_byte_counts(&self) -> Option<&[u64]> {
        let tag = if self.tile_width().is_some() {
            TiffTag::TileByteCounts
        } else {
            TiffTag::StripByteCounts
        };
        self.get(tag)?.as_ints()
    }

    /// Palette table for indexed images.
    ///
    /// The ColorMap tag stores all red values, then all green, then all
    /// blue; this regroups them into per-entry `[r, g, b]` triples.
    /// Returns `None` when the tag is absent or its length is not a
    /// multiple of three.
    pub fn color_map(&self) -> Option<Vec<[u16; 3]>> {
        let values = self.get(TiffTag::ColorMap)?.as_ints()?;
        if values.is_empty() || values.len() % 3 != 0 {
            return None;
        }
        let n = values.len() / 3;
        let mut palette = Vec::with_capacity(n);
        for i in 0..n {
            palette.push([
                values[i] as u16,
                values[n + i] as u16,
                values[2 * n + i] as u16,
            ]);
        }
        Some(palette)
    }

    // -------------------------------------------------------------------------
    // Derived properties
    // -------------------------------------------------------------------------

    /// Uniform sample depth in bits. Alias kept close to the pipeline's
    /// vocabulary.
    #[inline]
    pub fn depth(&self) -> u8 {
        self.bits_per_sample()
    }

    /// Channel count per pixel.
    #[inline]
    pub fn channels(&self) -> u32 {
        self.samples_per_pixel()
    }

    /// Classify the image's pixel format from photometric
    /// interpretation, depth, channel count, and alpha association.
    pub fn pixel_format(&self) -> Result<PixelFormat> {
        let format = match self.photometric() {
            Photometric::WhiteIsZero => {
                if self.depth() == 1 {
                    PixelFormat::BilevelInvert
                } else {
                    PixelFormat::GrayInvert
                }
            }
            Photometric::BlackIsZero => {
                if self.depth() == 1 {
                    PixelFormat::Bilevel
                } else {
                    PixelFormat::Gray
                }
            }
            Photometric::Rgb => {
                if self.channels() >= 4 {
                    // ExtraSamples 2 marks the fourth channel as
                    // unassociated (non-premultiplied) alpha.
                    if self.extra_samples() == Some(2) {
                        PixelFormat::Nrgba
                    } else {
                        PixelFormat::Rgba
                    }
                } else {
                    PixelFormat::Rgb
                }
            }
            Photometric::Paletted => PixelFormat::Paletted,
            Photometric::Cmyk => PixelFormat::Cmyk,
            Photometric::YCbCr => PixelFormat::YCbCr,
            Photometric::TransparencyMask => {
                return Err(TiffError::UnknownPixelFormat(self.photometric_raw()))
            }
        };
        Ok(format)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[u64]) -> TagValue {
        TagValue::Ints(values.to_vec())
    }

    // -------------------------------------------------------------------------
    // Defaults
    // -------------------------------------------------------------------------

    #[test]
    fn test_defaults_for_absent_tags() {
        let dir = Directory::new(ByteOrder::LittleEndian);
        assert_eq!(dir.image_width(), 0);
        assert_eq!(dir.image_height(), 0);
        assert_eq!(dir.tile_width(), None);
        assert_eq!(dir.rows_per_strip(), None);
        assert_eq!(dir.bits_per_sample(), 1);
        assert_eq!(dir.samples_per_pixel(), 1);
        assert_eq!(dir.compression(), CompressionType::None);
        assert_eq!(dir.predictor(), PredictorType::None);
        assert_eq!(dir.photometric(), Photometric::WhiteIsZero);
        assert!(dir.jpeg_tables().is_none());
        assert!(dir.block_offsets().is_none());
    }

    #[test]
    fn test_presence_is_explicit() {
        let dir = Directory::new(ByteOrder::LittleEndian)
            .with(TiffTag::RowsPerStrip, ints(&[0]));
        // A stored zero is present, distinct from an absent tag.
        assert_eq!(dir.rows_per_strip(), Some(0));
    }

    // -------------------------------------------------------------------------
    // BitsPerSample
    // -------------------------------------------------------------------------

    #[test]
    fn test_bits_per_sample_uniform() {
        let dir = Directory::new(ByteOrder::LittleEndian)
            .with(TiffTag::BitsPerSample, ints(&[8, 8, 8]));
        assert_eq!(dir.bits_per_sample(), 8);
    }

    #[test]
    fn test_bits_per_sample_mixed_is_zero() {
        let dir = Directory::new(ByteOrder::LittleEndian)
            .with(TiffTag::BitsPerSample, ints(&[8, 8, 16]));
        assert_eq!(dir.bits_per_sample(), 0);
    }

    // -------------------------------------------------------------------------
    // Block offsets / byte counts
    // -------------------------------------------------------------------------

    #[test]
    fn test_block_offsets_follow_layout() {
        let stripped = Directory::new(ByteOrder::LittleEndian)
            .with(TiffTag::StripOffsets, ints(&[10, 20]))
            .with(TiffTag::TileOffsets, ints(&[99]));
        // No TileWidth: the strip arrays win.
        assert_eq!(stripped.block_offsets(), Some([10, 20].as_slice()));

        let tiled = stripped.with(TiffTag::TileWidth, ints(&[64]));
        assert_eq!(tiled.block_offsets(), Some([99].as_slice()));
    }

    // -------------------------------------------------------------------------
    // ColorMap
    // -------------------------------------------------------------------------

    #[test]
    fn test_color_map_regroups_planes() {
        // Two entries: reds [1, 2], greens [3, 4], blues [5, 6].
        let dir = Directory::new(ByteOrder::LittleEndian)
            .with(TiffTag::ColorMap, ints(&[1, 2, 3, 4, 5, 6]));
        let palette = dir.color_map().unwrap();
        assert_eq!(palette, vec![[1, 3, 5], [2, 4, 6]]);
    }

    #[test]
    fn test_color_map_bad_length() {
        let dir = Directory::new(ByteOrder::LittleEndian)
            .with(TiffTag::ColorMap, ints(&[1, 2, 3, 4]));
        assert!(dir.color_map().is_none());
    }

    // -------------------------------------------------------------------------
    // Pixel format classification
    // -------------------------------------------------------------------------

    #[test]
    fn test_pixel_format_gray_variants() {
        let white = Directory::new(ByteOrder::LittleEndian)
            .with(TiffTag::PhotometricInterpretation, ints(&[0]))
            .with(TiffTag::BitsPerSample, ints(&[8]));
        assert_eq!(white.pixel_format().unwrap(), PixelFormat::GrayInvert);

        let bilevel = Directory::new(ByteOrder::LittleEndian)
            .with(TiffTag::PhotometricInterpretation, ints(&[1]));
        // BitsPerSample absent defaults to 1 -> bilevel.
        assert_eq!(bilevel.pixel_format().unwrap(), PixelFormat::Bilevel);
    }

    #[test]
    fn test_pixel_format_rgb_alpha_split() {
        let rgb = Directory::new(ByteOrder::LittleEndian)
            .with(TiffTag::PhotometricInterpretation, ints(&[2]))
            .with(TiffTag::SamplesPerPixel, ints(&[3]));
        assert_eq!(rgb.pixel_format().unwrap(), PixelFormat::Rgb);

        let rgba = Directory::new(ByteOrder::LittleEndian)
            .with(TiffTag::PhotometricInterpretation, ints(&[2]))
            .with(TiffTag::SamplesPerPixel, ints(&[4]))
            .with(TiffTag::ExtraSamples, ints(&[1]));
        assert_eq!(rgba.pixel_format().unwrap(), PixelFormat::Rgba);

        let nrgba = Directory::new(ByteOrder::LittleEndian)
            .with(TiffTag::PhotometricInterpretation, ints(&[2]))
            .with(TiffTag::SamplesPerPixel, ints(&[4]))
            .with(TiffTag::ExtraSamples, ints(&[2]));
        assert_eq!(nrgba.pixel_format().unwrap(), PixelFormat::Nrgba);
    }

    #[test]
    fn test_pixel_format_mask_is_unknown() {
        let dir = Directory::new(ByteOrder::LittleEndian)
            .with(TiffTag::PhotometricInterpretation, ints(&[4]));
        assert!(matches!(
            dir.pixel_format(),
            Err(TiffError::UnknownPixelFormat(4))
        ));
    }
}
