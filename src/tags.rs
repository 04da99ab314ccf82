//! TIFF tag and tag-value definitions.
//!
//! This module defines the vocabulary the block decoder consumes:
//! - Tag IDs identifying the directory entries the decoder reads
//! - Closed enumerations for the compression, predictor, and
//!   photometric tag values
//!
//! Tags not listed here are irrelevant to block decoding and are simply
//! never looked up.

// =============================================================================
// TIFF Tags
// =============================================================================

/// TIFF tag IDs relevant to block decoding.
///
/// Tags are 16-bit identifiers that describe the type of metadata in an
/// IFD entry. We define only the tags needed for:
/// - Basic image structure (dimensions, organization, sample layout)
/// - Block access (strip/tile offsets, byte counts, sizes)
/// - Compression, predictor, and JPEG handling
/// - Color interpretation (photometric, palette, subsampling)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum TiffTag {
    // -------------------------------------------------------------------------
    // Basic Image Structure
    // -------------------------------------------------------------------------
    /// Image width in pixels
    ImageWidth = 256,

    /// Image height (length) in pixels
    ImageLength = 257,

    /// Bits per sample, one value per channel
    BitsPerSample = 258,

    /// Compression scheme used for block data
    Compression = 259,

    /// Photometric interpretation (grayscale, RGB, YCbCr, ...)
    PhotometricInterpretation = 262,

    /// Number of components per pixel (e.g., 3 for RGB)
    SamplesPerPixel = 277,

    // -------------------------------------------------------------------------
    // Strip Organization
    // -------------------------------------------------------------------------
    /// Byte offsets of strips within the file
    StripOffsets = 273,

    /// Row count per strip
    RowsPerStrip = 278,

    /// Byte counts of strips
    StripByteCounts = 279,

    // -------------------------------------------------------------------------
    // Sample Interpretation
    // -------------------------------------------------------------------------
    /// Differencing predictor applied before compression
    Predictor = 317,

    /// RGB palette for indexed images
    ColorMap = 320,

    /// Meaning of extra per-pixel samples (1 = associated alpha,
    /// 2 = unassociated alpha)
    ExtraSamples = 338,

    // -------------------------------------------------------------------------
    // Tile Organization
    // -------------------------------------------------------------------------
    /// Width of each tile in pixels; presence implies tiled layout
    TileWidth = 322,

    /// Height (length) of each tile in pixels
    TileLength = 323,

    /// Byte offsets of each tile in the file
    TileOffsets = 324,

    /// Byte counts of each tile
    TileByteCounts = 325,

    // -------------------------------------------------------------------------
    // JPEG / YCbCr Handling
    // -------------------------------------------------------------------------
    /// Shared JPEG quantization and Huffman tables
    ///
    /// Stored once per file and merged with every JPEG-compressed block
    /// before decoding, so the tables are not repeated per block.
    JpegTables = 347,

    /// YCbCr chroma subsampling factors (two values)
    YCbCrSubSampling = 530,
}

impl TiffTag {
    /// Create a TiffTag from its numeric value.
    ///
    /// Returns `None` for tags the block decoder does not consume.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            256 => Some(TiffTag::ImageWidth),
            257 => Some(TiffTag::ImageLength),
            258 => Some(TiffTag::BitsPerSample),
            259 => Some(TiffTag::Compression),
            262 => Some(TiffTag::PhotometricInterpretation),
            273 => Some(TiffTag::StripOffsets),
            277 => Some(TiffTag::SamplesPerPixel),
            278 => Some(TiffTag::RowsPerStrip),
            279 => Some(TiffTag::StripByteCounts),
            317 => Some(TiffTag::Predictor),
            320 => Some(TiffTag::ColorMap),
            322 => Some(TiffTag::TileWidth),
            323 => Some(TiffTag::TileLength),
            324 => Some(TiffTag::TileOffsets),
            325 => Some(TiffTag::TileByteCounts),
            338 => Some(TiffTag::ExtraSamples),
            347 => Some(TiffTag::JpegTables),
            530 => Some(TiffTag::YCbCrSubSampling),
            _ => None,
        }
    }

    /// Get the numeric tag ID.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

// =============================================================================
// Compression Values
// =============================================================================

/// TIFF compression scheme identifiers.
///
/// Each block of image data is independently compressed with the scheme
/// named here. `Ccitt` (the pre-G3 1D scheme) and `JpegOld` are
/// recognized but unsupported: decoding them is a hard error, never a
/// silent empty result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u16)]
pub enum CompressionType {
    /// No compression; block bytes are raw sample data
    #[default]
    None = 1,

    /// CCITT 1D modified Huffman RLE (unsupported)
    Ccitt = 2,

    /// CCITT Group 3 fax (decoded with the Group 4 decoder)
    G3 = 3,

    /// CCITT Group 4 fax
    G4 = 4,

    /// LZW, TIFF variant (MSB-first, early code-size switch)
    Lzw = 5,

    /// "Old-style" JPEG (unsupported, rarely seen)
    JpegOld = 6,

    /// Baseline JPEG, optionally with shared tables
    Jpeg = 7,

    /// zlib-wrapped deflate (Adobe)
    Deflate = 8,

    /// Byte-oriented PackBits RLE
    PackBits = 32773,

    /// zlib-wrapped deflate, legacy tag value (decodes like `Deflate`)
    DeflateOld = 32946,
}

impl CompressionType {
    /// Create a CompressionType from its numeric tag value.
    ///
    /// Returns `None` for unrecognized compression values. A value of 0
    /// (absent tag written as zero) is treated as uncompressed, matching
    /// the behavior of an absent Compression tag.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 | 1 => Some(CompressionType::None),
            2 => Some(CompressionType::Ccitt),
            3 => Some(CompressionType::G3),
            4 => Some(CompressionType::G4),
            5 => Some(CompressionType::Lzw),
            6 => Some(CompressionType::JpegOld),
            7 => Some(CompressionType::Jpeg),
            8 => Some(CompressionType::Deflate),
            32773 => Some(CompressionType::PackBits),
            32946 => Some(CompressionType::DeflateOld),
            _ => None,
        }
    }

    /// Get the numeric tag value.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Get a human-readable name for the compression scheme.
    pub const fn name(self) -> &'static str {
        match self {
            CompressionType::None => "None",
            CompressionType::Ccitt => "CCITT",
            CompressionType::G3 => "CCITT Group 3",
            CompressionType::G4 => "CCITT Group 4",
            CompressionType::Lzw => "LZW",
            CompressionType::JpegOld => "Old JPEG",
            CompressionType::Jpeg => "JPEG",
            CompressionType::Deflate => "Deflate",
            CompressionType::PackBits => "PackBits",
            CompressionType::DeflateOld => "Deflate (legacy)",
        }
    }
}

// =============================================================================
// Predictor Values
// =============================================================================

/// Differencing predictor applied to sample data before compression.
///
/// Only horizontal differencing is implemented. Any other non-`None`
/// value must surface as an error at decode time rather than being
/// silently ignored, since skipping a predictor the encoder applied
/// yields garbage pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PredictorType {
    /// No prediction
    #[default]
    None,
    /// Horizontal differencing: each sample stored as a delta from the
    /// same channel's previous sample in the row
    Horizontal,
    /// Unrecognized predictor value, carried for error reporting
    Unknown(u16),
}

impl PredictorType {
    /// Create a PredictorType from its numeric tag value.
    pub fn from_u16(value: u16) -> Self {
        match value {
            1 => PredictorType::None,
            2 => PredictorType::Horizontal,
            other => PredictorType::Unknown(other),
        }
    }

    /// Get the numeric tag value.
    pub const fn as_u16(self) -> u16 {
        match self {
            PredictorType::None => 1,
            PredictorType::Horizontal => 2,
            PredictorType::Unknown(v) => v,
        }
    }
}

// =============================================================================
// Photometric Values
// =============================================================================

/// Photometric interpretation of sample data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u16)]
pub enum Photometric {
    /// 0 is imaged as white; maximum sample value is black
    #[default]
    WhiteIsZero = 0,

    /// 0 is imaged as black; maximum sample value is white
    BlackIsZero = 1,

    /// RGB color, optionally with alpha (see ExtraSamples)
    Rgb = 2,

    /// Palette color; samples index the ColorMap table
    Paletted = 3,

    /// Transparency mask (no destination buffer variant)
    TransparencyMask = 4,

    /// Separated color, CMYK
    Cmyk = 5,

    /// Luminance/chrominance color
    YCbCr = 6,
}

impl Photometric {
    /// Create a Photometric from its numeric tag value.
    ///
    /// Returns `None` for unrecognized values.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(Photometric::WhiteIsZero),
            1 => Some(Photometric::BlackIsZero),
            2 => Some(Photometric::Rgb),
            3 => Some(Photometric::Paletted),
            4 => Some(Photometric::TransparencyMask),
            5 => Some(Photometric::Cmyk),
            6 => Some(Photometric::YCbCr),
            _ => None,
        }
    }

    /// Get the numeric tag value.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

// =============================================================================
// Tests
// =============================================================================
