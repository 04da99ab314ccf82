use thiserror::Error;

/// Errors that can occur while decoding a TIFF image block.
///
/// Every decode error is terminal for the block being processed: no
/// partial pixel data is committed to the destination buffer for a
/// block that fails. Errors carry enough context (block coordinates,
/// expected vs. actual byte counts) to diagnose corrupt files.
#[derive(Debug, Error)]
pub enum TiffError {
    /// I/O error while reading block data from the source stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Compression scheme the decoder does not implement
    #[error("unsupported compression: {0}")]
    UnsupportedCompression(String),

    /// Predictor tag value other than None or Horizontal
    #[error("unsupported predictor: {0}")]
    UnsupportedPredictor(u16),

    /// Bits-per-sample value the predictor or unpacker cannot handle
    #[error("unsupported bits per sample: {0}")]
    UnsupportedBitDepth(u8),

    /// Block coordinates outside the image's block grid
    #[error("bad block col/row: {col}/{row}")]
    InvalidBlockCoordinates { col: u32, row: u32 },

    /// JPEGTables blob or per-block JPEG data with broken SOI/EOI framing
    #[error("invalid jpeg data: {reason}")]
    MalformedJpegTables { reason: &'static str },

    /// The merged or standalone JPEG stream failed to decode
    #[error("could not decode JPEG image: {message}")]
    JpegDecodeFailure { message: String },

    /// Decompressed block too short for the pixels it must cover
    #[error("not enough pixel data: need {required} bytes, got {available}")]
    BufferUnderrun { required: usize, available: usize },

    /// Photometric/depth combination with no destination buffer variant
    #[error("unknown image format: photometric {0}")]
    UnknownPixelFormat(u16),

    /// YCbCrSubSampling pair outside the accepted ratio set
    #[error("unknown YCbCr subsample ratio: {0}/{1}")]
    UnknownSubsamplingRatio(u64, u64),

    /// A block codec (LZW, deflate, fax) rejected its input
    #[error("{codec} decompression failed: {message}")]
    Decompress {
        codec: &'static str,
        message: String,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TiffError>;
