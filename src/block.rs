//! Block decode pipeline.
//!
//! Ties the stages together for one strip or tile: geometry gives the
//! block's pixel bounds and byte range, the stream is seeked and
//! length-limited, the codec decompresses, the predictor is reversed,
//! and the unpacker writes pixels into the destination buffer. The
//! JPEG path short-circuits after the codec: its decoded image is
//! blitted directly and the predictor/unpack stages are skipped.
//!
//! Blocks have no data dependency on each other; each decodes from its
//! own byte range into its own clipped sub-rectangle. The only shared
//! resource is the reader's seek position, which is set immediately
//! before each block's bounded read, so callers decoding blocks
//! concurrently need one reader per block.

use std::io::{Read, Seek, SeekFrom};

use tracing::debug;

use crate::codec::DecodedBlock;
use crate::dir::Directory;
use crate::error::{Result, TiffError};
use crate::pixel::{unpack_block, PixelBuffer};
use crate::predictor;

/// Decode block (col, row) from `reader` into `dst`.
///
/// `dst` is normally the buffer [`PixelBuffer::for_directory`] built
/// for this directory; writes are clipped to its bounds and the image
/// bounds, so tiles overhanging the image edge are safe.
///
/// # Errors
///
/// Out-of-range coordinates are rejected up front. Decode failures
/// leave `dst` untouched for this block's rectangle except where noted
/// per stage; no garbage pixels are committed for a failed block.
pub fn decode_block<R: Read + Seek>(
    dir: &Directory,
    reader: &mut R,
    col: u32,
    row: u32,
    dst: &mut PixelBuffer,
) -> Result<()> {
    let (across, down) = (dir.blocks_across(), dir.blocks_down());
    if col >= across || row >= down {
        return Err(TiffError::InvalidBlockCoordinates { col, row });
    }

    let bounds = dir.block_bounds(col, row);
    let offset = dir.block_offset(col, row);
    let count = dir.block_byte_count(col, row);

    debug!(col, row, offset, count, "decoding block");

    reader.seek(SeekFrom::Start(offset))?;
    let mut limited = reader.take(count);

    let decoded = dir
        .compression()
        .decode(&mut limited, bounds.width(), bounds.height(), dir)?;

    match decoded {
        DecodedBlock::Image(img) => {
            // Decoded images carry their own pixel values; predictor
            // and unpacking do not apply.
            dst.blit_image(&img, bounds.min_x, bounds.min_y);
            Ok(())
        }
        DecodedBlock::Raw(mut data) => {
            predictor::reverse(
                dir.predictor(),
                &mut data,
                &bounds,
                dir.depth(),
                dir.channels(),
                dir.byte_order(),
            )?;
            unpack_block(dir, &data, dst, &bounds)
        }
    }
}

/// Decode the whole image: allocate the destination buffer and decode
/// every block of the grid into it.
pub fn decode_image<R: Read + Seek>(dir: &Directory, reader: &mut R) -> Result<PixelBuffer> {
    let mut dst = PixelBuffer::for_directory(dir)?;
    for row in 0..dir.blocks_down() {
        for col in 0..dir.blocks_across() {
            decode_block(dir, reader, col, row, &mut dst)?;
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
    use crate::dir::TagValue;
    use crate::order::ByteOrder;
    use crate::tags::TiffTag;
    use std::io::Cursor;

    fn ints(values: &[u64]) -> TagValue {
        TagValue::Ints(values.to_vec())
    }

    #[test]
    fn test_out_of_range_coordinates_are_an_error() {
        let dir = Directory::new(ByteOrder::LittleEndian)
            .with(TiffTag::ImageWidth, ints(&[4]))
            .with(TiffTag::ImageLength, ints(&[4]))
            .with(TiffTag::PhotometricInterpretation, ints(&[1]))
            .with(TiffTag::BitsPerSample, ints(&[8]))
            .with(TiffTag::StripOffsets, ints(&[0]))
            .with(TiffTag::StripByteCounts, ints(&[16]));
        let mut dst = PixelBuffer::for_directory(&dir).unwrap();
        let mut reader = Cursor::new(vec![0u8; 16]);

        let err = decode_block(&dir, &mut reader, 1, 0, &mut dst).unwrap_err();
        assert!(matches!(
            err,
            TiffError::InvalidBlockCoordinates { col: 1, row: 0 }
        ));
    }

    #[test]
    fn test_decode_block_reads_bounded_range() {
        // One 2x2 strip at offset 3; bytes beyond the count must not
        // leak into the pixels.
        let dir = Directory::new(ByteOrder::LittleEndian)
            .with(TiffTag::ImageWidth, ints(&[2]))
            .with(TiffTag::ImageLength, ints(&[2]))
            .with(TiffTag::PhotometricInterpretation, ints(&[1]))
            .with(TiffTag::BitsPerSample, ints(&[8]))
            .with(TiffTag::StripOffsets, ints(&[3]))
            .with(TiffTag::StripByteCounts, ints(&[4]));

        let mut stream = vec![0xEE, 0xEE, 0xEE]; // padding before the strip
        stream.extend_from_slice(&[1, 2, 3, 4]);
        stream.extend_from_slice(&[0xEE; 5]);

        let mut dst = PixelBuffer::for_directory(&dir).unwrap();
        decode_block(&dir, &mut Cursor::new(stream), 0, 0, &mut dst).unwrap();

        let PixelBuffer::Gray8 { pix, .. } = dst else {
            panic!()
        };
        assert_eq!(pix, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_unknown_predictor_fails_block() {
        let dir = Directory::new(ByteOrder::LittleEndian)
            .with(TiffTag::ImageWidth, ints(&[2]))
            .with(TiffTag::ImageLength, ints(&[1]))
            .with(TiffTag::PhotometricInterpretation, ints(&[1]))
            .with(TiffTag::BitsPerSample, ints(&[8]))
            .with(TiffTag::Predictor, ints(&[3]))
            .with(TiffTag::StripOffsets, ints(&[0]))
            .with(TiffTag::StripByteCounts, ints(&[2]));
        let mut dst = PixelBuffer::for_directory(&dir).unwrap();

        let err =
            decode_block(&dir, &mut Cursor::new(vec![1, 2]), 0, 0, &mut dst).unwrap_err();
        assert!(matches!(err, TiffError::UnsupportedPredictor(3)));
    }
}
