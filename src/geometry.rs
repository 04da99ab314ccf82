//! Block grid geometry.
//!
//! A TIFF image stores its pixel data as a grid of independently
//! compressed blocks: rectangular tiles, or full-width strips. This
//! module derives the grid shape from directory tags and maps block
//! coordinates to pixel-space bounds and byte ranges in the source
//! stream.
//!
//! Everything here is recomputed from tag state on each call; there is
//! no cached layout. Out-of-range coordinates yield an empty rectangle
//! or zero offset/count rather than an error; callers check the grid
//! shape before indexing.

use tracing::debug;

use crate::dir::Directory;

// =============================================================================
// BlockRect
// =============================================================================

/// Pixel-space rectangle covered by one block.
///
/// Tile rectangles always span the full nominal tile size and may
/// extend past the image edge; the pixel unpacker clips writes to the
/// image bounds. The zero rectangle doubles as the "no such block"
/// result for out-of-range coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockRect {
    /// Left edge, inclusive
    pub min_x: u32,
    /// Top edge, inclusive
    pub min_y: u32,
    /// Right edge, exclusive
    pub max_x: u32,
    /// Bottom edge, exclusive
    pub max_y: u32,
}

impl BlockRect {
    /// Construct a rectangle from its edges.
    pub fn new(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.max_x.saturating_sub(self.min_x)
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.max_y.saturating_sub(self.min_y)
    }

    /// Whether the rectangle covers no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

// =============================================================================
// Block grid
// =============================================================================

impl Directory {
    /// Number of block columns.
    ///
    /// Strips span the full image width, so a strip-organized image has
    /// exactly one column. Returns 0 when the image has no valid width.
    pub fn blocks_across(&self) -> u32 {
        let image_width = self.image_width();
        if image_width == 0 {
            return 0;
        }
        match self.tile_width() {
            Some(block_width) if block_width > 0 => image_width.div_ceil(block_width),
            _ => 1,
        }
    }

    /// Number of block rows.
    ///
    /// For tiled images this is the tile-row count; for stripped images
    /// the strip count, where a missing, zero, or oversized RowsPerStrip
    /// collapses to a single strip covering the whole image. Returns 0
    /// when the image has no valid height.
    pub fn blocks_down(&self) -> u32 {
        let image_height = self.image_height();
        if image_height == 0 {
            return 0;
        }
        if let Some(block_height) = self.tile_length() {
            if block_height > 0 {
                return image_height.div_ceil(block_height);
            }
        }
        let mut block_height = self.rows_per_strip().unwrap_or(0);
        if block_height == 0 || block_height > image_height {
            block_height = image_height;
        }
        image_height.div_ceil(block_height)
    }

    /// Pixel bounds of block (col, row).
    ///
    /// Tiled blocks always get the full nominal tile rectangle, even
    /// when it overhangs the image edge. Strip blocks span the image
    /// width; the last strip's height is clipped to the image-height
    /// remainder. Out-of-range coordinates yield the empty rectangle.
    pub fn block_bounds(&self, col: u32, row: u32) -> BlockRect {
        let (across, down) = (self.blocks_across(), self.blocks_down());
        if col >= across || row >= down {
            return BlockRect::default();
        }

        if self.tile_width().is_some() {
            let block_width = self.tile_width().unwrap_or(0);
            let block_height = self.tile_length().unwrap_or(0);

            let xmin = col * block_width;
            let ymin = row * block_height;
            BlockRect::new(xmin, ymin, xmin + block_width, ymin + block_height)
        } else {
            let image_width = self.image_width();
            let image_height = self.image_height();

            let mut block_height = self.rows_per_strip().unwrap_or(0);
            if block_height == 0 || block_height > image_height {
                block_height = image_height;
            }

            let mut height = block_height;
            if row == down - 1 && image_height % block_height != 0 {
                height = image_height % block_height;
            }

            let ymin = row * block_height;
            BlockRect::new(0, ymin, image_width, ymin + height)
        }
    }

    /// Byte offset of block (col, row) in the source stream.
    ///
    /// Returns 0 for out-of-range coordinates, and, per the layout
    /// invariant, when the offsets array length does not equal
    /// `blocks_across * blocks_down`. A mismatched layout means the
    /// directory describes no usable data, not a truncated one.
    pub fn block_offset(&self, col: u32, row: u32) -> u64 {
        let (across, down) = (self.blocks_across(), self.blocks_down());
        if col >= across || row >= down {
            return 0;
        }
        let Some(offsets) = self.block_offsets() else {
            return 0;
        };
        if offsets.len() != (across * down) as usize {
            debug!(
                expected = across * down,
                actual = offsets.len(),
                "block offsets array length mismatch, treating as no data"
            );
            return 0;
        }
        offsets[(row * across + col) as usize]
    }

    /// Compressed byte count of block (col, row).
    ///
    /// Same out-of-range and length-mismatch behavior as
    /// [`Self::block_offset`].
    pub fn block_byte_count(&self, col: u32, row: u32) -> u64 {
        let (across, down) = (self.blocks_across(), self.blocks_down());
        if col >= across || row >= down {
            return 0;
        }
        let Some(counts) = self.block_byte_counts() else {
            return 0;
        };
        if counts.len() != (across * down) as usize {
            debug!(
                expected = across * down,
                actual = counts.len(),
                "block byte counts array length mismatch, treating as no data"
            );
            return 0;
        }
        counts[(row * across + col) as usize]
    }
}

// =============================================================================
// Tests
// =============================================================================
