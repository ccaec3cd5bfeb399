//! Raw frame buffer

/// Frame width in pixels
pub const FRAME_WIDTH: usize = 35;
/// Frame height in pixels
pub const FRAME_HEIGHT: usize = 35;

/// One raw 35x35 image from the sensor array
///
/// Pixels are stored row-major, top-left first. The buffer is owned by the
/// caller and reused across captures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Pixel intensities, `pixels[row][column]`
    pub pixels: [[u8; FRAME_WIDTH]; FRAME_HEIGHT],
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    /// Create an all-zero frame
    pub const fn new() -> Self {
        Self {
            pixels: [[0; FRAME_WIDTH]; FRAME_HEIGHT],
        }
    }

    /// Reset every pixel to zero
    pub fn clear(&mut self) {
        self.pixels = [[0; FRAME_WIDTH]; FRAME_HEIGHT];
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &[u8; FRAME_WIDTH]> {
        self.pixels.iter()
    }

    /// Pixel at `row`, `col`
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.pixels.get(row)?.get(col).copied()
    }
}
