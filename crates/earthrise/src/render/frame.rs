//! Output frame buffer

/// Background colour outside the Earth disk
pub const BACKGROUND: [u8; 3] = [0, 0, 0];

/// A width × height RGB8 frame, row-major, top row first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterFrame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterFrame {
    /// Create a frame filled with the background colour
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: BACKGROUND.repeat(width as usize * height as usize),
        }
    }

    /// Width in pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB bytes, `3 * width` per row
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the frame and return its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Fill every pixel with the background colour
    pub fn clear(&mut self) {
        self.data
            .chunks_exact_mut(3)
            .for_each(|px| px.copy_from_slice(&BACKGROUND));
    }

    /// Clear the frame, resizing it first if the dimensions differ
    pub fn reset(&mut self, width: u32, height: u32) {
        if (self.width, self.height) != (width, height) {
            self.width = width;
            self.height = height;
            self.data.resize(width as usize * height as usize * 3, 0);
        }
        self.clear();
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }

    /// Pixel at (`x`, `y`), or `None` outside the frame
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Write a pixel; writes outside the frame are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.offset(x, y);
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    fn plot(&mut self, x: i64, y: i64, rgb: [u8; 3]) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as u32, y as u32, rgb);
        }
    }

    /// Bresenham line between two screen points, clipped to the frame
    pub fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), rgb: [u8; 3]) {
        let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
        let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, rgb);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Fraction of pixels that differ from the background
    pub fn lit_fraction(&self) -> f64 {
        let total = self.width as usize * self.height as usize;
        if total == 0 {
            return 0.0;
        }
        let lit = self.data.chunks_exact(3).filter(|px| *px != BACKGROUND).count();
        lit as f64 / total as f64
    }
}
