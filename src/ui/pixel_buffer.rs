//! Owned RGB565 pixel arena
//!
//! Every drawing primitive in `ui` writes through `PixelBuffer::put_pixel`, which
//! is the single place coordinates get bounds-checked. Callers work in signed
//! coordinates so text and art can start partially off-screen.

/// Row-major 16-bit colour buffer, allocated once and reused every frame
#[derive(Clone)]
pub struct PixelBuffer {
    pixels: Vec<u16>,
    width: usize,
    height: usize,
    stride: usize,
}

impl PixelBuffer {
    /// Allocate a tightly packed buffer (stride == width)
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_stride(width, height, width)
    }

    /// Allocate a buffer whose rows are `stride` pixels apart
    ///
    /// A stride smaller than the width is raised to the width.
    pub fn with_stride(width: usize, height: usize, stride: usize) -> Self {
        let stride = stride.max(width);
        Self {
            pixels: vec![0; stride * height],
            width,
            height,
            stride,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    /// Visible part of row `y` (padding past `width` excluded)
    pub fn row(&self, y: usize) -> &[u16] {
        let start = y * self.stride;
        &self.pixels[start..start + self.width]
    }

    pub fn clear(&mut self, colour: u16) {
        self.pixels.fill(colour);
    }

    /// Write one pixel; anything outside the visible area is dropped
    #[inline]
    pub fn put_pixel(&mut self, x: i32, y: i32, colour: u16) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        self.pixels[y * self.stride + x] = colour;
    }

    /// Read one pixel, `None` when outside the visible area
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u16> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.stride + x])
    }

    /// Fill a rectangle, clipped to the buffer
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, colour: u16) {
        // Intersect with the screen first so the inner loop is a plain slice fill
        let x_min = x.max(0) as i64;
        let y_min = y.max(0) as i64;
        let x_max = (x as i64 + w as i64).min(self.width as i64);
        let y_max = (y as i64 + h as i64).min(self.height as i64);
        if x_max <= x_min || y_max <= y_min {
            return;
        }

        for row in y_min as usize..y_max as usize {
            let start = row * self.stride;
            self.pixels[start + x_min as usize..start + x_max as usize].fill(colour);
        }
    }

    /// Count visible pixels equal to `colour`
    #[cfg(test)]
    pub fn count_colour(&self, colour: u16) -> usize {
        (0..self.height)
            .map(|y| self.row(y).iter().filter(|&&p| p == colour).count())
            .sum()
    }
}
