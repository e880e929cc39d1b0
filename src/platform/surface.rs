//! Display memory the compositor presents into

/// Visible size plus the distance between rows, all in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: usize,
    pub height: usize,
    /// Row pitch in pixels, >= width (hardware rows may be padded)
    pub stride_px: usize,
}

impl Geometry {
    /// Pixels the backing memory must hold
    pub fn pixel_count(&self) -> usize {
        self.stride_px * self.height
    }
}

/// Writable RGB565 display memory
pub trait Surface {
    fn geometry(&self) -> Geometry;

    /// The whole region, `geometry().pixel_count()` pixels, row `y` starting at `y * stride_px`
    fn pixels_mut(&mut self) -> &mut [u16];
}

/// Heap-backed surface for headless runs and tests
pub struct MemorySurface {
    geometry: Geometry,
    pixels: Vec<u16>,
}

impl MemorySurface {
    pub fn new(width: usize, height: usize, stride_px: usize) -> Self {
        let geometry = Geometry {
            width,
            height,
            stride_px: stride_px.max(width),
        };
        Self {
            pixels: vec![0; geometry.pixel_count()],
            geometry,
        }
    }

    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    /// Visible part of row `y`
    pub fn row(&self, y: usize) -> &[u16] {
        let start = y * self.geometry.stride_px;
        &self.pixels[start..start + self.geometry.width]
    }
}

impl Surface for MemorySurface {
    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn pixels_mut(&mut self) -> &mut [u16] {
        &mut self.pixels
    }
}
