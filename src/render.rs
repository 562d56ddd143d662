//! Turns an iterated grid and a palette into an RGBA pixel buffer.
//!
//! The grid's arena is column-major with row 0 at the bottom, while
//! image encoders want row-major scanlines starting at the top, so
//! the renderer walks scanlines and flips the row index.  One grid
//! point becomes one pixel; the buffer is ready to hand to a PNG
//! encoder as-is.

use itertools::iproduct;

use grid::Grid;
use palette::{Color, ColorPalette};

/// A row-major, top-down RGBA8 image, one pixel per grid point.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The raw scanlines, four bytes per pixel, top row first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The color at image coordinates (`x`, `y`), with y = 0 at the
    /// top of the image, or `None` outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y * self.width + x) * 4;
        let channels = &self.data[offset..offset + 4];
        Some(Color::rgba(channels[0], channels[1], channels[2], channels[3]))
    }
}

/// Renders every point of an iterated grid through `palette`.  Grid
/// row 0 is the bottom of the scene and lands on the bottom scanline
/// of the image.
pub fn render(grid: &Grid, palette: &dyn ColorPalette) -> PixelBuffer {
    let width = grid.width();
    let height = grid.height();
    let points = grid.points();

    let mut data = Vec::with_capacity(width * height * 4);
    for (scanline, col) in iproduct!(0..height, 0..width) {
        let row = height - 1 - scanline;
        let point = &points[col * height + row];
        debug_assert!(point.processed(), "rendering a grid that was never iterated");
        data.extend_from_slice(&palette.color(point).channels());
    }

    PixelBuffer {
        width,
        height,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::Complex;
    use palette::LinearPalette;

    const GREEN: Color = Color::rgb(0, 0xff, 0);
    const RED: Color = Color::rgb(0xff, 0, 0);
    const BLACK: Color = Color::rgb(0, 0, 0);

    #[test]
    fn buffer_dimensions_match_the_grid() {
        let mut grid = Grid::new(Complex::new(0.0, 0.0), 3, 2, 0.5).unwrap();
        grid.iterate_all_with_threads(1);
        let palette = LinearPalette::new(&grid, GREEN, RED, BLACK);

        let buffer = render(&grid, &palette);
        assert_eq!(buffer.width(), 3);
        assert_eq!(buffer.height(), 2);
        assert_eq!(buffer.as_bytes().len(), 3 * 2 * 4);
    }

    #[test]
    fn grid_row_zero_lands_on_the_bottom_scanline() {
        // One column, two rows: the sample at (0, 0) sits at the
        // origin and stays in the set, the one above it at (0, 3)
        // escapes immediately.
        let mut grid = Grid::new(Complex::new(1.5, 3.0), 1, 2, 3.0).unwrap();
        grid.iterate_all_with_threads(1);
        assert!(grid.point_at(0, 0).unwrap().in_set());
        assert!(!grid.point_at(0, 1).unwrap().in_set());

        let palette = LinearPalette::new(&grid, GREEN, RED, BLACK);
        let buffer = render(&grid, &palette);

        // Top scanline first: the escaping point renders above the
        // member.
        assert_eq!(buffer.pixel(0, 1), Some(BLACK));
        assert_ne!(buffer.pixel(0, 0), Some(BLACK));
    }

    #[test]
    fn pixel_lookup_is_bounds_checked() {
        let mut grid = Grid::new(Complex::new(0.0, 0.0), 2, 2, 0.5).unwrap();
        grid.iterate_all_with_threads(1);
        let palette = LinearPalette::new(&grid, GREEN, RED, BLACK);

        let buffer = render(&grid, &palette);
        assert!(buffer.pixel(0, 0).is_some());
        assert!(buffer.pixel(2, 0).is_none());
        assert!(buffer.pixel(0, 2).is_none());
    }
}
