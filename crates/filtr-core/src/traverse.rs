//! Traversal strategies over a pixel buffer.
//!
//! Every filter visits pixels through one of five iterators. Each is lazy,
//! finite and built fresh per call; none borrows the buffer, so a filter can
//! read and write the buffer while iterating.
//!
//! | Strategy       | Yields                                   | Order                          |
//! |----------------|------------------------------------------|--------------------------------|
//! | [`Linear`]     | [`PixelOffset`]                          | last pixel first               |
//! | [`Matrix`]     | [`MatrixStep`] (1-based `x`, `y`)        | same as [`Linear`]             |
//! | [`MatrixArea`] | [`AreaStep`] (3x3 neighborhood)          | same as [`Linear`]             |
//! | [`Blocks`]     | [`Tile`]                                 | row-major, top-left first      |
//! | [`Radial`]     | `(x, y)` sample centers                  | row-major, top-left first      |
//!
//! Neighborhood edges use border replication: a neighbor outside the buffer
//! resolves to the nearest pixel inside it.

use crate::buffer::{PixelOffset, Shape};
use crate::rect::Rect;

/// Every pixel once, in strictly decreasing raster order.
#[derive(Debug, Clone)]
pub struct Linear {
    shape: Shape,
    remaining: usize,
}

impl Linear {
    /// Traversal over the whole shape.
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            remaining: shape.pixel_count(),
        }
    }
}

impl Iterator for Linear {
    type Item = PixelOffset;

    #[inline]
    fn next(&mut self) -> Option<PixelOffset> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.shape.offset_of_index(self.remaining))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Linear {}

/// One [`Matrix`] step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixStep {
    /// Column, 1-based
    pub x: u32,
    /// Row, 1-based
    pub y: u32,
    /// The pixel
    pub offset: PixelOffset,
}

/// Every pixel once with 1-based coordinates, bottom-right first.
#[derive(Debug, Clone)]
pub struct Matrix {
    inner: Linear,
}

impl Matrix {
    /// Traversal over the whole shape.
    pub fn new(shape: Shape) -> Self {
        Self {
            inner: Linear::new(shape),
        }
    }
}

impl Iterator for Matrix {
    type Item = MatrixStep;

    #[inline]
    fn next(&mut self) -> Option<MatrixStep> {
        let offset = self.inner.next()?;
        let (x, y) = offset.coords();
        Some(MatrixStep {
            x: x + 1,
            y: y + 1,
            offset,
        })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Matrix {}

/// One [`MatrixArea`] step: a pixel with its border-replicated 3x3
/// neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaStep {
    /// Column, 1-based
    pub x: u32,
    /// Row, 1-based
    pub y: u32,
    /// The pixel
    pub offset: PixelOffset,
    /// Up-left diagonal neighbor; row and column each clamp at the edge
    pub prev: PixelOffset,
    /// Down-right diagonal neighbor; row and column each clamp at the edge
    pub next: PixelOffset,
}

impl AreaStep {
    /// Neighbor at `(dx, dy)` relative to this pixel, with the column clamped
    /// to `1..=width` and the row to `1..=height`.
    #[inline]
    pub fn at(&self, dx: i32, dy: i32) -> PixelOffset {
        let shape = self.offset.shape();
        let x = (self.x as i64 + dx as i64).clamp(1, shape.width() as i64) as u32;
        let y = (self.y as i64 + dy as i64).clamp(1, shape.height() as i64) as u32;
        shape.offset_of(x - 1, y - 1)
    }

    /// The full neighborhood as `[row][column]`, row 0 above, column 0 left.
    pub fn neighborhood(&self) -> [[PixelOffset; 3]; 3] {
        let row = |dy| [self.at(-1, dy), self.at(0, dy), self.at(1, dy)];
        [row(-1), row(0), row(1)]
    }
}

/// Every pixel once with its 3x3 neighborhood, bottom-right first.
#[derive(Debug, Clone)]
pub struct MatrixArea {
    inner: Matrix,
}

impl MatrixArea {
    /// Traversal over the whole shape.
    pub fn new(shape: Shape) -> Self {
        Self {
            inner: Matrix::new(shape),
        }
    }
}

impl Iterator for MatrixArea {
    type Item = AreaStep;

    #[inline]
    fn next(&mut self) -> Option<AreaStep> {
        let MatrixStep { x, y, offset } = self.inner.next()?;
        let mut step = AreaStep {
            x,
            y,
            offset,
            prev: offset,
            next: offset,
        };
        step.prev = step.at(-1, -1);
        step.next = step.at(1, 1);
        Some(step)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for MatrixArea {}

/// One tile of a [`Blocks`] traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Column of the tile origin relative to the region
    pub x: u32,
    /// Row of the tile origin relative to the region
    pub y: u32,
    /// The tile in buffer coordinates; shrunk at the region's right and
    /// bottom edges
    pub rect: Rect,
}

/// `blocksize x blocksize` tiles over a region, row-major.
#[derive(Debug, Clone)]
pub struct Blocks {
    region: Rect,
    size: u32,
    x: u32,
    y: u32,
}

impl Blocks {
    /// Tiles covering `region`. A block size of zero is treated as one.
    pub fn new(region: Rect, blocksize: u32) -> Self {
        Self {
            region,
            size: blocksize.max(1),
            x: 0,
            y: 0,
        }
    }

    fn columns(&self) -> usize {
        self.region.width.div_ceil(self.size) as usize
    }

    fn rows(&self) -> usize {
        self.region.height.div_ceil(self.size) as usize
    }
}

impl Iterator for Blocks {
    type Item = Tile;

    fn next(&mut self) -> Option<Tile> {
        if self.y >= self.region.height || self.region.width == 0 {
            return None;
        }
        let (x, y) = (self.x, self.y);
        let tile = Tile {
            x,
            y,
            rect: Rect {
                left: self.region.left + x,
                top: self.region.top + y,
                width: self.size.min(self.region.width - x),
                height: self.size.min(self.region.height - y),
            },
        };
        self.x += self.size;
        if self.x >= self.region.width {
            self.x = 0;
            self.y += self.size;
        }
        Some(tile)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.y >= self.region.height || self.region.width == 0 {
            return (0, Some(0));
        }
        let cols = self.columns();
        let done = (self.y / self.size) as usize * cols + (self.x / self.size) as usize;
        let n = cols * self.rows() - done;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Blocks {}

/// Sample centers spaced `2 * radius / density` over
/// `[0, width + radius) x [0, height + radius)` of a region.
///
/// The grid overscans by one radius so dabs at the right and bottom edges
/// still cover the region. Centers are relative to the region origin. A
/// non-finite or non-positive spacing yields the single center `(0, 0)`.
#[derive(Debug, Clone)]
pub struct Radial {
    limit_x: f64,
    limit_y: f64,
    step: f64,
    x: f64,
    y: f64,
    done: bool,
}

impl Radial {
    /// Grid over `region` for dabs of `radius` at `density`.
    pub fn new(region: Rect, radius: f64, density: f64) -> Self {
        let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
        Self {
            limit_x: region.width as f64 + radius,
            limit_y: region.height as f64 + radius,
            step: 2.0 * radius / density,
            x: 0.0,
            y: 0.0,
            done: false,
        }
    }

    /// Distance between neighboring centers.
    pub fn step(&self) -> f64 {
        self.step
    }
}

impl Iterator for Radial {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<(f64, f64)> {
        if self.done {
            return None;
        }
        let item = (self.x, self.y);
        if !(self.step.is_finite() && self.step > 0.0) {
            self.done = true;
            return Some(item);
        }
        self.x += self.step;
        if self.x >= self.limit_x {
            self.x = 0.0;
            self.y += self.step;
            if self.y >= self.limit_y {
                self.done = true;
            }
        }
        Some(item)
    }
}

impl std::iter::FusedIterator for Radial {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PixelBuffer;
    use std::collections::HashSet;

    fn shape(w: u32, h: u32) -> Shape {
        PixelBuffer::new(w, h).unwrap().shape()
    }

    #[test]
    fn test_linear_visits_each_pixel_once() {
        let s = shape(7, 5);
        let offsets: Vec<_> = Linear::new(s).collect();
        assert_eq!(offsets.len(), 35);
        let unique: HashSet<_> = offsets.iter().map(|o| o.r()).collect();
        assert_eq!(unique.len(), 35);
        for o in &offsets {
            assert_eq!(o.g(), o.r() + 1);
            assert_eq!(o.b(), o.r() + 2);
            assert_eq!(o.a(), o.r() + 3);
        }
    }

    #[test]
    fn test_linear_order_is_decreasing() {
        let offsets: Vec<_> = Linear::new(shape(3, 2)).map(|o| o.r()).collect();
        assert_eq!(offsets, vec![20, 16, 12, 8, 4, 0]);
    }

    #[test]
    fn test_linear_restartable() {
        let s = shape(2, 2);
        assert_eq!(Linear::new(s).count(), 4);
        assert_eq!(Linear::new(s).count(), 4);
        assert_eq!(Linear::new(s).len(), 4);
    }

    #[test]
    fn test_matrix_coordinates() {
        let steps: Vec<_> = Matrix::new(shape(3, 2)).collect();
        assert_eq!(steps.len(), 6);
        assert_eq!((steps[0].x, steps[0].y), (3, 2));
        assert_eq!((steps[5].x, steps[5].y), (1, 1));
        assert_eq!(steps[5].offset.r(), 0);
        assert_eq!((steps[3].x, steps[3].y), (3, 1));
    }

    #[test]
    fn test_matrix_area_top_left() {
        let s = shape(4, 4);
        let step = MatrixArea::new(s).last().unwrap();
        assert_eq!((step.x, step.y), (1, 1));
        assert_eq!(step.prev, step.offset);
        assert_eq!(step.at(-1, -1), step.offset);
        assert_eq!(step.at(1, 0).coords(), (1, 0));
    }

    #[test]
    fn test_matrix_area_bottom_row() {
        let s = shape(4, 3);
        for step in MatrixArea::new(s).filter(|st| st.y == 3) {
            // the row stays, the column still moves right
            assert_eq!(step.next.coords(), (step.x.min(3), 2));
            assert_eq!(step.prev.coords(), (step.x.saturating_sub(2), 1));
        }
    }

    #[test]
    fn test_matrix_area_right_column_clamps() {
        let s = shape(4, 3);
        let step = MatrixArea::new(s).next().unwrap();
        assert_eq!((step.x, step.y), (4, 3));
        assert_eq!(step.at(1, 0), step.offset);
        assert_eq!(step.at(-1, -1).coords(), (2, 1));
        assert_eq!(step.next, step.offset);
        assert_eq!(step.prev.coords(), (2, 1));
    }

    #[test]
    fn test_matrix_area_diagonals() {
        let s = shape(3, 3);
        let step = MatrixArea::new(s).find(|st| st.x == 2 && st.y == 2).unwrap();
        assert_eq!(step.prev.coords(), (0, 0));
        assert_eq!(step.next.coords(), (2, 2));

        let corner = MatrixArea::new(s).find(|st| st.x == 1 && st.y == 3).unwrap();
        assert_eq!(corner.prev.coords(), (0, 1));
        assert_eq!(corner.next.coords(), (1, 2));
    }

    #[test]
    fn test_matrix_area_interior_neighborhood() {
        let s = shape(5, 5);
        let step = MatrixArea::new(s).find(|st| st.x == 3 && st.y == 3).unwrap();
        let n = step.neighborhood();
        assert_eq!(n[0][0].coords(), (1, 1));
        assert_eq!(n[1][1], step.offset);
        assert_eq!(n[2][2].coords(), (3, 3));
    }

    #[test]
    fn test_matrix_area_single_pixel() {
        let s = shape(1, 1);
        let step = MatrixArea::new(s).next().unwrap();
        for row in step.neighborhood() {
            for o in row {
                assert_eq!(o, step.offset);
            }
        }
    }

    #[test]
    fn test_blocks_shrink_at_edges() {
        let region = Rect { left: 0, top: 0, width: 5, height: 3 };
        let tiles: Vec<_> = Blocks::new(region, 2).collect();
        assert_eq!(tiles.len(), 6);
        assert_eq!((tiles[0].x, tiles[0].y), (0, 0));
        assert_eq!((tiles[1].x, tiles[1].y), (2, 0));
        assert_eq!(tiles[2].rect, Rect { left: 4, top: 0, width: 1, height: 2 });
        assert_eq!(tiles[5].rect, Rect { left: 4, top: 2, width: 1, height: 1 });
        let covered: u64 = tiles.iter().map(|t| t.rect.area()).sum();
        assert_eq!(covered, region.area());
    }

    #[test]
    fn test_blocks_offset_region_and_len() {
        let region = Rect { left: 3, top: 4, width: 4, height: 4 };
        let mut blocks = Blocks::new(region, 3);
        assert_eq!(blocks.len(), 4);
        let first = blocks.next().unwrap();
        assert_eq!(first.rect, Rect { left: 3, top: 4, width: 3, height: 3 });
        assert_eq!(blocks.len(), 3);
    }

    #[test]
    fn test_blocks_zero_size() {
        let region = Rect { left: 0, top: 0, width: 2, height: 2 };
        assert_eq!(Blocks::new(region, 0).count(), 4);
    }

    #[test]
    fn test_radial_grid() {
        let region = Rect { left: 0, top: 0, width: 10, height: 10 };
        let centers: Vec<_> = Radial::new(region, 5.0, 1.0).collect();
        // step 10 over [0, 15)
        assert_eq!(centers, vec![(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0)]);
    }

    #[test]
    fn test_radial_degenerate_step() {
        let region = Rect { left: 0, top: 0, width: 10, height: 10 };
        assert_eq!(Radial::new(region, 5.0, 0.0).count(), 1);
        assert_eq!(Radial::new(region, 0.0, 1.0).count(), 1);
        assert_eq!(Radial::new(region, f64::NAN, 1.0).count(), 1);
    }
}
