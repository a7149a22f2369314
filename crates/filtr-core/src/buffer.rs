//! RGBA8 pixel buffer.
//!
//! [`PixelBuffer`] owns `width * height * 4` bytes, row-major, one byte per
//! channel in R, G, B, A order. The length invariant is established at
//! construction and never changes: operations that alter dimensions return a
//! new buffer.
//!
//! Per-pixel access goes through [`PixelOffset`], which has no public
//! constructor. Offsets come from the traversal strategies in
//! [`crate::traverse`] or from the checked [`PixelBuffer::offset`] lookup, so
//! an offset always addresses a whole pixel of a buffer with its shape.
//!
//! # Example
//!
//! ```rust
//! use filtr_core::PixelBuffer;
//!
//! let mut buf = PixelBuffer::new(2, 2).unwrap();
//! let at = buf.offset(1, 0).unwrap();
//! buf.write(at, [255, 0, 0, 255]);
//! assert_eq!(buf.read(at), [255, 0, 0, 255]);
//! assert_eq!(buf.bytes()[4..8], [255, 0, 0, 255]);
//! ```

use crate::error::{Error, Result};
use crate::rect::{Rect, RectRequest};

/// Dimensions of a [`PixelBuffer`].
///
/// Shapes pass the same checks as buffers: a shape is always non-empty,
/// its byte length fits in `usize` and it holds at most
/// [`PixelBuffer::MAX_PIXELS`] pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u32,
    height: u32,
}

impl Shape {
    /// Validates a size without allocating a buffer for it.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidDimensions`] for a zero side or a size
    /// over the pixel limit.
    pub fn checked(width: u32, height: u32) -> Result<Self> {
        checked_shape(width, height)
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Number of bytes in a buffer of this shape.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.pixel_count() * 4
    }

    #[inline]
    pub(crate) fn offset_of(&self, x: u32, y: u32) -> PixelOffset {
        debug_assert!(x < self.width && y < self.height);
        PixelOffset {
            byte: (y as usize * self.width as usize + x as usize) * 4,
            shape: *self,
        }
    }

    #[inline]
    pub(crate) fn offset_of_index(&self, index: usize) -> PixelOffset {
        debug_assert!(index < self.pixel_count());
        PixelOffset {
            byte: index * 4,
            shape: *self,
        }
    }
}

/// Byte offset of one pixel inside a buffer of a given [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelOffset {
    byte: usize,
    shape: Shape,
}

impl PixelOffset {
    /// Offset of the red byte.
    #[inline]
    pub fn r(&self) -> usize {
        self.byte
    }

    /// Offset of the green byte.
    #[inline]
    pub fn g(&self) -> usize {
        self.byte + 1
    }

    /// Offset of the blue byte.
    #[inline]
    pub fn b(&self) -> usize {
        self.byte + 2
    }

    /// Offset of the alpha byte.
    #[inline]
    pub fn a(&self) -> usize {
        self.byte + 3
    }

    /// All four channel offsets `[r, g, b, a]`.
    #[inline]
    pub fn channels(&self) -> [usize; 4] {
        [self.byte, self.byte + 1, self.byte + 2, self.byte + 3]
    }

    /// Pixel index in raster order.
    #[inline]
    pub fn index(&self) -> usize {
        self.byte / 4
    }

    /// Zero-based `(x, y)` coordinates.
    #[inline]
    pub fn coords(&self) -> (u32, u32) {
        let i = self.index();
        let w = self.shape.width as usize;
        ((i % w) as u32, (i / w) as u32)
    }

    /// Shape of the buffer this offset belongs to.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }
}

/// Plain copy of a buffer for host history/undo.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Snapshot {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// RGBA bytes, row-major
    pub pixel_bytes: Vec<u8>,
}

/// Owned RGBA8 raster.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    shape: Shape,
    data: Vec<u8>,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.shape.width)
            .field("height", &self.shape.height)
            .finish_non_exhaustive()
    }
}

fn checked_shape(width: u32, height: u32) -> Result<Shape> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(
            width,
            height,
            "width and height must be non-zero",
        ));
    }
    let pixels = (width as usize)
        .checked_mul(height as usize)
        .filter(|n| n.checked_mul(4).is_some())
        .ok_or_else(|| Error::invalid_dimensions(width, height, "byte length overflows usize"))?;
    if pixels > PixelBuffer::MAX_PIXELS {
        return Err(Error::invalid_dimensions(
            width,
            height,
            format!("exceeds the limit of {} pixels", PixelBuffer::MAX_PIXELS),
        ));
    }
    Ok(Shape { width, height })
}

impl PixelBuffer {
    /// Largest pixel count a buffer may hold (1 GiB of RGBA8).
    pub const MAX_PIXELS: usize = 1 << 28;

    /// Creates a zero-filled (transparent black) buffer.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let shape = checked_shape(width, height)?;
        Ok(Self {
            shape,
            data: vec![0; shape.byte_len()],
        })
    }

    /// Creates a buffer with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let shape = checked_shape(width, height)?;
        let data = rgba.iter().copied().cycle().take(shape.byte_len()).collect();
        Ok(Self { shape, data })
    }

    /// Wraps existing RGBA bytes.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let shape = checked_shape(width, height)?;
        if data.len() != shape.byte_len() {
            return Err(Error::LengthMismatch {
                width,
                height,
                expected: shape.byte_len(),
                got: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Rebuilds a buffer from a host snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        Self::from_rgba(snapshot.width, snapshot.height, snapshot.pixel_bytes)
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.shape.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.shape.height
    }

    /// Buffer dimensions.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Raw RGBA bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the buffer, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Copies the buffer out for host history.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.shape.width,
            height: self.shape.height,
            pixel_bytes: self.data.clone(),
        }
    }

    /// Reads the four channels at `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at` was taken from a buffer of another shape.
    #[inline]
    pub fn read(&self, at: PixelOffset) -> [u8; 4] {
        assert_eq!(at.shape, self.shape, "offset from a different buffer shape");
        let b = at.byte;
        [self.data[b], self.data[b + 1], self.data[b + 2], self.data[b + 3]]
    }

    /// Writes the four channels at `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at` was taken from a buffer of another shape.
    #[inline]
    pub fn write(&mut self, at: PixelOffset, rgba: [u8; 4]) {
        assert_eq!(at.shape, self.shape, "offset from a different buffer shape");
        self.data[at.byte..at.byte + 4].copy_from_slice(&rgba);
    }

    /// Reads one channel (0 = R .. 3 = A) at `at`.
    #[inline]
    pub fn channel(&self, at: PixelOffset, channel: usize) -> u8 {
        debug_assert!(channel < 4);
        self.read(at)[channel & 3]
    }

    /// Checked lookup of a zero-based coordinate.
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> Option<PixelOffset> {
        (x < self.shape.width && y < self.shape.height).then(|| self.shape.offset_of(x, y))
    }

    /// Lookup with coordinates clamped to the buffer edge.
    #[inline]
    pub fn offset_clamped(&self, x: i64, y: i64) -> PixelOffset {
        let x = x.clamp(0, self.shape.width as i64 - 1) as u32;
        let y = y.clamp(0, self.shape.height as i64 - 1) as u32;
        self.shape.offset_of(x, y)
    }

    /// Pixel at a zero-based coordinate, or `None` outside the buffer.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.offset(x, y).map(|at| self.read(at))
    }

    /// Pixel at a coordinate clamped to the buffer edge.
    #[inline]
    pub fn get_clamped(&self, x: i64, y: i64) -> [u8; 4] {
        self.read(self.offset_clamped(x, y))
    }

    /// Sets every pixel to `rgba`.
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Iterates pixels in raster order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }

    /// Copies a region into a new buffer.
    ///
    /// The region is clipped to the buffer first, so the result is never
    /// empty.
    pub fn crop(&self, rect: Rect) -> PixelBuffer {
        let rect = RectRequest::from(rect).clamp(self.shape);
        let shape = Shape {
            width: rect.width,
            height: rect.height,
        };
        let row = rect.width as usize * 4;
        let mut data = Vec::with_capacity(shape.byte_len());
        for y in rect.top..rect.bottom() {
            let start = self.shape.offset_of(rect.left, y).byte;
            data.extend_from_slice(&self.data[start..start + row]);
        }
        PixelBuffer { shape, data }
    }

    /// Copies `src` into this buffer with its top-left corner at `(left, top)`.
    ///
    /// Parts of `src` falling outside this buffer are dropped.
    pub fn paste(&mut self, src: &PixelBuffer, left: i64, top: i64) {
        let (dw, dh) = (self.shape.width as i64, self.shape.height as i64);
        let x0 = left.max(0);
        let x1 = (left + src.width() as i64).min(dw);
        let y0 = top.max(0);
        let y1 = (top + src.height() as i64).min(dh);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let row = (x1 - x0) as usize * 4;
        for y in y0..y1 {
            let d = self.shape.offset_of(x0 as u32, y as u32).byte;
            let s = src
                .shape
                .offset_of((x0 - left) as u32, (y - top) as u32)
                .byte;
            self.data[d..d + row].copy_from_slice(&src.data[s..s + row]);
        }
    }

    /// Returns this buffer if it is already `width x height`, otherwise a
    /// transparent buffer of that size with this one drawn at the origin.
    pub fn fit_to(self, width: u32, height: u32) -> Result<PixelBuffer> {
        if self.width() == width && self.height() == height {
            return Ok(self);
        }
        let mut out = PixelBuffer::new(width, height)?;
        out.paste(&self, 0, 0);
        Ok(out)
    }

    /// Fails unless both buffers have the same dimensions.
    pub fn ensure_same_shape(&self, other: &PixelBuffer) -> Result<()> {
        if self.shape != other.shape {
            return Err(Error::dimension_mismatch(
                (self.width(), self.height()),
                (other.width(), other.height()),
            ));
        }
        Ok(())
    }
}

impl From<Rect> for RectRequest {
    fn from(r: Rect) -> Self {
        RectRequest::new(r.left as f64, r.top as f64, r.width as f64, r.height as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "different buffer shape")]
    fn test_write_rejects_offset_of_same_length_buffer() {
        // 4x1 and 2x2 hold the same number of bytes
        let wide = PixelBuffer::new(4, 1).unwrap();
        let mut square = PixelBuffer::new(2, 2).unwrap();
        let at = wide.offset(2, 0).unwrap();
        square.write(at, [1, 2, 3, 4]);
    }

    #[test]
    #[should_panic(expected = "different buffer shape")]
    fn test_read_rejects_offset_of_larger_buffer() {
        let big = PixelBuffer::new(8, 8).unwrap();
        let small = PixelBuffer::new(2, 2).unwrap();
        small.read(big.offset(7, 7).unwrap());
    }

    #[test]
    fn test_offsets_shared_between_same_shapes() {
        let a = PixelBuffer::filled(3, 2, [9, 8, 7, 6]).unwrap();
        let mut b = PixelBuffer::new(3, 2).unwrap();
        let at = a.offset(1, 1).unwrap();
        b.write(at, a.read(at));
        assert_eq!(b.get(1, 1), Some([9, 8, 7, 6]));
    }

    #[test]
    fn test_shape_checked() {
        let shape = Shape::checked(3, 2).unwrap();
        assert_eq!((shape.width(), shape.height()), (3, 2));
        assert!(Shape::checked(0, 2).is_err());
        assert!(Shape::checked(1 << 15, 1 << 14).is_err());
    }

    #[test]
    fn test_pixel_limit() {
        let err = PixelBuffer::new(100_000, 100_000).unwrap_err();
        assert!(err.is_invalid_dimensions());
        assert!(err.to_string().contains("limit"));
        assert!(PixelBuffer::new(u32::MAX, u32::MAX).is_err());
    }

    #[test]
    fn test_new_zero_filled() {
        let buf = PixelBuffer::new(3, 2).unwrap();
        assert_eq!(buf.bytes().len(), 24);
        assert!(buf.bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_new_rejects_zero() {
        assert!(PixelBuffer::new(0, 5).unwrap_err().is_invalid_dimensions());
        assert!(PixelBuffer::new(5, 0).unwrap_err().is_invalid_dimensions());
    }

    #[test]
    fn test_from_rgba_length() {
        assert!(PixelBuffer::from_rgba(2, 2, vec![0; 16]).is_ok());
        let err = PixelBuffer::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert!(err.is_length_mismatch());
    }

    #[test]
    fn test_offset_channels() {
        let buf = PixelBuffer::new(4, 3).unwrap();
        let at = buf.offset(2, 1).unwrap();
        assert_eq!(at.channels(), [24, 25, 26, 27]);
        assert_eq!(at.index(), 6);
        assert_eq!(at.coords(), (2, 1));
        assert!(buf.offset(4, 0).is_none());
        assert!(buf.offset(0, 3).is_none());
    }

    #[test]
    fn test_offset_clamped() {
        let buf = PixelBuffer::new(4, 3).unwrap();
        assert_eq!(buf.offset_clamped(-5, -1).coords(), (0, 0));
        assert_eq!(buf.offset_clamped(10, 10).coords(), (3, 2));
    }

    #[test]
    fn test_filled_and_pixels() {
        let buf = PixelBuffer::filled(2, 2, [1, 2, 3, 4]).unwrap();
        assert_eq!(buf.pixels().count(), 4);
        assert!(buf.pixels().all(|p| p == [1, 2, 3, 4]));
    }

    #[test]
    fn test_crop_and_paste() {
        let mut buf = PixelBuffer::new(4, 4).unwrap();
        let at = buf.offset(2, 1).unwrap();
        buf.write(at, [9, 9, 9, 9]);

        let region = buf.crop(Rect { left: 1, top: 1, width: 2, height: 2 });
        assert_eq!((region.width(), region.height()), (2, 2));
        assert_eq!(region.get(1, 0), Some([9, 9, 9, 9]));

        let mut target = PixelBuffer::new(4, 4).unwrap();
        target.paste(&region, 2, 2);
        assert_eq!(target.get(3, 2), Some([9, 9, 9, 9]));
        assert_eq!(target.get(2, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_crop_clips_oversized_rect() {
        let buf = PixelBuffer::new(4, 4).unwrap();
        let region = buf.crop(Rect { left: 3, top: 3, width: 10, height: 10 });
        assert_eq!((region.width(), region.height()), (1, 1));
    }

    #[test]
    fn test_paste_clips_negative_origin() {
        let src = PixelBuffer::filled(3, 3, [5, 5, 5, 5]).unwrap();
        let mut dst = PixelBuffer::new(2, 2).unwrap();
        dst.paste(&src, -2, -2);
        assert_eq!(dst.get(0, 0), Some([5, 5, 5, 5]));
        assert_eq!(dst.get(1, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_fit_to() {
        let src = PixelBuffer::filled(1, 1, [7, 7, 7, 7]).unwrap();
        let fitted = src.fit_to(2, 2).unwrap();
        assert_eq!(fitted.get(0, 0), Some([7, 7, 7, 7]));
        assert_eq!(fitted.get(1, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let buf = PixelBuffer::filled(2, 1, [1, 2, 3, 255]).unwrap();
        let snap = buf.snapshot();
        assert_eq!(snap.width, 2);
        assert_eq!(snap.pixel_bytes.len(), 8);
        assert_eq!(PixelBuffer::from_snapshot(snap).unwrap(), buf);
    }

    #[test]
    fn test_ensure_same_shape() {
        let a = PixelBuffer::new(2, 2).unwrap();
        let b = PixelBuffer::new(2, 3).unwrap();
        assert!(a.ensure_same_shape(&a.clone()).is_ok());
        assert!(a.ensure_same_shape(&b).unwrap_err().is_dimension_mismatch());
    }
}
