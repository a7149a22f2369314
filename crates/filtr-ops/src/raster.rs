//! Drawing primitives used by the stylize, blur and geometry filters.
//!
//! # Functions
//!
//! - [`fill_rect`] - fill a rectangle with a color at a given opacity
//! - [`fill_disc`] - fill a disc (pixel centers within the radius)
//! - [`draw_scaled`] - draw a buffer resized into a destination rectangle
//! - [`draw_affine`] - draw a buffer through an [`Affine`] transform
//!
//! All drawing is source-over with a global alpha in `[0, 1]`; pixels
//! outside the destination are skipped.

use filtr_core::PixelBuffer;

use crate::composite::over_rgba8;
use crate::resample::{self, Filter, from_premultiplied, sample_bilinear};

/// 2D affine transform `(x, y) -> (a x + c y + e, b x + d y + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    /// x scale / rotation
    pub a: f64,
    /// y shear / rotation
    pub b: f64,
    /// x shear / rotation
    pub c: f64,
    /// y scale / rotation
    pub d: f64,
    /// x translation
    pub e: f64,
    /// y translation
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine {
    /// The identity transform.
    pub const fn identity() -> Self {
        Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 }
    }

    /// A translation.
    pub const fn translate(x: f64, y: f64) -> Self {
        Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: x, f: y }
    }

    /// A scale about the origin.
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self { a: sx, b: 0.0, c: 0.0, d: sy, e: 0.0, f: 0.0 }
    }

    /// A clockwise rotation (y axis down) about the origin, in radians.
    pub fn rotate(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self { a: cos, b: sin, c: -sin, d: cos, e: 0.0, f: 0.0 }
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &Affine) -> Self {
        Self {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            e: next.a * self.e + next.c * self.f + next.e,
            f: next.b * self.e + next.d * self.f + next.f,
        }
    }

    /// Maps a point.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }

    /// The inverse transform, or `None` if singular.
    pub fn invert(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < 1e-12 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        Some(Self {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            e: (self.c * self.f - self.d * self.e) * inv,
            f: (self.b * self.e - self.a * self.f) * inv,
        })
    }
}

/// Fills a rectangle. Parts outside the buffer are clipped.
pub fn fill_rect(
    buf: &mut PixelBuffer,
    left: i64,
    top: i64,
    width: u32,
    height: u32,
    rgba: [u8; 4],
    alpha: f64,
) {
    let x0 = left.max(0);
    let y0 = top.max(0);
    let x1 = (left + width as i64).min(buf.width() as i64);
    let y1 = (top + height as i64).min(buf.height() as i64);
    for y in y0..y1 {
        for x in x0..x1 {
            let at = buf.offset_clamped(x, y);
            let out = over_rgba8(rgba, buf.read(at), alpha);
            buf.write(at, out);
        }
    }
}

/// Fills every pixel whose center lies within `radius` of `(cx, cy)`.
pub fn fill_disc(buf: &mut PixelBuffer, cx: f64, cy: f64, radius: f64, rgba: [u8; 4], alpha: f64) {
    if !(radius > 0.0 && cx.is_finite() && cy.is_finite()) {
        return;
    }
    let r2 = radius * radius;
    let x0 = ((cx - radius).floor() as i64).max(0);
    let y0 = ((cy - radius).floor() as i64).max(0);
    let x1 = ((cx + radius).ceil() as i64).min(buf.width() as i64 - 1);
    let y1 = ((cy + radius).ceil() as i64).min(buf.height() as i64 - 1);
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            if dx * dx + dy * dy <= r2 {
                let at = buf.offset_clamped(x, y);
                let out = over_rgba8(rgba, buf.read(at), alpha);
                buf.write(at, out);
            }
        }
    }
}

/// Composites one premultiplied sample over a pixel with a global alpha.
#[inline]
fn over_sample(dst: [u8; 4], sample: [f32; 4], alpha: f64) -> [u8; 4] {
    let [r, g, b, a] = from_premultiplied(sample);
    over_rgba8([r, g, b, a], dst, alpha)
}

/// Draws `src` resized to `width x height` with its top-left corner at
/// `(x, y)` (all rounded).
///
/// # Errors
///
/// Propagates resize failures; a non-positive target size draws nothing.
pub fn draw_scaled(
    dst: &mut PixelBuffer,
    src: &PixelBuffer,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    alpha: f64,
) -> filtr_core::Result<()> {
    let (w, h) = (width.round(), height.round());
    if !(w >= 1.0 && h >= 1.0) {
        return Ok(());
    }
    let scaled = resample::resize(src, w as u32, h as u32, Filter::Bilinear)?;
    let (left, top) = (x.round() as i64, y.round() as i64);
    for sy in 0..scaled.height() {
        let ty = top + sy as i64;
        if ty < 0 || ty >= dst.height() as i64 {
            continue;
        }
        for sx in 0..scaled.width() {
            let tx = left + sx as i64;
            if tx < 0 || tx >= dst.width() as i64 {
                continue;
            }
            if let Some(fg) = scaled.get(sx, sy) {
                let at = dst.offset_clamped(tx, ty);
                let out = over_rgba8(fg, dst.read(at), alpha);
                dst.write(at, out);
            }
        }
    }
    Ok(())
}

/// Draws `src` through `transform` (source space to destination space),
/// sampling bilinearly. A singular transform draws nothing.
pub fn draw_affine(dst: &mut PixelBuffer, src: &PixelBuffer, transform: &Affine, alpha: f64) {
    let Some(inv) = transform.invert() else {
        return;
    };
    for y in 0..dst.height() {
        for x in 0..dst.width() {
            let (sx, sy) = inv.apply(x as f64 + 0.5, y as f64 + 0.5);
            if let Some(sample) = sample_bilinear(src, sx, sy) {
                let at = dst.offset_clamped(x as i64, y as i64);
                let out = over_sample(dst.read(at), sample, alpha);
                dst.write(at, out);
            }
        }
    }
}

/// Averages several equally weighted premultiplied layers into one pixel.
#[inline]
pub(crate) fn average_premultiplied(samples: &[[f32; 4]]) -> [u8; 4] {
    if samples.is_empty() {
        return [0, 0, 0, 0];
    }
    let mut acc = [0.0f32; 4];
    for s in samples {
        for c in 0..4 {
            acc[c] += s[c];
        }
    }
    let n = samples.len() as f32;
    from_premultiplied(acc.map(|v| v / n))
}
