//! Buffer resampling.
//!
//! Separable two-pass resize (horizontal, then vertical) over premultiplied
//! `f32` RGBA, so transparent pixels do not bleed dark fringes into their
//! neighbors. When shrinking, the filter support widens with the scale
//! factor, which turns bilinear into an area average.
//!
//! ```rust
//! use filtr_core::PixelBuffer;
//! use filtr_ops::resample::{resize, Filter};
//!
//! let src = PixelBuffer::filled(16, 16, [10, 20, 30, 255]).unwrap();
//! let dst = resize(&src, 4, 8, Filter::Bilinear).unwrap();
//! assert_eq!((dst.width(), dst.height()), (4, 8));
//! assert!(dst.pixels().all(|p| p == [10, 20, 30, 255]));
//! ```

use filtr_core::{PixelBuffer, Shape};

/// Resampling filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Nearest-neighbor (no interpolation).
    Nearest,
    /// Linear interpolation; area average when shrinking.
    #[default]
    Bilinear,
}

impl Filter {
    /// Support radius.
    #[inline]
    pub fn support(&self) -> f32 {
        match self {
            Filter::Nearest => 0.5,
            Filter::Bilinear => 1.0,
        }
    }

    /// Kernel weight at distance `x`.
    #[inline]
    pub fn weight(&self, x: f32) -> f32 {
        let ax = x.abs();
        match self {
            Filter::Nearest => {
                if ax < 0.5 { 1.0 } else { 0.0 }
            }
            Filter::Bilinear => {
                if ax < 1.0 { 1.0 - ax } else { 0.0 }
            }
        }
    }
}

/// Converts to premultiplied `f32` in `[0, 1]`.
pub(crate) fn to_premultiplied(src: &PixelBuffer) -> Vec<f32> {
    let mut out = Vec::with_capacity(src.bytes().len());
    for [r, g, b, a] in src.pixels() {
        let af = a as f32 / 255.0;
        out.extend([
            r as f32 / 255.0 * af,
            g as f32 / 255.0 * af,
            b as f32 / 255.0 * af,
            af,
        ]);
    }
    out
}

/// Converts one premultiplied pixel back to straight RGBA8.
#[inline]
pub(crate) fn from_premultiplied(p: [f32; 4]) -> [u8; 4] {
    let a = p[3].clamp(0.0, 1.0);
    if a <= 1e-6 {
        return [0, 0, 0, 0];
    }
    let ch = |v: f32| filtr_color::clamp_channel((v / a) as f64 * 255.0);
    [ch(p[0]), ch(p[1]), ch(p[2]), filtr_color::clamp_channel(a as f64 * 255.0)]
}

fn pack(data: &[f32], width: u32, height: u32) -> filtr_core::Result<PixelBuffer> {
    let bytes = data
        .chunks_exact(4)
        .flat_map(|p| from_premultiplied([p[0], p[1], p[2], p[3]]))
        .collect();
    PixelBuffer::from_rgba(width, height, bytes)
}

/// Resizes a buffer.
///
/// # Errors
///
/// Fails if either target dimension is zero or the target exceeds
/// [`PixelBuffer::MAX_PIXELS`]; nothing is allocated in that case.
pub fn resize(
    src: &PixelBuffer,
    width: u32,
    height: u32,
    filter: Filter,
) -> filtr_core::Result<PixelBuffer> {
    if width == 0 || height == 0 {
        return Err(filtr_core::Error::invalid_dimensions(
            width,
            height,
            "destination size must be > 0",
        ));
    }
    Shape::checked(width, height)?;
    if (width, height) == (src.width(), src.height()) {
        return Ok(src.clone());
    }
    let (sw, sh) = (src.width() as usize, src.height() as usize);
    let data = to_premultiplied(src);
    let temp = resize_horizontal(&data, sw, sh, width as usize, filter);
    let result = resize_vertical(&temp, width as usize, sh, height as usize, filter);
    pack(&result, width, height)
}

/// First and last source tap plus the source-space center for one
/// destination sample.
#[inline]
fn taps(dst: usize, scale: f32, support: f32, src_len: usize) -> (usize, usize, f32) {
    let center = (dst as f32 + 0.5) * scale - 0.5;
    let first = ((center - support).floor() as isize).max(0) as usize;
    let last = ((center + support).ceil().max(0.0) as usize).min(src_len - 1);
    (first, last.max(first), center)
}

fn resize_horizontal(src: &[f32], src_w: usize, src_h: usize, dst_w: usize, filter: Filter) -> Vec<f32> {
    let mut dst = vec![0.0f32; dst_w * src_h * 4];
    let scale = src_w as f32 / dst_w as f32;
    let stretch = scale.max(1.0);
    let support = filter.support() * stretch;

    for x in 0..dst_w {
        let (first, last, center) = taps(x, scale, support, src_w);
        let weights: Vec<f32> = (first..=last)
            .map(|sx| filter.weight((sx as f32 - center) / stretch))
            .collect();
        let total: f32 = weights.iter().sum();
        for y in 0..src_h {
            let mut sum = [0.0f32; 4];
            for (i, sx) in (first..=last).enumerate() {
                let s = (y * src_w + sx) * 4;
                for c in 0..4 {
                    sum[c] += src[s + c] * weights[i];
                }
            }
            let d = (y * dst_w + x) * 4;
            let src_near = (y * src_w + center.round().clamp(0.0, (src_w - 1) as f32) as usize) * 4;
            for c in 0..4 {
                dst[d + c] = if total > 0.0 { sum[c] / total } else { src[src_near + c] };
            }
        }
    }
    dst
}

fn resize_vertical(src: &[f32], src_w: usize, src_h: usize, dst_h: usize, filter: Filter) -> Vec<f32> {
    let mut dst = vec![0.0f32; src_w * dst_h * 4];
    let scale = src_h as f32 / dst_h as f32;
    let stretch = scale.max(1.0);
    let support = filter.support() * stretch;

    for y in 0..dst_h {
        let (first, last, center) = taps(y, scale, support, src_h);
        let weights: Vec<f32> = (first..=last)
            .map(|sy| filter.weight((sy as f32 - center) / stretch))
            .collect();
        let total: f32 = weights.iter().sum();
        let near = center.round().clamp(0.0, (src_h - 1) as f32) as usize;
        for x in 0..src_w {
            let mut sum = [0.0f32; 4];
            for (i, sy) in (first..=last).enumerate() {
                let s = (sy * src_w + x) * 4;
                for c in 0..4 {
                    sum[c] += src[s + c] * weights[i];
                }
            }
            let d = (y * src_w + x) * 4;
            let s_near = (near * src_w + x) * 4;
            for c in 0..4 {
                dst[d + c] = if total > 0.0 { sum[c] / total } else { src[s_near + c] };
            }
        }
    }
    dst
}

/// Bilinear sample at a continuous position, pixel centers at `i + 0.5`.
///
/// Returns premultiplied `f32` RGBA, or `None` outside the buffer.
pub fn sample_bilinear(src: &PixelBuffer, x: f64, y: f64) -> Option<[f32; 4]> {
    let (w, h) = (src.width() as f64, src.height() as f64);
    if !(x >= 0.0 && x < w && y >= 0.0 && y < h) {
        return None;
    }
    let fx = x - 0.5;
    let fy = y - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = (fx - x0) as f32;
    let ty = (fy - y0) as f32;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let premul = |p: [u8; 4]| {
        let a = p[3] as f32 / 255.0;
        [
            p[0] as f32 / 255.0 * a,
            p[1] as f32 / 255.0 * a,
            p[2] as f32 / 255.0 * a,
            a,
        ]
    };
    let p00 = premul(src.get_clamped(x0, y0));
    let p10 = premul(src.get_clamped(x0 + 1, y0));
    let p01 = premul(src.get_clamped(x0, y0 + 1));
    let p11 = premul(src.get_clamped(x0 + 1, y0 + 1));

    let mut out = [0.0f32; 4];
    for c in 0..4 {
        let top = p00[c] * (1.0 - tx) + p10[c] * tx;
        let bot = p01[c] * (1.0 - tx) + p11[c] * tx;
        out[c] = top * (1.0 - ty) + bot * ty;
    }
    Some(out)
}
