//! YUV (Rec. 601 luma with scaled color differences).

use crate::clamp_channel;

/// A YUV color, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Yuv {
    /// Luma
    pub y: f64,
    /// Blue difference, `(b - y) * 0.493`
    pub u: f64,
    /// Red difference, `(r - y) * 0.877`
    pub v: f64,
}

/// Converts RGB to YUV.
#[inline]
pub fn rgb_to_yuv(r: u8, g: u8, b: u8) -> Yuv {
    let y = crate::luma(r, g, b);
    Yuv {
        y,
        u: (b as f64 - y) * 0.493,
        v: (r as f64 - y) * 0.877,
    }
}

/// Converts YUV to RGB, rounded and clamped.
#[inline]
pub fn yuv_to_rgb(y: f64, u: f64, v: f64) -> [u8; 3] {
    [
        clamp_channel(y + v / 0.877),
        clamp_channel(y - 0.39466 * u - 0.5806 * v),
        clamp_channel(y + u / 0.493),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_gray_has_no_chroma() {
        let yuv = rgb_to_yuv(100, 100, 100);
        assert_abs_diff_eq!(yuv.y, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(yuv.u, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(yuv.v, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_roundtrip_dense() {
        for r in (0..=255).step_by(5) {
            for g in (0..=255).step_by(5) {
                for b in (0..=255).step_by(5) {
                    let (r, g, b) = (r as u8, g as u8, b as u8);
                    let yuv = rgb_to_yuv(r, g, b);
                    let back = yuv_to_rgb(yuv.y, yuv.u, yuv.v);
                    for (x, y) in back.iter().zip([r, g, b]) {
                        assert!((*x as i32 - y as i32).abs() <= 1, "{r},{g},{b} -> {back:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_clamps() {
        assert_eq!(yuv_to_rgb(300.0, 0.0, 0.0), [255, 255, 255]);
        assert_eq!(yuv_to_rgb(-10.0, 0.0, 0.0), [0, 0, 0]);
    }
}
