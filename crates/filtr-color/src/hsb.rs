//! Hue / saturation / brightness.
//!
//! Hue is in degrees `[0, 360]`, saturation and brightness in percent
//! `[0, 100]`. [`rgb_to_hsb`] rounds all three to integers;
//! [`rgb_to_hsb_exact`] keeps the fractional values for lossless round trips.

use crate::clamp_channel;

/// An HSB color.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsb {
    /// Hue in degrees
    pub h: f64,
    /// Saturation in percent
    pub s: f64,
    /// Brightness in percent
    pub b: f64,
}

/// Converts RGB to HSB without rounding.
pub fn rgb_to_hsb_exact(r: u8, g: u8, b: u8) -> Hsb {
    let (rf, gf, bf) = (r as f64, g as f64, b as f64);
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;
    let s = if max != 0.0 { delta / max } else { 0.0 };

    let h = if s == 0.0 {
        0.0
    } else {
        let rr = (max - rf) / delta;
        let gr = (max - gf) / delta;
        let br = (max - bf) / delta;
        let h = if rf == max {
            br - gr
        } else if gf == max {
            2.0 + rr - br
        } else {
            4.0 + gr - rr
        } / 6.0;
        if h < 0.0 { h + 1.0 } else { h }
    };

    Hsb {
        h: h * 360.0,
        s: s * 100.0,
        b: max / 255.0 * 100.0,
    }
}

/// Converts RGB to HSB with each component rounded to an integer.
pub fn rgb_to_hsb(r: u8, g: u8, b: u8) -> Hsb {
    let hsb = rgb_to_hsb_exact(r, g, b);
    Hsb {
        h: hsb.h.round(),
        s: hsb.s.round(),
        b: hsb.b.round(),
    }
}

/// Converts HSB to RGB.
///
/// Hue wraps modulo 360. Sector assignment, with `c` the brightness value:
///
/// | sector | r | g | b |
/// |--------|---|---|---|
/// | 0      | c | t | p |
/// | 1      | q | c | p |
/// | 2      | p | c | t |
/// | 3      | p | q | c |
/// | 4      | t | p | c |
/// | 5      | c | p | q |
pub fn hsb_to_rgb(h: f64, s: f64, b: f64) -> [u8; 3] {
    let c = clamp_channel(b / 100.0 * 255.0);
    if s == 0.0 || !h.is_finite() {
        return [c, c, c];
    }

    let u = h.rem_euclid(360.0);
    let f = u % 60.0;
    let p = clamp_channel(b * (100.0 - s) / 10000.0 * 255.0);
    let q = clamp_channel(b * (6000.0 - s * f) / 600000.0 * 255.0);
    let t = clamp_channel(b * (6000.0 - s * (60.0 - f)) / 600000.0 * 255.0);

    match (u / 60.0).floor() as u32 {
        0 => [c, t, p],
        1 => [q, c, p],
        2 => [p, c, t],
        3 => [p, q, c],
        4 => [t, p, c],
        _ => [c, p, q],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [u8; 3], b: [u8; 3], tol: i32) -> bool {
        a.iter().zip(b).all(|(&x, y)| (x as i32 - y as i32).abs() <= tol)
    }

    #[test]
    fn test_primaries() {
        assert_eq!(rgb_to_hsb(255, 0, 0), Hsb { h: 0.0, s: 100.0, b: 100.0 });
        assert_eq!(rgb_to_hsb(0, 255, 0), Hsb { h: 120.0, s: 100.0, b: 100.0 });
        assert_eq!(rgb_to_hsb(0, 0, 255), Hsb { h: 240.0, s: 100.0, b: 100.0 });
        assert_eq!(hsb_to_rgb(120.0, 100.0, 100.0), [0, 255, 0]);
        assert_eq!(hsb_to_rgb(240.0, 100.0, 100.0), [0, 0, 255]);
    }

    #[test]
    fn test_gray_has_no_hue() {
        let hsb = rgb_to_hsb(128, 128, 128);
        assert_eq!(hsb.h, 0.0);
        assert_eq!(hsb.s, 0.0);
        assert_eq!(hsb.b, 50.0);
        assert_eq!(hsb_to_rgb(0.0, 0.0, 50.0), [128, 128, 128]);
    }

    #[test]
    fn test_sectors() {
        // one hue per sector at full saturation/brightness
        assert_eq!(hsb_to_rgb(30.0, 100.0, 100.0), [255, 128, 0]);
        assert_eq!(hsb_to_rgb(90.0, 100.0, 100.0), [128, 255, 0]);
        assert_eq!(hsb_to_rgb(150.0, 100.0, 100.0), [0, 255, 128]);
        assert_eq!(hsb_to_rgb(210.0, 100.0, 100.0), [0, 128, 255]);
        assert_eq!(hsb_to_rgb(270.0, 100.0, 100.0), [128, 0, 255]);
        assert_eq!(hsb_to_rgb(330.0, 100.0, 100.0), [255, 0, 128]);
    }

    #[test]
    fn test_hue_wraps() {
        assert_eq!(hsb_to_rgb(360.0, 100.0, 100.0), hsb_to_rgb(0.0, 100.0, 100.0));
        assert_eq!(hsb_to_rgb(-120.0, 100.0, 100.0), hsb_to_rgb(240.0, 100.0, 100.0));
    }

    #[test]
    fn test_exact_roundtrip_dense() {
        for r in (0..=255).step_by(5) {
            for g in (0..=255).step_by(5) {
                for b in (0..=255).step_by(5) {
                    let (r, g, b) = (r as u8, g as u8, b as u8);
                    let hsb = rgb_to_hsb_exact(r, g, b);
                    let back = hsb_to_rgb(hsb.h, hsb.s, hsb.b);
                    assert!(close(back, [r, g, b], 1), "{r},{g},{b} -> {back:?}");
                }
            }
        }
    }

    #[test]
    fn test_rounded_roundtrip_within_quantization() {
        for r in (0..=255).step_by(15) {
            for g in (0..=255).step_by(15) {
                for b in (0..=255).step_by(15) {
                    let (r, g, b) = (r as u8, g as u8, b as u8);
                    let hsb = rgb_to_hsb(r, g, b);
                    let back = hsb_to_rgb(hsb.h, hsb.s, hsb.b);
                    assert!(close(back, [r, g, b], 6), "{r},{g},{b} -> {back:?}");
                }
            }
        }
    }
}
