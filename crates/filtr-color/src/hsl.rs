//! Hue rotation, saturation scaling and lightness in HSL space.

use crate::clamp_channel;

/// A precomputed HSL adjustment.
///
/// `hue` is in degrees, `saturation` and `lightness` in percent
/// (`-100..=100`, `0` meaning unchanged).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HslShift {
    hue6: f64,
    satmul: f64,
    lightness: f64,
    shifts_color: bool,
}

impl HslShift {
    /// Prepares a shift.
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        let hue = (hue % 360.0) / 360.0;
        let saturation = saturation / 100.0;
        Self {
            hue6: hue * 6.0,
            satmul: 1.0 + if saturation < 0.0 { saturation } else { saturation * 2.0 },
            lightness: lightness / 100.0,
            shifts_color: hue != 0.0 || saturation != 0.0,
        }
    }

    /// Returns true if the shift leaves every color unchanged.
    pub fn is_identity(&self) -> bool {
        !self.shifts_color && self.lightness == 0.0
    }

    /// Applies the shift to one color.
    pub fn apply(&self, r: u8, g: u8, b: u8) -> [u8; 3] {
        let mut rgb = [r as f64, g as f64, b as f64];
        if self.shifts_color {
            if let Some(shifted) = self.rotate(r, g, b) {
                rgb = shifted;
            }
        }
        if self.lightness < 0.0 {
            rgb = rgb.map(|c| c * (1.0 + self.lightness));
        } else if self.lightness > 0.0 {
            rgb = rgb.map(|c| c * (1.0 - self.lightness) + self.lightness * 255.0);
        }
        rgb.map(clamp_channel)
    }

    fn rotate(&self, r: u8, g: u8, b: u8) -> Option<[f64; 3]> {
        let (rf, gf, bf) = (r as f64, g as f64, b as f64);
        let vs = rf.max(gf).max(bf);
        let ms = rf.min(gf).min(bf);
        let vm = vs - ms;
        let l = (ms + vs) / 510.0;
        if l <= 0.0 || vm <= 0.0 {
            return None;
        }

        let v = if l <= 0.5 {
            let s = (vm / (vs + ms) * self.satmul).min(1.0);
            l * (1.0 + s)
        } else {
            let s = (vm / (510.0 - vs - ms) * self.satmul).min(1.0);
            l + s - l * s
        };

        let mut h = if rf == vs {
            if gf == ms { 5.0 + (vs - bf) / vm } else { 1.0 - (vs - gf) / vm }
        } else if gf == vs {
            if bf == ms { 1.0 + (vs - rf) / vm } else { 3.0 - (vs - bf) / vm }
        } else if rf == ms {
            3.0 + (vs - gf) / vm
        } else {
            5.0 - (vs - rf) / vm
        } + self.hue6;
        h = h.rem_euclid(6.0);

        let m = l + l - v;
        let sector = h.floor();
        let frac = h - sector;
        let up = (m + (v - m) * frac) * 255.0;
        let down = (v - (v - m) * frac) * 255.0;
        let (v, m) = (v * 255.0, m * 255.0);

        Some(match sector as u32 {
            0 => [v, up, m],
            1 => [down, v, m],
            2 => [m, v, up],
            3 => [m, down, v],
            4 => [up, m, v],
            _ => [v, m, down],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [u8; 3], b: [u8; 3], tol: i32) -> bool {
        a.iter().zip(b).all(|(&x, y)| (x as i32 - y as i32).abs() <= tol)
    }

    #[test]
    fn test_identity() {
        let shift = HslShift::new(0.0, 0.0, 0.0);
        assert!(shift.is_identity());
        assert_eq!(shift.apply(12, 200, 99), [12, 200, 99]);
    }

    #[test]
    fn test_full_turn_is_identity() {
        let shift = HslShift::new(360.0, 0.0, 0.0);
        assert!(shift.is_identity());
    }

    #[test]
    fn test_hue_rotation_primaries() {
        let shift = HslShift::new(120.0, 0.0, 0.0);
        assert!(close(shift.apply(255, 0, 0), [0, 255, 0], 1));
        assert!(close(shift.apply(0, 255, 0), [0, 0, 255], 1));
        assert!(close(shift.apply(0, 0, 255), [255, 0, 0], 1));
    }

    #[test]
    fn test_rotation_preserves_color_when_zero_hue() {
        let shift = HslShift::new(0.0, 1e-9, 0.0);
        assert!(close(shift.apply(200, 100, 50), [200, 100, 50], 1));
    }

    #[test]
    fn test_desaturate_fully() {
        let shift = HslShift::new(0.0, -100.0, 0.0);
        let [r, g, b] = shift.apply(200, 100, 50);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn test_gray_unaffected_by_hue() {
        let shift = HslShift::new(90.0, 50.0, 0.0);
        assert_eq!(shift.apply(77, 77, 77), [77, 77, 77]);
    }

    #[test]
    fn test_lightness() {
        assert_eq!(HslShift::new(0.0, 0.0, -100.0).apply(200, 100, 50), [0, 0, 0]);
        assert_eq!(HslShift::new(0.0, 0.0, 100.0).apply(200, 100, 50), [255, 255, 255]);
        assert_eq!(HslShift::new(0.0, 0.0, -50.0).apply(200, 100, 50), [100, 50, 25]);
    }
}
