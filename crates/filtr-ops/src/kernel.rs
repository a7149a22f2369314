//! 3x3 convolution kernels.
//!
//! A [`Kernel`] is a fixed weight matrix plus a normalizing divisor. It is
//! evaluated at an [`AreaStep`], so every neighbor read goes through the
//! border-replicated neighborhood of the traversal.
//!
//! # Kernels
//!
//! - [`Kernel::edges`] - eight-neighbor edge detector (flat areas go black)
//! - [`Kernel::laplace`] - center-weighted Laplacian, divided by 8
//! - [`Kernel::sharpen`] - four-neighbor sharpen that preserves brightness
//! - [`Gradient`] - the named gradient pairs used by the outline filter
//!
//! # Example
//!
//! ```rust
//! use filtr_ops::kernel::Kernel;
//!
//! let k = Kernel::new([0.0, 1.0, 0.0, 1.0, 4.0, 1.0, 0.0, 1.0, 0.0]);
//! assert_eq!(k.divisor, 8.0);
//! ```

use filtr_core::{AreaStep, PixelBuffer};

/// 3x3 weights in row-major order, top row first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel {
    /// Weights, `[row * 3 + column]`.
    pub weights: [f64; 9],
    /// Normalizing divisor.
    pub divisor: f64,
}

impl Kernel {
    /// Creates a kernel normalized by the sum of its weights.
    ///
    /// A kernel whose weights sum to zero gets a divisor of 1.
    pub fn new(weights: [f64; 9]) -> Self {
        let sum: f64 = weights.iter().sum();
        let divisor = if sum.abs() < f64::EPSILON { 1.0 } else { sum };
        Self { weights, divisor }
    }

    /// Overrides the divisor. Zero or a non-finite value is replaced by 1.
    pub fn with_divisor(mut self, divisor: f64) -> Self {
        self.divisor = if divisor.is_finite() && divisor != 0.0 {
            divisor
        } else {
            1.0
        };
        self
    }

    /// Sum of the eight neighbors minus eight times the center.
    pub fn edges() -> Self {
        Self::new([1.0, 1.0, 1.0, 1.0, -8.0, 1.0, 1.0, 1.0, 1.0])
    }

    /// Eight times the center minus the eight neighbors, over 8.
    pub fn laplace() -> Self {
        Self::new([-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0]).with_divisor(8.0)
    }

    /// Four-neighbor sharpen. `strength` is clamped to `[0, 1]`; the weights
    /// always sum to one.
    ///
    /// ```rust
    /// use filtr_ops::kernel::Kernel;
    ///
    /// let k = Kernel::sharpen(0.0);
    /// assert!((k.weights[4] - 15.0 / 11.0).abs() < 1e-12);
    /// ```
    pub fn sharpen(strength: f64) -> Self {
        let strength = if strength.is_nan() { 0.0 } else { strength.clamp(0.0, 1.0) };
        let side = -(1.0 + 3.0 * strength) / 11.0;
        let center = 1.0 - 4.0 * side;
        Self::new([0.0, side, 0.0, side, center, side, 0.0, side, 0.0])
    }

    /// Weight at `(dx, dy)`, each in `-1..=1`.
    #[inline]
    pub fn weight(&self, dx: i32, dy: i32) -> f64 {
        self.weights[((dy + 1) * 3 + dx + 1) as usize]
    }

    /// Convolves the color channels of `src` around `step`, unclamped.
    pub fn apply_rgb(&self, src: &PixelBuffer, step: &AreaStep) -> [f64; 3] {
        let mut acc = [0.0f64; 3];
        for (row, offsets) in step.neighborhood().iter().enumerate() {
            for (col, &at) in offsets.iter().enumerate() {
                let w = self.weights[row * 3 + col];
                if w == 0.0 {
                    continue;
                }
                let px = src.read(at);
                for c in 0..3 {
                    acc[c] += px[c] as f64 * w;
                }
            }
        }
        acc.map(|v| v / self.divisor)
    }

    /// Convolves a single precomputed value per pixel (e.g. luminance),
    /// unclamped. `plane` is indexed by pixel index.
    pub fn apply_plane(&self, plane: &[f64], step: &AreaStep) -> f64 {
        let mut acc = 0.0;
        for (row, offsets) in step.neighborhood().iter().enumerate() {
            for (col, at) in offsets.iter().enumerate() {
                acc += plane[at.index()] * self.weights[row * 3 + col];
            }
        }
        acc / self.divisor
    }
}

/// Named gradient kernel pairs for outline detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gradient {
    /// Sobel
    #[default]
    Sobel,
    /// Scharr
    Scharr,
    /// Prewitt
    Prewitt,
    /// Kirsch
    Kirsch,
    /// Roberts cross (embedded in 3x3)
    Roberts,
}

impl Gradient {
    /// All pairs.
    pub const ALL: [Gradient; 5] = [
        Gradient::Sobel,
        Gradient::Scharr,
        Gradient::Prewitt,
        Gradient::Kirsch,
        Gradient::Roberts,
    ];

    /// Parses a name, case-insensitively. `kirsh` is accepted as well.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sobel" => Some(Self::Sobel),
            "scharr" => Some(Self::Scharr),
            "prewitt" => Some(Self::Prewitt),
            "kirsch" | "kirsh" => Some(Self::Kirsch),
            "roberts" => Some(Self::Roberts),
            _ => None,
        }
    }

    /// Lower-case name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sobel => "sobel",
            Self::Scharr => "scharr",
            Self::Prewitt => "prewitt",
            Self::Kirsch => "kirsch",
            Self::Roberts => "roberts",
        }
    }

    /// The `(x, y)` kernels, both with a divisor of 1.
    pub fn kernels(&self) -> (Kernel, Kernel) {
        let (x, y) = match self {
            Self::Sobel => (
                [1.0, 0.0, -1.0, 2.0, 0.0, -2.0, 1.0, 0.0, -1.0],
                [1.0, 2.0, 1.0, 0.0, 0.0, 0.0, -1.0, -2.0, -1.0],
            ),
            Self::Scharr => (
                [3.0, 0.0, -3.0, 10.0, 0.0, -10.0, 3.0, 0.0, -3.0],
                [3.0, 10.0, 3.0, 0.0, 0.0, 0.0, -3.0, -10.0, -3.0],
            ),
            Self::Prewitt => (
                [1.0, 0.0, -1.0, 1.0, 0.0, -1.0, 1.0, 0.0, -1.0],
                [-1.0, -1.0, -1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            ),
            Self::Kirsch => (
                [5.0, -3.0, -3.0, 5.0, 0.0, -3.0, 5.0, -3.0, -3.0],
                [5.0, 5.0, 5.0, -3.0, 0.0, -3.0, -3.0, -3.0, -3.0],
            ),
            Self::Roberts => (
                [0.0, 0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
                [-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
            ),
        };
        (
            Kernel { weights: x, divisor: 1.0 },
            Kernel { weights: y, divisor: 1.0 },
        )
    }

    /// Gradient magnitude `sqrt(gx^2 + gy^2)` of `plane` at `step`.
    pub fn magnitude(&self, plane: &[f64], step: &AreaStep) -> f64 {
        let (kx, ky) = self.kernels();
        let gx = kx.apply_plane(plane, step);
        let gy = ky.apply_plane(plane, step);
        (gx * gx + gy * gy).sqrt()
    }
}

impl std::fmt::Display for Gradient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use filtr_core::MatrixArea;

    fn ramp(w: u32, h: u32) -> PixelBuffer {
        let mut bytes = Vec::new();
        for y in 0..h {
            for x in 0..w {
                let v = (x * 40 + y * 10) as u8;
                bytes.extend([v, v, v, 255]);
            }
        }
        PixelBuffer::from_rgba(w, h, bytes).unwrap()
    }

    #[test]
    fn test_new_divisor() {
        assert_eq!(Kernel::new([1.0; 9]).divisor, 9.0);
        assert_eq!(Kernel::edges().divisor, 1.0);
        assert_eq!(Kernel::new([1.0; 9]).with_divisor(0.0).divisor, 1.0);
    }

    #[test]
    fn test_sharpen_preserves_flat() {
        for s in [0.0, 0.5, 0.9, 1.0] {
            let k = Kernel::sharpen(s);
            assert_abs_diff_eq!(k.weights.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(k.divisor, 1.0, epsilon = 1e-12);
        }
        let flat = PixelBuffer::filled(3, 3, [90, 90, 90, 255]).unwrap();
        for step in MatrixArea::new(flat.shape()) {
            let out = Kernel::sharpen(1.0).apply_rgb(&flat, &step);
            assert_abs_diff_eq!(out[0], 90.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_edges_flat_is_zero() {
        let flat = PixelBuffer::filled(4, 3, [200, 10, 50, 255]).unwrap();
        for step in MatrixArea::new(flat.shape()) {
            assert_eq!(Kernel::edges().apply_rgb(&flat, &step), [0.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn test_weight_lookup() {
        let (kx, _) = Gradient::Sobel.kernels();
        assert_eq!(kx.weight(-1, 0), 2.0);
        assert_eq!(kx.weight(1, 1), -1.0);
    }

    #[test]
    fn test_gradient_on_ramp() {
        let buf = ramp(5, 5);
        let plane: Vec<f64> = buf.pixels().map(|p| p[0] as f64).collect();
        let center = MatrixArea::new(buf.shape()).find(|s| s.x == 3 && s.y == 3).unwrap();
        // horizontal step 40, vertical step 10
        let (kx, ky) = Gradient::Sobel.kernels();
        assert_abs_diff_eq!(kx.apply_plane(&plane, &center), -320.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ky.apply_plane(&plane, &center), -80.0, epsilon = 1e-9);
        let mag = Gradient::Sobel.magnitude(&plane, &center);
        assert_abs_diff_eq!(mag, (320.0f64 * 320.0 + 80.0 * 80.0).sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_gradient_names() {
        for g in Gradient::ALL {
            assert_eq!(Gradient::from_name(g.name()), Some(g));
        }
        assert_eq!(Gradient::from_name("Kirsh"), Some(Gradient::Kirsch));
        assert_eq!(Gradient::from_name("canny"), None);
    }
}
