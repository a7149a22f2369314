//! Built-in filters.
//!
//! | Module       | Filters                                                        |
//! |--------------|----------------------------------------------------------------|
//! | [`adjust`]   | point color adjustments (brightness, hsl, sepia, noise, ...)   |
//! | [`convolve`] | 3x3 neighborhood filters (edges, sharpen, outline, ...)        |
//! | [`stylize`]  | pattern and tile effects (pixelate, pointillize, histograms)   |
//! | [`blur`]     | iterative resampling effects (blur family, glow, unsharp mask) |
//! | [`chroma`]   | chroma keys                                                    |
//! | [`geometry`] | crop, flip, resize, rotate, reflect                            |
//! | [`blend`]    | two-buffer blend                                               |
//!
//! Every filter is a plain function over a [`FilterContext`]; the module
//! functions here build their [`FilterDescriptor`]s.

use filtr_core::{Linear, PixelBuffer, Requirement};

use crate::context::FilterContext;
use crate::error::FilterResult;
use crate::options::OptionMap;
use crate::registry::{FilterDescriptor, Scope};

pub mod adjust;
pub mod blend;
pub mod blur;
pub mod chroma;
pub mod convolve;
pub mod geometry;
pub mod stylize;

pub(crate) const PIXEL_READ: &[Requirement] = &[Requirement::PixelRead];
pub(crate) const PIXEL_READ_ALPHA: &[Requirement] = &[Requirement::PixelRead, Requirement::AlphaChannel];

/// Every built-in filter.
pub fn builtin() -> Vec<FilterDescriptor> {
    let mut all = Vec::new();
    all.extend(adjust::descriptors());
    all.extend(convolve::descriptors());
    all.extend(stylize::descriptors());
    all.extend(blur::descriptors());
    all.extend(chroma::descriptors());
    all.extend(geometry::descriptors());
    all.extend(blend::descriptors());
    all
}

/// A region-scoped descriptor.
pub(crate) fn region(
    name: &'static str,
    summary: &'static str,
    requires: &'static [Requirement],
    defaults: fn() -> OptionMap,
    apply: fn(&mut FilterContext<'_>) -> FilterResult,
) -> FilterDescriptor {
    FilterDescriptor {
        name,
        summary,
        scope: Scope::Region,
        requires,
        defaults,
        apply,
    }
}

/// A whole-buffer descriptor.
pub(crate) fn whole(
    name: &'static str,
    summary: &'static str,
    requires: &'static [Requirement],
    defaults: fn() -> OptionMap,
    apply: fn(&mut FilterContext<'_>) -> FilterResult,
) -> FilterDescriptor {
    FilterDescriptor {
        scope: Scope::Whole,
        ..region(name, summary, requires, defaults, apply)
    }
}

/// Rewrites every pixel in linear order.
pub(crate) fn map_pixels(buf: &mut PixelBuffer, mut f: impl FnMut([u8; 4]) -> [u8; 4]) {
    for at in Linear::new(buf.shape()) {
        let px = buf.read(at);
        buf.write(at, f(px));
    }
}

/// Rewrites the color channels of every pixel through a lookup table.
pub(crate) fn map_lut(buf: &mut PixelBuffer, lut: &[u8; 256]) {
    map_pixels(buf, |[r, g, b, a]| {
        [lut[r as usize], lut[g as usize], lut[b as usize], a]
    });
}

/// Builds a 256-entry table from `f`, clamped and rounded.
pub(crate) fn build_lut(f: impl Fn(f64) -> f64) -> [u8; 256] {
    std::array::from_fn(|i| filtr_color::clamp_channel(f(i as f64)))
}

/// `v` clamped to `[lo, hi]`; NaN becomes `fallback`.
#[inline]
pub(crate) fn bound(v: f64, lo: f64, hi: f64, fallback: f64) -> f64 {
    if v.is_nan() { fallback } else { v.clamp(lo, hi) }
}

#[cfg(test)]
pub(crate) mod testutil {
    use filtr_core::PixelBuffer;

    use crate::context::Host;
    use crate::registry::FilterRegistry;

    /// Runs one option string on `buf` with full capabilities and a fixed seed.
    pub fn run(buf: &mut PixelBuffer, invocation: &str) -> bool {
        FilterRegistry::with_builtin()
            .apply(buf, invocation, &Host::new().with_seed(42))
            .unwrap()
    }

    /// A `w x h` buffer whose pixels step through distinct colors.
    pub fn gradient(w: u32, h: u32) -> PixelBuffer {
        let mut bytes = Vec::new();
        for y in 0..h {
            for x in 0..w {
                bytes.extend([(x * 37 % 256) as u8, (y * 53 % 256) as u8, ((x + y) * 20 % 256) as u8, 255]);
            }
        }
        PixelBuffer::from_rgba(w, h, bytes).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_unique() {
        let all = builtin();
        let mut names: Vec<_> = all.iter().map(|d| d.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), all.len());
        assert_eq!(all.len(), 53);
    }

    #[test]
    fn test_every_filter_runs_with_defaults() {
        use crate::context::Host;
        use crate::registry::FilterRegistry;
        let registry = FilterRegistry::with_builtin();
        for name in registry.names() {
            if name == "blend" {
                continue;
            }
            let mut buf = testutil::gradient(9, 7);
            let out = registry.apply(&mut buf, name, &Host::new().with_seed(1));
            assert!(out.is_ok(), "{name}: {out:?}");
        }
    }

    #[test]
    fn test_build_lut() {
        let lut = build_lut(|v| v * 2.0);
        assert_eq!(lut[0], 0);
        assert_eq!(lut[100], 200);
        assert_eq!(lut[200], 255);
    }
}
