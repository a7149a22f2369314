//! Blend engine: two-buffer per-pixel compositing.
//!
//! Each [`BlendMode`] is a pure function of a base channel and a blend
//! channel, clamped to `0..=255`. [`blend`] runs a mode over two
//! same-shaped buffers and then applies a global `amount` in one of two
//! ways, picked from the host [`Capabilities`]:
//!
//! - [`AmountPath::Interpolate`] - per-pixel linear interpolation of the
//!   color channels from base toward the blended result, weighted by
//!   `amount` times the layer alpha
//! - [`AmountPath::Composite`] - the blended buffer composited over the
//!   base with a global alpha of `amount` ([`over_pixel`])
//!
//! Both paths agree to within one step of rounding, including where the
//! layer is transparent (a smaller companion padded to the base size).
//!
//! # Example
//!
//! ```rust
//! use filtr_ops::composite::{blend_channel, BlendMode};
//!
//! assert_eq!(blend_channel(BlendMode::Multiply, 200, 255), 200);
//! assert_eq!(blend_channel(BlendMode::Screen, 0, 0), 0);
//! assert_eq!(BlendMode::from_name("Hard-Light"), BlendMode::HardLight);
//! ```

use filtr_color::{clamp_channel, reduce_color, trunc_channel, Reduce};
use filtr_core::{Capabilities, Linear, PixelBuffer};
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Blend mode for two-buffer compositing. `base` is the buffer being
/// filtered, `blend` the companion layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// The blend layer as is.
    #[default]
    Normal,
    /// `base * blend / 255`
    Multiply,
    /// Inverse multiply.
    Screen,
    /// Multiply or screen, chosen by the base.
    Overlay,
    /// Multiply or screen, chosen by the blend layer.
    HardLight,
    /// Gentle overlay.
    SoftLight,
    /// Brighten the base by the blend layer.
    ColorDodge,
    /// Darken the base by the blend layer.
    ColorBurn,
    /// `base + blend`
    LinearDodge,
    /// `base + blend - 255`
    LinearBurn,
    /// `base + 2 * blend - 256`
    LinearLight,
    /// Color burn or dodge, chosen by the blend layer.
    VividLight,
    /// Darken or lighten, chosen by the blend layer.
    PinLight,
    /// Vivid light thresholded to 0 or 255.
    HardMix,
    /// `|base - blend|`
    Difference,
    /// Softer difference.
    Exclusion,
    /// Per-channel maximum.
    Lighten,
    /// Per-channel minimum.
    Darken,
    /// Whole pixel with the higher weighted intensity.
    LighterColor,
    /// Whole pixel with the lower weighted intensity.
    DarkerColor,
}

impl BlendMode {
    /// All modes.
    pub const ALL: [BlendMode; 20] = [
        Self::Normal,
        Self::Multiply,
        Self::Screen,
        Self::Overlay,
        Self::HardLight,
        Self::SoftLight,
        Self::ColorDodge,
        Self::ColorBurn,
        Self::LinearDodge,
        Self::LinearBurn,
        Self::LinearLight,
        Self::VividLight,
        Self::PinLight,
        Self::HardMix,
        Self::Difference,
        Self::Exclusion,
        Self::Lighten,
        Self::Darken,
        Self::LighterColor,
        Self::DarkerColor,
    ];

    /// Canonical lower-case name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::HardLight => "hardlight",
            Self::SoftLight => "softlight",
            Self::ColorDodge => "colordodge",
            Self::ColorBurn => "colorburn",
            Self::LinearDodge => "lineardodge",
            Self::LinearBurn => "linearburn",
            Self::LinearLight => "linearlight",
            Self::VividLight => "vividlight",
            Self::PinLight => "pinlight",
            Self::HardMix => "hardmix",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
            Self::Lighten => "lighten",
            Self::Darken => "darken",
            Self::LighterColor => "lightercolor",
            Self::DarkerColor => "darkercolor",
        }
    }

    /// Looks a mode up by name, ignoring case, `-`, `_` and spaces.
    /// Unknown names fall back to [`BlendMode::Normal`].
    pub fn from_name(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|m| m.name() == key)
            .unwrap_or_default()
    }

    /// Returns true for modes that compare whole pixels rather than channels.
    pub const fn is_pixel_mode(&self) -> bool {
        matches!(self, Self::LighterColor | Self::DarkerColor)
    }
}

impl std::fmt::Display for BlendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Blends one channel.
///
/// Pixel-level modes ([`BlendMode::LighterColor`], [`BlendMode::DarkerColor`])
/// have no per-channel meaning and return `blend` here; use [`blend_pixel`].
pub fn blend_channel(mode: BlendMode, base: u8, blend: u8) -> u8 {
    let d = base as f64;
    let s = blend as f64;
    let v = match mode {
        BlendMode::Normal | BlendMode::LighterColor | BlendMode::DarkerColor => s,
        BlendMode::Multiply => d * s / 255.0,
        BlendMode::Screen => 255.0 - (255.0 - d) * (255.0 - s) / 255.0,
        BlendMode::Overlay => hard_light(s, d),
        BlendMode::HardLight => hard_light(d, s),
        BlendMode::SoftLight => {
            let half = (blend >> 1) as f64;
            if base < 128 {
                (half + 64.0) * d * 2.0 / 255.0
            } else {
                255.0 - (191.0 - half) * (255.0 - d) * 2.0 / 255.0
            }
        }
        BlendMode::ColorDodge => dodge(d, s),
        BlendMode::ColorBurn => burn(d, s),
        BlendMode::LinearDodge => d + s,
        BlendMode::LinearBurn => d + s - 255.0,
        BlendMode::LinearLight => 2.0 * s + d - 256.0,
        BlendMode::VividLight => vivid_light(d, s),
        BlendMode::PinLight => {
            if blend < 128 {
                d.min(2.0 * s)
            } else {
                d.max(2.0 * s - 256.0)
            }
        }
        BlendMode::HardMix => {
            if vivid_light(d, s) < 128.0 {
                0.0
            } else {
                255.0
            }
        }
        BlendMode::Difference => (d - s).abs(),
        BlendMode::Exclusion => d + s - 2.0 * d * s / 255.0,
        BlendMode::Lighten => d.max(s),
        BlendMode::Darken => d.min(s),
    };
    clamp_channel(v)
}

/// Multiply below mid-gray of `by`, screen above.
fn hard_light(other: f64, by: f64) -> f64 {
    if by < 128.0 {
        other * by * 2.0 / 255.0
    } else {
        255.0 - (255.0 - other) * (255.0 - by) * 2.0 / 255.0
    }
}

fn dodge(d: f64, s: f64) -> f64 {
    if s >= 255.0 {
        255.0
    } else {
        (d * 256.0 / (255.0 - s)).min(255.0)
    }
}

fn burn(d: f64, s: f64) -> f64 {
    if s <= 0.0 {
        0.0
    } else {
        (255.0 - (255.0 - d) * 256.0 / s).max(0.0)
    }
}

fn vivid_light(d: f64, s: f64) -> f64 {
    if s < 128.0 {
        burn(d, 2.0 * s)
    } else {
        dodge(d, 2.0 * s - 256.0)
    }
}

/// Blends one pixel. Color channels come from the mode; alpha from `blend`.
pub fn blend_pixel(mode: BlendMode, base: [u8; 4], blend: [u8; 4]) -> [u8; 4] {
    match mode {
        BlendMode::LighterColor | BlendMode::DarkerColor => {
            let lb = reduce_color(base[0], base[1], base[2], Reduce::Weighted);
            let ls = reduce_color(blend[0], blend[1], blend[2], Reduce::Weighted);
            let keep_base = if mode == BlendMode::LighterColor { lb > ls } else { lb <= ls };
            if keep_base {
                [base[0], base[1], base[2], blend[3]]
            } else {
                blend
            }
        }
        _ => [
            blend_channel(mode, base[0], blend[0]),
            blend_channel(mode, base[1], blend[1]),
            blend_channel(mode, base[2], blend[2]),
            blend[3],
        ],
    }
}

/// Composites foreground over background (Porter-Duff Over), straight alpha
/// in `[0, 1]`.
///
/// ```rust
/// use filtr_ops::composite::over_pixel;
///
/// let fg = [1.0, 0.0, 0.0, 0.5];
/// let bg = [0.0, 0.0, 1.0, 1.0];
/// let out = over_pixel(fg, bg);
/// assert!(out[0] > 0.4 && out[2] > 0.4);
/// assert_eq!(out[3], 1.0);
/// ```
#[inline]
pub fn over_pixel(fg: [f32; 4], bg: [f32; 4]) -> [f32; 4] {
    let fg_a = fg[3];
    let bg_a = bg[3];
    let out_a = fg_a + bg_a * (1.0 - fg_a);

    if out_a < 1e-8 {
        return [0.0, 0.0, 0.0, 0.0];
    }

    let inv_out_a = 1.0 / out_a;
    [
        (fg[0] * fg_a + bg[0] * bg_a * (1.0 - fg_a)) * inv_out_a,
        (fg[1] * fg_a + bg[1] * bg_a * (1.0 - fg_a)) * inv_out_a,
        (fg[2] * fg_a + bg[2] * bg_a * (1.0 - fg_a)) * inv_out_a,
        out_a,
    ]
}

/// [`over_pixel`] for RGBA8 with an extra global alpha on the foreground.
#[inline]
pub fn over_rgba8(fg: [u8; 4], bg: [u8; 4], alpha: f64) -> [u8; 4] {
    let norm = |p: [u8; 4], a: f32| {
        [
            p[0] as f32 / 255.0,
            p[1] as f32 / 255.0,
            p[2] as f32 / 255.0,
            p[3] as f32 / 255.0 * a,
        ]
    };
    let out = over_pixel(norm(fg, alpha.clamp(0.0, 1.0) as f32), norm(bg, 1.0));
    out.map(|c| clamp_channel(c as f64 * 255.0))
}

/// How the global blend amount is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountPath {
    /// Per-pixel interpolation of color channels.
    Interpolate,
    /// Whole-buffer alpha composite.
    Composite,
}

impl AmountPath {
    /// Composite when the host supports it, interpolate otherwise.
    pub fn for_caps(caps: &Capabilities) -> Self {
        if caps.whole_buffer_alpha_composite {
            Self::Composite
        } else {
            Self::Interpolate
        }
    }
}

/// Blends `layer` onto `base` in place.
///
/// `amount` is clamped to `[0, 1]`; NaN counts as 1.
///
/// # Errors
///
/// Fails with a dimension mismatch if the buffers differ in size.
pub fn blend(
    base: &mut PixelBuffer,
    layer: &PixelBuffer,
    mode: BlendMode,
    amount: f64,
    path: AmountPath,
) -> filtr_core::Result<()> {
    base.ensure_same_shape(layer)?;
    let amount = if amount.is_nan() { 1.0 } else { amount.clamp(0.0, 1.0) };
    trace!(width = base.width(), height = base.height(), %mode, amount, ?path, "composite::blend");

    for at in Linear::new(base.shape()) {
        let d = base.read(at);
        let s = blend_pixel(mode, d, layer.read(at));
        let out = match path {
            AmountPath::Interpolate => interpolate(d, s, amount),
            AmountPath::Composite => over_rgba8(s, d, amount),
        };
        base.write(at, out);
    }
    Ok(())
}

/// Moves `base` toward `blended` by `amount` times the blended alpha.
///
/// The weight is taken relative to the resulting coverage, so a translucent
/// base ends up where [`over_rgba8`] puts it.
#[inline]
fn interpolate(base: [u8; 4], blended: [u8; 4], amount: f64) -> [u8; 4] {
    let t = amount * blended[3] as f64 / 255.0;
    let cover = t + base[3] as f64 / 255.0 * (1.0 - t);
    if cover < 1e-8 {
        return [0, 0, 0, 0];
    }
    let k = t / cover;
    let mix = |c: usize| trunc_channel(base[c] as f64 + (blended[c] as f64 - base[c] as f64) * k);
    [mix(0), mix(1), mix(2), clamp_channel(cover * 255.0)]
}
