//! Point color adjustments.
//!
//! Every filter here visits the region once in [`Linear`](filtr_core::Linear)
//! order (posterize uses [`Matrix`]) and rewrites each pixel from its own
//! value alone.

use filtr_color::{
    clamp_channel, hsb_to_rgb, luma, random_int, reduce_color, rgb_to_hsb, rgb_to_yuv, trunc_channel,
    yuv_to_rgb, HslShift, Reduce,
};
use filtr_core::Matrix;
#[allow(unused_imports)]
use tracing::{debug, trace};

use super::{bound, build_lut, map_lut, map_pixels, region, PIXEL_READ, PIXEL_READ_ALPHA};
use crate::context::FilterContext;
use crate::error::FilterResult;
use crate::options::{OptionMap, OptionValue};
use crate::registry::FilterDescriptor;

pub(crate) fn descriptors() -> Vec<FilterDescriptor> {
    vec![
        region("adjusthsba", "scale hue, saturation, brightness and alpha", PIXEL_READ, || {
            OptionMap::new()
                .with("hue", 1.0)
                .with("saturation", 1.0)
                .with("brightness", 1.0)
                .with("alpha", 1.0)
        }, adjusthsba),
        region("adjustrgba", "scale each channel", PIXEL_READ, || {
            OptionMap::new()
                .with("red", 1.0)
                .with("green", 1.0)
                .with("blue", 1.0)
                .with("alpha", 1.0)
        }, adjustrgba),
        region("adjustyuva", "scale luminance and chroma", PIXEL_READ, || {
            OptionMap::new()
                .with("luminance", 1.0)
                .with("blueyellow", 1.0)
                .with("redcyan", 1.0)
                .with("alpha", 1.0)
        }, adjustyuva),
        region("alpha", "set a uniform opacity", PIXEL_READ_ALPHA, || {
            OptionMap::new().with("opacity", 100.0)
        }, alpha),
        region("alphamask", "turn luminance into transparency", PIXEL_READ_ALPHA, OptionMap::new, alphamask),
        region("brightness", "brightness and contrast", PIXEL_READ, || {
            OptionMap::new()
                .with("brightness", 0.0)
                .with("contrast", 0.0)
                .with("legacy", false)
        }, brightness),
        region("contrast", "contrast around mid gray", PIXEL_READ, || {
            OptionMap::new().with("contrast", 1.0)
        }, contrast),
        region("duotone", "gray plus a per-channel offset", PIXEL_READ, || {
            OptionMap::new()
                .with("average", true)
                .with("addr", 0.0)
                .with("addg", 0.0)
                .with("addb", 0.0)
        }, duotone),
        region("exposure", "exponential exposure curve", PIXEL_READ, || {
            OptionMap::new().with("amount", 1.0)
        }, exposure),
        region("gamma", "gamma curve", PIXEL_READ, || OptionMap::new().with("amount", 1.0), gamma),
        region("gray", "grayscale", PIXEL_READ, || OptionMap::new().with("average", true), gray),
        region("hsl", "hue rotation, saturation and lightness", PIXEL_READ, || {
            OptionMap::new()
                .with("hue", 0.0)
                .with("saturation", 0.0)
                .with("lightness", 0.0)
        }, hsl),
        region("invert", "negative", PIXEL_READ, || OptionMap::new().with("invertalpha", false), invert),
        region("invertalpha", "invert transparency", PIXEL_READ_ALPHA, OptionMap::new, invertalpha),
        region("lighten", "scale towards white or black", PIXEL_READ, || {
            OptionMap::new().with("amount", 0.0)
        }, lighten),
        region("mixrgb", "cross-mix channels", PIXEL_READ, || {
            let zero = || OptionMap::new().with("r", 0.0).with("g", 0.0).with("b", 0.0);
            OptionMap::new().with("channel1", zero()).with("channel2", zero())
        }, mixrgb),
        region("monochrome", "two-color threshold", PIXEL_READ, || {
            OptionMap::new()
                .with("average", true)
                .with("threshold", 127.0)
                .with("dark", [0u8, 0, 0])
                .with("light", [255u8, 255, 255])
        }, monochrome),
        region("noise", "random per-pixel noise", PIXEL_READ, || {
            OptionMap::new().with("strength", 50.0).with("mono", true)
        }, noise),
        region("posterize", "reduce each channel to a few levels", PIXEL_READ, || {
            OptionMap::new().with("levels", 4.0)
        }, posterize),
        region("sepia", "sepia tone", PIXEL_READ, || OptionMap::new().with("mode", 1.0), sepia),
        region("solarize", "invert the bright half", PIXEL_READ, OptionMap::new, solarize),
        region("tritone", "map luminance onto three colors", PIXEL_READ, || {
            OptionMap::new()
                .with("low", [255u8, 0, 0])
                .with("mid", [0u8, 255, 0])
                .with("high", [0u8, 0, 255])
        }, tritone),
        region("unredeyes", "pull dominant red down", PIXEL_READ, || {
            OptionMap::new().with("threshold", 1.6)
        }, unredeyes),
    ]
}

fn adjusthsba(ctx: &mut FilterContext<'_>) -> FilterResult {
    let o = &ctx.options;
    let (mh, ms, mb, ma) = (o.number("hue"), o.number("saturation"), o.number("brightness"), o.number("alpha"));
    map_pixels(&mut ctx.buffer, |[r, g, b, a]| {
        let hsb = rgb_to_hsb(r, g, b);
        let [r, g, b] = hsb_to_rgb(
            bound(hsb.h * mh, 0.0, 360.0, 0.0),
            bound(hsb.s * ms, 0.0, 100.0, 0.0),
            bound(hsb.b * mb, 0.0, 100.0, 0.0),
        );
        [r, g, b, clamp_channel(a as f64 * ma)]
    });
    Ok(true)
}

fn adjustrgba(ctx: &mut FilterContext<'_>) -> FilterResult {
    let o = &ctx.options;
    let m = [o.number("red"), o.number("green"), o.number("blue"), o.number("alpha")];
    map_pixels(&mut ctx.buffer, |px| std::array::from_fn(|c| clamp_channel(px[c] as f64 * m[c])));
    Ok(true)
}

fn adjustyuva(ctx: &mut FilterContext<'_>) -> FilterResult {
    let o = &ctx.options;
    let (my, mu, mv, ma) = (o.number("luminance"), o.number("blueyellow"), o.number("redcyan"), o.number("alpha"));
    map_pixels(&mut ctx.buffer, |[r, g, b, a]| {
        let yuv = rgb_to_yuv(r, g, b);
        let [r, g, b] = yuv_to_rgb(yuv.y * my, yuv.u * mu, yuv.v * mv);
        [r, g, b, clamp_channel(a as f64 * ma)]
    });
    Ok(true)
}

fn alpha(ctx: &mut FilterContext<'_>) -> FilterResult {
    let opacity = trunc_channel(ctx.options.number("opacity") / 100.0 * 255.0);
    map_pixels(&mut ctx.buffer, |[r, g, b, _]| [r, g, b, opacity]);
    Ok(true)
}

fn alphamask(ctx: &mut FilterContext<'_>) -> FilterResult {
    map_pixels(&mut ctx.buffer, |[r, g, b, _]| [0, 0, 0, 255 - clamp_channel(luma(r, g, b))]);
    Ok(true)
}

/// `(mul, add)` for the brightness filter.
fn brightness_terms(brightness: f64, contrast: f64, legacy: bool) -> (f64, f64) {
    let contrast = (contrast + 1.0).max(0.0);
    let b = bound(brightness, -150.0, 150.0, 0.0);
    let b = if legacy { b } else { 1.0 + b / 150.0 };
    if contrast != 1.0 {
        if legacy {
            (contrast, (b - 128.0) * contrast + 128.0)
        } else {
            (b * contrast, -contrast * 128.0 + 128.0)
        }
    } else if legacy {
        (1.0, b)
    } else {
        (b, 0.0)
    }
}

fn brightness(ctx: &mut FilterContext<'_>) -> FilterResult {
    let o = &ctx.options;
    let (mul, add) = brightness_terms(o.number("brightness"), o.number("contrast"), o.flag("legacy"));
    debug!(mul, add, "brightness terms");
    let lut = build_lut(|v| v * mul + add);
    map_lut(&mut ctx.buffer, &lut);
    Ok(true)
}

fn contrast(ctx: &mut FilterContext<'_>) -> FilterResult {
    let v = ctx.options.number("contrast");
    let v = if v >= 0.0 { v } else { 1.0 };
    let lut = build_lut(|c| ((c / 255.0 - 0.5) * v + 0.5) * 255.0);
    map_lut(&mut ctx.buffer, &lut);
    Ok(true)
}

fn duotone(ctx: &mut FilterContext<'_>) -> FilterResult {
    let o = &ctx.options;
    let mode = Reduce::from_average(o.flag("average"));
    let add = [o.number("addr"), o.number("addg"), o.number("addb")];
    map_pixels(&mut ctx.buffer, |[r, g, b, a]| {
        let m = reduce_color(r, g, b, mode);
        [clamp_channel(m + add[0]), clamp_channel(m + add[1]), clamp_channel(m + add[2]), a]
    });
    Ok(true)
}

fn exposure(ctx: &mut FilterContext<'_>) -> FilterResult {
    let m = bound(ctx.options.number("amount"), 0.0, 255.0, 1.0);
    if m == 1.0 {
        return Ok(false);
    }
    let lut = build_lut(|i| 255.0 * (1.0 - (-(i / 255.0) * m).exp()));
    map_lut(&mut ctx.buffer, &lut);
    Ok(true)
}

fn gamma(ctx: &mut FilterContext<'_>) -> FilterResult {
    let amount = ctx.options.number("amount");
    if !(amount > 0.0 && amount.is_finite()) {
        return Ok(false);
    }
    let lut = build_lut(|i| 255.0 * (i / 255.0).powf(1.0 / amount));
    map_lut(&mut ctx.buffer, &lut);
    Ok(true)
}

fn gray(ctx: &mut FilterContext<'_>) -> FilterResult {
    let mode = Reduce::from_average(ctx.options.flag("average"));
    map_pixels(&mut ctx.buffer, |[r, g, b, a]| {
        let v = clamp_channel(reduce_color(r, g, b, mode));
        [v, v, v, a]
    });
    Ok(true)
}

fn hsl(ctx: &mut FilterContext<'_>) -> FilterResult {
    let o = &ctx.options;
    let shift = HslShift::new(o.number("hue"), o.number("saturation"), o.number("lightness"));
    if shift.is_identity() {
        return Ok(false);
    }
    map_pixels(&mut ctx.buffer, |[r, g, b, a]| {
        let [r, g, b] = shift.apply(r, g, b);
        [r, g, b, a]
    });
    Ok(true)
}

fn invert(ctx: &mut FilterContext<'_>) -> FilterResult {
    let with_alpha = ctx.options.flag("invertalpha") && ctx.caps.alpha_channel;
    map_pixels(&mut ctx.buffer, |[r, g, b, a]| {
        [255 - r, 255 - g, 255 - b, if with_alpha { 255 - a } else { a }]
    });
    Ok(true)
}

fn invertalpha(ctx: &mut FilterContext<'_>) -> FilterResult {
    map_pixels(&mut ctx.buffer, |[r, g, b, a]| [r, g, b, 255 - a]);
    Ok(true)
}

fn lighten(ctx: &mut FilterContext<'_>) -> FilterResult {
    let mul = bound(ctx.options.number("amount"), -1.0, 1.0, 0.0) + 1.0;
    let lut = build_lut(|v| v * mul);
    map_lut(&mut ctx.buffer, &lut);
    Ok(true)
}

fn mixrgb(ctx: &mut FilterContext<'_>) -> FilterResult {
    let read = |key: &str| {
        let m = ctx.options.map(key);
        let get = |c: &str| m.get(c).and_then(OptionValue::as_f64).unwrap_or(0.0);
        [get("r"), get("g"), get("b")]
    };
    let [r1, g1, b1] = read("channel1");
    let [r2, g2, b2] = read("channel2");
    map_pixels(&mut ctx.buffer, |[r, g, b, a]| {
        let (r, g, b) = (r as f64, g as f64, b as f64);
        let mix = |w1: f64, w2: f64, x: f64, y: f64, own: f64| {
            clamp_channel((w1 * (w2 * x + (255.0 - w2) * y) / 255.0 + (255.0 - w1) * own) / 255.0)
        };
        [
            mix(r1, b2, g, b, r),
            mix(g1, r2, b, r, g),
            mix(b1, g2, r, g, b),
            a,
        ]
    });
    Ok(true)
}

fn monochrome(ctx: &mut FilterContext<'_>) -> FilterResult {
    let o = &ctx.options;
    let mode = Reduce::from_average(o.flag("average"));
    let threshold = o.number("threshold");
    let (dark, light) = (o.color("dark"), o.color("light"));
    map_pixels(&mut ctx.buffer, |[r, g, b, a]| {
        let [r, g, b] = if reduce_color(r, g, b, mode) <= threshold { dark } else { light };
        [r, g, b, a]
    });
    Ok(true)
}

fn noise(ctx: &mut FilterContext<'_>) -> FilterResult {
    use rand::Rng;

    let strength = bound(ctx.options.number("strength"), 0.0, 255.0, 0.0).abs() as i32;
    let mono = ctx.options.flag("mono");
    let rng = &mut ctx.rng;
    map_pixels(&mut ctx.buffer, |[r, g, b, a]| {
        if !rng.gen_bool(0.5) {
            return [r, g, b, a];
        }
        let shift = |v: u8, m: i32| (v as i32 + m).clamp(0, 255) as u8;
        if mono {
            let m = random_int(rng, -strength, strength);
            [shift(r, m), shift(g, m), shift(b, m), a]
        } else {
            let mr = random_int(rng, -strength, strength);
            let mg = random_int(rng, -strength, strength);
            let mb = random_int(rng, -strength, strength);
            [shift(r, mr), shift(g, mg), shift(b, mb), a]
        }
    });
    Ok(true)
}

/// Output level for `v` with `levels` levels.
fn posterize_level(v: u8, levels: f64) -> u8 {
    let areas = 256.0 / levels;
    let values = 256.0 / (levels - 1.0);
    clamp_channel(values * (v as f64 / areas).floor())
}

fn posterize(ctx: &mut FilterContext<'_>) -> FilterResult {
    let levels = bound(ctx.options.number("levels"), 2.0, 256.0, 4.0).round();
    let lut: [u8; 256] = std::array::from_fn(|i| posterize_level(i as u8, levels));
    let buf = &mut ctx.buffer;
    for step in Matrix::new(buf.shape()) {
        let [r, g, b, a] = buf.read(step.offset);
        buf.write(step.offset, [lut[r as usize], lut[g as usize], lut[b as usize], a]);
    }
    Ok(true)
}

fn sepia(ctx: &mut FilterContext<'_>) -> FilterResult {
    let tint = bound(ctx.options.number("mode"), 0.0, 1.0, 1.0) != 0.0;
    map_pixels(&mut ctx.buffer, |[r, g, b, a]| {
        if tint {
            let c = luma(r, g, b);
            [clamp_channel(c + 39.0), clamp_channel(c + 14.0), clamp_channel(c - 36.0), a]
        } else {
            let (r, g, b) = (r as f64, g as f64, b as f64);
            [
                clamp_channel(r * 0.393 + g * 0.769 + b * 0.189),
                clamp_channel(r * 0.349 + g * 0.686 + b * 0.168),
                clamp_channel(r * 0.272 + g * 0.534 + b * 0.131),
                a,
            ]
        }
    });
    Ok(true)
}

fn solarize(ctx: &mut FilterContext<'_>) -> FilterResult {
    let lut: [u8; 256] = std::array::from_fn(|i| if i > 127 { 255 - i as u8 } else { i as u8 });
    map_lut(&mut ctx.buffer, &lut);
    Ok(true)
}

/// Luminance-indexed table blending low to mid over `0..=127` and mid to
/// high over `128..=255`.
fn tritone_table(low: [u8; 3], mid: [u8; 3], high: [u8; 3]) -> [[u8; 3]; 256] {
    let lerp = |a: [u8; 3], b: [u8; 3], q: f64| -> [u8; 3] {
        std::array::from_fn(|c| clamp_channel(a[c] as f64 + q * (b[c] as f64 - a[c] as f64)))
    };
    std::array::from_fn(|i| {
        if i < 128 {
            lerp(low, mid, i as f64 / 127.0)
        } else {
            lerp(mid, high, (i as f64 - 127.0) / 128.0)
        }
    })
}

fn tritone(ctx: &mut FilterContext<'_>) -> FilterResult {
    let o = &ctx.options;
    let table = tritone_table(o.color("low"), o.color("mid"), o.color("high"));
    map_pixels(&mut ctx.buffer, |[r, g, b, a]| {
        let [r, g, b] = table[clamp_channel(luma(r, g, b)) as usize];
        [r, g, b, a]
    });
    Ok(true)
}

fn unredeyes(ctx: &mut FilterContext<'_>) -> FilterResult {
    let threshold = ctx.options.number("threshold");
    map_pixels(&mut ctx.buffer, |[r, g, b, a]| {
        let gb = g as f64 + b as f64;
        let ratio = if gb > 0.0 {
            2.0 * r as f64 / gb
        } else if r > 0 {
            2.0
        } else {
            0.0
        };
        if ratio > threshold {
            [clamp_channel(gb / 2.0), g, b, a]
        } else {
            [r, g, b, a]
        }
    });
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::testutil::{gradient, run};
    use filtr_core::PixelBuffer;

    fn px(rgba: [u8; 4]) -> PixelBuffer {
        PixelBuffer::filled(1, 1, rgba).unwrap()
    }

    fn one(rgba: [u8; 4], invocation: &str) -> [u8; 4] {
        let mut buf = px(rgba);
        run(&mut buf, invocation);
        buf.get(0, 0).unwrap()
    }

    #[test]
    fn test_invert_end_to_end() {
        let mut buf = PixelBuffer::filled(2, 2, [255, 0, 0, 255]).unwrap();
        assert!(run(&mut buf, "invert"));
        assert!(buf.pixels().all(|p| p == [0, 255, 255, 255]));
    }

    #[test]
    fn test_invert_twice_is_identity() {
        let src = gradient(7, 5);
        let mut buf = src.clone();
        run(&mut buf, "invert[invertalpha:true]");
        run(&mut buf, "invert[invertalpha:true]");
        assert_eq!(buf, src);
    }

    #[test]
    fn test_invert_alpha_needs_capability() {
        use crate::{FilterRegistry, Host};
        use filtr_core::Capabilities;
        let mut buf = px([10, 20, 30, 40]);
        let host = Host::new().with_caps(Capabilities::full().with_alpha_channel(false));
        FilterRegistry::with_builtin()
            .apply(&mut buf, "invert[invertalpha:true]", &host)
            .unwrap();
        assert_eq!(buf.get(0, 0), Some([245, 235, 225, 40]));
    }

    #[test]
    fn test_brightness_neutral_is_identity() {
        let src = gradient(16, 16);
        for inv in ["brightness", "brightness[legacy:true]"] {
            let mut buf = src.clone();
            run(&mut buf, inv);
            for (a, b) in buf.bytes().iter().zip(src.bytes()) {
                assert!((*a as i32 - *b as i32).abs() <= 1, "{inv}");
            }
        }
    }

    #[test]
    fn test_brightness_terms() {
        assert_eq!(brightness_terms(0.0, 0.0, false), (1.0, 0.0));
        assert_eq!(brightness_terms(0.0, 0.0, true), (1.0, 0.0));
        assert_eq!(brightness_terms(50.0, 0.0, true), (1.0, 50.0));
        assert_eq!(brightness_terms(500.0, 0.0, true), (1.0, 150.0));
        assert_eq!(brightness_terms(150.0, 0.0, false), (2.0, 0.0));
        assert_eq!(brightness_terms(0.0, 1.0, false), (2.0, -128.0));
        assert_eq!(brightness_terms(28.0, 1.0, true), (2.0, -72.0));
        assert_eq!(brightness_terms(0.0, -5.0, false), (0.0, 128.0));
    }

    #[test]
    fn test_posterize_two_levels() {
        let mut buf = gradient(16, 16);
        run(&mut buf, "posterize[levels:2]");
        for p in buf.pixels() {
            for c in &p[..3] {
                assert!(*c == 0 || *c == 255);
            }
        }
        assert_eq!(posterize_level(127, 2.0), 0);
        assert_eq!(posterize_level(128, 2.0), 255);
        assert_eq!(posterize_level(100, 4.0), 85);
    }

    #[test]
    fn test_gray_modes() {
        assert_eq!(one([10, 20, 30, 200], "gray"), [20, 20, 20, 200]);
        assert_eq!(one([10, 20, 30, 200], "gray[average:false]"), [18, 18, 18, 200]);
    }

    #[test]
    fn test_alpha_and_mask() {
        assert_eq!(one([1, 2, 3, 255], "alpha[opacity:50]"), [1, 2, 3, 127]);
        assert_eq!(one([255, 255, 255, 255], "alphamask"), [0, 0, 0, 0]);
        assert_eq!(one([0, 0, 0, 255], "alphamask"), [0, 0, 0, 255]);
        assert_eq!(one([1, 2, 3, 100], "invertalpha"), [1, 2, 3, 155]);
    }

    #[test]
    fn test_adjust_identity_defaults() {
        let src = gradient(8, 8);
        for inv in ["adjustrgba", "adjustyuva"] {
            let mut buf = src.clone();
            run(&mut buf, inv);
            for (a, b) in buf.bytes().iter().zip(src.bytes()) {
                assert!((*a as i32 - *b as i32).abs() <= 1, "{inv}");
            }
        }
        assert_eq!(one([100, 50, 25, 200], "adjustrgba[red:2,alpha:0.5]"), [200, 50, 25, 100]);
    }

    #[test]
    fn test_adjusthsba_brightness() {
        assert_eq!(one([255, 0, 0, 255], "adjusthsba[brightness:0]"), [0, 0, 0, 255]);
        assert_eq!(one([255, 0, 0, 255], "adjusthsba[saturation:0]"), [255, 255, 255, 255]);
    }

    #[test]
    fn test_contrast_and_lighten() {
        assert_eq!(one([0, 128, 255, 255], "contrast[contrast:0]"), [128, 128, 128, 255]);
        assert_eq!(one([100, 200, 0, 255], "lighten[amount:0.5]"), [150, 255, 0, 255]);
        assert_eq!(one([100, 200, 0, 255], "lighten[amount:-1]"), [0, 0, 0, 255]);
    }

    #[test]
    fn test_exposure_and_gamma() {
        let mut buf = px([9, 9, 9, 255]);
        assert!(!run(&mut buf, "exposure"));
        assert!(!run(&mut buf, "gamma[amount:0]"));
        assert_eq!(one([64, 128, 255, 255], "gamma"), [64, 128, 255, 255]);
        let [r, ..] = one([128, 0, 0, 255], "gamma[amount:2]");
        assert_eq!(r, 181);
        let [r, g, ..] = one([255, 0, 0, 255], "exposure[amount:2]");
        assert_eq!((r, g), (220, 0));
    }

    #[test]
    fn test_duotone_reads_blue() {
        assert_eq!(one([30, 0, 90, 255], "duotone[addr:10]"), [50, 40, 40, 255]);
    }

    #[test]
    fn test_monochrome() {
        assert_eq!(one([10, 10, 10, 255], "monochrome"), [0, 0, 0, 255]);
        assert_eq!(one([200, 200, 200, 9], "monochrome[light:#ff0000]"), [255, 0, 0, 9]);
        assert_eq!(one([200, 200, 200, 9], "monochrome[light:r:1;g:2;b:3]"), [1, 2, 3, 9]);
    }

    #[test]
    fn test_sepia_modes() {
        assert_eq!(one([100, 100, 100, 255], "sepia"), [139, 114, 64, 255]);
        // matrix mode reads the unmodified channels
        assert_eq!(one([100, 100, 100, 255], "sepia[mode:0]"), [135, 120, 94, 255]);
    }

    #[test]
    fn test_solarize_tritone_unredeyes() {
        assert_eq!(one([100, 200, 128, 7], "solarize"), [100, 55, 127, 7]);
        assert_eq!(one([0, 0, 0, 255], "tritone"), [255, 0, 0, 255]);
        assert_eq!(one([255, 255, 255, 255], "tritone"), [0, 0, 255, 255]);
        assert_eq!(one([200, 20, 40, 255], "unredeyes"), [30, 20, 40, 255]);
        assert_eq!(one([100, 90, 90, 255], "unredeyes"), [100, 90, 90, 255]);
    }

    #[test]
    fn test_mixrgb() {
        assert_eq!(one([10, 20, 30, 255], "mixrgb"), [10, 20, 30, 255]);
        // channel1.r = 255 and channel2.b = 255: red takes green
        assert_eq!(one([10, 20, 30, 255], "mixrgb[channel1:r:255;g:0;b:0,channel2:r:0;g:0;b:255]"), [20, 20, 30, 255]);
    }

    #[test]
    fn test_noise_seeded_and_bounded() {
        let src = PixelBuffer::filled(16, 16, [128, 128, 128, 255]).unwrap();
        let mut a = src.clone();
        let mut b = src.clone();
        run(&mut a, "noise[strength:10]");
        run(&mut b, "noise[strength:10]");
        assert_eq!(a, b);
        assert_ne!(a, src);
        for p in a.pixels() {
            assert!((118..=138).contains(&p[0]));
            assert_eq!(p[0], p[1]);
            assert_eq!(p[3], 255);
        }
    }

    #[test]
    fn test_hsl_identity_is_unchanged() {
        let mut buf = gradient(4, 4);
        assert!(!run(&mut buf, "hsl"));
        assert!(run(&mut buf, "hsl[hue:180]"));
    }
}
