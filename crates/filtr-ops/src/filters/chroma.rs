//! Chroma keys.

use filtr_color::{clamp_channel, rgb_to_hsb};
use filtr_core::Linear;
#[allow(unused_imports)]
use tracing::{debug, trace};

use super::{region, PIXEL_READ, PIXEL_READ_ALPHA};
use crate::context::FilterContext;
use crate::error::FilterResult;
use crate::options::OptionMap;
use crate::registry::FilterDescriptor;

pub(crate) fn descriptors() -> Vec<FilterDescriptor> {
    vec![
        region("chroma", "key out a color window or screen preset", PIXEL_READ, || {
            OptionMap::new()
                .with("red", 0.0)
                .with("green", 0.0)
                .with("blue", 0.0)
                .with("tolerance", 0.0)
                .with("preset", "rgb")
        }, chroma),
        region("chromahsb", "key out a hue band", PIXEL_READ_ALPHA, || {
            OptionMap::new()
                .with("hue", 127.0)
                .with("huetolerance", 10.0)
                .with("saturationmin", 88.0)
                .with("brightnessmin", 30.0)
                .with("brightnessmax", 82.0)
        }, chromahsb),
    ]
}

/// Pixel predicate for the `chroma` filter.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Key {
    /// Every channel within `tolerance` of the target.
    Window { target: [f64; 3], tolerance: f64 },
    BlueScreen,
    GreenScreen,
}

impl Key {
    fn matches(&self, [r, g, b]: [u8; 3]) -> bool {
        match *self {
            Key::Window { target, tolerance } => [r, g, b]
                .iter()
                .zip(target)
                .all(|(&v, t)| (t - tolerance..=t + tolerance).contains(&(v as f64))),
            Key::BlueScreen => r < 10 && g < 11 && b > 144,
            Key::GreenScreen => r > 100 && g > 100 && b < 43,
        }
    }
}

fn chroma(ctx: &mut FilterContext<'_>) -> FilterResult {
    let o = &ctx.options;
    let key = match o.text("preset").as_str() {
        "rgb" => Key::Window {
            target: [o.number("red"), o.number("green"), o.number("blue")],
            tolerance: o.number("tolerance"),
        },
        "bluescreen" => Key::BlueScreen,
        "greenscreen" => Key::GreenScreen,
        other => {
            debug!(preset = other, "unknown chroma preset");
            return Ok(false);
        }
    };
    let replacement = match o.string("image") {
        Some(_) => Some(ctx.companion()?),
        None => None,
    };
    debug!(?key, replace = replacement.is_some(), "chroma");

    let buf = &mut ctx.buffer;
    for at in Linear::new(buf.shape()) {
        let [r, g, b, a] = buf.read(at);
        if !key.matches([r, g, b]) {
            continue;
        }
        let out = match &replacement {
            Some(layer) => {
                let [lr, lg, lb, _] = layer.read(at);
                [lr, lg, lb, a]
            }
            None => [r, g, b, 0],
        };
        buf.write(at, out);
    }
    Ok(true)
}

/// `v` capped at `max` when non-negative, otherwise `fallback`.
#[inline]
fn or_default(v: f64, max: f64, fallback: f64) -> f64 {
    if v >= 0.0 { v.min(max) } else { fallback }
}

fn chromahsb(ctx: &mut FilterContext<'_>) -> FilterResult {
    let o = &ctx.options;
    let hue = or_default(o.number("hue"), 360.0, 127.0);
    let tolerance = or_default(o.number("huetolerance") * 3.6, 360.0, 36.0);
    let sat_min = or_default(o.number("saturationmin"), 100.0, 88.0);
    let bri_min = or_default(o.number("brightnessmin"), 100.0, 30.0);
    let bri_max = match o.number("brightnessmax") {
        v if v >= 0.0 => v.max(bri_min).min(100.0),
        _ => 82.0,
    };
    debug!(hue, tolerance, sat_min, bri_min, bri_max, "chromahsb");

    let buf = &mut ctx.buffer;
    for at in Linear::new(buf.shape()) {
        let [r, g, b, _] = buf.read(at);
        let hsb = rgb_to_hsb(r, g, b);
        let dh = (hsb.h - hue).abs();
        if hsb.s >= sat_min && (bri_min..=bri_max).contains(&hsb.b) && dh < tolerance {
            let alpha = clamp_channel(255.0 * dh / tolerance);
            buf.write(at, [r, g, b, alpha]);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::context::Host;
    use crate::filters::testutil::run;
    use crate::registry::FilterRegistry;
    use filtr_core::PixelBuffer;

    fn pair(a: [u8; 4], b: [u8; 4]) -> PixelBuffer {
        let mut bytes = a.to_vec();
        bytes.extend(b);
        PixelBuffer::from_rgba(2, 1, bytes).unwrap()
    }

    #[test]
    fn test_window_match() {
        let key = Key::Window { target: [10.0, 20.0, 30.0], tolerance: 5.0 };
        assert!(key.matches([10, 20, 30]));
        assert!(key.matches([15, 15, 35]));
        assert!(!key.matches([16, 20, 30]));
    }

    #[test]
    fn test_chroma_window_clears_alpha() {
        let mut buf = pair([10, 20, 30, 255], [200, 20, 30, 255]);
        assert!(run(&mut buf, "chroma[red:10,green:20,blue:30]"));
        assert_eq!(buf.get(0, 0), Some([10, 20, 30, 0]));
        assert_eq!(buf.get(1, 0), Some([200, 20, 30, 255]));
    }

    #[test]
    fn test_chroma_presets() {
        let mut buf = pair([0, 0, 200, 255], [150, 150, 10, 255]);
        run(&mut buf, "chroma[preset:bluescreen]");
        assert_eq!(buf.get(0, 0).unwrap()[3], 0);
        assert_eq!(buf.get(1, 0).unwrap()[3], 255);

        let mut buf = pair([0, 0, 200, 255], [150, 150, 10, 255]);
        run(&mut buf, "chroma[preset:GreenScreen]");
        assert_eq!(buf.get(0, 0).unwrap()[3], 255);
        assert_eq!(buf.get(1, 0).unwrap()[3], 0);
    }

    #[test]
    fn test_chroma_unknown_preset() {
        let mut buf = pair([0, 0, 200, 255], [150, 150, 10, 255]);
        let before = buf.clone();
        assert!(!run(&mut buf, "chroma[preset:purplescreen]"));
        assert_eq!(buf, before);
    }

    #[test]
    fn test_chroma_replaces_from_companion() {
        let mut companions = HashMap::new();
        companions.insert("bg".to_string(), PixelBuffer::filled(2, 1, [1, 2, 3, 255]).unwrap());
        let host = Host::new().with_companions(&companions);
        let mut buf = pair([0, 0, 200, 128], [150, 150, 10, 255]);
        FilterRegistry::with_builtin()
            .apply(&mut buf, "chroma[preset:bluescreen,image:bg]", &host)
            .unwrap();
        assert_eq!(buf.get(0, 0), Some([1, 2, 3, 128]));
        assert_eq!(buf.get(1, 0), Some([150, 150, 10, 255]));
    }

    #[test]
    fn test_chroma_missing_companion() {
        let mut buf = pair([0, 0, 200, 255], [150, 150, 10, 255]);
        let before = buf.clone();
        let err = FilterRegistry::with_builtin()
            .apply(&mut buf, "chroma[preset:bluescreen,image:nope]", &Host::new())
            .unwrap_err();
        assert!(err.is_second_buffer_unavailable());
        assert_eq!(buf, before);
    }

    #[test]
    fn test_chromahsb_green_band() {
        // hsb (120, 100, 78): 7 degrees from the default hue of 127
        let mut buf = pair([0, 200, 0, 255], [200, 0, 0, 255]);
        run(&mut buf, "chromahsb");
        assert_eq!(buf.get(0, 0), Some([0, 200, 0, 50]));
        assert_eq!(buf.get(1, 0), Some([200, 0, 0, 255]));
    }

    #[test]
    fn test_chromahsb_zero_tolerance_matches_nothing() {
        let mut buf = pair([0, 200, 0, 255], [0, 180, 10, 255]);
        let before = buf.clone();
        run(&mut buf, "chromahsb[huetolerance:0,hue:120]");
        assert_eq!(buf, before);
    }

    #[test]
    fn test_or_default() {
        assert_eq!(or_default(-1.0, 100.0, 88.0), 88.0);
        assert_eq!(or_default(150.0, 100.0, 88.0), 100.0);
        assert_eq!(or_default(f64::NAN, 100.0, 88.0), 88.0);
    }
}
