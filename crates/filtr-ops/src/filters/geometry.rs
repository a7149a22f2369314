//! Geometry filters: crop, flip, resize, rotate and reflect.
//!
//! Apart from flip, these receive the whole buffer and may hand back one
//! of a different size.

use std::f64::consts::PI;

use filtr_color::clamp_channel;
use filtr_core::{PixelBuffer, Rect, RectRequest};
#[allow(unused_imports)]
use tracing::{debug, trace};

use super::{bound, region, whole, PIXEL_READ, PIXEL_READ_ALPHA};
use crate::context::FilterContext;
use crate::error::FilterResult;
use crate::options::{OptionMap, OptionSet, OptionValue};
use crate::raster::{draw_affine, Affine};
use crate::registry::FilterDescriptor;
use crate::resample::{resize as resample, Filter};

pub(crate) fn descriptors() -> Vec<FilterDescriptor> {
    vec![
        whole("crop", "cut the buffer down to a rectangle", PIXEL_READ, OptionMap::new, crop),
        region("flip", "mirror across an axis", PIXEL_READ, || {
            OptionMap::new().with("axis", "horizontal")
        }, flip),
        region("fliph", "mirror left to right", PIXEL_READ, || {
            OptionMap::new().with("axis", "horizontal")
        }, flip),
        region("flipv", "mirror top to bottom", PIXEL_READ, || {
            OptionMap::new().with("axis", "vertical")
        }, flip),
        whole("reflect", "append a fading mirror image below", PIXEL_READ_ALPHA, || {
            OptionMap::new().with("height", 0.5).with("opacity", 0.5)
        }, reflect),
        whole("resize", "resample to a new size", PIXEL_READ, OptionMap::new, resize),
        whole("rotate", "rotate about the center, growing the canvas", PIXEL_READ, || {
            OptionMap::new().with("angle", 0.0)
        }, rotate),
    ]
}

/// A caller-given number, if it is finite.
fn given_number(options: &OptionSet, key: &str) -> Option<f64> {
    options
        .given()
        .get(key)
        .and_then(OptionValue::as_f64)
        .filter(|v| v.is_finite())
}

fn crop(ctx: &mut FilterContext<'_>) -> FilterResult {
    let r = ctx.region;
    let pick = |key: &str, fallback: u32| given_number(&ctx.options, key).unwrap_or(fallback as f64);
    let request = RectRequest::new(
        pick("left", r.left),
        pick("top", r.top),
        pick("width", r.width).max(1.0),
        pick("height", r.height).max(1.0),
    );
    let rect = request.clamp(ctx.buffer.shape());
    debug!(%rect, "crop");
    if rect.is_full(ctx.buffer.shape()) {
        return Ok(false);
    }
    ctx.buffer = ctx.buffer.crop(rect);
    Ok(true)
}

/// Mirror axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

fn flip(ctx: &mut FilterContext<'_>) -> FilterResult {
    let axis = match ctx.options.text("axis").as_str() {
        "vertical" => Axis::Vertical,
        _ => Axis::Horizontal,
    };
    let src = ctx.buffer.clone();
    let (w, h) = (src.width(), src.height());
    for y in 0..h {
        for x in 0..w {
            let (sx, sy) = match axis {
                Axis::Horizontal => (w - 1 - x, y),
                Axis::Vertical => (x, h - 1 - y),
            };
            if let (Some(at), Some(px)) = (ctx.buffer.offset(x, y), src.get(sx, sy)) {
                ctx.buffer.write(at, px);
            }
        }
    }
    Ok(true)
}

fn resize(ctx: &mut FilterContext<'_>) -> FilterResult {
    let (w, h) = (ctx.buffer.width(), ctx.buffer.height());
    let size = |key: &str, current: u32| match given_number(&ctx.options, key) {
        Some(v) if v >= 1.0 => v.round().min(u32::MAX as f64) as u32,
        _ => current,
    };
    let (nw, nh) = (size("width", w), size("height", h));
    debug!(from = ?(w, h), to = ?(nw, nh), "resize");
    if (nw, nh) == (w, h) {
        return Ok(false);
    }
    ctx.buffer = resample(&ctx.buffer, nw, nh, Filter::Bilinear)?;
    Ok(true)
}

/// Size of the axis-aligned box holding a `w x h` rectangle rotated by
/// `radians`.
fn rotated_bounds(w: u32, h: u32, radians: f64) -> (u32, u32) {
    let (sin, cos) = radians.sin_cos();
    let (w, h) = (w as f64, h as f64);
    let bw = (w * cos.abs() + h * sin.abs()).round().max(1.0);
    let bh = (w * sin.abs() + h * cos.abs()).round().max(1.0);
    (bw as u32, bh as u32)
}

fn rotate(ctx: &mut FilterContext<'_>) -> FilterResult {
    let degrees = ctx.options.number("angle");
    if !degrees.is_finite() || degrees % 360.0 == 0.0 {
        return Ok(false);
    }
    let radians = degrees * PI / 180.0;
    let src = &ctx.buffer;
    let (w, h) = (src.width(), src.height());
    let (nw, nh) = rotated_bounds(w, h, radians);
    debug!(degrees, from = ?(w, h), to = ?(nw, nh), "rotate");

    let transform = Affine::translate(-(w as f64) / 2.0, -(h as f64) / 2.0)
        .then(&Affine::rotate(radians))
        .then(&Affine::translate(nw as f64 / 2.0, nh as f64 / 2.0));
    let mut out = PixelBuffer::new(nw, nh)?;
    draw_affine(&mut out, src, &transform, 1.0);
    ctx.buffer = out;
    Ok(true)
}

fn reflect(ctx: &mut FilterContext<'_>) -> FilterResult {
    let height = bound(ctx.options.number("height"), 0.0, 1.0, 0.5);
    let opacity = bound(ctx.options.number("opacity"), 0.0, 1.0, 0.5);
    let src = &ctx.buffer;
    let (w, h) = (src.width(), src.height());
    let rh = (h as f64 * height).floor() as u32;
    debug!(height, opacity, rows = rh, "reflect");
    if rh == 0 {
        return Ok(false);
    }

    let mut out = PixelBuffer::new(w, h + rh)?;
    out.paste(src, 0, 0);
    for j in 0..rh {
        let fade = opacity * (1.0 - j as f64 / rh as f64);
        let row = src.crop(Rect { left: 0, top: h - 1 - j, width: w, height: 1 });
        for x in 0..w {
            if let (Some(at), Some([r, g, b, a])) = (out.offset(x, h + j), row.get(x, 0)) {
                out.write(at, [r, g, b, clamp_channel(a as f64 * fade)]);
            }
        }
    }
    ctx.buffer = out;
    Ok(true)
}
