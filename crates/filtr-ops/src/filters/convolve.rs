//! Neighborhood filters.
//!
//! All of these read a snapshot of the region through
//! [`MatrixArea`](filtr_core::MatrixArea) (emboss uses
//! [`Matrix`](filtr_core::Matrix)) and write the working buffer, so
//! results never feed back into later pixels. The exception is scatter,
//! which swaps pixels in place.

use filtr_color::{clamp_channel, random_int, reduce_color, Reduce};
use filtr_core::{Matrix, MatrixArea, PixelBuffer};
use rand::Rng;
#[allow(unused_imports)]
use tracing::{debug, trace};

use super::{bound, region, PIXEL_READ};
use crate::context::FilterContext;
use crate::error::FilterResult;
use crate::kernel::{Gradient, Kernel};
use crate::options::OptionMap;
use crate::registry::FilterDescriptor;

pub(crate) fn descriptors() -> Vec<FilterDescriptor> {
    vec![
        region("edges", "edge detection", PIXEL_READ, || {
            OptionMap::new()
                .with("mono", false)
                .with("invert", false)
                .with("average", false)
        }, edges),
        region("emboss", "directional relief", PIXEL_READ, || {
            OptionMap::new()
                .with("strength", 1.0)
                .with("graylevel", 180.0)
                .with("direction", "topleft")
                .with("blend", false)
        }, emboss),
        region("laplace", "Laplacian edge map", PIXEL_READ, || {
            OptionMap::new()
                .with("invertalpha", false)
                .with("contrast", 1.0)
                .with("graylevel", 0.0)
        }, laplace),
        region("outline", "gradient magnitude outline", PIXEL_READ, || {
            OptionMap::new()
                .with("divisor", 1.0)
                .with("bias", 0.0)
                .with("mode", "sobel")
        }, outline),
        region("removenoise", "clamp to side and diagonal neighbors", PIXEL_READ, OptionMap::new, removenoise),
        region("scatter", "swap pixels with random neighbors", PIXEL_READ, || {
            OptionMap::new().with("strength", 1.0)
        }, scatter),
        region("sharpen", "four-neighbor sharpen", PIXEL_READ, || {
            OptionMap::new().with("strength", 0.0)
        }, sharpen),
    ]
}

/// Runs `kernel` over the color channels of `buf`, alpha kept.
fn convolve_rgb(buf: &mut PixelBuffer, kernel: &Kernel) {
    let src = buf.clone();
    for step in MatrixArea::new(src.shape()) {
        let [r, g, b] = kernel.apply_rgb(&src, &step).map(clamp_channel);
        let a = src.read(step.offset)[3];
        buf.write(step.offset, [r, g, b, a]);
    }
}

fn edges(ctx: &mut FilterContext<'_>) -> FilterResult {
    let o = &ctx.options;
    let (mono, invert) = (o.flag("mono"), o.flag("invert"));
    let mode = Reduce::from_average(o.flag("average"));
    let src = ctx.buffer.clone();
    let kernel = Kernel::edges();
    for step in MatrixArea::new(src.shape()) {
        let mut rgb = kernel.apply_rgb(&src, &step).map(clamp_channel);
        if mono {
            let v = clamp_channel(reduce_color(rgb[0], rgb[1], rgb[2], mode));
            rgb = [v; 3];
        }
        if invert {
            rgb = rgb.map(|c| 255 - c);
        }
        let a = src.read(step.offset)[3];
        ctx.buffer.write(step.offset, [rgb[0], rgb[1], rgb[2], a]);
    }
    Ok(true)
}

/// Unit offset for a compass direction name.
fn direction(name: &str) -> (i64, i64) {
    match name {
        "top" => (0, -1),
        "topright" => (1, -1),
        "right" => (1, 0),
        "bottomright" => (1, 1),
        "bottom" => (0, 1),
        "bottomleft" => (-1, 1),
        "left" => (-1, 0),
        _ => (-1, -1),
    }
}

fn emboss(ctx: &mut FilterContext<'_>) -> FilterResult {
    let o = &ctx.options;
    let strength = o.number("strength");
    let graylevel = o.number("graylevel");
    let blend = o.flag("blend");
    let (dx, dy) = direction(&o.text("direction"));
    let src = ctx.buffer.clone();
    let (w, h) = (src.width() as i64, src.height() as i64);

    for step in Matrix::new(src.shape()) {
        let (x, y) = (step.x as i64 - 1, step.y as i64 - 1);
        // an offset leaving the buffer is dropped on that axis
        let nx = if (0..w).contains(&(x + dx)) { x + dx } else { x };
        let ny = if (0..h).contains(&(y + dy)) { y + dy } else { y };
        let px = src.read(step.offset);
        let nb = src.get_clamped(nx, ny);

        let mut dif = 0.0f64;
        for c in 0..3 {
            let d = px[c] as f64 - nb[c] as f64;
            if d.abs() > dif.abs() {
                dif = d;
            }
        }
        let dif = dif * strength;

        let out = if blend {
            [
                clamp_channel(px[0] as f64 + dif),
                clamp_channel(px[1] as f64 + dif),
                clamp_channel(px[2] as f64 + dif),
                px[3],
            ]
        } else {
            let v = clamp_channel(graylevel - dif);
            [v, v, v, px[3]]
        };
        ctx.buffer.write(step.offset, out);
    }
    Ok(true)
}

/// Laplace brightness curve: values above mid gray are pulled towards or
/// pushed away from it, values below are scaled from zero.
fn laplace_contrast(brightness: f64, contrast: f64) -> f64 {
    if contrast == 0.0 {
        brightness
    } else if brightness > 127.0 {
        brightness + (brightness + 1.0 - 128.0) * contrast
    } else if brightness < 127.0 {
        brightness - (brightness + 1.0) * contrast
    } else {
        brightness
    }
}

fn laplace(ctx: &mut FilterContext<'_>) -> FilterResult {
    let o = &ctx.options;
    let contrast = -o.number("contrast");
    let graylevel = o.number("graylevel");
    let invert = o.flag("invertalpha");
    let src = ctx.buffer.clone();
    let kernel = Kernel::laplace();
    for step in MatrixArea::new(src.shape()) {
        let [r, g, b] = kernel.apply_rgb(&src, &step);
        let mut v = laplace_contrast((r + g + b) / 3.0 + graylevel, contrast);
        if invert {
            v = 255.0 - v;
        }
        let v = clamp_channel(v);
        let a = src.read(step.offset)[3];
        ctx.buffer.write(step.offset, [v, v, v, a]);
    }
    Ok(true)
}

fn outline(ctx: &mut FilterContext<'_>) -> FilterResult {
    let o = &ctx.options;
    let Some(gradient) = Gradient::from_name(&o.text("mode")) else {
        debug!(mode = %o.text("mode"), "unknown outline mode");
        return Ok(false);
    };
    let divisor = o.number("divisor");
    let divisor = if divisor > 0.0 { divisor.min(255.0) } else { 1.0 };
    let bias = bound(o.number("bias"), 0.0, 255.0, 0.0);

    let src = ctx.buffer.clone();
    let plane: Vec<f64> = src
        .pixels()
        .map(|[r, g, b, _]| reduce_color(r, g, b, Reduce::Average))
        .collect();
    for step in MatrixArea::new(src.shape()) {
        let v = clamp_channel(gradient.magnitude(&plane, &step) / divisor + bias);
        let a = src.read(step.offset)[3];
        ctx.buffer.write(step.offset, [v, v, v, a]);
    }
    Ok(true)
}

/// Clamps each channel into the range of the up-left, left, right and
/// down-right neighbors.
fn removenoise(ctx: &mut FilterContext<'_>) -> FilterResult {
    let src = ctx.buffer.clone();
    for step in MatrixArea::new(src.shape()) {
        let around = [step.prev, step.at(-1, 0), step.at(1, 0), step.next].map(|at| src.read(at));
        let mut px = src.read(step.offset);
        for c in 0..3 {
            let lo = around.iter().map(|p| p[c]).min().unwrap_or(px[c]);
            let hi = around.iter().map(|p| p[c]).max().unwrap_or(px[c]);
            px[c] = px[c].clamp(lo, hi);
        }
        ctx.buffer.write(step.offset, px);
    }
    Ok(true)
}

fn scatter(ctx: &mut FilterContext<'_>) -> FilterResult {
    let strength = bound(ctx.options.number("strength"), 0.0, 255.0, 1.0).round() as i32;
    let buf = &mut ctx.buffer;
    for step in MatrixArea::new(buf.shape()) {
        let dist = random_int(&mut ctx.rng, -strength, strength);
        let dy = if ctx.rng.gen_bool(0.5) { -1 } else { 1 };
        let other = step.at(dist, dy);
        let here = buf.read(step.offset);
        let there = buf.read(other);
        buf.write(other, [here[0], here[1], here[2], there[3]]);
        buf.write(step.offset, [there[0], there[1], there[2], here[3]]);
    }
    Ok(true)
}

fn sharpen(ctx: &mut FilterContext<'_>) -> FilterResult {
    let kernel = Kernel::sharpen(ctx.options.number("strength"));
    convolve_rgb(&mut ctx.buffer, &kernel);
    Ok(true)
}
