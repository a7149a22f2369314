//! Iterative soft effects.
//!
//! The blur family works by repeated resampling rather than convolution:
//! shrinking the buffer and stretching it back, or redrawing it at low
//! opacity along a path (motion), an arc (spin) or a scale ramp (zoom).
//! Every loop runs a step count derived from a clamped option, so the cost
//! of a call is bounded by its configuration.

use std::f64::consts::PI;

use filtr_core::{Linear, PixelBuffer};
#[allow(unused_imports)]
use tracing::{debug, trace};

use super::{bound, region, PIXEL_READ};
use crate::context::FilterContext;
use crate::error::FilterResult;
use crate::options::OptionMap;
use crate::raster::{draw_affine, draw_scaled, Affine};
use crate::registry::FilterDescriptor;
use crate::resample::{resize, Filter};

/// Opacity of the first ghost image in motion, spin and zoom blurs.
const GHOST_ALPHA: f64 = 0.25;

pub(crate) fn descriptors() -> Vec<FilterDescriptor> {
    vec![
        region("blur", "shrink and stretch", PIXEL_READ, || {
            OptionMap::new().with("amount", 0.0).with("clear", false)
        }, blur),
        region("blurmotion", "directional blur", PIXEL_READ, || {
            OptionMap::new().with("distance", 0.0).with("angle", 0.0)
        }, blurmotion),
        region("blursmooth", "smooth shrink and stretch", PIXEL_READ, || {
            OptionMap::new().with("radius", 1.0)
        }, blursmooth),
        region("blurspin", "rotational blur", PIXEL_READ, || {
            OptionMap::new().with("distance", 0.0)
        }, blurspin),
        region("blurzoom", "zoom blur", PIXEL_READ, || {
            OptionMap::new().with("distance", 0.0)
        }, blurzoom),
        region("glow", "add a blurred copy", PIXEL_READ, || {
            OptionMap::new().with("amount", 0.0).with("radius", 0.0)
        }, glow),
        region("unsharpmask", "sharpen against a blurred copy", PIXEL_READ, || {
            OptionMap::new()
                .with("amount", 0.0)
                .with("radius", 0.0)
                .with("threshold", 0.0)
        }, unsharpmask),
    ]
}

/// Size of the `i`-th shrink pass: half size, one pixel smaller per pass.
#[inline]
fn shrink(len: u32, i: u32) -> u32 {
    (((len as f64) / 2.0).round() as u32).saturating_sub(i).max(1)
}

/// A blurred copy of `src` after `passes` shrink and stretch passes.
fn blurred(src: &PixelBuffer, passes: u32) -> filtr_core::Result<PixelBuffer> {
    let (w, h) = (src.width(), src.height());
    let mut out = src.clone();
    for i in 0..passes {
        let small = resize(&out, shrink(w, i), shrink(h, i), Filter::Bilinear)?;
        out = resize(&small, w, h, Filter::Bilinear)?;
    }
    Ok(out)
}

fn blur(ctx: &mut FilterContext<'_>) -> FilterResult {
    let amount = bound(ctx.options.number("amount"), 0.0, 5.0, 0.0);
    let clear = ctx.options.flag("clear");
    let steps = (amount * 20.0).round() as u32;
    let (w, h) = (ctx.buffer.width(), ctx.buffer.height());
    debug!(amount, steps, clear, "blur");

    for i in 0..steps {
        let small = resize(&ctx.buffer, shrink(w, i), shrink(h, i), Filter::Bilinear)?;
        if clear {
            ctx.buffer.fill([0, 0, 0, 0]);
        }
        draw_scaled(&mut ctx.buffer, &small, 0.0, 0.0, w as f64, h as f64, 1.0)?;
    }
    Ok(steps > 0)
}

fn blursmooth(ctx: &mut FilterContext<'_>) -> FilterResult {
    let radius = bound(ctx.options.number("radius"), 1.0, 8.0, 1.0);
    let steps = (radius * 5.0).round() as u32;
    let (w, h) = (ctx.buffer.width(), ctx.buffer.height());
    let bw = (w as f64 * 0.75).round();
    let bh = (h as f64 * 0.75).round();
    debug!(radius, steps, "blursmooth");

    for i in 0..steps {
        let sw = (bw - 2.0 * i as f64).max(2.0) as u32;
        let sh = (bh - 2.0 * i as f64).max(2.0) as u32;
        let small = resize(&ctx.buffer, sw, sh, Filter::Bilinear)?;
        ctx.buffer = resize(&small, w, h, Filter::Bilinear)?;
    }
    Ok(true)
}

/// Integer points from the origin to `(xo, yo)`, origin excluded.
fn line_steps(xo: i64, yo: i64) -> Vec<(i64, i64)> {
    let (sx, sy) = (xo.signum(), yo.signum());
    let (dx, dy) = (xo.abs() * 2, yo.abs() * 2);
    let (mut x, mut y) = (0, 0);
    let mut points = Vec::new();
    if dy < dx {
        let mut frac = dy - dx / 2;
        while x != xo {
            if frac >= 0 {
                y += sy;
                frac -= dx;
            }
            frac += dy;
            x += sx;
            points.push((x, y));
        }
    } else {
        let mut frac = dx - dy / 2;
        while y != yo {
            if frac >= 0 {
                x += sx;
                frac -= dy;
            }
            frac += dx;
            y += sy;
            points.push((x, y));
        }
    }
    points
}

/// Opacity of the `i`-th ghost of `distance`.
#[inline]
fn ghost_alpha(i: u32, distance: f64) -> f64 {
    GHOST_ALPHA - GHOST_ALPHA / distance * i as f64
}

fn blurmotion(ctx: &mut FilterContext<'_>) -> FilterResult {
    let distance = bound(ctx.options.number("distance"), 0.0, 100.0, 0.0);
    let angle = bound(ctx.options.number("angle"), 0.0, 360.0, 0.0);
    let z = (angle - 90.0) * PI / 180.0;
    let xo = (distance * z.cos()).round() as i64;
    let yo = (distance * z.sin()).round() as i64;
    let path = line_steps(xo, yo);
    debug!(distance, angle, xo, yo, steps = path.len(), "blurmotion");
    if path.is_empty() {
        return Ok(false);
    }

    let src = ctx.buffer.clone();
    for (i, (x, y)) in path.into_iter().enumerate() {
        let alpha = ghost_alpha(i as u32 + 1, distance);
        draw_affine(&mut ctx.buffer, &src, &Affine::translate(x as f64, y as f64), alpha);
    }
    Ok(true)
}

fn blurspin(ctx: &mut FilterContext<'_>) -> FilterResult {
    let distance = bound(ctx.options.number("distance"), 0.0, 360.0, 0.0);
    let steps = distance.ceil() as u32;
    debug!(distance, steps, "blurspin");
    if steps == 0 {
        return Ok(false);
    }

    let src = ctx.buffer.clone();
    let (cx, cy) = (src.width() as f64 / 2.0, src.height() as f64 / 2.0);
    let about_center = |degrees: f64| {
        Affine::translate(-cx, -cy)
            .then(&Affine::rotate(degrees * PI / 180.0))
            .then(&Affine::translate(cx, cy))
    };
    for i in 0..steps {
        let alpha = ghost_alpha(i, distance);
        draw_affine(&mut ctx.buffer, &src, &about_center(i as f64), alpha);
        draw_affine(&mut ctx.buffer, &src, &about_center(-(i as f64)), alpha);
    }
    Ok(true)
}

fn blurzoom(ctx: &mut FilterContext<'_>) -> FilterResult {
    let distance = bound(ctx.options.number("distance"), 0.0, 100.0, 0.0);
    let steps = distance.ceil() as u32;
    debug!(distance, steps, "blurzoom");
    if steps == 0 {
        return Ok(false);
    }

    let src = ctx.buffer.clone();
    let (w, h) = (src.width() as f64, src.height() as f64);
    for i in 0..steps {
        let d = i as f64;
        draw_scaled(&mut ctx.buffer, &src, -d, -d, w + 2.0 * d, h + 2.0 * d, ghost_alpha(i, distance))?;
    }
    Ok(true)
}

fn glow(ctx: &mut FilterContext<'_>) -> FilterResult {
    let amount = bound(ctx.options.number("amount"), 0.0, 1.0, 0.0);
    let radius = bound(ctx.options.number("radius"), 0.0, 5.0, 0.0);
    let soft = blurred(&ctx.buffer, (radius * 20.0).round() as u32)?;
    debug!(amount, radius, "glow");

    let buf = &mut ctx.buffer;
    for at in Linear::new(buf.shape()) {
        let d = buf.read(at);
        let s = soft.read(at);
        let add = |c: usize| (d[c] as f64 + amount * s[c] as f64).min(255.0) as u8;
        buf.write(at, [add(0), add(1), add(2), d[3]]);
    }
    Ok(true)
}

fn unsharpmask(ctx: &mut FilterContext<'_>) -> FilterResult {
    let o = &ctx.options;
    let amount = bound(o.number("amount"), 0.0, 500.0, 0.0) / 2.0 * 0.016 + 1.0;
    let radius = bound(o.number("radius"), 0.0, 5.0, 0.0) / 10.0;
    let threshold = bound(o.number("threshold"), 0.0, 255.0, 0.0) - 1.0;
    let soft = blurred(&ctx.buffer, (radius * 20.0).round() as u32)?;
    debug!(amount, radius, threshold, "unsharpmask");

    let buf = &mut ctx.buffer;
    for at in Linear::new(buf.shape()) {
        let mut px = buf.read(at);
        let s = soft.read(at);
        for c in 0..3 {
            let dif = px[c] as f64 - s[c] as f64;
            if dif.abs() > threshold {
                px[c] = (amount * dif + s[c] as f64).clamp(0.0, 255.0) as u8;
            }
        }
        buf.write(at, px);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::testutil::{gradient, run};

    fn stripes(w: u32, h: u32) -> PixelBuffer {
        let mut bytes = Vec::new();
        for _ in 0..h {
            for x in 0..w {
                let v = if x % 2 == 0 { 0 } else { 255 };
                bytes.extend([v, v, v, 255]);
            }
        }
        PixelBuffer::from_rgba(w, h, bytes).unwrap()
    }

    fn spread(buf: &PixelBuffer) -> u8 {
        let reds: Vec<u8> = buf.pixels().map(|p| p[0]).collect();
        reds.iter().max().unwrap() - reds.iter().min().unwrap()
    }

    #[test]
    fn test_shrink() {
        assert_eq!(shrink(10, 0), 5);
        assert_eq!(shrink(10, 3), 2);
        assert_eq!(shrink(10, 9), 1);
        assert_eq!(shrink(1, 0), 1);
    }

    #[test]
    fn test_line_steps() {
        assert_eq!(line_steps(3, 0), vec![(1, 0), (2, 0), (3, 0)]);
        assert_eq!(line_steps(0, -2), vec![(0, -1), (0, -2)]);
        assert_eq!(line_steps(2, 2), vec![(1, 1), (2, 2)]);
        assert!(line_steps(0, 0).is_empty());
        let steep = line_steps(-2, 5);
        assert_eq!(steep.len(), 5);
        assert_eq!(steep.last(), Some(&(-2, 5)));
    }

    #[test]
    fn test_blur_smooths_stripes() {
        let mut buf = stripes(16, 8);
        assert!(run(&mut buf, "blur[amount:0.5]"));
        assert!(spread(&buf) < 128);
    }

    #[test]
    fn test_blur_zero_amount() {
        let mut buf = gradient(8, 8);
        let before = buf.clone();
        assert!(!run(&mut buf, "blur"));
        assert_eq!(buf, before);
    }

    #[test]
    fn test_blursmooth_smooths_stripes() {
        let mut buf = stripes(16, 8);
        run(&mut buf, "blursmooth[radius:2]");
        assert!(spread(&buf) < 128);
    }

    #[test]
    fn test_flat_stays_flat() {
        for inv in [
            "blur[amount:1]",
            "blursmooth",
            "blurmotion[distance:4,angle:45]",
            "blurzoom[distance:3]",
            "unsharpmask[amount:200,radius:2]",
        ] {
            let mut buf = PixelBuffer::filled(12, 10, [90, 120, 150, 255]).unwrap();
            run(&mut buf, inv);
            assert!(
                buf.pixels().all(|p| p == [90, 120, 150, 255]),
                "{inv}: {:?}",
                buf.get(0, 0)
            );
        }
    }

    #[test]
    fn test_ghost_blurs_without_distance_do_nothing() {
        for inv in ["blurmotion", "blurspin", "blurzoom"] {
            let mut buf = gradient(6, 6);
            let before = buf.clone();
            assert!(!run(&mut buf, inv), "{inv}");
            assert_eq!(buf, before);
        }
    }

    #[test]
    fn test_blurmotion_smears_along_path() {
        let mut buf = PixelBuffer::filled(8, 1, [0, 0, 0, 255]).unwrap();
        let at = buf.offset(2, 0).unwrap();
        buf.write(at, [200, 200, 200, 255]);
        // angle 90 points right
        run(&mut buf, "blurmotion[distance:2,angle:90]");
        assert!(buf.get(3, 0).unwrap()[0] > 0);
        assert_eq!(buf.get(1, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_glow_brightens() {
        let mut buf = PixelBuffer::filled(6, 6, [100, 100, 100, 255]).unwrap();
        run(&mut buf, "glow[amount:0.5]");
        assert!(buf.pixels().all(|p| p == [150, 150, 150, 255]));
        run(&mut buf, "glow[amount:1]");
        assert!(buf.pixels().all(|p| p == [255, 255, 255, 255]));
    }

    #[test]
    fn test_unsharpmask_threshold() {
        let mut buf = stripes(16, 4);
        let before = buf.clone();
        run(&mut buf, "unsharpmask[amount:500,radius:2,threshold:255]");
        assert_eq!(buf, before);
    }
}
