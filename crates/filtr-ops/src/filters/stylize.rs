//! Pattern, tile and overlay effects.

use filtr_color::{clamp_channel, reduce_color, Reduce};
use filtr_core::{Blocks, Linear, Matrix, PixelBuffer, Radial, Rect};
use rand::Rng;
#[allow(unused_imports)]
use tracing::{debug, trace};

use super::{bound, region, PIXEL_READ};
use crate::context::FilterContext;
use crate::error::FilterResult;
use crate::options::OptionMap;
use crate::raster::{average_premultiplied, fill_disc, fill_rect};
use crate::registry::FilterDescriptor;
use crate::resample::to_premultiplied;

pub(crate) fn descriptors() -> Vec<FilterDescriptor> {
    vec![
        region("colorhistogram", "overlay per-channel histograms", PIXEL_READ, OptionMap::new, colorhistogram),
        region("histogram", "overlay a luminance histogram", PIXEL_READ, || {
            OptionMap::new().with("average", true)
        }, histogram),
        region("interlace", "black out alternate rows", PIXEL_READ, OptionMap::new, interlace),
        region("pixelate", "average square blocks", PIXEL_READ, || {
            OptionMap::new().with("blocksize", 10.0)
        }, pixelate),
        region("pointillize", "paint with round dabs", PIXEL_READ, || {
            OptionMap::new()
                .with("radius", 5.0)
                .with("density", 1.2)
                .with("noise", 1.0)
                .with("transparent", false)
        }, pointillize),
        region("screen", "black out alternate rows and columns", PIXEL_READ, OptionMap::new, screen),
    ]
}

/// Blacks out the color of every pixel for which `hit(x, y)` holds
/// (1-based coordinates).
fn black_out(buf: &mut PixelBuffer, hit: impl Fn(u32, u32) -> bool) {
    for step in Matrix::new(buf.shape()) {
        if hit(step.x, step.y) {
            let a = buf.read(step.offset)[3];
            buf.write(step.offset, [0, 0, 0, a]);
        }
    }
}

fn interlace(ctx: &mut FilterContext<'_>) -> FilterResult {
    black_out(&mut ctx.buffer, |_, y| y % 2 == 1);
    Ok(true)
}

fn screen(ctx: &mut FilterContext<'_>) -> FilterResult {
    black_out(&mut ctx.buffer, |x, y| x % 2 == 1 || y % 2 == 1);
    Ok(true)
}

/// Average color of a rectangle of `src`, clipped to the buffer.
fn average_rect(src: &PixelBuffer, rect: Rect) -> [u8; 4] {
    let tile = src.crop(rect);
    let samples: Vec<[f32; 4]> = to_premultiplied(&tile)
        .chunks_exact(4)
        .map(|p| [p[0], p[1], p[2], p[3]])
        .collect();
    average_premultiplied(&samples)
}

fn pixelate(ctx: &mut FilterContext<'_>) -> FilterResult {
    let size = bound(ctx.options.number("blocksize"), 1.0, u32::MAX as f64, 10.0).round() as u32;
    let src = ctx.buffer.clone();
    let blocks = Blocks::new(Rect::full(src.shape()), size);
    debug!(size, tiles = blocks.len(), "pixelate");
    for tile in blocks {
        let color = average_rect(&src, tile.rect);
        for y in tile.rect.top..tile.rect.bottom() {
            for x in tile.rect.left..tile.rect.right() {
                if let Some(at) = ctx.buffer.offset(x, y) {
                    ctx.buffer.write(at, color);
                }
            }
        }
    }
    Ok(true)
}

fn pointillize(ctx: &mut FilterContext<'_>) -> FilterResult {
    let o = &ctx.options;
    let radius = bound(o.number("radius"), 1.0, f64::MAX, 5.0);
    let density = bound(o.number("density"), 0.0, 5.0, 1.2);
    let noise = bound(o.number("noise"), 0.0, f64::MAX, 1.0);
    let transparent = o.flag("transparent");
    let jitter = radius * noise;

    let src = ctx.buffer.clone();
    let (w, h) = (src.width() as f64, src.height() as f64);
    if transparent {
        ctx.buffer.fill([0, 0, 0, 0]);
    }

    let grid = Radial::new(Rect::full(src.shape()), radius, density);
    debug!(radius, density, step = grid.step(), "pointillize");
    for (x, y) in grid {
        let (cx, cy) = if noise > 0.0 {
            (
                (x + ctx.rng.gen_range(-1.0..=1.0) * jitter).trunc(),
                (y + ctx.rng.gen_range(-1.0..=1.0) * jitter).trunc(),
            )
        } else {
            (x, y)
        };
        let left = (cx - radius).max(0.0);
        let top = (cy - radius).max(0.0);
        let dia_x = (2.0 * radius).min(w - left).max(1.0);
        let dia_y = (2.0 * radius).min(h - top).max(1.0);
        let sample = Rect {
            left: left.min(u32::MAX as f64) as u32,
            top: top.min(u32::MAX as f64) as u32,
            width: dia_x as u32,
            height: dia_y as u32,
        };
        let [r, g, b, _] = average_rect(&src, sample);
        fill_disc(&mut ctx.buffer, cx.clamp(0.0, w), cy.clamp(0.0, h), radius, [r, g, b, 255], 1.0);
    }
    Ok(true)
}

/// Largest count among the buckets drawn in column `x` of `width`.
fn column_count(counts: &[u32; 256], x: u32, width: u32) -> u32 {
    let lo = (x as u64 * 256 / width as u64) as usize;
    let hi = (((x as u64 + 1) * 256 / width as u64) as usize).clamp(lo + 1, 256);
    counts[lo..hi].iter().copied().max().unwrap_or(0)
}

/// Draws `counts` as bars standing on row `base`, scaled so the peak bucket
/// is `span` rows tall.
fn draw_bars(buf: &mut PixelBuffer, counts: &[u32; 256], base: f64, span: f64, rgb: [u8; 3]) {
    let peak = counts.iter().copied().max().unwrap_or(0);
    if peak == 0 {
        return;
    }
    let width = buf.width();
    for x in 0..width {
        let bar = (column_count(counts, x, width) as f64 * span / peak as f64).round();
        if bar < 1.0 {
            continue;
        }
        let top = (base - bar).round() as i64;
        fill_rect(buf, x as i64, top, 1, bar as u32, [rgb[0], rgb[1], rgb[2], 255], 0.5);
    }
}

fn histogram(ctx: &mut FilterContext<'_>) -> FilterResult {
    let mode = Reduce::from_average(ctx.options.flag("average"));
    let buf = &mut ctx.buffer;
    let mut counts = [0u32; 256];
    for at in Linear::new(buf.shape()) {
        let [r, g, b, _] = buf.read(at);
        counts[clamp_channel(reduce_color(r, g, b, mode)) as usize] += 1;
    }
    let h = buf.height() as f64;
    draw_bars(buf, &counts, h, h, [255, 255, 255]);
    Ok(true)
}

fn colorhistogram(ctx: &mut FilterContext<'_>) -> FilterResult {
    let buf = &mut ctx.buffer;
    let mut counts = [[0u32; 256]; 3];
    for at in Linear::new(buf.shape()) {
        let px = buf.read(at);
        for c in 0..3 {
            counts[c][px[c] as usize] += 1;
        }
    }
    let band = buf.height() as f64 / 3.0;
    let colors = [[255, 0, 0], [0, 255, 0], [0, 0, 255]];
    for (c, rgb) in colors.into_iter().enumerate() {
        draw_bars(buf, &counts[c], band * (c + 1) as f64, band, rgb);
    }
    Ok(true)
}
