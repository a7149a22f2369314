//! Two-buffer blend.

#[allow(unused_imports)]
use tracing::{debug, trace};

use super::{bound, region, PIXEL_READ};
use crate::composite::{self, AmountPath, BlendMode};
use crate::context::FilterContext;
use crate::error::FilterResult;
use crate::options::OptionMap;
use crate::registry::FilterDescriptor;

pub(crate) fn descriptors() -> Vec<FilterDescriptor> {
    vec![region("blend", "composite a companion buffer onto this one", PIXEL_READ, || {
        OptionMap::new().with("amount", 1.0).with("mode", "normal")
    }, blend)]
}

fn blend(ctx: &mut FilterContext<'_>) -> FilterResult {
    let layer = ctx.companion()?;
    let mode = BlendMode::from_name(&ctx.options.text("mode"));
    let amount = bound(ctx.options.number("amount"), 0.0, 1.0, 1.0);
    let path = AmountPath::for_caps(&ctx.caps);
    debug!(%mode, amount, ?path, "blend");
    composite::blend(&mut ctx.buffer, &layer, mode, amount, path)?;
    Ok(amount > 0.0)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use filtr_core::{Capabilities, PixelBuffer};

    use crate::context::Host;
    use crate::registry::FilterRegistry;

    fn companions(rgba: [u8; 4]) -> HashMap<String, PixelBuffer> {
        let mut map = HashMap::new();
        map.insert("layer".to_string(), PixelBuffer::filled(3, 3, rgba).unwrap());
        map
    }

    fn apply(buf: &mut PixelBuffer, inv: &str, layers: &HashMap<String, PixelBuffer>, caps: Capabilities) -> bool {
        let host = Host::new().with_caps(caps).with_companions(layers);
        FilterRegistry::with_builtin().apply(buf, inv, &host).unwrap()
    }

    #[test]
    fn test_multiply_white_and_black() {
        let base = PixelBuffer::filled(3, 3, [40, 120, 200, 255]).unwrap();

        let mut buf = base.clone();
        apply(&mut buf, "blend[mode:multiply,image:layer]", &companions([255, 255, 255, 255]), Capabilities::full());
        assert_eq!(buf, base);

        let mut buf = base.clone();
        apply(&mut buf, "blend[mode:multiply,image:layer]", &companions([0, 0, 0, 255]), Capabilities::full());
        assert!(buf.pixels().all(|p| p == [0, 0, 0, 255]));
    }

    #[test]
    fn test_amount_paths_agree() {
        let base = PixelBuffer::filled(3, 3, [40, 120, 200, 255]).unwrap();
        let layers = companions([250, 10, 90, 255]);
        let inv = "blend[mode:screen,amount:0.4,image:layer]";

        let mut composited = base.clone();
        apply(&mut composited, inv, &layers, Capabilities::full());
        let mut interpolated = base.clone();
        apply(&mut interpolated, inv, &layers, Capabilities::full().with_whole_buffer_alpha_composite(false));

        for (a, b) in composited.pixels().zip(interpolated.pixels()) {
            for c in 0..4 {
                assert!(a[c].abs_diff(b[c]) <= 1, "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_region_and_smaller_companion() {
        let mut layers = HashMap::new();
        layers.insert("dot".to_string(), PixelBuffer::filled(1, 1, [0, 0, 0, 255]).unwrap());
        for caps in [Capabilities::full(), Capabilities::full().with_whole_buffer_alpha_composite(false)] {
            let mut buf = PixelBuffer::filled(3, 3, [200, 200, 200, 255]).unwrap();
            apply(&mut buf, "blend[mode:multiply,image:dot,rect:0,0,2,2]", &layers, caps);
            assert_eq!(buf.get(0, 0), Some([0, 0, 0, 255]), "{caps:?}");
            // past the companion's edge the layer is transparent
            assert_eq!(buf.get(1, 1), Some([200, 200, 200, 255]), "{caps:?}");
            assert_eq!(buf.get(2, 2), Some([200, 200, 200, 255]), "{caps:?}");
        }
    }

    #[test]
    fn test_missing_image_not_run() {
        let mut buf = PixelBuffer::filled(3, 3, [1, 2, 3, 255]).unwrap();
        let err = FilterRegistry::with_builtin()
            .apply(&mut buf, "blend[mode:multiply]", &Host::new())
            .unwrap_err();
        assert!(err.is_second_buffer_unavailable());
        assert_eq!(buf.get(0, 0), Some([1, 2, 3, 255]));
    }
}
