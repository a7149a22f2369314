//! Per-invocation filter context.
//!
//! A filter function receives everything it may touch in one
//! [`FilterContext`]: the working buffer, the resolved options, the host
//! capabilities, an invocation-owned random source and access to companion
//! buffers. Filters keep no state of their own between calls.

use std::collections::HashMap;

use filtr_core::{Capabilities, PixelBuffer, Rect, Shape};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::NotRun;
use crate::options::OptionSet;

/// Source of second buffers (blend layers, chroma replacements), keyed by
/// the `image` option.
pub trait Companions: Send + Sync {
    /// Buffer registered under `name`.
    fn companion(&self, name: &str) -> Option<&PixelBuffer>;
}

impl Companions for HashMap<String, PixelBuffer> {
    fn companion(&self, name: &str) -> Option<&PixelBuffer> {
        self.get(name)
    }
}

/// A host with no companion buffers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCompanions;

impl Companions for NoCompanions {
    fn companion(&self, _name: &str) -> Option<&PixelBuffer> {
        None
    }
}

/// What the host hands to every invocation.
#[derive(Clone, Copy)]
pub struct Host<'a> {
    /// Surface capabilities.
    pub caps: Capabilities,
    /// Companion buffer lookup.
    pub companions: &'a dyn Companions,
    /// Seed for randomized filters; `None` draws from entropy unless the
    /// invocation carries a `seed` option.
    pub seed: Option<u64>,
}

impl Host<'static> {
    /// Full capabilities, no companions, unseeded.
    pub fn new() -> Self {
        Self {
            caps: Capabilities::full(),
            companions: &NoCompanions,
            seed: None,
        }
    }
}

impl Default for Host<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Host<'a> {
    /// Replaces the capabilities.
    pub fn with_caps(mut self, caps: Capabilities) -> Self {
        self.caps = caps;
        self
    }

    /// Sets a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replaces the companion lookup.
    pub fn with_companions<'b>(self, companions: &'b dyn Companions) -> Host<'b> {
        Host {
            caps: self.caps,
            companions,
            seed: self.seed,
        }
    }
}

impl std::fmt::Debug for Host<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("caps", &self.caps)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

/// State threaded through one filter call.
pub struct FilterContext<'a> {
    /// Filter name, for diagnostics.
    pub name: &'static str,
    /// Working buffer. For region-scoped filters this is a copy of the
    /// region only; geometry filters may replace it with a differently
    /// sized buffer.
    pub buffer: PixelBuffer,
    /// Options resolved against the filter's defaults.
    pub options: OptionSet,
    /// Host capabilities.
    pub caps: Capabilities,
    /// Invocation-owned random source.
    pub rng: StdRng,
    /// The region in the caller's buffer.
    pub region: Rect,
    base: Shape,
    companions: &'a dyn Companions,
}

impl<'a> FilterContext<'a> {
    pub(crate) fn new(
        name: &'static str,
        buffer: PixelBuffer,
        options: OptionSet,
        host: &Host<'a>,
        region: Rect,
        base: Shape,
    ) -> Self {
        let seed = host.seed.or_else(|| {
            options
                .given()
                .get("seed")
                .and_then(|v| v.as_f64())
                .filter(|s| s.is_finite())
                .map(|s| s.abs() as u64)
        });
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self {
            name,
            buffer,
            options,
            caps: host.caps,
            rng,
            region,
            base,
            companions: host.companions,
        }
    }

    /// Shape of the caller's buffer.
    pub fn base_shape(&self) -> Shape {
        self.base
    }

    /// The companion named by the `image` option, laid over a transparent
    /// buffer of the caller's size and cut to the working region, so it
    /// matches [`FilterContext::buffer`] pixel for pixel.
    ///
    /// # Errors
    ///
    /// [`NotRun::SecondBufferUnavailable`] if no `image` option was given or
    /// the host has no buffer by that name.
    pub fn companion(&self) -> Result<PixelBuffer, NotRun> {
        let unavailable = |image: String| NotRun::SecondBufferUnavailable {
            filter: self.name.to_string(),
            image,
        };
        let image = self.options.string("image").ok_or_else(|| unavailable(String::new()))?;
        let layer = self
            .companions
            .companion(&image)
            .ok_or_else(|| unavailable(image.clone()))?;
        let fitted = layer.clone().fit_to(self.base.width(), self.base.height())?;
        if self.region.is_full(self.base) {
            Ok(fitted)
        } else {
            Ok(fitted.crop(self.region))
        }
    }
}

impl std::fmt::Debug for FilterContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterContext")
            .field("name", &self.name)
            .field("buffer", &self.buffer)
            .field("options", &self.options)
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}
