//! Filter registry and invocation driver.
//!
//! The registry maps filter names to [`FilterDescriptor`]s. It is an
//! explicit value, built once (usually with [`FilterRegistry::with_builtin`])
//! and passed by reference to whatever dispatches filters.
//!
//! # Invocation
//!
//! 1. The name is resolved; unknown names are [`NotRun::UnknownFilter`].
//! 2. The filter's requirements are checked against the host
//!    [`Capabilities`](filtr_core::Capabilities) before anything is touched.
//! 3. Options are merged: declared defaults, then caller options, then the
//!    bracket body of the option string.
//! 4. The filter runs on a working copy (the `rect` region for region
//!    filters, the whole buffer for geometry filters).
//! 5. Only on success is the copy written back.
//!
//! ```rust
//! use filtr_core::PixelBuffer;
//! use filtr_ops::{FilterRegistry, Host};
//!
//! let registry = FilterRegistry::with_builtin();
//! let mut buf = PixelBuffer::filled(2, 2, [255, 0, 0, 255]).unwrap();
//! assert!(registry.apply(&mut buf, "invert", &Host::new()).unwrap());
//! assert_eq!(buf.get(0, 0), Some([0, 255, 255, 255]));
//! ```

use std::collections::HashMap;

use filtr_core::{PixelBuffer, Rect, Requirement};
#[allow(unused_imports)]
use tracing::{debug, trace, warn};

use crate::context::{FilterContext, Host};
use crate::error::{FilterResult, NotRun};
use crate::options::{parse_filter, OptionMap, OptionSet};

/// Which part of the buffer a filter receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The clamped `rect` region, pasted back afterwards.
    Region,
    /// The whole buffer, replaced afterwards (may change size).
    Whole,
}

/// A registered filter.
#[derive(Clone, Copy)]
pub struct FilterDescriptor {
    /// Lower-case name.
    pub name: &'static str,
    /// One-line description.
    pub summary: &'static str,
    /// Region or whole-buffer filter.
    pub scope: Scope,
    /// Capabilities the host must provide.
    pub requires: &'static [Requirement],
    /// Declared option defaults.
    pub defaults: fn() -> OptionMap,
    /// The filter body.
    pub apply: fn(&mut FilterContext<'_>) -> FilterResult,
}

impl std::fmt::Debug for FilterDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterDescriptor")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .field("requires", &self.requires)
            .finish_non_exhaustive()
    }
}

/// Registered filters by name.
#[derive(Debug, Clone, Default)]
pub struct FilterRegistry {
    filters: HashMap<&'static str, FilterDescriptor>,
}

impl FilterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in filter.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for desc in crate::filters::builtin() {
            registry.register(desc);
        }
        debug!(count = registry.len(), "registered built-in filters");
        registry
    }

    /// Registers a filter, replacing any filter of the same name.
    pub fn register(&mut self, desc: FilterDescriptor) {
        self.filters.insert(desc.name, desc);
    }

    /// Looks up a filter, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&FilterDescriptor> {
        self.filters
            .get(name)
            .or_else(|| self.filters.get(name.trim().to_ascii_lowercase().as_str()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.filters.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Registered descriptors, sorted by name.
    pub fn descriptors(&self) -> Vec<&FilterDescriptor> {
        let mut all: Vec<_> = self.filters.values().collect();
        all.sort_unstable_by_key(|d| d.name);
        all
    }

    /// Number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Applies an option string such as `brightness[brightness:20]`.
    pub fn apply(&self, buffer: &mut PixelBuffer, invocation: &str, host: &Host<'_>) -> FilterResult {
        self.apply_with(buffer, invocation, &OptionMap::new(), host)
    }

    /// Applies an option string with extra caller options; values in the
    /// string's brackets win over `options`.
    pub fn apply_with(
        &self,
        buffer: &mut PixelBuffer,
        invocation: &str,
        options: &OptionMap,
        host: &Host<'_>,
    ) -> FilterResult {
        let parsed = parse_filter(invocation);
        let given = options.clone().merged(&parsed.options);
        self.apply_filter(buffer, &parsed.name, &given, host)
    }

    /// Applies a filter by name with caller options.
    ///
    /// Returns `Ok(true)` if the buffer changed. On any error the buffer is
    /// left exactly as it was.
    pub fn apply_filter(
        &self,
        buffer: &mut PixelBuffer,
        name: &str,
        options: &OptionMap,
        host: &Host<'_>,
    ) -> FilterResult {
        let Some(desc) = self.get(name) else {
            warn!(filter = name, "unknown filter");
            return Err(NotRun::UnknownFilter(name.to_string()));
        };
        if let Some(capability) = host.caps.missing(desc.requires) {
            warn!(filter = desc.name, %capability, "filter not run");
            return Err(NotRun::UnsupportedCapability {
                filter: desc.name.to_string(),
                capability,
            });
        }

        let options = OptionSet::new(options.clone(), (desc.defaults)());
        let shape = buffer.shape();
        let region = options
            .rect()
            .map(|r| r.clamp(shape))
            .unwrap_or_else(|| Rect::full(shape));
        trace!(filter = desc.name, width = shape.width(), height = shape.height(), %region, "apply");
        debug!(filter = desc.name, options = %options.resolved(), "resolved options");

        let working = match desc.scope {
            Scope::Region if !region.is_full(shape) => buffer.crop(region),
            _ => buffer.clone(),
        };
        let mut ctx = FilterContext::new(desc.name, working, options, host, region, shape);
        let changed = match (desc.apply)(&mut ctx) {
            Ok(changed) => changed,
            Err(e) => {
                warn!(filter = desc.name, error = %e, "filter not run");
                return Err(e);
            }
        };

        match desc.scope {
            Scope::Region => buffer.paste(&ctx.buffer, region.left as i64, region.top as i64),
            Scope::Whole => *buffer = ctx.buffer,
        }
        Ok(changed)
    }

    /// Applies several option strings in order. Each link is all-or-nothing;
    /// the chain stops at the first link that does not run, keeping the
    /// links before it.
    ///
    /// Returns `Ok(true)` if any link changed the buffer.
    pub fn apply_chain<S: AsRef<str>>(
        &self,
        buffer: &mut PixelBuffer,
        invocations: &[S],
        host: &Host<'_>,
    ) -> FilterResult {
        let mut changed = false;
        for (i, inv) in invocations.iter().enumerate() {
            trace!(link = i, invocation = inv.as_ref(), "chain");
            changed |= self.apply(buffer, inv.as_ref(), host)?;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filtr_core::Capabilities;

    fn noop(_: &mut FilterContext<'_>) -> FilterResult {
        Ok(false)
    }

    fn fails(ctx: &mut FilterContext<'_>) -> FilterResult {
        ctx.buffer.fill([1, 2, 3, 4]);
        ctx.companion()?;
        Ok(true)
    }

    fn paint(ctx: &mut FilterContext<'_>) -> FilterResult {
        let c = ctx.options.color("color");
        ctx.buffer.fill([c[0], c[1], c[2], 255]);
        Ok(true)
    }

    fn registry() -> FilterRegistry {
        let mut r = FilterRegistry::new();
        r.register(FilterDescriptor {
            name: "noop",
            summary: "does nothing",
            scope: Scope::Region,
            requires: &[Requirement::AlphaChannel],
            defaults: OptionMap::new,
            apply: noop,
        });
        r.register(FilterDescriptor {
            name: "fails",
            summary: "mutates, then fails",
            scope: Scope::Region,
            requires: &[],
            defaults: OptionMap::new,
            apply: fails,
        });
        r.register(FilterDescriptor {
            name: "paint",
            summary: "fills",
            scope: Scope::Region,
            requires: &[],
            defaults: || OptionMap::new().with("color", [10u8, 20, 30]),
            apply: paint,
        });
        r
    }

    #[test]
    fn test_names_sorted() {
        assert_eq!(registry().names(), vec!["fails", "noop", "paint"]);
        assert!(registry().get("PAINT").is_some());
    }

    #[test]
    fn test_unknown_filter() {
        let mut buf = PixelBuffer::new(1, 1).unwrap();
        let err = registry().apply(&mut buf, "nope", &Host::new()).unwrap_err();
        assert!(err.is_unknown_filter());
    }

    #[test]
    fn test_capability_checked_first() {
        let mut buf = PixelBuffer::new(1, 1).unwrap();
        let host = Host::new().with_caps(Capabilities::full().with_alpha_channel(false));
        let err = registry().apply(&mut buf, "noop", &host).unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_failure_leaves_buffer_untouched() {
        let mut buf = PixelBuffer::filled(2, 2, [9, 9, 9, 9]).unwrap();
        let before = buf.clone();
        let err = registry().apply(&mut buf, "fails[image:x]", &Host::new()).unwrap_err();
        assert!(err.is_second_buffer_unavailable());
        assert_eq!(buf, before);
    }

    #[test]
    fn test_region_only() {
        let mut buf = PixelBuffer::new(4, 4).unwrap();
        registry().apply(&mut buf, "paint[rect:1,1,2,2]", &Host::new()).unwrap();
        assert_eq!(buf.get(1, 1), Some([10, 20, 30, 255]));
        assert_eq!(buf.get(2, 2), Some([10, 20, 30, 255]));
        assert_eq!(buf.get(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(buf.get(3, 3), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_option_precedence() {
        let r = registry();
        let mut buf = PixelBuffer::new(1, 1).unwrap();
        let extra = OptionMap::new().with("color", [1u8, 1, 1]);
        r.apply_with(&mut buf, "paint", &extra, &Host::new()).unwrap();
        assert_eq!(buf.get(0, 0), Some([1, 1, 1, 255]));
        r.apply_with(&mut buf, "paint[color:#020202]", &extra, &Host::new()).unwrap();
        assert_eq!(buf.get(0, 0), Some([2, 2, 2, 255]));
    }

    #[test]
    fn test_chain_stops_at_failure() {
        let r = registry();
        let mut buf = PixelBuffer::new(1, 1).unwrap();
        let err = r
            .apply_chain(&mut buf, &["paint", "fails", "paint[color:#ffffff]"], &Host::new())
            .unwrap_err();
        assert!(err.is_second_buffer_unavailable());
        assert_eq!(buf.get(0, 0), Some([10, 20, 30, 255]));
    }
}
