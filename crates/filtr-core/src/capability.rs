//! Host capability descriptor.
//!
//! The host decides once what its graphics surface can do and passes the
//! answer in. Filters declare which capabilities they need; the blend engine
//! also uses it to pick how the global `amount` is applied.

/// What the host surface supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Capabilities {
    /// Pixel data can be read back from the surface.
    pub pixel_read: bool,
    /// The surface keeps a meaningful alpha channel.
    pub alpha_channel: bool,
    /// A whole buffer can be composited over another with a global alpha.
    pub whole_buffer_alpha_composite: bool,
}

impl Capabilities {
    /// Everything supported.
    pub const fn full() -> Self {
        Self {
            pixel_read: true,
            alpha_channel: true,
            whole_buffer_alpha_composite: true,
        }
    }

    /// Nothing supported.
    pub const fn none() -> Self {
        Self {
            pixel_read: false,
            alpha_channel: false,
            whole_buffer_alpha_composite: false,
        }
    }

    /// Returns true if the host provides `req`.
    pub const fn supports(&self, req: Requirement) -> bool {
        match req {
            Requirement::PixelRead => self.pixel_read,
            Requirement::AlphaChannel => self.alpha_channel,
        }
    }

    /// First requirement in `reqs` the host lacks.
    pub fn missing(&self, reqs: &[Requirement]) -> Option<Requirement> {
        reqs.iter().copied().find(|&r| !self.supports(r))
    }

    /// Returns a copy with the alpha channel toggled.
    pub const fn with_alpha_channel(mut self, on: bool) -> Self {
        self.alpha_channel = on;
        self
    }

    /// Returns a copy with whole-buffer alpha compositing toggled.
    pub const fn with_whole_buffer_alpha_composite(mut self, on: bool) -> Self {
        self.whole_buffer_alpha_composite = on;
        self
    }
}

/// A capability a filter needs before it may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// Pixel data must be readable.
    PixelRead,
    /// Alpha writes must be meaningful.
    AlphaChannel,
}

impl Requirement {
    /// Stable name used in messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PixelRead => "pixel read",
            Self::AlphaChannel => "alpha channel",
        }
    }
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::full()
    }
}
