//! Host setup from command-line values.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use filtr_core::{Capabilities, PixelBuffer};
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::png_io;

/// Capabilities with the toggles from `--no-alpha` and `--no-global-alpha`.
pub fn capabilities(no_alpha: bool, no_global_alpha: bool) -> Capabilities {
    Capabilities::full()
        .with_alpha_channel(!no_alpha)
        .with_whole_buffer_alpha_composite(!no_global_alpha)
}

/// Splits an `--image name=path` value.
pub fn parse_image_spec(spec: &str) -> Result<(String, PathBuf)> {
    let Some((name, path)) = spec.split_once('=') else {
        bail!("expected NAME=PATH, got '{spec}'");
    };
    let name = name.trim();
    if name.is_empty() || path.trim().is_empty() {
        bail!("expected NAME=PATH, got '{spec}'");
    }
    Ok((name.to_string(), PathBuf::from(path.trim())))
}

/// Loads every `--image` companion buffer.
pub fn load_companions(specs: &[String]) -> Result<HashMap<String, PixelBuffer>> {
    let mut companions = HashMap::new();
    for spec in specs {
        let (name, path) = parse_image_spec(spec)?;
        let buf = png_io::read(&path)
            .with_context(|| format!("Failed to load companion '{name}': {}", path.display()))?;
        debug!(name = %name, width = buf.width(), height = buf.height(), "loaded companion");
        companions.insert(name, buf);
    }
    Ok(companions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_image_spec() {
        let (name, path) = parse_image_spec("bg = layers/bg.png").unwrap();
        assert_eq!(name, "bg");
        assert_eq!(path, PathBuf::from("layers/bg.png"));
        assert!(parse_image_spec("nopath").is_err());
        assert!(parse_image_spec("=x.png").is_err());
        assert!(parse_image_spec("x=").is_err());
    }

    #[test]
    fn test_capabilities() {
        let caps = capabilities(true, false);
        assert!(caps.pixel_read);
        assert!(!caps.alpha_channel);
        assert!(caps.whole_buffer_alpha_composite);
    }

    #[test]
    fn test_missing_companion_file() {
        let err = load_companions(&["bg=/nonexistent/filtr/bg.png".to_string()]).unwrap_err();
        assert!(format!("{err:#}").contains("bg"));
    }
}
