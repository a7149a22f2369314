//! Apply command
//!
//! Reads a PNG, runs each option string through the registry in order and
//! writes the result. The first filter that does not run aborts the command
//! without writing output.

use anyhow::{Context, Result};
use filtr_cli::{host, png_io};
use filtr_ops::{FilterRegistry, Host};
#[allow(unused_imports)]
use tracing::{debug, info, trace};

use crate::ApplyArgs;

pub fn run(args: ApplyArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), filters = ?args.filters, "apply::run");

    let mut buf = png_io::read(&args.input)
        .with_context(|| format!("Failed to load: {}", args.input.display()))?;
    let companions = host::load_companions(&args.images)?;
    let caps = host::capabilities(args.no_alpha, args.no_global_alpha);
    let mut host = Host::new().with_caps(caps).with_companions(&companions);
    if let Some(seed) = args.seed {
        host = host.with_seed(seed);
    }
    let registry = FilterRegistry::with_builtin();

    info!(width = buf.width(), height = buf.height(), links = args.filters.len(), "applying filters");
    for invocation in &args.filters {
        let changed = registry
            .apply(&mut buf, invocation, &host)
            .with_context(|| format!("Filter '{invocation}' was not run"))?;
        if verbose > 0 {
            println!(
                "{invocation}: {} ({}x{})",
                if changed { "changed" } else { "unchanged" },
                buf.width(),
                buf.height()
            );
        }
    }

    png_io::write(&args.output, &buf)
        .with_context(|| format!("Failed to save: {}", args.output.display()))?;

    if verbose > 0 {
        println!("Wrote {}", args.output.display());
    }
    Ok(())
}
