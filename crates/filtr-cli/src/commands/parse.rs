//! Parse command
//!
//! Prints the name and typed options an option string resolves to.

use anyhow::{bail, Result};
use filtr_ops::{parse_filter, FilterRegistry, OptionSet};

use crate::ParseArgs;

pub fn run(args: ParseArgs) -> Result<()> {
    let parsed = parse_filter(&args.invocation);
    if parsed.name.is_empty() {
        bail!("No filter name in '{}'", args.invocation);
    }
    println!("filter: {}", parsed.name);
    for (key, value) in parsed.options.iter() {
        println!("  {key:<14} {:<7} {value}", value.kind());
    }

    match FilterRegistry::with_builtin().get(&parsed.name) {
        Some(desc) => {
            let resolved = OptionSet::new(parsed.options, (desc.defaults)()).resolved();
            println!("resolved: {resolved}");
        }
        None => println!("(not a registered filter)"),
    }
    Ok(())
}
