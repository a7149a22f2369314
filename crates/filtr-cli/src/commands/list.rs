//! List command

use anyhow::Result;
use filtr_ops::{FilterRegistry, Scope};

use crate::ListArgs;

pub fn run(args: ListArgs) -> Result<()> {
    let registry = FilterRegistry::with_builtin();
    for desc in registry.descriptors() {
        if !args.long {
            println!("{:<16} {}", desc.name, desc.summary);
            continue;
        }
        let scope = match desc.scope {
            Scope::Region => "region",
            Scope::Whole => "whole buffer",
        };
        let requires: Vec<_> = desc.requires.iter().map(|r| r.name()).collect();
        println!("{}", desc.name);
        println!("  {}", desc.summary);
        println!("  scope:    {scope}");
        println!("  requires: {}", requires.join(", "));
        println!("  defaults: {}", (desc.defaults)());
    }
    Ok(())
}
