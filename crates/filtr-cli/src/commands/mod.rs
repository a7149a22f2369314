//! CLI command implementations

pub mod apply;
pub mod list;
pub mod parse;
