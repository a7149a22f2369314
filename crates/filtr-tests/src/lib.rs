//! Integration tests for filtr crates.
//!
//! End-to-end checks across the buffer, color, filter and PNG layers.
