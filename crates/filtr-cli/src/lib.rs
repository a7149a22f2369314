//! Library side of the `filtr` command: PNG I/O and host setup shared by
//! the binary and the integration tests.

#![warn(missing_docs)]

pub mod host;
pub mod png_io;
