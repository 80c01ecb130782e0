//! Blocking IO over `wasi:io` streams.

mod streams;

pub use streams::{BlockingInputStream, BlockingOutputStream};

/// The error type for I/O operations.
///
pub use std::io::Error;

/// A specialized Result type for I/O operations.
///
pub use std::io::Result;

pub use std::io::{copy, empty, Empty, Read, Write};
