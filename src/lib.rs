#![warn(future_incompatible, unreachable_pub)]

//! A blocking bridge between `wasi:http` and the `http` crate for Wasm
//! Components and WASI 0.2.
//!
//! Handler logic written against the conventional `http` crate types — a
//! mutable `HeaderMap`, a status code, and a streaming body writer — runs
//! unmodified inside a component that only sees the `wasi:http` resource
//! handles. The bridge converts in both directions: incoming request
//! resources become `http::Request`s, and a
//! [`ResponseWriter`](crate::http::ResponseWriter) hides the host's
//! write-once response slot behind `std::io::Write`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::io::Write;
//! use wasihttp::http::{IncomingBody, Request, ResponseWriter, Result};
//!
//! #[wasihttp::http_handler]
//! fn main(request: Request<IncomingBody>, mut response: ResponseWriter) -> Result<()> {
//!     response.headers_mut().insert("x-powered-by", "wasihttp".parse()?);
//!     response.write_all(b"Hello, wasi:http/proxy world!\n")?;
//!     response.finish()
//! }
//! ```
//!
//! # Design Decisions
//!
//! This library is deliberately synchronous. WASI 0.2 does not support
//! multi-threading, and the host's blocking stream operations
//! (`blocking-read`, `blocking-write-and-flush`) already suspend the
//! component while it waits. Leaning on them means body types can implement
//! the plain `std::io::Read` and `std::io::Write` traits, which is what
//! existing request-handling code expects. Every write is followed by a
//! blocking flush: correctness over throughput.
//!
//! The host side of the bridge stays resource handles all the way down.
//! Child resources (a body's stream, a response's body) are released before
//! their parents, and the one-shot response slot is committed exactly once
//! no matter how often the handler pokes at the writer.

pub mod http;
pub mod io;

pub use wasihttp_macro::attr_macro_http_handler as http_handler;

// Re-export the wasi crate for use by the `http_handler` macro.
#[doc(hidden)]
pub use wasi;
