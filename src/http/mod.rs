//! HTTP support
//!
//! # Example
//!
//! ```rust,no_run
//! use wasihttp::http::{IncomingBody, IntoBody, Request, Response, ResponseWriter, Result};
//!
//! #[wasihttp::http_handler]
//! fn main(request: Request<IncomingBody>, response: ResponseWriter) -> Result<()> {
//!     response.respond(Response::new("Hello!\n".into_body()))
//! }
//! ```

pub use http::{Method, Request, Response, StatusCode, Uri};

pub use body::{Body, BoundedBody, IncomingBody, IntoBody};
pub use client::Client;
pub use error::{Error, Result};
pub use fields::{HeaderMap, HeaderName, HeaderValue};
pub use method::UnknownMethod;
#[cfg(feature = "json")]
pub use request::JsonRequest;
pub use request::{try_from_incoming, try_into_outgoing};
pub use server::ResponseWriter;

mod body;
mod client;
mod error;
mod fields;
mod method;
mod request;
mod response;
mod scheme;
pub mod server;
