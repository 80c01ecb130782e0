//! HTTP serving
//!
//! The handler side of the bridge. A component exports
//! `wasi:http/incoming-handler` through the [`http_handler`] macro, whose
//! `main` takes the imported [`Request`] and a [`ResponseWriter`]:
//!
//! ```no_run
//! use std::io::Write;
//! use wasihttp::http::{IncomingBody, Request, ResponseWriter, Result};
//!
//! #[wasihttp::http_handler]
//! fn main(request: Request<IncomingBody>, mut response: ResponseWriter) -> Result<()> {
//!     response.write_all(b"Hello!\n")?;
//!     response.finish()
//! }
//! ```
//!
//! [`http_handler`]: crate::http_handler
//! [`Request`]: crate::http::Request

use std::io::Write;

use http::header::CONTENT_LENGTH;
use http::{Request, Response, StatusCode};
use wasi::exports::http::incoming_handler::ResponseOutparam;
use wasi::http::types::{ErrorCode, IncomingRequest, OutgoingBody, OutgoingResponse};

use super::body::{Body, IncomingBody};
use super::error::{Context, Error, Result};
use super::fields::{header_map_to_wasi, HeaderMap, HeaderValue};
use super::request::try_from_incoming;
use crate::io::BlockingOutputStream;

/// The one-shot commit: exactly one attempt against the host's
/// single-assignment response slot, its outcome cached and replayed.
enum Commit {
    Pending,
    Committed {
        // `stream` is a child resource of `body` and must be released first.
        stream: BlockingOutputStream,
        body: OutgoingBody,
    },
    Failed(String),
}

/// A streaming response writer over the host's write-once response slot.
///
/// Status code and headers are mutable until the first write (or explicit
/// [`set_status`][ResponseWriter::set_status]), which commits them to the
/// host. Header-map entries added after the commit are not lost: they are
/// sent as trailers when the writer is [`finish`][ResponseWriter::finish]ed.
///
/// The writer is single-threaded, like everything under WASI 0.2; callers
/// serialize their own writes. Dropping it without `finish` leaves the body
/// unfinished, which the host reports to the client as a truncated response.
#[must_use]
pub struct ResponseWriter {
    headers: HeaderMap,
    status: StatusCode,
    outparam: Option<ResponseOutparam>,
    state: Commit,
}

impl ResponseWriter {
    /// Wrap the host's response slot. The status starts out as 200.
    pub fn new(outparam: ResponseOutparam) -> Self {
        Self {
            headers: HeaderMap::new(),
            status: StatusCode::OK,
            outparam: Some(outparam),
            state: Commit::Pending,
        }
    }

    /// The live header map: headers before the commit, trailers after.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutably get the live header map.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Record the status code and commit the response head.
    ///
    /// The first trigger wins, whether it was a write or an earlier call
    /// here; afterwards this is a no-op.
    pub fn set_status(&mut self, status: StatusCode) {
        if matches!(self.state, Commit::Pending) {
            self.status = status;
            self.commit();
        }
    }

    /// Respond with the given `Response`, which contains the whole body.
    ///
    /// If the body has a known length, a Content-Length header is
    /// automatically added. To stream instead, write to the writer directly;
    /// to send trailers, add headers after the first write and
    /// [`finish`][ResponseWriter::finish].
    pub fn respond<B: Body>(mut self, response: Response<B>) -> Result<()> {
        let (parts, mut body) = response.into_parts();
        self.headers = parts.headers;

        // Automatically add a Content-Length header.
        if let Some(len) = body.len() {
            let mut buffer = itoa::Buffer::new();
            // Unwrap because decimal digits are always a valid header value.
            let value = HeaderValue::from_str(buffer.format(len)).unwrap();
            self.headers.insert(CONTENT_LENGTH, value);
        }

        self.set_status(parts.status);
        std::io::copy(&mut body, &mut self).context("streaming response body")?;
        self.finish()
    }

    /// Flush and release the body stream, then finish the body, sending
    /// whatever is in the header map as trailers. An empty map finishes the
    /// body with no trailers at all.
    ///
    /// A writer that was never written to commits an empty 200 response
    /// here.
    pub fn finish(mut self) -> Result<()> {
        self.commit();
        let Self { headers, state, .. } = self;
        match state {
            Commit::Committed { mut stream, body } => {
                // Child before parent: release the stream, then finish the
                // body it belongs to.
                let _ = stream.flush();
                drop(stream);

                let trailers = if headers.is_empty() {
                    None
                } else {
                    Some(header_map_to_wasi(&headers).context("translating trailers")?)
                };
                OutgoingBody::finish(body, trailers).map_err(|code| {
                    Error::other(format!("failed to finish response body: {code:?}"))
                })
            }
            Commit::Failed(detail) => Err(Error::other(detail)),
            Commit::Pending => Err(Error::other("response was never committed")),
        }
    }

    /// Abandon the response, reporting `code` to the host instead.
    ///
    /// Only meaningful before the commit; afterwards the slot is spoken for
    /// and this does nothing.
    pub fn fail(mut self, code: ErrorCode) {
        if let Some(outparam) = self.outparam.take() {
            ResponseOutparam::set(outparam, Err(code));
        }
    }

    fn commit(&mut self) {
        if !matches!(self.state, Commit::Pending) {
            return;
        }
        let outparam = self
            .outparam
            .take()
            .expect("outparam is present until the first commit attempt");
        self.state = match reconcile(&mut self.headers, self.status, outparam) {
            Ok((stream, body)) => Commit::Committed { stream, body },
            Err(err) => Commit::Failed(format!("{err:#}")),
        };
    }

    fn committed(&mut self) -> std::io::Result<&mut BlockingOutputStream> {
        match &mut self.state {
            Commit::Committed { stream, .. } => Ok(stream),
            Commit::Failed(detail) => Err(std::io::Error::other(detail.clone())),
            // `commit` always leaves a terminal state behind.
            Commit::Pending => Err(std::io::Error::other("response was never committed")),
        }
    }
}

impl Write for ResponseWriter {
    /// The first write commits status and headers. A commit failure is
    /// returned here and on every later call. A stream the peer closed
    /// yields the count accepted so far (`Ok(0)` when nothing was), not an
    /// error.
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.commit();
        let stream = self.committed()?;
        let mut written = 0;
        while written < buf.len() {
            match stream.write(&buf[written..])? {
                0 => break,
                n => written += n,
            }
        }
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.commit();
        self.committed()?.flush()
    }
}

/// Translate the header map into host fields, build and submit the response
/// resource, and hand back the acquired body stream. Runs at most once per
/// writer; the caller caches the outcome.
fn reconcile(
    headers: &mut HeaderMap,
    status: StatusCode,
    outparam: ResponseOutparam,
) -> Result<(BlockingOutputStream, OutgoingBody)> {
    let wasi_headers = header_map_to_wasi(headers).context("translating response headers")?;
    // Committed entries are spoken for; from here on the map collects
    // trailers.
    headers.clear();

    let response = OutgoingResponse::new(wasi_headers);
    // Unwrap because `StatusCode` has already validated the status.
    response.set_status_code(status.as_u16()).unwrap();

    let body = response
        .body()
        .map_err(|()| Error::other("failed to acquire resource handle to response body"))?;
    let stream = body.write().map_err(|()| {
        Error::other("failed to acquire resource handle for response body's stream")
    })?;

    // Tell WASI to start the show.
    ResponseOutparam::set(outparam, Ok(response));

    Ok((BlockingOutputStream::new(stream), body))
}

/// This is used by the `http_handler` macro.
#[doc(hidden)]
pub fn handle_incoming<F>(request: IncomingRequest, outparam: ResponseOutparam, handler: F)
where
    F: FnOnce(Request<IncomingBody>, ResponseWriter) -> Result<()>,
{
    let writer = ResponseWriter::new(outparam);
    match try_from_incoming(request) {
        Ok(request) => {
            if let Err(err) = handler(request, writer) {
                eprintln!("wasihttp: handler failed: {err:#}");
            }
        }
        Err(err) => writer.fail(ErrorCode::InternalError(Some(format!("{err:#}")))),
    }
}
