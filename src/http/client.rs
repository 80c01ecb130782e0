use http::header::CONTENT_LENGTH;
use http::{Request, Response};
use wasi::http::outgoing_handler;
use wasi::http::types::OutgoingBody;

use super::body::{Body, IncomingBody};
use super::error::{Context, Error, Result};
use super::fields::HeaderValue;
use super::request::try_into_outgoing;
use super::response;
use crate::io::BlockingOutputStream;

/// An HTTP client.
///
/// Requests go out through the host's `wasi:http/outgoing-handler`; the
/// call blocks until the response head has arrived.
#[derive(Debug, Default)]
pub struct Client {
    _reserved: (),
}

impl Client {
    /// Create a new instance of `Client`
    pub fn new() -> Self {
        Self::default()
    }

    /// Send an HTTP request.
    ///
    /// If the body has a known length, a Content-Length header is
    /// automatically added.
    pub fn send<B: Body>(&self, mut request: Request<B>) -> Result<Response<IncomingBody>> {
        if let Some(len) = request.body().len() {
            let mut buffer = itoa::Buffer::new();
            // Unwrap because decimal digits are always a valid header value.
            let value = HeaderValue::from_str(buffer.format(len)).unwrap();
            request.headers_mut().insert(CONTENT_LENGTH, value);
        }

        let (wasi_request, mut body) = try_into_outgoing(request)?;

        // 1. Start sending the request head
        let wasi_body = wasi_request
            .body()
            .map_err(|()| Error::other("outgoing request body already acquired"))?;
        let body_stream = wasi_body
            .write()
            .map_err(|()| Error::other("outgoing request body stream already acquired"))?;
        let future_response =
            outgoing_handler::handle(wasi_request, None).context("sending request head")?;

        // 2. Send the request body, releasing the stream when it is done
        let mut stream = BlockingOutputStream::new(body_stream);
        std::io::copy(&mut body, &mut stream).context("copying request body")?;
        drop(stream);

        // 3. Finish sending the request body
        OutgoingBody::finish(wasi_body, None)
            .map_err(|code| Error::other(format!("failed to finish request body: {code:?}")))?;

        // 4. Receive the response
        future_response.subscribe().block();
        // NOTE: the first `unwrap` is to ensure readiness, the second
        // `unwrap` is to trap if we try and get the response more than once.
        // The `context` raises the actual error if there is one.
        let incoming = future_response
            .get()
            .unwrap()
            .unwrap()
            .context("receiving response")?;

        response::try_from_incoming(incoming)
    }
}
