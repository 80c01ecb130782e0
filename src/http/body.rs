//! HTTP body types

use std::io::{Cursor, Empty, Read};

use wasi::http::types::IncomingBody as WasiIncomingBody;

use super::error::{Error, Result};
use super::fields::{header_map_from_wasi, HeaderMap};
use crate::io::BlockingInputStream;

/// A trait representing an HTTP body.
pub trait Body: Read {
    /// Returns the exact remaining length of the body, if known.
    fn len(&self) -> Option<usize>;

    /// Returns `true` if the body is known to be empty.
    fn is_empty(&self) -> bool {
        matches!(self.len(), Some(0))
    }
}

/// Conversion into a `Body`.
pub trait IntoBody {
    /// What type of `Body` are we turning this into?
    type IntoBody: Body;
    /// Convert into `Body`.
    fn into_body(self) -> Self::IntoBody;
}

impl<T> IntoBody for T
where
    T: Body,
{
    type IntoBody = T;
    fn into_body(self) -> Self::IntoBody {
        self
    }
}

impl IntoBody for String {
    type IntoBody = BoundedBody<Vec<u8>>;
    fn into_body(self) -> Self::IntoBody {
        BoundedBody(Cursor::new(self.into_bytes()))
    }
}

impl IntoBody for Vec<u8> {
    type IntoBody = BoundedBody<Vec<u8>>;
    fn into_body(self) -> Self::IntoBody {
        BoundedBody(Cursor::new(self))
    }
}

impl<'a> IntoBody for &'a str {
    type IntoBody = BoundedBody<&'a [u8]>;
    fn into_body(self) -> Self::IntoBody {
        BoundedBody(Cursor::new(self.as_bytes()))
    }
}

impl<'a> IntoBody for &'a [u8] {
    type IntoBody = BoundedBody<&'a [u8]>;
    fn into_body(self) -> Self::IntoBody {
        BoundedBody(Cursor::new(self))
    }
}

/// An HTTP body with a known length
#[derive(Debug)]
pub struct BoundedBody<T>(Cursor<T>);

impl<T: AsRef<[u8]>> Read for BoundedBody<T> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.0.read(buf)
    }
}

impl<T: AsRef<[u8]>> Body for BoundedBody<T> {
    fn len(&self) -> Option<usize> {
        let total = self.0.get_ref().as_ref().len() as u64;
        Some(total.saturating_sub(self.0.position()) as usize)
    }
}

impl Body for Empty {
    fn len(&self) -> Option<usize> {
        Some(0)
    }
}

/// An incoming HTTP body, read lazily off the host stream.
///
/// Trailers only exist once the body has been fully drained; consume them
/// with [`IncomingBody::finish`].
#[derive(Debug)]
pub struct IncomingBody {
    content_length: Option<u64>,
    consumed: u64,

    // `stream` is a child resource of `body` and must be dropped first;
    // field order keeps that true.
    stream: BlockingInputStream,
    body: WasiIncomingBody,
}

impl IncomingBody {
    pub(crate) fn new(body: WasiIncomingBody, content_length: Option<u64>) -> Result<Self> {
        let stream = body
            .stream()
            .map_err(|()| Error::other("incoming body stream already acquired"))?;
        Ok(Self {
            content_length,
            consumed: 0,
            stream: BlockingInputStream::new(stream),
            body,
        })
    }

    /// Finish the body and collect its trailers, if any.
    ///
    /// Blocks until the host has the trailers available, which is immediate
    /// once the body stream reported end-of-stream.
    pub fn finish(self) -> Result<Option<HeaderMap>> {
        let Self { stream, body, .. } = self;
        // Child before parent.
        drop(stream);

        let trailers = WasiIncomingBody::finish(body);
        trailers.subscribe().block();
        match trailers.get() {
            Some(Ok(Ok(Some(fields)))) => Ok(Some(header_map_from_wasi(&fields)?)),
            Some(Ok(Ok(None))) => Ok(None),
            Some(Ok(Err(code))) => Err(Error::other(format!(
                "failed to receive trailers: {code:?}"
            ))),
            Some(Err(())) | None => Err(Error::other("trailers already consumed")),
        }
    }

    /// Deserialize the remainder of the body as JSON.
    #[cfg(feature = "json")]
    pub fn json<T: serde::de::DeserializeOwned>(&mut self) -> Result<T> {
        use super::error::Context;
        serde_json::from_reader(self).context("decoding json body")
    }
}

impl Read for IncomingBody {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let len = self.stream.read(buf)?;
        self.consumed += len as u64;
        Ok(len)
    }
}

impl Body for IncomingBody {
    fn len(&self) -> Option<usize> {
        let remaining = self.content_length?.saturating_sub(self.consumed);
        Some(remaining as usize)
    }
}

/// The declared length of a body, when its headers carry one.
pub(crate) fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(http::header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_body_tracks_remaining_length() {
        let mut body = "hello".into_body();
        assert_eq!(body.len(), Some(5));
        let mut buf = [0u8; 2];
        body.read_exact(&mut buf).unwrap();
        assert_eq!(body.len(), Some(3));
    }

    #[test]
    fn empty_body_is_empty() {
        let body = std::io::empty();
        assert!(body.is_empty());
    }

    #[test]
    fn byte_bodies_read_back() {
        let mut body = vec![1u8, 2, 3].into_body();
        let mut out = Vec::new();
        body.read_to_end(&mut out).unwrap();
        assert_eq!(out, [1, 2, 3]);
    }

    #[test]
    fn declared_content_length_is_parsed() {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::CONTENT_LENGTH, "42".parse().unwrap());
        assert_eq!(content_length(&headers), Some(42));
        headers.insert(http::header::CONTENT_LENGTH, "nope".parse().unwrap());
        assert_eq!(content_length(&headers), None);
    }
}
