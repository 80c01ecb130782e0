use http::uri::Uri;
use http::Request;
use wasi::http::types::{IncomingRequest, OutgoingRequest};

use super::body::{content_length, IncomingBody};
use super::error::{Context, Error, Result};
use super::fields::{header_map_from_wasi, header_map_to_wasi, HeaderValue};
use super::method::{from_wasi_method, to_wasi_method};
use super::scheme::to_wasi_scheme;

/// Placeholder authority for requests the host delivers without one.
const DEFAULT_AUTHORITY: &str = "localhost";

/// Convert an incoming request resource into an [`http::Request`].
///
/// The body is not read here; it streams lazily through
/// [`IncomingBody`](super::IncomingBody), and trailers become available from
/// [`IncomingBody::finish`](super::IncomingBody::finish) once it is drained.
///
/// The request URI is synthesized as `http://{authority}{path}` since the
/// host only hands over authority and path-with-query; the `Host` header is
/// set from the authority explicitly.
pub fn try_from_incoming(incoming: IncomingRequest) -> Result<Request<IncomingBody>> {
    let method = from_wasi_method(incoming.method())?;

    let authority = incoming
        .authority()
        .unwrap_or_else(|| DEFAULT_AUTHORITY.to_owned());
    let path_with_query = incoming
        .path_with_query()
        .unwrap_or_else(|| "/".to_owned());

    let headers = header_map_from_wasi(&incoming.headers())?;

    let body = incoming
        .consume()
        .map_err(|()| Error::other("incoming request body already acquired"))
        .and_then(|body| IncomingBody::new(body, content_length(&headers)))
        .context("failed to consume incoming request")?;

    let uri = synthetic_uri(&authority, &path_with_query)?;

    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .context("building request")?;
    *request.headers_mut() = headers;
    request.headers_mut().insert(
        http::header::HOST,
        HeaderValue::from_str(&authority)
            .with_context(|| format!("authority `{authority}` is not a valid host header"))?,
    );

    Ok(request)
}

/// Convert an [`http::Request`] into an outgoing request resource, handing
/// the (untouched) body back to the caller.
pub fn try_into_outgoing<B>(request: Request<B>) -> Result<(OutgoingRequest, B)> {
    let (parts, body) = request.into_parts();

    let wasi_request = OutgoingRequest::new(header_map_to_wasi(&parts.headers)?);

    // Set the HTTP method
    let method = to_wasi_method(parts.method);
    wasi_request
        .set_method(&method)
        .map_err(|()| Error::other(format!("method rejected by wasi-http: {method:?}")))?;

    // Set the url scheme
    let scheme = to_wasi_scheme(parts.uri.scheme());
    wasi_request
        .set_scheme(Some(&scheme))
        .map_err(|()| Error::other(format!("scheme rejected by wasi-http: {scheme:?}")))?;

    // Set authority, falling back to the Host header for origin-form URIs
    let authority = parts.uri.authority().map(|a| a.as_str().to_owned()).or_else(|| {
        parts
            .headers
            .get(http::header::HOST)
            .and_then(|host| host.to_str().ok())
            .map(str::to_owned)
    });
    wasi_request
        .set_authority(authority.as_deref())
        .map_err(|()| Error::other(format!("authority rejected by wasi-http: {authority:?}")))?;

    // Set the url path + query string
    let p_and_q = path_with_query(&parts.uri);
    wasi_request
        .set_path_with_query(Some(&p_and_q))
        .map_err(|()| Error::other(format!("path and query rejected by wasi-http: {p_and_q:?}")))?;

    // All done; request is ready for send-off
    Ok((wasi_request, body))
}

fn synthetic_uri(authority: &str, path_with_query: &str) -> Result<Uri> {
    format!("http://{authority}{path_with_query}")
        .parse()
        .with_context(|| format!("assembling uri from `{authority}` and `{path_with_query}`"))
}

/// The `?` is kept even when the query is empty: hosts routing on the raw
/// target expect the exported form unchanged.
fn path_with_query(uri: &Uri) -> String {
    format!("{}?{}", uri.path(), uri.query().unwrap_or(""))
}

/// Extends `http::request::Builder` with a JSON body.
#[cfg(feature = "json")]
pub trait JsonRequest {
    /// Serialize `value` into the request body, setting the Content-Type.
    fn json(
        self,
        value: &impl serde::Serialize,
    ) -> Result<Request<super::body::BoundedBody<Vec<u8>>>>;
}

#[cfg(feature = "json")]
impl JsonRequest for http::request::Builder {
    fn json(
        self,
        value: &impl serde::Serialize,
    ) -> Result<Request<super::body::BoundedBody<Vec<u8>>>> {
        use super::body::IntoBody;
        let bytes = serde_json::to_vec(value).context("encoding json body")?;
        self.header(
            http::header::CONTENT_TYPE,
            "application/json; charset=utf-8",
        )
        .body(bytes.into_body())
        .context("building request")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_keeps_the_question_mark() {
        let uri: Uri = "http://example.com/found".parse().unwrap();
        assert_eq!(path_with_query(&uri), "/found?");
    }

    #[test]
    fn query_rides_along() {
        let uri: Uri = "http://example.com/search?q=wasi&page=2".parse().unwrap();
        assert_eq!(path_with_query(&uri), "/search?q=wasi&page=2");
    }

    #[test]
    fn bare_authority_exports_root_path() {
        let uri: Uri = "http://example.com".parse().unwrap();
        assert_eq!(path_with_query(&uri), "/?");
    }

    #[test]
    fn synthetic_uri_carries_authority_and_path() {
        let uri = synthetic_uri("localhost", "/status?verbose=1").unwrap();
        assert_eq!(uri.authority().unwrap().as_str(), "localhost");
        assert_eq!(uri.path(), "/status");
        assert_eq!(uri.query(), Some("verbose=1"));
    }

    #[test]
    fn bogus_authority_is_rejected() {
        assert!(synthetic_uri("not a host", "/").is_err());
    }
}
