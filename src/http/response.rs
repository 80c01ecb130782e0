use http::{Response, StatusCode};
use wasi::http::types::IncomingResponse;

use super::body::{content_length, IncomingBody};
use super::error::{Context, Error, Result};
use super::fields::header_map_from_wasi;

pub(crate) fn try_from_incoming(incoming: IncomingResponse) -> Result<Response<IncomingBody>> {
    let headers = header_map_from_wasi(&incoming.headers())?;
    let status = StatusCode::from_u16(incoming.status())
        .context("wasi provided an invalid status code")?;

    let body = incoming
        .consume()
        .map_err(|()| Error::other("incoming response body already acquired"))
        .and_then(|body| IncomingBody::new(body, content_length(&headers)))
        .context("failed to consume incoming response")?;

    let mut response = Response::builder()
        .status(status)
        .body(body)
        .context("building response")?;
    *response.headers_mut() = headers;

    Ok(response)
}
