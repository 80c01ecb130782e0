use std::io::Write;

use wasihttp::http::{
    IncomingBody, IntoBody, Request, Response, ResponseWriter, Result, StatusCode,
};

#[wasihttp::http_handler]
fn main(request: Request<IncomingBody>, response: ResponseWriter) -> Result<()> {
    match request.uri().path() {
        "/echo" => http_echo(request, response),
        "/echo-headers" => http_echo_headers(request, response),
        "/echo-trailers" => http_echo_trailers(request, response),
        "/status-once" => http_status_once(request, response),
        "/late-status" => http_late_status(request, response),
        "/json" => http_json(request, response),
        "/" => http_home(request, response),
        _ => http_not_found(request, response),
    }
}

fn http_home(_request: Request<IncomingBody>, response: ResponseWriter) -> Result<()> {
    response.respond(Response::new("Hello, wasi:http/proxy world!\n".into_body()))
}

/// Stream the request body straight back out.
fn http_echo(mut request: Request<IncomingBody>, mut response: ResponseWriter) -> Result<()> {
    std::io::copy(request.body_mut(), &mut response)?;
    response.finish()
}

fn http_echo_headers(request: Request<IncomingBody>, mut response: ResponseWriter) -> Result<()> {
    *response.headers_mut() = request.headers().clone();
    response.finish()
}

/// Headers added after the first write come back as trailers.
fn http_echo_trailers(_request: Request<IncomingBody>, mut response: ResponseWriter) -> Result<()> {
    response.write_all(b"body\n")?;
    response.headers_mut().insert("x-trailer", "end".parse()?);
    response.finish()
}

/// Only the first status takes; the second call is a no-op.
fn http_status_once(_request: Request<IncomingBody>, mut response: ResponseWriter) -> Result<()> {
    response.set_status(StatusCode::CREATED);
    response.set_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.write_all(b"created\n")?;
    response.finish()
}

/// Writing first commits a 200; the late status call changes nothing.
fn http_late_status(_request: Request<IncomingBody>, mut response: ResponseWriter) -> Result<()> {
    response.write_all(b"late\n")?;
    response.set_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.finish()
}

fn http_json(mut request: Request<IncomingBody>, response: ResponseWriter) -> Result<()> {
    let value: serde_json::Value = request.body_mut().json()?;
    response.respond(Response::new(serde_json::to_string(&value)?.into_body()))
}

fn http_not_found(_request: Request<IncomingBody>, mut response: ResponseWriter) -> Result<()> {
    response.set_status(StatusCode::NOT_FOUND);
    response.finish()
}
