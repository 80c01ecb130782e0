// Run the example with:
// cargo build --example http_server --target=wasm32-wasip2
// wasmtime serve -Scli target/wasm32-wasip2/debug/examples/http_server.wasm
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
        "/" => http_home(request, response),
        _ => http_not_found(request, response),
    }
}

fn http_home(_request: Request<IncomingBody>, response: ResponseWriter) -> Result<()> {
    // To send a single string as the response body, use
    // `ResponseWriter::respond`.
    response.respond(Response::new("Hello, wasi:http/proxy world!\n".into_body()))
}

fn http_echo(mut request: Request<IncomingBody>, mut response: ResponseWriter) -> Result<()> {
    // Stream data from the request body to the response body. The first
    // write commits the response head.
    std::io::copy(request.body_mut(), &mut response)?;
    response.finish()
}

fn http_echo_headers(request: Request<IncomingBody>, mut response: ResponseWriter) -> Result<()> {
    *response.headers_mut() = request.headers().clone();
    response.finish()
}

fn http_echo_trailers(request: Request<IncomingBody>, mut response: ResponseWriter) -> Result<()> {
    // Drain the request body, then forward its trailers: header-map entries
    // added after the first write go out as trailers on finish.
    response.write_all(b"echoing trailers\n")?;
    let trailers = request.into_body().finish()?;
    if let Some(trailers) = trailers {
        *response.headers_mut() = trailers;
    }
    response.finish()
}

fn http_not_found(_request: Request<IncomingBody>, mut response: ResponseWriter) -> Result<()> {
    response.set_status(StatusCode::NOT_FOUND);
    response.finish()
}
