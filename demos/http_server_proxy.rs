// Run the example with:
// cargo build --example http_server_proxy --target=wasm32-wasip2
// wasmtime serve -Scli -Shttp --env TARGET_URL=https://example.com/ target/wasm32-wasip2/debug/examples/http_server_proxy.wasm
// Test with `curl --no-buffer -v 127.0.0.1:8080/proxy/`
use std::io::Write;

use wasihttp::http::{
    Client, IncomingBody, Request, ResponseWriter, Result, StatusCode, Uri,
};

const PROXY_PREFIX: &str = "/proxy/";

#[wasihttp::http_handler]
fn main(server_req: Request<IncomingBody>, mut response: ResponseWriter) -> Result<()> {
    let Some(target_path) = server_req
        .uri()
        .path_and_query()
        .and_then(|p| p.as_str().strip_prefix(PROXY_PREFIX))
        .map(str::to_owned)
    else {
        response.set_status(StatusCode::NOT_FOUND);
        return response.finish();
    };

    let target_url =
        std::env::var("TARGET_URL").expect("missing environment variable TARGET_URL");
    let target: Uri = format!("{target_url}{target_path}").parse()?;
    println!("Proxying to {target}");

    // Rebuild the request against the target, streaming the incoming body
    // through as the outgoing one.
    let (parts, body) = server_req.into_parts();
    let mut client_req = Request::builder().uri(target).method(parts.method);
    for (key, value) in &parts.headers {
        client_req = client_req.header(key, value);
    }
    let client_req = client_req.body(body)?;

    let mut client_resp = Client::new().send(client_req)?;

    // Copy the response head, then stream the body back out.
    *response.headers_mut() = client_resp.headers().clone();
    response.set_status(client_resp.status());
    std::io::copy(client_resp.body_mut(), &mut response)?;
    response.finish()
}
