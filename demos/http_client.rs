// Run the example with:
// cargo build --example http_client --target=wasm32-wasip2
// wasmtime run -Shttp target/wasm32-wasip2/debug/examples/http_client.wasm
use std::io::Read;

use wasihttp::http::{Client, Request, Result};
use wasihttp::io::empty;

fn main() -> Result<()> {
    let request = Request::builder()
        .uri("https://postman-echo.com/get")
        .header("user-agent", "wasihttp-example")
        .body(empty())?;

    let mut response = Client::new().send(request)?;
    println!("status code: {}", response.status());

    let mut body = String::new();
    response.body_mut().read_to_string(&mut body)?;
    println!("{body}");

    Ok(())
}
