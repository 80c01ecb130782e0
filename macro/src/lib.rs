use proc_macro::TokenStream;
use quote::{quote, quote_spanned};
use syn::{parse_macro_input, spanned::Spanned, ItemFn};

/// Turns a handler function into a `wasi:http/incoming-handler` export.
///
/// # Examples
///
/// ```ignore
/// #[wasihttp::http_handler]
/// fn main(request: Request<IncomingBody>, response: ResponseWriter) -> Result<()> {
///     response.respond(Response::new("Hello!\n".into_body()))
/// }
/// ```
#[proc_macro_attribute]
pub fn attr_macro_http_handler(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    if input.sig.asyncness.is_some() {
        return quote_spanned! { input.sig.fn_token.span()=>
            compile_error!("fn must not be `async`: wasihttp handlers are blocking");
        }
        .into();
    }

    let output = &input.sig.output;
    let inputs = &input.sig.inputs;
    let name = &input.sig.ident;
    let body = &input.block;
    let attrs = &input.attrs;
    let vis = &input.vis;

    if name != "main" {
        return quote_spanned! { input.sig.ident.span()=>
            compile_error!("only `fn main` can be used for #[wasihttp::http_handler]");
        }
        .into();
    }

    quote! {
        struct TheHandler;

        impl ::wasihttp::wasi::exports::http::incoming_handler::Guest for TheHandler {
            fn handle(
                request: ::wasihttp::wasi::http::types::IncomingRequest,
                response_out: ::wasihttp::wasi::http::types::ResponseOutparam
            ) {
                #(#attrs)*
                #vis fn __run(#inputs) #output {
                    #body
                }

                ::wasihttp::http::server::handle_incoming(request, response_out, __run);
            }
        }

        ::wasihttp::wasi::http::proxy::export!(TheHandler with_types_in ::wasihttp::wasi);

        // Provide an actual function named `main`.
        //
        // WASI HTTP server components don't use a traditional `main`
        // function. They export a function named `handle` which takes a
        // `Request` argument, and which may be called multiple times on the
        // same instance. To let users write a familiar `fn main` in a file
        // named src/main.rs, this macro transforms the user's `fn main` into
        // the appropriate `handle` function.
        //
        // However, when the top-level file is named src/main.rs, rustc
        // requires there to be a function named `main` somewhere in it. This
        // requirement can be disabled using `#![no_main]`, however we can't
        // use that automatically because macros can't contain inner
        // attributes, and we don't want to require users to add `#![no_main]`
        // in their own code.
        //
        // So, we include a definition of a function named `main` here, which
        // isn't intended to ever be called, and exists just to satisfy the
        // requirement for a `main` function.
        //
        // Users could use `#![no_main]` if they want to. Or, they could name
        // their top-level file src/lib.rs and add
        // ```toml
        // [lib]
        // crate-type = ["cdylib"]
        // ```
        // to their Cargo.toml. With either of these, this "main" function
        // will be ignored as dead code.
        fn main() {
            unreachable!("HTTP server components should be run with `handle` rather than `run`")
        }
    }
    .into()
}
