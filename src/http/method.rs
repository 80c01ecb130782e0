use std::fmt;

use wasi::http::types::Method as WasiMethod;

use http::Method;

/// Returned when the host hands over a method outside the `wasi:http`
/// method table. The literal string is preserved for diagnostic use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(String);

impl UnknownMethod {
    /// The method exactly as the host supplied it.
    pub fn method(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown http method '{}'", self.0)
    }
}

impl std::error::Error for UnknownMethod {}

pub(crate) fn to_wasi_method(value: Method) -> WasiMethod {
    match value {
        Method::GET => WasiMethod::Get,
        Method::HEAD => WasiMethod::Head,
        Method::POST => WasiMethod::Post,
        Method::PUT => WasiMethod::Put,
        Method::DELETE => WasiMethod::Delete,
        Method::CONNECT => WasiMethod::Connect,
        Method::OPTIONS => WasiMethod::Options,
        Method::TRACE => WasiMethod::Trace,
        Method::PATCH => WasiMethod::Patch,
        other => WasiMethod::Other(other.as_str().to_owned()),
    }
}

pub(crate) fn from_wasi_method(value: WasiMethod) -> Result<Method, UnknownMethod> {
    Ok(match value {
        WasiMethod::Get => Method::GET,
        WasiMethod::Head => Method::HEAD,
        WasiMethod::Post => Method::POST,
        WasiMethod::Put => Method::PUT,
        WasiMethod::Delete => Method::DELETE,
        WasiMethod::Connect => Method::CONNECT,
        WasiMethod::Options => Method::OPTIONS,
        WasiMethod::Trace => Method::TRACE,
        WasiMethod::Patch => Method::PATCH,
        WasiMethod::Other(other) => return Err(UnknownMethod(other)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_round_trips() {
        for method in [
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::CONNECT,
            Method::OPTIONS,
            Method::TRACE,
            Method::PATCH,
        ] {
            let wasi = to_wasi_method(method.clone());
            assert_eq!(from_wasi_method(wasi).unwrap(), method);
        }
    }

    #[test]
    fn extension_method_becomes_other() {
        let method = Method::from_bytes(b"BREW").unwrap();
        assert!(matches!(to_wasi_method(method), WasiMethod::Other(s) if s == "BREW"));
    }

    #[test]
    fn unknown_method_keeps_the_literal() {
        let err = from_wasi_method(WasiMethod::Other("BREW".to_owned())).unwrap_err();
        assert_eq!(err.method(), "BREW");
        assert_eq!(err.to_string(), "unknown http method 'BREW'");
    }
}
