use std::fmt;

/// The error type for HTTP conversions and transfers.
///
/// Carries a chain of context frames; the full chain is available through
/// the alternate `Display` format (`{:#}`) and `source`.
pub struct Error {
    inner: anyhow::Error,
}

/// The `http` result type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// An ad-hoc error from a display value.
    pub(crate) fn other(message: impl fmt::Display) -> Self {
        Self {
            inner: anyhow::anyhow!("{message}"),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

impl From<anyhow::Error> for Error {
    fn from(inner: anyhow::Error) -> Self {
        Self { inner }
    }
}

macro_rules! from_error {
    ($($ty:ty,)*) => {$(
        impl From<$ty> for Error {
            fn from(err: $ty) -> Self {
                Self { inner: anyhow::Error::new(err) }
            }
        }
    )*};
}

from_error! {
    std::io::Error,
    http::Error,
    http::header::InvalidHeaderName,
    http::header::InvalidHeaderValue,
    http::method::InvalidMethod,
    http::status::InvalidStatusCode,
    http::uri::InvalidUri,
    super::method::UnknownMethod,
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self {
            inner: anyhow::Error::new(err),
        }
    }
}

// The wasi error payloads don't guarantee std::error::Error impls; keep
// their debug detail instead.
impl From<wasi::http::types::ErrorCode> for Error {
    fn from(code: wasi::http::types::ErrorCode) -> Self {
        Self::other(format!("wasi-http error: {code:?}"))
    }
}

impl From<wasi::http::types::HeaderError> for Error {
    fn from(err: wasi::http::types::HeaderError) -> Self {
        Self::other(format!("wasi-http header error: {err:?}"))
    }
}

/// Attach context to an error, mirroring the `anyhow` extension trait.
pub(crate) trait Context<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: Into<Error>> Context<T> for std::result::Result<T, E> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|err| Error {
            inner: err.into().inner.context(context),
        })
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|err| Error {
            inner: err.into().inner.context(f()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_frames_chain() {
        let err: Result<()> = Err(Error::other("connection reset"));
        let err = err.context("writing response body").unwrap_err();
        assert_eq!(err.to_string(), "writing response body");
        let chain = format!("{err:#}");
        assert!(chain.contains("connection reset"), "got: {chain}");
    }
}
