use wasi::http::types::Scheme as WasiScheme;

use http::uri::Scheme;

/// An absent scheme maps to `Other("")`: requests imported from the host
/// carry no scheme-accurate origin, and the host expects the literal back.
pub(crate) fn to_wasi_scheme(value: Option<&Scheme>) -> WasiScheme {
    match value.map(Scheme::as_str) {
        Some("http") => WasiScheme::Http,
        Some("https") => WasiScheme::Https,
        other => WasiScheme::Other(other.unwrap_or("").to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn known_schemes_use_dedicated_variants() {
        assert!(matches!(
            to_wasi_scheme(Some(&Scheme::HTTP)),
            WasiScheme::Http
        ));
        assert!(matches!(
            to_wasi_scheme(Some(&Scheme::HTTPS)),
            WasiScheme::Https
        ));
    }

    #[test]
    fn unknown_scheme_keeps_the_literal() {
        let ws = Scheme::from_str("ws").unwrap();
        assert!(matches!(to_wasi_scheme(Some(&ws)), WasiScheme::Other(s) if s == "ws"));
    }

    #[test]
    fn absent_scheme_becomes_empty_other() {
        assert!(matches!(to_wasi_scheme(None), WasiScheme::Other(s) if s.is_empty()));
    }
}
