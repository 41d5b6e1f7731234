//! Extraction of the portal's `p_p_auth` token.
//!
//! Station pages embed the token in portlet URLs, e.g.
//! `...&p_p_auth=Ab12Cd34&...`. This is the only part of the scraper that
//! depends on the page markup, so it is kept as a plain function over the
//! HTML text.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static AUTH_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"p_p_auth=([a-zA-Z0-9]+)").expect("token regex is valid"));

/// An ephemeral authorization token scraped from a station page.
///
/// Only valid together with the session cookies of the request that
/// produced it, and only for as long as the portal decides.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken({})", self.0)
    }
}

impl fmt::Display for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Find the first `p_p_auth=<alphanumeric>` in a page.
///
/// ```
/// use departures_server::adif::extract_auth_token;
///
/// let html = r#"<a href="/w/13106-llodio?p_p_id=x&amp;p_p_auth=Xy7Qz9&amp;p_p_lifecycle=1">"#;
/// assert_eq!(extract_auth_token(html).unwrap().as_str(), "Xy7Qz9");
/// assert!(extract_auth_token("<html></html>").is_none());
/// ```
pub fn extract_auth_token(html: &str) -> Option<AuthToken> {
    AUTH_TOKEN
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|token| AuthToken::new(token.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_token_in_portlet_link() {
        let html = r#"
            <html><body>
            <form action="https://www.adif.es/w/13106-llodio?p_p_id=servicios_estacion_ServiciosEstacionPortlet&amp;p_p_lifecycle=1&amp;p_p_auth=kR8sT2uV&amp;p_p_state=normal">
            </body></html>
        "#;
        assert_eq!(extract_auth_token(html), Some(AuthToken::new("kR8sT2uV")));
    }

    #[test]
    fn first_token_wins() {
        let html = "p_p_auth=first1 ... p_p_auth=second2";
        assert_eq!(extract_auth_token(html).unwrap().as_str(), "first1");
    }

    #[test]
    fn token_stops_at_non_alphanumeric() {
        assert_eq!(
            extract_auth_token("p_p_auth=abc123&p_p_state=normal")
                .unwrap()
                .as_str(),
            "abc123"
        );
        assert_eq!(
            extract_auth_token(r#"'p_p_auth=Zz9"'"#).unwrap().as_str(),
            "Zz9"
        );
    }

    #[test]
    fn missing_or_empty_token() {
        assert!(extract_auth_token("").is_none());
        assert!(extract_auth_token("p_p_auth=").is_none());
        assert!(extract_auth_token("p_p_auth=&x=1").is_none());
        assert!(extract_auth_token("P_P_AUTH=abc").is_none());
    }

    #[test]
    fn display_and_debug() {
        let token = AuthToken::new("abc");
        assert_eq!(token.to_string(), "abc");
        assert_eq!(format!("{token:?}"), "AuthToken(abc)");
    }
}
