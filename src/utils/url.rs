// src/utils/url.rs

//! URL manipulation utilities.

const SCHEMES: [&str; 2] = ["https://", "http://"];

const DEFAULT_SCHEME: &str = "https://";

fn is_padding(c: char) -> bool {
    c == '/' || c.is_whitespace()
}

/// Split off a leading `http://` or `https://`, matched case-insensitively.
fn split_scheme(s: &str) -> Option<(&str, &str)> {
    SCHEMES.iter().find_map(|scheme| {
        let head = s.get(..scheme.len())?;
        head.eq_ignore_ascii_case(scheme)
            .then(|| (head, &s[scheme.len()..]))
    })
}

/// Normalize a configured server address into a base URL.
///
/// Strips surrounding slashes and whitespace and adds `https://` when no
/// scheme is present. Applying it twice gives the same string.
///
/// # Examples
/// ```
/// use talos_feed::utils::url::normalize_server_url;
///
/// assert_eq!(
///     normalize_server_url("/talosintelligence.com/"),
///     "https://talosintelligence.com"
/// );
/// assert_eq!(
///     normalize_server_url("http://127.0.0.1:8080"),
///     "http://127.0.0.1:8080"
/// );
/// ```
pub fn normalize_server_url(raw: &str) -> String {
    let trimmed = raw.trim_start_matches(is_padding);
    let (scheme, rest) = split_scheme(trimmed).unwrap_or((DEFAULT_SCHEME, trimmed));
    format!("{}{}", scheme, rest.trim_end_matches(is_padding))
}

/// Join a base URL and an endpoint path.
///
/// # Examples
/// ```
/// use talos_feed::utils::url::endpoint;
///
/// assert_eq!(
///     endpoint("https://example.com", "/documents/ip-blacklist"),
///     "https://example.com/documents/ip-blacklist"
/// );
/// ```
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{base_url}{path}")
}
