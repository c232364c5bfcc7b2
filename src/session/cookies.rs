//! Cookie header helpers.

use axum::http::{header, HeaderMap, HeaderValue};

/// Iterate `(name, value)` pairs across every `Cookie` header.
fn pairs(headers: &HeaderMap) -> impl Iterator<Item = (&str, &str)> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            Some((name.trim(), value.trim()))
        })
}

/// Value of the first cookie called `name`, if present and non-empty.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    pairs(headers)
        .find(|(n, _)| *n == name)
        .map(|(_, v)| v.trim_matches('"').to_string())
        .filter(|v| !v.is_empty())
}

/// Rebuild a single `Cookie` header without the named cookies.
///
/// Returns `None` when nothing is left to forward.
pub fn without_cookies(headers: &HeaderMap, names: &[&str]) -> Option<HeaderValue> {
    let kept: Vec<String> = pairs(headers)
        .filter(|(n, _)| !names.contains(n))
        .map(|(n, v)| format!("{}={}", n, v))
        .collect();

    if kept.is_empty() {
        return None;
    }
    HeaderValue::from_str(&kept.join("; ")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for c in cookies {
            map.append(header::COOKIE, HeaderValue::from_str(c).unwrap());
        }
        map
    }

    #[test]
    fn test_cookie_value() {
        let map = headers(&["theme=dark; auth_token=abc123", "session-token=xyz"]);
        assert_eq!(cookie_value(&map, "auth_token").as_deref(), Some("abc123"));
        assert_eq!(cookie_value(&map, "session-token").as_deref(), Some("xyz"));
        assert_eq!(cookie_value(&map, "missing"), None);
    }

    #[test]
    fn test_empty_cookie_is_absent() {
        let map = headers(&["auth_token="]);
        assert_eq!(cookie_value(&map, "auth_token"), None);
    }

    #[test]
    fn test_without_cookies() {
        let map = headers(&["theme=dark; auth_token=abc", "session-token=xyz; lang=en"]);
        let rebuilt = without_cookies(&map, &["auth_token", "session-token"]).unwrap();
        assert_eq!(rebuilt, "theme=dark; lang=en");

        let only_auth = headers(&["auth_token=abc"]);
        assert!(without_cookies(&only_auth, &["auth_token"]).is_none());
    }
}
