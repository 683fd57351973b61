use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, ORIGIN, USER_AGENT,
};

/// Chrome desktop identity presented to the platform
///
/// The platform fingerprints clients aggressively; the full client-hint set
/// below has to stay consistent with this user agent string.
const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/142.0.0.0 Safari/537.36";

const CLIENT_HINTS: &[(&str, &str)] = &[
    ("sec-ch-device-memory", "8"),
    (
        "sec-ch-ua",
        "\"Chromium\";v=\"142\", \"Google Chrome\";v=\"142\", \"Not_A Brand\";v=\"99\"",
    ),
    ("sec-ch-ua-arch", "\"x86\""),
    (
        "sec-ch-ua-full-version-list",
        "\"Chromium\";v=\"142.0.7444.176\", \"Google Chrome\";v=\"142.0.7444.176\", \"Not_A Brand\";v=\"99.0.0.0\"",
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-model", "\"\""),
    ("sec-ch-ua-platform", "\"Windows\""),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-origin"),
];

/// Builds the fixed base header set attached to every request
///
/// `origin` is the platform base URL, so that test servers see a matching
/// `Origin` header instead of a hardcoded production value.
pub fn base_headers(origin: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("fr-FR,fr;q=0.9,en-US;q=0.8,en;q=0.7"),
    );
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    if let Ok(value) = HeaderValue::from_str(origin) {
        headers.insert(ORIGIN, value);
    }
    headers.insert(USER_AGENT, HeaderValue::from_static(DESKTOP_USER_AGENT));

    for (name, value) in CLIENT_HINTS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_headers_include_identity() {
        let headers = base_headers("https://www.example.com");

        assert_eq!(headers.get(ORIGIN).unwrap(), "https://www.example.com");
        assert_eq!(
            headers.get(CONTENT_TYPE).unwrap(),
            "application/json; charset=utf-8"
        );
        assert!(headers
            .get(USER_AGENT)
            .unwrap()
            .to_str()
            .unwrap()
            .contains("Chrome/142"));
        assert_eq!(headers.get("sec-fetch-mode").unwrap(), "cors");
    }

    #[test]
    fn test_invalid_origin_is_skipped() {
        let headers = base_headers("bad\norigin");
        assert!(headers.get(ORIGIN).is_none());
    }
}
