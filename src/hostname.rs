//! Hostname extraction from raw URL cells.

/// Reduce a raw URL to its bare host segment.
///
/// Drops everything up to and including the first `://`, then truncates at
/// the first `/` and at the first `:` (port). Case and surrounding
/// whitespace are left untouched; strings without a scheme, path or port are
/// returned as-is.
pub fn normalize(raw_url: &str) -> String {
    let mut host = match raw_url.find("://") {
        Some(idx) => &raw_url[idx + 3..],
        None => raw_url,
    };
    if let Some(idx) = host.find('/') {
        host = &host[..idx];
    }
    if let Some(idx) = host.find(':') {
        host = &host[..idx];
    }
    host.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_port_and_path() {
        assert_eq!(normalize("https://example.com:8080/path"), "example.com");
        assert_eq!(normalize("http://video.example.org/watch?v=1"), "video.example.org");
        assert_eq!(normalize("rtmp://stream.example.net:1935"), "stream.example.net");
    }

    #[test]
    fn scheme_is_optional() {
        assert_eq!(normalize("example.com/path"), "example.com");
        assert_eq!(
            normalize("example.com:443/a/b"),
            normalize("https://example.com:443/a/b")
        );
    }

    #[test]
    fn bare_values_pass_through() {
        assert_eq!(normalize("example.com"), "example.com");
        assert_eq!(normalize("203.0.113.7"), "203.0.113.7");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn case_and_whitespace_preserved() {
        assert_eq!(normalize("HTTPS://Example.COM/x"), "Example.COM");
        assert_eq!(normalize(" example.com "), " example.com ");
    }

    #[test]
    fn only_first_scheme_separator_counts() {
        assert_eq!(normalize("https://a.example/redirect?to=http://b.example"), "a.example");
    }

    #[test]
    fn idempotent_without_scheme() {
        for url in [
            "example.com",
            "example.com:8080",
            "example.com/a:b",
            "host:1/x",
            "",
            "weird value",
        ] {
            let once = normalize(url);
            assert_eq!(normalize(&once), once, "input {url:?}");
        }
    }
}
