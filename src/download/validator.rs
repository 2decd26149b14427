use crate::error::RelayError;
use url::Url;

/// Host substrings of the platforms the bot accepts links from
pub const SUPPORTED_DOMAINS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "twitter.com",
    "x.com",
    "instagram.com",
    "tiktok.com",
    "vk.com",
    "rutube.ru",
    "dzen.ru",
];

/// Check that `input` is a URL whose host belongs to a supported platform.
///
/// Matching is by substring of the lowercased host, so subdomains such as
/// `m.youtube.com` or `vm.tiktok.com` pass.
///
/// # Errors
///
/// - [`RelayError::InvalidFormat`] if `input` does not parse or has no host.
/// - [`RelayError::UnsupportedDomain`] with the host if it is not allow-listed.
pub fn validate_url(input: &str) -> Result<Url, RelayError> {
    let url = Url::parse(input).map_err(|_| RelayError::InvalidFormat)?;

    let host = match url.host_str() {
        Some(h) if !h.is_empty() => h.to_lowercase(),
        _ => return Err(RelayError::InvalidFormat),
    };

    if SUPPORTED_DOMAINS.iter().any(|domain| host.contains(domain)) {
        Ok(url)
    } else {
        Err(RelayError::UnsupportedDomain(host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_short_youtube_link() {
        let url = validate_url("https://youtu.be/abc123");
        assert!(matches!(url, Ok(ref u) if u.host_str() == Some("youtu.be")));
    }

    #[test]
    fn test_accepts_subdomains_and_mixed_case() {
        assert!(validate_url("https://m.YouTube.com/watch?v=abc").is_ok());
        assert!(validate_url("https://vm.tiktok.com/ZM123/").is_ok());
        assert!(validate_url("http://www.instagram.com/reel/xyz").is_ok());
        assert!(validate_url("https://x.com/user/status/1234567890").is_ok());
    }

    #[test]
    fn test_rejects_unsupported_domain_by_name() {
        match validate_url("https://example.com/video") {
            Err(RelayError::UnsupportedDomain(host)) => assert_eq!(host, "example.com"),
            other => panic!("expected UnsupportedDomain, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_inputs_without_host() {
        for input in ["youtu.be/abc123", "just some text", "", "mailto:someone@x.com"] {
            assert!(
                matches!(validate_url(input), Err(RelayError::InvalidFormat)),
                "{input:?} should be InvalidFormat"
            );
        }
    }

    #[test]
    fn test_port_is_not_part_of_host() {
        assert!(validate_url("https://rutube.ru:443/video/abc/").is_ok());
        match validate_url("https://example.org:8080/x") {
            Err(RelayError::UnsupportedDomain(host)) => assert_eq!(host, "example.org"),
            other => panic!("expected UnsupportedDomain, got {other:?}"),
        }
    }
}
