use oxide_relay::download::{validate_url, SUPPORTED_DOMAINS};
use oxide_relay::RelayError;
use proptest::prelude::*;

fn is_allow_listed(host: &str) -> bool {
    SUPPORTED_DOMAINS.iter().any(|d| host.contains(d))
}

proptest! {
    /// Test that validate_url does not crash on any valid UTF-8 input.
    #[test]
    fn does_not_crash(s in "\\PC*") {
        let _ = validate_url(&s);
    }

    /// Hosts containing none of the supported substrings are rejected by name.
    #[test]
    fn rejects_unlisted_hosts(
        label in "[a-z0-9]{1,12}",
        tld in "(com|org|net|io|ru|de)",
        path in "[a-zA-Z0-9/]{0,20}",
        scheme in "(http|https)",
    ) {
        let host = format!("{label}.{tld}");
        prop_assume!(!is_allow_listed(&host));

        let input = format!("{scheme}://{host}/{path}");
        match validate_url(&input) {
            Err(RelayError::UnsupportedDomain(reported)) => prop_assert_eq!(reported, host),
            other => prop_assert!(false, "{} gave {:?}", input, other),
        }
    }

    /// Any subdomain of a supported platform is accepted.
    #[test]
    fn accepts_supported_subdomains(
        sub in "(www|m|vm|mobile)",
        idx in 0..SUPPORTED_DOMAINS.len(),
        path in "[a-zA-Z0-9]{1,16}",
    ) {
        let input = format!("https://{sub}.{}/{path}", SUPPORTED_DOMAINS[idx]);
        prop_assert!(validate_url(&input).is_ok(), "{} was rejected", input);
    }

    /// Text without a scheme never has a host.
    #[test]
    fn schemeless_text_is_invalid_format(s in "[a-z0-9./]{0,30}") {
        prop_assert!(matches!(validate_url(&s), Err(RelayError::InvalidFormat)));
    }
}

#[test]
fn scenario_short_youtube_link_is_accepted() {
    assert!(validate_url("https://youtu.be/abc123").is_ok());
}

#[test]
fn scenario_example_com_is_named_in_rejection() {
    let err = validate_url("https://example.com/video").err();
    assert!(matches!(err, Some(RelayError::UnsupportedDomain(ref h)) if h == "example.com"));
    let message = err.map(|e| e.to_string()).unwrap_or_default();
    assert!(message.contains("example.com"));
}
