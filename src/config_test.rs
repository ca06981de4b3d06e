use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn empty_environment_uses_defaults() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
    assert!(cfg.api_token.is_none());
    assert_eq!(cfg.timeout, Duration::from_secs(30));
    assert_eq!(cfg.reels.interval, Duration::from_secs(300));
    assert_eq!(cfg.reels.display_count, 12);
    assert_eq!(cfg.max_reel_upload_bytes, 50 * 1024 * 1024);
}

#[test]
fn overrides_are_parsed() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("ESTATE_API_URL", "https://api.example.test/v1/"),
        ("ESTATE_API_TOKEN", "secret"),
        ("ESTATE_API_TIMEOUT_SECS", "5"),
        ("ESTATE_REEL_INTERVAL_SECS", "60"),
        ("ESTATE_REEL_DISPLAY_COUNT", "8"),
    ]))
    .unwrap();

    assert_eq!(cfg.api_url, "https://api.example.test/v1");
    assert_eq!(cfg.api_token.as_deref(), Some("secret"));
    assert_eq!(cfg.timeout, Duration::from_secs(5));
    assert_eq!(cfg.reels.interval, Duration::from_secs(60));
    assert_eq!(cfg.reels.display_count, 8);
}

#[test]
fn garbage_numbers_fall_back_to_defaults() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("ESTATE_API_TIMEOUT_SECS", "soon"),
        ("ESTATE_REEL_DISPLAY_COUNT", "-3"),
    ]))
    .unwrap();
    assert_eq!(cfg.timeout, Duration::from_secs(30));
    assert_eq!(cfg.reels.display_count, 12);
}

#[test]
fn blank_token_is_ignored() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("ESTATE_API_TOKEN", "  ")])).unwrap();
    assert!(cfg.api_token.is_none());
}

#[test]
fn zero_interval_is_rejected() {
    let err = ClientConfig::from_lookup(lookup_from(&[("ESTATE_REEL_INTERVAL_SECS", "0")]));
    assert!(err.is_err());
}

#[test]
fn empty_url_is_rejected() {
    assert!(ClientConfig::from_lookup(lookup_from(&[("ESTATE_API_URL", "/")])).is_err());
}

#[test]
fn zero_timeout_is_rejected() {
    let err = ClientConfig::from_lookup(lookup_from(&[("ESTATE_API_TIMEOUT_SECS", "0")]))
        .unwrap_err();
    assert!(err.to_string().contains("ESTATE_API_TIMEOUT_SECS"));
}

#[test]
fn storage_needs_url_and_key() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[(
        "ESTATE_STORAGE_URL",
        "https://store.example.test",
    )]))
    .unwrap();
    assert!(cfg.storage.is_none());

    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("ESTATE_STORAGE_URL", "https://store.example.test/"),
        ("ESTATE_STORAGE_KEY", "anon-key"),
    ]))
    .unwrap();
    let storage = cfg.storage.unwrap();
    assert_eq!(storage.url, "https://store.example.test");
    assert_eq!(storage.key, "anon-key");
    assert_eq!(storage.bucket, DEFAULT_REEL_BUCKET);
}
