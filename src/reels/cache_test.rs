use super::cache::*;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use std::time::Duration;

fn t0() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()
}

#[test]
fn value_without_ttl_lives_for_the_session() {
    let cache = MemorySessionCache::new();
    cache.set("k", "v".into(), None, t0());
    assert_eq!(cache.get("k", t0() + ChronoDuration::days(30)).as_deref(), Some("v"));
}

#[test]
fn value_expires_after_ttl() {
    let cache = MemorySessionCache::new();
    cache.set("k", "v".into(), Some(Duration::from_secs(60)), t0());

    assert_eq!(cache.get("k", t0() + ChronoDuration::seconds(59)).as_deref(), Some("v"));
    assert_eq!(cache.get("k", t0() + ChronoDuration::seconds(60)), None);
    // Expired entries are evicted on read
    assert!(cache.is_empty());
}

#[test]
fn set_overwrites_and_clear_removes() {
    let cache = MemorySessionCache::new();
    cache.set("k", "one".into(), None, t0());
    cache.set("k", "two".into(), None, t0());
    assert_eq!(cache.get("k", t0()).as_deref(), Some("two"));

    cache.clear("k");
    assert_eq!(cache.get("k", t0()), None);
    cache.clear("missing");
}

#[test]
fn huge_ttl_means_no_expiry() {
    let cache = MemorySessionCache::new();
    cache.set("k", "v".into(), Some(Duration::MAX), t0());
    assert_eq!(cache.get("k", t0() + ChronoDuration::days(3650)).as_deref(), Some("v"));
}
