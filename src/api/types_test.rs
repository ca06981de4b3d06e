use super::storage::{object_name, object_name_from_url};
use super::types::*;

#[test]
fn empty_params_produce_no_pairs() {
    assert!(SearchParams::default().to_query_pairs().is_empty());
}

#[test]
fn filled_params_use_search_endpoint_keys() {
    let params = SearchParams {
        location: Some("Lagos".into()),
        area: Some(" Ikoyi ".into()),
        min_price: Some(100_000),
        max_price: Some(900_000),
        bedrooms: Some(3),
        bathrooms: Some(2),
        sort: Some(SortKey::PriceDesc),
        tags: vec!["pool".into(), " ".into(), "gym".into()],
    };

    assert_eq!(
        params.to_query_pairs(),
        vec![
            ("search", "Lagos".to_string()),
            ("search_area", "Ikoyi".to_string()),
            ("price_min", "100000".to_string()),
            ("price_max", "900000".to_string()),
            ("bedrooms", "3".to_string()),
            ("bathrooms", "2".to_string()),
            ("sort_by", "price_desc".to_string()),
            ("tags", "pool,gym".to_string()),
        ]
    );
}

#[test]
fn blank_location_is_skipped() {
    let params = SearchParams::by_location("   ");
    assert!(params.to_query_pairs().is_empty());
}

#[test]
fn listing_query_leads_with_page() {
    let query = ListingQuery {
        page: 0,
        location: Some("Abuja".into()),
        user_id: Some(7),
    };

    assert_eq!(
        query.to_query_pairs(),
        vec![
            ("page", "1".to_string()),
            ("location", "Abuja".to_string()),
            ("user_id", "7".to_string()),
        ]
    );
}

#[test]
fn error_body_message_is_read() {
    let body: ErrorBody =
        serde_json::from_str(r#"{"error": "No active promotion to pause"}"#).unwrap();
    assert_eq!(body.error.as_deref(), Some("No active promotion to pause"));
}

#[test]
fn application_envelope_keeps_success_flag() {
    let body: ApplicationsBody =
        serde_json::from_str(r#"{"success": false, "applications": null, "count": 0}"#).unwrap();
    assert!(!body.success);
    assert!(body.applications.is_empty());
}

#[test]
fn pause_response_carries_only_remaining_days() {
    let resp: PromotionResponse = serde_json::from_str(
        r#"{"success": true, "message": "Promotion paused", "remaining_days": 3.5}"#,
    )
    .unwrap();
    assert_eq!(resp.remaining_days, Some(3.5));
    assert!(resp.promoted_until.is_none());
}

#[test]
fn promote_response_reads_naive_timestamp() {
    let resp: PromotionResponse = serde_json::from_str(
        r#"{"success": true, "promoted_until": "2026-03-08T12:30:00.123456"}"#,
    )
    .unwrap();
    let until = resp.promoted_until.unwrap();
    assert_eq!(until.to_rfc3339(), "2026-03-08T12:30:00.123456+00:00");
}

#[test]
fn reel_object_names_round_trip_through_urls() {
    let name = object_name("clips/tour.mp4", 1_700_000_000_000);
    assert_eq!(name, "1700000000000_tour.mp4");

    let url = format!("https://store.test/storage/v1/object/public/reels/{name}?v=1");
    assert_eq!(object_name_from_url(&url), name);
}
