use super::controller::*;
use crate::api::SearchParams;
use crate::events::{HeroSearch, SearchEvents};
use crate::models::{ListingPage, Pagination, RecordId, Viewer};
use crate::testing::{listing, FakeApi};

use std::sync::Arc;

fn page_of(ids: &[RecordId], current: u32, total: u32) -> ListingPage {
    ListingPage {
        listings: ids.iter().map(|id| listing(*id)).collect(),
        pagination: Pagination {
            current,
            total,
            has_prev: current > 1,
            has_next: current < total,
        },
    }
}

fn api() -> FakeApi {
    FakeApi {
        page: page_of(&[1, 2], 1, 3),
        search_page: ListingPage {
            listings: vec![listing(90)],
            pagination: Pagination::default(),
        },
        ..FakeApi::default()
    }
}

#[tokio::test]
async fn successful_fetch_replaces_listings_and_pagination() {
    let api = Arc::new(api());
    let mut c = ListingController::new(api.clone()).with_viewer(Viewer::User(11));

    assert!(c.fetch_page(1, Some("Lagos")).await);
    assert_eq!(c.listings().len(), 2);
    assert_eq!(c.pagination(), Pagination { current: 1, total: 3, has_prev: false, has_next: true });
    assert!(!c.is_loading());

    let q = &api.queries()[0];
    assert_eq!(q.user_id, Some(11));
    assert_eq!(q.location.as_deref(), Some("Lagos"));
}

#[tokio::test]
async fn failed_fetch_clears_listings_and_resets_pagination() {
    let api = Arc::new(api().fail_on("fetch_listings"));
    let mut c = ListingController::new(api);

    // Seed state through a search, which still succeeds
    assert!(c.search(SearchParams::by_location("Abuja")).await);
    assert_eq!(c.listings().len(), 1);
    c.reset_search().await;

    assert!(c.listings().is_empty());
    assert_eq!(
        c.pagination(),
        Pagination { current: 1, total: 1, has_prev: false, has_next: false }
    );
    assert!(!c.is_search_mode());
}

#[tokio::test]
async fn search_mode_suppresses_default_fetch() {
    let api = Arc::new(api());
    let mut c = ListingController::new(api.clone());

    c.search(SearchParams::by_location("Ikoyi")).await;
    assert!(c.is_search_mode());
    assert!(!c.load_home(2).await);
    assert_eq!(api.calls(), ["search_listings"]);
    assert_eq!(api.searches()[0].location.as_deref(), Some("Ikoyi"));
}

#[tokio::test]
async fn paging_follows_the_active_mode() {
    let api = Arc::new(api());
    let mut c = ListingController::new(api.clone());

    c.load_home(1).await;
    assert!(c.next_page().await);
    assert_eq!(api.queries().last().unwrap().page, 2);

    c.apply_hero_search(HeroSearch::new("Yaba")).await;
    c.go_to_page(4).await;

    let last = api.queries().last().unwrap().clone();
    assert_eq!(last.page, 4);
    assert_eq!(last.location.as_deref(), Some("Yaba"));

    c.search(SearchParams::by_location("Surulere")).await;
    c.go_to_page(2).await;
    assert_eq!(
        api.calls(),
        [
            "fetch_listings",
            "fetch_listings",
            "fetch_listings",
            "fetch_listings",
            "search_listings",
            "search_listings"
        ]
    );
}

#[tokio::test]
async fn filter_search_results_arrive_as_a_single_page() {
    let api = Arc::new(api());
    let mut c = ListingController::new(api.clone());

    assert!(c.search(SearchParams::by_location("Ajah")).await);
    assert_eq!(c.pagination(), Pagination::default());
    assert!(!c.next_page().await);
    assert_eq!(api.calls(), ["search_listings"]);
}

#[tokio::test]
async fn prev_page_is_a_no_op_on_the_first_page() {
    let api = Arc::new(api());
    let mut c = ListingController::new(api.clone());
    c.load_home(1).await;

    assert!(!c.prev_page().await);
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn reset_search_restores_default_fetching_from_page_one() {
    let api = Arc::new(api());
    let mut c = ListingController::new(api.clone());

    c.apply_hero_search(HeroSearch::new("Lekki")).await;
    assert!(c.reset_search().await);

    assert!(!c.is_search_mode());
    assert!(c.active_search().is_none());
    let last = api.queries().last().unwrap().clone();
    assert_eq!(last.page, 1);
    assert!(last.location.is_none());
    assert!(c.load_home(1).await);
}

#[tokio::test]
async fn viewer_change_refetches_first_page() {
    let api = Arc::new(api());
    let mut c = ListingController::new(api.clone());
    c.load_home(2).await;

    c.set_viewer(Viewer::User(9)).await;
    let last = api.queries().last().unwrap().clone();
    assert_eq!(last.page, 1);
    assert_eq!(last.user_id, Some(9));

    c.set_viewer(Viewer::Anonymous).await;
    assert_eq!(api.queries().last().unwrap().user_id, None);
}

#[tokio::test]
async fn hero_search_pages_through_homepage_endpoint_with_location() {
    let api = Arc::new(api());
    let mut c = ListingController::new(api.clone()).with_viewer(Viewer::User(4));

    assert!(c.apply_hero_search(HeroSearch::new("  Victoria Island ")).await);
    assert_eq!(
        c.active_search(),
        Some(&ActiveSearch::Location("Victoria Island".into()))
    );
    let q = api.queries()[0].clone();
    assert_eq!(q.page, 1);
    assert_eq!(q.location.as_deref(), Some("Victoria Island"));
    assert_eq!(q.user_id, Some(4));
    assert_eq!(api.calls(), ["fetch_listings"]);
}

#[tokio::test]
async fn blank_hero_search_is_ignored() {
    let api = Arc::new(api());
    let mut c = ListingController::new(api.clone());
    c.load_home(1).await;

    assert!(!c.apply_hero_search(HeroSearch::new("   ")).await);
    assert!(!c.apply_hero_search(HeroSearch::new("")).await);

    assert!(!c.is_search_mode());
    assert_eq!(c.listings().len(), 2);
    assert_eq!(api.calls(), ["fetch_listings"]);
}

#[tokio::test]
async fn hero_search_events_drive_a_search() {
    let api = Arc::new(api());
    let mut c = ListingController::new(api.clone());
    let events = SearchEvents::default();
    let mut rx = events.subscribe();

    events.publish(HeroSearch::new("Victoria Island"));
    assert_eq!(c.handle_next_event(&mut rx).await, Some(true));
    assert!(c.is_search_mode());

    events.publish(HeroSearch::new(" "));
    assert_eq!(c.handle_next_event(&mut rx).await, Some(false));

    drop(events);
    assert_eq!(c.handle_next_event(&mut rx).await, None);
}
