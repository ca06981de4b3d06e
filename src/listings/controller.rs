use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::api::types::non_blank;
use crate::api::{ApiResult, ListingQuery, ListingsApi, SearchParams};
use crate::events::HeroSearch;
use crate::models::{Listing, ListingPage, Pagination, RecordId, Viewer};

/// Search that currently owns the listing view
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveSearch {
    /// Hero-bar location search, paged through the homepage endpoint
    Location(String),
    /// Search form filters; the server answers with one unpaged batch
    Filters(SearchParams),
}

/// Paged listing view with an overriding search mode.
///
/// Outside search mode pages come from the homepage endpoint; a search flips
/// the controller into search mode, where the default fetch is suppressed
/// and page changes re-run the active search.
pub struct ListingController<A: ListingsApi + ?Sized> {
    api: Arc<A>,
    user_id: Option<RecordId>,
    listings: Vec<Listing>,
    pagination: Pagination,
    active: Option<ActiveSearch>,
    loading: bool,
}

impl<A: ListingsApi + ?Sized> ListingController<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            user_id: None,
            listings: Vec::new(),
            pagination: Pagination::default(),
            active: None,
            loading: false,
        }
    }

    pub fn with_viewer(mut self, viewer: Viewer) -> Self {
        self.user_id = viewer.id();
        self
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn is_search_mode(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn active_search(&self) -> Option<&ActiveSearch> {
        self.active.as_ref()
    }

    /// Fetch one homepage page, optionally narrowed to a location.
    /// Returns whether it succeeded.
    pub async fn fetch_page(&mut self, page: u32, location: Option<&str>) -> bool {
        let query = ListingQuery {
            page: page.max(1),
            location: non_blank(location).map(str::to_string),
            user_id: self.user_id,
        };

        self.loading = true;
        let result = self.api.fetch_listings(&query).await;
        self.apply(result)
    }

    /// Homepage fetch; skipped while a search owns the view
    pub async fn load_home(&mut self, page: u32) -> bool {
        if self.active.is_some() {
            debug!("Search mode active, skipping default fetch of page {}", page);
            return false;
        }
        self.fetch_page(page, None).await
    }

    /// Enter search mode with the form filters and fetch the results
    pub async fn search(&mut self, params: SearchParams) -> bool {
        info!("Searching listings: {:?}", params);
        self.active = Some(ActiveSearch::Filters(params));
        self.go_to_page(1).await
    }

    pub async fn go_to_page(&mut self, page: u32) -> bool {
        match self.active.clone() {
            None => self.fetch_page(page, None).await,
            Some(ActiveSearch::Location(location)) => self.fetch_page(page, Some(&location)).await,
            Some(ActiveSearch::Filters(params)) => {
                self.loading = true;
                let result = self.api.search_listings(&params).await;
                self.apply(result)
            }
        }
    }

    pub async fn next_page(&mut self) -> bool {
        if !self.pagination.has_next {
            return false;
        }
        self.go_to_page(self.pagination.current + 1).await
    }

    pub async fn prev_page(&mut self) -> bool {
        if !self.pagination.has_prev {
            return false;
        }
        self.go_to_page(self.pagination.current.saturating_sub(1)).await
    }

    /// Leave search mode and go back to page 1 of the default listing
    pub async fn reset_search(&mut self) -> bool {
        self.active = None;
        self.fetch_page(1, None).await
    }

    /// New viewer identity; refetch page 1 of whatever mode is active
    pub async fn set_viewer(&mut self, viewer: Viewer) -> bool {
        self.user_id = viewer.id();
        self.go_to_page(1).await
    }

    /// Blank locations are ignored and leave the view untouched
    pub async fn apply_hero_search(&mut self, event: HeroSearch) -> bool {
        let Some(location) = non_blank(Some(event.location.as_str())).map(str::to_string) else {
            debug!("Ignoring hero search with a blank location");
            return false;
        };
        info!("Hero search for {}", location);
        self.active = Some(ActiveSearch::Location(location));
        self.go_to_page(1).await
    }

    /// Wait for the next hero search and run it.
    ///
    /// Returns `None` once every publisher is gone.
    pub async fn handle_next_event(
        &mut self,
        events: &mut broadcast::Receiver<HeroSearch>,
    ) -> Option<bool> {
        loop {
            match events.recv().await {
                Ok(event) => return Some(self.apply_hero_search(event).await),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Dropped {} stale hero searches", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    fn apply(&mut self, result: ApiResult<ListingPage>) -> bool {
        self.loading = false;
        match result {
            Ok(page) => {
                debug!(
                    "Showing {} listings, page {}/{}",
                    page.listings.len(),
                    page.pagination.current,
                    page.pagination.total
                );
                self.listings = page.listings;
                self.pagination = page.pagination;
                true
            }
            Err(e) => {
                warn!("Listing fetch failed, clearing view: {}", e);
                self.listings.clear();
                self.pagination = Pagination::default();
                false
            }
        }
    }
}
