//! In-memory API fake and record fixtures shared by unit tests.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::api::{
    AgentApi, ApiResult, ListingQuery, ListingsApi, PromotionResponse, ReelStorage, ReelUpload,
    SearchParams,
};
use crate::error::ApiError;
use crate::models::{
    AgentProfile, Application, ApplicationStatus, Booking, BookingStatus, Listing, ListingPage,
    Location, Promotion, RecordId, Reel,
};

/// Scripted responses; every call is recorded by name, calls named in
/// `failing` answer with a 500 and calls named in `delays` sleep first.
#[derive(Default)]
pub struct FakeApi {
    pub page: ListingPage,
    pub search_page: ListingPage,
    pub reels: Vec<Reel>,
    pub personalized_reels: Vec<Reel>,
    pub profile: AgentProfile,
    pub listings: Vec<Listing>,
    pub applications: Vec<Application>,
    pub bookings: Vec<Booking>,
    pub promotion: PromotionResponse,
    pub failing: Vec<&'static str>,
    pub delays: Vec<(&'static str, Duration)>,
    pub(crate) calls: Mutex<Vec<String>>,
    pub(crate) queries: Mutex<Vec<ListingQuery>>,
    pub(crate) searches: Mutex<Vec<SearchParams>>,
    pub(crate) promoted_until: Mutex<Vec<DateTime<Utc>>>,
}

impl FakeApi {
    pub fn fail_on(mut self, call: &'static str) -> Self {
        self.failing.push(call);
        self
    }

    pub fn delay_on(mut self, call: &'static str, delay: Duration) -> Self {
        self.delays.push((call, delay));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn queries(&self) -> Vec<ListingQuery> {
        lock(&self.queries).clone()
    }

    pub fn searches(&self) -> Vec<SearchParams> {
        lock(&self.searches).clone()
    }

    pub fn promoted_until(&self) -> Vec<DateTime<Utc>> {
        lock(&self.promoted_until).clone()
    }

    async fn record(&self, call: &'static str) -> ApiResult<()> {
        lock(&self.calls).push(call.to_string());
        let delay = self
            .delays
            .iter()
            .find(|(name, _)| *name == call)
            .map(|(_, delay)| *delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(&call) {
            return Err(ApiError::status(call, 500));
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl ListingsApi for FakeApi {
    async fn fetch_listings(&self, query: &ListingQuery) -> ApiResult<ListingPage> {
        lock(&self.queries).push(query.clone());
        self.record("fetch_listings").await?;
        Ok(self.page.clone())
    }

    async fn search_listings(&self, params: &SearchParams) -> ApiResult<ListingPage> {
        lock(&self.searches).push(params.clone());
        self.record("search_listings").await?;
        Ok(self.search_page.clone())
    }

    async fn fetch_reels(&self) -> ApiResult<Vec<Reel>> {
        self.record("fetch_reels").await?;
        Ok(self.reels.clone())
    }

    async fn fetch_personalized_reels(&self, _user_id: RecordId) -> ApiResult<Vec<Reel>> {
        self.record("fetch_personalized_reels").await?;
        Ok(self.personalized_reels.clone())
    }
}

#[async_trait]
impl AgentApi for FakeApi {
    async fn fetch_profile(&self) -> ApiResult<AgentProfile> {
        self.record("fetch_profile").await?;
        Ok(self.profile.clone())
    }

    async fn fetch_agent_listings(&self, _agent_id: RecordId) -> ApiResult<Vec<Listing>> {
        self.record("fetch_agent_listings").await?;
        Ok(self.listings.clone())
    }

    async fn fetch_agent_applications(&self, _agent_id: RecordId) -> ApiResult<Vec<Application>> {
        self.record("fetch_agent_applications").await?;
        Ok(self.applications.clone())
    }

    async fn fetch_agent_bookings(&self, _agent_id: RecordId) -> ApiResult<Vec<Booking>> {
        self.record("fetch_agent_bookings").await?;
        Ok(self.bookings.clone())
    }

    async fn update_application_status(&self, _id: RecordId, _status: ApplicationStatus) -> ApiResult<()> {
        self.record("update_application_status").await
    }

    async fn update_booking_status(&self, _id: RecordId, _status: BookingStatus) -> ApiResult<()> {
        self.record("update_booking_status").await
    }

    async fn promote_listing(
        &self,
        _listing_id: RecordId,
        promoted_until: DateTime<Utc>,
    ) -> ApiResult<PromotionResponse> {
        lock(&self.promoted_until).push(promoted_until);
        self.record("promote_listing").await?;
        Ok(self.promotion.clone())
    }

    async fn pause_promotion(&self, _listing_id: RecordId) -> ApiResult<PromotionResponse> {
        self.record("pause_promotion").await?;
        Ok(self.promotion.clone())
    }

    async fn resume_promotion(&self, _listing_id: RecordId) -> ApiResult<PromotionResponse> {
        self.record("resume_promotion").await?;
        Ok(self.promotion.clone())
    }

    async fn attach_reel(&self, _listing_id: RecordId, _reel_url: &str) -> ApiResult<()> {
        self.record("attach_reel").await
    }

    async fn detach_reel(&self, _listing_id: RecordId, _reel_url: &str) -> ApiResult<()> {
        self.record("detach_reel").await
    }
}

#[async_trait]
impl ReelStorage for FakeApi {
    async fn store_reel(&self, upload: &ReelUpload) -> ApiResult<String> {
        self.record("store_reel").await?;
        Ok(format!("https://storage.test/reels/{}", upload.file_name))
    }

    async fn remove_reel(&self, _reel_url: &str) -> ApiResult<()> {
        self.record("remove_reel").await
    }
}

pub fn listing(id: RecordId) -> Listing {
    Listing {
        id,
        title: format!("Listing {id}"),
        description: None,
        price: Some(1_000_000.0),
        price_display: None,
        listing_type: Some("single".to_string()),
        rent_period: None,
        location: Location {
            area: Some("Lekki".to_string()),
            city: Some("Lagos".to_string()),
            state: None,
        },
        bedrooms: Some(2.0),
        bathrooms: Some(1.0),
        bed_display: None,
        bath_display: None,
        image_paths: Vec::new(),
        video_path: None,
        reels: Vec::new(),
        tags: Vec::new(),
        units: Vec::new(),
        views: 0,
        is_favorite: false,
        is_featured: false,
        created_at: None,
        promotion: Promotion::default(),
    }
}

pub fn listing_with_reels(id: RecordId, count: usize) -> Listing {
    let mut l = listing(id);
    l.reels = (0..count).map(|i| format!("https://cdn.test/{id}/{i}.mp4")).collect();
    l
}

pub fn reel(n: usize) -> Reel {
    Reel {
        listing_id: n as RecordId,
        url: format!("https://cdn.test/reel-{n}.mp4"),
        title: format!("Reel {n}"),
        location: "Lekki, Lagos".to_string(),
        tags: Vec::new(),
        bedrooms: Some(2.0),
        listing_type: None,
        bedroom_range: None,
    }
}

pub fn reels(count: usize) -> Vec<Reel> {
    (0..count).map(reel).collect()
}

pub fn application(id: RecordId, status: ApplicationStatus) -> Application {
    Application {
        id,
        listing_id: 1,
        property_title: Some("Listing 1".to_string()),
        property_location: Some("Lekki, Lagos".to_string()),
        applicant_name: format!("Applicant {id}"),
        applicant_email: Some(format!("applicant{id}@mail.test")),
        applicant_phone: None,
        monthly_income: Some(450_000.0),
        employment_status: Some("employed".to_string()),
        move_in_date: None,
        lease_duration: Some(12),
        additional_notes: None,
        status,
        created_at: None,
    }
}

pub fn booking(id: RecordId, status: BookingStatus) -> Booking {
    Booking {
        id,
        listing_id: 1,
        property_title: Some("Listing 1".to_string()),
        property_location: Some("Lekki, Lagos".to_string()),
        viewer_name: format!("Viewer {id}"),
        viewer_email: Some(format!("viewer{id}@mail.test")),
        viewer_phone: None,
        viewing_date: None,
        viewing_time: Some("10:00".to_string()),
        alternative_date: None,
        alternative_time: None,
        special_requirements: None,
        status,
        created_at: None,
    }
}
