use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::api::types::{ListingQuery, PromotionResponse, ReelUpload, SearchParams};
use crate::error::ApiError;
use crate::models::{
    AgentProfile, Application, ApplicationStatus, Booking, BookingStatus, Listing, ListingPage,
    RecordId, Reel,
};

pub type ApiResult<T> = Result<T, ApiError>;

/// Public listing endpoints used by the browse pages
#[async_trait]
pub trait ListingsApi: Send + Sync {
    /// Homepage listing page, optionally narrowed to a city or state
    async fn fetch_listings(&self, query: &ListingQuery) -> ApiResult<ListingPage>;

    /// Filtered search; the server returns one unpaged batch
    async fn search_listings(&self, params: &SearchParams) -> ApiResult<ListingPage>;

    /// Reels picked from recent activity across all users
    async fn fetch_reels(&self) -> ApiResult<Vec<Reel>>;

    /// Reels matched to one user's recent interactions
    async fn fetch_personalized_reels(&self, user_id: RecordId) -> ApiResult<Vec<Reel>>;
}

/// Agent dashboard endpoints
#[async_trait]
pub trait AgentApi: Send + Sync {
    /// Profile of the agent the bearer token belongs to
    async fn fetch_profile(&self) -> ApiResult<AgentProfile>;

    async fn fetch_agent_listings(&self, agent_id: RecordId) -> ApiResult<Vec<Listing>>;

    async fn fetch_agent_applications(&self, agent_id: RecordId) -> ApiResult<Vec<Application>>;

    async fn fetch_agent_bookings(&self, agent_id: RecordId) -> ApiResult<Vec<Booking>>;

    async fn update_application_status(
        &self,
        application_id: RecordId,
        status: ApplicationStatus,
    ) -> ApiResult<()>;

    async fn update_booking_status(&self, booking_id: RecordId, status: BookingStatus) -> ApiResult<()>;

    async fn promote_listing(
        &self,
        listing_id: RecordId,
        promoted_until: DateTime<Utc>,
    ) -> ApiResult<PromotionResponse>;

    async fn pause_promotion(&self, listing_id: RecordId) -> ApiResult<PromotionResponse>;

    async fn resume_promotion(&self, listing_id: RecordId) -> ApiResult<PromotionResponse>;

    /// Record an already stored reel URL against a listing
    async fn attach_reel(&self, listing_id: RecordId, reel_url: &str) -> ApiResult<()>;

    /// Forget a reel URL; the stored file is removed separately
    async fn detach_reel(&self, listing_id: RecordId, reel_url: &str) -> ApiResult<()>;
}

/// Object storage holding reel video files
#[async_trait]
pub trait ReelStorage: Send + Sync {
    /// Store the file and return its public URL
    async fn store_reel(&self, upload: &ReelUpload) -> ApiResult<String>;

    async fn remove_reel(&self, reel_url: &str) -> ApiResult<()>;
}
