use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::api::traits::{AgentApi, ApiResult, ListingsApi};
use crate::api::types::{
    ApplicationsBody, BookingsBody, ErrorBody, ListingQuery, ListingsBody, PromotionResponse,
    ReelsBody, SearchParams,
};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::models::{
    AgentProfile, Application, ApplicationStatus, Booking, BookingStatus, Listing, ListingPage,
    RecordId, Reel,
};

/// Shared reqwest client for the marketplace REST API
pub(crate) fn build_client(config: &ClientConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.timeout)
        .user_agent(concat!("estate-front/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")
}

/// Send a request and turn transport failures and non-2xx statuses into
/// [`ApiError`], keeping the server's `error` message when it sent one
pub(crate) async fn send(endpoint: &str, request: RequestBuilder) -> ApiResult<reqwest::Response> {
    debug!("Calling {}", endpoint);

    let response = request.send().await.map_err(|source| {
        warn!("Request to {} failed: {}", endpoint, source);
        ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let message = response.json::<ErrorBody>().await.ok().and_then(|body| body.error);
        warn!("{} returned status: {} {:?}", endpoint, status, message);
        return Err(ApiError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message,
        });
    }

    Ok(response)
}

pub(crate) async fn send_json<T: DeserializeOwned>(
    endpoint: &str,
    request: RequestBuilder,
) -> ApiResult<T> {
    let response = send(endpoint, request).await?;
    response.json::<T>().await.map_err(|source| {
        warn!("Could not decode {} response: {}", endpoint, source);
        ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        }
    })
}

/// reqwest-backed client for the marketplace REST API
pub struct HttpApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    /// Swap the bearer token after the auth service signs a user in or out
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl ListingsApi for HttpApi {
    async fn fetch_listings(&self, query: &ListingQuery) -> ApiResult<ListingPage> {
        let request = self
            .request(Method::GET, "/featured-properties")
            .query(&query.to_query_pairs());
        let page: ListingPage = send_json("/featured-properties", request).await?;
        info!(
            "Fetched {} listings (page {}/{})",
            page.listings.len(),
            page.pagination.current,
            page.pagination.total
        );
        Ok(page)
    }

    async fn search_listings(&self, params: &SearchParams) -> ApiResult<ListingPage> {
        let request = self
            .request(Method::GET, "/search-properties")
            .query(&params.to_query_pairs());
        let page: ListingPage = send_json("/search-properties", request).await?;
        info!("Search returned {} listings", page.listings.len());
        Ok(page)
    }

    async fn fetch_reels(&self) -> ApiResult<Vec<Reel>> {
        let body: ReelsBody = send_json("/user-reels", self.request(Method::GET, "/user-reels")).await?;
        Ok(body.reels)
    }

    async fn fetch_personalized_reels(&self, user_id: RecordId) -> ApiResult<Vec<Reel>> {
        let request = self
            .request(Method::GET, "/personalized-reels")
            .query(&[("user_id", user_id)]);
        let body: ReelsBody = send_json("/personalized-reels", request).await?;
        Ok(body.reels)
    }
}

#[async_trait]
impl AgentApi for HttpApi {
    async fn fetch_profile(&self) -> ApiResult<AgentProfile> {
        send_json("/agent/profile", self.request(Method::GET, "/agent/profile")).await
    }

    async fn fetch_agent_listings(&self, agent_id: RecordId) -> ApiResult<Vec<Listing>> {
        let path = format!("/agent/{agent_id}/listings");
        let body: ListingsBody = send_json(&path, self.request(Method::GET, &path)).await?;
        Ok(body.listings)
    }

    async fn fetch_agent_applications(&self, agent_id: RecordId) -> ApiResult<Vec<Application>> {
        let path = format!("/agent/{agent_id}/applications");
        let body: ApplicationsBody = send_json(&path, self.request(Method::GET, &path)).await?;
        if !body.success {
            return Err(ApiError::Rejected { endpoint: path });
        }
        Ok(body.applications)
    }

    async fn fetch_agent_bookings(&self, agent_id: RecordId) -> ApiResult<Vec<Booking>> {
        let path = format!("/agent/{agent_id}/bookings");
        let body: BookingsBody = send_json(&path, self.request(Method::GET, &path)).await?;
        if !body.success {
            return Err(ApiError::Rejected { endpoint: path });
        }
        Ok(body.bookings)
    }

    async fn update_application_status(
        &self,
        application_id: RecordId,
        status: ApplicationStatus,
    ) -> ApiResult<()> {
        let path = format!("/agent/application/{application_id}/status");
        let request = self
            .request(Method::PUT, &path)
            .json(&json!({ "status": status }));
        send(&path, request).await?;
        info!("Application {} marked {}", application_id, status);
        Ok(())
    }

    async fn update_booking_status(&self, booking_id: RecordId, status: BookingStatus) -> ApiResult<()> {
        let path = format!("/agent/booking/{booking_id}/status");
        let request = self
            .request(Method::PUT, &path)
            .json(&json!({ "status": status }));
        send(&path, request).await?;
        info!("Booking {} marked {}", booking_id, status);
        Ok(())
    }

    async fn promote_listing(
        &self,
        listing_id: RecordId,
        promoted_until: DateTime<Utc>,
    ) -> ApiResult<PromotionResponse> {
        let path = format!("/listing/{listing_id}/promote");
        let request = self
            .request(Method::POST, &path)
            .json(&json!({ "promoted_until": promoted_until.to_rfc3339() }));
        send_json(&path, request).await
    }

    async fn pause_promotion(&self, listing_id: RecordId) -> ApiResult<PromotionResponse> {
        let path = format!("/listing/{listing_id}/pause-promotion");
        send_json(&path, self.request(Method::POST, &path)).await
    }

    async fn resume_promotion(&self, listing_id: RecordId) -> ApiResult<PromotionResponse> {
        let path = format!("/listing/{listing_id}/resume-promotion");
        send_json(&path, self.request(Method::POST, &path)).await
    }

    async fn attach_reel(&self, listing_id: RecordId, reel_url: &str) -> ApiResult<()> {
        let request = self
            .request(Method::POST, "/upload-reel")
            .json(&json!({ "reel_url": reel_url, "listing_id": listing_id }));
        send("/upload-reel", request).await?;
        info!("Attached reel to listing {}", listing_id);
        Ok(())
    }

    async fn detach_reel(&self, listing_id: RecordId, reel_url: &str) -> ApiResult<()> {
        let request = self
            .request(Method::DELETE, "/delete-reel")
            .json(&json!({ "reel_url": reel_url, "listing_id": listing_id }));
        send("/delete-reel", request).await?;
        info!("Detached reel from listing {}", listing_id);
        Ok(())
    }
}
