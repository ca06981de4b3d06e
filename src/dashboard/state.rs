use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tracing::{debug, info, warn};

use crate::api::{AgentApi, PromotionResponse, ReelStorage, ReelUpload};
use crate::config::DEFAULT_MAX_REEL_UPLOAD_BYTES;
use crate::dashboard::reconcile::{find_by_id, patch_in_place};
use crate::error::{ApiError, DashboardError, ValidationError};
use crate::models::{
    AgentProfile, Application, ApplicationStatus, Booking, BookingStatus, Identified, Listing,
    PromotionChange, RecordId,
};

pub const MIN_PROMOTION_DAYS: u32 = 1;
pub const MAX_PROMOTION_DAYS: u32 = 365;
pub const DEFAULT_PROMOTION_DAYS: u32 = 7;

/// Read the promotion length typed by the agent. Blank input means the default.
pub fn parse_promotion_days(input: &str) -> Result<u32, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(DEFAULT_PROMOTION_DAYS);
    }
    let days: i64 = input.parse().map_err(|_| ValidationError::PromotionDays {
        input: input.to_string(),
    })?;
    check_promotion_days(days)
}

fn check_promotion_days(days: i64) -> Result<u32, ValidationError> {
    match u32::try_from(days) {
        Ok(days) if (MIN_PROMOTION_DAYS..=MAX_PROMOTION_DAYS).contains(&days) => Ok(days),
        _ => Err(ValidationError::PromotionDuration {
            days,
            min: MIN_PROMOTION_DAYS,
            max: MAX_PROMOTION_DAYS,
        }),
    }
}

/// One independently loaded dashboard collection
#[derive(Debug, Clone)]
pub struct Section<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<T> Section<T> {
    fn start(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// A failed load leaves an empty section with the error recorded
    fn finish(&mut self, kind: &str, result: Result<Vec<T>, ApiError>) {
        self.loading = false;
        match result {
            Ok(items) => {
                debug!("Loaded {} {}", items.len(), kind);
                self.items = items;
            }
            Err(e) => {
                warn!("Could not load {}: {}", kind, e);
                self.items.clear();
                self.error = Some(e.to_string());
            }
        }
    }
}

/// Part of the dashboard that finished loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Profile,
    Listings,
    Applications,
    Bookings,
}

/// Counts shown in the dashboard header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_listings: usize,
    pub total_views: u64,
    pub total_reels: usize,
    pub total_applications: usize,
    pub total_bookings: usize,
    pub pending_applications: usize,
    pub pending_bookings: usize,
}

impl DashboardSummary {
    pub fn from_collections(
        listings: &[Listing],
        applications: &[Application],
        bookings: &[Booking],
    ) -> Self {
        Self {
            total_listings: listings.len(),
            total_views: listings.iter().map(|l| l.views).sum(),
            total_reels: listings.iter().map(|l| l.reels.len()).sum(),
            total_applications: applications.len(),
            total_bookings: bookings.len(),
            pending_applications: applications.iter().filter(|a| a.status.is_pending()).count(),
            pending_bookings: bookings.iter().filter(|b| b.status.is_pending()).count(),
        }
    }
}

/// Agent dashboard: the profile and three collections loaded side by side,
/// plus the mutations an agent can run on them.
///
/// Every mutation validates locally first, then calls the API, and only on
/// success patches the one affected record. On failure the collections stay
/// as they were and the error is returned (and kept in `last_error`).
pub struct Dashboard<A: AgentApi + ?Sized> {
    api: Arc<A>,
    storage: Option<Arc<dyn ReelStorage>>,
    agent_id: RecordId,
    profile: Option<AgentProfile>,
    listings: Section<Listing>,
    applications: Section<Application>,
    bookings: Section<Booking>,
    max_reel_upload_bytes: usize,
    last_error: Option<String>,
}

impl<A: AgentApi + ?Sized> Dashboard<A> {
    pub fn new(api: Arc<A>, agent_id: RecordId) -> Self {
        Self {
            api,
            storage: None,
            agent_id,
            profile: None,
            listings: Section::default(),
            applications: Section::default(),
            bookings: Section::default(),
            max_reel_upload_bytes: DEFAULT_MAX_REEL_UPLOAD_BYTES,
            last_error: None,
        }
    }

    /// Bucket that reel files go to before they are attached to a listing
    pub fn with_storage(mut self, storage: Arc<dyn ReelStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn with_max_reel_upload_bytes(mut self, limit: usize) -> Self {
        self.max_reel_upload_bytes = limit;
        self
    }

    pub fn agent_id(&self) -> RecordId {
        self.agent_id
    }

    pub fn profile(&self) -> Option<&AgentProfile> {
        self.profile.as_ref()
    }

    pub fn listings(&self) -> &Section<Listing> {
        &self.listings
    }

    pub fn applications(&self) -> &Section<Application> {
        &self.applications
    }

    pub fn bookings(&self) -> &Section<Booking> {
        &self.bookings
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary::from_collections(
            &self.listings.items,
            &self.applications.items,
            &self.bookings.items,
        )
    }

    // =========================================================================
    // LOADING
    // =========================================================================

    pub async fn load_profile(&mut self) -> bool {
        let result = self.api.fetch_profile().await;
        self.set_profile(result)
    }

    fn set_profile(&mut self, result: Result<AgentProfile, ApiError>) -> bool {
        match result {
            Ok(profile) => {
                debug!("Loaded profile for {}", profile.name);
                self.profile = Some(profile);
                true
            }
            Err(e) => {
                warn!("Could not load agent profile: {}", e);
                false
            }
        }
    }

    pub async fn load_listings(&mut self) {
        self.listings.start();
        let result = self.api.fetch_agent_listings(self.agent_id).await;
        self.listings.finish("listings", result);
    }

    pub async fn load_applications(&mut self) {
        self.applications.start();
        let result = self.api.fetch_agent_applications(self.agent_id).await;
        self.applications.finish("applications", result);
    }

    pub async fn load_bookings(&mut self) {
        self.bookings.start();
        let result = self.api.fetch_agent_bookings(self.agent_id).await;
        self.bookings.finish("bookings", result);
    }

    /// Fetch the profile and all three collections concurrently
    pub async fn load_all(&mut self) {
        self.load_all_with(|_, _| {}).await;
    }

    /// Like [`load_all`](Self::load_all), but each part is applied the moment
    /// its request resolves and `on_section` sees the dashboard right after.
    /// A slow or failing part never holds back the others.
    pub async fn load_all_with<F>(&mut self, mut on_section: F)
    where
        F: FnMut(SectionKind, &Self),
    {
        self.listings.start();
        self.applications.start();
        self.bookings.start();

        let api = Arc::clone(&self.api);
        let agent_id = self.agent_id;
        let profile = api.fetch_profile();
        let listings = api.fetch_agent_listings(agent_id);
        let applications = api.fetch_agent_applications(agent_id);
        let bookings = api.fetch_agent_bookings(agent_id);
        tokio::pin!(profile, listings, applications, bookings);

        let mut profile_done = false;
        let mut listings_done = false;
        let mut applications_done = false;
        let mut bookings_done = false;

        while !(profile_done && listings_done && applications_done && bookings_done) {
            let kind = tokio::select! {
                result = &mut profile, if !profile_done => {
                    profile_done = true;
                    self.set_profile(result);
                    SectionKind::Profile
                }
                result = &mut listings, if !listings_done => {
                    listings_done = true;
                    self.listings.finish("listings", result);
                    SectionKind::Listings
                }
                result = &mut applications, if !applications_done => {
                    applications_done = true;
                    self.applications.finish("applications", result);
                    SectionKind::Applications
                }
                result = &mut bookings, if !bookings_done => {
                    bookings_done = true;
                    self.bookings.finish("bookings", result);
                    SectionKind::Bookings
                }
            };
            on_section(kind, self);
        }

        let summary = self.summary();
        info!(
            "Dashboard for agent {}: {} listings, {} applications, {} bookings",
            self.agent_id, summary.total_listings, summary.total_applications, summary.total_bookings
        );
    }

    // =========================================================================
    // APPLICATIONS & BOOKINGS
    // =========================================================================

    pub async fn approve_application(&mut self, id: RecordId) -> Result<(), DashboardError> {
        self.update_application_status(id, ApplicationStatus::Approved).await
    }

    pub async fn reject_application(&mut self, id: RecordId) -> Result<(), DashboardError> {
        self.update_application_status(id, ApplicationStatus::Rejected).await
    }

    pub async fn update_application_status(
        &mut self,
        id: RecordId,
        status: ApplicationStatus,
    ) -> Result<(), DashboardError> {
        let result = self.send_application_status(id, status).await;
        self.settle("update application", result)?;

        patch_in_place(&mut self.applications.items, id, |a| a.status = status);
        info!("Application {} is now {}", id, status);
        Ok(())
    }

    async fn send_application_status(
        &self,
        id: RecordId,
        status: ApplicationStatus,
    ) -> Result<(), DashboardError> {
        if !status.is_terminal() {
            return Err(ValidationError::NotTerminal {
                status: status.to_string(),
            }
            .into());
        }
        pending_record(&self.applications.items, "application", id, |a| a.status.is_pending())?;
        self.api.update_application_status(id, status).await?;
        Ok(())
    }

    pub async fn confirm_booking(&mut self, id: RecordId) -> Result<(), DashboardError> {
        self.update_booking_status(id, BookingStatus::Confirmed).await
    }

    pub async fn cancel_booking(&mut self, id: RecordId) -> Result<(), DashboardError> {
        self.update_booking_status(id, BookingStatus::Cancelled).await
    }

    pub async fn update_booking_status(
        &mut self,
        id: RecordId,
        status: BookingStatus,
    ) -> Result<(), DashboardError> {
        let result = self.send_booking_status(id, status).await;
        self.settle("update booking", result)?;

        patch_in_place(&mut self.bookings.items, id, |b| b.status = status);
        info!("Booking {} is now {}", id, status);
        Ok(())
    }

    async fn send_booking_status(&self, id: RecordId, status: BookingStatus) -> Result<(), DashboardError> {
        if !status.is_terminal() {
            return Err(ValidationError::NotTerminal {
                status: status.to_string(),
            }
            .into());
        }
        pending_record(&self.bookings.items, "booking", id, |b| b.status.is_pending())?;
        self.api.update_booking_status(id, status).await?;
        Ok(())
    }

    // =========================================================================
    // PROMOTION
    // =========================================================================

    pub async fn promote_listing(&mut self, id: RecordId, days: u32) -> Result<(), DashboardError> {
        self.promote_listing_at(id, days, Utc::now()).await
    }

    /// Promote until `now + days`. The server's answer only carries the end
    /// date, so the rest of the promotion state is merged locally.
    pub async fn promote_listing_at(
        &mut self,
        id: RecordId,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<(), DashboardError> {
        let result = self.send_promotion(id, days, now).await;
        let (until, response) = self.settle("promote listing", result)?;

        let change = PromotionChange::Promoted {
            until: response.promoted_until.or(Some(until)),
        };
        patch_in_place(&mut self.listings.items, id, |l| l.apply_promotion(change));
        info!("Listing {} promoted for {} days", id, days);
        Ok(())
    }

    async fn send_promotion(
        &self,
        id: RecordId,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<(DateTime<Utc>, PromotionResponse), DashboardError> {
        let days = check_promotion_days(i64::from(days))?;
        known_listing(&self.listings.items, id)?;
        let until = now + ChronoDuration::days(i64::from(days));
        let response = self.api.promote_listing(id, until).await?;
        Ok((until, response))
    }

    pub async fn pause_promotion(&mut self, id: RecordId) -> Result<(), DashboardError> {
        let result = self.send_pause(id).await;
        let response = self.settle("pause promotion", result)?;

        let change = PromotionChange::Paused {
            at: Utc::now(),
            remaining_days: response.remaining_days,
        };
        patch_in_place(&mut self.listings.items, id, |l| l.apply_promotion(change));
        info!("Promotion of listing {} paused", id);
        Ok(())
    }

    pub async fn resume_promotion(&mut self, id: RecordId) -> Result<(), DashboardError> {
        let result = self.send_resume(id).await;
        let response = self.settle("resume promotion", result)?;

        let change = PromotionChange::Resumed {
            until: response.promoted_until,
        };
        patch_in_place(&mut self.listings.items, id, |l| l.apply_promotion(change));
        info!("Promotion of listing {} resumed", id);
        Ok(())
    }

    async fn send_pause(&self, id: RecordId) -> Result<PromotionResponse, DashboardError> {
        known_listing(&self.listings.items, id)?;
        Ok(self.api.pause_promotion(id).await?)
    }

    async fn send_resume(&self, id: RecordId) -> Result<PromotionResponse, DashboardError> {
        known_listing(&self.listings.items, id)?;
        Ok(self.api.resume_promotion(id).await?)
    }

    // =========================================================================
    // REELS
    // =========================================================================

    /// Store the file, attach its URL to the listing and show it.
    /// Oversized or empty files are refused before any request.
    pub async fn upload_reel(
        &mut self,
        listing_id: RecordId,
        upload: ReelUpload,
    ) -> Result<String, DashboardError> {
        let result = self.send_reel(listing_id, &upload).await;
        let url = self.settle("upload reel", result)?;

        patch_in_place(&mut self.listings.items, listing_id, |l| l.reels.push(url.clone()));
        info!("Reel added to listing {}", listing_id);
        Ok(url)
    }

    async fn send_reel(&self, listing_id: RecordId, upload: &ReelUpload) -> Result<String, DashboardError> {
        check_reel_size(upload.size(), self.max_reel_upload_bytes)?;
        known_listing(&self.listings.items, listing_id)?;
        let storage = self.storage.as_ref().ok_or(DashboardError::StorageUnavailable)?;

        let url = storage.store_reel(upload).await?;
        self.api.attach_reel(listing_id, &url).await?;
        Ok(url)
    }

    /// Remove the stored file, then detach the URL from the listing
    pub async fn delete_reel(&mut self, listing_id: RecordId, reel_url: &str) -> Result<(), DashboardError> {
        let result = self.send_reel_delete(listing_id, reel_url).await;
        self.settle("delete reel", result)?;

        patch_in_place(&mut self.listings.items, listing_id, |l| {
            l.reels.retain(|url| url != reel_url)
        });
        info!("Reel removed from listing {}", listing_id);
        Ok(())
    }

    async fn send_reel_delete(&self, listing_id: RecordId, reel_url: &str) -> Result<(), DashboardError> {
        known_listing(&self.listings.items, listing_id)?;
        let storage = self.storage.as_ref().ok_or(DashboardError::StorageUnavailable)?;

        storage.remove_reel(reel_url).await?;
        self.api.detach_reel(listing_id, reel_url).await?;
        Ok(())
    }

    /// Record the outcome of an action for the user-facing alert
    fn settle<T>(&mut self, action: &str, result: Result<T, DashboardError>) -> Result<T, DashboardError> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Ok(value)
            }
            Err(e) => {
                warn!("Failed to {}: {}", action, e);
                self.last_error = Some(format!("Failed to {action}: {e}"));
                Err(e)
            }
        }
    }
}

pub fn check_reel_size(size: usize, limit: usize) -> Result<(), ValidationError> {
    if size == 0 {
        return Err(ValidationError::EmptyReel);
    }
    if size > limit {
        return Err(ValidationError::ReelTooLarge { size, limit });
    }
    Ok(())
}

fn pending_record<T, F>(items: &[T], kind: &'static str, id: RecordId, is_pending: F) -> Result<(), DashboardError>
where
    T: Identified,
    F: FnOnce(&T) -> bool,
{
    let record = find_by_id(items, id).ok_or(DashboardError::UnknownRecord { kind, id })?;
    if !is_pending(record) {
        return Err(ValidationError::NotPending { id }.into());
    }
    Ok(())
}

fn known_listing(items: &[Listing], id: RecordId) -> Result<(), DashboardError> {
    match find_by_id(items, id) {
        Some(_) => Ok(()),
        None => Err(DashboardError::UnknownRecord { kind: "listing", id }),
    }
}
