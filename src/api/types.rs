use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{wire, Application, Booking, Listing, RecordId, Reel};

/// Ordering requested from the search endpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Newest,
    PriceAsc,
    PriceDesc,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
        }
    }
}

/// Filter parameters for the property search form
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchParams {
    /// Free-text city or state
    pub location: Option<String>,
    /// Neighbourhood within the location
    pub area: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    /// Exact number of bedrooms
    pub bedrooms: Option<u32>,
    /// Exact number of bathrooms
    pub bathrooms: Option<u32>,
    pub sort: Option<SortKey>,
    pub tags: Vec<String>,
}

impl SearchParams {
    pub fn by_location(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Self::default()
        }
    }

    /// Query pairs for `/search-properties`, skipping unset and blank filters
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(location) = non_blank(self.location.as_deref()) {
            pairs.push(("search", location.to_string()));
        }
        if let Some(area) = non_blank(self.area.as_deref()) {
            pairs.push(("search_area", area.to_string()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("price_min", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("price_max", max.to_string()));
        }
        if let Some(beds) = self.bedrooms {
            pairs.push(("bedrooms", beds.to_string()));
        }
        if let Some(baths) = self.bathrooms {
            pairs.push(("bathrooms", baths.to_string()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort_by", sort.as_str().to_string()));
        }

        let tags: Vec<&str> = self
            .tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if !tags.is_empty() {
            pairs.push(("tags", tags.join(",")));
        }

        pairs
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// One `/featured-properties` request: page, optional location and viewer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingQuery {
    pub page: u32,
    pub location: Option<String>,
    /// Viewer id, so the server can fill personal flags such as `is_favorite`
    pub user_id: Option<RecordId>,
}

impl ListingQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page: page.max(1),
            ..Self::default()
        }
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.max(1).to_string())];
        if let Some(location) = non_blank(self.location.as_deref()) {
            pairs.push(("location", location.to_string()));
        }
        if let Some(user_id) = self.user_id {
            pairs.push(("user_id", user_id.to_string()));
        }
        pairs
    }
}

/// Video file bound for the reel storage bucket
#[derive(Debug, Clone)]
pub struct ReelUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ReelUpload {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

// =============================================================================
// RESPONSE BODIES
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct ReelsBody {
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub reels: Vec<Reel>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingsBody {
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub listings: Vec<Listing>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplicationsBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub applications: Vec<Application>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BookingsBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub bookings: Vec<Booking>,
}

/// `{ "error": "..." }` carried by non-2xx responses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Answer to promote, pause and resume. Each call fills a different subset.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PromotionResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "wire::timestamp")]
    pub promoted_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub remaining_days: Option<f64>,
}
