pub mod agent;
pub mod application;
pub mod booking;
pub mod wire;


use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use agent::AgentProfile;
pub use application::{Application, ApplicationStatus};
pub use booking::{Booking, BookingStatus};

/// Server-side primary key
pub type RecordId = i64;

/// Who is browsing. Agents get no reel strip; users get personalised reels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Viewer {
    #[default]
    Anonymous,
    User(RecordId),
    Agent(RecordId),
}

impl Viewer {
    pub fn id(self) -> Option<RecordId> {
        match self {
            Self::Anonymous => None,
            Self::User(id) | Self::Agent(id) => Some(id),
        }
    }

    pub fn is_agent(self) -> bool {
        matches!(self, Self::Agent(_))
    }
}

/// Location information for a listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Location {
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl Location {
    /// "Area, City, State" with missing parts skipped
    pub fn label(&self) -> String {
        [self.area.as_deref(), self.city.as_deref(), self.state.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Promotion fields as the server reports them
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Promotion {
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub is_promoted: bool,
    #[serde(default, deserialize_with = "wire::timestamp")]
    pub promoted_until: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "wire::timestamp")]
    pub paused_at: Option<DateTime<Utc>>,
    /// Fractional days left when the promotion was paused
    #[serde(default)]
    pub remaining_days: Option<f64>,
}

/// Outcome of a promote/pause/resume call, merged into the listing.
///
/// The server answers with only the fields it changed, so each variant
/// touches exactly those and leaves the rest of [`Promotion`] alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PromotionChange {
    Promoted {
        until: Option<DateTime<Utc>>,
    },
    Paused {
        at: DateTime<Utc>,
        remaining_days: Option<f64>,
    },
    Resumed {
        until: Option<DateTime<Utc>>,
    },
}

/// Read-only view of the promotion fields, for badges and button labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionStatus {
    NotPromoted,
    Active,
    Paused,
    Expired,
}

/// A value the server sends either as a number or as preformatted text,
/// such as `price_display` ("250000-400000") or `bed_display` ("2-4")
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Figure {
    Number(f64),
    Text(String),
}

impl Figure {
    fn amount_label(&self) -> String {
        match self {
            Self::Number(n) => format_amount(n.round() as i64),
            Self::Text(text) => text.clone(),
        }
    }

    fn count_label(&self) -> String {
        match self {
            Self::Number(n) => format_count(*n),
            Self::Text(text) => text.clone(),
        }
    }
}

/// One unit type inside a complex listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Unit {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bedrooms: Option<f64>,
    #[serde(default)]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub sqft: Option<f64>,
    #[serde(default)]
    pub price_min: Option<f64>,
    #[serde(default)]
    pub price_max: Option<f64>,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub is_available: bool,
}

/// Core listing view model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    #[serde(deserialize_with = "wire::record_id")]
    pub id: RecordId,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub price_display: Option<Figure>,
    /// "complex" for multi-unit listings
    #[serde(default)]
    pub listing_type: Option<String>,
    #[serde(default)]
    pub rent_period: Option<String>,
    #[serde(flatten)]
    pub location: Location,
    #[serde(default)]
    pub bedrooms: Option<f64>,
    #[serde(default)]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub bed_display: Option<Figure>,
    #[serde(default)]
    pub bath_display: Option<Figure>,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub image_paths: Vec<String>,
    #[serde(default)]
    pub video_path: Option<String>,
    /// Reel video URLs in display order
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub reels: Vec<String>,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub units: Vec<Unit>,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub views: u64,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub is_favorite: bool,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "wire::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub promotion: Promotion,
}

impl Listing {
    pub fn is_complex(&self) -> bool {
        self.listing_type.as_deref() == Some("complex")
    }

    /// Complex listings show their display price or the span of unit prices
    pub fn price_label(&self) -> String {
        if self.is_complex() {
            if let Some(display) = &self.price_display {
                return display.amount_label();
            }
            if let Some((min, max)) = unit_span(&self.units, |u| u.price_min) {
                return if min == max {
                    format_amount(min.round() as i64)
                } else {
                    format!(
                        "{}-{}",
                        format_amount(min.round() as i64),
                        format_amount(max.round() as i64)
                    )
                };
            }
        }
        match self.price {
            Some(price) => format_amount(price.round() as i64),
            None => "Price on request".to_string(),
        }
    }

    pub fn bedroom_label(&self) -> String {
        let value = self.count_value(self.bed_display.as_ref(), self.bedrooms, |u| u.bedrooms);
        format!("{value} bd")
    }

    pub fn bathroom_label(&self) -> String {
        let value = self.count_value(self.bath_display.as_ref(), self.bathrooms, |u| u.bathrooms);
        format!("{value} ba")
    }

    fn count_value<F>(&self, display: Option<&Figure>, single: Option<f64>, per_unit: F) -> String
    where
        F: Fn(&Unit) -> Option<f64>,
    {
        if let Some(display) = display {
            return display.count_label();
        }
        if self.is_complex() {
            if let Some((min, max)) = unit_span(&self.units, per_unit) {
                return span_label(min, max);
            }
        }
        match single.filter(|n| *n > 0.0) {
            Some(n) => format_count(n),
            None => "N/A".to_string(),
        }
    }

    pub fn promotion_status(&self, now: DateTime<Utc>) -> PromotionStatus {
        let promotion = &self.promotion;
        if promotion.is_promoted {
            return match promotion.promoted_until {
                Some(until) if until <= now => PromotionStatus::Expired,
                _ => PromotionStatus::Active,
            };
        }
        let has_days_left = promotion.remaining_days.is_some_and(|days| days > 0.0);
        if has_days_left || promotion.paused_at.is_some() {
            PromotionStatus::Paused
        } else {
            PromotionStatus::NotPromoted
        }
    }

    pub fn apply_promotion(&mut self, change: PromotionChange) {
        let promotion = &mut self.promotion;
        match change {
            PromotionChange::Promoted { until } => {
                promotion.is_promoted = true;
                promotion.promoted_until = until;
            }
            PromotionChange::Paused { at, remaining_days } => {
                promotion.is_promoted = false;
                promotion.paused_at = Some(at);
                promotion.remaining_days = remaining_days;
            }
            PromotionChange::Resumed { until } => {
                promotion.is_promoted = true;
                promotion.promoted_until = until;
                promotion.paused_at = None;
                promotion.remaining_days = None;
            }
        }
    }
}

/// Smallest and largest positive value across units
fn unit_span<F>(units: &[Unit], value: F) -> Option<(f64, f64)>
where
    F: Fn(&Unit) -> Option<f64>,
{
    units
        .iter()
        .filter_map(value)
        .filter(|v| *v > 0.0)
        .fold(None, |span, v| match span {
            None => Some((v, v)),
            Some((min, max)) => Some((f64::min(min, v), f64::max(max, v))),
        })
}

fn span_label(min: f64, max: f64) -> String {
    if min == max {
        format_count(min)
    } else {
        format!("{}-{}", format_count(min), format_count(max))
    }
}

/// Whole numbers without a fraction, anything else to one decimal
pub fn format_count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

/// Group digits in threes: 1250000 -> "1,250,000"
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Short video preview attached to a listing, as served by the reel endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reel {
    #[serde(deserialize_with = "wire::record_id")]
    pub listing_id: RecordId,
    #[serde(rename = "video_url")]
    pub url: String,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub title: String,
    /// Preformatted "Area, City, State"
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub bedrooms: Option<f64>,
    #[serde(default)]
    pub listing_type: Option<String>,
    #[serde(default)]
    pub bedroom_range: Option<String>,
}

impl Reel {
    pub fn bedroom_label(&self) -> String {
        let complex = self.listing_type.as_deref() == Some("complex");
        if complex {
            if let Some(range) = self.bedroom_range.as_deref().filter(|r| !r.trim().is_empty()) {
                return format!("{range} bd");
            }
        }
        match self.bedrooms {
            Some(n) => format!("{} bd", format_count(n)),
            None => "N/A bd".to_string(),
        }
    }
}

fn first_page() -> u32 {
    1
}

/// Zero or missing page numbers read as 1
fn at_least_one<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(1).max(1))
}

/// Pagination metadata, sent as top-level keys next to `listings`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    #[serde(rename = "page", default = "first_page", deserialize_with = "at_least_one")]
    pub current: u32,
    #[serde(rename = "total_pages", default = "first_page", deserialize_with = "at_least_one")]
    pub total: u32,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub has_prev: bool,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub has_next: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current: 1,
            total: 1,
            has_prev: false,
            has_next: false,
        }
    }
}

/// One page of listings. The search endpoint sends no paging keys, which
/// decodes as a single page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListingPage {
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub listings: Vec<Listing>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

/// Records that can be patched in a local collection by identifier
pub trait Identified {
    fn id(&self) -> RecordId;
}

impl Identified for Listing {
    fn id(&self) -> RecordId {
        self.id
    }
}
