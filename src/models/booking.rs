use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{wire, Identified, RecordId};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn is_pending(self) -> bool {
        self == Self::Pending
    }

    pub fn is_terminal(self) -> bool {
        !self.is_pending()
    }

    pub fn available_actions(self) -> &'static [BookingStatus] {
        match self {
            Self::Pending => &[Self::Confirmed, Self::Cancelled],
            Self::Confirmed | Self::Cancelled => &[],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Viewing request for a listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    #[serde(rename = "booking_id", deserialize_with = "wire::record_id")]
    pub id: RecordId,
    #[serde(deserialize_with = "wire::record_id")]
    pub listing_id: RecordId,
    #[serde(default)]
    pub property_title: Option<String>,
    #[serde(default)]
    pub property_location: Option<String>,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub viewer_name: String,
    #[serde(default)]
    pub viewer_email: Option<String>,
    #[serde(default)]
    pub viewer_phone: Option<String>,
    #[serde(default, deserialize_with = "wire::timestamp")]
    pub viewing_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub viewing_time: Option<String>,
    #[serde(default, deserialize_with = "wire::timestamp")]
    pub alternative_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub alternative_time: Option<String>,
    #[serde(default)]
    pub special_requirements: Option<String>,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default, deserialize_with = "wire::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Alternative slot, if the viewer offered a complete one
    pub fn alternative_slot(&self) -> Option<(DateTime<Utc>, &str)> {
        match (self.alternative_date, self.alternative_time.as_deref()) {
            (Some(date), Some(time)) if !time.trim().is_empty() => Some((date, time)),
            _ => None,
        }
    }
}

impl Identified for Booking {
    fn id(&self) -> RecordId {
        self.id
    }
}
