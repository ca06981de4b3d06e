use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{wire, Identified, RecordId};

/// Review state of a rental application
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn is_pending(self) -> bool {
        self == Self::Pending
    }

    pub fn is_terminal(self) -> bool {
        !self.is_pending()
    }

    /// Transitions the dashboard offers; none once a decision was made
    pub fn available_actions(self) -> &'static [ApplicationStatus] {
        match self {
            Self::Pending => &[Self::Approved, Self::Rejected],
            Self::Approved | Self::Rejected => &[],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tenant-submitted rental application, as listed on the agent dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Application {
    #[serde(rename = "application_id", deserialize_with = "wire::record_id")]
    pub id: RecordId,
    #[serde(deserialize_with = "wire::record_id")]
    pub listing_id: RecordId,
    #[serde(default)]
    pub property_title: Option<String>,
    #[serde(default)]
    pub property_location: Option<String>,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub applicant_name: String,
    #[serde(default)]
    pub applicant_email: Option<String>,
    #[serde(default)]
    pub applicant_phone: Option<String>,
    #[serde(default)]
    pub monthly_income: Option<f64>,
    #[serde(default)]
    pub employment_status: Option<String>,
    #[serde(default, deserialize_with = "wire::timestamp")]
    pub move_in_date: Option<DateTime<Utc>>,
    /// Months
    #[serde(default)]
    pub lease_duration: Option<u32>,
    #[serde(default)]
    pub additional_notes: Option<String>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default, deserialize_with = "wire::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for Application {
    fn id(&self) -> RecordId {
        self.id
    }
}
