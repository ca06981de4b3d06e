use thiserror::Error;

use crate::models::RecordId;

/// Failure talking to the remote listings/agent API or the reel storage
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned status {status}{}", detail(.message))]
    Status {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 2xx response whose body reports `success: false`
    #[error("{endpoint} reported failure")]
    Rejected { endpoint: String },
}

fn detail(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(": {message}"),
        None => String::new(),
    }
}

impl ApiError {
    pub fn status(endpoint: impl Into<String>, status: u16) -> Self {
        Self::Status {
            endpoint: endpoint.into(),
            status,
            message: None,
        }
    }
}

/// Client-side checks that short-circuit before any request is sent
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("reel file is {size} bytes, the limit is {limit} bytes")]
    ReelTooLarge { size: usize, limit: usize },
    #[error("reel file is empty")]
    EmptyReel,
    #[error("promotion duration of {days} days is outside {min}..={max}")]
    PromotionDuration { days: i64, min: u32, max: u32 },
    #[error("{input:?} is not a number of days")]
    PromotionDays { input: String },
    #[error("record {id} is no longer pending")]
    NotPending { id: RecordId },
    #[error("{status} is not a final status")]
    NotTerminal { status: String },
}

/// Error surfaced to the user by a dashboard action
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no {kind} with id {id} on the dashboard")]
    UnknownRecord { kind: &'static str, id: RecordId },
    #[error("reel storage is not configured")]
    StorageUnavailable,
}
