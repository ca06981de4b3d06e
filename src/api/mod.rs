pub mod http;
pub mod storage;
pub mod traits;
pub mod types;

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

pub use http::HttpApi;
pub use storage::StorageClient;
pub use traits::{AgentApi, ApiResult, ListingsApi, ReelStorage};
pub use types::{ListingQuery, PromotionResponse, ReelUpload, SearchParams, SortKey};
