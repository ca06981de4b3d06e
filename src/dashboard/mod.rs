pub mod reconcile;
pub mod state;


pub use reconcile::{find_by_id, patch_by_id, patch_in_place};
pub use state::{
    parse_promotion_days, Dashboard, DashboardSummary, Section, SectionKind,
    DEFAULT_PROMOTION_DAYS, MAX_PROMOTION_DAYS, MIN_PROMOTION_DAYS,
};
