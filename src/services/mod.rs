//! Service layer
//!
//! Reusable check logic over the resolved configuration:
//! - Log metric matching against build logs
//! - Poll-until-ready waiting and list-count verification
//! - Configuration schema documentation

pub mod config_docs;
pub mod metric_matcher;
pub mod poller;
pub mod verification;

pub use config_docs::render_markdown;
pub use metric_matcher::{MetricMatcher, MetricResult};
pub use poller::{wait_until, wait_until_async, PollReport, PollSchedule, DEFAULT_POLL_INTERVAL};
pub use verification::{wait_for_count, wait_for_count_async, Listing};
