//! Dashboard module
//!
//! Provides an overview page with income and expense totals, charts and the
//! most recent transactions, plus the same totals as JSON.

mod handlers;
mod summary;

pub use handlers::{get_dashboard_page, get_dashboard_summary_endpoint};
pub use summary::{CategoryBreakdown, DashboardSummary, get_dashboard_summary};
