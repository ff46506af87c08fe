//! Month and year summaries of a user's budget.
//!
//! Amounts are summed as integer cents and converted to major units only
//! when building the response.

mod aggregation;
mod handlers;
mod month;
mod year;

pub use aggregation::{ChartEntry, OTHER_LABEL, OTHER_THRESHOLD_CENTS, REMAINING_LABEL};
pub use handlers::{get_month_summary_endpoint, get_year_summary_endpoint};
pub use month::{MonthSummary, get_month_summary, summarize_month};
pub use year::{MonthlyTotal, YearSummary, get_year_summary, summarize_year};
