//! Budget months: a user's ledger for one calendar month.
//!
//! Months are created lazily the first time they are requested. Creating a
//! month materializes the user's recurring expenses into it.

mod db;
mod domain;
mod endpoints;
mod resolver;

pub use db::{
    create_budget_month_table, get_budget_month, get_budget_month_by_key,
    get_budget_months_in_year, update_budget_month,
};
pub use domain::{BudgetMonth, BudgetMonthId, BudgetMonthUpdate};
pub use endpoints::{get_month_endpoint, sync_budget_month_endpoint, update_budget_month_endpoint};
pub use resolver::get_or_create_budget_month;
