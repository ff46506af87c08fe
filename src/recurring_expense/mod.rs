//! Recurring expenses: templates that are copied into every month they apply to.

mod db;
mod domain;
mod endpoints;
mod materialize;

pub use db::{
    create_recurring_expense, create_recurring_expense_table, delete_recurring_expense,
    get_active_recurring_expenses, get_recurring_expense, update_recurring_expense,
};
pub use domain::{
    NewRecurringExpense, RECURRING_EXPENSE_NAME_MAX_LENGTH, RecurringExpense, RecurringExpenseId,
    RecurringExpenseUpdate,
};
pub use endpoints::{
    create_recurring_expense_endpoint, delete_recurring_expense_endpoint,
    list_recurring_expenses_endpoint, update_recurring_expense_endpoint,
};
pub use materialize::{
    MaterializationFailure, MaterializationReport, materialize_month, plan_materialization,
};
