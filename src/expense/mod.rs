//! Expenses recorded against a budget month.

mod db;
mod domain;
mod endpoints;

pub use db::{
    create_expense, create_expense_table, delete_expense, get_expense, get_expenses_for_month,
    update_expense,
};
pub use domain::{
    EXPENSE_NAME_MAX_LENGTH, Expense, ExpenseId, ExpenseOrigin, ExpenseUpdate, NewExpense,
};
pub use endpoints::{
    create_expense_endpoint, delete_expense_endpoint, list_month_expenses_endpoint,
    update_expense_endpoint,
};
