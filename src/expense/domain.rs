use std::fmt::Display;

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{budget_month::BudgetMonthId, category::CategoryId, recurring_expense::RecurringExpenseId};

/// The longest allowed expense name, in characters.
pub const EXPENSE_NAME_MAX_LENGTH: usize = 70;

/// The database ID of an expense.
pub type ExpenseId = i64;

/// How an expense came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseOrigin {
    /// Entered by the user.
    Manual,
    /// Copied from a recurring expense.
    Recurring,
}

impl ExpenseOrigin {
    fn as_str(&self) -> &'static str {
        match self {
            ExpenseOrigin::Manual => "manual",
            ExpenseOrigin::Recurring => "recurring",
        }
    }
}

impl Display for ExpenseOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for ExpenseOrigin {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ExpenseOrigin {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "manual" => Ok(ExpenseOrigin::Manual),
            "recurring" => Ok(ExpenseOrigin::Recurring),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// A single expense in a budget month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub month_id: BudgetMonthId,
    pub category_id: CategoryId,
    pub name: String,
    pub amount_cents: i64,
    pub origin: ExpenseOrigin,
    pub is_paid: bool,
    /// The recurring expense this expense was copied from, if any.
    ///
    /// Only kept for reference, it is cleared when the recurring expense is deleted.
    pub recurring_expense_id: Option<RecurringExpenseId>,
}

/// The data for a new expense. The name and amount are expected to be validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub month_id: BudgetMonthId,
    pub category_id: CategoryId,
    pub name: String,
    pub amount_cents: i64,
    pub origin: ExpenseOrigin,
    pub is_paid: bool,
    pub recurring_expense_id: Option<RecurringExpenseId>,
}

/// Changes to an expense, `None` leaves a field unchanged.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExpenseUpdate {
    pub name: Option<String>,
    pub amount_cents: Option<i64>,
    pub category_id: Option<CategoryId>,
    pub is_paid: Option<bool>,
}
