use serde::{Deserialize, Serialize};
use time::Date;

use crate::{MonthKey, category::CategoryId, date_format};

/// The longest allowed recurring expense name, in characters.
pub const RECURRING_EXPENSE_NAME_MAX_LENGTH: usize = 255;

/// The database ID of a recurring expense.
pub type RecurringExpenseId = i64;

/// An expense that repeats every month between `starts_on` and `ends_on`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringExpense {
    pub id: RecurringExpenseId,
    pub name: String,
    pub amount_cents: i64,
    pub category_id: CategoryId,
    pub active: bool,
    #[serde(with = "date_format")]
    pub starts_on: Date,
    /// The last day the expense applies to, `None` if it repeats indefinitely.
    #[serde(with = "date_format::option")]
    pub ends_on: Option<Date>,
}

impl RecurringExpense {
    /// Whether the date range overlaps `month`, both ends inclusive.
    ///
    /// This ignores [RecurringExpense::active].
    pub fn applies_to(&self, month: MonthKey) -> bool {
        self.starts_on <= month.last_day()
            && self.ends_on.is_none_or(|ends_on| ends_on >= month.first_day())
    }
}

/// The data for a new recurring expense. New recurring expenses are active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecurringExpense {
    pub name: String,
    pub amount_cents: i64,
    pub category_id: CategoryId,
    pub starts_on: Date,
    pub ends_on: Option<Date>,
}

/// Changes to a recurring expense, `None` leaves a field unchanged.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecurringExpenseUpdate {
    pub name: Option<String>,
    pub amount_cents: Option<i64>,
    pub category_id: Option<CategoryId>,
    pub active: Option<bool>,
    pub starts_on: Option<Date>,
    /// `Some(None)` removes the end date.
    pub ends_on: Option<Option<Date>>,
}
