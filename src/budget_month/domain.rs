use serde::{Deserialize, Serialize};

use crate::MonthKey;

/// The database ID of a budget month.
pub type BudgetMonthId = i64;

/// A user's ledger for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetMonth {
    pub id: BudgetMonthId,
    pub month: MonthKey,
    /// Replaces the profile's default salary for this month when set.
    pub salary_override_cents: Option<i64>,
    pub savings_cents: i64,
}

/// Changes to a budget month.
///
/// `salary_override_cents` distinguishes "leave unchanged" (`None`) from
/// "clear the override" (`Some(None)`).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BudgetMonthUpdate {
    pub salary_override_cents: Option<Option<i64>>,
    pub savings_cents: Option<i64>,
}
