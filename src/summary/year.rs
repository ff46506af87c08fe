//! The summary of a calendar year.

use std::collections::HashMap;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error, MonthKey,
    auth::UserID,
    budget_month::{BudgetMonth, get_budget_months_in_year},
    category::{CategoryId, get_all_categories},
    expense::{Expense, get_expenses_for_month},
    money::cents_to_major,
    profile::get_profile,
    summary::aggregation::{ChartEntry, bucket_small_entries, sum_by_key, to_chart_entries},
};

/// The expense total of one month of the year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    /// The English month name, e.g. "March".
    pub month: String,
    /// 1 for January through 12 for December.
    pub month_number: u8,
    /// Whether the user has a budget month for this month.
    pub has_data: bool,
    pub total_expenses: f64,
}

/// Totals and chart data for a year, in major currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    pub year: i32,
    /// The year of the profile's first tracked month.
    pub first_tracked_year: i32,
    pub total_expenses: f64,
    pub total_savings: f64,
    /// The year's expenses, largest first, with small ones merged into "Other".
    pub expense_data: Vec<ChartEntry>,
    /// Expenses summed per category name, largest first, with small ones merged into "Other".
    pub category_data: Vec<ChartEntry>,
    /// Always twelve entries, January first.
    pub monthly_data: Vec<MonthlyTotal>,
}

/// Summarize a year from its budget months and their expenses.
///
/// `months` must be in calendar order with each month's expenses in creation order.
/// Expenses with the same name in different months are separate entries in
/// `expense_data`.
pub fn summarize_year(
    year: i32,
    first_tracked_year: i32,
    months: &[(BudgetMonth, Vec<Expense>)],
    category_names: &HashMap<CategoryId, String>,
) -> Result<YearSummary, Error> {
    let expenses: Vec<&Expense> = months
        .iter()
        .flat_map(|(_, expenses)| expenses.iter())
        .collect();

    let total_cents: i64 = expenses.iter().map(|expense| expense.amount_cents).sum();
    let savings_cents: i64 = months
        .iter()
        .map(|(budget_month, _)| budget_month.savings_cents)
        .sum();

    let expense_data = expenses
        .iter()
        .map(|expense| (expense.name.clone(), expense.amount_cents))
        .collect();

    let category_data = sum_by_key(expenses.iter().map(|expense| {
        let name = category_names
            .get(&expense.category_id)
            .cloned()
            .unwrap_or_default();
        (name.clone(), name, expense.amount_cents)
    }));

    let totals_by_month: HashMap<MonthKey, i64> = months
        .iter()
        .map(|(budget_month, expenses)| {
            let total: i64 = expenses.iter().map(|expense| expense.amount_cents).sum();
            (budget_month.month, total)
        })
        .collect();

    let monthly_data = MonthKey::months_of_year(year)?
        .into_iter()
        .map(|month| {
            let total = totals_by_month.get(&month);

            MonthlyTotal {
                month: month.month_name().to_owned(),
                month_number: month.month_number(),
                has_data: total.is_some(),
                total_expenses: cents_to_major(total.copied().unwrap_or(0)),
            }
        })
        .collect();

    Ok(YearSummary {
        year,
        first_tracked_year,
        total_expenses: cents_to_major(total_cents),
        total_savings: cents_to_major(savings_cents),
        expense_data: to_chart_entries(bucket_small_entries(expense_data)),
        category_data: to_chart_entries(bucket_small_entries(category_data)),
        monthly_data,
    })
}

/// Load the user's budget months for `year` and summarize them.
///
/// Months that have not been created yet are reported without data, they are
/// not created.
pub fn get_year_summary(
    user_id: UserID,
    year: i32,
    connection: &Connection,
) -> Result<YearSummary, Error> {
    let profile = get_profile(user_id, connection)?;
    let category_names = get_all_categories(user_id, connection)?
        .into_iter()
        .map(|category| (category.id, category.name.to_string()))
        .collect();

    let months = get_budget_months_in_year(user_id, year, connection)?
        .into_iter()
        .map(|budget_month| {
            let expenses = get_expenses_for_month(user_id, budget_month.id, connection)?;
            Ok((budget_month, expenses))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    summarize_year(
        year,
        profile.first_tracked_month.year(),
        &months,
        &category_names,
    )
}
