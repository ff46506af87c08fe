//! The summary of a single budget month.

use std::collections::HashMap;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error, MonthKey,
    auth::UserID,
    budget_month::{BudgetMonth, BudgetMonthId, get_budget_month},
    category::{CategoryId, get_all_categories},
    expense::{Expense, get_expenses_for_month},
    money::{calculate_percentage, cents_to_major},
    profile::get_profile,
    summary::aggregation::{CentsEntry, ChartEntry, REMAINING_LABEL, sum_by_key, to_chart_entries},
};

/// Totals and chart data for one budget month, in major currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub month_id: BudgetMonthId,
    pub month: MonthKey,
    /// The month's salary override, or the profile's default salary.
    pub salary: f64,
    pub total_expenses: f64,
    pub savings: f64,
    /// Salary minus expenses and savings, negative when overspent.
    pub remaining: f64,
    pub paid_total: f64,
    pub unpaid_total: f64,
    /// Expenses as a percentage of salary.
    pub spent_percentage: f64,
    /// Savings as a percentage of salary.
    pub saved_percentage: f64,
    /// One entry per expense, followed by the remaining salary when positive.
    pub expense_data: Vec<ChartEntry>,
    /// Expenses summed per category, followed by the remaining salary when positive.
    pub category_data: Vec<ChartEntry>,
}

/// Summarize a budget month from its expenses.
///
/// `category_names` maps the category IDs used by `expenses` to their names.
pub fn summarize_month(
    budget_month: &BudgetMonth,
    default_salary_cents: i64,
    expenses: &[Expense],
    category_names: &HashMap<CategoryId, String>,
) -> MonthSummary {
    let salary_cents = budget_month
        .salary_override_cents
        .unwrap_or(default_salary_cents);
    let total_cents: i64 = expenses.iter().map(|expense| expense.amount_cents).sum();
    let paid_cents: i64 = expenses
        .iter()
        .filter(|expense| expense.is_paid)
        .map(|expense| expense.amount_cents)
        .sum();
    let remaining_cents = salary_cents - total_cents - budget_month.savings_cents;

    let mut expense_data: Vec<CentsEntry> = expenses
        .iter()
        .map(|expense| (expense.name.clone(), expense.amount_cents))
        .collect();

    let mut category_data = sum_by_key(expenses.iter().map(|expense| {
        let name = category_names
            .get(&expense.category_id)
            .cloned()
            .unwrap_or_default();
        (expense.category_id, name, expense.amount_cents)
    }));

    if remaining_cents > 0 {
        expense_data.push((REMAINING_LABEL.to_owned(), remaining_cents));
        category_data.push((REMAINING_LABEL.to_owned(), remaining_cents));
    }

    MonthSummary {
        month_id: budget_month.id,
        month: budget_month.month,
        salary: cents_to_major(salary_cents),
        total_expenses: cents_to_major(total_cents),
        savings: cents_to_major(budget_month.savings_cents),
        remaining: cents_to_major(remaining_cents),
        paid_total: cents_to_major(paid_cents),
        unpaid_total: cents_to_major(total_cents - paid_cents),
        spent_percentage: calculate_percentage(total_cents as f64, salary_cents as f64),
        saved_percentage: calculate_percentage(
            budget_month.savings_cents as f64,
            salary_cents as f64,
        ),
        expense_data: to_chart_entries(expense_data),
        category_data: to_chart_entries(category_data),
    }
}

/// Load a budget month with its expenses and summarize it.
///
/// # Errors
///
/// Returns [Error::NotFound] if the month does not belong to `user_id`.
pub fn get_month_summary(
    user_id: UserID,
    month_id: BudgetMonthId,
    connection: &Connection,
) -> Result<MonthSummary, Error> {
    let budget_month = get_budget_month(user_id, month_id, connection)?;
    let profile = get_profile(user_id, connection)?;
    let expenses = get_expenses_for_month(user_id, month_id, connection)?;
    let category_names = get_all_categories(user_id, connection)?
        .into_iter()
        .map(|category| (category.id, category.name.to_string()))
        .collect();

    Ok(summarize_month(
        &budget_month,
        profile.default_salary_cents,
        &expenses,
        &category_names,
    ))
}
