//! Copies recurring expenses into a budget month.
//!
//! A recurring expense counts as already copied into a month when the month
//! has an expense with the same name, whatever its origin. Copying is
//! therefore idempotent: running it again without edits in between creates
//! nothing.

use std::collections::HashSet;

use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error, MonthKey,
    auth::UserID,
    budget_month::BudgetMonth,
    expense::{Expense, ExpenseOrigin, NewExpense, create_expense, get_expenses_for_month},
    recurring_expense::{RecurringExpense, RecurringExpenseId, get_active_recurring_expenses},
};

/// The outcome of copying recurring expenses into a month.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct MaterializationReport {
    /// The expenses that were created.
    pub created: Vec<Expense>,
    /// The recurring expenses that could not be copied.
    pub failed: Vec<MaterializationFailure>,
}

/// A recurring expense that could not be copied into a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterializationFailure {
    pub recurring_expense_id: RecurringExpenseId,
    pub name: String,
    pub reason: String,
}

/// Select the recurring expenses that should be copied into `month`.
///
/// A recurring expense is selected when it is active, its date range overlaps
/// the month and no expense in `existing` has the same name.
pub fn plan_materialization<'a>(
    month: MonthKey,
    recurring_expenses: &'a [RecurringExpense],
    existing: &[Expense],
) -> Vec<&'a RecurringExpense> {
    let existing_names: HashSet<&str> = existing
        .iter()
        .map(|expense| expense.name.as_str())
        .collect();

    recurring_expenses
        .iter()
        .filter(|recurring| recurring.active && recurring.applies_to(month))
        .filter(|recurring| !existing_names.contains(recurring.name.as_str()))
        .collect()
}

/// Copy the user's applicable recurring expenses into `budget_month`.
///
/// Each copy is inserted on its own. A failed insert is logged and reported
/// without stopping the remaining copies.
///
/// # Errors
///
/// Returns an error only if the recurring expenses or the month's expenses could not be loaded.
pub fn materialize_month(
    user_id: UserID,
    budget_month: &BudgetMonth,
    connection: &Connection,
) -> Result<MaterializationReport, Error> {
    let recurring_expenses = get_active_recurring_expenses(user_id, connection)?;
    let existing = get_expenses_for_month(user_id, budget_month.id, connection)?;

    let mut report = MaterializationReport::default();

    for recurring in plan_materialization(budget_month.month, &recurring_expenses, &existing) {
        let new_expense = NewExpense {
            month_id: budget_month.id,
            category_id: recurring.category_id,
            name: recurring.name.clone(),
            amount_cents: recurring.amount_cents,
            origin: ExpenseOrigin::Recurring,
            is_paid: false,
            recurring_expense_id: Some(recurring.id),
        };

        match create_expense(user_id, new_expense, connection) {
            Ok(expense) => report.created.push(expense),
            Err(error) => {
                tracing::error!(
                    "Could not copy recurring expense {} ({}) into {}: {error}",
                    recurring.id,
                    recurring.name,
                    budget_month.month
                );
                report.failed.push(MaterializationFailure {
                    recurring_expense_id: recurring.id,
                    name: recurring.name.clone(),
                    reason: error.to_string(),
                });
            }
        }
    }

    if !report.created.is_empty() {
        tracing::debug!(
            "Copied {} recurring expenses into {} for user {user_id}",
            report.created.len(),
            budget_month.month
        );
    }

    Ok(report)
}

#[cfg(test)]
mod plan_materialization_tests {
    use time::{Date, macros::date};

    use crate::{
        MonthKey,
        expense::{Expense, ExpenseOrigin},
        recurring_expense::RecurringExpense,
    };

    use super::plan_materialization;

    fn recurring(id: i64, name: &str, starts_on: Date, ends_on: Option<Date>) -> RecurringExpense {
        RecurringExpense {
            id,
            name: name.to_owned(),
            amount_cents: 10_000,
            category_id: 1,
            active: true,
            starts_on,
            ends_on,
        }
    }

    fn existing(name: &str, origin: ExpenseOrigin) -> Expense {
        Expense {
            id: 1,
            month_id: 1,
            category_id: 1,
            name: name.to_owned(),
            amount_cents: 1,
            origin,
            is_paid: true,
            recurring_expense_id: None,
        }
    }

    fn october() -> MonthKey {
        "2025-10".parse().unwrap()
    }

    fn planned_names<'a>(planned: &[&'a RecurringExpense]) -> Vec<&'a str> {
        planned.iter().map(|recurring| recurring.name.as_str()).collect()
    }

    #[test]
    fn selects_applicable_active_templates() {
        let templates = vec![
            recurring(1, "Rent", date!(2025 - 01 - 01), None),
            recurring(2, "Gym", date!(2025 - 01 - 01), Some(date!(2025 - 09 - 30))),
            recurring(3, "Insurance", date!(2025 - 11 - 01), None),
            RecurringExpense {
                active: false,
                ..recurring(4, "Netflix", date!(2025 - 01 - 01), None)
            },
        ];

        let planned = plan_materialization(october(), &templates, &[]);

        assert_eq!(planned_names(&planned), ["Rent"]);
    }

    #[test]
    fn skips_names_already_in_month_regardless_of_origin() {
        let templates = vec![
            recurring(1, "Rent", date!(2025 - 01 - 01), None),
            recurring(2, "Internet", date!(2025 - 01 - 01), None),
            recurring(3, "Phone", date!(2025 - 01 - 01), None),
        ];
        let expenses = vec![
            existing("Rent", ExpenseOrigin::Recurring),
            existing("Internet", ExpenseOrigin::Manual),
        ];

        let planned = plan_materialization(october(), &templates, &expenses);

        assert_eq!(planned_names(&planned), ["Phone"]);
    }

    #[test]
    fn name_match_is_exact() {
        let templates = vec![recurring(1, "Rent", date!(2025 - 01 - 01), None)];
        let expenses = vec![existing("rent", ExpenseOrigin::Manual)];

        let planned = plan_materialization(october(), &templates, &expenses);

        assert_eq!(planned_names(&planned), ["Rent"]);
    }
}

#[cfg(test)]
mod materialize_month_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        MonthKey,
        auth::UserID,
        budget_month::{BudgetMonth, get_or_create_budget_month},
        category::{CategoryId, CategoryName, create_category},
        expense::{ExpenseOrigin, ExpenseUpdate, get_expenses_for_month, update_expense},
        recurring_expense::{
            NewRecurringExpense, RecurringExpenseUpdate, create_recurring_expense,
            update_recurring_expense,
        },
        test_utils::{create_test_user, get_test_connection},
    };

    use super::materialize_month;

    fn add_recurring(
        user_id: UserID,
        name: &str,
        amount_cents: i64,
        category_id: CategoryId,
        connection: &Connection,
    ) -> i64 {
        create_recurring_expense(
            user_id,
            NewRecurringExpense {
                name: name.to_owned(),
                amount_cents,
                category_id,
                starts_on: date!(2025 - 01 - 01),
                ends_on: None,
            },
            connection,
        )
        .unwrap()
        .id
    }

    fn setup(connection: &Connection) -> (UserID, CategoryId) {
        let user_id = create_test_user(connection);
        let category_id =
            create_category(user_id, CategoryName::new_unchecked("Bills"), connection)
                .unwrap()
                .id;

        (user_id, category_id)
    }

    fn resolve(user_id: UserID, key: &str, connection: &Connection) -> BudgetMonth {
        let month: MonthKey = key.parse().unwrap();
        get_or_create_budget_month(user_id, month, connection).unwrap()
    }

    #[test]
    fn copies_templates_as_unpaid_recurring_expenses() {
        let connection = get_test_connection();
        let (user_id, category_id) = setup(&connection);
        let rent_id = add_recurring(user_id, "Rent", 250_000, category_id, &connection);
        let month = resolve(user_id, "2024-12", &connection);

        let report = materialize_month(user_id, &month, &connection).unwrap();
        assert!(report.created.is_empty(), "nothing applies before 2025");

        let month = resolve(user_id, "2025-10", &connection);
        let expenses = get_expenses_for_month(user_id, month.id, &connection).unwrap();

        assert_eq!(expenses.len(), 1);
        let rent = &expenses[0];
        assert_eq!(rent.name, "Rent");
        assert_eq!(rent.amount_cents, 250_000);
        assert_eq!(rent.category_id, category_id);
        assert_eq!(rent.origin, ExpenseOrigin::Recurring);
        assert!(!rent.is_paid);
        assert_eq!(rent.recurring_expense_id, Some(rent_id));
    }

    #[test]
    fn second_run_creates_nothing() {
        let connection = get_test_connection();
        let (user_id, category_id) = setup(&connection);
        add_recurring(user_id, "Rent", 250_000, category_id, &connection);
        add_recurring(user_id, "Internet", 6_000, category_id, &connection);
        let month = resolve(user_id, "2025-10", &connection);
        let before = get_expenses_for_month(user_id, month.id, &connection).unwrap();

        let report = materialize_month(user_id, &month, &connection).unwrap();

        assert!(report.created.is_empty());
        assert!(report.failed.is_empty());
        assert_eq!(
            get_expenses_for_month(user_id, month.id, &connection).unwrap(),
            before
        );
    }

    #[test]
    fn template_edits_do_not_change_copied_expenses() {
        let connection = get_test_connection();
        let (user_id, category_id) = setup(&connection);
        let rent_id = add_recurring(user_id, "Rent", 250_000, category_id, &connection);
        let month = resolve(user_id, "2025-10", &connection);

        update_recurring_expense(
            user_id,
            rent_id,
            &RecurringExpenseUpdate {
                amount_cents: Some(300_000),
                ..Default::default()
            },
            &connection,
        )
        .unwrap();
        materialize_month(user_id, &month, &connection).unwrap();

        let expenses = get_expenses_for_month(user_id, month.id, &connection).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount_cents, 250_000);
    }

    #[test]
    fn renamed_copy_is_recreated() {
        let connection = get_test_connection();
        let (user_id, category_id) = setup(&connection);
        add_recurring(user_id, "Rent", 250_000, category_id, &connection);
        let month = resolve(user_id, "2025-10", &connection);
        let copied = get_expenses_for_month(user_id, month.id, &connection).unwrap();
        update_expense(
            user_id,
            copied[0].id,
            &ExpenseUpdate {
                name: Some("Rent October".to_owned()),
                ..Default::default()
            },
            &connection,
        )
        .unwrap();

        let report = materialize_month(user_id, &month, &connection).unwrap();

        assert_eq!(report.created.len(), 1);
        assert_eq!(
            get_expenses_for_month(user_id, month.id, &connection)
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn failed_insert_does_not_stop_other_templates() {
        let connection = get_test_connection();
        let (user_id, category_id) = setup(&connection);
        let month = resolve(user_id, "2025-10", &connection);
        let rent_id = add_recurring(user_id, "Rent", 250_000, category_id, &connection);
        add_recurring(user_id, "Internet", 6_000, category_id, &connection);
        connection
            .execute_batch(
                "CREATE TRIGGER reject_rent BEFORE INSERT ON expense
                WHEN NEW.name = 'Rent'
                BEGIN
                    SELECT RAISE(ABORT, 'rent is not allowed');
                END;",
            )
            .unwrap();

        let report = materialize_month(user_id, &month, &connection).unwrap();

        assert_eq!(report.created.len(), 1);
        assert_eq!(report.created[0].name, "Internet");
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].recurring_expense_id, rent_id);
        assert_eq!(report.failed[0].name, "Rent");
    }
}
