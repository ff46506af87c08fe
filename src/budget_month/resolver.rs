//! Lazily creates budget months.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error, MonthKey,
    auth::UserID,
    budget_month::{
        BudgetMonth,
        db::{get_budget_month_by_key, insert_budget_month},
    },
    recurring_expense::materialize_month,
};

/// Get the user's budget month for `month`, creating it if it does not exist yet.
///
/// A new month starts without a salary override or savings, and the user's
/// applicable recurring expenses are copied into it.
///
/// The new row and its copied expenses are committed together. If the
/// recurring expenses cannot be loaded, the month is not created, so the next
/// call tries again.
///
/// Concurrent calls for the same user and month may both miss the read. The
/// unique constraint on (user, month) lets only one insert through, the other
/// caller reads back the winner's row and does not copy recurring expenses
/// again.
pub fn get_or_create_budget_month(
    user_id: UserID,
    month: MonthKey,
    connection: &Connection,
) -> Result<BudgetMonth, Error> {
    match get_budget_month_by_key(user_id, month, connection) {
        Ok(budget_month) => return Ok(budget_month),
        Err(Error::NotFound) => {}
        Err(error) => return Err(error),
    }

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let budget_month = match insert_budget_month(user_id, month, &transaction) {
        Ok(budget_month) => budget_month,
        Err(Error::DuplicateBudgetMonth) => {
            drop(transaction);
            tracing::debug!("Budget month {month} for user {user_id} was created concurrently");
            return get_budget_month_by_key(user_id, month, connection);
        }
        Err(error) => return Err(error),
    };

    let report = materialize_month(user_id, &budget_month, &transaction)?;
    transaction.commit()?;

    tracing::info!("Created budget month {month} for user {user_id}");

    if !report.failed.is_empty() {
        tracing::warn!(
            "{} recurring expenses could not be copied into {month} for user {user_id}",
            report.failed.len()
        );
    }

    Ok(budget_month)
}

#[cfg(test)]
mod get_or_create_budget_month_tests {
    use std::{
        sync::{Arc, Barrier},
        thread,
    };

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        MonthKey,
        category::{CategoryName, create_category},
        db::{configure_connection, initialize},
        expense::get_expenses_for_month,
        recurring_expense::{NewRecurringExpense, create_recurring_expense},
        test_utils::{create_test_user, get_test_connection},
    };

    use super::get_or_create_budget_month;

    fn october() -> MonthKey {
        "2025-10".parse().unwrap()
    }

    #[test]
    fn creates_month_once() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);

        let first = get_or_create_budget_month(user_id, october(), &connection).unwrap();
        let second = get_or_create_budget_month(user_id, october(), &connection).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.salary_override_cents, None);
        assert_eq!(first.savings_cents, 0);
    }

    #[test]
    fn existing_month_is_not_materialized_again() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        let month = get_or_create_budget_month(user_id, october(), &connection).unwrap();
        let category_id =
            create_category(user_id, CategoryName::new_unchecked("Bills"), &connection)
                .unwrap()
                .id;
        create_recurring_expense(
            user_id,
            NewRecurringExpense {
                name: "Rent".to_owned(),
                amount_cents: 250_000,
                category_id,
                starts_on: date!(2025 - 01 - 01),
                ends_on: None,
            },
            &connection,
        )
        .unwrap();

        get_or_create_budget_month(user_id, october(), &connection).unwrap();

        assert!(
            get_expenses_for_month(user_id, month.id, &connection)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn failed_load_does_not_leave_month_behind() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        connection
            .execute_batch("DROP TABLE recurring_expense;")
            .unwrap();

        let result = get_or_create_budget_month(user_id, october(), &connection);

        assert!(result.is_err(), "want an error, got {result:?}");
        let row_count: i64 = connection
            .query_row("SELECT COUNT(*) FROM budget_month", [], |row| row.get(0))
            .unwrap();
        assert_eq!(row_count, 0);
        assert!(connection.is_autocommit());
    }

    #[test]
    fn concurrent_resolution_creates_one_row() {
        let db_file = tempfile::NamedTempFile::new().unwrap();
        let setup = Connection::open(db_file.path()).unwrap();
        initialize(&setup).unwrap();
        let user_id = create_test_user(&setup);
        let category_id = create_category(user_id, CategoryName::new_unchecked("Bills"), &setup)
            .unwrap()
            .id;
        create_recurring_expense(
            user_id,
            NewRecurringExpense {
                name: "Rent".to_owned(),
                amount_cents: 250_000,
                category_id,
                starts_on: date!(2025 - 01 - 01),
                ends_on: None,
            },
            &setup,
        )
        .unwrap();

        let barrier = Arc::new(Barrier::new(2));
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let barrier = barrier.clone();
                let path = db_file.path().to_owned();

                thread::spawn(move || {
                    let connection = Connection::open(path).unwrap();
                    configure_connection(&connection).unwrap();
                    barrier.wait();
                    get_or_create_budget_month(user_id, october(), &connection).unwrap()
                })
            })
            .collect();

        let months: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();

        assert_eq!(months[0], months[1]);
        let row_count: i64 = setup
            .query_row("SELECT COUNT(*) FROM budget_month", [], |row| row.get(0))
            .unwrap();
        assert_eq!(row_count, 1);
        let expenses = get_expenses_for_month(user_id, months[0].id, &setup).unwrap();
        assert_eq!(expenses.len(), 1);
    }
}
