//! Database operations for budget months.

use rusqlite::{Connection, Row};

use crate::{
    Error, MonthKey,
    auth::UserID,
    budget_month::{BudgetMonth, BudgetMonthId, BudgetMonthUpdate},
};

/// Insert an empty budget month: no salary override and no savings.
///
/// # Errors
///
/// Returns [Error::DuplicateBudgetMonth] if the user already has a row for `month`.
pub(super) fn insert_budget_month(
    user_id: UserID,
    month: MonthKey,
    connection: &Connection,
) -> Result<BudgetMonth, Error> {
    connection.execute(
        "INSERT INTO budget_month (user_id, month, salary_override_cents, savings_cents)
        VALUES (?1, ?2, NULL, 0);",
        (user_id.as_i64(), month),
    )?;

    Ok(BudgetMonth {
        id: connection.last_insert_rowid(),
        month,
        salary_override_cents: None,
        savings_cents: 0,
    })
}

/// Retrieve a budget month by ID.
///
/// # Errors
///
/// Returns [Error::NotFound] if the month does not exist or belongs to another user.
pub fn get_budget_month(
    user_id: UserID,
    month_id: BudgetMonthId,
    connection: &Connection,
) -> Result<BudgetMonth, Error> {
    connection
        .prepare(
            "SELECT id, month, salary_override_cents, savings_cents
            FROM budget_month WHERE id = :id AND user_id = :user_id;",
        )?
        .query_row(
            &[(":id", &month_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the user's budget month for `month`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the month has not been created yet.
pub fn get_budget_month_by_key(
    user_id: UserID,
    month: MonthKey,
    connection: &Connection,
) -> Result<BudgetMonth, Error> {
    connection
        .prepare(
            "SELECT id, month, salary_override_cents, savings_cents
            FROM budget_month WHERE user_id = ?1 AND month = ?2;",
        )?
        .query_row((user_id.as_i64(), month), map_row)
        .map_err(|error| error.into())
}

/// Retrieve every budget month the user has in `year`, in calendar order.
pub fn get_budget_months_in_year(
    user_id: UserID,
    year: i32,
    connection: &Connection,
) -> Result<Vec<BudgetMonth>, Error> {
    let prefix = format!("{year:04}-%");

    connection
        .prepare(
            "SELECT id, month, salary_override_cents, savings_cents
            FROM budget_month WHERE user_id = ?1 AND month LIKE ?2
            ORDER BY month ASC;",
        )?
        .query_map((user_id.as_i64(), prefix), map_row)?
        .map(|maybe_month| maybe_month.map_err(|error| error.into()))
        .collect()
}

/// Apply `update` to a budget month and return the updated month.
///
/// # Errors
///
/// Returns [Error::NotFound] if the month does not exist or belongs to another user.
pub fn update_budget_month(
    user_id: UserID,
    month_id: BudgetMonthId,
    update: &BudgetMonthUpdate,
    connection: &Connection,
) -> Result<BudgetMonth, Error> {
    let mut budget_month = get_budget_month(user_id, month_id, connection)?;

    if let Some(salary_override_cents) = update.salary_override_cents {
        budget_month.salary_override_cents = salary_override_cents;
    }

    if let Some(savings_cents) = update.savings_cents {
        budget_month.savings_cents = savings_cents;
    }

    connection.execute(
        "UPDATE budget_month SET salary_override_cents = ?1, savings_cents = ?2
        WHERE id = ?3 AND user_id = ?4;",
        (
            budget_month.salary_override_cents,
            budget_month.savings_cents,
            month_id,
            user_id.as_i64(),
        ),
    )?;

    Ok(budget_month)
}

/// Create the budget month table.
pub fn create_budget_month_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget_month (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            month TEXT NOT NULL,
            salary_override_cents INTEGER CHECK (salary_override_cents >= 0),
            savings_cents INTEGER NOT NULL DEFAULT 0 CHECK (savings_cents >= 0),
            UNIQUE(user_id, month)
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<BudgetMonth, rusqlite::Error> {
    Ok(BudgetMonth {
        id: row.get(0)?,
        month: row.get(1)?,
        salary_override_cents: row.get(2)?,
        savings_cents: row.get(3)?,
    })
}
