//! Database operations for recurring expenses.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    auth::UserID,
    category::get_category,
    recurring_expense::{
        NewRecurringExpense, RecurringExpense, RecurringExpenseId, RecurringExpenseUpdate,
    },
    validation::validate_date_range,
};

/// Create a recurring expense and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::NotFound] if the category does not belong to `user_id`, or
/// [Error::Validation] if the date range is inverted.
pub fn create_recurring_expense(
    user_id: UserID,
    new_recurring: NewRecurringExpense,
    connection: &Connection,
) -> Result<RecurringExpense, Error> {
    validate_date_range(new_recurring.starts_on, new_recurring.ends_on)?;
    get_category(user_id, new_recurring.category_id, connection)?;

    connection.execute(
        "INSERT INTO recurring_expense
            (user_id, name, amount_cents, category_id, active, starts_on, ends_on)
        VALUES (?1, ?2, ?3, ?4, 1, ?5, ?6);",
        (
            user_id.as_i64(),
            &new_recurring.name,
            new_recurring.amount_cents,
            new_recurring.category_id,
            new_recurring.starts_on,
            new_recurring.ends_on,
        ),
    )?;

    Ok(RecurringExpense {
        id: connection.last_insert_rowid(),
        name: new_recurring.name,
        amount_cents: new_recurring.amount_cents,
        category_id: new_recurring.category_id,
        active: true,
        starts_on: new_recurring.starts_on,
        ends_on: new_recurring.ends_on,
    })
}

/// Retrieve a single recurring expense owned by `user_id`.
pub fn get_recurring_expense(
    user_id: UserID,
    recurring_id: RecurringExpenseId,
    connection: &Connection,
) -> Result<RecurringExpense, Error> {
    connection
        .prepare(
            "SELECT id, name, amount_cents, category_id, active, starts_on, ends_on
            FROM recurring_expense WHERE id = :id AND user_id = :user_id;",
        )?
        .query_row(
            &[(":id", &recurring_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the user's active recurring expenses, ordered by name.
pub fn get_active_recurring_expenses(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<RecurringExpense>, Error> {
    connection
        .prepare(
            "SELECT id, name, amount_cents, category_id, active, starts_on, ends_on
            FROM recurring_expense WHERE user_id = :user_id AND active = 1
            ORDER BY name ASC, id ASC;",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_recurring| maybe_recurring.map_err(|error| error.into()))
        .collect()
}

/// Apply `update` to a recurring expense and return the updated recurring expense.
///
/// Expenses already copied from the recurring expense are not changed.
///
/// # Errors
///
/// Returns [Error::NotFound] if the recurring expense or the new category does not belong to
/// `user_id`, or [Error::Validation] if the resulting date range is inverted.
pub fn update_recurring_expense(
    user_id: UserID,
    recurring_id: RecurringExpenseId,
    update: &RecurringExpenseUpdate,
    connection: &Connection,
) -> Result<RecurringExpense, Error> {
    let mut recurring = get_recurring_expense(user_id, recurring_id, connection)?;

    if let Some(category_id) = update.category_id {
        get_category(user_id, category_id, connection)?;
        recurring.category_id = category_id;
    }

    if let Some(name) = &update.name {
        recurring.name = name.clone();
    }

    if let Some(amount_cents) = update.amount_cents {
        recurring.amount_cents = amount_cents;
    }

    if let Some(active) = update.active {
        recurring.active = active;
    }

    if let Some(starts_on) = update.starts_on {
        recurring.starts_on = starts_on;
    }

    if let Some(ends_on) = update.ends_on {
        recurring.ends_on = ends_on;
    }

    validate_date_range(recurring.starts_on, recurring.ends_on)?;

    connection.execute(
        "UPDATE recurring_expense SET
            name = ?1, amount_cents = ?2, category_id = ?3, active = ?4, starts_on = ?5, ends_on = ?6
        WHERE id = ?7 AND user_id = ?8;",
        (
            &recurring.name,
            recurring.amount_cents,
            recurring.category_id,
            recurring.active,
            recurring.starts_on,
            recurring.ends_on,
            recurring_id,
            user_id.as_i64(),
        ),
    )?;

    Ok(recurring)
}

/// Delete a recurring expense. Expenses copied from it are kept.
///
/// # Errors
///
/// Returns [Error::NotFound] if the recurring expense does not exist or belongs to another user.
pub fn delete_recurring_expense(
    user_id: UserID,
    recurring_id: RecurringExpenseId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM recurring_expense WHERE id = ?1 AND user_id = ?2;",
        (recurring_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Create the recurring expense table. Requires the category table.
pub fn create_recurring_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS recurring_expense (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            amount_cents INTEGER NOT NULL CHECK (amount_cents >= 0),
            category_id INTEGER NOT NULL REFERENCES category(id) ON DELETE RESTRICT,
            active INTEGER NOT NULL DEFAULT 1,
            starts_on TEXT NOT NULL,
            ends_on TEXT,
            CHECK (ends_on IS NULL OR ends_on >= starts_on)
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<RecurringExpense, rusqlite::Error> {
    Ok(RecurringExpense {
        id: row.get(0)?,
        name: row.get(1)?,
        amount_cents: row.get(2)?,
        category_id: row.get(3)?,
        active: row.get(4)?,
        starts_on: row.get(5)?,
        ends_on: row.get(6)?,
    })
}
