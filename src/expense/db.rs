//! Database operations for expenses.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    auth::UserID,
    budget_month::{BudgetMonthId, get_budget_month},
    category::get_category,
    expense::{Expense, ExpenseId, ExpenseUpdate, NewExpense},
};

/// Create an expense and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::NotFound] if the month or the category does not belong to `user_id`.
pub fn create_expense(
    user_id: UserID,
    new_expense: NewExpense,
    connection: &Connection,
) -> Result<Expense, Error> {
    get_budget_month(user_id, new_expense.month_id, connection)?;
    get_category(user_id, new_expense.category_id, connection)?;

    connection.execute(
        "INSERT INTO expense
            (user_id, month_id, category_id, name, amount_cents, origin, is_paid, recurring_expense_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
        (
            user_id.as_i64(),
            new_expense.month_id,
            new_expense.category_id,
            &new_expense.name,
            new_expense.amount_cents,
            new_expense.origin,
            new_expense.is_paid,
            new_expense.recurring_expense_id,
        ),
    )?;

    Ok(Expense {
        id: connection.last_insert_rowid(),
        month_id: new_expense.month_id,
        category_id: new_expense.category_id,
        name: new_expense.name,
        amount_cents: new_expense.amount_cents,
        origin: new_expense.origin,
        is_paid: new_expense.is_paid,
        recurring_expense_id: new_expense.recurring_expense_id,
    })
}

/// Retrieve a single expense owned by `user_id`.
pub fn get_expense(
    user_id: UserID,
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(
            "SELECT id, month_id, category_id, name, amount_cents, origin, is_paid, recurring_expense_id
            FROM expense WHERE id = :id AND user_id = :user_id;",
        )?
        .query_row(
            &[(":id", &expense_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the expenses of a budget month in the order they were created.
pub fn get_expenses_for_month(
    user_id: UserID,
    month_id: BudgetMonthId,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, month_id, category_id, name, amount_cents, origin, is_paid, recurring_expense_id
            FROM expense WHERE month_id = :month_id AND user_id = :user_id
            ORDER BY id ASC;",
        )?
        .query_map(
            &[(":month_id", &month_id), (":user_id", &user_id.as_i64())],
            map_row,
        )?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Apply `update` to an expense and return the updated expense.
///
/// # Errors
///
/// Returns [Error::NotFound] if the expense, or the new category, does not belong to `user_id`.
pub fn update_expense(
    user_id: UserID,
    expense_id: ExpenseId,
    update: &ExpenseUpdate,
    connection: &Connection,
) -> Result<Expense, Error> {
    if let Some(category_id) = update.category_id {
        get_category(user_id, category_id, connection)?;
    }

    let rows_affected = connection.execute(
        "UPDATE expense SET
            name = COALESCE(?1, name),
            amount_cents = COALESCE(?2, amount_cents),
            category_id = COALESCE(?3, category_id),
            is_paid = COALESCE(?4, is_paid)
        WHERE id = ?5 AND user_id = ?6;",
        (
            update.name.as_deref(),
            update.amount_cents,
            update.category_id,
            update.is_paid,
            expense_id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    get_expense(user_id, expense_id, connection)
}

/// Delete an expense.
///
/// # Errors
///
/// Returns [Error::NotFound] if the expense does not exist or belongs to another user.
pub fn delete_expense(
    user_id: UserID,
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM expense WHERE id = ?1 AND user_id = ?2;",
        (expense_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Create the expense table.
///
/// Requires the budget month, category and recurring expense tables.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            month_id INTEGER NOT NULL REFERENCES budget_month(id) ON DELETE CASCADE,
            category_id INTEGER NOT NULL REFERENCES category(id) ON DELETE RESTRICT,
            name TEXT NOT NULL,
            amount_cents INTEGER NOT NULL CHECK (amount_cents >= 0),
            origin TEXT NOT NULL DEFAULT 'manual' CHECK (origin IN ('manual', 'recurring')),
            is_paid INTEGER NOT NULL DEFAULT 0,
            recurring_expense_id INTEGER REFERENCES recurring_expense(id) ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expense_month ON expense(month_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        month_id: row.get(1)?,
        category_id: row.get(2)?,
        name: row.get(3)?,
        amount_cents: row.get(4)?,
        origin: row.get(5)?,
        is_paid: row.get(6)?,
        recurring_expense_id: row.get(7)?,
    })
}

#[cfg(test)]
mod expense_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error, MonthKey,
        auth::UserID,
        budget_month::{BudgetMonth, get_or_create_budget_month},
        category::{Category, CategoryName, create_category},
        expense::{ExpenseOrigin, ExpenseUpdate, NewExpense},
        test_utils::{create_named_test_user, create_test_user, get_test_connection},
    };

    use super::{
        create_expense, delete_expense, get_expense, get_expenses_for_month, update_expense,
    };

    fn setup(user_id: UserID, connection: &Connection) -> (BudgetMonth, Category) {
        let month: MonthKey = "2025-10".parse().unwrap();
        let budget_month = get_or_create_budget_month(user_id, month, connection).unwrap();
        let category =
            create_category(user_id, CategoryName::new_unchecked("Food"), connection).unwrap();

        (budget_month, category)
    }

    fn manual_expense(month: &BudgetMonth, category: &Category, name: &str) -> NewExpense {
        NewExpense {
            month_id: month.id,
            category_id: category.id,
            name: name.to_owned(),
            amount_cents: 1_250,
            origin: ExpenseOrigin::Manual,
            is_paid: false,
            recurring_expense_id: None,
        }
    }

    #[test]
    fn create_and_list_expenses() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        let (month, category) = setup(user_id, &connection);

        let bread = create_expense(user_id, manual_expense(&month, &category, "Bread"), &connection)
            .unwrap();
        let milk = create_expense(user_id, manual_expense(&month, &category, "Milk"), &connection)
            .unwrap();

        assert_eq!(get_expense(user_id, bread.id, &connection), Ok(bread.clone()));
        assert_eq!(
            get_expenses_for_month(user_id, month.id, &connection),
            Ok(vec![bread, milk])
        );
    }

    #[test]
    fn create_with_other_users_month_or_category_fails() {
        let connection = get_test_connection();
        let alice = create_named_test_user("alice", &connection);
        let bob = create_named_test_user("bob", &connection);
        let (alices_month, alices_category) = setup(alice, &connection);
        let (bobs_month, bobs_category) = setup(bob, &connection);

        assert_eq!(
            create_expense(
                bob,
                manual_expense(&alices_month, &bobs_category, "Bread"),
                &connection
            ),
            Err(Error::NotFound)
        );
        assert_eq!(
            create_expense(
                bob,
                manual_expense(&bobs_month, &alices_category, "Bread"),
                &connection
            ),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn update_changes_only_given_fields() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        let (month, category) = setup(user_id, &connection);
        let expense = create_expense(user_id, manual_expense(&month, &category, "Bread"), &connection)
            .unwrap();

        let updated = update_expense(
            user_id,
            expense.id,
            &ExpenseUpdate {
                is_paid: Some(true),
                amount_cents: Some(990),
                ..Default::default()
            },
            &connection,
        )
        .unwrap();

        assert!(updated.is_paid);
        assert_eq!(updated.amount_cents, 990);
        assert_eq!(updated.name, "Bread");
        assert_eq!(updated.category_id, category.id);
    }

    #[test]
    fn update_to_other_users_category_fails() {
        let connection = get_test_connection();
        let alice = create_named_test_user("alice", &connection);
        let bob = create_named_test_user("bob", &connection);
        let (month, category) = setup(alice, &connection);
        let (_, bobs_category) = setup(bob, &connection);
        let expense =
            create_expense(alice, manual_expense(&month, &category, "Bread"), &connection).unwrap();

        let result = update_expense(
            alice,
            expense.id,
            &ExpenseUpdate {
                category_id: Some(bobs_category.id),
                ..Default::default()
            },
            &connection,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_removes_expense() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        let (month, category) = setup(user_id, &connection);
        let expense = create_expense(user_id, manual_expense(&month, &category, "Bread"), &connection)
            .unwrap();

        delete_expense(user_id, expense.id, &connection).unwrap();

        assert_eq!(get_expense(user_id, expense.id, &connection), Err(Error::NotFound));
        assert_eq!(
            delete_expense(user_id, expense.id, &connection),
            Err(Error::NotFound)
        );
    }
}
