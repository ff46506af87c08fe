//! Database operations for categories.
//!
//! Every query is scoped to the owning user, a category that belongs to
//! someone else behaves exactly like one that does not exist.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryId, CategoryName},
};

/// The category assigned to recurring expenses created without one.
pub const GENERAL_CATEGORY_NAME: &str = "General";

/// Create a category and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::DuplicateCategoryName] if the user already has a category with this name.
pub fn create_category(
    user_id: UserID,
    name: CategoryName,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        "INSERT INTO category (user_id, name) VALUES (?1, ?2);",
        (user_id.as_i64(), name.as_ref()),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category { id, name })
}

/// Retrieve a single category owned by `user_id`.
pub fn get_category(
    user_id: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name FROM category WHERE id = :id AND user_id = :user_id;")?
        .query_row(
            &[(":id", &category_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve all of the user's categories ordered alphabetically by name.
pub fn get_all_categories(user_id: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name FROM category WHERE user_id = :user_id ORDER BY name ASC;")?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Rename a category.
///
/// # Errors
///
/// Returns [Error::NotFound] if the category does not exist or belongs to another user, or
/// [Error::DuplicateCategoryName] if the new name is taken.
pub fn update_category(
    user_id: UserID,
    category_id: CategoryId,
    new_name: CategoryName,
    connection: &Connection,
) -> Result<Category, Error> {
    let rows_affected = connection.execute(
        "UPDATE category SET name = ?1 WHERE id = ?2 AND user_id = ?3",
        (new_name.as_ref(), category_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(Category {
        id: category_id,
        name: new_name,
    })
}

/// Delete a category that no expense or recurring expense uses.
///
/// # Errors
///
/// Returns [Error::NotFound] if the category does not exist or belongs to another user, or
/// [Error::CategoryInUse] if it is still referenced.
pub fn delete_category(
    user_id: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<(), Error> {
    get_category(user_id, category_id, connection)?;

    let reference_count: i64 = connection.query_row(
        "SELECT
            (SELECT COUNT(*) FROM expense WHERE category_id = ?1)
            + (SELECT COUNT(*) FROM recurring_expense WHERE category_id = ?1);",
        [category_id],
        |row| row.get(0),
    )?;

    if reference_count > 0 {
        return Err(Error::CategoryInUse);
    }

    connection.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
        (category_id, user_id.as_i64()),
    )?;

    Ok(())
}

/// Get the user's "General" category, creating it on first use.
pub fn get_or_create_general_category(
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        "INSERT OR IGNORE INTO category (user_id, name) VALUES (?1, ?2);",
        (user_id.as_i64(), GENERAL_CATEGORY_NAME),
    )?;

    connection
        .prepare("SELECT id, name FROM category WHERE user_id = :user_id AND name = :name;")?
        .query_row(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":name": GENERAL_CATEGORY_NAME,
            },
            map_row,
        )
        .map_err(|error| error.into())
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            UNIQUE(user_id, name)
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);

    Ok(Category { id, name })
}
