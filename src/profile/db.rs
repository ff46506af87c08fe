//! Database operations for profiles.

use rusqlite::{Connection, Row};

use crate::{
    Error, MonthKey,
    auth::UserID,
    profile::{Profile, ProfileUpdate, Theme},
};

/// Create the profile for a newly registered user.
///
/// The theme starts as [Theme::System] and the default salary as zero.
pub fn create_profile(
    user_id: UserID,
    display_name: &str,
    first_tracked_month: MonthKey,
    connection: &Connection,
) -> Result<Profile, Error> {
    connection.execute(
        "INSERT INTO profile (user_id, display_name, theme_pref, default_salary_cents, first_tracked_month)
        VALUES (?1, ?2, ?3, 0, ?4);",
        (
            user_id.as_i64(),
            display_name,
            Theme::System,
            first_tracked_month,
        ),
    )?;

    Ok(Profile {
        user_id,
        display_name: display_name.to_owned(),
        theme_pref: Theme::System,
        default_salary_cents: 0,
        first_tracked_month,
    })
}

/// Get the profile of `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user has no profile.
pub fn get_profile(user_id: UserID, connection: &Connection) -> Result<Profile, Error> {
    connection
        .prepare(
            "SELECT user_id, display_name, theme_pref, default_salary_cents, first_tracked_month
            FROM profile WHERE user_id = :user_id;",
        )?
        .query_row(&[(":user_id", &user_id.as_i64())], map_row)
        .map_err(|error| error.into())
}

/// Apply `update` to the profile of `user_id` and return the updated profile.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user has no profile.
pub fn update_profile(
    user_id: UserID,
    update: &ProfileUpdate,
    connection: &Connection,
) -> Result<Profile, Error> {
    let rows_affected = connection.execute(
        "UPDATE profile SET
            display_name = COALESCE(?1, display_name),
            theme_pref = COALESCE(?2, theme_pref),
            default_salary_cents = COALESCE(?3, default_salary_cents),
            first_tracked_month = COALESCE(?4, first_tracked_month)
        WHERE user_id = ?5;",
        (
            update.display_name.as_deref(),
            update.theme_pref,
            update.default_salary_cents,
            update.first_tracked_month,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    get_profile(user_id, connection)
}

/// Create the profile table.
pub fn create_profile_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS profile (
            user_id INTEGER PRIMARY KEY REFERENCES user(id) ON DELETE CASCADE,
            display_name TEXT NOT NULL,
            theme_pref TEXT NOT NULL DEFAULT 'system'
                CHECK (theme_pref IN ('light', 'dark', 'system')),
            default_salary_cents INTEGER NOT NULL DEFAULT 0 CHECK (default_salary_cents >= 0),
            first_tracked_month TEXT NOT NULL
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Profile, rusqlite::Error> {
    Ok(Profile {
        user_id: UserID::new(row.get(0)?),
        display_name: row.get(1)?,
        theme_pref: row.get(2)?,
        default_salary_cents: row.get(3)?,
        first_tracked_month: row.get(4)?,
    })
}
