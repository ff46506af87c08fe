//! Registered users and their credentials.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::PasswordHash, validation::validate_text};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The unique name the user logs in with.
    pub username: String,
    /// The user's unique email address, which can also be used to log in.
    pub email: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// The shortest allowed username, in characters.
pub const USERNAME_MIN_LENGTH: usize = 3;
/// The longest allowed username, in characters.
pub const USERNAME_MAX_LENGTH: usize = 32;

/// Trim and check the length of a username.
pub fn validate_username(username: &str) -> Result<String, Error> {
    let username = validate_text(
        "username",
        username,
        USERNAME_MIN_LENGTH,
        USERNAME_MAX_LENGTH,
    )?;

    if username.contains(char::is_whitespace) {
        return Err(Error::Validation(
            "username must not contain whitespace".to_owned(),
        ));
    }

    Ok(username)
}

/// Trim and check that `email` looks like an email address.
///
/// Only the basic shape "local@domain.tld" is checked.
pub fn validate_email(email: &str) -> Result<String, Error> {
    let email = email.trim();
    let invalid = || Error::Validation(format!("\"{email}\" is not a valid email address"));

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let domain_is_valid = domain
        .split_once('.')
        .is_some_and(|(name, tld)| !name.is_empty() && !tld.is_empty() && !tld.ends_with('.'));

    if local.is_empty() || domain.contains('@') || !domain_is_valid || email.contains(' ') {
        return Err(invalid());
    }

    Ok(email.to_owned())
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// The caller is expected to have validated `username` and `email`.
///
/// # Errors
///
/// Returns [Error::DuplicateUser] if the username or email is taken, or
/// [Error::SqlError] for other SQL errors.
pub fn create_user(
    username: &str,
    email: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (username, email, password) VALUES (?1, ?2, ?3)",
        (username, email, password_hash.as_ref()),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        username: username.to_owned(),
        email: email.to_owned(),
        password_hash,
    })
}

/// Get the user whose username or email equals `login`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user has that username or email.
pub fn get_user_by_login(login: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(
            "SELECT id, username, email, password FROM user
            WHERE username = :login OR email = :login",
        )?
        .query_row(&[(":login", &login.trim())], map_row)
        .map_err(|error| error.into())
}

/// Replace the password hash of `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if `user_id` does not belong to a registered user.
pub fn update_password(
    user_id: UserID,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_password_hash: String = row.get(3)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}
