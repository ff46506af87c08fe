//! Household Budget is a web service for planning a monthly household budget.
//!
//! Users record a salary, savings, categories, ad-hoc expenses and recurring
//! expense templates. Recurring templates are materialized into concrete
//! expenses for each month, and the service aggregates expenses into month
//! and year summaries.
//!
//! This library provides a JSON REST API on top of a SQLite database.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod auth;
mod budget_month;
mod category;
mod date_format;
mod db;
mod endpoints;
mod expense;
mod logging;
pub mod money;
mod month;
mod not_found;
mod nullable;
mod profile;
mod recurring_expense;
mod routing;
mod summary;
mod timezone;
mod validation;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{
    PasswordHash, User, UserID, ValidatedPassword, create_user, get_user_by_login,
    update_password,
};
pub use budget_month::{
    BudgetMonth, BudgetMonthId, BudgetMonthUpdate, get_or_create_budget_month, update_budget_month,
};
pub use category::{Category, CategoryId, CategoryName, create_category};
pub use db::initialize as initialize_db;
pub use expense::{Expense, ExpenseId, ExpenseOrigin, NewExpense, create_expense};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use month::MonthKey;
pub use profile::{Profile, ProfileUpdate, create_profile, update_profile};
pub use recurring_expense::{
    MaterializationReport, NewRecurringExpense, RecurringExpense, create_recurring_expense,
};
pub use routing::build_router;
pub use summary::{
    ChartEntry, MonthSummary, MonthlyTotal, YearSummary, get_month_summary, get_year_summary,
};
pub use timezone::{get_local_offset, local_today};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The login or password did not match a registered user.
    ///
    /// The same error is used for an unknown login and a wrong password so
    /// that clients cannot probe for registered usernames.
    #[error("incorrect username, email or password")]
    InvalidCredentials,

    /// The request did not carry a valid, unexpired auth cookie.
    #[error("you must be logged in to access this resource")]
    Unauthorized,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The request body or query failed validation.
    ///
    /// The string describes the violated constraint and is shown to the client.
    #[error("{0}")]
    Validation(String),

    /// A month string was not in the format "YYYY-MM".
    #[error("\"{0}\" is not a valid month, expected the format YYYY-MM")]
    InvalidMonth(String),

    /// The requested resource was not found.
    ///
    /// Resources owned by another user are reported with this error too, so
    /// that the existence of other users' data is not leaked.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to delete a category that an expense or recurring expense still uses.
    #[error("the category is in use by an expense or recurring expense")]
    CategoryInUse,

    /// The user already has a category with the same name.
    #[error("a category with this name already exists")]
    DuplicateCategoryName,

    /// The username or email is already registered.
    #[error("username or email already exists")]
    DuplicateUser,

    /// A budget month for the same user and month already exists.
    ///
    /// This happens when two requests race to create the same month. The
    /// caller should read the existing row instead.
    #[error("a budget month already exists for this month")]
    DuplicateBudgetMonth,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The auth cookie could not be created.
    #[error("could not create the auth cookie: {0}")]
    CookieError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("budget_month.") =>
            {
                Error::DuplicateBudgetMonth
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("category.") =>
            {
                Error::DuplicateCategoryName
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.") =>
            {
                Error::DuplicateUser
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code that corresponds to this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::InvalidMonth(_) | Error::TooWeak(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::Unauthorized | Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::CategoryInUse
            | Error::DuplicateCategoryName
            | Error::DuplicateUser
            | Error::DuplicateBudgetMonth => StatusCode::CONFLICT,
            Error::HashingError(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_)
            | Error::CookieError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Any errors that are not handled above are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
