//! HTTP handlers for the summaries.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::UserID,
    budget_month::BudgetMonthId,
    db::lock_connection,
    summary::{MonthSummary, YearSummary, get_month_summary, get_year_summary},
    timezone::local_today,
};

/// The state needed for the summary endpoints.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The local timezone as a canonical timezone name, e.g. "Europe/Warsaw".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Query parameters for the year summary.
#[derive(Debug, Deserialize)]
pub struct YearQuery {
    /// Defaults to the current year in the server's timezone.
    pub year: Option<i32>,
}

/// Get the summary of one of the user's budget months.
pub async fn get_month_summary_endpoint(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
    Path(month_id): Path<BudgetMonthId>,
) -> Result<Json<MonthSummary>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_month_summary(user_id, month_id, &connection).map(Json)
}

/// Get the summary of a year, by default the current one.
pub async fn get_year_summary_endpoint(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<YearQuery>,
) -> Result<Json<YearSummary>, Error> {
    let year = match query.year {
        Some(year) if (1..=9999).contains(&year) => year,
        Some(year) => {
            return Err(Error::Validation(format!(
                "year must be between 1 and 9999, got {year}"
            )));
        }
        None => local_today(&state.local_timezone)?.year(),
    };

    let connection = lock_connection(&state.db_connection)?;

    get_year_summary(user_id, year, &connection).map(Json)
}
