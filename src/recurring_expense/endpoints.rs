//! Recurring expense endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    auth::UserID,
    category::{CategoryId, get_or_create_general_category},
    date_format,
    db::lock_connection,
    recurring_expense::{
        NewRecurringExpense, RECURRING_EXPENSE_NAME_MAX_LENGTH, RecurringExpense,
        RecurringExpenseId, RecurringExpenseUpdate, create_recurring_expense,
        delete_recurring_expense, get_active_recurring_expenses, update_recurring_expense,
    },
    timezone::local_today,
    validation::{validate_amount, validate_text},
};

/// The state needed for the recurring expense endpoints.
#[derive(Debug, Clone)]
pub struct RecurringExpenseState {
    /// The local timezone as a canonical timezone name, e.g. "Europe/Warsaw".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RecurringExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The data for a new recurring expense.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecurringExpenseData {
    pub name: String,
    pub amount_cents: i64,
    /// Defaults to the "General" category.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Defaults to today in the server's timezone.
    #[serde(default, with = "date_format::option")]
    pub starts_on: Option<Date>,
    #[serde(default, with = "date_format::option")]
    pub ends_on: Option<Date>,
}

/// The fields of a recurring expense the client may change.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecurringExpenseUpdateData {
    pub name: Option<String>,
    pub amount_cents: Option<i64>,
    pub category_id: Option<CategoryId>,
    pub active: Option<bool>,
    #[serde(default, with = "date_format::option")]
    pub starts_on: Option<Date>,
    /// `null` removes the end date.
    #[serde(default, deserialize_with = "date_format::nullable::deserialize")]
    pub ends_on: Option<Option<Date>>,
}

fn validate_name(name: &str) -> Result<String, Error> {
    validate_text("recurring expense name", name, 1, RECURRING_EXPENSE_NAME_MAX_LENGTH)
}

/// List the user's active recurring expenses.
pub async fn list_recurring_expenses_endpoint(
    State(state): State<RecurringExpenseState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<RecurringExpense>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_active_recurring_expenses(user_id, &connection).map(Json)
}

/// Create a recurring expense.
///
/// The new recurring expense is only copied into months created from now on,
/// or into existing months when they are synced.
pub async fn create_recurring_expense_endpoint(
    State(state): State<RecurringExpenseState>,
    Extension(user_id): Extension<UserID>,
    Json(data): Json<RecurringExpenseData>,
) -> Result<(StatusCode, Json<RecurringExpense>), Error> {
    let name = validate_name(&data.name)?;
    let amount_cents = validate_amount("amount", data.amount_cents)?;
    let starts_on = match data.starts_on {
        Some(starts_on) => starts_on,
        None => local_today(&state.local_timezone)?,
    };

    let connection = lock_connection(&state.db_connection)?;
    let category_id = match data.category_id {
        Some(category_id) => category_id,
        None => get_or_create_general_category(user_id, &connection)?.id,
    };

    let recurring = create_recurring_expense(
        user_id,
        NewRecurringExpense {
            name,
            amount_cents,
            category_id,
            starts_on,
            ends_on: data.ends_on,
        },
        &connection,
    )?;

    Ok((StatusCode::CREATED, Json(recurring)))
}

/// Update a recurring expense. Expenses already copied from it keep their values.
pub async fn update_recurring_expense_endpoint(
    State(state): State<RecurringExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(recurring_id): Path<RecurringExpenseId>,
    Json(data): Json<RecurringExpenseUpdateData>,
) -> Result<Json<RecurringExpense>, Error> {
    let update = RecurringExpenseUpdate {
        name: data.name.as_deref().map(validate_name).transpose()?,
        amount_cents: data
            .amount_cents
            .map(|cents| validate_amount("amount", cents))
            .transpose()?,
        category_id: data.category_id,
        active: data.active,
        starts_on: data.starts_on,
        ends_on: data.ends_on,
    };
    let connection = lock_connection(&state.db_connection)?;

    update_recurring_expense(user_id, recurring_id, &update, &connection).map(Json)
}

/// Delete a recurring expense, keeping the expenses copied from it.
pub async fn delete_recurring_expense_endpoint(
    State(state): State<RecurringExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(recurring_id): Path<RecurringExpenseId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_recurring_expense(user_id, recurring_id, &connection).map(|_| StatusCode::NO_CONTENT)
}
