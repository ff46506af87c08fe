//! Budget month endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, MonthKey,
    auth::UserID,
    budget_month::{
        BudgetMonth, BudgetMonthId, BudgetMonthUpdate, get_budget_month,
        get_or_create_budget_month, update_budget_month,
    },
    db::lock_connection,
    nullable,
    recurring_expense::{MaterializationReport, materialize_month},
    validation::validate_amount,
};

/// The state needed for the budget month endpoints.
#[derive(Debug, Clone)]
pub struct BudgetMonthState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetMonthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Get the budget month for a "YYYY-MM" month, creating it on first access.
pub async fn get_month_endpoint(
    State(state): State<BudgetMonthState>,
    Extension(user_id): Extension<UserID>,
    Path(month): Path<String>,
) -> Result<Json<BudgetMonth>, Error> {
    let month: MonthKey = month.parse()?;
    let connection = lock_connection(&state.db_connection)?;

    get_or_create_budget_month(user_id, month, &connection).map(Json)
}

/// The fields of a budget month the client may change.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BudgetMonthUpdateData {
    /// `null` clears the override so the profile's default salary applies.
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub salary_override_cents: Option<Option<i64>>,
    pub savings_cents: Option<i64>,
}

impl BudgetMonthUpdateData {
    fn validate(self) -> Result<BudgetMonthUpdate, Error> {
        let salary_override_cents = match self.salary_override_cents {
            Some(Some(cents)) => Some(Some(validate_amount("salary override", cents)?)),
            other => other,
        };

        Ok(BudgetMonthUpdate {
            salary_override_cents,
            savings_cents: self
                .savings_cents
                .map(|cents| validate_amount("savings", cents))
                .transpose()?,
        })
    }
}

/// Set the salary override and savings of a budget month.
pub async fn update_budget_month_endpoint(
    State(state): State<BudgetMonthState>,
    Extension(user_id): Extension<UserID>,
    Path(month_id): Path<BudgetMonthId>,
    Json(data): Json<BudgetMonthUpdateData>,
) -> Result<Json<BudgetMonth>, Error> {
    let update = data.validate()?;
    let connection = lock_connection(&state.db_connection)?;

    update_budget_month(user_id, month_id, &update, &connection).map(Json)
}

/// Copy recurring expenses that are missing from a budget month.
///
/// Safe to repeat, recurring expenses whose name is already used in the month are skipped.
pub async fn sync_budget_month_endpoint(
    State(state): State<BudgetMonthState>,
    Extension(user_id): Extension<UserID>,
    Path(month_id): Path<BudgetMonthId>,
) -> Result<Json<MaterializationReport>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let budget_month = get_budget_month(user_id, month_id, &connection)?;

    materialize_month(user_id, &budget_month, &connection).map(Json)
}
