//! Expense endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::UserID,
    budget_month::{BudgetMonthId, get_budget_month},
    category::CategoryId,
    db::lock_connection,
    expense::{
        EXPENSE_NAME_MAX_LENGTH, Expense, ExpenseId, ExpenseOrigin, ExpenseUpdate, NewExpense,
        create_expense, delete_expense, get_expenses_for_month, update_expense,
    },
    validation::{validate_amount, validate_text},
};

/// The state needed for the expense endpoints.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The data for a manually entered expense.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpenseData {
    pub month_id: BudgetMonthId,
    pub category_id: CategoryId,
    pub name: String,
    pub amount_cents: i64,
    #[serde(default)]
    pub is_paid: bool,
}

/// The fields of an expense the client may change.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpenseUpdateData {
    pub name: Option<String>,
    pub amount_cents: Option<i64>,
    pub category_id: Option<CategoryId>,
    pub is_paid: Option<bool>,
}

fn validate_name(name: &str) -> Result<String, Error> {
    validate_text("expense name", name, 1, EXPENSE_NAME_MAX_LENGTH)
}

/// Create a manual expense in one of the user's months.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Json(data): Json<ExpenseData>,
) -> Result<(StatusCode, Json<Expense>), Error> {
    let new_expense = NewExpense {
        month_id: data.month_id,
        category_id: data.category_id,
        name: validate_name(&data.name)?,
        amount_cents: validate_amount("amount", data.amount_cents)?,
        origin: ExpenseOrigin::Manual,
        is_paid: data.is_paid,
        recurring_expense_id: None,
    };
    let connection = lock_connection(&state.db_connection)?;

    let expense = create_expense(user_id, new_expense, &connection)?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// List the expenses of one of the user's months.
pub async fn list_month_expenses_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(month_id): Path<BudgetMonthId>,
) -> Result<Json<Vec<Expense>>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    get_budget_month(user_id, month_id, &connection)?;

    get_expenses_for_month(user_id, month_id, &connection).map(Json)
}

/// Update the name, amount, category or paid flag of an expense.
pub async fn update_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
    Json(data): Json<ExpenseUpdateData>,
) -> Result<Json<Expense>, Error> {
    let update = ExpenseUpdate {
        name: data.name.as_deref().map(validate_name).transpose()?,
        amount_cents: data
            .amount_cents
            .map(|cents| validate_amount("amount", cents))
            .transpose()?,
        category_id: data.category_id,
        is_paid: data.is_paid,
    };
    let connection = lock_connection(&state.db_connection)?;

    update_expense(user_id, expense_id, &update, &connection).map(Json)
}

/// Delete an expense.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_expense(user_id, expense_id, &connection).map(|_| StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod expense_endpoint_tests {
    use axum::http::StatusCode;
    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::{
        BudgetMonth,
        category::Category,
        endpoints::{self, format_endpoint},
        expense::{Expense, ExpenseOrigin},
        test_utils::{get_test_server, register_test_user},
    };

    async fn setup(server: &TestServer, cookie: Cookie<'static>) -> (BudgetMonth, Category) {
        let month: BudgetMonth = server
            .get(&format_endpoint(endpoints::MONTH, "2025-10"))
            .add_cookie(cookie.clone())
            .await
            .json();
        let category: Category = server
            .post(endpoints::CATEGORIES)
            .add_cookie(cookie)
            .json(&json!({ "name": "Food" }))
            .await
            .json();

        (month, category)
    }

    async fn post_bread(
        server: &TestServer,
        cookie: Cookie<'static>,
        month: &BudgetMonth,
        category: &Category,
    ) -> Expense {
        let response = server
            .post(endpoints::EXPENSES)
            .add_cookie(cookie)
            .json(&json!({
                "month_id": month.id,
                "category_id": category.id,
                "name": "Bread",
                "amount_cents": 450
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    #[tokio::test]
    async fn create_expense_is_manual_and_unpaid() {
        let server = get_test_server();
        let cookie = register_test_user(&server, "alice").await;
        let (month, category) = setup(&server, cookie.clone()).await;

        let expense = post_bread(&server, cookie.clone(), &month, &category).await;

        assert_eq!(expense.origin, ExpenseOrigin::Manual);
        assert!(!expense.is_paid);
        let listed: Vec<Expense> = server
            .get(&format_endpoint(endpoints::BUDGET_MONTH_EXPENSES, month.id))
            .add_cookie(cookie)
            .await
            .json();
        assert_eq!(listed, vec![expense]);
    }

    #[tokio::test]
    async fn create_expense_validates_input() {
        let server = get_test_server();
        let cookie = register_test_user(&server, "alice").await;
        let (month, category) = setup(&server, cookie.clone()).await;

        let long_name = "x".repeat(71);

        for (name, amount_cents) in [("", 100), ("Bread", -1), (long_name.as_str(), 100)] {
            server
                .post(endpoints::EXPENSES)
                .add_cookie(cookie.clone())
                .json(&json!({
                    "month_id": month.id,
                    "category_id": category.id,
                    "name": name,
                    "amount_cents": amount_cents
                }))
                .await
                .assert_status_bad_request();
        }
    }

    #[tokio::test]
    async fn cannot_add_expense_to_other_users_month() {
        let server = get_test_server();
        let alice = register_test_user(&server, "alice").await;
        let bob = register_test_user(&server, "bob").await;
        let (alices_month, _) = setup(&server, alice).await;
        let (_, bobs_category) = setup(&server, bob.clone()).await;

        let response = server
            .post(endpoints::EXPENSES)
            .add_cookie(bob.clone())
            .json(&json!({
                "month_id": alices_month.id,
                "category_id": bobs_category.id,
                "name": "Bread",
                "amount_cents": 450
            }))
            .await;

        response.assert_status_not_found();
        server
            .get(&format_endpoint(endpoints::BUDGET_MONTH_EXPENSES, alices_month.id))
            .add_cookie(bob)
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn patch_marks_expense_paid() {
        let server = get_test_server();
        let cookie = register_test_user(&server, "alice").await;
        let (month, category) = setup(&server, cookie.clone()).await;
        let expense = post_bread(&server, cookie.clone(), &month, &category).await;

        let response = server
            .patch(&format_endpoint(endpoints::EXPENSE, expense.id))
            .add_cookie(cookie)
            .json(&json!({ "is_paid": true, "name": "Rye bread" }))
            .await;

        response.assert_status_ok();
        let updated: Value = response.json();
        assert_eq!(updated["is_paid"], true);
        assert_eq!(updated["name"], "Rye bread");
        assert_eq!(updated["amount_cents"], 450);
    }

    #[tokio::test]
    async fn delete_expense_succeeds_once() {
        let server = get_test_server();
        let cookie = register_test_user(&server, "alice").await;
        let (month, category) = setup(&server, cookie.clone()).await;
        let expense = post_bread(&server, cookie.clone(), &month, &category).await;
        let path = format_endpoint(endpoints::EXPENSE, expense.id);

        server
            .delete(&path)
            .add_cookie(cookie.clone())
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .delete(&path)
            .add_cookie(cookie)
            .await
            .assert_status_not_found();
    }
}
