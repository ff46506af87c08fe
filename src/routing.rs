//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::{
    AppState,
    auth::{auth_guard, post_log_in, post_log_out, register_user},
    budget_month::{get_month_endpoint, sync_budget_month_endpoint, update_budget_month_endpoint},
    category::{
        create_category_endpoint, delete_category_endpoint, list_categories_endpoint,
        update_category_endpoint,
    },
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, list_month_expenses_endpoint,
        update_expense_endpoint,
    },
    not_found::get_404_not_found,
    profile::{get_profile_endpoint, update_profile_endpoint},
    recurring_expense::{
        create_recurring_expense_endpoint, delete_recurring_expense_endpoint,
        list_recurring_expenses_endpoint, update_recurring_expense_endpoint,
    },
    summary::{get_month_summary_endpoint, get_year_summary_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::USERS, post(register_user))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::LOG_OUT, post(post_log_out));

    let protected_routes = Router::new()
        .route(
            endpoints::PROFILE,
            get(get_profile_endpoint).patch(update_profile_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            patch(update_category_endpoint).delete(delete_category_endpoint),
        )
        .route(endpoints::MONTH, get(get_month_endpoint))
        .route(endpoints::BUDGET_MONTH, patch(update_budget_month_endpoint))
        .route(
            endpoints::BUDGET_MONTH_SYNC,
            post(sync_budget_month_endpoint),
        )
        .route(
            endpoints::BUDGET_MONTH_SUMMARY,
            get(get_month_summary_endpoint),
        )
        .route(
            endpoints::BUDGET_MONTH_EXPENSES,
            get(list_month_expenses_endpoint),
        )
        .route(endpoints::EXPENSES, post(create_expense_endpoint))
        .route(
            endpoints::EXPENSE,
            patch(update_expense_endpoint).delete(delete_expense_endpoint),
        )
        .route(
            endpoints::RECURRING_EXPENSES,
            get(list_recurring_expenses_endpoint).post(create_recurring_expense_endpoint),
        )
        .route(
            endpoints::RECURRING_EXPENSE,
            patch(update_recurring_expense_endpoint).delete(delete_recurring_expense_endpoint),
        )
        .route(endpoints::YEAR_SUMMARY, get(get_year_summary_endpoint))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}
