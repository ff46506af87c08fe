//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/categories/{category_id}', use [format_endpoint].

use std::fmt::Display;

/// The route to register users.
pub const USERS: &str = "/api/users";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to read and update the logged in user's profile.
pub const PROFILE: &str = "/api/profile";
/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to rename or delete a category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route to get a budget month by its "YYYY-MM" key, creating it if needed.
pub const MONTH: &str = "/api/months/{month}";
/// The route to update a budget month.
pub const BUDGET_MONTH: &str = "/api/budget_months/{month_id}";
/// The route to copy missing recurring expenses into a budget month.
pub const BUDGET_MONTH_SYNC: &str = "/api/budget_months/{month_id}/sync";
/// The route for the summary of a budget month.
pub const BUDGET_MONTH_SUMMARY: &str = "/api/budget_months/{month_id}/summary";
/// The route to list the expenses of a budget month.
pub const BUDGET_MONTH_EXPENSES: &str = "/api/budget_months/{month_id}/expenses";
/// The route to create expenses.
pub const EXPENSES: &str = "/api/expenses";
/// The route to update or delete an expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to list and create recurring expenses.
pub const RECURRING_EXPENSES: &str = "/api/recurring_expenses";
/// The route to update or delete a recurring expense.
pub const RECURRING_EXPENSE: &str = "/api/recurring_expenses/{recurring_expense_id}";
/// The route for the summary of a year, e.g. '/api/year_summary?year=2025'.
pub const YEAR_SUMMARY: &str = "/api/year_summary";

/// Replace the parameter in `endpoint_path` with `value`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/expenses/{expense_id}', '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, value: impl Display) -> String {
    let param_start = match endpoint_path.find('{') {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        value,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::USERS);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::PROFILE);
        assert_endpoint_is_valid_uri(endpoints::CATEGORIES);
        assert_endpoint_is_valid_uri(endpoints::CATEGORY);
        assert_endpoint_is_valid_uri(endpoints::MONTH);
        assert_endpoint_is_valid_uri(endpoints::BUDGET_MONTH);
        assert_endpoint_is_valid_uri(endpoints::BUDGET_MONTH_SYNC);
        assert_endpoint_is_valid_uri(endpoints::BUDGET_MONTH_SUMMARY);
        assert_endpoint_is_valid_uri(endpoints::BUDGET_MONTH_EXPENSES);
        assert_endpoint_is_valid_uri(endpoints::EXPENSES);
        assert_endpoint_is_valid_uri(endpoints::EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::RECURRING_EXPENSES);
        assert_endpoint_is_valid_uri(endpoints::RECURRING_EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::YEAR_SUMMARY);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn accepts_month_keys() {
        let formatted_path = format_endpoint(endpoints::MONTH, "2025-10");

        assert_eq!(formatted_path, "/api/months/2025-10");
    }
}
