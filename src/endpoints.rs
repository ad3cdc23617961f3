//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/budgets/{budget_id}', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page with the financial overview.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for listing and creating transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The route for deleting a transaction from the transactions page.
pub const DELETE_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}";
/// The page for listing and creating monthly budgets.
pub const BUDGETS_VIEW: &str = "/budgets";
/// The route for deleting a budget from the budgets page.
pub const DELETE_BUDGET_VIEW: &str = "/budgets/{budget_id}";
/// The page showing every chart kind.
pub const CHARTS_VIEW: &str = "/charts";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to list and create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION_API: &str = "/api/transactions/{transaction_id}";
/// The route to list and create budgets.
pub const BUDGETS_API: &str = "/api/budgets";
/// The route to access a single budget.
pub const BUDGET_API: &str = "/api/budgets/{budget_id}";
/// The route for the dashboard summary.
pub const DASHBOARD_API: &str = "/api/dashboard";
/// The route to populate the database with dummy data and inspect its contents.
pub const TEST_DB_API: &str = "/api/test-db";
/// The route to preview generated dummy data without saving it.
pub const DUMMY_DATA_API: &str = "/api/dummy-data";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/budgets/{budget_id}', '{budget_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
