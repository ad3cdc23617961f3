//! Application router configuration for the HTML pages and the JSON API.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    budget::{
        create_budget_api_endpoint, create_budget_endpoint, delete_budget_api_endpoint,
        delete_budget_endpoint, get_budgets_page, list_budgets_endpoint, update_budget_endpoint,
    },
    charts_page::get_charts_page,
    dashboard::{get_dashboard_page, get_dashboard_summary_endpoint},
    dummy_data::{dummy_data_endpoint, populate_test_db_endpoint, test_db_status_endpoint},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    logging::logging_middleware,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_api_endpoint, create_transaction_endpoint,
        delete_transaction_api_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        get_transactions_page, list_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(
            endpoints::TRANSACTIONS_VIEW,
            get(get_transactions_page).post(create_transaction_endpoint),
        )
        .route(
            endpoints::DELETE_TRANSACTION_VIEW,
            delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::BUDGETS_VIEW,
            get(get_budgets_page).post(create_budget_endpoint),
        )
        .route(
            endpoints::DELETE_BUDGET_VIEW,
            delete(delete_budget_endpoint),
        )
        .route(endpoints::CHARTS_VIEW, get(get_charts_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint).post(create_transaction_api_endpoint),
        )
        .route(
            endpoints::TRANSACTION_API,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_api_endpoint),
        )
        .route(
            endpoints::BUDGETS_API,
            get(list_budgets_endpoint).post(create_budget_api_endpoint),
        )
        .route(
            endpoints::BUDGET_API,
            put(update_budget_endpoint).delete(delete_budget_api_endpoint),
        )
        .route(endpoints::DASHBOARD_API, get(get_dashboard_summary_endpoint))
        .route(
            endpoints::TEST_DB_API,
            get(test_db_status_endpoint).post(populate_test_db_endpoint),
        )
        .route(endpoints::DUMMY_DATA_API, get(dummy_data_endpoint));

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, build_router, endpoints};

    fn get_test_server() -> TestServer {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "Etc/UTC").unwrap();

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let server = get_test_server();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::DASHBOARD_VIEW);
    }

    #[tokio::test]
    async fn pages_render() {
        let server = get_test_server();

        for page in [
            endpoints::DASHBOARD_VIEW,
            endpoints::TRANSACTIONS_VIEW,
            endpoints::BUDGETS_VIEW,
            endpoints::CHARTS_VIEW,
        ] {
            let response = server.get(page).await;

            assert_eq!(response.status_code(), StatusCode::OK, "GET {page}");
            assert!(response.text().contains("<html"), "GET {page}");
        }
    }

    #[tokio::test]
    async fn error_page_is_server_error() {
        let server = get_test_server();

        let response = server.get(endpoints::INTERNAL_ERROR_VIEW).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        let response = server.get("/accounts").await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn populated_data_is_visible_through_the_api() {
        let server = get_test_server();

        server
            .post(endpoints::TEST_DB_API)
            .await
            .assert_status(StatusCode::CREATED);

        let transactions = server.get(endpoints::TRANSACTIONS_API).await.json::<Value>();
        let summary = server.get(endpoints::DASHBOARD_API).await.json::<Value>();
        assert!(!transactions.as_array().unwrap().is_empty());
        assert!(summary["totalIncome"].as_f64().unwrap() > 0.0);
        assert!(summary["totalExpense"].as_f64().unwrap() > 0.0);
    }

    #[tokio::test]
    async fn transaction_round_trip_through_the_api() {
        let server = get_test_server();

        let created = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "amount": 42.5,
                "description": "Groceries",
                "category": "Food",
                "type": "expense",
                "date": "2025-07-15",
            }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let id = created.json::<Value>()["id"].as_i64().unwrap();

        let path = endpoints::format_endpoint(endpoints::TRANSACTION_API, id);
        let fetched = server.get(&path).await.json::<Value>();
        assert_eq!(fetched["description"], "Groceries");

        server.delete(&path).await.assert_status_ok();
        server.get(&path).await.assert_status_not_found();
    }
}
