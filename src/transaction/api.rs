//! JSON route handlers for reading and writing transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{
        FromRef, Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;
use time::Date;

use crate::{
    AppState, Error,
    category::{Category, TransactionType},
    database_id::TransactionId,
    date_format::iso_date,
    timezone::get_local_date,
    transaction::core::{
        NewTransaction, Transaction, TransactionUpdate, create_transaction, delete_transaction,
        get_all_transactions, get_transaction, get_transactions_in_range, update_transaction,
    },
};

/// The state needed by the transaction API.
#[derive(Debug, Clone)]
pub struct TransactionApiState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The JSON body for creating a transaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    /// The amount of money, at least 0.01.
    pub amount: f64,
    /// What the transaction was for.
    pub description: String,
    /// The spending or income category.
    pub category: Category,
    /// Defaults to today in the server's timezone.
    #[serde(default, with = "iso_date::option")]
    pub date: Option<Date>,
    /// Income or expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

/// Turn a rejected JSON body into a 400 response in the same shape as other API errors.
pub(crate) fn json_rejection_response(rejection: JsonRejection) -> Response {
    tracing::debug!("rejected JSON body: {rejection}");

    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": rejection.body_text() })),
    )
        .into_response()
}

/// The optional date bounds for listing transactions. Both bounds are inclusive.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionRangeQuery {
    /// The earliest date to include.
    #[serde(default, with = "iso_date::option")]
    pub from: Option<Date>,
    /// The latest date to include.
    #[serde(default, with = "iso_date::option")]
    pub to: Option<Date>,
}

/// List transactions newest first, limited to `from` and `to` when either is given.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionApiState>,
    query: Result<Query<TransactionRangeQuery>, QueryRejection>,
) -> Response {
    let Query(range) = match query {
        Ok(query) => query,
        Err(rejection) => {
            tracing::debug!("rejected query string: {rejection}");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": rejection.body_text() })),
            )
                .into_response();
        }
    };

    let result = state
        .db_connection
        .lock()
        .map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
        .and_then(|connection| match range {
            TransactionRangeQuery {
                from: None,
                to: None,
            } => get_all_transactions(&connection),
            TransactionRangeQuery { from, to } => get_transactions_in_range(
                from.unwrap_or(Date::MIN),
                to.unwrap_or(Date::MAX),
                &connection,
            ),
        });

    match result {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => error.into_json_response("Failed to fetch transactions"),
    }
}

/// Validate and save a new transaction, responding with the saved transaction.
pub async fn create_transaction_api_endpoint(
    State(state): State<TransactionApiState>,
    body: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return json_rejection_response(rejection),
    };

    let result = create_from_request(request, &state);

    match result {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(error) => error.into_json_response("Failed to create transaction"),
    }
}

fn create_from_request(
    request: CreateTransactionRequest,
    state: &TransactionApiState,
) -> Result<Transaction, Error> {
    let date = match request.date {
        Some(date) => date,
        None => get_local_date(&state.local_timezone)?,
    };
    let transaction = NewTransaction::new(
        request.amount,
        &request.description,
        request.category,
        date,
        request.transaction_type,
    )?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    create_transaction(transaction, &connection)
}

/// Get a single transaction by its ID.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionApiState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let result = state
        .db_connection
        .lock()
        .map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
        .and_then(|connection| get_transaction(transaction_id, &connection));

    match result {
        Ok(transaction) => Json(transaction).into_response(),
        Err(error) => error.into_json_response("Error fetching transaction"),
    }
}

/// Change some of the fields of a transaction.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionApiState>,
    Path(transaction_id): Path<TransactionId>,
    body: Result<Json<TransactionUpdate>, JsonRejection>,
) -> Response {
    let Json(update) = match body {
        Ok(body) => body,
        Err(rejection) => return json_rejection_response(rejection),
    };

    let result = state
        .db_connection
        .lock()
        .map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
        .and_then(|connection| update_transaction(transaction_id, update, &connection));

    match result {
        Ok(transaction) => Json(transaction).into_response(),
        Err(error) => error.into_json_response("Error updating transaction"),
    }
}

/// Delete a transaction.
pub async fn delete_transaction_api_endpoint(
    State(state): State<TransactionApiState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let result = state
        .db_connection
        .lock()
        .map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
        .and_then(|connection| delete_transaction(transaction_id, &connection));

    match result {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(error) => error.into_json_response("Error deleting transaction"),
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        AppState, Transaction, endpoints,
        transaction::api::{
            create_transaction_api_endpoint, delete_transaction_api_endpoint,
            get_transaction_endpoint, list_transactions_endpoint, update_transaction_endpoint,
        },
    };

    fn get_test_server() -> TestServer {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "Etc/UTC").unwrap();
        let app = Router::new()
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
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    async fn create_groceries(server: &TestServer) -> Transaction {
        server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "amount": 45.5,
                "description": "  Groceries  ",
                "category": "Food",
                "date": "2025-07-14",
                "type": "expense",
            }))
            .await
            .json::<Transaction>()
    }

    #[tokio::test]
    async fn create_returns_created_transaction() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "amount": 45.5,
                "description": "  Groceries  ",
                "category": "Food",
                "date": "2025-07-14",
                "type": "expense",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["id"], 1);
        assert_eq!(body["description"], "Groceries");
        assert_eq!(body["date"], "2025-07-14");
        assert_eq!(body["type"], "expense");
        assert!(body["createdAt"].is_string());
        assert!(body["updatedAt"].is_string());
    }

    #[tokio::test]
    async fn create_defaults_date_to_today() {
        let server = get_test_server();
        let today = time::OffsetDateTime::now_utc().date();

        let transaction = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "amount": 3000,
                "description": "Salary",
                "category": "Salary",
                "type": "income",
            }))
            .await
            .json::<Transaction>();

        assert_eq!(transaction.date, today);
    }

    #[tokio::test]
    async fn create_rejects_invalid_amount() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "amount": 0,
                "description": "Nothing",
                "category": "Food",
                "type": "expense",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn create_rejects_unknown_category() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "amount": 10,
                "description": "Dinner",
                "category": "Dining",
                "type": "expense",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_returns_created_transactions() {
        let server = get_test_server();
        let created = create_groceries(&server).await;

        let transactions = server
            .get(endpoints::TRANSACTIONS_API)
            .await
            .json::<Vec<Transaction>>();

        assert_eq!(transactions, vec![created]);
    }

    #[tokio::test]
    async fn list_filters_by_date_range() {
        let server = get_test_server();
        for date in ["2025-06-30", "2025-07-01", "2025-07-31", "2025-08-01"] {
            server
                .post(endpoints::TRANSACTIONS_API)
                .json(&json!({
                    "amount": 10,
                    "description": date,
                    "category": "Food",
                    "date": date,
                    "type": "expense",
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let july = server
            .get(endpoints::TRANSACTIONS_API)
            .add_query_param("from", "2025-07-01")
            .add_query_param("to", "2025-07-31")
            .await
            .json::<Vec<Transaction>>();
        let from_july = server
            .get(endpoints::TRANSACTIONS_API)
            .add_query_param("from", "2025-07-01")
            .await
            .json::<Vec<Transaction>>();

        let descriptions: Vec<&str> = july
            .iter()
            .map(|transaction| transaction.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["2025-07-31", "2025-07-01"]);
        assert_eq!(from_july.len(), 3);
    }

    #[tokio::test]
    async fn list_rejects_malformed_date() {
        let server = get_test_server();

        let response = server
            .get(endpoints::TRANSACTIONS_API)
            .add_query_param("from", "July")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn get_missing_transaction_is_not_found() {
        let server = get_test_server();

        let response = server.get("/api/transactions/99").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>(), json!({ "error": "Not found" }));
    }

    #[tokio::test]
    async fn update_changes_given_fields() {
        let server = get_test_server();
        let created = create_groceries(&server).await;

        let updated = server
            .put(&format!("/api/transactions/{}", created.id))
            .json(&json!({ "amount": 50.0 }))
            .await
            .json::<Transaction>();

        assert_eq!(updated.amount, 50.0);
        assert_eq!(updated.description, created.description);
    }

    #[tokio::test]
    async fn delete_removes_transaction() {
        let server = get_test_server();
        let created = create_groceries(&server).await;
        let path = format!("/api/transactions/{}", created.id);

        let response = server.delete(&path).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({ "success": true }));
        server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
        server.delete(&path).await.assert_status(StatusCode::NOT_FOUND);
    }
}
