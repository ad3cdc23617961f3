//! Route handlers for populating the database with dummy data and previewing it.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::{HxRefresh, HxRequest};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, Error,
    dummy_data::{
        DummyDataKind, database_status, generate_consistent_dummy_data, generate_dummy_data,
        populate_database,
    },
    timezone::get_local_date,
};

/// The state needed to populate and inspect the database.
#[derive(Debug, Clone)]
pub struct DummyDataState {
    /// The database connection to populate.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DummyDataState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Replace all transactions and budgets with freshly generated dummy data.
///
/// Requests from htmx get a full page refresh so the new data shows up,
/// other clients get a JSON summary of what was saved.
pub async fn populate_test_db_endpoint(
    State(state): State<DummyDataState>,
    HxRequest(is_htmx_request): HxRequest,
) -> Response {
    let result = get_local_date(&state.local_timezone)
        .map(generate_consistent_dummy_data)
        .and_then(|data| {
            let connection = state.db_connection.lock().map_err(|error| {
                tracing::error!("could not acquire database lock: {error}");
                Error::DatabaseLockError
            })?;

            populate_database(&connection, &data)
        });

    match result {
        Ok(_) if is_htmx_request => (HxRefresh(true), StatusCode::OK).into_response(),
        Ok(summary) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Dummy data populated successfully",
                "transactions": summary.transactions,
                "budgets": summary.budgets,
            })),
        )
            .into_response(),
        Err(error) if is_htmx_request => error.into_alert_response(),
        Err(error) => error.into_json_response("Failed to populate database"),
    }
}

/// Report how many transactions and budgets are saved.
pub async fn test_db_status_endpoint(State(state): State<DummyDataState>) -> Response {
    let result = state
        .db_connection
        .lock()
        .map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
        .and_then(|connection| database_status(&connection));

    match result {
        Ok(status) => Json(json!({
            "message": "Database status",
            "transactions": {
                "count": status.transactions,
                "hasData": status.transactions > 0,
            },
            "budgets": {
                "count": status.budgets,
                "hasData": status.budgets > 0,
            },
        }))
        .into_response(),
        Err(error) => error.into_json_response("Failed to check database"),
    }
}

/// The query parameters for previewing dummy data.
#[derive(Debug, Default, Deserialize)]
pub struct DummyDataQuery {
    /// Only generate this kind of data, or everything when missing.
    #[serde(default)]
    pub kind: Option<DummyDataKind>,
}

/// Generate dummy data without saving it.
pub async fn dummy_data_endpoint(
    State(state): State<DummyDataState>,
    query: Result<Query<DummyDataQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            tracing::debug!("rejected dummy data query: {rejection}");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "kind must be one of \"transactions\", \"budgets\" or \"chart\""
                })),
            )
                .into_response();
        }
    };

    let today = match get_local_date(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_json_response("Failed to generate dummy data"),
    };

    match query.kind {
        Some(kind) => Json(generate_dummy_data(kind, &mut rand::thread_rng(), today)).into_response(),
        None => Json(generate_consistent_dummy_data(today)).into_response(),
    }
}
