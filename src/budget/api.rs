//! JSON route handlers for budgets.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, Error,
    budget::core::{
        Budget, BudgetUpdate, NewBudget, create_budget, delete_budget, get_budgets, update_budget,
    },
    category::Category,
    database_id::BudgetId,
    month::YearMonth,
    transaction::json_rejection_response,
};

/// The state needed by the budget API.
#[derive(Debug, Clone)]
pub struct BudgetApiState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for listing budgets.
#[derive(Debug, Default, Deserialize)]
pub struct BudgetsQuery {
    /// Only list budgets for this month, written `YYYY-MM`.
    #[serde(default)]
    pub month: Option<String>,
}

impl BudgetsQuery {
    /// Parse the month filter. An empty month means no filter.
    fn month_filter(&self) -> Result<Option<YearMonth>, Error> {
        match self.month.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(month) => month.parse().map(Some),
        }
    }
}

/// The JSON body for creating a budget.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetRequest {
    /// The category to budget for.
    pub category: Category,
    /// The spending limit.
    pub amount: f64,
    /// How much has already been spent, defaults to zero.
    #[serde(default)]
    pub spent: f64,
    /// The month the budget applies to.
    pub month: YearMonth,
}

/// List budgets, optionally only those for the month given in the query string.
pub async fn list_budgets_endpoint(
    State(state): State<BudgetApiState>,
    Query(query): Query<BudgetsQuery>,
) -> Response {
    let month = match query.month_filter() {
        Ok(month) => month,
        Err(error) => return error.into_json_response("Failed to fetch budgets"),
    };

    let result = state
        .db_connection
        .lock()
        .map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
        .and_then(|connection| get_budgets(month, &connection));

    match result {
        Ok(budgets) => Json(budgets).into_response(),
        Err(error) => error.into_json_response("Failed to fetch budgets"),
    }
}

/// Validate and save a new budget, responding with the saved budget.
pub async fn create_budget_api_endpoint(
    State(state): State<BudgetApiState>,
    body: Result<Json<CreateBudgetRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return json_rejection_response(rejection),
    };

    match create_from_request(request, &state) {
        Ok(budget) => (StatusCode::CREATED, Json(budget)).into_response(),
        Err(error) => error.into_json_response("Failed to create budget"),
    }
}

fn create_from_request(request: CreateBudgetRequest, state: &BudgetApiState) -> Result<Budget, Error> {
    let budget = NewBudget::new(
        request.category,
        request.amount,
        request.spent,
        request.month,
    )?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    create_budget(budget, &connection)
}

/// Change some of the fields of a budget.
pub async fn update_budget_endpoint(
    State(state): State<BudgetApiState>,
    Path(budget_id): Path<BudgetId>,
    body: Result<Json<BudgetUpdate>, JsonRejection>,
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
        .and_then(|connection| update_budget(budget_id, update, &connection));

    match result {
        Ok(budget) => Json(budget).into_response(),
        Err(error) => error.into_json_response("Error updating budget"),
    }
}

/// Delete a budget.
pub async fn delete_budget_api_endpoint(
    State(state): State<BudgetApiState>,
    Path(budget_id): Path<BudgetId>,
) -> Response {
    let result = state
        .db_connection
        .lock()
        .map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
        .and_then(|connection| delete_budget(budget_id, &connection));

    match result {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(error) => error.into_json_response("Error deleting budget"),
    }
}
