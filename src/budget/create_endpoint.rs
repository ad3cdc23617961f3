//! Defines the endpoint for creating a budget from the budgets page.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    budget::core::{NewBudget, create_budget},
    category::Category,
    endpoints,
    month::YearMonth,
};

/// The state needed to create a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating a budget.
#[derive(Debug, Deserialize)]
pub struct BudgetForm {
    /// The category to limit spending in.
    pub category: Category,
    /// The spending limit in dollars.
    pub amount: f64,
    /// How much has been spent already, defaults to zero.
    #[serde(default)]
    pub spent: Option<f64>,
    /// The month the budget covers.
    pub month: YearMonth,
}

/// A route handler for creating a budget, redirects to the budgets view for
/// the budget's month on success.
pub async fn create_budget_endpoint(
    State(state): State<CreateBudgetState>,
    Form(form): Form<BudgetForm>,
) -> Response {
    let budget = match NewBudget::new(
        form.category,
        form.amount,
        form.spent.unwrap_or_default(),
        form.month,
    ) {
        Ok(budget) => budget,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_budget(budget, &connection) {
        tracing::error!("could not create budget: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(format!("{}?month={}", endpoints::BUDGETS_VIEW, form.month)),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
