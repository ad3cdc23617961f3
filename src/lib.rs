//! Money Manager is a web app for tracking income, expenses and monthly
//! category budgets.
//!
//! This library provides a JSON API and server-rendered HTML pages, plus a
//! generator for consistent synthetic financial data used for demos.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod aggregation;
mod alert;
mod app_state;
mod budget;
mod category;
mod charts;
mod charts_page;
mod dashboard;
mod database_id;
mod date_format;
mod db;
mod dummy_data;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod month;
mod navigation;
mod not_found;
mod routing;
mod savings;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use aggregation::{
    BudgetVsActual, CategoryTotal, ChartPoint, MonthlyTrend, budget_vs_actual, expense_categories,
    monthly_income_expense, monthly_trends, percentage_of, previous_months, spending_by_category,
    total_expenses, total_income,
};
pub use app_state::AppState;
pub use budget::{Budget, BudgetUpdate, NewBudget, create_budget};
pub use category::{Category, ExpenseCategory, ExpenseMap, TransactionType};
pub use dashboard::{CategoryBreakdown, DashboardSummary, get_dashboard_summary};
pub use db::initialize as initialize_db;
pub use dummy_data::{
    DummyBudget, DummyData, DummyTransaction, FinancialProfile, PopulateSummary,
    generate_consistent_dummy_data, generate_consistent_dummy_data_with_rng, populate_database,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use month::YearMonth;
pub use routing::build_router;
pub use savings::{GoalCategory, SavingsGoal, sample_savings_goals};
pub use transaction::{
    NewTransaction, Transaction, TransactionUpdate, create_transaction, get_transactions_in_range,
};

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transaction amount was zero, negative or not a finite number.
    #[error("{0} is not a valid amount, amounts must be at least 0.01")]
    InvalidAmount(f64),

    /// A transaction was given an empty description.
    #[error("Description cannot be empty")]
    EmptyDescription,

    /// A transaction description was longer than the allowed number of characters.
    #[error("Description cannot exceed {max} characters, got {0}", max = transaction::MAX_DESCRIPTION_LENGTH)]
    DescriptionTooLong(usize),

    /// A budget amount was negative or not a finite number.
    #[error("{0} is not a valid budget amount, budget amounts must be non-negative")]
    InvalidBudgetAmount(f64),

    /// A budget's spent amount was negative or not a finite number.
    #[error("{0} is not a valid spent amount, spent amounts must be non-negative")]
    InvalidSpentAmount(f64),

    /// A month string did not match the `YYYY-MM` format.
    #[error("\"{0}\" is not a valid month, months must be in YYYY-MM format")]
    InvalidMonth(String),

    /// A string did not name one of the fixed categories.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// A string was neither "income" nor "expense".
    #[error("\"{0}\" is not a valid transaction type")]
    InvalidTransactionType(String),

    /// A budget for the category and month already exists.
    ///
    /// Only one budget may exist per category per month.
    #[error("a budget for {category} in {month} already exists")]
    DuplicateBudget {
        /// The category of the existing budget.
        category: Category,
        /// The month of the existing budget.
        month: YearMonth,
    },

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a budget that does not exist
    #[error("tried to update a budget that is not in the database")]
    UpdateMissingBudget,

    /// Tried to delete a budget that does not exist
    #[error("tried to delete a budget that is not in the database")]
    DeleteMissingBudget,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Whether the error was caused by invalid input from the client.
    fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidAmount(_)
                | Error::EmptyDescription
                | Error::DescriptionTooLong(_)
                | Error::InvalidBudgetAmount(_)
                | Error::InvalidSpentAmount(_)
                | Error::InvalidMonth(_)
                | Error::InvalidCategory(_)
                | Error::InvalidTransactionType(_)
        )
    }

    /// Convert the error into a JSON response of the form `{"error": "..."}`.
    ///
    /// Internal errors are logged and replaced with `fallback_message` so that
    /// server details are not leaked to the client.
    fn into_json_response(self, fallback_message: &str) -> Response {
        let (status_code, message) = match &self {
            error if error.is_validation_error() => (StatusCode::BAD_REQUEST, error.to_string()),
            Error::DuplicateBudget { .. } => (StatusCode::CONFLICT, self.to_string()),
            Error::NotFound
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::UpdateMissingBudget
            | Error::DeleteMissingBudget => (StatusCode::NOT_FOUND, "Not found".to_owned()),
            error => {
                tracing::error!("{fallback_message}: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    fallback_message.to_owned(),
                )
            }
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }

    fn into_alert_response(self) -> Response {
        match self {
            error if error.is_validation_error() => Alert::Error {
                message: "Invalid input".to_owned(),
                details: error.to_string(),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::DuplicateBudget { category, month } => Alert::Error {
                message: "Duplicate budget".to_owned(),
                details: format!(
                    "A budget for {category} in {month} already exists. \
                    Edit or delete the existing budget instead."
                ),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::DeleteMissingTransaction => Alert::Error {
                message: "Could not delete transaction".to_owned(),
                details: "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted."
                    .to_owned(),
            }
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DeleteMissingBudget => Alert::Error {
                message: "Could not delete budget".to_owned(),
                details: "The budget could not be found. \
                    Try refreshing the page to see if the budget has already been deleted."
                    .to_owned(),
            }
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::InvalidTimezoneError(timezone) => Alert::Error {
                message: "Invalid Timezone Settings".to_owned(),
                details: format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                }
                .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
