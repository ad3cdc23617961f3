//! Monthly category budgets and their database queries.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    category::Category,
    database_id::BudgetId,
    date_format::timestamp,
    month::YearMonth,
};

// ============================================================================
// MODELS
// ============================================================================

/// A spending limit for one category in one month.
///
/// There is at most one budget per category per month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The category the limit applies to.
    pub category: Category,
    /// The most that should be spent in the month.
    pub amount: f64,
    /// How much has been spent so far.
    pub spent: f64,
    /// The month the budget covers.
    pub month: YearMonth,
    /// When the budget was created.
    #[serde(with = "timestamp")]
    pub created_at: OffsetDateTime,
    /// When the budget was last changed.
    #[serde(with = "timestamp")]
    pub updated_at: OffsetDateTime,
}

impl Budget {
    /// How much is left to spend, negative when over budget.
    pub fn remaining(&self) -> f64 {
        self.amount - self.spent
    }

    /// The spent amount as a percentage of the budget, 0 when the budget is 0.
    pub fn percentage_used(&self) -> f64 {
        if self.amount > 0.0 {
            self.spent / self.amount * 100.0
        } else {
            0.0
        }
    }

    /// Whether more has been spent than was budgeted.
    pub fn is_over_budget(&self) -> bool {
        self.spent > self.amount
    }
}

/// A validated budget that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    category: Category,
    amount: f64,
    spent: f64,
    month: YearMonth,
    created_at: OffsetDateTime,
}

impl NewBudget {
    /// Validate the fields of a new budget.
    ///
    /// # Errors
    /// Returns an [Error::InvalidBudgetAmount] if `amount` is negative or not
    /// finite, or an [Error::InvalidSpentAmount] if the same is true of `spent`.
    pub fn new(category: Category, amount: f64, spent: f64, month: YearMonth) -> Result<Self, Error> {
        Ok(Self {
            category,
            amount: validate_budget_amount(amount)?,
            spent: validate_spent_amount(spent)?,
            month,
            created_at: OffsetDateTime::now_utc(),
        })
    }

    /// Set when the budget was created.
    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = created_at;
        self
    }
}

/// The fields to change on an existing budget. Missing fields are left as is.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdate {
    /// The new category.
    #[serde(default)]
    pub category: Option<Category>,
    /// The new spending limit.
    #[serde(default)]
    pub amount: Option<f64>,
    /// The new amount spent so far.
    #[serde(default)]
    pub spent: Option<f64>,
    /// The new month.
    #[serde(default)]
    pub month: Option<YearMonth>,
}

fn validate_budget_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidBudgetAmount(amount))
    }
}

fn validate_spent_amount(spent: f64) -> Result<f64, Error> {
    if spent.is_finite() && spent >= 0.0 {
        Ok(spent)
    } else {
        Err(Error::InvalidSpentAmount(spent))
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_COLUMNS: &str = "id, category, amount, spent, month, created_at, updated_at";

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount >= 0),
                spent REAL NOT NULL DEFAULT 0 CHECK (spent >= 0),
                month TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(category, month)
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_budget_month ON budget(month);",
        (),
    )?;

    Ok(())
}

/// Map the UNIQUE(category, month) violation to [Error::DuplicateBudget].
fn map_unique_violation(error: rusqlite::Error, category: Category, month: YearMonth) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                ..
            },
            _,
        ) => Error::DuplicateBudget { category, month },
        error => error.into(),
    }
}

/// Save a new budget to the database.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateBudget] if a budget for the same category and month exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_budget(budget: NewBudget, connection: &Connection) -> Result<Budget, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO budget (category, amount, spent, month, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            params![
                budget.category,
                budget.amount,
                budget.spent,
                budget.month,
                budget.created_at,
            ],
            map_budget_row,
        )
        .map_err(|error| map_unique_violation(error, budget.category, budget.month))
}

/// Save many budgets in a single SQL transaction.
///
/// Either all of the budgets are saved or none are.
///
/// # Errors
/// Returns an [Error::DuplicateBudget] if two budgets share a category and
/// month, or an [Error::SqlError] if there is some other SQL error.
pub fn insert_budgets(budgets: &[NewBudget], connection: &Connection) -> Result<usize, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    {
        let mut statement = sql_transaction.prepare(
            "INSERT INTO budget (category, amount, spent, month, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        )?;

        for budget in budgets {
            statement
                .execute(params![
                    budget.category,
                    budget.amount,
                    budget.spent,
                    budget.month,
                    budget.created_at,
                ])
                .map_err(|error| map_unique_violation(error, budget.category, budget.month))?;
        }
    }

    sql_transaction.commit()?;

    Ok(budgets.len())
}

/// Retrieve a budget by its `id`.
///
/// # Errors
/// Returns an [Error::NotFound] if `id` does not refer to a budget, or an
/// [Error::SqlError] if there is some other SQL error.
pub fn get_budget(id: BudgetId, connection: &Connection) -> Result<Budget, Error> {
    let budget = connection
        .prepare(&format!("SELECT {SELECT_COLUMNS} FROM budget WHERE id = :id"))?
        .query_one(&[(":id", &id)], map_budget_row)?;

    Ok(budget)
}

/// Get the budgets for `month`, or every budget if `month` is `None`.
///
/// Budgets are ordered by month, newest first, then by category.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_budgets(month: Option<YearMonth>, connection: &Connection) -> Result<Vec<Budget>, Error> {
    match month {
        Some(month) => connection
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM budget
                 WHERE month = :month
                 ORDER BY category ASC"
            ))?
            .query_map(&[(":month", &month)], map_budget_row)?
            .map(|result| result.map_err(Error::from))
            .collect(),
        None => connection
            .prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM budget ORDER BY month DESC, category ASC"
            ))?
            .query_map([], map_budget_row)?
            .map(|result| result.map_err(Error::from))
            .collect(),
    }
}

/// Apply `update` to the budget with `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingBudget] if `id` does not refer to a budget,
/// - a validation error if an updated amount is invalid,
/// - [Error::DuplicateBudget] if the new category and month clash with another budget,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_budget(
    id: BudgetId,
    update: BudgetUpdate,
    connection: &Connection,
) -> Result<Budget, Error> {
    let existing = match get_budget(id, connection) {
        Ok(budget) => budget,
        Err(Error::NotFound) => return Err(Error::UpdateMissingBudget),
        Err(error) => return Err(error),
    };

    let category = update.category.unwrap_or(existing.category);
    let amount = match update.amount {
        Some(amount) => validate_budget_amount(amount)?,
        None => existing.amount,
    };
    let spent = match update.spent {
        Some(spent) => validate_spent_amount(spent)?,
        None => existing.spent,
    };
    let month = update.month.unwrap_or(existing.month);

    connection
        .prepare(&format!(
            "UPDATE budget
             SET category = ?1, amount = ?2, spent = ?3, month = ?4, updated_at = ?5
             WHERE id = ?6
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            params![
                category,
                amount,
                spent,
                month,
                OffsetDateTime::now_utc(),
                id
            ],
            map_budget_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingBudget,
            error => map_unique_violation(error, category, month),
        })
}

/// Delete the budget with `id`.
///
/// # Errors
/// Returns an [Error::DeleteMissingBudget] if `id` does not refer to a
/// budget, or an [Error::SqlError] if there is some other SQL error.
pub fn delete_budget(id: BudgetId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM budget WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        Err(Error::DeleteMissingBudget)
    } else {
        Ok(())
    }
}

/// Delete every budget, returning the number of rows deleted.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn delete_all_budgets(connection: &Connection) -> Result<usize, Error> {
    connection
        .execute("DELETE FROM budget", ())
        .map_err(Error::from)
}

/// Get the total number of budgets in the database.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn count_budgets(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM budget;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        category: row.get(1)?,
        amount: row.get(2)?,
        spent: row.get(3)?,
        month: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
