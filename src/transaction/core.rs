//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    category::{Category, TransactionType},
    database_id::TransactionId,
    date_format::{iso_date, timestamp},
};

/// The maximum number of characters in a transaction description.
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

/// The smallest amount a transaction can have.
pub const MIN_AMOUNT: f64 = 0.01;

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [NewTransaction::new] and [create_transaction].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent or earned, always positive.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// What the money was spent on or where it came from.
    pub category: Category,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// When the transaction was recorded.
    #[serde(with = "timestamp")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last changed.
    #[serde(with = "timestamp")]
    pub updated_at: OffsetDateTime,
}

/// A validated transaction that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    amount: f64,
    description: String,
    category: Category,
    date: Date,
    transaction_type: TransactionType,
    created_at: OffsetDateTime,
}

impl NewTransaction {
    /// Validate the fields of a new transaction.
    ///
    /// The description is trimmed of surrounding whitespace. The creation time
    /// defaults to now, see [NewTransaction::created_at] to override it.
    ///
    /// # Errors
    /// Returns an [Error::InvalidAmount] if `amount` is less than 0.01, or an
    /// [Error::EmptyDescription] or [Error::DescriptionTooLong] if the trimmed
    /// description is empty or longer than [MAX_DESCRIPTION_LENGTH] characters.
    pub fn new(
        amount: f64,
        description: &str,
        category: Category,
        date: Date,
        transaction_type: TransactionType,
    ) -> Result<Self, Error> {
        Ok(Self {
            amount: validate_amount(amount)?,
            description: validate_description(description)?,
            category,
            date,
            transaction_type,
            created_at: OffsetDateTime::now_utc(),
        })
    }

    /// Set when the transaction was recorded.
    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = created_at;
        self
    }
}

/// The fields to change on an existing transaction. Missing fields are left as is.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    /// The new amount.
    #[serde(default)]
    pub amount: Option<f64>,
    /// The new description.
    #[serde(default)]
    pub description: Option<String>,
    /// The new category.
    #[serde(default)]
    pub category: Option<Category>,
    /// The new date.
    #[serde(default, with = "iso_date::option")]
    pub date: Option<Date>,
    /// The new type.
    #[serde(default, rename = "type")]
    pub transaction_type: Option<TransactionType>,
}

fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount >= MIN_AMOUNT {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount(amount))
    }
}

fn validate_description(description: &str) -> Result<String, Error> {
    let description = description.trim();
    let length = description.chars().count();

    if length == 0 {
        Err(Error::EmptyDescription)
    } else if length > MAX_DESCRIPTION_LENGTH {
        Err(Error::DescriptionTooLong(length))
    } else {
        Ok(description.to_owned())
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const SELECT_COLUMNS: &str =
    "id, amount, description, category, date, type, created_at, updated_at";

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL CHECK (amount > 0),
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_category ON \"transaction\"(category);",
        (),
    )?;
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_type ON \"transaction\"(type);",
        (),
    )?;

    Ok(())
}

/// Save a new transaction to the database.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let created = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\"
                (amount, description, category, date, type, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            params![
                transaction.amount,
                transaction.description,
                transaction.category,
                transaction.date,
                transaction.transaction_type,
                transaction.created_at,
            ],
            map_transaction_row,
        )?;

    Ok(created)
}

/// Save many transactions in a single SQL transaction.
///
/// Either all of the transactions are saved or none are.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn insert_transactions(
    transactions: &[NewTransaction],
    connection: &Connection,
) -> Result<usize, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    {
        let mut statement = sql_transaction.prepare(
            "INSERT INTO \"transaction\"
                (amount, description, category, date, type, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        )?;

        for transaction in transactions {
            statement.execute(params![
                transaction.amount,
                transaction.description,
                transaction.category,
                transaction.date,
                transaction.transaction_type,
                transaction.created_at,
            ])?;
        }
    }

    sql_transaction.commit()?;

    Ok(transactions.len())
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Get every transaction, newest first.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\" ORDER BY date DESC, id DESC"
        ))?
        .query_map([], map_transaction_row)?
        .map(|result| result.map_err(Error::from))
        .collect()
}

/// Get the `limit` most recent transactions, newest first.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_latest_transactions(
    limit: u32,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\"
             ORDER BY date DESC, id DESC
             LIMIT :limit"
        ))?
        .query_map(&[(":limit", &limit)], map_transaction_row)?
        .map(|result| result.map_err(Error::from))
        .collect()
}

/// Get the transactions in `category`, newest first.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_transactions_by_category(
    category: Category,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\"
             WHERE category = :category
             ORDER BY date DESC, id DESC"
        ))?
        .query_map(&[(":category", &category)], map_transaction_row)?
        .map(|result| result.map_err(Error::from))
        .collect()
}

/// Get the transactions dated between `start` and `end` inclusive, newest first.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_transactions_in_range(
    start: Date,
    end: Date,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM \"transaction\"
             WHERE date BETWEEN :start AND :end
             ORDER BY date DESC, id DESC"
        ))?
        .query_map(&[(":start", &start), (":end", &end)], map_transaction_row)?
        .map(|result| result.map_err(Error::from))
        .collect()
}

/// Apply `update` to the transaction with `id`.
///
/// The updated fields go through the same validation as new transactions.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction,
/// - a validation error if an updated field is invalid,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    update: TransactionUpdate,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let existing = match get_transaction(id, connection) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::UpdateMissingTransaction),
        Err(error) => return Err(error),
    };

    let amount = match update.amount {
        Some(amount) => validate_amount(amount)?,
        None => existing.amount,
    };
    let description = match update.description {
        Some(description) => validate_description(&description)?,
        None => existing.description,
    };
    let category = update.category.unwrap_or(existing.category);
    let date = update.date.unwrap_or(existing.date);
    let transaction_type = update.transaction_type.unwrap_or(existing.transaction_type);

    let updated = connection
        .prepare(&format!(
            "UPDATE \"transaction\"
             SET amount = ?1, description = ?2, category = ?3, date = ?4, type = ?5,
                 updated_at = ?6
             WHERE id = ?7
             RETURNING {SELECT_COLUMNS}"
        ))?
        .query_row(
            params![
                amount,
                description,
                category,
                date,
                transaction_type,
                OffsetDateTime::now_utc(),
                id,
            ],
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => error.into(),
        })?;

    Ok(updated)
}

/// Delete the transaction with `id`.
///
/// # Errors
/// Returns an [Error::DeleteMissingTransaction] if `id` does not refer to a
/// transaction, or an [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        Err(Error::DeleteMissingTransaction)
    } else {
        Ok(())
    }
}

/// Delete every transaction, returning the number of rows deleted.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn delete_all_transactions(connection: &Connection) -> Result<usize, Error> {
    connection
        .execute("DELETE FROM \"transaction\"", ())
        .map_err(Error::from)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        amount: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        date: row.get(4)?,
        transaction_type: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod validation_tests {
    use time::macros::date;

    use crate::{
        Category, Error, TransactionType,
        transaction::{MAX_DESCRIPTION_LENGTH, NewTransaction},
    };

    fn new_expense(amount: f64, description: &str) -> Result<NewTransaction, Error> {
        NewTransaction::new(
            amount,
            description,
            Category::Food,
            date!(2025 - 07 - 01),
            TransactionType::Expense,
        )
    }

    #[test]
    fn accepts_minimum_amount() {
        assert!(new_expense(0.01, "Coffee").is_ok());
    }

    #[test]
    fn rejects_amounts_below_minimum() {
        for amount in [0.0, 0.009, -5.0, f64::NAN, f64::INFINITY] {
            let result = new_expense(amount, "Coffee");

            assert!(
                matches!(result, Err(Error::InvalidAmount(_))),
                "want invalid amount error for {amount}, got {result:?}"
            );
        }
    }

    #[test]
    fn trims_description() {
        let transaction = new_expense(1.0, "  Coffee  ").unwrap();

        assert_eq!(transaction.description, "Coffee");
    }

    #[test]
    fn rejects_blank_description() {
        assert_eq!(new_expense(1.0, "   "), Err(Error::EmptyDescription));
    }

    #[test]
    fn rejects_long_description() {
        let description = "a".repeat(MAX_DESCRIPTION_LENGTH + 1);

        assert_eq!(
            new_expense(1.0, &description),
            Err(Error::DescriptionTooLong(MAX_DESCRIPTION_LENGTH + 1))
        );
        assert!(new_expense(1.0, &"a".repeat(MAX_DESCRIPTION_LENGTH)).is_ok());
    }
}
