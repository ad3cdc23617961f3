//! Totals shown at the top of the dashboard.

use std::collections::BTreeMap;

use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error,
    aggregation::percentage_of,
    category::{Category, TransactionType},
    transaction::{Transaction, get_latest_transactions},
};

/// How many of the latest transactions the summary is computed over.
pub const SUMMARY_TRANSACTION_LIMIT: u32 = 100;

/// How many transactions are listed as recent.
pub const RECENT_TRANSACTION_COUNT: usize = 5;

/// The money spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    /// The expense category.
    pub category: Category,
    /// The category's spending for the month.
    pub total: f64,
}

/// Income, spending and the most recent transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expense: f64,
    /// The newest transactions, newest first.
    pub recent_transactions: Vec<Transaction>,
    /// Expenses per category, in category order. Categories without spending are left out.
    pub category_breakdown: Vec<CategoryBreakdown>,
}

impl DashboardSummary {
    /// Summarize `transactions`, which must be sorted newest first.
    pub fn new(transactions: &[Transaction]) -> Self {
        let mut category_totals: BTreeMap<Category, f64> = BTreeMap::new();
        let mut total_income = 0.0;
        let mut total_expense = 0.0;

        for transaction in transactions {
            match transaction.transaction_type {
                TransactionType::Income => total_income += transaction.amount,
                TransactionType::Expense => {
                    total_expense += transaction.amount;
                    *category_totals.entry(transaction.category).or_default() += transaction.amount;
                }
            }
        }

        let category_breakdown = category_totals
            .into_iter()
            .map(|(category, total)| CategoryBreakdown { category, total })
            .collect();

        Self {
            total_income,
            total_expense,
            recent_transactions: transactions
                .iter()
                .take(RECENT_TRANSACTION_COUNT)
                .cloned()
                .collect(),
            category_breakdown,
        }
    }

    /// Income minus expenses.
    pub fn net(&self) -> f64 {
        self.total_income - self.total_expense
    }

    /// The share of income left over after expenses, as a percentage.
    ///
    /// Returns 0 when there is no income.
    pub fn savings_rate(&self) -> f64 {
        percentage_of(self.net(), self.total_income)
    }
}

/// Summarize the latest [SUMMARY_TRANSACTION_LIMIT] transactions.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_dashboard_summary(connection: &Connection) -> Result<DashboardSummary, Error> {
    get_latest_transactions(SUMMARY_TRANSACTION_LIMIT, connection)
        .map(|transactions| DashboardSummary::new(&transactions))
}
