//! Consistent synthetic financial data for demos.
//!
//! A single [FinancialProfile] is drawn per call and expanded into
//! transactions, budgets and chart points, so the three views have plausible
//! totals relative to each other:
//! - transactions cover the three most recent months,
//! - budgets cover the current and previous month,
//! - chart points cover the trailing eight months.

mod budgets;
mod chart;
mod handlers;
mod profile;
mod transactions;

use rand::Rng;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    aggregation::ChartPoint,
    budget::{Budget, NewBudget, count_budgets, delete_all_budgets, get_budgets, insert_budgets},
    transaction::{
        NewTransaction, Transaction, count_transactions, delete_all_transactions,
        get_latest_transactions, insert_transactions,
    },
};

pub use budgets::{DummyBudget, generate_budgets};
pub use chart::generate_chart;
pub use handlers::{dummy_data_endpoint, populate_test_db_endpoint, test_db_status_endpoint};
pub use profile::FinancialProfile;
pub use transactions::{DummyTransaction, TRANSACTION_MONTHS, generate_transactions};

/// The number of saved records included in the response after populating the database.
const SAMPLE_SIZE: u32 = 3;

/// Transactions, budgets and chart points generated from one profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DummyData {
    /// Transactions over the last [TRANSACTION_MONTHS] months.
    pub transactions: Vec<DummyTransaction>,
    /// Budgets for the current and previous month.
    pub budgets: Vec<DummyBudget>,
    /// Monthly totals for the income and expense chart.
    pub chart: Vec<ChartPoint>,
}

/// Generate transactions, budgets and chart points from a single random profile.
///
/// `today` decides which months the data covers.
pub fn generate_consistent_dummy_data(today: Date) -> DummyData {
    generate_consistent_dummy_data_with_rng(&mut rand::thread_rng(), today)
}

/// Like [generate_consistent_dummy_data], drawing random values from `rng`.
pub fn generate_consistent_dummy_data_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    today: Date,
) -> DummyData {
    let profile = FinancialProfile::generate(rng);

    DummyData {
        transactions: generate_transactions(&profile, today, rng),
        budgets: generate_budgets(&profile, today, rng),
        chart: generate_chart(&profile, today, rng),
    }
}

/// Generate monthly chart points from a fresh profile, for charts that have no real data to show.
pub fn generate_sample_chart(today: Date) -> Vec<ChartPoint> {
    let mut rng = rand::thread_rng();
    let profile = FinancialProfile::generate(&mut rng);

    generate_chart(&profile, today, &mut rng)
}

/// One of the views of the generated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DummyDataKind {
    /// Only the transactions.
    Transactions,
    /// Only the budgets.
    Budgets,
    /// Only the chart points.
    Chart,
}

/// A single view of freshly generated data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DummyDataView {
    /// Generated transactions.
    Transactions(Vec<DummyTransaction>),
    /// Generated budgets.
    Budgets(Vec<DummyBudget>),
    /// Generated chart points.
    Chart(Vec<ChartPoint>),
}

/// Generate only the `kind` of data asked for, from a fresh profile.
pub fn generate_dummy_data<R: Rng + ?Sized>(
    kind: DummyDataKind,
    rng: &mut R,
    today: Date,
) -> DummyDataView {
    let profile = FinancialProfile::generate(rng);

    match kind {
        DummyDataKind::Transactions => {
            DummyDataView::Transactions(generate_transactions(&profile, today, rng))
        }
        DummyDataKind::Budgets => DummyDataView::Budgets(generate_budgets(&profile, today, rng)),
        DummyDataKind::Chart => DummyDataView::Chart(generate_chart(&profile, today, rng)),
    }
}

/// The number of records of one kind and a few of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSample<T> {
    /// The total number of records saved.
    pub count: usize,
    /// The first few saved records.
    pub sample: Vec<T>,
}

/// What was saved by [populate_database].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulateSummary {
    /// The saved transactions.
    pub transactions: RecordSample<Transaction>,
    /// The saved budgets.
    pub budgets: RecordSample<Budget>,
}

/// Replace every transaction and budget in the database with `data`.
///
/// The synthetic IDs are dropped and the database assigns new ones.
///
/// # Errors
/// Returns an error if a generated record fails validation or there is an SQL error.
pub fn populate_database(connection: &Connection, data: &DummyData) -> Result<PopulateSummary, Error> {
    let transactions = data
        .transactions
        .iter()
        .map(DummyTransaction::to_new_transaction)
        .collect::<Result<Vec<NewTransaction>, Error>>()?;
    let budgets = data
        .budgets
        .iter()
        .map(DummyBudget::to_new_budget)
        .collect::<Result<Vec<NewBudget>, Error>>()?;

    let deleted_transactions = delete_all_transactions(connection)?;
    let deleted_budgets = delete_all_budgets(connection)?;
    tracing::debug!(
        "cleared {deleted_transactions} transactions and {deleted_budgets} budgets before populating"
    );

    let transaction_count = insert_transactions(&transactions, connection)?;
    let budget_count = insert_budgets(&budgets, connection)?;
    tracing::info!("populated database with {transaction_count} transactions and {budget_count} budgets");

    let mut budget_sample = get_budgets(None, connection)?;
    budget_sample.truncate(SAMPLE_SIZE as usize);

    Ok(PopulateSummary {
        transactions: RecordSample {
            count: transaction_count,
            sample: get_latest_transactions(SAMPLE_SIZE, connection)?,
        },
        budgets: RecordSample {
            count: budget_count,
            sample: budget_sample,
        },
    })
}

/// The number of saved transactions and budgets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DatabaseStatus {
    /// The number of saved transactions.
    pub transactions: u32,
    /// The number of saved budgets.
    pub budgets: u32,
}

/// Count the saved transactions and budgets.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn database_status(connection: &Connection) -> Result<DatabaseStatus, Error> {
    Ok(DatabaseStatus {
        transactions: count_transactions(connection)?,
        budgets: count_budgets(connection)?,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        dummy_data::{
            DummyDataKind, DummyDataView, database_status, generate_consistent_dummy_data,
            generate_consistent_dummy_data_with_rng, generate_dummy_data, populate_database,
        },
        transaction::get_all_transactions,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    #[test]
    fn generates_all_three_views() {
        let data = generate_consistent_dummy_data(date!(2025 - 07 - 15));

        assert!(data.transactions.len() >= 27);
        assert!(data.transactions.len() <= 42);
        assert_eq!(data.budgets.len(), 14);
        assert_eq!(data.chart.len(), 8);
    }

    #[test]
    fn same_seed_gives_same_data() {
        let today = date!(2025 - 07 - 15);

        let first = generate_consistent_dummy_data_with_rng(&mut StdRng::seed_from_u64(99), today);
        let second = generate_consistent_dummy_data_with_rng(&mut StdRng::seed_from_u64(99), today);

        assert_eq!(first, second);
    }

    #[test]
    fn different_calls_share_shape_not_values() {
        let today = date!(2025 - 07 - 15);

        let first = generate_consistent_dummy_data_with_rng(&mut StdRng::seed_from_u64(1), today);
        let second = generate_consistent_dummy_data_with_rng(&mut StdRng::seed_from_u64(2), today);

        assert_ne!(first, second);
        assert_eq!(first.budgets.len(), second.budgets.len());
        assert_eq!(first.chart.len(), second.chart.len());
        let categories = |data: &crate::DummyData| {
            data.budgets
                .iter()
                .map(|budget| budget.category)
                .collect::<HashSet<_>>()
        };
        assert_eq!(categories(&first), categories(&second));
        let periods = |data: &crate::DummyData| {
            data.chart
                .iter()
                .map(|point| point.period.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(periods(&first), periods(&second));
    }

    #[test]
    fn serializes_view_kind_as_plain_list() {
        let mut rng = StdRng::seed_from_u64(3);

        let view = generate_dummy_data(DummyDataKind::Chart, &mut rng, date!(2025 - 07 - 15));

        let DummyDataView::Chart(points) = &view else {
            panic!("want chart points, got {view:?}");
        };
        assert_eq!(points.len(), 8);
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.is_array());
        assert!(json[0]["period"].is_string());
    }

    #[test]
    fn populate_replaces_existing_records() {
        let connection = get_test_connection();
        let today = date!(2025 - 07 - 15);
        let first = generate_consistent_dummy_data_with_rng(&mut StdRng::seed_from_u64(5), today);
        let second = generate_consistent_dummy_data_with_rng(&mut StdRng::seed_from_u64(6), today);

        populate_database(&connection, &first).unwrap();
        let summary = populate_database(&connection, &second).unwrap();

        let status = database_status(&connection).unwrap();
        assert_eq!(status.transactions as usize, second.transactions.len());
        assert_eq!(status.budgets, 14);
        assert_eq!(summary.transactions.count, second.transactions.len());
        assert_eq!(summary.budgets.count, 14);
        assert_eq!(summary.transactions.sample.len(), 3);
        assert_eq!(summary.budgets.sample.len(), 3);
    }

    #[test]
    fn populated_transactions_keep_generated_values() {
        let connection = get_test_connection();
        let data = generate_consistent_dummy_data_with_rng(
            &mut StdRng::seed_from_u64(8),
            date!(2025 - 07 - 15),
        );

        populate_database(&connection, &data).unwrap();

        let saved = get_all_transactions(&connection).unwrap();
        let saved_total: f64 = saved.iter().map(|transaction| transaction.amount).sum();
        let generated_total: f64 = data
            .transactions
            .iter()
            .map(|transaction| transaction.amount)
            .sum();
        assert_eq!(saved_total, generated_total);
        assert_eq!(saved.first().map(|t| t.date), data.transactions.first().map(|t| t.date));
    }

    #[test]
    fn status_of_empty_database() {
        let connection = get_test_connection();

        let status = database_status(&connection).unwrap();

        assert_eq!(status.transactions, 0);
        assert_eq!(status.budgets, 0);
    }
}
