//! Synthetic transactions for the three most recent months.

use std::f64::consts::PI;

use rand::{
    Rng,
    distributions::{Distribution, WeightedIndex},
    seq::SliceRandom,
};
use serde::Serialize;
use time::{Date, Duration, OffsetDateTime};

use crate::{
    Error,
    category::{Category, ExpenseCategory, ExpenseMap, TransactionType},
    date_format::{iso_date, timestamp},
    dummy_data::profile::FinancialProfile,
    month::YearMonth,
    transaction::NewTransaction,
};

/// The number of months, including the current one, that transactions are generated for.
pub const TRANSACTION_MONTHS: u32 = 3;

/// A generated transaction with a synthetic ID.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DummyTransaction {
    /// A synthetic ID of the form `dummy_{YYYY}_{MM}_{income|expense}_{i}`.
    pub id: String,
    /// The amount earned or spent, a whole number of at least 1.
    pub amount: f64,
    /// Picked from the category's description templates.
    pub description: &'static str,
    /// [Category::Salary] or [Category::Other] for income, an expense category otherwise.
    pub category: Category,
    /// A day between the 1st and the 28th of the month.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// Whether the money came in or went out.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Midnight UTC on `date`.
    #[serde(with = "timestamp")]
    pub created_at: OffsetDateTime,
    /// The same as `created_at`.
    #[serde(with = "timestamp")]
    pub updated_at: OffsetDateTime,
}

impl DummyTransaction {
    /// Convert into a transaction that can be saved, dropping the synthetic ID.
    ///
    /// # Errors
    /// Returns a validation error if the amount or description is invalid.
    pub fn to_new_transaction(&self) -> Result<NewTransaction, Error> {
        NewTransaction::new(
            self.amount,
            self.description,
            self.category,
            self.date,
            self.transaction_type,
        )
        .map(|transaction| transaction.created_at(self.created_at))
    }
}

/// The income sources besides salary.
///
/// These have no category of their own and are recorded as [Category::Other].
#[derive(Debug, Clone, Copy)]
enum AuxiliaryIncome {
    Freelance,
    Investment,
    Bonus,
}

impl AuxiliaryIncome {
    const ALL: [AuxiliaryIncome; 3] = [
        AuxiliaryIncome::Freelance,
        AuxiliaryIncome::Investment,
        AuxiliaryIncome::Bonus,
    ];

    /// The share of the non-salary income this source pays out.
    fn share(self) -> f64 {
        match self {
            AuxiliaryIncome::Freelance => 0.4,
            AuxiliaryIncome::Investment => 0.2,
            AuxiliaryIncome::Bonus => 0.4,
        }
    }

    fn descriptions(self) -> &'static [&'static str] {
        match self {
            AuxiliaryIncome::Freelance => &[
                "Freelance Project",
                "Consulting Work",
                "Side Project",
                "Web Development",
            ],
            AuxiliaryIncome::Investment => &[
                "Stock Dividends",
                "Interest Income",
                "Investment Returns",
                "Mutual Fund",
            ],
            AuxiliaryIncome::Bonus => &[
                "Performance Bonus",
                "Year-end Bonus",
                "Incentive Bonus",
                "Quarterly Bonus",
            ],
        }
    }
}

const SALARY_DESCRIPTIONS: &[&str] = &["Monthly Salary", "Paycheck", "Base Salary"];

fn expense_descriptions(category: ExpenseCategory) -> &'static [&'static str] {
    match category {
        ExpenseCategory::Food => &[
            "Grocery Shopping",
            "Restaurant",
            "Coffee Shop",
            "Takeout",
            "Lunch",
            "Dinner",
            "Breakfast",
        ],
        ExpenseCategory::Transport => &[
            "Fuel",
            "Public Transport",
            "Uber Ride",
            "Parking",
            "Car Maintenance",
            "Metro Card",
        ],
        ExpenseCategory::Shopping => &[
            "Clothing",
            "Electronics",
            "Home Goods",
            "Books",
            "Gifts",
            "Amazon Purchase",
        ],
        ExpenseCategory::Health => &[
            "Doctor Visit",
            "Medicine",
            "Gym Membership",
            "Health Insurance",
            "Pharmacy",
        ],
        ExpenseCategory::Utilities => &[
            "Electricity Bill",
            "Water Bill",
            "Internet Bill",
            "Gas Bill",
            "Mobile Bill",
        ],
        ExpenseCategory::Entertainment => &[
            "Movie Tickets",
            "Concert",
            "Netflix Subscription",
            "Games",
            "Dining Out",
        ],
        ExpenseCategory::Rent => &["Monthly Rent", "Apartment Rent", "House Rent", "Maintenance"],
    }
}

/// How much a single expense may vary from the average for its category.
fn expense_variance(category: ExpenseCategory) -> (f64, f64) {
    match category {
        ExpenseCategory::Rent => (0.9, 1.1),
        ExpenseCategory::Food => (0.3, 2.0),
        ExpenseCategory::Transport => (0.5, 1.5),
        ExpenseCategory::Shopping => (0.2, 3.0),
        ExpenseCategory::Health => (0.1, 5.0),
        ExpenseCategory::Utilities => (0.8, 1.2),
        ExpenseCategory::Entertainment => (0.3, 2.5),
    }
}

/// The combined seasonal and trend multiplier for the month `offset` months ago.
///
/// Deterministic so that the months in a window differ in a repeatable way.
fn month_factor(offset: u32) -> f64 {
    let offset = f64::from(offset);
    let seasonal = 1.0 + (offset * PI / 2.0).sin() * 0.10;
    let trend = 1.0 + offset * 0.02;

    seasonal * trend
}

/// Generate transactions for the month containing `today` and the two months
/// before it, newest first.
pub fn generate_transactions<R: Rng + ?Sized>(
    profile: &FinancialProfile,
    today: Date,
    rng: &mut R,
) -> Vec<DummyTransaction> {
    let current_month = YearMonth::from_date(today);

    let mut transactions: Vec<DummyTransaction> = (0..TRANSACTION_MONTHS)
        .rev()
        .flat_map(|offset| {
            generate_month(
                profile,
                current_month.minus_months(offset),
                month_factor(offset),
                rng,
            )
        })
        .collect();

    transactions.sort_by(|a, b| b.date.cmp(&a.date));

    transactions
}

fn generate_month<R: Rng + ?Sized>(
    profile: &FinancialProfile,
    month: YearMonth,
    factor: f64,
    rng: &mut R,
) -> Vec<DummyTransaction> {
    let income_count = rng.gen_range(1..=2);
    let expense_count = rng.gen_range(8..=12);
    let mut transactions = Vec::with_capacity(income_count + expense_count);

    for i in 0..income_count {
        let (amount, description, category) = if i == 0 {
            (
                profile.base_salary * factor,
                pick(SALARY_DESCRIPTIONS, rng),
                Category::Salary,
            )
        } else {
            let source = AuxiliaryIncome::ALL[rng.gen_range(0..AuxiliaryIncome::ALL.len())];
            let auxiliary_income = profile.monthly_income - profile.base_salary;

            (
                auxiliary_income * source.share() * factor,
                pick(source.descriptions(), rng),
                Category::Other,
            )
        };

        transactions.push(dummy_transaction(
            format!("{}_income_{i}", id_prefix(month)),
            amount,
            description,
            category,
            random_day(month, rng),
            TransactionType::Income,
        ));
    }

    for i in 0..expense_count {
        let category = select_expense_category(&profile.category_spending, rng);
        let (min_variance, max_variance) = expense_variance(category);
        let average = profile.category_budgets[category] / 8.0;
        let amount = average * rng.gen_range(min_variance..=max_variance) * factor;

        transactions.push(dummy_transaction(
            format!("{}_expense_{i}", id_prefix(month)),
            amount,
            pick(expense_descriptions(category), rng),
            category.into(),
            random_day(month, rng),
            TransactionType::Expense,
        ));
    }

    transactions
}

fn dummy_transaction(
    id: String,
    amount: f64,
    description: &'static str,
    category: Category,
    date: Date,
    transaction_type: TransactionType,
) -> DummyTransaction {
    let created_at = date.midnight().assume_utc();

    DummyTransaction {
        id,
        amount: amount.round().max(1.0),
        description,
        category,
        date,
        transaction_type,
        created_at,
        updated_at: created_at,
    }
}

fn id_prefix(month: YearMonth) -> String {
    format!("dummy_{}_{:02}", month.year(), u8::from(month.month()))
}

/// A day between the 1st and 28th so that every month has it.
fn random_day<R: Rng + ?Sized>(month: YearMonth, rng: &mut R) -> Date {
    month
        .first_day()
        .saturating_add(Duration::days(rng.gen_range(0..28)))
}

fn pick<R: Rng + ?Sized>(descriptions: &'static [&'static str], rng: &mut R) -> &'static str {
    descriptions.choose(rng).copied().unwrap_or("Miscellaneous")
}

/// Choose a category with probability proportional to its share of `spending`.
///
/// Falls back to the first expense category when nothing is spent.
pub(super) fn select_expense_category<R: Rng + ?Sized>(
    spending: &ExpenseMap<f64>,
    rng: &mut R,
) -> ExpenseCategory {
    match WeightedIndex::new(spending.values()) {
        Ok(distribution) => ExpenseCategory::ALL[distribution.sample(rng)],
        Err(_) => ExpenseCategory::ALL[0],
    }
}
