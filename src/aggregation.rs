//! Transaction and budget data aggregation for charts.
//!
//! Provides functions to total transactions by category and by month, compare
//! budgets against actual spending, and compute monthly trends.

use std::collections::BTreeMap;

use serde::Serialize;
use time::Date;

use crate::{
    budget::Budget,
    category::{Category, TransactionType},
    month::YearMonth,
    transaction::Transaction,
};

/// Income and expenses for one period, usually a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// The label for the period, e.g. "Jan".
    pub period: String,
    /// Money earned in the period.
    pub income: f64,
    /// Money spent in the period.
    pub expenses: f64,
    /// `income - expenses`.
    pub net: f64,
}

impl ChartPoint {
    /// Create a point, deriving `net` from `income` and `expenses`.
    pub fn new(period: impl Into<String>, income: f64, expenses: f64) -> Self {
        Self {
            period: period.into(),
            income,
            expenses,
            net: income - expenses,
        }
    }
}

/// The total spent in a category and its share of all spending.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// The expense category.
    pub category: Category,
    /// The sum of the category's expenses.
    pub amount: f64,
    /// The share of all expenses, from 0 to 100.
    pub percentage: f64,
}

/// A budget next to what was actually spent in its category and month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetVsActual {
    /// The budgeted category.
    pub category: Category,
    /// The spending limit.
    pub budget: f64,
    /// What was spent.
    pub actual: f64,
    /// `budget - actual`, negative when over budget.
    pub remaining: f64,
    /// `actual` as a percentage of `budget`, 0 when the budget is 0.
    pub percentage: f64,
}

/// Income, expenses and savings for a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    /// The short month name, e.g. "Jan".
    pub month: String,
    /// Total income for the month.
    pub income: f64,
    /// Total expenses for the month.
    pub expenses: f64,
    /// `income - expenses`.
    pub savings: f64,
    /// Expenses divided by the latest day of the month with a transaction.
    pub average_daily_spending: f64,
}

fn expenses(transactions: &[Transaction]) -> impl Iterator<Item = &Transaction> {
    transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == TransactionType::Expense)
}

/// Total the expenses per category, largest first.
///
/// Categories without expenses are left out.
pub fn expense_categories(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<Category, f64> = BTreeMap::new();

    for transaction in expenses(transactions) {
        *totals.entry(transaction.category).or_default() += transaction.amount;
    }

    let total_expenses: f64 = totals.values().sum();

    let mut categories: Vec<_> = totals
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category,
            amount,
            percentage: percentage_of(amount, total_expenses),
        })
        .collect();
    categories.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    categories
}

#[derive(Default)]
struct MonthTotals {
    income: f64,
    expenses: f64,
    latest_day: u8,
}

fn totals_by_month(transactions: &[Transaction]) -> BTreeMap<YearMonth, MonthTotals> {
    let mut months: BTreeMap<YearMonth, MonthTotals> = BTreeMap::new();

    for transaction in transactions {
        let totals = months
            .entry(YearMonth::from_date(transaction.date))
            .or_default();

        match transaction.transaction_type {
            TransactionType::Income => totals.income += transaction.amount,
            TransactionType::Expense => totals.expenses += transaction.amount,
        }
        totals.latest_day = totals.latest_day.max(transaction.date.day());
    }

    months
}

/// Total income and expenses per month for the last `months` months that have
/// transactions, oldest first.
pub fn monthly_income_expense(transactions: &[Transaction], months: usize) -> Vec<ChartPoint> {
    let totals = totals_by_month(transactions);
    let skip = totals.len().saturating_sub(months);

    totals
        .into_iter()
        .skip(skip)
        .map(|(month, totals)| ChartPoint::new(month.short_name(), totals.income, totals.expenses))
        .collect()
}

/// Compare the budgets for `month` with the expenses recorded in that month.
///
/// The result is sorted by budget amount, largest first.
pub fn budget_vs_actual(
    budgets: &[Budget],
    transactions: &[Transaction],
    month: YearMonth,
) -> Vec<BudgetVsActual> {
    let mut actual_spending: BTreeMap<Category, f64> = BTreeMap::new();

    for transaction in expenses(transactions).filter(|t| month.contains(t.date)) {
        *actual_spending.entry(transaction.category).or_default() += transaction.amount;
    }

    let mut comparisons: Vec<_> = budgets
        .iter()
        .filter(|budget| budget.month == month)
        .map(|budget| {
            let actual = actual_spending
                .get(&budget.category)
                .copied()
                .unwrap_or_default();

            BudgetVsActual {
                category: budget.category,
                budget: budget.amount,
                actual,
                remaining: budget.amount - actual,
                percentage: percentage_of(actual, budget.amount),
            }
        })
        .collect();
    comparisons.sort_by(|a, b| b.budget.total_cmp(&a.budget));

    comparisons
}

/// Compare budgets with their own `spent` figures, largest budget first.
pub fn budget_vs_spent(budgets: &[Budget]) -> Vec<BudgetVsActual> {
    let mut comparisons: Vec<_> = budgets
        .iter()
        .map(|budget| BudgetVsActual {
            category: budget.category,
            budget: budget.amount,
            actual: budget.spent,
            remaining: budget.remaining(),
            percentage: budget.percentage_used(),
        })
        .collect();
    comparisons.sort_by(|a, b| b.budget.total_cmp(&a.budget));

    comparisons
}

/// Income, expenses, savings and average daily spending for the last
/// `months` months that have transactions, oldest first.
///
/// Daily spending is averaged over the days up to the latest transaction in
/// the month.
pub fn monthly_trends(transactions: &[Transaction], months: usize) -> Vec<MonthlyTrend> {
    let totals = totals_by_month(transactions);
    let skip = totals.len().saturating_sub(months);

    totals
        .into_iter()
        .skip(skip)
        .map(|(month, totals)| MonthlyTrend {
            month: month.short_name().to_owned(),
            income: totals.income,
            expenses: totals.expenses,
            savings: totals.income - totals.expenses,
            average_daily_spending: if totals.latest_day > 0 {
                totals.expenses / f64::from(totals.latest_day)
            } else {
                0.0
            },
        })
        .collect()
}

fn in_range(transaction: &Transaction, start: Date, end: Date) -> bool {
    transaction.date >= start && transaction.date <= end
}

/// The expenses per category between `start` and `end` inclusive.
pub fn spending_by_category(
    transactions: &[Transaction],
    start: Date,
    end: Date,
) -> BTreeMap<Category, f64> {
    let mut totals = BTreeMap::new();

    for transaction in expenses(transactions).filter(|t| in_range(t, start, end)) {
        *totals.entry(transaction.category).or_default() += transaction.amount;
    }

    totals
}

/// The income earned between `start` and `end` inclusive.
pub fn total_income(transactions: &[Transaction], start: Date, end: Date) -> f64 {
    transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Income && in_range(t, start, end))
        .map(|t| t.amount)
        .sum()
}

/// The money spent between `start` and `end` inclusive.
pub fn total_expenses(transactions: &[Transaction], start: Date, end: Date) -> f64 {
    expenses(transactions)
        .filter(|t| in_range(t, start, end))
        .map(|t| t.amount)
        .sum()
}

/// The month `today` falls in and the `count - 1` months before it, oldest first.
pub fn previous_months(today: Date, count: u32) -> Vec<YearMonth> {
    let current = YearMonth::from_date(today);

    (0..count)
        .rev()
        .map(|offset| current.minus_months(offset))
        .collect()
}

/// `part` as a percentage of `whole`, or 0 if `whole` is not positive.
pub fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use time::{
        Date, Month,
        macros::{date, datetime},
    };

    use crate::{
        Budget, Category, Transaction, TransactionType, YearMonth,
        aggregation::{
            BudgetVsActual, ChartPoint, budget_vs_actual, expense_categories,
            monthly_income_expense, monthly_trends, percentage_of, previous_months,
            spending_by_category, total_expenses, total_income,
        },
    };

    fn transaction(
        amount: f64,
        category: Category,
        date: Date,
        transaction_type: TransactionType,
    ) -> Transaction {
        Transaction {
            id: 0,
            amount,
            description: "Test".to_owned(),
            category,
            date,
            transaction_type,
            created_at: datetime!(2025-01-01 0:00 UTC),
            updated_at: datetime!(2025-01-01 0:00 UTC),
        }
    }

    fn expense(amount: f64, category: Category, date: Date) -> Transaction {
        transaction(amount, category, date, TransactionType::Expense)
    }

    fn income(amount: f64, date: Date) -> Transaction {
        transaction(amount, Category::Salary, date, TransactionType::Income)
    }

    fn budget(category: Category, amount: f64, month: &str) -> Budget {
        Budget {
            id: 0,
            category,
            amount,
            spent: 0.0,
            month: month.parse().unwrap(),
            created_at: datetime!(2025-01-01 0:00 UTC),
            updated_at: datetime!(2025-01-01 0:00 UTC),
        }
    }

    #[test]
    fn expense_categories_sorted_by_amount_with_percentages() {
        let transactions = [
            expense(25.0, Category::Food, date!(2025 - 07 - 01)),
            expense(25.0, Category::Food, date!(2025 - 07 - 02)),
            expense(150.0, Category::Rent, date!(2025 - 07 - 03)),
            income(1000.0, date!(2025 - 07 - 01)),
        ];

        let categories = expense_categories(&transactions);

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].category, Category::Rent);
        assert_eq!(categories[0].percentage, 75.0);
        assert_eq!(categories[1].category, Category::Food);
        assert_eq!(categories[1].amount, 50.0);
        assert_eq!(categories[1].percentage, 25.0);
    }

    #[test]
    fn expense_categories_empty_without_expenses() {
        let transactions = [income(1000.0, date!(2025 - 07 - 01))];

        assert!(expense_categories(&transactions).is_empty());
    }

    #[test]
    fn monthly_income_expense_is_chronological_and_limited() {
        let transactions = [
            income(100.0, date!(2025 - 07 - 10)),
            expense(40.0, Category::Food, date!(2025 - 07 - 11)),
            income(200.0, date!(2025 - 05 - 10)),
            expense(10.0, Category::Food, date!(2025 - 06 - 01)),
            income(300.0, date!(2024 - 12 - 10)),
        ];

        let points = monthly_income_expense(&transactions, 3);

        assert_eq!(
            points,
            vec![
                ChartPoint::new("May", 200.0, 0.0),
                ChartPoint::new("Jun", 0.0, 10.0),
                ChartPoint::new("Jul", 100.0, 40.0),
            ]
        );
        assert_eq!(points[2].net, 60.0);
    }

    #[test]
    fn budget_vs_actual_uses_only_the_month() {
        let transactions = [
            expense(120.0, Category::Food, date!(2025 - 07 - 05)),
            expense(999.0, Category::Food, date!(2025 - 06 - 30)),
            expense(50.0, Category::Transport, date!(2025 - 07 - 06)),
        ];
        let budgets = [
            budget(Category::Food, 100.0, "2025-07"),
            budget(Category::Rent, 0.0, "2025-07"),
            budget(Category::Transport, 200.0, "2025-07"),
            budget(Category::Food, 500.0, "2025-06"),
        ];
        let month: YearMonth = "2025-07".parse().unwrap();

        let comparisons = budget_vs_actual(&budgets, &transactions, month);

        assert_eq!(
            comparisons,
            vec![
                BudgetVsActual {
                    category: Category::Transport,
                    budget: 200.0,
                    actual: 50.0,
                    remaining: 150.0,
                    percentage: 25.0,
                },
                BudgetVsActual {
                    category: Category::Food,
                    budget: 100.0,
                    actual: 120.0,
                    remaining: -20.0,
                    percentage: 120.0,
                },
                BudgetVsActual {
                    category: Category::Rent,
                    budget: 0.0,
                    actual: 0.0,
                    remaining: 0.0,
                    percentage: 0.0,
                },
            ]
        );
    }

    #[test]
    fn monthly_trends_average_over_days_elapsed() {
        let transactions = [
            income(1000.0, date!(2025 - 07 - 01)),
            expense(100.0, Category::Food, date!(2025 - 07 - 04)),
            expense(100.0, Category::Food, date!(2025 - 07 - 10)),
        ];

        let trends = monthly_trends(&transactions, 6);

        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].month, "Jul");
        assert_eq!(trends[0].savings, 800.0);
        assert_eq!(trends[0].average_daily_spending, 20.0);
    }

    #[test]
    fn range_totals_are_inclusive() {
        let transactions = [
            income(1000.0, date!(2025 - 07 - 01)),
            income(500.0, date!(2025 - 08 - 01)),
            expense(30.0, Category::Food, date!(2025 - 07 - 31)),
            expense(20.0, Category::Food, date!(2025 - 07 - 15)),
            expense(70.0, Category::Health, date!(2025 - 06 - 30)),
        ];
        let (start, end) = (date!(2025 - 07 - 01), date!(2025 - 07 - 31));

        assert_eq!(total_income(&transactions, start, end), 1000.0);
        assert_eq!(total_expenses(&transactions, start, end), 50.0);
        let spending = spending_by_category(&transactions, start, end);
        assert_eq!(spending.get(&Category::Food), Some(&50.0));
        assert_eq!(spending.get(&Category::Health), None);
    }

    #[test]
    fn previous_months_wrap_around_the_year() {
        let months = previous_months(date!(2025 - 02 - 14), 3);

        assert_eq!(
            months,
            vec![
                YearMonth::new(2024, Month::December),
                YearMonth::new(2025, Month::January),
                YearMonth::new(2025, Month::February),
            ]
        );
    }

    #[test]
    fn percentage_guards_zero_denominator() {
        assert_eq!(percentage_of(5.0, 0.0), 0.0);
        assert_eq!(percentage_of(5.0, 20.0), 25.0);
    }
}
