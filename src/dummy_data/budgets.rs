//! Synthetic budgets for the current and previous month.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    budget::NewBudget,
    category::{Category, ExpenseCategory},
    dummy_data::profile::FinancialProfile,
    month::YearMonth,
};

/// A generated budget with a synthetic ID.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DummyBudget {
    /// A synthetic ID of the form `budget_{YYYY-MM}_{Category}`.
    pub id: String,
    /// Always one of the expense categories.
    pub category: Category,
    /// The spending limit.
    pub amount: f64,
    /// How much was spent against the limit.
    pub spent: f64,
    /// The month the budget covers.
    pub month: YearMonth,
}

impl DummyBudget {
    /// Convert into a budget that can be saved, dropping the synthetic ID.
    ///
    /// # Errors
    /// Returns a validation error if the amount or spent amount is negative.
    pub fn to_new_budget(&self) -> Result<NewBudget, Error> {
        NewBudget::new(self.category, self.amount, self.spent, self.month)
    }
}

/// How a category's spending usually compares to its budget.
#[derive(Debug, Clone, Copy, PartialEq)]
enum SpendingTier {
    OverBudget,
    UnderBudget,
    Normal,
}

impl SpendingTier {
    fn of(category: ExpenseCategory) -> Self {
        match category {
            ExpenseCategory::Shopping | ExpenseCategory::Entertainment => SpendingTier::OverBudget,
            ExpenseCategory::Utilities | ExpenseCategory::Health => SpendingTier::UnderBudget,
            ExpenseCategory::Food | ExpenseCategory::Transport | ExpenseCategory::Rent => {
                SpendingTier::Normal
            }
        }
    }

    /// The range that `spent / amount` is drawn from.
    fn spend_ratio(self, period: Period) -> RangeInclusive<f64> {
        match (self, period) {
            (SpendingTier::OverBudget, Period::Current) => 1.1..=1.4,
            (SpendingTier::OverBudget, Period::Previous) => 1.05..=1.3,
            (SpendingTier::UnderBudget, Period::Current) => 0.6..=0.95,
            (SpendingTier::UnderBudget, Period::Previous) => 0.65..=0.9,
            (SpendingTier::Normal, Period::Current) => 0.7..=1.1,
            (SpendingTier::Normal, Period::Previous) => 0.75..=1.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Period {
    Current,
    Previous,
}

impl Period {
    /// The range the profile's category budget is scaled by.
    fn amount_variance(self) -> RangeInclusive<f64> {
        match self {
            Period::Current => 0.9..=1.1,
            Period::Previous => 0.85..=1.15,
        }
    }
}

/// Generate one budget per expense category for the month containing `today`
/// and one per category for the month before.
pub fn generate_budgets<R: Rng + ?Sized>(
    profile: &FinancialProfile,
    today: Date,
    rng: &mut R,
) -> Vec<DummyBudget> {
    let current_month = YearMonth::from_date(today);

    [
        (current_month, Period::Current),
        (current_month.previous(), Period::Previous),
    ]
    .into_iter()
    .flat_map(|(month, period)| {
        profile
            .category_budgets
            .iter()
            .map(|(category, &category_budget)| {
                let amount = (category_budget * rng.gen_range(period.amount_variance())).round();
                let spent =
                    (amount * rng.gen_range(SpendingTier::of(category).spend_ratio(period))).round();

                DummyBudget {
                    id: format!("budget_{month}_{category}"),
                    category: category.into(),
                    amount,
                    spent,
                    month,
                }
            })
            .collect::<Vec<_>>()
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};
    use time::macros::date;

    use crate::{
        Category, DummyBudget,
        dummy_data::{budgets::generate_budgets, profile::FinancialProfile},
    };

    fn generate(seed: u64) -> Vec<DummyBudget> {
        let mut rng = StdRng::seed_from_u64(seed);
        let profile = FinancialProfile::generate(&mut rng);

        generate_budgets(&profile, date!(2025 - 01 - 10), &mut rng)
    }

    #[test]
    fn one_budget_per_category_and_month() {
        let budgets = generate(1);

        let keys: HashSet<_> = budgets
            .iter()
            .map(|budget| (budget.category, budget.month.to_string()))
            .collect();

        assert_eq!(budgets.len(), 14);
        assert_eq!(keys.len(), 14);
        assert!(keys.contains(&(Category::Rent, "2025-01".to_owned())));
        assert!(keys.contains(&(Category::Rent, "2024-12".to_owned())));
    }

    #[test]
    fn amounts_are_not_negative() {
        for budget in (0..20).flat_map(generate) {
            assert!(budget.amount >= 0.0);
            assert!(budget.spent >= 0.0);
            assert!(budget.to_new_budget().is_ok());
        }
    }

    #[test]
    fn shopping_is_always_over_budget() {
        for budget in (0..50).flat_map(generate) {
            if budget.category == Category::Shopping {
                assert!(budget.spent / budget.amount > 1.0, "{budget:?}");
            }
        }
    }

    #[test]
    fn utilities_are_always_under_budget() {
        for budget in (0..50).flat_map(generate) {
            if budget.category == Category::Utilities {
                assert!(budget.spent / budget.amount < 1.0, "{budget:?}");
            }
        }
    }

    #[test]
    fn ids_name_month_and_category() {
        let budgets = generate(3);

        assert!(
            budgets
                .iter()
                .any(|budget| budget.id == "budget_2025-01_Entertainment")
        );
        assert!(budgets.iter().any(|budget| budget.id == "budget_2024-12_Food"));
    }
}
