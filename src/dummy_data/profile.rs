//! The financial profile that all synthetic records are derived from.

use rand::Rng;
use serde::Serialize;

use crate::category::{ExpenseCategory, ExpenseMap};

/// One randomly generated set of income, budget and spending baselines.
///
/// Transactions, budgets and chart points generated from the same profile
/// have mutually plausible totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialProfile {
    /// The main source of income each month.
    pub base_salary: f64,
    /// The base salary plus freelance, investment and bonus income.
    pub monthly_income: f64,
    /// A fixed share of the monthly income for each category.
    pub category_budgets: ExpenseMap<f64>,
    /// What is actually spent in each category, 70-130% of its budget.
    pub category_spending: ExpenseMap<f64>,
    /// The sum of the spending in every category.
    pub monthly_expenses: f64,
}

impl FinancialProfile {
    /// Draw a new profile from `rng`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let base_salary = f64::from(rng.gen_range(45_000_u32..75_000));
        let freelance_income = rng.gen_range(2_000_u32..10_000);
        let investment_income = rng.gen_range(500_u32..3_500);
        let bonus_income = rng.gen_range(1_000_u32..6_000);
        let monthly_income =
            base_salary + f64::from(freelance_income + investment_income + bonus_income);

        let category_budgets = ExpenseMap::from_fn(|category| {
            (monthly_income * budget_allocation(category)).round()
        });

        let category_spending = category_budgets.map(|_, &budget| {
            let spending = (budget * rng.gen_range(0.7..=1.3)).round();
            // Rounding must not push spending outside the variance band.
            spending.clamp((budget * 0.7).ceil(), (budget * 1.3).floor())
        });

        let monthly_expenses = category_spending.values().sum();

        Self {
            base_salary,
            monthly_income,
            category_budgets,
            category_spending,
            monthly_expenses,
        }
    }
}

/// The share of monthly income budgeted for `category`.
fn budget_allocation(category: ExpenseCategory) -> f64 {
    match category {
        ExpenseCategory::Rent => 0.35,
        ExpenseCategory::Food => 0.15,
        ExpenseCategory::Transport => 0.08,
        ExpenseCategory::Utilities => 0.06,
        ExpenseCategory::Health => 0.05,
        ExpenseCategory::Entertainment => 0.08,
        ExpenseCategory::Shopping => 0.10,
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use crate::{ExpenseCategory, dummy_data::profile::FinancialProfile};

    #[test]
    fn income_exceeds_base_salary() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let profile = FinancialProfile::generate(&mut rng);

            assert!(profile.base_salary >= 45_000.0 && profile.base_salary < 75_000.0);
            assert!(profile.monthly_income > profile.base_salary);
            assert!(profile.monthly_expenses >= 0.0);
        }
    }

    #[test]
    fn spending_stays_within_variance_of_budget() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let profile = FinancialProfile::generate(&mut rng);

            for (category, &budget) in profile.category_budgets.iter() {
                let spending = profile.category_spending[category];

                assert!(budget > 0.0, "{category} has no budget");
                assert!(
                    spending >= budget * 0.7 && spending <= budget * 1.3,
                    "{category} spending {spending} is out of range for budget {budget}"
                );
            }
        }
    }

    #[test]
    fn expenses_are_the_sum_of_category_spending() {
        let profile = FinancialProfile::generate(&mut StdRng::seed_from_u64(1));

        let total: f64 = profile.category_spending.values().sum();

        assert_eq!(profile.monthly_expenses, total);
    }

    #[test]
    fn rent_gets_the_largest_budget() {
        let profile = FinancialProfile::generate(&mut StdRng::seed_from_u64(3));

        let rent = profile.category_budgets[ExpenseCategory::Rent];

        assert!(profile.category_budgets.values().all(|&budget| budget <= rent));
        assert_eq!(rent, (profile.monthly_income * 0.35).round());
    }

    #[test]
    fn serializes_category_keyed_maps() {
        let profile = FinancialProfile::generate(&mut StdRng::seed_from_u64(5));

        let json = serde_json::to_value(&profile).unwrap();

        assert!(json["categoryBudgets"]["Rent"].is_number());
        assert!(json["categorySpending"]["Shopping"].is_number());
        assert!(json["monthlyIncome"].is_number());
    }
}
