//! Savings goals and the figures shown for them on the charts page.

use serde::Serialize;
use time::{Date, Duration};

use crate::date_format::iso_date;

/// What a savings goal is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalCategory {
    /// A buffer for unexpected costs.
    Emergency,
    /// Travel and holidays.
    Vacation,
    /// A home deposit.
    House,
    /// A vehicle purchase.
    Car,
    /// Study fees.
    Education,
    /// Long term savings for after work.
    Retirement,
    /// Anything else.
    Other,
}

impl GoalCategory {
    /// Every goal category.
    pub const ALL: [GoalCategory; 7] = [
        GoalCategory::Emergency,
        GoalCategory::Vacation,
        GoalCategory::House,
        GoalCategory::Car,
        GoalCategory::Education,
        GoalCategory::Retirement,
        GoalCategory::Other,
    ];

    /// The colour used for the goal's marker.
    pub fn colour(self) -> &'static str {
        match self {
            GoalCategory::Emergency => "#EF4444",
            GoalCategory::Vacation => "#3B82F6",
            GoalCategory::House => "#10B981",
            GoalCategory::Car => "#F59E0B",
            GoalCategory::Education => "#8B5CF6",
            GoalCategory::Retirement => "#06B6D4",
            GoalCategory::Other => "#84CC16",
        }
    }
}

/// An amount of money to save by a deadline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    /// The name shown on the goal's card.
    pub goal_name: String,
    /// The amount to save.
    pub target_amount: f64,
    /// The amount saved so far.
    pub current_amount: f64,
    /// The date the target should be reached by.
    #[serde(with = "iso_date")]
    pub deadline: Date,
    /// What the goal is for.
    pub category: GoalCategory,
}

impl SavingsGoal {
    /// How much of the target has been saved, as a percentage.
    ///
    /// Returns 0 when the target is 0.
    pub fn progress_percentage(&self) -> f64 {
        if self.target_amount > 0.0 {
            self.current_amount / self.target_amount * 100.0
        } else {
            0.0
        }
    }

    /// The number of days from `today` until the deadline, negative once overdue.
    pub fn days_remaining(&self, today: Date) -> i64 {
        (self.deadline - today).whole_days()
    }

    /// The amount left to save, never negative.
    pub fn amount_remaining(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }

    /// How much must be saved each month to reach the target by the deadline.
    ///
    /// Months are counted as 30 days, rounded up, and at least one month is
    /// assumed so an overdue goal asks for the whole remaining amount.
    pub fn monthly_savings_needed(&self, today: Date) -> f64 {
        let months_remaining = (self.days_remaining(today) as f64 / 30.0).ceil().max(1.0);

        self.amount_remaining() / months_remaining
    }
}

/// A fixed set of example goals with deadlines relative to `today`.
pub fn sample_savings_goals(today: Date) -> Vec<SavingsGoal> {
    let goal = |name: &str, target: f64, current: f64, days: i64, category: GoalCategory| {
        SavingsGoal {
            goal_name: name.to_owned(),
            target_amount: target,
            current_amount: current,
            deadline: today.saturating_add(Duration::days(days)),
            category,
        }
    };

    vec![
        goal("Emergency Fund", 100_000.0, 75_000.0, 180, GoalCategory::Emergency),
        goal("Vacation Fund", 50_000.0, 32_000.0, 60, GoalCategory::Vacation),
        goal("House Down Payment", 500_000.0, 150_000.0, 730, GoalCategory::House),
        goal("New Car", 250_000.0, 80_000.0, 365, GoalCategory::Car),
    ]
}
