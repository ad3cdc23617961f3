//! Synthetic monthly income and expense totals for charts.

use std::f64::consts::PI;

use rand::Rng;
use time::Date;

use crate::{aggregation::ChartPoint, dummy_data::profile::FinancialProfile, month::YearMonth};

/// The number of months, including the current one, that chart points cover.
pub const CHART_MONTHS: u32 = 8;

/// Generate one point per month for the trailing [CHART_MONTHS] months, oldest first.
///
/// Each month gets its own random factor, so these totals are not the sums of
/// the transactions generated from the same profile.
pub fn generate_chart<R: Rng + ?Sized>(
    profile: &FinancialProfile,
    today: Date,
    rng: &mut R,
) -> Vec<ChartPoint> {
    let current_month = YearMonth::from_date(today);

    (0..CHART_MONTHS)
        .rev()
        .map(|offset| {
            let month = current_month.minus_months(offset);
            let offset = f64::from(offset);
            let seasonal = 1.0 + (offset * PI / 4.0).sin() * 0.08;
            let trend = 1.0 + offset * 0.015;
            let total = seasonal * trend * rng.gen_range(0.95..=1.05);

            ChartPoint::new(
                month.short_name(),
                (profile.monthly_income * total).round(),
                (profile.monthly_expenses * total).round(),
            )
        })
        .collect()
}
