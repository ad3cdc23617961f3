//! The page that shows every kind of chart, drawn from freshly generated data.
//!
//! Nothing here reads the database, so the page always has something to show.
//! Refreshing the page generates a new profile.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    AppState, Error,
    aggregation::{budget_vs_spent, expense_categories, monthly_trends},
    budget::Budget,
    charts::{
        PageChart, budget_vs_actual_chart, charts_script, charts_view, expense_category_chart,
        income_expense_chart, monthly_trend_chart, savings_goal_chart,
    },
    dummy_data::{
        DummyBudget, DummyData, DummyTransaction, TRANSACTION_MONTHS,
        generate_consistent_dummy_data,
    },
    endpoints,
    html::{
        CARD_STYLE, ECHARTS_SCRIPT, HeadElement, PAGE_CONTAINER_STYLE, base, format_currency,
        format_percentage, progress_bar,
    },
    month::YearMonth,
    navigation::NavBar,
    savings::{SavingsGoal, sample_savings_goals},
    timezone::get_local_date,
    transaction::Transaction,
};

/// The state needed for the charts page.
#[derive(Debug, Clone)]
pub struct ChartsPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ChartsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display every chart kind plus savings goal progress.
pub async fn get_charts_page(State(state): State<ChartsPageState>) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;
    let data = generate_consistent_dummy_data(today);
    let goals = sample_savings_goals(today);

    let charts = build_charts(&data, &goals, YearMonth::from_date(today));

    Ok(charts_page_view(&charts, &goals, today).into_response())
}

fn build_charts(data: &DummyData, goals: &[SavingsGoal], month: YearMonth) -> Vec<PageChart> {
    let transactions: Vec<Transaction> = data
        .transactions
        .iter()
        .zip(1..)
        .map(|(transaction, id)| as_transaction(transaction, id))
        .collect();
    let budgets: Vec<Budget> = data
        .budgets
        .iter()
        .filter(|budget| budget.month == month)
        .zip(1..)
        .map(|(budget, id)| as_budget(budget, id))
        .collect();

    vec![
        PageChart::new(
            "income-expense-chart",
            income_expense_chart(&data.chart, "Last 8 months"),
        ),
        PageChart::new(
            "expense-category-chart",
            expense_category_chart(&expense_categories(&transactions)),
        ),
        PageChart::new(
            "budget-vs-actual-chart",
            budget_vs_actual_chart(&budget_vs_spent(&budgets), &month.to_string()),
        ),
        PageChart::new(
            "monthly-trend-chart",
            monthly_trend_chart(&monthly_trends(&transactions, TRANSACTION_MONTHS as usize)),
        ),
        PageChart::new("savings-goal-chart", savings_goal_chart(goals)),
    ]
}

// The aggregations work on saved records, so the generated ones get stand-in IDs.
fn as_transaction(transaction: &DummyTransaction, id: i64) -> Transaction {
    Transaction {
        id,
        amount: transaction.amount,
        description: transaction.description.to_owned(),
        category: transaction.category,
        date: transaction.date,
        transaction_type: transaction.transaction_type,
        created_at: transaction.created_at,
        updated_at: transaction.updated_at,
    }
}

fn as_budget(budget: &DummyBudget, id: i64) -> Budget {
    let created_at = budget.month.first_day().midnight().assume_utc();

    Budget {
        id,
        category: budget.category,
        amount: budget.amount,
        spent: budget.spent,
        month: budget.month,
        created_at,
        updated_at: created_at,
    }
}

fn charts_page_view(charts: &[PageChart], goals: &[SavingsGoal], today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::CHARTS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div
            id="charts-content"
            class={ (PAGE_CONTAINER_STYLE) " max-w-screen-xl" }
        {
            div class="w-full space-y-6"
            {
                header
                {
                    h1 class="text-2xl font-bold" { "Financial Charts" }
                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Built from freshly generated sample data. Refresh the page for a new set."
                    }
                }

                (charts_view(charts))

                section
                {
                    h2 class="text-lg font-semibold mb-2" { "Savings Goals" }

                    div id="savings-goals" class="grid grid-cols-1 md:grid-cols-2 gap-4"
                    {
                        @for goal in goals {
                            (savings_goal_card(goal, today))
                        }
                    }
                }
            }
        }
    );

    let head_elements = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        charts_script(charts),
    ];

    base("Charts", &head_elements, &content)
}

fn savings_goal_card(goal: &SavingsGoal, today: Date) -> Markup {
    let days_remaining = goal.days_remaining(today);

    html!(
        div class={ (CARD_STYLE) " space-y-2" }
        {
            div class="flex items-center justify-between"
            {
                h3 class="font-medium" { (goal.goal_name) }
                span
                    class="w-3 h-3 rounded-full"
                    style=(format!("background-color: {}", goal.category.colour()))
                {}
            }

            div class="flex justify-between text-sm text-gray-500 dark:text-gray-400"
            {
                span { "Progress" }
                span { (format_percentage(goal.progress_percentage())) }
            }

            (progress_bar(goal.progress_percentage()))

            div class="flex justify-between text-sm"
            {
                span { (format_currency(goal.current_amount)) }
                span class="text-gray-500 dark:text-gray-400"
                {
                    "of " (format_currency(goal.target_amount))
                }
            }

            div class="flex justify-between text-xs text-gray-500 dark:text-gray-400"
            {
                @if days_remaining < 0 {
                    span class="text-red-600" { (days_remaining.abs()) " days overdue" }
                } @else {
                    span { (days_remaining) " days left" }
                }
                span
                {
                    (format_currency(goal.monthly_savings_needed(today))) " / month needed"
                }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode};
    use rand::{SeedableRng, rngs::StdRng};
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        YearMonth,
        charts_page::{ChartsPageState, build_charts, get_charts_page, savings_goal_card},
        dummy_data::generate_consistent_dummy_data_with_rng,
        savings::sample_savings_goals,
        test_utils::{assert_valid_html, parse_html_document, select_text},
    };

    #[tokio::test]
    async fn charts_page_draws_every_chart() {
        let state = ChartsPageState {
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_charts_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        for id in [
            "#income-expense-chart",
            "#expense-category-chart",
            "#budget-vs-actual-chart",
            "#monthly-trend-chart",
            "#savings-goal-chart",
        ] {
            let selector = Selector::parse(id).unwrap();
            assert!(
                html.select(&selector).next().is_some(),
                "could not find {id} in {}",
                html.html()
            );
        }
        assert_eq!(
            select_text(&html, "#savings-goals h3"),
            vec![
                "Emergency Fund",
                "Vacation Fund",
                "House Down Payment",
                "New Car"
            ]
        );
    }

    #[tokio::test]
    async fn charts_page_rejects_invalid_timezone() {
        let state = ChartsPageState {
            local_timezone: "Not/AZone".to_owned(),
        };

        let result = get_charts_page(State(state)).await;

        assert!(result.is_err());
    }

    #[test]
    fn budget_chart_only_uses_current_month() {
        let today = date!(2025 - 07 - 15);
        let data = generate_consistent_dummy_data_with_rng(&mut StdRng::seed_from_u64(11), today);

        let charts = build_charts(&data, &sample_savings_goals(today), YearMonth::from_date(today));

        let budget_chart = charts
            .iter()
            .find(|chart| chart.id == "budget-vs-actual-chart")
            .unwrap();
        assert!(budget_chart.options.contains("2025-07"));
        assert_eq!(charts.len(), 5);
    }

    #[test]
    fn overdue_goal_shows_days_overdue() {
        let today = date!(2025 - 07 - 15);
        let mut goal = sample_savings_goals(today).remove(0);
        goal.deadline = date!(2025 - 07 - 05);

        let markup = savings_goal_card(&goal, today).into_string();

        assert!(markup.contains("10 days overdue"));
    }
}
