//! Defines the route handler for the page that shows a month's budgets.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    aggregation::budget_vs_spent,
    budget::core::{Budget, get_budgets},
    category::ExpenseCategory,
    charts::{PageChart, budget_vs_actual_chart, charts_script, charts_view},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CARD_STYLE, ECHARTS_SCRIPT, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base, format_currency,
        format_percentage, progress_bar, sample_data_banner,
    },
    month::YearMonth,
    navigation::NavBar,
    timezone::get_local_date,
};

/// The state needed for the budgets page.
#[derive(Debug, Clone)]
pub struct BudgetsPageState {
    /// The database connection for reading budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for BudgetsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters for the budgets page.
#[derive(Debug, Default, Deserialize)]
pub struct BudgetsPageQuery {
    /// The month to show, defaults to the current month.
    #[serde(default)]
    pub month: Option<String>,
}

/// Totals across all of a month's budgets.
#[derive(Debug, PartialEq)]
struct BudgetOverview {
    total_budget: f64,
    total_spent: f64,
    over_budget_count: usize,
}

impl BudgetOverview {
    fn new(budgets: &[Budget]) -> Self {
        Self {
            total_budget: budgets.iter().map(|budget| budget.amount).sum(),
            total_spent: budgets.iter().map(|budget| budget.spent).sum(),
            over_budget_count: budgets
                .iter()
                .filter(|budget| budget.is_over_budget())
                .count(),
        }
    }

    fn remaining(&self) -> f64 {
        self.total_budget - self.total_spent
    }

    fn progress(&self) -> f64 {
        if self.total_budget > 0.0 {
            self.total_spent / self.total_budget * 100.0
        } else {
            0.0
        }
    }
}

/// Render the budgets for a month with their progress and a form for adding new ones.
pub async fn get_budgets_page(
    State(state): State<BudgetsPageState>,
    Query(query): Query<BudgetsPageQuery>,
) -> Result<Response, Error> {
    let current_month = YearMonth::from_date(get_local_date(&state.local_timezone)?);
    let month = query
        .month
        .as_deref()
        .map(str::trim)
        .filter(|month| !month.is_empty())
        .and_then(|month| {
            month
                .parse()
                .inspect_err(|error| tracing::warn!("ignoring month filter: {error}"))
                .ok()
        })
        .unwrap_or(current_month);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let budgets = get_budgets(Some(month), &connection)
        .inspect_err(|error| tracing::error!("could not get budgets for {month}: {error}"))?;

    Ok(budgets_view(&budgets, month).into_response())
}

fn budgets_view(budgets: &[Budget], month: YearMonth) -> Markup {
    let nav_bar = NavBar::new(endpoints::BUDGETS_VIEW).into_html();
    let charts = if budgets.is_empty() {
        Vec::new()
    } else {
        vec![PageChart::new(
            "budget-vs-actual-chart",
            budget_vs_actual_chart(&budget_vs_spent(budgets), &month.to_string()),
        )]
    };

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl space-y-6"
            {
                div class="flex justify-between flex-wrap items-end gap-4"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Budgets" }
                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            "Set and track your monthly spending limits"
                        }
                    }

                    (month_picker(month))
                }

                (new_budget_form(month))

                @if budgets.is_empty() {
                    (sample_data_banner(
                        "No Budgets Found",
                        "Populate the database with sample budgets to see the data.",
                    ))

                    p class="py-8 text-center text-gray-500 dark:text-gray-400"
                    {
                        "No budgets found for this month."
                    }
                } @else {
                    (overview_cards(&BudgetOverview::new(budgets), budgets.len()))

                    div class="grid grid-cols-1 md:grid-cols-2 gap-4"
                    {
                        @for budget in budgets {
                            (budget_card(budget))
                        }
                    }

                    (charts_view(&charts))
                }
            }
        }
    );

    let head_elements = if charts.is_empty() {
        Vec::new()
    } else {
        vec![
            HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
            charts_script(&charts),
        ]
    };

    base("Budgets", &head_elements, &content)
}

fn overview_cards(overview: &BudgetOverview, category_count: usize) -> Markup {
    let remaining = overview.remaining();
    let (remaining_style, over_budget_style) = (
        if remaining < 0.0 { "text-red-600" } else { "text-green-600" },
        if overview.over_budget_count > 0 { "text-red-600" } else { "text-green-600" },
    );

    html!(
        div class="grid grid-cols-1 md:grid-cols-3 gap-4"
        {
            div class=(CARD_STYLE)
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { "Total Budget" }
                p class="text-2xl font-bold" { (format_currency(overview.total_budget)) }
                p class="text-sm" { "Spent " (format_currency(overview.total_spent)) }
            }

            div class=(CARD_STYLE)
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { "Remaining" }
                p class={ "text-2xl font-bold " (remaining_style) }
                {
                    (format_currency(remaining.abs()))
                }
                p id="overall-progress" class="text-sm"
                {
                    "Progress " (format_percentage(overview.progress()))
                }
            }

            div class=(CARD_STYLE)
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { "Categories" }
                p class="text-2xl font-bold" { (category_count) }
                p class={ "text-sm " (over_budget_style) }
                {
                    "Over Budget "
                    span id="over-budget-count" { (overview.over_budget_count) }
                }
            }
        }
    )
}

fn budget_card(budget: &Budget) -> Markup {
    let percentage = budget.percentage_used();
    let remaining = budget.remaining();
    let delete_url = format_endpoint(endpoints::DELETE_BUDGET_VIEW, budget.id);

    html!(
        div class={ (CARD_STYLE) " space-y-3" } data-budget-id=(budget.id)
        {
            div class="flex justify-between items-center"
            {
                h2 class="text-lg font-semibold" { (budget.category) }

                div class="text-right"
                {
                    p class="text-sm font-medium"
                    {
                        (format_currency(budget.spent)) " / " (format_currency(budget.amount))
                    }
                    p class="text-xs text-gray-500 dark:text-gray-400"
                    {
                        (format_percentage(percentage)) " used"
                    }
                }
            }

            (progress_bar(percentage))

            div class="flex justify-between text-sm"
            {
                @if remaining >= 0.0 {
                    span { (format_currency(remaining)) " remaining" }
                    span class="font-medium text-green-600" { "On Track" }
                } @else {
                    span { (format_currency(remaining.abs())) " over budget" }
                    span class="font-medium text-red-600" { "Over Budget" }
                }
            }

            div class="text-right"
            {
                button
                    hx-delete=(delete_url)
                    hx-confirm={
                        "Are you sure you want to delete the " (budget.category) " budget?"
                    }
                    hx-target="closest [data-budget-id]"
                    hx-target-error="#alert-container"
                    hx-swap="delete"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    )
}

fn month_picker(month: YearMonth) -> Markup {
    html!(
        form method="get" action=(endpoints::BUDGETS_VIEW) class="flex items-end gap-2"
        {
            div
            {
                label for="month-filter" class=(FORM_LABEL_STYLE) { "Month" }
                input
                    id="month-filter"
                    type="month"
                    name="month"
                    value=(month)
                    onchange="this.form.submit()"
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    )
}

fn new_budget_form(month: YearMonth) -> Markup {
    html!(
        form
            hx-post=(endpoints::BUDGETS_VIEW)
            hx-target-error="#alert-container"
            class={ (CARD_STYLE) " grid grid-cols-1 md:grid-cols-4 gap-4" }
        {
            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                select id="category" name="category" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for category in ExpenseCategory::ALL {
                        option value=(category) { (category) }
                    }
                }
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Budget" }
                input
                    id="amount"
                    type="number"
                    name="amount"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="month" class=(FORM_LABEL_STYLE) { "Month" }
                input
                    id="month"
                    type="month"
                    name="month"
                    value=(month)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex items-end"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Budget" }
            }
        }
    )
}
