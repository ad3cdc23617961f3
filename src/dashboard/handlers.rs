//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for the dashboard page
//! - The JSON summary endpoint
//! - HTML view functions for the summary cards and recent transactions

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    aggregation::{ChartPoint, expense_categories, monthly_income_expense},
    category::TransactionType,
    charts::{PageChart, charts_script, charts_view, expense_category_chart, income_expense_chart},
    dashboard::summary::{DashboardSummary, get_dashboard_summary},
    dummy_data::generate_sample_chart,
    endpoints,
    html::{
        CARD_STYLE, ECHARTS_SCRIPT, HeadElement, PAGE_CONTAINER_STYLE, base, format_currency,
        format_percentage, link, sample_data_banner, summary_card,
    },
    navigation::NavBar,
    timezone::get_local_date,
    transaction::{Transaction, get_all_transactions},
};

/// The number of months shown in the income and expense chart.
const CHART_MONTHS: usize = 8;

/// The state needed for the dashboard page and summary.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display a page with an overview of the user's finances.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let summary = get_dashboard_summary(&connection)
        .inspect_err(|error| tracing::error!("could not get dashboard summary: {error}"))?;
    let transactions = get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    drop(connection);

    let charts = if transactions.is_empty() {
        // Show what the chart would look like rather than an empty grid.
        build_dashboard_charts(&generate_sample_chart(today), &transactions, "Sample data")
    } else {
        build_dashboard_charts(
            &monthly_income_expense(&transactions, CHART_MONTHS),
            &transactions,
            "Last 8 months",
        )
    };

    Ok(dashboard_view(&summary, transactions.is_empty(), &charts).into_response())
}

/// Respond with income and expense totals over the latest transactions.
pub async fn get_dashboard_summary_endpoint(State(state): State<DashboardState>) -> Response {
    let result = state
        .db_connection
        .lock()
        .map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
        .and_then(|connection| get_dashboard_summary(&connection));

    match result {
        Ok(summary) => Json(summary).into_response(),
        Err(error) => error.into_json_response("Failed to fetch dashboard data"),
    }
}

fn build_dashboard_charts(
    points: &[ChartPoint],
    transactions: &[Transaction],
    subtitle: &str,
) -> Vec<PageChart> {
    let mut charts = vec![PageChart::new(
        "income-expense-chart",
        income_expense_chart(points, subtitle),
    )];

    let categories = expense_categories(transactions);
    if !categories.is_empty() {
        charts.push(PageChart::new(
            "expense-category-chart",
            expense_category_chart(&categories),
        ));
    }

    charts
}

fn dashboard_view(summary: &DashboardSummary, is_empty: bool, charts: &[PageChart]) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let transactions_link = link(endpoints::TRANSACTIONS_VIEW, "transactions page");

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class={ (PAGE_CONTAINER_STYLE) " max-w-screen-xl" }
        {
            div class="w-full space-y-6"
            {
                @if is_empty {
                    (sample_data_banner(
                        "No Data Available",
                        "Populate the database with sample data to see the dashboard in action.",
                    ))
                }

                (summary_cards(summary))

                (charts_view(charts))

                section
                {
                    h2 class="text-lg font-semibold mb-2" { "Recent Transactions" }

                    @if summary.recent_transactions.is_empty() {
                        p class="py-8 text-gray-500 dark:text-gray-400"
                        {
                            "No transactions found. Add some on the " (transactions_link) "."
                        }
                    } @else {
                        div id="recent-transactions" class="flex flex-col gap-2"
                        {
                            @for transaction in &summary.recent_transactions {
                                (recent_transaction_card(transaction))
                            }
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

    base("Dashboard", &head_elements, &content)
}

fn summary_cards(summary: &DashboardSummary) -> Markup {
    let net = summary.net();
    let net_style = if net < 0.0 { "text-red-600" } else { "text-green-600" };

    html!(
        div id="summary-cards" class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-4 gap-4"
        {
            (summary_card("Total Income", &format_currency(summary.total_income), "text-green-600"))
            (summary_card("Total Expenses", &format_currency(summary.total_expense), "text-red-600"))
            (summary_card("Net Balance", &format_currency(net), net_style))
            (summary_card("Savings Rate", &format_percentage(summary.savings_rate()), net_style))
        }
    )
}

fn recent_transaction_card(transaction: &Transaction) -> Markup {
    let (icon_style, icon, amount_style, sign) = match transaction.transaction_type {
        TransactionType::Income => ("bg-green-100 text-green-600", "↑", "text-green-600", "+"),
        TransactionType::Expense => ("bg-red-100 text-red-500", "↓", "text-red-500", "-"),
    };

    html!(
        div class={ (CARD_STYLE) " flex items-center gap-4" }
        {
            div class={ "flex items-center justify-center w-10 h-10 rounded-full text-xl " (icon_style) }
            {
                (icon)
            }

            div class="flex-1"
            {
                div class="font-semibold" { (transaction.description) }
                div class="text-xs text-gray-500 dark:text-gray-400"
                {
                    (transaction.date) " · " (transaction.category)
                }
            }

            span class={ "font-semibold " (amount_style) }
            {
                (sign) (format_currency(transaction.amount))
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, extract::State, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::Selector;
    use serde_json::Value;
    use time::OffsetDateTime;

    use crate::{
        AppState, Category, NewTransaction, TransactionType,
        dashboard::handlers::{DashboardState, get_dashboard_page, get_dashboard_summary_endpoint},
        db::initialize,
        endpoints,
        test_utils::{assert_valid_html, parse_html_document},
        transaction::insert_transactions,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn get_state(connection: Connection) -> DashboardState {
        DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn insert_sample_transactions(connection: &Connection) {
        let today = OffsetDateTime::now_utc().date();
        insert_transactions(
            &[
                NewTransaction::new(
                    5000.0,
                    "Paycheck",
                    Category::Salary,
                    today,
                    TransactionType::Income,
                )
                .unwrap(),
                NewTransaction::new(
                    1200.0,
                    "Monthly Rent",
                    Category::Rent,
                    today,
                    TransactionType::Expense,
                )
                .unwrap(),
            ],
            connection,
        )
        .unwrap();
    }

    #[track_caller]
    fn assert_element_exists(html: &scraper::Html, selector: &str) {
        let parsed = Selector::parse(selector).unwrap();
        assert!(
            html.select(&parsed).next().is_some(),
            "could not find {selector} in {}",
            html.html()
        );
    }

    #[tokio::test]
    async fn dashboard_page_shows_summary_and_charts() {
        let connection = get_test_connection();
        insert_sample_transactions(&connection);

        let response = get_dashboard_page(State(get_state(connection)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_element_exists(&html, "#summary-cards");
        assert_element_exists(&html, "#income-expense-chart");
        assert_element_exists(&html, "#expense-category-chart");
        assert_element_exists(&html, "#recent-transactions");
        assert!(html.html().contains("$5,000.00"));
        let banner = Selector::parse("#sample-data-banner").unwrap();
        assert!(html.select(&banner).next().is_none());
    }

    #[tokio::test]
    async fn empty_dashboard_offers_sample_data() {
        let response = get_dashboard_page(State(get_state(get_test_connection())))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_element_exists(&html, "#sample-data-banner button[hx-post='/api/test-db']");
        assert_element_exists(&html, "#income-expense-chart");
        assert!(html.html().contains("No transactions found."));
    }

    #[tokio::test]
    async fn summary_endpoint_returns_totals() {
        let state = AppState::new(get_test_connection(), "Etc/UTC").unwrap();
        {
            let connection = state.db_connection.lock().unwrap();
            insert_sample_transactions(&connection);
        }
        let app = Router::new()
            .route(endpoints::DASHBOARD_API, get(get_dashboard_summary_endpoint))
            .with_state(state);
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let body = server.get(endpoints::DASHBOARD_API).await.json::<Value>();

        assert_eq!(body["totalIncome"], 5000.0);
        assert_eq!(body["totalExpense"], 1200.0);
        assert_eq!(body["recentTransactions"].as_array().unwrap().len(), 2);
        assert_eq!(body["categoryBreakdown"][0]["category"], "Rent");
        assert_eq!(body["categoryBreakdown"][0]["total"], 1200.0);
    }
}
