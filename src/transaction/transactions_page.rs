//! Defines the route handler for the page that lists transactions as a table.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    category::{Category, TransactionType},
    date_format::DATE_FORMAT,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CARD_STYLE, CATEGORY_BADGE_STYLE,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
    timezone::get_local_date,
    transaction::core::{
        MAX_DESCRIPTION_LENGTH, Transaction, get_all_transactions, get_transactions_by_category,
    },
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters for filtering the transactions page.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    /// Only show transactions in this category. Empty means all categories.
    #[serde(default)]
    pub category: Option<String>,
}

impl TransactionsQuery {
    fn category_filter(&self) -> Option<Category> {
        let category = self.category.as_deref().map(str::trim)?;

        if category.is_empty() {
            return None;
        }

        category
            .parse()
            .inspect_err(|error| tracing::warn!("ignoring category filter: {error}"))
            .ok()
    }
}

/// Render the list of transactions with a form for adding new ones.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let today = get_local_date(&state.local_timezone)?;
    let category_filter = query.category_filter();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = match category_filter {
        Some(category) => get_transactions_by_category(category, &connection),
        None => get_all_transactions(&connection),
    }
    .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    Ok(transactions_view(&transactions, category_filter, today).into_response())
}

fn transactions_view(
    transactions: &[Transaction],
    category_filter: Option<Category>,
    today: Date,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let total_income: f64 = transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == TransactionType::Income)
        .map(|transaction| transaction.amount)
        .sum();
    let total_expenses: f64 = transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == TransactionType::Expense)
        .map(|transaction| transaction.amount)
        .sum();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl space-y-6"
            {
                h1 class="text-xl font-bold" { "Transactions" }

                (new_transaction_form(today))

                div class="flex justify-between flex-wrap items-end gap-4"
                {
                    (category_filter_form(category_filter))

                    p class="text-sm"
                    {
                        "Income: "
                        span class="font-semibold text-green-600" { (format_currency(total_income)) }
                        " Expenses: "
                        span class="font-semibold text-red-600" { (format_currency(total_expenses)) }
                    }
                }

                div class="overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                @for heading in ["Date", "Description", "Category", "Type", "Amount", "Actions"] {
                                    th scope="col" class=(TABLE_CELL_STYLE) { (heading) }
                                }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row(transaction))
                            }

                            @if transactions.is_empty() {
                                tr
                                {
                                    td
                                        colspan="6"
                                        class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                    {
                                        "No transactions found."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Transactions", &[], &content)
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let (amount_style, sign) = match transaction.transaction_type {
        TransactionType::Income => ("text-green-600 dark:text-green-400", "+"),
        TransactionType::Expense => ("text-red-600 dark:text-red-400", "-"),
    };
    let delete_url = format_endpoint(endpoints::DELETE_TRANSACTION_VIEW, transaction.id);

    html!(
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
            }
            td class=(TABLE_CELL_STYLE) { (transaction.transaction_type) }
            td class={ (TABLE_CELL_STYLE) " font-semibold " (amount_style) }
            {
                (sign) (format_currency(transaction.amount))
            }
            td class=(TABLE_CELL_STYLE)
            {
                button
                    hx-delete=(delete_url)
                    hx-confirm={
                        "Are you sure you want to delete '" (transaction.description) "'?"
                    }
                    hx-target="closest tr"
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

fn category_filter_form(selected: Option<Category>) -> Markup {
    html!(
        form method="get" action=(endpoints::TRANSACTIONS_VIEW) class="flex items-end gap-2"
        {
            div
            {
                label for="category-filter" class=(FORM_LABEL_STYLE) { "Category" }

                select
                    id="category-filter"
                    name="category"
                    class=(FORM_TEXT_INPUT_STYLE)
                    onchange="this.form.submit()"
                {
                    option value="" selected[selected.is_none()] { "All categories" }

                    @for category in Category::ALL {
                        option value=(category) selected[selected == Some(category)] { (category) }
                    }
                }
            }
        }
    )
}

fn new_transaction_form(today: Date) -> Markup {
    let today = today.format(DATE_FORMAT).unwrap_or_default();

    html!(
        form
            hx-post=(endpoints::TRANSACTIONS_VIEW)
            hx-target-error="#alert-container"
            class={ (CARD_STYLE) " grid grid-cols-1 md:grid-cols-3 gap-4" }
        {
            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }
                input
                    id="description"
                    type="text"
                    name="description"
                    placeholder="Weekly groceries"
                    maxlength=(MAX_DESCRIPTION_LENGTH)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                input
                    id="amount"
                    type="number"
                    name="amount"
                    step="0.01"
                    min="0.01"
                    placeholder="0.00"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                input
                    id="date"
                    type="date"
                    name="date"
                    value=(today)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                select id="category" name="category" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for category in Category::ALL {
                        option value=(category) { (category) }
                    }
                }
            }

            div
            {
                label for="type" class=(FORM_LABEL_STYLE) { "Type" }
                select id="type" name="type" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value=(TransactionType::Expense) { "Expense" }
                    option value=(TransactionType::Income) { "Income" }
                }
            }

            div class="flex items-end"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Transaction" }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        Category, TransactionType,
        db::initialize,
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_status_ok,
            assert_valid_html, must_get_form, parse_html_document,
        },
        transaction::{
            NewTransaction, create_transaction,
            transactions_page::{TransactionsPageState, TransactionsQuery, get_transactions_page},
        },
    };

    fn get_test_state(transactions: &[(f64, Category, TransactionType)]) -> TransactionsPageState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        for (amount, category, transaction_type) in transactions {
            create_transaction(
                NewTransaction::new(
                    *amount,
                    "Test",
                    *category,
                    date!(2025 - 07 - 01),
                    *transaction_type,
                )
                .unwrap(),
                &conn,
            )
            .unwrap();
        }

        TransactionsPageState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn lists_all_transactions() {
        let state = get_test_state(&[
            (10.0, Category::Food, TransactionType::Expense),
            (3000.0, Category::Salary, TransactionType::Income),
        ]);

        let response = get_transactions_page(State(state), Query(TransactionsQuery::default()))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let rows = html
            .select(&Selector::parse("tr[data-transaction-id]").unwrap())
            .count();
        assert_eq!(rows, 2);
    }

    #[tokio::test]
    async fn filters_by_category() {
        let state = get_test_state(&[
            (10.0, Category::Food, TransactionType::Expense),
            (20.0, Category::Food, TransactionType::Expense),
            (3000.0, Category::Salary, TransactionType::Income),
        ]);
        let query = TransactionsQuery {
            category: Some("Food".to_owned()),
        };

        let response = get_transactions_page(State(state), Query(query))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let rows = html
            .select(&Selector::parse("tr[data-transaction-id]").unwrap())
            .count();
        assert_eq!(rows, 2);
        let selected = html
            .select(&Selector::parse("#category-filter option[selected]").unwrap())
            .next()
            .expect("No selected category");
        assert_eq!(selected.value().attr("value"), Some("Food"));
    }

    #[tokio::test]
    async fn unknown_category_shows_everything() {
        let state = get_test_state(&[
            (10.0, Category::Food, TransactionType::Expense),
            (3000.0, Category::Salary, TransactionType::Income),
        ]);
        let query = TransactionsQuery {
            category: Some("Dining".to_owned()),
        };

        let response = get_transactions_page(State(state), Query(query))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let rows = html
            .select(&Selector::parse("tr[data-transaction-id]").unwrap())
            .count();
        assert_eq!(rows, 2);
    }

    #[tokio::test]
    async fn rows_have_delete_buttons() {
        let state = get_test_state(&[(10.0, Category::Food, TransactionType::Expense)]);

        let response = get_transactions_page(State(state), Query(TransactionsQuery::default()))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let button = html
            .select(&Selector::parse("button[hx-delete]").unwrap())
            .next()
            .expect("No delete button found");
        assert_eq!(button.value().attr("hx-delete"), Some("/transactions/1"));
        assert_eq!(button.value().attr("hx-swap"), Some("delete"));
    }

    #[tokio::test]
    async fn has_create_form() {
        let state = get_test_state(&[]);

        let response = get_transactions_page(State(state), Query(TransactionsQuery::default()))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_VIEW, "hx-post");
        assert_form_input(&form, "description", "text");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "date", "date");
        assert_form_submit_button(&form);
    }
}
