//! Shared page layout, styles and formatting helpers for the HTML views.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use crate::endpoints;

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-blue-500 \
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-500 dark:hover:text-red-400 underline bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Category badge style
pub const CATEGORY_BADGE_STYLE: &str = "inline-flex items-center px-2.5 py-0.5 \
    text-xs font-semibold text-blue-800 bg-blue-100 rounded-full \
    dark:bg-blue-900 dark:text-blue-300";

// Card style
pub const CARD_STYLE: &str = "p-4 bg-white rounded-lg shadow dark:bg-gray-800";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

/// The script that draws ECharts charts on the client.
pub const ECHARTS_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
}

pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Money Manager" }

                script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                script src="https://cdn.jsdelivr.net/npm/htmx.org@2.0.8/dist/htmx.min.js" {}
                script src="https://cdn.jsdelivr.net/npm/htmx-ext-response-targets@2.0.4" {}

                style
                {
                    r#"
                    #indicator.htmx-indicator {
                        display: none;
                    }

                    #indicator.htmx-request .htmx-indicator {
                        display: inline;
                    }

                    .echarts-tooltip {
                        z-index: 30 !important;
                    }
                    "#
                }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
                    }
                }
            }

            body
                hx-ext="response-targets"
                class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)

                // Alert container for error responses and out-of-band swaps
                div
                    id="alert-container"
                    class="w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {}
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to Homepage"
                    }
                }
            }
        }
    );

    base(title, &[], &content)
}

/// A card with a small label above a large value, used for summary figures.
pub fn summary_card(label: &str, value: &str, value_style: &str) -> Markup {
    html!(
        div class=(CARD_STYLE)
        {
            p class="text-sm text-gray-500 dark:text-gray-400" { (label) }
            p class={ "text-2xl font-bold " (value_style) } { (value) }
        }
    )
}

/// A horizontal bar filled to `percentage`, capped at 100%.
///
/// The bar turns red when `percentage` exceeds 100.
pub fn progress_bar(percentage: f64) -> Markup {
    let width = percentage.clamp(0.0, 100.0);
    let colour = if percentage > 100.0 {
        "bg-red-600"
    } else if percentage > 80.0 {
        "bg-yellow-400"
    } else {
        "bg-green-600"
    };

    html!(
        div class="w-full h-2.5 bg-gray-200 rounded-full dark:bg-gray-700"
        {
            div
                class={ "h-2.5 rounded-full " (colour) }
                style=(format!("width: {width:.1}%"))
            {}
        }
    )
}

/// A banner with a button that fills the database with sample data.
///
/// The server asks htmx to refresh the page once the data has been saved.
pub fn sample_data_banner(title: &str, message: &str) -> Markup {
    html!(
        div
            id="sample-data-banner"
            class="w-full p-4 border rounded-lg bg-amber-50 border-amber-200
                dark:bg-amber-900/20 dark:border-amber-700"
        {
            div class="flex items-center justify-between gap-4"
            {
                div
                {
                    h3 class="font-medium text-amber-800 dark:text-amber-200" { (title) }
                    p class="mt-1 text-sm text-amber-700 dark:text-amber-300" { (message) }
                }

                button
                    hx-post=(endpoints::TEST_DB_API)
                    hx-target-error="#alert-container"
                    hx-disabled-elt="this"
                    class="px-4 py-2 text-white rounded bg-amber-600 hover:bg-amber-700
                        disabled:bg-amber-400"
                {
                    "Load Sample Data"
                }
            }
        }
    )
}

/// Format `number` as dollars and cents, e.g. "$1,234.50" or "-$12.30".
pub fn format_currency(number: f64) -> String {
    static WHOLE_DOLLAR_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let whole_dollar_fmt = WHOLE_DOLLAR_FMT.get_or_init(|| {
        Formatter::currency("$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(0)))
    });

    let total_cents = (number.abs() * 100.0).round();
    let dollars = (total_cents / 100.0).trunc();
    let cents = (total_cents - dollars * 100.0) as u32;
    let sign = if number < 0.0 && total_cents > 0.0 { "-" } else { "" };

    let dollars = match whole_dollar_fmt {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        Some(_) if dollars == 0.0 => "$0".to_owned(),
        Some(formatter) => formatter.fmt_string(dollars),
        None => format!("${dollars}"),
    };

    format!("{sign}{dollars}.{cents:02}")
}

/// Format `percentage` with one decimal place, e.g. "42.5%".
pub fn format_percentage(percentage: f64) -> String {
    format!("{percentage:.1}%")
}

/// A link with blue text for use in a <p> tag.
pub fn link(url: &str, text: &str) -> Markup {
    html! (
        a href=(url) class=(LINK_STYLE)
        {
          (text)
        }
    )
}
