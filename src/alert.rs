//! Alert fragments for displaying success and error messages to users.
//!
//! Alerts are swapped into the `#alert-container` element of the base layout
//! by htmx, either as the response to a failed form submission or as an
//! out-of-band swap.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};

/// A message to show the user in the alert container.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// Something worked, no further details.
    SuccessSimple { message: String },
    /// Something failed, with details on how to fix it.
    Error { message: String, details: String },
}

impl Alert {
    fn into_html(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::SuccessSimple { message } => (
                "text-green-800 border-green-300 bg-green-50 dark:bg-gray-800 \
                dark:text-green-400 dark:border-green-800",
                message,
                None,
            ),
            Alert::Error { message, details } => (
                "text-red-800 border-red-300 bg-red-50 dark:bg-gray-800 \
                dark:text-red-400 dark:border-red-800",
                message,
                Some(details),
            ),
        };

        html! {
            div
                class={ "flex flex-col p-4 mb-4 text-sm border rounded-lg " (container_style) }
                role="alert"
            {
                p class="font-medium" { (message) }

                @if let Some(details) = details {
                    @if !details.is_empty() {
                        span { (details) }
                    }
                }

                button
                    type="button"
                    class="self-end mt-2 underline"
                    onclick="this.parentElement.remove()"
                {
                    "Dismiss"
                }
            }
        }
    }

    /// Render the alert with a custom status code.
    ///
    /// htmx only swaps error responses into the alert container when the
    /// response has an error status, so error alerts should use a 4xx or 5xx code.
    pub fn into_response_with_status(self, status_code: StatusCode) -> Response {
        (status_code, Html(self.into_html().into_string())).into_response()
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_response_with_status(StatusCode::OK)
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use scraper::Selector;

    use crate::{
        alert::Alert,
        test_utils::{assert_valid_html, parse_html_fragment},
    };

    #[tokio::test]
    async fn error_alert_shows_message_and_details() {
        let response = Alert::Error {
            message: "Could not delete budget".to_owned(),
            details: "The budget could not be found.".to_owned(),
        }
        .into_response_with_status(StatusCode::NOT_FOUND);

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);

        let message = html
            .select(&Selector::parse("p").unwrap())
            .next()
            .expect("No message found")
            .text()
            .collect::<String>();
        assert_eq!(message.trim(), "Could not delete budget");

        let details = html
            .select(&Selector::parse("span").unwrap())
            .next()
            .expect("No details found")
            .text()
            .collect::<String>();
        assert_eq!(details.trim(), "The budget could not be found.");
    }

    #[tokio::test]
    async fn success_alert_defaults_to_ok() {
        let response = Alert::SuccessSimple {
            message: "Budget deleted successfully".to_owned(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
