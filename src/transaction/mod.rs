//! Transaction management.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model, validation and database queries
//! - JSON API handlers
//! - The transactions page and its create/delete endpoints

mod api;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod transactions_page;

pub use api::{
    create_transaction_api_endpoint, delete_transaction_api_endpoint, get_transaction_endpoint,
    list_transactions_endpoint, update_transaction_endpoint,
};
pub(crate) use api::json_rejection_response;
pub use core::{
    MAX_DESCRIPTION_LENGTH, NewTransaction, Transaction, TransactionUpdate, count_transactions,
    create_transaction, create_transaction_table, delete_all_transactions, get_all_transactions,
    get_latest_transactions, get_transactions_in_range, insert_transactions,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use transactions_page::get_transactions_page;

#[cfg(test)]
pub use core::{
    delete_transaction, get_transaction, get_transactions_by_category, update_transaction,
};
