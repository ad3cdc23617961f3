//! Budget management.
//!
//! This module contains everything related to monthly category budgets:
//! - The `Budget` model, validation and database queries
//! - JSON API handlers
//! - The budgets page and its create/delete endpoints

mod api;
mod budgets_page;
mod core;
mod create_endpoint;
mod delete_endpoint;

pub use api::{
    create_budget_api_endpoint, delete_budget_api_endpoint, list_budgets_endpoint,
    update_budget_endpoint,
};
pub use budgets_page::get_budgets_page;
pub use core::{
    Budget, BudgetUpdate, NewBudget, count_budgets, create_budget, create_budget_table,
    delete_all_budgets, get_budgets, insert_budgets,
};
pub use create_endpoint::create_budget_endpoint;
pub use delete_endpoint::delete_budget_endpoint;

#[cfg(test)]
pub use core::{delete_budget, get_budget, update_budget};
