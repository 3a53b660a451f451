//! API route definitions.
//!
//! This module organizes all HTTP routes for the Calbudget API server.

mod budgets;
pub mod error;
mod health;
mod parameters;
mod reports;
mod scope;

pub use budgets::budget_routes;
pub use health::health_routes;
pub use parameters::parameter_routes;
pub use reports::report_routes;
pub use scope::scope_routes;
