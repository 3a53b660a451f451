//! Integration tests for the Calbudget API.
//!
//! These tests drive the full router: budget calculation, report sheets,
//! annexure building, and scope browsing.

// Inline so the modules resolve under tests/integration_tests/
mod integration_tests {
    mod common;

    mod budget_tests;
    mod health_tests;
    mod report_tests;
    mod scope_tests;
}
