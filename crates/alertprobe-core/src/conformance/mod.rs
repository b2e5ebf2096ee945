//! Conformance harness for `ListAlerts` backends
//!
//! Scenarios pair a request with expectations; the runner issues them
//! concurrently and property checks turn each page into violations.

mod checks;
mod report;
mod runner;
mod scenario;

pub use checks::{
    check_at_most, check_cardinality, check_exact_count, check_filter, check_idempotent,
    check_zone, Property, Violation,
};
pub use report::{Outcome, RunReport, ScenarioResult};
pub use runner::ScenarioRunner;
pub use scenario::{builtin, Expectation, Scenario};
