//! Concurrent scenario execution

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tracing::{info, warn};

use super::checks::{
    check_at_most, check_cardinality, check_exact_count, check_filter, check_idempotent,
    check_zone, Violation,
};
use super::report::{Outcome, RunReport, ScenarioResult};
use super::scenario::{Expectation, Scenario};
use crate::client::AlertSource;
use crate::error::Result;

/// Runs scenarios against an [`AlertSource`]
pub struct ScenarioRunner {
    source: Arc<dyn AlertSource>,
    deadline: Option<Duration>,
}

struct Execution {
    returned: usize,
    violations: Vec<Violation>,
}

impl ScenarioRunner {
    /// Create a runner with no deadline
    pub fn new(source: Arc<dyn AlertSource>) -> Self {
        Self {
            source,
            deadline: None,
        }
    }

    /// Bound each scenario's wall-clock time
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Run all scenarios concurrently, preserving input order in the report
    pub async fn run_all(&self, scenarios: &[Scenario]) -> RunReport {
        let mut report = RunReport::new();
        info!(run_id = %report.run_id, scenarios = scenarios.len(), "Starting conformance run");

        report.results = join_all(scenarios.iter().map(|s| self.run(s))).await;

        info!(
            run_id = %report.run_id,
            passed = report.passed(),
            not_passed = report.not_passed(),
            "Conformance run finished"
        );
        report
    }

    /// Run a single scenario
    pub async fn run(&self, scenario: &Scenario) -> ScenarioResult {
        let started = Instant::now();

        let result = match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.execute(scenario)).await.ok(),
            None => Some(self.execute(scenario).await),
        };

        let (outcome, returned) = match result {
            Some(Ok(execution)) if execution.violations.is_empty() => {
                (Outcome::Passed, Some(execution.returned))
            }
            Some(Ok(execution)) => (
                Outcome::Failed {
                    violations: execution.violations,
                },
                Some(execution.returned),
            ),
            Some(Err(err)) => (
                Outcome::Errored {
                    kind: err.kind().to_string(),
                    message: err.to_string(),
                },
                None,
            ),
            None => (Outcome::TimedOut, None),
        };

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        if outcome.is_pass() {
            info!(scenario = %scenario.name, returned, elapsed_ms, "Scenario passed");
        } else {
            warn!(scenario = %scenario.name, outcome = ?outcome, elapsed_ms, "Scenario did not pass");
        }

        ScenarioResult {
            name: scenario.name.clone(),
            outcome,
            returned,
            elapsed_ms,
        }
    }

    async fn execute(&self, scenario: &Scenario) -> Result<Execution> {
        let page = self
            .source
            .list_alerts(&scenario.tenant_id, &scenario.filter, scenario.page_size, "")
            .await?;

        let mut violations = check_cardinality(&page, scenario.page_size);

        for expectation in &scenario.expectations {
            match expectation {
                Expectation::ExactCount(n) => violations.extend(check_exact_count(&page, *n)),
                Expectation::AtMost(n) => violations.extend(check_at_most(&page, *n)),
                Expectation::Empty => violations.extend(check_exact_count(&page, 0)),
                Expectation::AllInZone(zone) => violations.extend(check_zone(&page, zone)),
                Expectation::MatchesFilter => violations.extend(check_filter(&page, &scenario.filter)),
                Expectation::Idempotent => {
                    let repeat = self
                        .source
                        .list_alerts(&scenario.tenant_id, &scenario.filter, scenario.page_size, "")
                        .await?;
                    violations.extend(check_idempotent(&page, &repeat));
                }
            }
        }

        Ok(Execution {
            returned: page.len(),
            violations,
        })
    }
}
