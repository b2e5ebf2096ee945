//! Run results

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::checks::Violation;

/// How a single scenario ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Every expectation held
    Passed,
    /// The call succeeded but at least one property failed
    Failed {
        /// Every property that failed
        violations: Vec<Violation>,
    },
    /// The call failed; the result set is undefined
    Errored {
        /// Short error class, see [`crate::Error::kind`]
        kind: String,
        /// Rendered error
        message: String,
    },
    /// The deadline elapsed before the call finished
    TimedOut,
}

impl Outcome {
    /// True for [`Outcome::Passed`]
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    fn label(&self) -> &'static str {
        match self {
            Outcome::Passed => "PASS",
            Outcome::Failed { .. } => "FAIL",
            Outcome::Errored { .. } => "ERROR",
            Outcome::TimedOut => "TIMEOUT",
        }
    }
}

/// Result of one scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// Scenario name
    pub name: String,
    /// How it ended
    pub outcome: Outcome,
    /// Alerts on the first page, when the call succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returned: Option<usize>,
    /// Wall-clock time spent, in milliseconds
    pub elapsed_ms: u64,
}

/// Results of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Unique id of this run
    pub run_id: Uuid,
    /// When the run began
    pub started_at: DateTime<Utc>,
    /// Per-scenario results, in scenario order
    pub results: Vec<ScenarioResult>,
}

impl RunReport {
    /// Start an empty report
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            results: Vec::new(),
        }
    }

    /// Number of passing scenarios
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_pass()).count()
    }

    /// Number of scenarios that failed, errored or timed out
    pub fn not_passed(&self) -> usize {
        self.results.len() - self.passed()
    }

    /// True when every scenario passed
    pub fn all_passed(&self) -> bool {
        self.not_passed() == 0
    }

    /// Look up a result by scenario name
    pub fn get(&self, name: &str) -> Option<&ScenarioResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// Human-readable summary
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Run {} ({})", self.run_id, self.started_at.to_rfc3339());

        for result in &self.results {
            let returned = result
                .returned
                .map_or_else(|| "-".to_string(), |n| n.to_string());
            let _ = writeln!(
                out,
                "  {:<8} {:<36} returned={:<4} {}ms",
                result.outcome.label(),
                result.name,
                returned,
                result.elapsed_ms
            );
            match &result.outcome {
                Outcome::Failed { violations } => {
                    for violation in violations {
                        let _ = writeln!(out, "           - {violation}");
                    }
                }
                Outcome::Errored { kind, message } => {
                    let _ = writeln!(out, "           - {kind}: {message}");
                }
                Outcome::Passed | Outcome::TimedOut => {}
            }
        }

        let _ = writeln!(
            out,
            "{} passed, {} not passed",
            self.passed(),
            self.not_passed()
        );
        out
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
