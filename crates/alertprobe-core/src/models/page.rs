//! Paged results returned by `ListAlerts`

use serde::{Deserialize, Serialize};

use super::alert::Alert;

/// One page of alerts plus the cursor for the next page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertPage {
    /// Alerts in backend order
    pub alerts: Vec<Alert>,

    /// Continuation token; empty when there are no more pages
    #[serde(default)]
    pub next_token: String,
}

impl AlertPage {
    /// Create a page
    pub fn new(alerts: Vec<Alert>, next_token: impl Into<String>) -> Self {
        Self {
            alerts,
            next_token: next_token.into(),
        }
    }

    /// True when no further pages follow
    pub fn is_last(&self) -> bool {
        self.next_token.is_empty()
    }

    /// Number of alerts on the page
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// True when the page carries no alerts
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
