//! Property checks over returned pages
//!
//! Each check returns the violations it found; an empty vector is a pass.

use std::fmt;

use serde::Serialize;

use crate::models::{AlertFilter, AlertPage};

/// Property a violation was raised against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    /// More alerts than the requested page size
    Cardinality,
    /// Client endpoint outside the requested zone
    Zone,
    /// Open/closed state not admitted by the filter
    State,
    /// Direction not admitted by the filter
    Direction,
    /// Timestamp outside the requested window
    TimeRange,
    /// Count outside the expected bound
    Count,
    /// Repeating the request changed the result cardinality
    Idempotence,
}

/// A single failed property
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Property that failed
    pub property: Property,
    /// Offending alert, when the violation is about one record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_id: Option<String>,
    /// What was observed
    pub detail: String,
}

impl Violation {
    fn page(property: Property, detail: String) -> Self {
        Self {
            property,
            alert_id: None,
            detail,
        }
    }

    fn alert(property: Property, alert_id: &str, detail: String) -> Self {
        Self {
            property,
            alert_id: Some(alert_id.to_string()),
            detail,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alert_id {
            Some(id) => write!(f, "{:?} [{}]: {}", self.property, id, self.detail),
            None => write!(f, "{:?}: {}", self.property, self.detail),
        }
    }
}

/// The page holds no more than `page_size` alerts
pub fn check_cardinality(page: &AlertPage, page_size: u32) -> Vec<Violation> {
    if page.len() > page_size as usize {
        vec![Violation::page(
            Property::Cardinality,
            format!("{} alerts returned for page size {page_size}", page.len()),
        )]
    } else {
        Vec::new()
    }
}

/// Every client endpoint is internal and tagged with exactly `zone`
pub fn check_zone(page: &AlertPage, zone: &str) -> Vec<Violation> {
    page.alerts
        .iter()
        .filter_map(|alert| match alert.client.zone() {
            Some(z) if z == zone => None,
            Some(z) => Some(Violation::alert(
                Property::Zone,
                &alert.alert_id,
                format!("client zone '{z}', want '{zone}'"),
            )),
            None => Some(Violation::alert(
                Property::Zone,
                &alert.alert_id,
                format!("client endpoint is {}, want internal in '{zone}'", alert.client.kind()),
            )),
        })
        .collect()
}

/// Every alert satisfies every active toggle of `filter`
pub fn check_filter(page: &AlertPage, filter: &AlertFilter) -> Vec<Violation> {
    let mut violations = Vec::new();

    for alert in &page.alerts {
        if !filter.admits_state(alert.state) {
            violations.push(Violation::alert(
                Property::State,
                &alert.alert_id,
                format!("state {:?} excluded by filter", alert.state),
            ));
        }
        if !filter.admits_direction(alert.direction) {
            violations.push(Violation::alert(
                Property::Direction,
                &alert.alert_id,
                format!("direction {:?} excluded by filter", alert.direction),
            ));
        }
        if !filter.time.contains(alert.timestamp) {
            violations.push(Violation::alert(
                Property::TimeRange,
                &alert.alert_id,
                format!(
                    "timestamp {} outside [{}, {}]",
                    alert.timestamp.to_rfc3339(),
                    filter.time.start_time.to_rfc3339(),
                    filter.time.end_time.to_rfc3339()
                ),
            ));
        }
    }

    if let Some(zone) = filter.zone() {
        violations.extend(check_zone(page, zone));
    }

    violations
}

/// The page holds exactly `expected` alerts
pub fn check_exact_count(page: &AlertPage, expected: usize) -> Vec<Violation> {
    if page.len() == expected {
        Vec::new()
    } else {
        vec![Violation::page(
            Property::Count,
            format!("{} alerts returned, want {expected}", page.len()),
        )]
    }
}

/// The page holds at most `limit` alerts
pub fn check_at_most(page: &AlertPage, limit: usize) -> Vec<Violation> {
    if page.len() <= limit {
        Vec::new()
    } else {
        vec![Violation::page(
            Property::Count,
            format!("{} alerts returned, want at most {limit}", page.len()),
        )]
    }
}

/// Two identical requests returned the same number of alerts
pub fn check_idempotent(first: &AlertPage, second: &AlertPage) -> Vec<Violation> {
    if first.len() == second.len() {
        Vec::new()
    } else {
        vec![Violation::page(
            Property::Idempotence,
            format!("first call returned {}, repeat returned {}", first.len(), second.len()),
        )]
    }
}
