//! Conformance scenarios

use serde::Serialize;

use crate::error::Result;
use crate::models::time::utc_instant;
use crate::models::{AlertFilter, TimeSlice};

/// What a scenario asserts about the first page it gets back.
///
/// The cardinality bound against the requested page size is always checked
/// and does not need to be listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Expectation {
    /// Exactly this many alerts
    ExactCount(usize),
    /// No more than this many alerts
    AtMost(usize),
    /// No alerts and no error
    Empty,
    /// Every client endpoint is internal in this zone
    AllInZone(String),
    /// Every alert satisfies the scenario's own filter
    MatchesFilter,
    /// A repeated identical request returns the same cardinality
    Idempotent,
}

/// A named `ListAlerts` request plus its expectations
#[derive(Debug, Clone, Serialize)]
pub struct Scenario {
    /// Stable identifier used by `check --only`
    pub name: String,
    /// Human-readable summary
    pub description: String,
    /// Tenant the request is issued for
    pub tenant_id: String,
    /// Filter sent with the request
    pub filter: AlertFilter,
    /// Requested page size
    pub page_size: u32,
    /// Properties checked against the first page
    pub expectations: Vec<Expectation>,
}

impl Scenario {
    /// Create a scenario with no expectations beyond the cardinality bound
    pub fn new(
        name: impl Into<String>,
        tenant_id: impl Into<String>,
        filter: AlertFilter,
        page_size: u32,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            tenant_id: tenant_id.into(),
            filter,
            page_size,
            expectations: Vec::new(),
        }
    }

    /// Set the description
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add an expectation
    pub fn expect(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    /// Whether this scenario sends a second request
    pub fn repeats_request(&self) -> bool {
        self.expectations.contains(&Expectation::Idempotent)
    }
}

const NIGHTLY_ZONE: &str = "nightlycommon";
const EMPTY_ZONE: &str = "intern-nightly";

/// Open alerts in every direction, no zone
fn open_all_directions(time: TimeSlice) -> crate::models::AlertFilterBuilder {
    AlertFilter::builder(time)
        .list_all(false)
        .open(true)
        .closed(false)
        .all_directions()
}

/// The standard scenarios run by `alertprobe check`
pub fn builtin(tenant_id: &str) -> Result<Vec<Scenario>> {
    let since_start = TimeSlice::since_start_of_record();
    let quiet_minute = TimeSlice::new(
        utc_instant(2022, 7, 25, 3, 8)?,
        utc_instant(2022, 7, 25, 3, 9)?,
    );

    Ok(vec![
        Scenario::new(
            "alerts-since-start-of-record",
            tenant_id,
            open_all_directions(since_start).build(),
            10,
        )
        .describe("Open alerts since the start of record fill a full page")
        .expect(Expectation::ExactCount(10))
        .expect(Expectation::MatchesFilter),
        Scenario::new(
            "alerts-zone-filter",
            tenant_id,
            open_all_directions(since_start).zone(NIGHTLY_ZONE).build(),
            10,
        )
        .describe("Zone filter returns only alerts from that zone")
        .expect(Expectation::AllInZone(NIGHTLY_ZONE.to_string()))
        .expect(Expectation::MatchesFilter),
        Scenario::new(
            "alerts-zone-filter-no-results",
            tenant_id,
            open_all_directions(quiet_minute).zone(EMPTY_ZONE).build(),
            10,
        )
        .describe("Zone filter over a quiet minute returns nothing")
        .expect(Expectation::Empty)
        .expect(Expectation::Idempotent),
    ])
}
