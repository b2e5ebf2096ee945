//! Query filter types sent with every `ListAlerts` call

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::alert::{Alert, AlertDirection, AlertState};
use super::time::start_of_record;
use crate::error::{Error, Result};

/// Closed time window, both bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlice {
    /// Window start
    pub start_time: DateTime<Utc>,
    /// Window end
    pub end_time: DateTime<Utc>,
}

impl TimeSlice {
    /// Create a new time slice
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// Everything from the start of record up to now
    pub fn since_start_of_record() -> Self {
        Self::new(start_of_record(), Utc::now())
    }

    /// Whether `instant` falls inside the window
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start_time && instant <= self.end_time
    }
}

/// Filter applied by the backend to a `ListAlerts` query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertFilter {
    /// Time window to search
    pub time: TimeSlice,

    /// Return alerts regardless of open/closed state
    #[serde(default)]
    pub list_all_alerts: bool,
    /// Include open alerts
    #[serde(default)]
    pub open_alerts: bool,
    /// Include closed alerts
    #[serde(default)]
    pub closed_alerts: bool,

    /// Include traffic entering the perimeter
    #[serde(default)]
    pub perimeter_ingress: bool,
    /// Include traffic leaving the perimeter
    #[serde(default)]
    pub perimeter_egress: bool,
    /// Include inbound home traffic from non-partners
    #[serde(default)]
    pub home_non_partner_ingress: bool,
    /// Include outbound home traffic to non-partners
    #[serde(default)]
    pub home_non_partner_egress: bool,
    /// Include partner-to-partner traffic
    #[serde(default)]
    pub partner_to_partner: bool,

    /// Restrict to internal client endpoints in this zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

impl AlertFilter {
    /// Start building a filter over `time`
    pub fn builder(time: TimeSlice) -> AlertFilterBuilder {
        AlertFilterBuilder::new(time)
    }

    /// Zone restriction, treating an empty string as none
    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref().filter(|z| !z.is_empty())
    }

    /// Directions enabled by the toggles
    pub fn directions(&self) -> Vec<AlertDirection> {
        [
            (self.perimeter_ingress, AlertDirection::PerimeterIngress),
            (self.perimeter_egress, AlertDirection::PerimeterEgress),
            (self.home_non_partner_ingress, AlertDirection::HomeNonPartnerIngress),
            (self.home_non_partner_egress, AlertDirection::HomeNonPartnerEgress),
            (self.partner_to_partner, AlertDirection::PartnerToPartner),
        ]
        .into_iter()
        .filter_map(|(enabled, direction)| enabled.then_some(direction))
        .collect()
    }

    /// Whether alerts in `state` are admitted by the status toggles.
    ///
    /// With neither status toggle set the filter places no constraint.
    pub fn admits_state(&self, state: AlertState) -> bool {
        if self.list_all_alerts || (!self.open_alerts && !self.closed_alerts) {
            return true;
        }
        match state {
            AlertState::Open => self.open_alerts,
            AlertState::Closed => self.closed_alerts,
        }
    }

    /// Whether an alert with `direction` is admitted by the direction toggles
    pub fn admits_direction(&self, direction: Option<AlertDirection>) -> bool {
        let enabled = self.directions();
        if enabled.is_empty() {
            return true;
        }
        direction.is_some_and(|d| enabled.contains(&d))
    }

    /// Whether the alert's client endpoint satisfies the zone restriction
    pub fn admits_zone(&self, alert: &Alert) -> bool {
        match self.zone() {
            Some(zone) => alert.client.in_zone(zone),
            None => true,
        }
    }

    /// Local sanity checks performed before a request is sent
    pub fn validate(&self) -> Result<()> {
        if self.time.start_time > self.time.end_time {
            return Err(Error::invalid(format!(
                "time range start {} is after end {}",
                self.time.start_time.to_rfc3339(),
                self.time.end_time.to_rfc3339()
            )));
        }
        Ok(())
    }
}

/// Fluent builder for [`AlertFilter`]
#[derive(Debug, Clone)]
pub struct AlertFilterBuilder {
    filter: AlertFilter,
}

impl AlertFilterBuilder {
    fn new(time: TimeSlice) -> Self {
        Self {
            filter: AlertFilter {
                time,
                list_all_alerts: false,
                open_alerts: false,
                closed_alerts: false,
                perimeter_ingress: false,
                perimeter_egress: false,
                home_non_partner_ingress: false,
                home_non_partner_egress: false,
                partner_to_partner: false,
                zone: None,
            },
        }
    }

    /// Ignore the open/closed toggles
    pub fn list_all(mut self, value: bool) -> Self {
        self.filter.list_all_alerts = value;
        self
    }

    /// Include open alerts
    pub fn open(mut self, value: bool) -> Self {
        self.filter.open_alerts = value;
        self
    }

    /// Include closed alerts
    pub fn closed(mut self, value: bool) -> Self {
        self.filter.closed_alerts = value;
        self
    }

    /// Include perimeter ingress
    pub fn perimeter_ingress(mut self, value: bool) -> Self {
        self.filter.perimeter_ingress = value;
        self
    }

    /// Include perimeter egress
    pub fn perimeter_egress(mut self, value: bool) -> Self {
        self.filter.perimeter_egress = value;
        self
    }

    /// Include home non-partner ingress
    pub fn home_non_partner_ingress(mut self, value: bool) -> Self {
        self.filter.home_non_partner_ingress = value;
        self
    }

    /// Include home non-partner egress
    pub fn home_non_partner_egress(mut self, value: bool) -> Self {
        self.filter.home_non_partner_egress = value;
        self
    }

    /// Include partner-to-partner
    pub fn partner_to_partner(mut self, value: bool) -> Self {
        self.filter.partner_to_partner = value;
        self
    }

    /// Enable all five direction toggles
    pub fn all_directions(self) -> Self {
        self.perimeter_ingress(true)
            .perimeter_egress(true)
            .home_non_partner_ingress(true)
            .home_non_partner_egress(true)
            .partner_to_partner(true)
    }

    /// Restrict to a zone; an empty string clears the restriction
    pub fn zone(mut self, zone: impl Into<String>) -> Self {
        let zone = zone.into();
        self.filter.zone = if zone.is_empty() { None } else { Some(zone) };
        self
    }

    /// Finish the filter
    pub fn build(self) -> AlertFilter {
        self.filter
    }
}
