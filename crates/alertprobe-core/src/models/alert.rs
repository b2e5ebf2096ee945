//! Alert data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlertState {
    /// Alert has not been closed
    #[default]
    Open,
    /// Alert has been closed
    Closed,
}

/// Traffic direction relative to the trust boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertDirection {
    /// Inbound across the perimeter
    PerimeterIngress,
    /// Outbound across the perimeter
    PerimeterEgress,
    /// Inbound from a home network endpoint that is not a partner
    HomeNonPartnerIngress,
    /// Outbound to a home network endpoint that is not a partner
    HomeNonPartnerEgress,
    /// Between two partner endpoints
    PartnerToPartner,
}

/// An internal (trusted) endpoint, the only kind tagged with a zone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalEndpoint {
    /// Zone tag
    pub zone: String,

    /// Application the workload belongs to
    #[serde(default)]
    pub app: String,

    /// Kubernetes namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Pod name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_name: Option<String>,

    /// Container name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_name: Option<String>,

    /// Process that made or accepted the connection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<String>,
}

/// An endpoint outside the trust boundary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalEndpoint {
    /// DNS name or wildcard pattern
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_pattern: Option<String>,

    /// Remote address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    /// Remote port
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Owning organization, when the backend could resolve one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

/// Endpoint descriptor attached to either side of an alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndPoint {
    /// Internal endpoint carrying a zone tag
    Internal(InternalEndpoint),
    /// External endpoint, never zoned
    External(ExternalEndpoint),
}

impl EndPoint {
    /// Zone tag, present only on internal endpoints
    pub fn zone(&self) -> Option<&str> {
        match self {
            EndPoint::Internal(internal) => Some(internal.zone.as_str()),
            EndPoint::External(_) => None,
        }
    }

    /// Borrow the internal variant, if this is one
    pub fn as_internal(&self) -> Option<&InternalEndpoint> {
        match self {
            EndPoint::Internal(internal) => Some(internal),
            EndPoint::External(_) => None,
        }
    }

    /// Whether this endpoint is internal and tagged with exactly `zone`
    pub fn in_zone(&self, zone: &str) -> bool {
        self.zone() == Some(zone)
    }

    /// Short label used in logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            EndPoint::Internal(_) => "internal",
            EndPoint::External(_) => "external",
        }
    }
}

/// A single alert as returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Backend identifier
    pub alert_id: String,

    /// Side that initiated the flow
    pub client: EndPoint,

    /// Side that accepted the flow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<EndPoint>,

    /// Direction classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<AlertDirection>,

    /// Open or closed
    #[serde(default)]
    pub state: AlertState,

    /// When the alert was raised
    pub timestamp: DateTime<Utc>,

    /// Backend classification of the alert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_type: Option<String>,

    /// Severity label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Alert {
    /// Zone of the client endpoint, if it is internal
    pub fn client_zone(&self) -> Option<&str> {
        self.client.zone()
    }
}
