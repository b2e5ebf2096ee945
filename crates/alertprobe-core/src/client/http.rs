//! HTTP implementation of [`AlertSource`]

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};
use url::Url;

use super::{validate_request, AlertSource};
use crate::config::BackendConfig;
use crate::error::{Error, Result};
use crate::models::{Alert, AlertFilter, AlertPage};

/// Client for a remote `ListAlerts` endpoint.
///
/// Cheap to clone; clones share the underlying connection pool but every
/// call owns its own request and response buffers.
#[derive(Clone)]
pub struct AlertClient {
    client: Client,
    list_url: Url,
    token: String,
}

impl AlertClient {
    /// Create a client from backend settings
    pub fn new(config: &BackendConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("alertprobe/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            list_url: config.list_url()?,
            token: config.token.clone(),
        })
    }

    /// Endpoint this client posts to
    pub fn list_url(&self) -> &Url {
        &self.list_url
    }
}

impl std::fmt::Debug for AlertClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertClient")
            .field("list_url", &self.list_url.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AlertSource for AlertClient {
    async fn list_alerts(
        &self,
        tenant_id: &str,
        filter: &AlertFilter,
        page_size: u32,
        continuation_token: &str,
    ) -> Result<AlertPage> {
        validate_request(tenant_id, filter, page_size)?;
        if self.token.is_empty() {
            return Err(Error::transport("no API token configured"));
        }

        let request = ListAlertsRequest {
            tenant_id,
            filter,
            count: page_size,
            paging_token: continuation_token,
        };

        debug!(
            tenant_id,
            page_size,
            zone = filter.zone().unwrap_or(""),
            first_page = continuation_token.is_empty(),
            "Sending ListAlerts"
        );

        let response = self
            .client
            .post(self.list_url.clone())
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(tenant_id, %status, "ListAlerts authentication rejected");
            return Err(Error::transport(format!(
                "authentication rejected ({status}): {}",
                String::from_utf8_lossy(&body)
            )));
        }

        if !status.is_success() {
            let (code, message) = match serde_json::from_slice::<ListAlertsResponse>(&body) {
                Ok(ListAlertsResponse {
                    response: Some(fault),
                    ..
                }) => (fault.code, fault.message),
                _ => (String::new(), String::from_utf8_lossy(&body).into_owned()),
            };
            warn!(tenant_id, %status, code = %code, "ListAlerts failed");
            return Err(Error::backend(status.as_u16(), code, message));
        }

        let envelope: ListAlertsResponse =
            serde_json::from_slice(&body).map_err(|e| Error::Decode(e.to_string()))?;

        if let Some(fault) = envelope.response.filter(|r| !r.is_success()) {
            warn!(tenant_id, code = %fault.code, "ListAlerts reported a fault");
            return Err(Error::backend(status.as_u16(), fault.code, fault.message));
        }

        debug!(
            tenant_id,
            count = envelope.alerts.len(),
            more = !envelope.paging_token.is_empty(),
            "ListAlerts returned"
        );

        Ok(AlertPage::new(envelope.alerts, envelope.paging_token))
    }
}

// Wire types
#[derive(Debug, Serialize)]
struct ListAlertsRequest<'a> {
    tenant_id: &'a str,
    filter: &'a AlertFilter,
    count: u32,
    paging_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct ListAlertsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    alerts: Vec<Alert>,
    #[serde(default, deserialize_with = "null_as_default")]
    paging_token: String,
    #[serde(default)]
    response: Option<ResponseStatus>,
}

/// Explicit `null` reads the same as an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct ResponseStatus {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl ResponseStatus {
    fn is_success(&self) -> bool {
        self.code.is_empty() || self.code.eq_ignore_ascii_case("SUCCESS")
    }
}
