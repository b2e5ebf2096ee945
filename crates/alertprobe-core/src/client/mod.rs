//! Alert query client
//!
//! [`AlertSource`] is the `ListAlerts` seam: the HTTP client implements it
//! for live backends and the conformance runner only depends on the trait.

mod http;

pub use http::AlertClient;

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{AlertFilter, AlertPage};

/// Anything that can answer a `ListAlerts` query
#[async_trait]
pub trait AlertSource: Send + Sync {
    /// Fetch one page of alerts for `tenant_id` matching `filter`.
    ///
    /// `continuation_token` is empty for the first page. An `Err` means the
    /// result set is undefined, not empty.
    async fn list_alerts(
        &self,
        tenant_id: &str,
        filter: &AlertFilter,
        page_size: u32,
        continuation_token: &str,
    ) -> Result<AlertPage>;
}

/// Local argument checks shared by every [`AlertSource`] implementation
pub fn validate_request(tenant_id: &str, filter: &AlertFilter, page_size: u32) -> Result<()> {
    if tenant_id.trim().is_empty() {
        return Err(Error::invalid("tenant id is empty"));
    }
    if page_size == 0 {
        return Err(Error::invalid("page size must be positive"));
    }
    filter.validate()
}

/// Follow continuation tokens and gather every alert.
///
/// Starts from `start_token` (empty for the first page) and fetches at most
/// `max_pages` pages. The returned page holds every alert collected; its
/// `next_token` is empty when the result set was exhausted, or the pending
/// cursor when the page limit was reached first. A backend that hands out a
/// token it already used is reported as a fault.
pub async fn collect_pages(
    source: &dyn AlertSource,
    tenant_id: &str,
    filter: &AlertFilter,
    page_size: u32,
    start_token: &str,
    max_pages: usize,
) -> Result<AlertPage> {
    if max_pages == 0 {
        return Err(Error::invalid("page limit must be positive"));
    }

    let mut alerts = Vec::new();
    let mut token = start_token.to_string();
    let mut seen = HashSet::from([token.clone()]);

    for page_number in 0..max_pages {
        let page = source.list_alerts(tenant_id, filter, page_size, &token).await?;
        debug!(page = page_number, count = page.len(), last = page.is_last(), "Fetched page");

        let next = page.next_token;
        alerts.extend(page.alerts);

        if next.is_empty() {
            return Ok(AlertPage::new(alerts, ""));
        }
        if !seen.insert(next.clone()) {
            return Err(Error::backend(
                200,
                "PAGINATION_LOOP",
                format!("continuation token '{next}' repeated"),
            ));
        }
        token = next;
    }

    warn!(max_pages, pending = %token, "Page limit reached before the last page");
    Ok(AlertPage::new(alerts, token))
}
