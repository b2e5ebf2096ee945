//! # AlertProbe
//!
//! Client and conformance harness for paginated security-alert query APIs.
//!
//! AlertProbe talks to a remote `ListAlerts` endpoint, and checks that what
//! comes back honours the request: page size bounds, filter toggles, zone
//! restrictions and stable results for repeated queries.
//!
//! ## Architecture
//!
//! - **Models**: filters, alerts with tagged endpoint variants, pages
//! - **Client**: the [`client::AlertSource`] trait and its HTTP implementation
//! - **Conformance**: property checks, scenarios and a concurrent runner
//!
//! ## Quick Start
//!
//! ```bash
//! export ARAALI_API_TOKEN=...
//!
//! # Run the built-in scenarios
//! alertprobe check
//!
//! # Query a zone directly
//! alertprobe list --tenant meta-tap --zone nightlycommon
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod client;
pub mod config;
pub mod conformance;
pub mod error;
pub mod models;
pub mod telemetry;

pub use crate::config::Config;
pub use crate::error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::client::{collect_pages, AlertClient, AlertSource};
    pub use crate::config::{BackendConfig, Config};
    pub use crate::conformance::{Expectation, RunReport, Scenario, ScenarioRunner};
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
}
