//! Data models for AlertProbe

mod alert;
mod filter;
mod page;
pub mod time;

pub use alert::*;
pub use filter::*;
pub use page::*;
