//! Request analytics
//!
//! Records describe proxied requests. Before a record is stored it can be
//! handed to a native plugin, e.g. to mask keys or drop fields.

mod processor;
mod record;

pub use processor::AnalyticsProcessor;
pub use record::{AnalyticsRecord, Latency};
