//! Analytics plugin that masks API keys
//!
//! Build with `cargo build -p edgeward-mask-analytics` and point an API's
//! `analyticsPlugin.pluginPath` at the resulting library.

use edgeward::analytics::AnalyticsRecord;
use edgeward::plugins::AnalyticsHandlerFn;

fn mask(record: &mut AnalyticsRecord) {
    if !record.api_key.is_empty() {
        record.api_key = "masked".to_string();
    }
    record.tags.push("masked".to_string());
}

/// Plain C symbol, not a descriptor
#[no_mangle]
pub extern "C" fn mask_analytics_version() -> u32 {
    1
}

edgeward::export_symbol!(MaskAnalyticsData, AnalyticsHandlerFn, mask);
