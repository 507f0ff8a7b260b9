//! Native plugins
//!
//! Plugins are shared libraries opened at setup time. Each exported function
//! is wrapped in a [`SymbolDescriptor`] so the loader can check its signature
//! before the gateway ever calls it. A resolved function is shared by every
//! request worker and may run concurrently: plugin code must be reentrant.

pub mod descriptor;
pub mod loader;

pub use descriptor::{ExportedFn, Fingerprint, SymbolDescriptor, DESCRIPTOR_ABI_VERSION, DESCRIPTOR_MAGIC, TOOLCHAIN};
pub use loader::{resolve, LoadError, LoadedSymbol};

use chrono::{DateTime, Utc};
use std::mem::offset_of;
use std::path::Path;

use crate::analytics::{AnalyticsRecord, Latency};

/// Signature of an analytics plugin function
pub type AnalyticsHandlerFn = fn(&mut AnalyticsRecord);

/// Resolved analytics plugin function
pub type AnalyticsHandler = LoadedSymbol<AnalyticsHandlerFn>;

/// Hash in the size, alignment and every field offset of `$ty`
macro_rules! struct_layout {
    ($fp:expr, $ty:ty { $($field:ident),* $(,)? }) => {
        $fp.layout::<$ty>()$(.offset(offset_of!($ty, $field)))*
    };
}

unsafe impl ExportedFn for AnalyticsHandlerFn {
    const SIGNATURE: &'static str = concat!(
        "fn(&mut edgeward::analytics::AnalyticsRecord)@",
        env!("CARGO_PKG_VERSION"),
        "\0"
    );

    const FINGERPRINT: u64 = {
        let fp = Fingerprint::new()
            .layout::<String>()
            .layout::<Vec<String>>()
            .layout::<DateTime<Utc>>();
        let fp = struct_layout!(fp, Latency { total, upstream });
        let fp = struct_layout!(
            fp,
            AnalyticsRecord {
                method,
                host,
                path,
                raw_path,
                content_length,
                user_agent,
                response_code,
                api_key,
                timestamp,
                api_version,
                api_name,
                api_id,
                org_id,
                oauth_id,
                request_time,
                latency,
                raw_request,
                raw_response,
                ip_address,
                tags,
                alias,
                track_path,
            }
        );
        fp.finish()
    };

    unsafe fn from_raw(ptr: *const ()) -> Self {
        std::mem::transmute::<*const (), AnalyticsHandlerFn>(ptr)
    }
}

impl LoadedSymbol<AnalyticsHandlerFn> {
    /// Run the plugin on one record
    pub fn call(&self, record: &mut AnalyticsRecord) {
        (self.function())(record)
    }
}

/// Resolve an analytics handler exported as `symbol` by the plugin at `path`
pub fn load_analytics_handler(path: impl AsRef<Path>, symbol: &str) -> Result<AnalyticsHandler, LoadError> {
    resolve::<AnalyticsHandlerFn>(path, symbol)
}
