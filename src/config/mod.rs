//! API definition handling

pub mod api;
pub mod secret;

pub use api::{AnalyticsPluginConfig, ApiSpec, ConfigFormat, UpstreamAuth, UpstreamBasicAuth};
pub use secret::SecretString;
