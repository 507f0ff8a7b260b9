//! Analytics record

use chrono::{DateTime, Utc};
use http::header::{HeaderName, HOST, USER_AGENT};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::ApiSpec;
use crate::context::RequestContext;

/// Time spent on a request, in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Latency {
    pub total: i64,
    pub upstream: i64,
}

/// One analytics entry per proxied request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsRecord {
    pub method: String,
    pub host: String,
    pub path: String,
    pub raw_path: String,
    pub content_length: i64,
    pub user_agent: String,
    pub response_code: u16,
    pub api_key: String,
    pub timestamp: DateTime<Utc>,
    pub api_version: String,
    pub api_name: String,
    pub api_id: String,
    pub org_id: String,
    pub oauth_id: String,
    pub request_time: i64,
    pub latency: Latency,
    pub raw_request: String,
    pub raw_response: String,
    pub ip_address: String,
    pub tags: Vec<String>,
    pub alias: String,
    pub track_path: bool,
}

impl AnalyticsRecord {
    /// Start a record for a request handled under `spec`
    pub fn for_request(ctx: &RequestContext, spec: &ApiSpec, status: StatusCode) -> Self {
        let parts = ctx.parts();
        let header = |name: HeaderName| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };

        let host = parts
            .uri
            .host()
            .map(str::to_string)
            .unwrap_or_else(|| header(HOST));

        Self {
            method: parts.method.to_string(),
            host,
            path: parts.uri.path().to_string(),
            raw_path: parts
                .uri
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_default(),
            user_agent: header(USER_AGENT),
            response_code: status.as_u16(),
            timestamp: Utc::now(),
            api_name: spec.name.clone(),
            api_id: spec.api_id.clone(),
            org_id: spec.org_id.clone(),
            ..Default::default()
        }
    }
}
