//! Basic authentication towards the upstream
//!
//! Puts a Basic credential provider into the request context so that the
//! forwarding stage can add it to the proxied request.

use tracing::{debug, warn};

use super::{Middleware, MiddlewareError};
use crate::config::ApiSpec;
use crate::context::{ContextStore, RequestContext};
use crate::upstream::{BasicAuthProvider, UpstreamAuthProvider};

/// Middleware attaching upstream Basic credentials
#[derive(Debug, Clone, Copy, Default)]
pub struct UpstreamBasicAuth;

impl UpstreamBasicAuth {
    /// Build the provider described by the API definition
    pub fn provider(spec: &ApiSpec) -> UpstreamAuthProvider {
        let config = &spec.upstream_auth.basic_auth;

        let mut provider = BasicAuthProvider::new(&config.username, config.password.expose());
        if let Some(name) = config.header_name() {
            provider = provider.with_header_name(name);
        }
        provider.into()
    }
}

impl Middleware for UpstreamBasicAuth {
    fn name(&self) -> &'static str {
        "UpstreamBasicAuth"
    }

    fn enabled_for_spec(&self, spec: &ApiSpec) -> bool {
        spec.upstream_auth.enabled && spec.upstream_auth.basic_auth.enabled
    }

    fn process_request(&self, ctx: &mut RequestContext, spec: &ApiSpec) -> Result<(), MiddlewareError> {
        // Empty credentials are flagged, not rejected.
        if spec.upstream_auth.basic_auth.has_empty_credentials() {
            warn!(api_id = %spec.api_id, "Upstream basic auth has an empty username or password");
        }

        let provider = Self::provider(spec);
        debug!(header = %provider.header_name(), "Attaching upstream basic auth");
        ctx.attach_upstream_auth(provider);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::AUTHORIZATION;
    use http::HeaderMap;

    fn spec(enabled: bool, basic_enabled: bool) -> ApiSpec {
        let mut spec = ApiSpec::default();
        spec.upstream_auth.enabled = enabled;
        spec.upstream_auth.basic_auth.enabled = basic_enabled;
        spec.upstream_auth.basic_auth.username = "alice".to_string();
        spec.upstream_auth.basic_auth.password = "wonderland".into();
        spec
    }

    fn context() -> RequestContext {
        RequestContext::from_request(http::Request::get("/").body(()).unwrap()).0
    }

    #[test]
    fn test_name() {
        assert_eq!(UpstreamBasicAuth.name(), "UpstreamBasicAuth");
    }

    #[test]
    fn test_enabled_truth_table() {
        assert!(!UpstreamBasicAuth.enabled_for_spec(&spec(false, false)));
        assert!(!UpstreamBasicAuth.enabled_for_spec(&spec(false, true)));
        assert!(!UpstreamBasicAuth.enabled_for_spec(&spec(true, false)));
        assert!(UpstreamBasicAuth.enabled_for_spec(&spec(true, true)));
    }

    #[test]
    fn test_process_attaches_provider() {
        let mut ctx = context();
        UpstreamBasicAuth.process_request(&mut ctx, &spec(true, true)).unwrap();

        let mut headers = HeaderMap::new();
        ctx.upstream_auth().unwrap().apply(&mut headers);
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Basic YWxpY2U6d29uZGVybGFuZA==");
    }

    #[test]
    fn test_header_name_override() {
        let mut spec = spec(true, true);
        spec.upstream_auth.basic_auth.header_name = Some("X-Custom".to_string());

        let mut headers = HeaderMap::new();
        UpstreamBasicAuth::provider(&spec).apply(&mut headers);

        assert!(headers.get(AUTHORIZATION).is_none());
        assert_eq!(headers.get("X-Custom").unwrap(), "Basic YWxpY2U6d29uZGVybGFuZA==");
    }

    #[test]
    fn test_empty_credentials_still_attach() {
        let mut spec = spec(true, true);
        spec.upstream_auth.basic_auth.username.clear();
        spec.upstream_auth.basic_auth.password = Default::default();

        let mut ctx = context();
        UpstreamBasicAuth.process_request(&mut ctx, &spec).unwrap();

        let mut headers = HeaderMap::new();
        ctx.upstream_auth().unwrap().apply(&mut headers);
        // base64(":")
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Basic Og==");
    }

    #[test]
    fn test_reprocessing_overwrites() {
        let mut ctx = context();
        UpstreamBasicAuth.process_request(&mut ctx, &spec(true, true)).unwrap();

        let mut other = spec(true, true);
        other.upstream_auth.basic_auth.username = "bob".to_string();
        UpstreamBasicAuth.process_request(&mut ctx, &other).unwrap();

        let mut headers = HeaderMap::new();
        ctx.take_upstream_auth().unwrap().apply(&mut headers);
        assert_eq!(headers.get_all(AUTHORIZATION).iter().count(), 1);
        // base64("bob:wonderland")
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Basic Ym9iOndvbmRlcmxhbmQ=");
        assert!(ctx.upstream_auth().is_none());
    }
}
