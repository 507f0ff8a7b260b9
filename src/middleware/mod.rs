//! Gateway middleware chain
//!
//! A chain is built once per API definition. Stages that are not enabled for
//! the definition are left out at build time, so per-request processing only
//! walks the stages that apply.

mod upstream_basic_auth;

pub use upstream_basic_auth::UpstreamBasicAuth;

use http::StatusCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info_span};

use crate::config::ApiSpec;
use crate::context::RequestContext;

/// A stage rejected the request
#[derive(Debug, Error)]
#[error("{middleware} rejected request ({status}): {message}")]
pub struct MiddlewareError {
    pub middleware: &'static str,
    pub status: StatusCode,
    pub message: String,
}

impl MiddlewareError {
    pub fn new(middleware: &'static str, status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            middleware,
            status,
            message: message.into(),
        }
    }
}

/// One stage of request processing
///
/// Stages run synchronously on the request path and must not block.
pub trait Middleware: Send + Sync {
    /// Stable identifier for diagnostics
    fn name(&self) -> &'static str;

    /// Whether this stage applies to the API definition
    fn enabled_for_spec(&self, spec: &ApiSpec) -> bool;

    /// Process one request. `Err` stops the chain.
    fn process_request(&self, ctx: &mut RequestContext, spec: &ApiSpec) -> Result<(), MiddlewareError>;
}

/// Ordered middleware stages for one API definition
pub struct Chain {
    spec: Arc<ApiSpec>,
    stages: Vec<Box<dyn Middleware>>,
}

impl Chain {
    /// Create an empty chain for an API definition
    pub fn new(spec: Arc<ApiSpec>) -> Self {
        Self {
            spec,
            stages: Vec::new(),
        }
    }

    /// Default chain: every built-in stage that is enabled for `spec`
    pub fn for_spec(spec: Arc<ApiSpec>) -> Self {
        Self::new(spec).with(UpstreamBasicAuth)
    }

    /// Append a stage if it is enabled for this chain's definition
    pub fn with<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        if middleware.enabled_for_spec(&self.spec) {
            self.stages.push(Box::new(middleware));
        } else {
            debug!(
                api_id = %self.spec.api_id,
                middleware = middleware.name(),
                "Middleware disabled for API"
            );
        }
        self
    }

    /// Names of the active stages, in order
    pub fn names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|m| m.name()).collect()
    }

    /// The API definition this chain was built for
    pub fn spec(&self) -> &ApiSpec {
        &self.spec
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage in order, stopping at the first rejection
    pub fn process(&self, ctx: &mut RequestContext) -> Result<(), MiddlewareError> {
        let span = info_span!("request", id = %ctx.id(), api_id = %self.spec.api_id);
        let _guard = span.enter();

        for stage in &self.stages {
            debug!(middleware = stage.name(), "Processing request");
            stage.process_request(ctx, &self.spec)?;
        }
        Ok(())
    }
}
