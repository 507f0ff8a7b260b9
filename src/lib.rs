//! edgeward library interface
//!
//! Request enrichment for an API gateway: middleware attaches an upstream
//! credential provider to each request's context, and the forwarding stage
//! applies it to the request sent to the backend. Analytics records can be
//! post-processed by native plugins loaded at startup.
//!
//! # Module Organization
//!
//! - [`config`] - API definitions (ApiSpec) and their loading
//! - [`upstream`] - Upstream credential providers
//! - [`context`] - Per-request context store
//! - [`middleware`] - Middleware trait, chain and built-in stages
//! - [`forward`] - Contract for the stage that sends requests upstream
//! - [`plugins`] - Native plugin loading with signature checks
//! - [`analytics`] - Analytics records and plugin processing
//! - [`errors`] - Error types (EdgewardError, Result)

pub mod analytics;
pub mod cli;
pub mod config;
pub mod context;
pub mod errors;
pub mod forward;
pub mod middleware;
pub mod plugins;
pub mod status;
pub mod upstream;
