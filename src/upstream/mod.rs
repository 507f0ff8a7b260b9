//! Upstream credential providers
//!
//! A provider knows how to add proof of identity to a request the gateway
//! forwards to a backend. Providers are a sum type rather than trait objects:
//! the forwarding stage only ever calls [`UpstreamAuthProvider::apply`] and
//! never needs to know which kind it holds.

mod basic;

pub use basic::BasicAuthProvider;

use http::header::{HeaderMap, HeaderName};

/// Anything whose headers a provider can write to
pub trait OutboundRequest {
    fn headers_mut(&mut self) -> &mut HeaderMap;
}

impl OutboundRequest for HeaderMap {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self
    }
}

impl<B> OutboundRequest for http::Request<B> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        http::Request::headers_mut(self)
    }
}

impl OutboundRequest for reqwest::Request {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        reqwest::Request::headers_mut(self)
    }
}

/// Upstream credential provider
///
/// Built without any I/O and immutable afterwards. New kinds are added as
/// variants; construction must stay non-blocking.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum UpstreamAuthProvider {
    /// HTTP Basic credentials
    Basic(BasicAuthProvider),
}

impl UpstreamAuthProvider {
    /// Create Basic credentials for the `Authorization` header
    pub fn basic(username: &str, password: &str) -> Self {
        UpstreamAuthProvider::Basic(BasicAuthProvider::new(username, password))
    }

    /// Add the credentials to the outbound request.
    ///
    /// Overwrites the target header; never fails.
    pub fn apply<R: OutboundRequest + ?Sized>(&self, outbound: &mut R) {
        match self {
            UpstreamAuthProvider::Basic(provider) => provider.apply(outbound),
        }
    }

    /// Header the credentials are written to
    pub fn header_name(&self) -> &HeaderName {
        match self {
            UpstreamAuthProvider::Basic(provider) => provider.header_name(),
        }
    }

    /// Provider kind for display/debugging
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamAuthProvider::Basic(_) => "basic",
        }
    }
}

impl From<BasicAuthProvider> for UpstreamAuthProvider {
    fn from(provider: BasicAuthProvider) -> Self {
        UpstreamAuthProvider::Basic(provider)
    }
}
