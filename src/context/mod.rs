//! Request-scoped context
//!
//! Every request flowing through the gateway owns one [`RequestContext`]. The
//! middleware chain receives it by `&mut` and later stages read what earlier
//! ones left behind, without a shared map keyed by request.

use http::request::Parts;
use uuid::Uuid;

use crate::upstream::UpstreamAuthProvider;

/// Per-request slot for the upstream credential provider
///
/// One provider per request: attaching again replaces the previous one.
pub trait ContextStore {
    /// Store the provider, replacing any earlier one
    fn attach_upstream_auth(&mut self, provider: UpstreamAuthProvider);

    /// The attached provider, if any
    fn upstream_auth(&self) -> Option<&UpstreamAuthProvider>;

    /// Remove the provider so it can be consumed once
    fn take_upstream_auth(&mut self) -> Option<UpstreamAuthProvider>;
}

/// Context for one in-flight request
#[derive(Debug)]
pub struct RequestContext {
    id: Uuid,
    parts: Parts,
    upstream_auth: Option<UpstreamAuthProvider>,
}

impl RequestContext {
    /// Split an inbound request into its context and body
    pub fn from_request<B>(request: http::Request<B>) -> (Self, B) {
        let (parts, body) = request.into_parts();
        (Self::from_parts(parts), body)
    }

    pub fn from_parts(parts: Parts) -> Self {
        Self {
            id: Uuid::new_v4(),
            parts,
            upstream_auth: None,
        }
    }

    /// Unique id of this request, used in log spans
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Inbound request head
    pub fn parts(&self) -> &Parts {
        &self.parts
    }
}

impl ContextStore for RequestContext {
    fn attach_upstream_auth(&mut self, provider: UpstreamAuthProvider) {
        self.upstream_auth = Some(provider);
    }

    fn upstream_auth(&self) -> Option<&UpstreamAuthProvider> {
        self.upstream_auth.as_ref()
    }

    fn take_upstream_auth(&mut self) -> Option<UpstreamAuthProvider> {
        self.upstream_auth.take()
    }
}

// Stacks that keep request state in `http` extensions get the same slot,
// keyed by the provider type.
impl ContextStore for http::Extensions {
    fn attach_upstream_auth(&mut self, provider: UpstreamAuthProvider) {
        self.insert(provider);
    }

    fn upstream_auth(&self) -> Option<&UpstreamAuthProvider> {
        self.get::<UpstreamAuthProvider>()
    }

    fn take_upstream_auth(&mut self) -> Option<UpstreamAuthProvider> {
        self.remove::<UpstreamAuthProvider>()
    }
}

impl<B> ContextStore for http::Request<B> {
    fn attach_upstream_auth(&mut self, provider: UpstreamAuthProvider) {
        self.extensions_mut().attach_upstream_auth(provider);
    }

    fn upstream_auth(&self) -> Option<&UpstreamAuthProvider> {
        self.extensions().upstream_auth()
    }

    fn take_upstream_auth(&mut self) -> Option<UpstreamAuthProvider> {
        self.extensions_mut().take_upstream_auth()
    }
}
