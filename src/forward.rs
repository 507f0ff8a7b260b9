//! Forwarding stage contract
//!
//! The reverse proxy itself lives outside this crate. Whatever sends the
//! request upstream must call [`apply_upstream_auth`] exactly once, after the
//! middleware chain and before the request leaves the gateway.

use http::Request;

use crate::context::{ContextStore, RequestContext};
use crate::upstream::OutboundRequest;

/// Consume the attached provider, if any, and apply it to `outbound`.
///
/// Returns whether credentials were added. Without a provider the outbound
/// request is left untouched.
pub fn apply_upstream_auth<S, R>(store: &mut S, outbound: &mut R) -> bool
where
    S: ContextStore + ?Sized,
    R: OutboundRequest + ?Sized,
{
    match store.take_upstream_auth() {
        Some(provider) => {
            tracing::debug!(kind = provider.kind(), header = %provider.header_name(), "Applying upstream auth");
            provider.apply(outbound);
            true
        }
        None => false,
    }
}

/// Build the outbound request head from the inbound one and apply upstream auth
pub fn prepare_outbound(ctx: &mut RequestContext) -> Request<()> {
    let parts = ctx.parts();

    let mut outbound = Request::new(());
    *outbound.method_mut() = parts.method.clone();
    *outbound.uri_mut() = parts.uri.clone();
    *outbound.version_mut() = parts.version;
    *outbound.headers_mut() = parts.headers.clone();

    apply_upstream_auth(ctx, &mut outbound);
    outbound
}
