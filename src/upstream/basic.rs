//! HTTP Basic credentials for the upstream (RFC 7617)

use base64::Engine;
use http::header::{HeaderName, HeaderValue, AUTHORIZATION};

use super::OutboundRequest;

/// Basic auth header, encoded once at construction
#[derive(Debug, Clone)]
pub struct BasicAuthProvider {
    header_name: HeaderName,
    value: HeaderValue,
}

impl BasicAuthProvider {
    /// Encode `username:password` into an `Authorization` header value
    pub fn new(username: &str, password: &str) -> Self {
        let credentials = format!("{}:{}", username, password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());

        let mut value = match HeaderValue::try_from(format!("Basic {}", encoded)) {
            Ok(value) => value,
            Err(e) => {
                // Unreachable for base64 output; send an empty credential rather than panic.
                tracing::error!(error = %e, "Could not build upstream basic auth header");
                HeaderValue::from_static("Basic ")
            }
        };
        value.set_sensitive(true);

        Self {
            header_name: AUTHORIZATION,
            value,
        }
    }

    /// Carry the credentials in `name` instead of `Authorization`.
    ///
    /// A name that is not a valid header token keeps the default.
    pub fn with_header_name(mut self, name: &str) -> Self {
        match HeaderName::from_bytes(name.as_bytes()) {
            Ok(header_name) => self.header_name = header_name,
            Err(_) => {
                tracing::warn!(
                    header = %name,
                    "Invalid upstream auth header name, falling back to Authorization"
                );
            }
        }
        self
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.header_name
    }

    /// Write the header, replacing any value already present
    pub fn apply<R: OutboundRequest + ?Sized>(&self, outbound: &mut R) {
        outbound
            .headers_mut()
            .insert(self.header_name.clone(), self.value.clone());
    }
}
