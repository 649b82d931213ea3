//! The forwarding collaborator.
//!
//! Performs the actual proxying once the dispatcher has decided
//! `Forward`: rewrites the request URI onto the configured backend,
//! attaches the gate's outbound headers, and relays the upstream
//! response. The gate headers ride both surfaces: the proxied request
//! (the backend trusts the asserted identity) and the client response
//! (Set-Cookie and x-proxied-by must reach the browser).

use axum::body::{Body, Bytes};
use axum::http::request::Parts;
use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::{HeaderMap, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use std::str::FromStr;

use crate::config::loader::ConfigError;
use crate::config::validation::ValidationError;

/// Proxies forward-decided requests to the backend.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    authority: Authority,
}

impl Forwarder {
    /// Create a forwarder targeting `backend_address` (host:port).
    pub fn new(backend_address: &str) -> Result<Self, ConfigError> {
        let authority = Authority::from_str(backend_address).map_err(|_| {
            ConfigError::Validation(vec![ValidationError::InvalidBackendAddress {
                address: backend_address.to_string(),
            }])
        })?;
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Ok(Self { client, authority })
    }

    /// Proxy one request and relay the upstream response.
    pub async fn forward(&self, parts: Parts, body: Bytes, gate_headers: HeaderMap) -> Response {
        let mut uri_parts = parts.uri.clone().into_parts();
        uri_parts.scheme = Some(Scheme::HTTP);
        uri_parts.authority = Some(self.authority.clone());
        if uri_parts.path_and_query.is_none() {
            uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        let uri = Uri::from_parts(uri_parts).unwrap_or_else(|_| parts.uri.clone());

        let mut builder = Request::builder()
            .method(parts.method.clone())
            .uri(uri)
            .version(parts.version);
        if let Some(headers) = builder.headers_mut() {
            for (name, value) in parts.headers.iter() {
                headers.insert(name.clone(), value.clone());
            }
            headers.extend(gate_headers.clone());
        }

        let request = match builder.body(Body::from(body)) {
            Ok(request) => request,
            Err(e) => {
                tracing::error!(error = %e, "failed to build upstream request");
                return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
            }
        };

        match self.client.request(request).await {
            Ok(upstream) => {
                let (mut head, body) = upstream.into_parts();
                head.headers.extend(gate_headers);
                Response::from_parts(head, Body::new(body)).into_response()
            }
            Err(e) => {
                tracing::error!(error = %e, backend = %self.authority, "upstream request failed");
                (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
            }
        }
    }
}
