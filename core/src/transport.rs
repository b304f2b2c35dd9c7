//! Executes `HttpRequest`s against the network.
//!
//! # Design
//! `Transport` is the single I/O seam of the crate. It is blocking so that
//! implementations stay simple; the controller runs it on Tokio's blocking
//! pool. Status codes are never treated as errors here: a 500 is a perfectly
//! good `HttpResponse` and the client decides what it means.

use std::time::Duration;

use tracing::trace;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// `Transport` backed by a shared `ureq::Agent`.
///
/// The agent is configured with `http_status_as_error(false)` so 4xx/5xx
/// responses come back as data.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        trace!(url = %request.url, "executing request");
        let mut response = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
        }
        .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, headers, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_refused_is_transport_error() {
        // Bind then drop to get a port nobody is listening on.
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let transport = UreqTransport::new(Duration::from_secs(2));
        let err = transport
            .execute(HttpRequest::get(format!("http://{addr}/amphibians")))
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
