//! Stateless request builder and response parser for the amphibians endpoint.
//!
//! # Design
//! `AmphibianClient` holds only the endpoint URL. `build_list_amphibians`
//! produces an `HttpRequest` and `parse_list_amphibians` consumes the
//! `HttpResponse`; whatever executes the round-trip sits in between, so the
//! parsing rules can be tested without a network.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::Amphibian;

/// Synchronous, stateless client for the amphibians endpoint.
#[derive(Debug, Clone)]
pub struct AmphibianClient {
    url: String,
}

impl AmphibianClient {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn build_list_amphibians(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.url.clone(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
        }
    }

    /// Decode the list response, preserving element order.
    pub fn parse_list_amphibians(&self, response: HttpResponse) -> Result<Vec<Amphibian>, ApiError> {
        check_status(&response)?;
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Err(ApiError::Decode("empty response body".to_string()));
        }
        Ok(serde_json::from_slice(&response.body)?)
    }
}

/// Map non-success status codes to `ApiError::HttpStatus`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpStatus {
        status: response.status,
        body: response.text(),
    })
}
