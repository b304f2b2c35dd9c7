//! Domain DTOs for the amphibians endpoint.
//!
//! # Design
//! `Amphibian` mirrors one element of the endpoint's JSON array. Field names
//! follow Rust conventions and are mapped onto the wire names with serde
//! attributes (`type` is a keyword, the image field is `img_src` upstream).
//! The mock-server crate keeps its own copy of the schema; integration tests
//! catch drift between the two.

use serde::{Deserialize, Serialize};

/// One amphibian as returned by the endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Amphibian {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(rename = "img_src")]
    pub image_url: String,
}
