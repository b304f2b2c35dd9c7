//! Client core for the amphibians list.
//!
//! # Overview
//! Fetches a JSON array of amphibian records from a fixed endpoint and
//! exposes the outcome as a small state machine that a UI can render.
//!
//! # Design
//! - `AmphibianClient` is stateless: it builds the request and parses the
//!   response, while a `Transport` performs the round-trip.
//! - `Controller` owns the `ViewState` and is its only writer. A fetch runs
//!   in the background; `retry()` returns immediately.
//! - `present` is a pure function from `ViewState` to a `Screen`.

pub mod client;
pub mod controller;
pub mod error;
pub mod http;
pub mod image;
pub mod present;
pub mod state;
pub mod transport;
pub mod types;

pub use client::AmphibianClient;
pub use controller::Controller;
pub use error::{ApiError, FailureKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use image::{probe_image, ImageFormat, ImageStatus};
pub use present::{present, Card, Screen};
pub use state::ViewState;
pub use transport::{Transport, UreqTransport};
pub use types::Amphibian;
