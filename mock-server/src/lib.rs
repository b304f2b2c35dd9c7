use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Amphibian {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub img_src: String,
}

/// How `/amphibians` should misbehave, if at all.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Fault {
    #[default]
    None,
    ServerError,
    Malformed,
    EmptyBody,
    Delay { millis: u64 },
}

/// (name, type, description, image file)
pub const DATASET: &[(&str, &str, &str, &str)] = &[
    (
        "Great Basin Spadefoot",
        "Toad",
        "This toad spends most of its life underground due to the arid desert conditions in which it lives.",
        "great-basin-spadefoot.png",
    ),
    (
        "Roraima Bush Toad",
        "Toad",
        "This toad is typically found in South America. Specifically on Mount Roraima at the boarders of Venezuala, Brazil, and Guyana.",
        "roraima-bush-toad.png",
    ),
    (
        "Pacific Chorus Frog",
        "Frog",
        "Also known as the Pacific Treefrog, it is the most common frog on the Pacific Coast of North America.",
        "pacific-chorus-frog.png",
    ),
    (
        "Tiger Salamander",
        "Salamander",
        "Tiger salamanders can grow up to 14 inches long, making them one of the largest land-dwelling salamanders.",
        "tiger-salamander.png",
    ),
];

/// A 1x1 transparent PNG served for every known image file.
pub const PNG_PIXEL: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0a, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

pub type FaultState = Arc<RwLock<Fault>>;

pub fn app() -> Router {
    let fault: FaultState = Arc::new(RwLock::new(Fault::None));
    Router::new()
        .route("/amphibians", get(list_amphibians))
        .route("/img/{file}", get(get_image))
        .route("/fault", get(get_fault).put(set_fault))
        .with_state(fault)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// The dataset with image URLs pointing back at `host`.
pub fn amphibians(host: &str) -> Vec<Amphibian> {
    DATASET
        .iter()
        .map(|(name, kind, description, file)| Amphibian {
            name: name.to_string(),
            kind: kind.to_string(),
            description: description.to_string(),
            img_src: format!("http://{host}/img/{file}"),
        })
        .collect()
}

async fn list_amphibians(State(fault): State<FaultState>, headers: HeaderMap) -> Response {
    let fault = *fault.read().await;
    info!(?fault, "list requested");
    match fault {
        Fault::None => {}
        Fault::ServerError => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "injected failure").into_response()
        }
        Fault::Malformed => {
            return ([(header::CONTENT_TYPE, "application/json")], "not json").into_response()
        }
        Fault::EmptyBody => return StatusCode::OK.into_response(),
        Fault::Delay { millis } => tokio::time::sleep(Duration::from_millis(millis)).await,
    }
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    Json(amphibians(host)).into_response()
}

async fn get_image(Path(file): Path<String>) -> Response {
    if DATASET.iter().any(|(.., f)| *f == file) {
        debug!(%file, "serving image");
        ([(header::CONTENT_TYPE, "image/png")], PNG_PIXEL).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn get_fault(State(fault): State<FaultState>) -> Json<Fault> {
    Json(*fault.read().await)
}

async fn set_fault(State(fault): State<FaultState>, Json(input): Json<Fault>) -> Json<Fault> {
    info!(fault = ?input, "fault mode changed");
    *fault.write().await = input;
    Json(input)
}
