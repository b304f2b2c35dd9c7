//! Maps a `ViewState` to what should be on screen.
//!
//! `present` owns no state and performs no I/O. Image outcomes come from the
//! caller through a lookup closure, so the same function serves the terminal
//! UI and plain output.

use std::fmt;

use crate::image::ImageStatus;
use crate::state::ViewState;

pub const LOADING_TEXT: &str = "Loading";
pub const FAILED_TEXT: &str = "Failed to load";
pub const RETRY_TEXT: &str = "Retry";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Cards(Vec<Card>),
    Failed { message: &'static str, action: &'static str },
}

/// One rendered record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub image_url: String,
    pub image: ImageStatus,
}

pub fn present(state: &ViewState, image: impl Fn(&str) -> ImageStatus) -> Screen {
    match state {
        ViewState::Idle | ViewState::Loading => Screen::Loading,
        ViewState::Success(records) => Screen::Cards(
            records
                .iter()
                .map(|r| Card {
                    title: format!("{} ({})", r.name, r.kind),
                    image_url: r.image_url.clone(),
                    image: image(&r.image_url),
                })
                .collect(),
        ),
        ViewState::Error => Screen::Failed {
            message: FAILED_TEXT,
            action: RETRY_TEXT,
        },
    }
}

impl fmt::Display for ImageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageStatus::Loading => f.write_str("[loading image]"),
            ImageStatus::Failed => f.write_str("[broken image]"),
            ImageStatus::Loaded { format, bytes } => {
                write!(f, "[image: {format}, {}]", human_size(*bytes))
            }
        }
    }
}

fn human_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
    }
}
