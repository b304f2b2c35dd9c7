//! In-memory image load tracking for the terminal UI.

use std::collections::HashMap;
use std::sync::Arc;

use amphibians_core::{probe_image, ImageStatus, Transport};
use tokio::sync::mpsc::UnboundedSender;

use crate::event::Event;

/// Probes each URL at most once per session and remembers the outcome.
pub struct ImageLoader {
    transport: Arc<dyn Transport>,
    statuses: HashMap<String, ImageStatus>,
    events: UnboundedSender<Event>,
}

impl ImageLoader {
    pub fn new(transport: Arc<dyn Transport>, events: UnboundedSender<Event>) -> Self {
        Self {
            transport,
            statuses: HashMap::new(),
            events,
        }
    }

    pub fn status(&self, url: &str) -> ImageStatus {
        self.statuses.get(url).copied().unwrap_or_default()
    }

    /// Start probing `url` unless it is already known. The result arrives
    /// later as `Event::Image`.
    pub fn request(&mut self, url: &str) {
        if self.statuses.contains_key(url) {
            return;
        }
        self.statuses.insert(url.to_string(), ImageStatus::Loading);

        let transport = Arc::clone(&self.transport);
        let events = self.events.clone();
        let url = url.to_string();
        tokio::task::spawn_blocking(move || {
            let status = probe_image(transport.as_ref(), &url);
            // The UI may already be gone.
            let _ = events.send(Event::Image { url, status });
        });
    }

    pub fn resolve(&mut self, url: String, status: ImageStatus) {
        self.statuses.insert(url, status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amphibians_core::{ApiError, HttpRequest, HttpResponse};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc::unbounded_channel;

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl Transport for Counting {
        fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(HttpResponse {
                status: 404,
                headers: Vec::new(),
                body: Vec::new(),
            })
        }
    }

    #[tokio::test]
    async fn probes_once_and_reports() {
        let transport = Arc::new(Counting::default());
        let (tx, mut rx) = unbounded_channel();
        let mut loader = ImageLoader::new(transport.clone(), tx);

        assert_eq!(loader.status("http://x/a.png"), ImageStatus::Loading);
        loader.request("http://x/a.png");
        loader.request("http://x/a.png");

        let (url, status) = match rx.recv().await.unwrap() {
            Event::Image { url, status } => (url, status),
            other => panic!("unexpected event {other:?}"),
        };
        assert_eq!(url, "http://x/a.png");
        assert_eq!(status, ImageStatus::Failed);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

        loader.resolve(url, status);
        assert_eq!(loader.status("http://x/a.png"), ImageStatus::Failed);
    }
}
