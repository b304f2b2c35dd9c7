//! Drives `ViewState` transitions around the list fetch.
//!
//! # Design
//! The controller is the only writer of the state, which lives in a
//! `tokio::sync::watch` channel: readers either sample `current_state()` or
//! `subscribe()` and wait for changes. `retry()` flips the state to
//! `Loading` before returning, then runs the blocking transport on Tokio's
//! blocking pool and applies the outcome from a spawned task.
//!
//! Every fetch is tagged with a generation number. When a fetch completes
//! after a newer one was started, its result is dropped, so a slow stale
//! response can never replace a newer `Loading` or result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::AmphibianClient;
use crate::error::ApiError;
use crate::state::ViewState;
use crate::transport::Transport;
use crate::types::Amphibian;

pub struct Controller {
    client: AmphibianClient,
    transport: Arc<dyn Transport>,
    state: Arc<watch::Sender<ViewState>>,
    generation: Arc<AtomicU64>,
}

impl Controller {
    /// Creates a controller in `ViewState::Idle`. Nothing is fetched until
    /// `start()` or `retry()` is called.
    pub fn new(client: AmphibianClient, transport: Arc<dyn Transport>) -> Self {
        let (state, _) = watch::channel(ViewState::Idle);
        Self {
            client,
            transport,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn current_state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Kicks off the first fetch. Same as `retry()`.
    pub fn start(&self) -> JoinHandle<()> {
        self.retry()
    }

    /// Moves to `Loading` and starts a fetch, returning immediately.
    ///
    /// Must be called from within a Tokio runtime. The returned handle
    /// resolves once the outcome has been applied (or discarded as stale);
    /// dropping it does not cancel the fetch.
    pub fn retry(&self) -> JoinHandle<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(ViewState::Loading);
        debug!(generation, url = %self.client.url(), "fetch started");

        let client = self.client.clone();
        let transport = Arc::clone(&self.transport);
        let state = Arc::clone(&self.state);
        let latest = Arc::clone(&self.generation);

        tokio::spawn(async move {
            let outcome = fetch(client, transport).await;
            let next = match outcome {
                Ok(records) => {
                    info!(generation, count = records.len(), "fetch succeeded");
                    ViewState::Success(records)
                }
                Err(e) => {
                    warn!(generation, kind = ?e.kind(), error = %e, "fetch failed");
                    ViewState::Error
                }
            };
            state.send_if_modified(|current| {
                if latest.load(Ordering::SeqCst) != generation {
                    debug!(generation, "discarding stale fetch result");
                    return false;
                }
                *current = next;
                true
            });
        })
    }
}

async fn fetch(client: AmphibianClient, transport: Arc<dyn Transport>) -> Result<Vec<Amphibian>, ApiError> {
    let request = client.build_list_amphibians();
    let response = tokio::task::spawn_blocking(move || transport.execute(request))
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))??;
    client.parse_list_amphibians(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpRequest, HttpResponse};
    use std::collections::VecDeque;
    use std::sync::{mpsc, Mutex};
    use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

    const ONE_TOAD: &str =
        r#"[{"name":"Toad A","type":"Toad","description":"x","img_src":"http://x/a.png"}]"#;

    enum Step {
        Reply(Result<HttpResponse, ApiError>),
        /// Announce the call, then block until released.
        Gated {
            started: UnboundedSender<()>,
            release: mpsc::Receiver<()>,
            reply: Result<HttpResponse, ApiError>,
        },
    }

    /// Replays canned replies in call order.
    struct Scripted {
        steps: Mutex<VecDeque<Step>>,
    }

    impl Scripted {
        fn new(steps: Vec<Step>) -> Arc<Self> {
            Arc::new(Self {
                steps: Mutex::new(steps.into()),
            })
        }
    }

    impl Transport for Scripted {
        fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
            let step = self.steps.lock().unwrap().pop_front().expect("unexpected request");
            match step {
                Step::Reply(reply) => reply,
                Step::Gated {
                    started,
                    release,
                    reply,
                } => {
                    started.send(()).unwrap();
                    release.recv().unwrap();
                    reply
                }
            }
        }
    }

    fn ok(body: &str) -> Step {
        Step::Reply(Ok(HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        }))
    }

    fn status(code: u16) -> Step {
        Step::Reply(Ok(HttpResponse {
            status: code,
            headers: Vec::new(),
            body: Vec::new(),
        }))
    }

    fn controller(steps: Vec<Step>) -> Controller {
        Controller::new(
            AmphibianClient::new("http://localhost/amphibians"),
            Scripted::new(steps),
        )
    }

    #[tokio::test]
    async fn starts_idle() {
        let c = controller(Vec::new());
        assert_eq!(c.current_state(), ViewState::Idle);
    }

    #[tokio::test]
    async fn retry_sets_loading_before_returning() {
        let (started, mut started_rx) = unbounded_channel();
        let (release, release_rx) = mpsc::channel();
        let c = controller(vec![Step::Gated {
            started,
            release: release_rx,
            reply: Err(ApiError::Transport("refused".to_string())),
        }]);

        let handle = c.retry();
        assert_eq!(c.current_state(), ViewState::Loading);
        started_rx.recv().await.unwrap();
        assert_eq!(c.current_state(), ViewState::Loading);

        release.send(()).unwrap();
        handle.await.unwrap();
        assert_eq!(c.current_state(), ViewState::Error);
    }

    #[tokio::test]
    async fn success_yields_records() {
        let c = controller(vec![ok(ONE_TOAD)]);
        c.start().await.unwrap();
        assert_eq!(
            c.current_state(),
            ViewState::Success(vec![Amphibian {
                name: "Toad A".to_string(),
                kind: "Toad".to_string(),
                description: "x".to_string(),
                image_url: "http://x/a.png".to_string(),
            }])
        );
    }

    #[tokio::test]
    async fn server_error_yields_error() {
        let c = controller(vec![status(500)]);
        c.retry().await.unwrap();
        assert_eq!(c.current_state(), ViewState::Error);
    }

    #[tokio::test]
    async fn malformed_body_yields_error() {
        let c = controller(vec![ok("not json"), ok("")]);
        c.retry().await.unwrap();
        assert_eq!(c.current_state(), ViewState::Error);
        c.retry().await.unwrap();
        assert_eq!(c.current_state(), ViewState::Error);
    }

    #[tokio::test]
    async fn transport_failure_yields_error() {
        let c = controller(vec![Step::Reply(Err(ApiError::Transport("timed out".to_string())))]);
        c.retry().await.unwrap();
        assert_eq!(c.current_state(), ViewState::Error);
    }

    #[tokio::test]
    async fn retry_from_error_recovers() {
        let c = controller(vec![status(503), ok(ONE_TOAD)]);
        c.retry().await.unwrap();
        assert_eq!(c.current_state(), ViewState::Error);

        let handle = c.retry();
        assert_eq!(c.current_state(), ViewState::Loading);
        handle.await.unwrap();
        assert_eq!(c.current_state().records().map(<[_]>::len), Some(1));
    }

    #[tokio::test]
    async fn retry_from_success_refetches() {
        let c = controller(vec![ok(ONE_TOAD), ok("[]")]);
        c.retry().await.unwrap();
        assert!(matches!(c.current_state(), ViewState::Success(ref r) if r.len() == 1));
        c.retry().await.unwrap();
        assert_eq!(c.current_state(), ViewState::Success(Vec::new()));
    }

    #[tokio::test]
    async fn stale_result_is_discarded() {
        let (started, mut started_rx) = unbounded_channel();
        let (release, release_rx) = mpsc::channel();
        let c = controller(vec![
            Step::Gated {
                started,
                release: release_rx,
                reply: Ok(HttpResponse {
                    status: 200,
                    headers: Vec::new(),
                    body: ONE_TOAD.as_bytes().to_vec(),
                }),
            },
            ok("[]"),
        ]);

        let first = c.retry();
        started_rx.recv().await.unwrap();

        let second = c.retry();
        second.await.unwrap();
        assert_eq!(c.current_state(), ViewState::Success(Vec::new()));

        release.send(()).unwrap();
        first.await.unwrap();
        assert_eq!(c.current_state(), ViewState::Success(Vec::new()));
    }

    #[tokio::test]
    async fn subscribers_see_loading_then_result() {
        let c = controller(vec![status(500)]);
        let mut rx = c.subscribe();
        assert_eq!(*rx.borrow_and_update(), ViewState::Idle);

        c.retry();
        let settled = rx.wait_for(ViewState::is_settled).await.unwrap().clone();
        assert_eq!(settled, ViewState::Error);
    }
}
