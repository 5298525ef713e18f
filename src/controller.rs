use crate::models::Property;
use crate::repository::PropertyRepository;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, warn};

/// Everything a list screen renders: records plus the loading/error/data tri-state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchState {
    pub records: Vec<Property>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// How a fetch request treats the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartMode {
    /// Skip when a fetch is already running
    IfIdle,
    /// Keep displayed records until new ones arrive
    Keep,
    /// Drop displayed records immediately
    Clear,
    /// Clear only when nothing is displayed
    Retry,
}

struct Inner {
    state: FetchState,
    /// Bumped whenever a fetch starts or the repository is swapped
    generation: u64,
    repository: Arc<dyn PropertyRepository>,
    in_flight: Option<AbortHandle>,
}

struct Shared {
    inner: Mutex<Inner>,
    state_tx: watch::Sender<FetchState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &FetchState) {
        self.state_tx.send_replace(state.clone());
    }

    fn complete(&self, generation: u64, outcome: anyhow::Result<Vec<Property>>) {
        let mut inner = self.lock();
        if inner.generation != generation {
            debug!("Discarding result of superseded fetch #{}", generation);
            return;
        }

        let previous = std::mem::take(&mut inner.state);
        inner.state = match outcome {
            Ok(records) => {
                info!("Loaded {} listings", records.len());
                FetchState {
                    records,
                    is_loading: false,
                    error_message: None,
                    last_updated: Some(Utc::now()),
                }
            }
            Err(err) => {
                warn!("Loading listings failed: {:#}", err);
                FetchState {
                    is_loading: false,
                    error_message: Some(err.to_string()),
                    ..previous
                }
            }
        };
        inner.in_flight = None;
        self.publish(&inner.state);
    }
}

/// Sequences listing fetches for one list screen.
///
/// Only the most recently started fetch may change the state; starting a new
/// one aborts the previous task and any result it still delivers is dropped.
/// Every method that starts a fetch must be called inside a Tokio runtime.
pub struct PropertyListController {
    shared: Arc<Shared>,
}

impl PropertyListController {
    pub fn new(repository: Arc<dyn PropertyRepository>) -> Self {
        let (state_tx, _) = watch::channel(FetchState::default());
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: FetchState::default(),
                    generation: 0,
                    repository,
                    in_flight: None,
                }),
                state_tx,
            }),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> FetchState {
        self.shared.lock().state.clone()
    }

    /// Receives every state transition as a whole value
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.shared.state_tx.subscribe()
    }

    /// Initial load. Does nothing while a fetch is already running.
    pub fn load(&self) {
        self.start_load(StartMode::IfIdle);
    }

    /// Refetch, keeping the current records on screen until new ones arrive
    pub fn reload(&self) {
        self.start_load(StartMode::Keep);
    }

    /// Like [`reload`](Self::reload), but resolves once this fetch settles
    /// or is superseded
    pub async fn reload_and_wait(&self) {
        let Some(handle) = self.start_load(StartMode::Keep) else {
            return;
        };
        if let Err(e) = handle.await {
            if e.is_cancelled() {
                debug!("Awaited fetch was superseded");
            } else {
                warn!("Fetch task failed: {}", e);
            }
        }
    }

    /// Clear the displayed records, then refetch
    pub fn hard_reload(&self) {
        self.start_load(StartMode::Clear);
    }

    /// Retry after an error; clears only when nothing is displayed
    pub fn retry(&self) {
        self.start_load(StartMode::Retry);
    }

    /// Swap the data source. An in-flight fetch is cancelled and its result discarded.
    pub fn update_repository(&self, repository: Arc<dyn PropertyRepository>) {
        let mut inner = self.shared.lock();
        if let Some(task) = inner.in_flight.take() {
            task.abort();
        }
        inner.generation += 1;
        inner.repository = repository;

        if inner.state.is_loading {
            inner.state = FetchState {
                is_loading: false,
                ..std::mem::take(&mut inner.state)
            };
            self.shared.publish(&inner.state);
        }
        info!("Switched listing source to {}", inner.repository.source_name());
    }

    /// Decides and starts under one lock, so concurrent `load` calls start at most one fetch
    fn start_load(&self, mode: StartMode) -> Option<JoinHandle<()>> {
        let mut inner = self.shared.lock();
        if mode == StartMode::IfIdle && inner.state.is_loading {
            debug!("Load requested while loading, ignoring");
            return None;
        }
        let clear_existing = match mode {
            StartMode::Clear => true,
            StartMode::Retry => inner.state.records.is_empty(),
            StartMode::IfIdle | StartMode::Keep => false,
        };

        if let Some(task) = inner.in_flight.take() {
            debug!("Cancelling in-flight fetch #{}", inner.generation);
            task.abort();
        }

        inner.generation += 1;
        let generation = inner.generation;

        let previous = std::mem::take(&mut inner.state);
        inner.state = FetchState {
            records: if clear_existing {
                Vec::new()
            } else {
                previous.records
            },
            is_loading: true,
            error_message: None,
            last_updated: previous.last_updated,
        };
        self.shared.publish(&inner.state);

        let repository = Arc::clone(&inner.repository);
        let shared = Arc::clone(&self.shared);
        debug!(
            "Starting fetch #{} from {}",
            generation,
            repository.source_name()
        );

        let handle = tokio::spawn(async move {
            let outcome = repository.fetch_properties().await;
            shared.complete(generation, outcome);
        });
        inner.in_flight = Some(handle.abort_handle());
        Some(handle)
    }
}

impl Drop for PropertyListController {
    fn drop(&mut self) {
        if let Some(task) = self.shared.lock().in_flight.take() {
            task.abort();
        }
    }
}
