//! Ingestion pipeline
//!
//! Fetch raw text once, tokenize it, resolve column roles and build records,
//! publishing every step as an [`IngestionState`] snapshot.

pub mod fetch;
pub mod source;
pub mod state;

pub use fetch::{FetchError, HttpFetcher, RawTextFetcher};
pub use source::{SheetSource, SourceError};
pub use state::IngestionState;

use arc_swap::ArcSwap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ingest::{Dialect, tokenize_with};
use crate::records::RecordBuilder;

/// The two failures an ingestion pass can report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// Source identifier was rejected before any fetch
    InvalidSource(SourceError),
    /// Retrieval failed; data was reset
    Fetch(FetchError),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::InvalidSource(e) => write!(f, "Invalid source: {}", e),
            IngestError::Fetch(e) => write!(f, "Fetch failed: {}", e),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::InvalidSource(e) => Some(e),
            IngestError::Fetch(e) => Some(e),
        }
    }
}

impl From<SourceError> for IngestError {
    fn from(err: SourceError) -> Self {
        IngestError::InvalidSource(err)
    }
}

impl From<FetchError> for IngestError {
    fn from(err: FetchError) -> Self {
        IngestError::Fetch(err)
    }
}

/// Where to ingest from and whether to do it at all
#[derive(Debug, Clone)]
pub struct IngestionSettings {
    pub source: Option<String>,
    pub enabled: bool,
    pub dialect: Dialect,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            source: None,
            enabled: true,
            dialect: Dialect::default(),
        }
    }
}

impl IngestionSettings {
    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }
}

/// One ingestion target: a builder, a fetcher and the latest published state
pub struct Ingestion<B: RecordBuilder, F: RawTextFetcher> {
    settings: IngestionSettings,
    builder: B,
    fetcher: F,
    state: ArcSwap<IngestionState<B::Output>>,
    /// Refreshes currently waiting on the fetcher
    in_flight: AtomicUsize,
}

impl<B: RecordBuilder, F: RawTextFetcher> Ingestion<B, F> {
    pub fn new(settings: IngestionSettings, builder: B, fetcher: F) -> Self {
        Self {
            settings,
            builder,
            fetcher,
            state: ArcSwap::from_pointee(IngestionState::idle()),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Latest published snapshot
    pub fn state(&self) -> Arc<IngestionState<B::Output>> {
        self.state.load_full()
    }

    pub fn settings(&self) -> &IngestionSettings {
        &self.settings
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Run the whole pipeline once and return the snapshot it published
    ///
    /// Dropping the returned future mid-fetch leaves data and error as they
    /// were. `is_loading` stays set while any other refresh is still fetching.
    pub async fn refresh(&self) -> Arc<IngestionState<B::Output>> {
        let profile = self.builder.profile().name;

        if !self.settings.enabled {
            log::debug!("[{}] ingestion disabled", profile);
            return self.publish(IngestionState::idle());
        }

        let Some(raw) = self
            .settings
            .source
            .as_deref()
            .filter(|source| !source.trim().is_empty())
        else {
            log::debug!("[{}] no source configured", profile);
            return self.publish(IngestionState::idle());
        };

        let source = match SheetSource::parse(raw) {
            Ok(source) => source,
            Err(e) => {
                log::warn!("[{}] {}", profile, e);
                return self.publish(IngestionState::failed(e.into()));
            }
        };

        let guard = LoadingGuard::begin(&self.state, &self.in_flight);

        let mut next = match self.fetcher.fetch_raw_text(&source).await {
            Ok(text) => {
                let grid = tokenize_with(&text, self.settings.dialect);
                log::debug!("[{}] tokenized {} rows", profile, grid.len());
                IngestionState::ready(self.builder.ingest(&grid))
            }
            Err(e) => {
                log::warn!("[{}] {}", profile, e);
                IngestionState::failed(e.into())
            }
        };

        next.is_loading = guard.complete();
        self.publish(next)
    }

    fn publish(&self, next: IngestionState<B::Output>) -> Arc<IngestionState<B::Output>> {
        let next = Arc::new(next);
        self.state.store(Arc::clone(&next));
        next
    }
}

/// Keeps `is_loading` in step with the number of refreshes in flight
///
/// A refresh dropped before it publishes only clears the flag when it was
/// the last one fetching.
struct LoadingGuard<'a, T> {
    state: &'a ArcSwap<IngestionState<T>>,
    in_flight: &'a AtomicUsize,
    armed: bool,
}

impl<'a, T> LoadingGuard<'a, T> {
    fn begin(state: &'a ArcSwap<IngestionState<T>>, in_flight: &'a AtomicUsize) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        state.rcu(|current| current.with_loading(true));
        Self {
            state,
            in_flight,
            armed: true,
        }
    }

    /// Leave the in-flight set, returning whether other refreshes remain
    fn complete(mut self) -> bool {
        self.armed = false;
        self.in_flight.fetch_sub(1, Ordering::SeqCst) > 1
    }
}

impl<T> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            let others = self.in_flight.fetch_sub(1, Ordering::SeqCst) > 1;
            log::debug!("Refresh cancelled while loading, others in flight: {}", others);
            self.state.rcu(|current| current.with_loading(others));
        }
    }
}
