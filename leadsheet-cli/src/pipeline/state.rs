use std::sync::Arc;

use super::IngestError;

/// One published view of an ingestion
///
/// Snapshots are immutable; every change publishes a new one.
#[derive(Debug)]
pub struct IngestionState<T> {
    pub data: Arc<T>,
    pub is_loading: bool,
    pub error: Option<IngestError>,
}

impl<T: Default> IngestionState<T> {
    /// Empty data, not loading, no error
    pub fn idle() -> Self {
        Self {
            data: Arc::new(T::default()),
            is_loading: false,
            error: None,
        }
    }

    pub fn failed(error: IngestError) -> Self {
        Self {
            data: Arc::new(T::default()),
            is_loading: false,
            error: Some(error),
        }
    }
}

impl<T> IngestionState<T> {
    pub fn ready(data: T) -> Self {
        Self {
            data: Arc::new(data),
            is_loading: false,
            error: None,
        }
    }

    /// Same data and error with a different loading flag
    pub fn with_loading(&self, is_loading: bool) -> Self {
        Self {
            data: Arc::clone(&self.data),
            is_loading,
            error: self.error.clone(),
        }
    }
}

impl<T: Default> Default for IngestionState<T> {
    fn default() -> Self {
        Self::idle()
    }
}
