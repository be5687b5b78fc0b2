//! UI-facing reactive snapshot of the property collection.

use std::sync::Arc;

use tokio::sync::watch;

use crate::models::{PropertyKind, PropertyListing};
use crate::repository::PropertyRepository;

/// Holds the last fetched property snapshot and republishes it, together
/// with a loading flag and the latest unacknowledged error, as observable
/// state.
///
/// The store is the single writer of the snapshot. Concurrent refreshes
/// apply in completion order, so a slow early fetch can overwrite a faster
/// later one; the screens consuming this state tolerate that staleness.
pub struct PropertyStore {
    repository: Arc<PropertyRepository>,
    properties: watch::Sender<Vec<PropertyListing>>,
    loading: watch::Sender<bool>,
    error: watch::Sender<Option<String>>,
}

impl PropertyStore {
    /// Creates the store in its loading state without starting a fetch.
    pub fn new(repository: Arc<PropertyRepository>) -> Self {
        let (properties, _) = watch::channel(Vec::new());
        let (loading, _) = watch::channel(true);
        let (error, _) = watch::channel(None);
        Self {
            repository,
            properties,
            loading,
            error,
        }
    }

    /// Creates the store and begins the initial fetch in the background.
    pub fn open(repository: Arc<PropertyRepository>) -> Arc<Self> {
        let store = Arc::new(Self::new(repository));
        store.retry();
        store
    }

    /// Runs one load transition to completion.
    ///
    /// The fetch itself cannot fail (the repository absorbs remote errors
    /// into an empty list), so the error state only captures a fault in the
    /// spawned load task itself. The loading flag is cleared on every exit
    /// path.
    pub async fn refresh(&self) {
        self.loading.send_replace(true);
        let repository = self.repository.clone();
        let outcome = tokio::spawn(async move { repository.fetch_all().await }).await;
        match outcome {
            Ok(listings) => {
                self.properties.send_replace(listings);
                self.error.send_replace(None);
            }
            Err(failure) => {
                self.properties.send_replace(Vec::new());
                self.error.send_replace(Some(failure.to_string()));
            }
        }
        self.loading.send_replace(false);
    }

    /// Re-enters the load transition from any state without blocking the
    /// caller. A result that completes after every handle to the store is
    /// gone is published to channels nobody watches, then dropped.
    pub fn retry(self: &Arc<Self>) {
        let store = Arc::clone(self);
        tokio::spawn(async move { store.refresh().await });
    }

    /// Acknowledges the current error without refetching.
    pub fn clear_error(&self) {
        self.error.send_replace(None);
    }

    /// The current snapshot.
    pub fn properties(&self) -> Vec<PropertyListing> {
        self.properties.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// The latest unacknowledged error, if any. Each new error replaces the
    /// previous one.
    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn watch_properties(&self) -> watch::Receiver<Vec<PropertyListing>> {
        self.properties.subscribe()
    }

    pub fn watch_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn watch_error(&self) -> watch::Receiver<Option<String>> {
        self.error.subscribe()
    }

    /// Substring search over the held snapshot; never contacts the backend.
    pub fn search(&self, query: &str) -> Vec<PropertyListing> {
        self.properties
            .borrow()
            .iter()
            .filter(|listing| listing.matches_query(query))
            .cloned()
            .collect()
    }

    /// Snapshot listings of one kind.
    pub fn by_kind(&self, kind: PropertyKind) -> Vec<PropertyListing> {
        self.properties
            .borrow()
            .iter()
            .filter(|listing| listing.kind == kind)
            .cloned()
            .collect()
    }

    /// Snapshot listings priced within `[min, max]`, both bounds inclusive.
    pub fn by_price_range(&self, min: f64, max: f64) -> Vec<PropertyListing> {
        self.properties
            .borrow()
            .iter()
            .filter(|listing| listing.price >= min && listing.price <= max)
            .cloned()
            .collect()
    }
}
