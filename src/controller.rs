//! Feed state and the three intents that mutate it.
//!
//! State lives in a `watch` channel. Every transition goes through
//! `send_modify`, so readers always see a whole `FeedState`. Intents are not
//! queued: overlapping calls apply their results in completion order.

use crate::config::FeedConfig;
use crate::feed::types::UserRecord;
use crate::feed::UserDataSource;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    Idle,
    Loading,
    Refreshing,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedState {
    records: Vec<UserRecord>,
    loading: bool,
    refreshes_in_flight: usize,
}

impl FeedState {
    /// Display order: newest added first.
    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True only while a refresh is in flight. Initial load and add never set it.
    pub fn is_refreshing(&self) -> bool {
        self.refreshes_in_flight > 0
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn phase(&self) -> FeedPhase {
        if self.is_refreshing() {
            FeedPhase::Refreshing
        } else if self.loading {
            FeedPhase::Loading
        } else {
            FeedPhase::Idle
        }
    }

    #[cfg(test)]
    pub(crate) fn with_records(records: Vec<UserRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    fn begin_load(&mut self) {
        self.loading = true;
    }

    fn finish_load(&mut self, records: Vec<UserRecord>) {
        self.records = records;
        self.loading = false;
    }

    fn begin_refresh(&mut self) {
        self.refreshes_in_flight += 1;
    }

    fn finish_refresh(&mut self, records: Vec<UserRecord>) {
        self.records = records;
        self.refreshes_in_flight = self.refreshes_in_flight.saturating_sub(1);
    }

    fn prepend(&mut self, record: UserRecord) {
        self.records.insert(0, record);
    }
}

pub struct UserFeedController<S> {
    source: Arc<S>,
    state_tx: watch::Sender<FeedState>,
    mounted: AtomicBool,
    page_size: NonZeroUsize,
    add_size: NonZeroUsize,
}

impl<S: UserDataSource> UserFeedController<S> {
    pub fn new(source: S, config: &FeedConfig) -> Self {
        Self::with_shared_source(Arc::new(source), config)
    }

    pub fn with_shared_source(source: Arc<S>, config: &FeedConfig) -> Self {
        let (state_tx, _) = watch::channel(FeedState::default());
        Self {
            source,
            state_tx,
            mounted: AtomicBool::new(false),
            page_size: config.page_size,
            add_size: config.add_size,
        }
    }

    /// Receiver that is notified after every transition.
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state_tx.subscribe()
    }

    pub fn snapshot(&self) -> FeedState {
        self.state_tx.borrow().clone()
    }

    /// Mount intent. Runs the initial load the first time only and returns
    /// its record count; later calls return `None`.
    pub async fn on_mount(&self) -> Option<usize> {
        if self.mounted.swap(true, Ordering::SeqCst) {
            tracing::debug!("already mounted, skipping initial load");
            return None;
        }
        Some(self.load_initial().await)
    }

    /// Idle -> Loading -> Idle. Records become whatever the fetch produced,
    /// possibly nothing. Returns the number of records fetched.
    pub async fn load_initial(&self) -> usize {
        self.state_tx.send_modify(FeedState::begin_load);
        let records = self.source.fetch_users(self.page_size).await;
        let count = records.len();
        self.state_tx.send_modify(|s| s.finish_load(records));
        tracing::info!(records = count, "initial load complete");
        count
    }

    /// Idle -> Refreshing -> Idle. Replaces the list wholesale, so a failed
    /// fetch leaves it empty. Returns the number of records fetched.
    pub async fn refresh(&self) -> usize {
        self.state_tx.send_modify(FeedState::begin_refresh);
        let records = self.source.fetch_users(self.page_size).await;
        let count = records.len();
        self.state_tx.send_modify(|s| s.finish_refresh(records));
        tracing::info!(records = count, "refresh complete");
        count
    }

    /// Fetch one record and put it at the front. An empty fetch leaves the
    /// list untouched. Returns whether a record was added.
    pub async fn add_one(&self) -> bool {
        let mut records = self.source.fetch_users(self.add_size).await;
        if records.is_empty() {
            tracing::info!("add produced no record, list unchanged");
            return false;
        }
        let record = records.swap_remove(0);
        tracing::info!(id = %record.id, "added user");
        self.state_tx.send_modify(|s| s.prepend(record));
        true
    }
}
