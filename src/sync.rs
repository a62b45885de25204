//! Fetch → extract → normalize → derive id → full-replace write.
//!
//! A sync either commits a complete new generation to the [`Store`] or leaves
//! it untouched. Per-entry problems only drop that entry. Concurrent calls
//! for the same URL share one in-flight run.

use crate::feed::extract::extract;
use crate::feed::normalize::normalize;
use crate::feed::slug::derive_id;
use crate::feed::types::{EntryRejection, FetchFailure, NormalizedRecord, RawFeedEntry};
use crate::feed::{fetch_logged, FeedSource};
use crate::store::{Generation, Store};
use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Fetching,
    Parsing,
    Writing,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncPolicy {
    /// When a fetch succeeds but yields no storable records, keep the previous
    /// generation instead of committing an empty one.
    pub keep_stale_on_empty: bool,
}

/// Counts from one successful fetch-and-parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Entries the extractor emitted. Items missing a title, link or pubDate
    /// are discarded by the extractor and never counted.
    pub found: usize,
    /// Entries dropped for an unresolvable id or unparseable date.
    pub dropped: usize,
    /// Distinct records in the committed generation.
    pub stored: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Committed(SyncReport),
    KeptStale(SyncReport),
    Failed(FetchFailure),
}

type InFlight = Shared<BoxFuture<'static, SyncOutcome>>;

pub struct Synchronizer {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn FeedSource>,
    store: Arc<Store>,
    policy: SyncPolicy,
    states: Mutex<HashMap<String, Arc<watch::Sender<SyncState>>>>,
    in_flight: Mutex<HashMap<String, InFlight>>,
}

impl Synchronizer {
    pub fn new(source: Arc<dyn FeedSource>, store: Arc<Store>, policy: SyncPolicy) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                store,
                policy,
                states: Mutex::new(HashMap::new()),
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.inner.store
    }

    /// Watch state transitions of syncs against `url`. Each URL has its own channel.
    pub fn subscribe(&self, url: &str) -> watch::Receiver<SyncState> {
        self.inner.state_sender(url).subscribe()
    }

    /// Current state for `url`; `Idle` if it has never been synced.
    pub fn state(&self, url: &str) -> SyncState {
        *self.inner.state_sender(url).borrow()
    }

    /// Run one sync against `url`, or join the one already running for it.
    ///
    /// Never fails: a fetch failure is logged and reported in the outcome,
    /// and the store keeps its previous contents.
    pub async fn sync(&self, url: &str) -> SyncOutcome {
        let run = {
            let mut in_flight = self
                .inner
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            match in_flight.get(url) {
                Some(run) => run.clone(),
                None => {
                    let inner = self.inner.clone();
                    let key = url.to_string();
                    let run = async move {
                        let outcome = inner.run(&key).await;
                        inner
                            .in_flight
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .remove(&key);
                        outcome
                    }
                    .boxed()
                    .shared();
                    in_flight.insert(url.to_string(), run.clone());
                    run
                }
            }
        };
        run.await
    }
}

impl Inner {
    fn state_sender(&self, url: &str) -> Arc<watch::Sender<SyncState>> {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(url.to_string())
            .or_insert_with(|| Arc::new(watch::channel(SyncState::Idle).0))
            .clone()
    }

    async fn run(&self, url: &str) -> SyncOutcome {
        let state = self.state_sender(url);
        state.send_replace(SyncState::Fetching);
        let body = match fetch_logged(self.source.as_ref(), url).await {
            Ok(body) => body,
            Err(failure) => {
                state.send_replace(SyncState::Failed);
                state.send_replace(SyncState::Idle);
                return SyncOutcome::Failed(failure);
            }
        };

        state.send_replace(SyncState::Parsing);
        let entries = extract(&body);
        tracing::info!(url, count = entries.len(), "found feed entries");

        let found = entries.len();
        let records: Vec<NormalizedRecord> =
            entries.into_iter().filter_map(|e| to_record(e).ok()).collect();
        let mut report = SyncReport {
            found,
            dropped: found - records.len(),
            stored: 0,
        };

        if records.is_empty() && self.policy.keep_stale_on_empty {
            report.stored = self.store.len();
            state.send_replace(SyncState::Idle);
            return SyncOutcome::KeptStale(report);
        }

        state.send_replace(SyncState::Writing);
        let generation = Generation::from_records(records);
        report.stored = generation.len();
        self.store.replace(generation);
        state.send_replace(SyncState::Idle);

        SyncOutcome::Committed(report)
    }
}

/// Normalize one extracted entry into a storable record.
pub fn to_record(entry: RawFeedEntry) -> Result<NormalizedRecord, EntryRejection> {
    let id = derive_id(&entry.link).ok_or(EntryRejection::UnresolvableId)?;
    let published_at = parse_pub_date(&entry.pub_date).ok_or(EntryRejection::BadDate)?;
    Ok(NormalizedRecord {
        id,
        title: entry.title,
        description: normalize(&entry.description),
        published_at,
        external_url: entry.link,
    })
}

/// RSS dates are RFC 2822; some feeds emit RFC 3339 instead.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
