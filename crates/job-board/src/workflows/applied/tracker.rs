use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use tracing::{info, warn};

use super::cache::AppliedJobsCache;
use crate::remote::{RemoteDataClient, RemoteError};
use crate::session::SessionContext;
use crate::workflows::application::domain::JobId;

/// Whether the apply action is offered for a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyGate {
    SignInRequired,
    AlreadyApplied,
    Available,
}

/// Where the current applied-jobs set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppliedJobsSource {
    SignedOut,
    Remote,
    Cache,
}

impl AppliedJobsSource {
    pub const fn label(self) -> &'static str {
        match self {
            AppliedJobsSource::SignedOut => "signed out",
            AppliedJobsSource::Remote => "backend",
            AppliedJobsSource::Cache => "local cache",
        }
    }
}

#[derive(Debug)]
struct TrackerState {
    jobs: BTreeSet<JobId>,
    signed_in: bool,
    source: AppliedJobsSource,
}

/// Applied-jobs bookkeeping for the current user. The backend list wins on
/// every load; local additions are optimistic until the next load.
#[derive(Debug)]
pub struct AppliedJobsTracker<K> {
    cache: Arc<K>,
    state: RwLock<TrackerState>,
}

impl<K> AppliedJobsTracker<K>
where
    K: AppliedJobsCache,
{
    pub fn new(cache: Arc<K>) -> Self {
        Self {
            cache,
            state: RwLock::new(TrackerState {
                jobs: BTreeSet::new(),
                signed_in: false,
                source: AppliedJobsSource::SignedOut,
            }),
        }
    }

    /// Fetches the authoritative list when signed in.
    pub async fn load<C>(&self, session: &SessionContext, remote: &C) -> AppliedJobsSource
    where
        C: RemoteDataClient + ?Sized,
    {
        if !session.is_signed_in() {
            return self.absorb(false, Ok(Vec::new()));
        }
        let fetched = remote.applied_jobs().await;
        self.absorb(true, fetched)
    }

    /// Applies the result of an applied-jobs fetch. A successful fetch
    /// replaces both memory and cache; a failed one falls back to the cache.
    pub fn absorb(
        &self,
        signed_in: bool,
        fetched: Result<Vec<JobId>, RemoteError>,
    ) -> AppliedJobsSource {
        let (jobs, source) = if !signed_in {
            (BTreeSet::new(), AppliedJobsSource::SignedOut)
        } else {
            match fetched {
                Ok(remote) => {
                    let jobs: BTreeSet<JobId> = remote.into_iter().collect();
                    if let Err(err) = self.cache.set(&jobs) {
                        warn!(error = %err, "failed to refresh applied jobs cache");
                    }
                    info!(count = jobs.len(), "loaded applied jobs from backend");
                    (jobs, AppliedJobsSource::Remote)
                }
                Err(err) => {
                    warn!(error = %err, "applied jobs fetch failed; using local cache");
                    let jobs = self.cache.get().unwrap_or_else(|cache_err| {
                        warn!(error = %cache_err, "applied jobs cache unreadable");
                        BTreeSet::new()
                    });
                    (jobs, AppliedJobsSource::Cache)
                }
            }
        };

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.jobs = jobs;
        state.signed_in = signed_in;
        state.source = source;
        source
    }

    pub fn has_applied(&self, job_id: &JobId) -> bool {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.signed_in && state.jobs.contains(job_id)
    }

    pub fn gate(&self, job_id: &JobId) -> ApplyGate {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        if !state.signed_in {
            ApplyGate::SignInRequired
        } else if state.jobs.contains(job_id) {
            ApplyGate::AlreadyApplied
        } else {
            ApplyGate::Available
        }
    }

    /// Records a successful submission without waiting for a re-fetch.
    pub fn mark_applied(&self, job_id: &JobId) {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            state.jobs.insert(job_id.clone());
        }

        let added = BTreeSet::from([job_id.clone()]);
        if let Err(err) = self.cache.merge(&added) {
            warn!(job_id = %job_id, error = %err, "failed to cache applied job");
        }
    }

    pub fn applied_jobs(&self) -> BTreeSet<JobId> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .jobs
            .clone()
    }

    pub fn source(&self) -> AppliedJobsSource {
        self.state.read().unwrap_or_else(PoisonError::into_inner).source
    }
}
