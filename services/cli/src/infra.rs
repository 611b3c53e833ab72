use async_trait::async_trait;
use chrono::Utc;
use job_board::config::AppConfig;
use job_board::error::AppError;
use job_board::remote::{HttpRemoteClient, RemoteDataClient, RemoteError};
use job_board::session::SessionContext;
use job_board::workflows::application::{
    ApplicationPayload, ApplicationReceipt, ApplicationService, ApplicationStatus, JobId,
    JobPosting, UserProfile,
};
use job_board::workflows::applied::{AppliedJobsTracker, FileAppliedJobsCache};
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

pub(crate) type HttpApplicationService = ApplicationService<HttpRemoteClient, FileAppliedJobsCache>;

/// Service wired to the configured backend and the on-disk applied-jobs cache.
pub(crate) fn http_service(config: &AppConfig) -> Result<HttpApplicationService, AppError> {
    let session = SessionContext::from_config(&config.client);
    let remote = Arc::new(HttpRemoteClient::new(&config.client, &session)?);
    let cache = Arc::new(FileAppliedJobsCache::new(
        config.cache.applied_jobs_path.clone(),
    ));
    let tracker = Arc::new(AppliedJobsTracker::new(cache));
    Ok(ApplicationService::new(remote, session, tracker))
}

#[derive(Debug, Default)]
struct BackendState {
    jobs: HashMap<JobId, JobPosting>,
    applied: BTreeSet<JobId>,
    profile: Option<UserProfile>,
    apply_failures: VecDeque<RemoteError>,
    applications: Vec<(JobId, ApplicationPayload)>,
}

/// Backend kept in process memory for the demo.
#[derive(Debug, Default, Clone)]
pub(crate) struct InMemoryRemoteClient {
    state: Arc<Mutex<BackendState>>,
}

impl InMemoryRemoteClient {
    fn lock(&self) -> Result<MutexGuard<'_, BackendState>, RemoteError> {
        self.state
            .lock()
            .map_err(|err| RemoteError::Transport(err.to_string()))
    }

    pub(crate) fn insert_job(&self, job: JobPosting) -> Result<(), RemoteError> {
        self.lock()?.jobs.insert(job.id.clone(), job);
        Ok(())
    }

    pub(crate) fn record_applied(&self, job_id: JobId) -> Result<(), RemoteError> {
        self.lock()?.applied.insert(job_id);
        Ok(())
    }

    pub(crate) fn set_profile(&self, profile: UserProfile) -> Result<(), RemoteError> {
        self.lock()?.profile = Some(profile);
        Ok(())
    }

    /// Makes the next apply call fail with `error`.
    pub(crate) fn fail_next_apply(&self, error: RemoteError) -> Result<(), RemoteError> {
        self.lock()?.apply_failures.push_back(error);
        Ok(())
    }

    pub(crate) fn application_count(&self) -> Result<usize, RemoteError> {
        Ok(self.lock()?.applications.len())
    }
}

#[async_trait]
impl RemoteDataClient for InMemoryRemoteClient {
    async fn job(&self, job_id: &JobId) -> Result<JobPosting, RemoteError> {
        self.lock()?
            .jobs
            .get(job_id)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound("Job not found".to_string()))
    }

    async fn applied_jobs(&self) -> Result<Vec<JobId>, RemoteError> {
        Ok(self.lock()?.applied.iter().cloned().collect())
    }

    async fn apply(
        &self,
        job_id: &JobId,
        payload: &ApplicationPayload,
    ) -> Result<ApplicationReceipt, RemoteError> {
        let mut state = self.lock()?;
        if let Some(error) = state.apply_failures.pop_front() {
            return Err(error);
        }
        if !state.jobs.contains_key(job_id) {
            return Err(RemoteError::NotFound("Job not found".to_string()));
        }
        if state.applied.contains(job_id) {
            return Err(RemoteError::Status {
                status: 400,
                message: "You have already applied to this job posting".to_string(),
            });
        }

        state.applied.insert(job_id.clone());
        state.applications.push((job_id.clone(), payload.clone()));
        Ok(ApplicationReceipt {
            id: format!("application-{:04}", state.applications.len()),
            job_posting_id: job_id.clone(),
            status: ApplicationStatus::Applied,
            applied_at: Some(Utc::now()),
        })
    }

    async fn profile(&self) -> Result<Option<UserProfile>, RemoteError> {
        Ok(self.lock()?.profile.clone())
    }
}
