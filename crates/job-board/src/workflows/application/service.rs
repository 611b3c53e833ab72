use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{ApplicationReceipt, JobId};
use super::guard::ViewGuard;
use super::workflow::{ApplicationWorkflow, SubmitFailure, TransitionError};
use crate::remote::{RemoteDataClient, RemoteError};
use crate::session::SessionContext;
use crate::workflows::applied::{
    AppliedJobsCache, AppliedJobsSource, AppliedJobsTracker, ApplyGate,
};

/// Result of opening the application flow for a posting.
#[derive(Debug)]
pub enum OpenOutcome {
    Ready(Box<ApplicationWorkflow>),
    SignInRequired,
    AlreadyApplied(JobId),
    /// The view went away before the fetches finished.
    Detached,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored by the backend, or reported as a duplicate of an earlier application.
    Applied {
        job_id: JobId,
        receipt: Option<ApplicationReceipt>,
        duplicate: bool,
    },
    Failed(SubmitFailure),
    Detached,
}

/// Orchestrates the remote client, the tracker and the workflow state machine.
pub struct ApplicationService<C, K> {
    remote: Arc<C>,
    session: SessionContext,
    tracker: Arc<AppliedJobsTracker<K>>,
}

impl<C, K> ApplicationService<C, K>
where
    C: RemoteDataClient + 'static,
    K: AppliedJobsCache + 'static,
{
    pub fn new(
        remote: Arc<C>,
        session: SessionContext,
        tracker: Arc<AppliedJobsTracker<K>>,
    ) -> Self {
        Self {
            remote,
            session,
            tracker,
        }
    }

    pub fn remote(&self) -> &C {
        &self.remote
    }

    pub fn tracker(&self) -> &AppliedJobsTracker<K> {
        &self.tracker
    }

    /// Loads the applied-jobs set for the current session.
    pub async fn load_applied_jobs(&self) -> AppliedJobsSource {
        self.tracker.load(&self.session, self.remote.as_ref()).await
    }

    pub fn gate(&self, job_id: &JobId) -> ApplyGate {
        self.tracker.gate(job_id)
    }

    /// Fetches the posting and the applied-jobs list together, then the
    /// profile used for pre-fill.
    pub async fn open(
        &self,
        job_id: &JobId,
        guard: &ViewGuard,
    ) -> Result<OpenOutcome, ServiceError> {
        if !self.session.is_signed_in() {
            self.tracker.absorb(false, Ok(Vec::new()));
            return Ok(OpenOutcome::SignInRequired);
        }

        let (job, applied) = tokio::join!(self.remote.job(job_id), self.remote.applied_jobs());
        if !guard.is_attached() {
            return Ok(OpenOutcome::Detached);
        }

        self.tracker.absorb(true, applied);
        let job = job.map_err(|err| match err {
            RemoteError::NotFound(_) => ServiceError::JobNotFound {
                job_id: job_id.clone(),
            },
            other => ServiceError::Remote(other),
        })?;

        if self.tracker.has_applied(job_id) {
            info!(job_id = %job_id, "already applied; not opening application");
            return Ok(OpenOutcome::AlreadyApplied(job_id.clone()));
        }

        let profile = match self.remote.profile().await {
            Ok(profile) => profile,
            Err(err) => {
                warn!(job_id = %job_id, error = %err, "profile unavailable; no pre-fill");
                None
            }
        };
        if !guard.is_attached() {
            return Ok(OpenOutcome::Detached);
        }

        let workflow = ApplicationWorkflow::new(job, profile)?;
        info!(job_id = %job_id, steps = workflow.steps().len(), "application opened");
        Ok(OpenOutcome::Ready(Box::new(workflow)))
    }

    /// Validates and submits the workflow with a single create call. A
    /// duplicate-application rejection counts as success.
    pub async fn submit(
        &self,
        workflow: &mut ApplicationWorkflow,
        guard: &ViewGuard,
    ) -> Result<SubmitOutcome, ServiceError> {
        let payload = workflow.begin_submit()?;
        let job_id = workflow.job().id.clone();

        info!(job_id = %job_id, "submitting application");
        let result = self.remote.apply(&job_id, &payload).await;
        if !guard.is_attached() {
            return Ok(SubmitOutcome::Detached);
        }

        let (receipt, duplicate) = match result {
            Ok(receipt) => (Some(receipt), false),
            Err(err) if err.is_already_applied() => {
                info!(job_id = %job_id, "backend reports an existing application");
                (None, true)
            }
            Err(err) => {
                let failure = SubmitFailure::from_remote(&err);
                warn!(
                    job_id = %job_id,
                    kind = failure.kind.label(),
                    error = %err,
                    "application submission failed"
                );
                workflow.finish_submit(Err(failure.clone()));
                return Ok(SubmitOutcome::Failed(failure));
            }
        };

        workflow.finish_submit(Ok(()));
        self.tracker.mark_applied(&job_id);
        info!(job_id = %job_id, duplicate, "application submitted");
        Ok(SubmitOutcome::Applied {
            job_id,
            receipt,
            duplicate,
        })
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("job posting {job_id} was not found")]
    JobNotFound { job_id: JobId },
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}
