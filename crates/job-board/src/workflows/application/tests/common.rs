use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::remote::{RemoteDataClient, RemoteError};
use crate::session::SessionContext;
use crate::workflows::application::domain::{
    ApplicationPayload, ApplicationReceipt, ApplicationStatus, Employer, JobId, JobLocation,
    JobPosting, PersonalInfo, PhoneNumber, SalaryRange, StepData, TechnicalAssessment,
    UserProfile, UserRole,
};
use crate::workflows::application::steps::StepId;
use crate::workflows::application::{ApplicationService, ApplicationWorkflow, ViewGuard};
use crate::workflows::applied::{AppliedJobsTracker, InMemoryAppliedJobsCache};

pub(super) fn posting(id: &str, steps: &[StepId]) -> JobPosting {
    JobPosting {
        id: JobId::new(id),
        title: "Platform Engineer".to_string(),
        description: "Own the deployment pipeline".to_string(),
        requirements: "Rust, Kubernetes".to_string(),
        location: JobLocation {
            location_state: Some("st-wa".to_string()),
            location_city: Some("Seattle".to_string()),
            location_state_ref: None,
        },
        salary: SalaryRange {
            salary_min: Some(140_000),
            salary_max: Some(180_000),
        },
        employer: Employer {
            company_name: "Northwind".to_string(),
            company_description: None,
        },
        category: None,
        created_at: None,
        application_steps: steps.to_vec(),
    }
}

pub(super) fn full_posting(id: &str) -> JobPosting {
    posting(id, &StepId::ordered())
}

pub(super) fn profile() -> UserProfile {
    UserProfile {
        id: "user-1".to_string(),
        role: Some(UserRole::JobSeeker),
        name: "Jane Doe".to_string(),
        email: "jane@x.com".to_string(),
        phone: Some("555-123-4567".to_string()),
        location_state: None,
        location_city: None,
    }
}

pub(super) fn personal_info(phone: &str) -> PersonalInfo {
    PersonalInfo {
        name: "Jane Doe".to_string(),
        email: "jane@x.com".to_string(),
        phone: PhoneNumber::from_input(phone),
        ..PersonalInfo::default()
    }
}

pub(super) fn assessment(text: &str) -> TechnicalAssessment {
    TechnicalAssessment {
        technical_assessment: text.to_string(),
    }
}

/// Workflow for the full three-step posting, parked on the review step.
pub(super) fn workflow_at_review(id: &str) -> ApplicationWorkflow {
    let mut workflow = ApplicationWorkflow::new(full_posting(id), None).expect("steps present");
    workflow
        .edit(personal_info("5551234567"))
        .expect("edit personal info");
    workflow.next().expect("personal info valid");
    workflow
        .edit(assessment("Ten years of Rust services"))
        .expect("edit assessment");
    workflow.next().expect("assessment valid");
    assert_eq!(workflow.current_step(), StepId::ReviewSubmit);
    workflow
}

pub(super) fn receipt(job_id: &str) -> ApplicationReceipt {
    ApplicationReceipt {
        id: "application-1".to_string(),
        job_posting_id: JobId::new(job_id),
        status: ApplicationStatus::Applied,
        applied_at: None,
    }
}

/// Backend fake with scripted responses, a record of apply calls and a
/// count of applied-jobs fetches.
#[derive(Default)]
pub(super) struct ScriptedRemote {
    jobs: Mutex<HashMap<JobId, JobPosting>>,
    applied: Mutex<Option<Result<Vec<JobId>, RemoteError>>>,
    applied_fetches: AtomicUsize,
    apply_results: Mutex<VecDeque<Result<ApplicationReceipt, RemoteError>>>,
    profile: Mutex<Option<Result<Option<UserProfile>, RemoteError>>>,
    submissions: Mutex<Vec<(JobId, ApplicationPayload)>>,
    detach_on_apply: Mutex<Option<ViewGuard>>,
}

impl ScriptedRemote {
    pub(super) fn with_job(self, job: JobPosting) -> Self {
        self.jobs
            .lock()
            .expect("jobs mutex poisoned")
            .insert(job.id.clone(), job);
        self
    }

    pub(super) fn with_applied(self, applied: Result<Vec<JobId>, RemoteError>) -> Self {
        *self.applied.lock().expect("applied mutex poisoned") = Some(applied);
        self
    }

    pub(super) fn with_profile(self, profile: Result<Option<UserProfile>, RemoteError>) -> Self {
        *self.profile.lock().expect("profile mutex poisoned") = Some(profile);
        self
    }

    pub(super) fn push_apply_result(&self, result: Result<ApplicationReceipt, RemoteError>) {
        self.apply_results
            .lock()
            .expect("apply mutex poisoned")
            .push_back(result);
    }

    pub(super) fn detach_during_apply(&self, guard: ViewGuard) {
        *self.detach_on_apply.lock().expect("guard mutex poisoned") = Some(guard);
    }

    pub(super) fn applied_fetches(&self) -> usize {
        self.applied_fetches.load(Ordering::SeqCst)
    }

    pub(super) fn submissions(&self) -> Vec<(JobId, ApplicationPayload)> {
        self.submissions
            .lock()
            .expect("submissions mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl RemoteDataClient for ScriptedRemote {
    async fn job(&self, job_id: &JobId) -> Result<JobPosting, RemoteError> {
        self.jobs
            .lock()
            .expect("jobs mutex poisoned")
            .get(job_id)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound("Job not found".to_string()))
    }

    async fn applied_jobs(&self) -> Result<Vec<JobId>, RemoteError> {
        self.applied_fetches.fetch_add(1, Ordering::SeqCst);
        self.applied
            .lock()
            .expect("applied mutex poisoned")
            .clone()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn apply(
        &self,
        job_id: &JobId,
        payload: &ApplicationPayload,
    ) -> Result<ApplicationReceipt, RemoteError> {
        self.submissions
            .lock()
            .expect("submissions mutex poisoned")
            .push((job_id.clone(), payload.clone()));
        if let Some(guard) = self
            .detach_on_apply
            .lock()
            .expect("guard mutex poisoned")
            .as_ref()
        {
            guard.detach();
        }
        self.apply_results
            .lock()
            .expect("apply mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(receipt(job_id.as_str())))
    }

    async fn profile(&self) -> Result<Option<UserProfile>, RemoteError> {
        self.profile
            .lock()
            .expect("profile mutex poisoned")
            .clone()
            .unwrap_or(Ok(None))
    }
}

pub(super) type TestService = ApplicationService<ScriptedRemote, InMemoryAppliedJobsCache>;

pub(super) fn signed_in() -> SessionContext {
    SessionContext::signed_in("session-token", Some("csrf-token".to_string()))
}

pub(super) fn service(
    remote: Arc<ScriptedRemote>,
    session: SessionContext,
    cache: Arc<InMemoryAppliedJobsCache>,
) -> TestService {
    let tracker = Arc::new(AppliedJobsTracker::new(cache));
    ApplicationService::new(remote, session, tracker)
}

pub(super) fn stored_personal_info(workflow: &ApplicationWorkflow) -> Option<&PersonalInfo> {
    match workflow.step_data(StepId::PersonalInfo) {
        Some(StepData::PersonalInfo(info)) => Some(info),
        _ => None,
    }
}
