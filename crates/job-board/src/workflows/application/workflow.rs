use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::domain::{ApplicationPayload, JobId, JobPosting, PersonalInfo, StepData, UserProfile};
use super::review::ReviewSummary;
use super::steps::{StepDefinition, StepId};
use super::validation::{validate_step, StepValidationError};
use crate::remote::RemoteError;

/// Observable position of the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    AtStep(StepId),
    Submitted,
    Failed { step: StepId, failure: SubmitFailure },
}

/// Why the backend did not store a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network failure, timeout or server error.
    Transient,
    /// Session missing or expired (401/403).
    Unauthorized,
    /// Any other rejected request.
    Rejected,
    /// The posting no longer exists. Ends the workflow.
    NotFound,
}

impl FailureKind {
    pub fn classify(err: &RemoteError) -> Self {
        if err.is_not_found() {
            FailureKind::NotFound
        } else if err.is_unauthorized() {
            FailureKind::Unauthorized
        } else if err.is_transient() {
            FailureKind::Transient
        } else {
            FailureKind::Rejected
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            FailureKind::Transient => "transient",
            FailureKind::Unauthorized => "unauthorized",
            FailureKind::Rejected => "rejected",
            FailureKind::NotFound => "not_found",
        }
    }
}

/// Message shown after a rejected or failed submission. Answers are kept;
/// a non-retryable failure closes the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitFailure {
    pub message: String,
    pub kind: FailureKind,
    pub retryable: bool,
}

impl SubmitFailure {
    pub fn from_remote(err: &RemoteError) -> Self {
        let kind = FailureKind::classify(err);
        Self {
            message: err.to_string(),
            kind,
            retryable: kind != FailureKind::NotFound,
        }
    }
}

impl fmt::Display for SubmitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SubmitFailure {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Active,
    Locked,
}

impl StepStatus {
    pub const fn label(self) -> &'static str {
        match self {
            StepStatus::Completed => "completed",
            StepStatus::Active => "active",
            StepStatus::Locked => "locked",
        }
    }
}

/// Stepper entry for one step of the posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub definition: StepDefinition,
    pub status: StepStatus,
    pub clickable: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("Please complete all required fields before proceeding.")]
    IncompleteStep(#[source] StepValidationError),
    #[error("Please complete all required fields before submitting.")]
    IncompleteSubmission(#[source] StepValidationError),
    #[error("submission is only available from the last step (currently on {current})")]
    NotOnLastStep { current: StepId },
    #[error("{found} data cannot be stored while {expected} is displayed")]
    StepMismatch { expected: StepId, found: StepId },
    #[error("application has already been submitted")]
    AlreadySubmitted,
    #[error("a submission is already in flight")]
    SubmitInFlight,
    #[error("application can no longer be submitted: {0}")]
    NotRetryable(SubmitFailure),
    #[error("job posting {job_id} does not define any application steps")]
    NoSteps { job_id: JobId },
}

impl TransitionError {
    /// Field-level detail for inline display, when the rejection came from validation.
    pub fn validation(&self) -> Option<&StepValidationError> {
        match self {
            TransitionError::IncompleteStep(err) | TransitionError::IncompleteSubmission(err) => {
                Some(err)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Editing,
    Submitted,
    Failed(SubmitFailure),
}

/// Linear, applicant-navigable form over a posting's ordered steps.
#[derive(Debug, Clone)]
pub struct ApplicationWorkflow {
    job: JobPosting,
    steps: Vec<StepId>,
    current: usize,
    completed: BTreeSet<StepId>,
    step_data: BTreeMap<StepId, StepData>,
    profile: Option<UserProfile>,
    phase: Phase,
    submitting: bool,
}

impl ApplicationWorkflow {
    pub fn new(job: JobPosting, profile: Option<UserProfile>) -> Result<Self, TransitionError> {
        let steps = job.application_steps.clone();
        if steps.is_empty() {
            return Err(TransitionError::NoSteps {
                job_id: job.id.clone(),
            });
        }

        let mut workflow = Self {
            job,
            steps,
            current: 0,
            completed: BTreeSet::new(),
            step_data: BTreeMap::new(),
            profile,
            phase: Phase::Editing,
            submitting: false,
        };
        workflow.enter_current();
        Ok(workflow)
    }

    pub fn job(&self) -> &JobPosting {
        &self.job
    }

    pub fn steps(&self) -> &[StepId] {
        &self.steps
    }

    pub fn current_step(&self) -> StepId {
        self.steps[self.current]
    }

    pub fn is_last_step(&self) -> bool {
        self.current + 1 == self.steps.len()
    }

    pub fn completed_steps(&self) -> &BTreeSet<StepId> {
        &self.completed
    }

    pub fn step_data(&self, step: StepId) -> Option<&StepData> {
        self.step_data.get(&step)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn failure(&self) -> Option<&SubmitFailure> {
        match &self.phase {
            Phase::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn state(&self) -> WorkflowState {
        match &self.phase {
            Phase::Editing => WorkflowState::AtStep(self.current_step()),
            Phase::Submitted => WorkflowState::Submitted,
            Phase::Failed(failure) => WorkflowState::Failed {
                step: self.current_step(),
                failure: failure.clone(),
            },
        }
    }

    /// Replaces the record of the displayed step.
    pub fn edit(&mut self, data: impl Into<StepData>) -> Result<(), TransitionError> {
        self.ensure_open()?;
        let data = data.into();
        let expected = self.current_step();
        if data.step() != expected {
            return Err(TransitionError::StepMismatch {
                expected,
                found: data.step(),
            });
        }

        self.step_data.insert(expected, data);
        self.clear_failure();
        Ok(())
    }

    /// Validates the displayed step, marks it completed and advances. On the
    /// last step the step is marked completed and stays displayed.
    pub fn next(&mut self) -> Result<StepId, TransitionError> {
        self.ensure_open()?;
        let step = self.current_step();
        validate_step(step, self.step_data.get(&step)).map_err(TransitionError::IncompleteStep)?;

        self.completed.insert(step);
        if !self.is_last_step() {
            self.current += 1;
            self.enter_current();
        }
        self.clear_failure();
        debug!(job_id = %self.job.id, from = %step, to = %self.current_step(), "advanced step");
        Ok(self.current_step())
    }

    /// Moves back one step without validating. A no-op on the first step and
    /// while a submission is in flight.
    pub fn previous(&mut self) -> StepId {
        if self.is_locked() || self.current == 0 {
            return self.current_step();
        }

        let from = self.current_step();
        self.current -= 1;
        self.enter_current();
        self.clear_failure();
        debug!(job_id = %self.job.id, from = %from, to = %self.current_step(), "moved back");
        self.current_step()
    }

    /// Displays `step` if it is completed or already displayed. Returns
    /// `false` and leaves the state untouched otherwise.
    pub fn jump_to(&mut self, step: StepId) -> bool {
        if self.is_locked() {
            return false;
        }
        if step == self.current_step() {
            return true;
        }
        if !self.completed.contains(&step) {
            return false;
        }
        let Some(index) = self.steps.iter().position(|candidate| *candidate == step) else {
            return false;
        };

        self.current = index;
        self.enter_current();
        self.clear_failure();
        debug!(job_id = %self.job.id, to = %step, "jumped to step");
        true
    }

    /// Validates the form for submission and raises the in-flight flag.
    /// Every step is re-checked because earlier answers may have been edited
    /// after they were completed.
    pub fn begin_submit(&mut self) -> Result<ApplicationPayload, TransitionError> {
        self.ensure_open()?;
        if !self.is_last_step() {
            return Err(TransitionError::NotOnLastStep {
                current: self.current_step(),
            });
        }

        for step in &self.steps {
            validate_step(*step, self.step_data.get(step))
                .map_err(TransitionError::IncompleteSubmission)?;
        }

        self.completed.insert(self.current_step());
        self.submitting = true;
        Ok(ApplicationPayload::from_step_data(&self.step_data))
    }

    /// Records the remote outcome of the submission started by `begin_submit`.
    pub fn finish_submit(&mut self, outcome: Result<(), SubmitFailure>) -> WorkflowState {
        self.submitting = false;
        self.phase = match outcome {
            Ok(()) => Phase::Submitted,
            Err(failure) => Phase::Failed(failure),
        };
        self.state()
    }

    pub fn step_views(&self) -> Vec<StepView> {
        self.steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let submitted = self.phase == Phase::Submitted;
                let status = if index == self.current && !submitted {
                    StepStatus::Active
                } else if submitted || self.completed.contains(step) {
                    StepStatus::Completed
                } else {
                    StepStatus::Locked
                };
                StepView {
                    definition: step.definition(),
                    status,
                    clickable: status != StepStatus::Locked,
                }
            })
            .collect()
    }

    /// `round((index + 1) / steps * 100)`.
    pub fn progress_percent(&self) -> u8 {
        let total = self.steps.len();
        let percent = ((self.current + 1) * 200 + total) / (2 * total);
        percent.min(100) as u8
    }

    pub fn review_summary(&self) -> ReviewSummary {
        ReviewSummary::build(&self.steps, &self.step_data)
    }

    fn ensure_open(&self) -> Result<(), TransitionError> {
        if self.phase == Phase::Submitted {
            return Err(TransitionError::AlreadySubmitted);
        }
        if self.submitting {
            return Err(TransitionError::SubmitInFlight);
        }
        match &self.phase {
            Phase::Failed(failure) if !failure.retryable => {
                Err(TransitionError::NotRetryable(failure.clone()))
            }
            _ => Ok(()),
        }
    }

    /// Submitted, in flight, or failed without retry.
    fn is_locked(&self) -> bool {
        self.ensure_open().is_err()
    }

    /// Drops a retryable failure once the applicant acts again.
    fn clear_failure(&mut self) {
        if matches!(&self.phase, Phase::Failed(failure) if failure.retryable) {
            self.phase = Phase::Editing;
        }
    }

    fn enter_current(&mut self) {
        let step = self.current_step();
        if step != StepId::PersonalInfo || self.step_data.contains_key(&step) {
            return;
        }
        if let Some(profile) = &self.profile {
            debug!(job_id = %self.job.id, "prefilled personal info from profile");
            self.step_data.insert(
                step,
                StepData::PersonalInfo(PersonalInfo::from_profile(profile)),
            );
        }
    }
}
