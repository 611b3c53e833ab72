//! Multi-step job application flow: step registry, typed answers, the form
//! state machine and the service that drives it against the backend.

pub mod domain;
pub mod guard;
pub mod review;
pub mod service;
pub mod steps;
pub mod validation;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationPayload, ApplicationReceipt, ApplicationStatus, Employer, JobCategory, JobId,
    JobLocation, JobPosting, PersonalInfo, PhoneNumber, ReviewNotes, SalaryRange, StepData,
    TechnicalAssessment, UserProfile, UserRole,
};
pub use guard::ViewGuard;
pub use review::{ReviewEntry, ReviewSection, ReviewSummary};
pub use service::{ApplicationService, OpenOutcome, ServiceError, SubmitOutcome};
pub use steps::{definitions_for, StepDefinition, StepId};
pub use validation::{Field, FieldIssue, StepValidationError, MIN_PHONE_DIGITS};
pub use workflow::{
    ApplicationWorkflow, FailureKind, StepStatus, StepView, SubmitFailure, TransitionError,
    WorkflowState,
};
