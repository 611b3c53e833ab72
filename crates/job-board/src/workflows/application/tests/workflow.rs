use super::common::*;
use crate::workflows::application::domain::{PhoneNumber, ReviewNotes, StepData};
use crate::workflows::application::steps::StepId;
use crate::workflows::application::validation::{Field, FieldIssue};
use crate::workflows::application::workflow::{
    ApplicationWorkflow, FailureKind, StepStatus, SubmitFailure, TransitionError, WorkflowState,
};

#[test]
fn starts_on_first_posting_step() {
    let job = posting("J1", &[StepId::TechnicalAssessment, StepId::ReviewSubmit]);
    let workflow = ApplicationWorkflow::new(job, Some(profile())).expect("steps present");
    assert_eq!(
        workflow.state(),
        WorkflowState::AtStep(StepId::TechnicalAssessment)
    );
    assert!(workflow.completed_steps().is_empty());
    assert!(
        workflow.step_data(StepId::PersonalInfo).is_none(),
        "pre-fill only applies once personal_info is displayed"
    );
}

#[test]
fn posting_without_steps_cannot_start() {
    match ApplicationWorkflow::new(posting("J1", &[]), None) {
        Err(TransitionError::NoSteps { job_id }) => assert_eq!(job_id.as_str(), "J1"),
        other => panic!("expected missing steps error, got {other:?}"),
    }
}

#[test]
fn current_step_stays_within_posting_steps() {
    let steps = [StepId::PersonalInfo, StepId::ReviewSubmit];
    let mut workflow = ApplicationWorkflow::new(posting("J1", &steps), None).expect("steps");

    let _ = workflow.next();
    workflow.edit(personal_info("5551234567")).expect("edit");
    workflow.next().expect("valid");
    workflow.next().expect("review always valid");
    workflow.previous();
    workflow.previous();
    workflow.jump_to(StepId::TechnicalAssessment);

    assert!(steps.contains(&workflow.current_step()));
    assert_eq!(workflow.step_views().len(), steps.len());
}

#[test]
fn short_phone_blocks_next() {
    let mut workflow = ApplicationWorkflow::new(full_posting("J1"), None).expect("steps");
    workflow.edit(personal_info("555123")).expect("edit");

    let err = workflow.next().expect_err("phone too short");
    assert_eq!(
        err.to_string(),
        "Please complete all required fields before proceeding."
    );
    let validation = err.validation().expect("validation detail");
    assert_eq!(validation.issues, vec![FieldIssue::PhoneTooShort { digits: 6 }]);
    assert_eq!(workflow.current_step(), StepId::PersonalInfo);
    assert!(workflow.completed_steps().is_empty());
}

#[test]
fn valid_personal_info_advances() {
    let mut workflow = ApplicationWorkflow::new(full_posting("J1"), None).expect("steps");
    workflow.edit(personal_info("5551234567")).expect("edit");

    let next = workflow.next().expect("valid personal info");

    assert_eq!(next, StepId::TechnicalAssessment);
    assert!(workflow.completed_steps().contains(&StepId::PersonalInfo));
}

#[test]
fn empty_name_and_email_are_named() {
    let mut workflow = ApplicationWorkflow::new(full_posting("J1"), None).expect("steps");
    let mut info = personal_info("5551234567");
    info.name.clear();
    info.email = "   ".to_string();
    workflow.edit(info).expect("edit");

    let err = workflow.next().expect_err("missing fields");
    assert_eq!(
        err.validation().expect("detail").fields(),
        vec![Field::Name, Field::Email]
    );
}

#[test]
fn jump_to_locked_step_is_a_no_op() {
    let mut workflow = ApplicationWorkflow::new(full_posting("J1"), None).expect("steps");

    assert!(!workflow.jump_to(StepId::ReviewSubmit));
    assert_eq!(workflow.current_step(), StepId::PersonalInfo);
    assert!(workflow.jump_to(StepId::PersonalInfo), "current step is allowed");
}

#[test]
fn jump_to_completed_step_moves_back() {
    let mut workflow = workflow_at_review("J1");

    assert!(workflow.jump_to(StepId::PersonalInfo));
    assert_eq!(workflow.current_step(), StepId::PersonalInfo);
    assert!(workflow.jump_to(StepId::TechnicalAssessment));
    assert_eq!(workflow.current_step(), StepId::TechnicalAssessment);
}

#[test]
fn previous_then_next_returns_to_same_step() {
    let mut workflow = ApplicationWorkflow::new(full_posting("J1"), None).expect("steps");
    workflow.edit(personal_info("5551234567")).expect("edit");
    workflow.next().expect("valid");
    workflow.edit(assessment("Distributed systems")).expect("edit");
    let before = workflow.step_data(StepId::TechnicalAssessment).cloned();

    assert_eq!(workflow.previous(), StepId::PersonalInfo);
    assert_eq!(workflow.next().expect("still valid"), StepId::TechnicalAssessment);

    assert_eq!(workflow.step_data(StepId::TechnicalAssessment).cloned(), before);
    assert_eq!(
        stored_personal_info(&workflow).map(|info| info.phone.as_str()),
        Some("5551234567")
    );
}

#[test]
fn previous_on_first_step_is_a_no_op() {
    let mut workflow = ApplicationWorkflow::new(full_posting("J1"), None).expect("steps");
    assert_eq!(workflow.previous(), StepId::PersonalInfo);
}

#[test]
fn previous_is_never_validated() {
    let mut workflow = ApplicationWorkflow::new(full_posting("J1"), None).expect("steps");
    workflow.edit(personal_info("5551234567")).expect("edit");
    workflow.next().expect("valid");
    workflow.edit(assessment("")).expect("edit");

    assert_eq!(workflow.previous(), StepId::PersonalInfo);
}

#[test]
fn next_on_last_step_marks_it_completed_in_place() {
    let mut workflow = workflow_at_review("J1");
    assert_eq!(workflow.next().expect("review valid"), StepId::ReviewSubmit);
    assert!(workflow.completed_steps().contains(&StepId::ReviewSubmit));
}

#[test]
fn profile_prefills_personal_info_once() {
    let mut workflow =
        ApplicationWorkflow::new(full_posting("J1"), Some(profile())).expect("steps");

    let info = stored_personal_info(&workflow).expect("prefilled");
    assert_eq!(info.name, "Jane Doe");
    assert_eq!(info.phone, PhoneNumber::from_input("5551234567"));

    let mut edited = info.clone();
    edited.name = "Jane Q. Doe".to_string();
    workflow.edit(edited).expect("edit");
    workflow.next().expect("valid");
    workflow.previous();

    assert_eq!(
        stored_personal_info(&workflow).map(|info| info.name.as_str()),
        Some("Jane Q. Doe")
    );
}

#[test]
fn edit_must_match_displayed_step() {
    let mut workflow = ApplicationWorkflow::new(full_posting("J1"), None).expect("steps");
    match workflow.edit(assessment("Rust")) {
        Err(TransitionError::StepMismatch { expected, found }) => {
            assert_eq!(expected, StepId::PersonalInfo);
            assert_eq!(found, StepId::TechnicalAssessment);
        }
        other => panic!("expected mismatch, got {other:?}"),
    }
}

#[test]
fn submit_requires_last_step() {
    let mut workflow = ApplicationWorkflow::new(full_posting("J1"), None).expect("steps");
    workflow.edit(personal_info("5551234567")).expect("edit");
    assert!(matches!(
        workflow.begin_submit(),
        Err(TransitionError::NotOnLastStep {
            current: StepId::PersonalInfo
        })
    ));
    assert!(!workflow.is_submitting());
}

#[test]
fn submit_revalidates_answers_edited_after_completion() {
    let mut workflow = workflow_at_review("J1");
    workflow.next().expect("review completes in place");
    assert!(workflow.jump_to(StepId::TechnicalAssessment));
    workflow.edit(assessment(" ")).expect("edit");
    assert!(workflow.jump_to(StepId::ReviewSubmit));

    let err = workflow.begin_submit().expect_err("assessment now blank");
    assert_eq!(
        err.to_string(),
        "Please complete all required fields before submitting."
    );
    assert_eq!(
        err.validation().map(|detail| detail.step),
        Some(StepId::TechnicalAssessment)
    );
}

#[test]
fn in_flight_submit_refuses_a_second_one() {
    let mut workflow = workflow_at_review("J1");
    workflow.begin_submit().expect("first submit");

    assert!(matches!(
        workflow.begin_submit(),
        Err(TransitionError::SubmitInFlight)
    ));
    assert!(!workflow.jump_to(StepId::PersonalInfo));
}

#[test]
fn failure_keeps_answers_and_allows_resubmission() {
    let mut workflow = workflow_at_review("J1");
    workflow.begin_submit().expect("submit");
    let failure = SubmitFailure {
        message: "HTTP 503: Service Unavailable".to_string(),
        kind: FailureKind::Transient,
        retryable: true,
    };

    let state = workflow.finish_submit(Err(failure.clone()));

    assert_eq!(
        state,
        WorkflowState::Failed {
            step: StepId::ReviewSubmit,
            failure
        }
    );
    assert!(stored_personal_info(&workflow).is_some());
    let payload = workflow.begin_submit().expect("resubmit allowed");
    assert_eq!(payload.application_data.len(), 2);
    assert_eq!(workflow.finish_submit(Ok(())), WorkflowState::Submitted);
}

#[test]
fn editing_after_failure_clears_the_banner() {
    let mut workflow = workflow_at_review("J1");
    workflow.begin_submit().expect("submit");
    workflow.finish_submit(Err(SubmitFailure {
        message: "network error".to_string(),
        kind: FailureKind::Transient,
        retryable: true,
    }));

    workflow
        .edit(ReviewNotes {
            cover_letter: Some("Looking forward to it".to_string()),
        })
        .expect("edit review notes");

    assert!(workflow.failure().is_none());
    assert_eq!(workflow.state(), WorkflowState::AtStep(StepId::ReviewSubmit));
    let payload = workflow.begin_submit().expect("submit");
    assert_eq!(payload.cover_letter, "Looking forward to it");
    assert!(matches!(
        payload.application_data.get(&StepId::ReviewSubmit),
        Some(StepData::ReviewSubmit(_))
    ));
}

#[test]
fn submitted_workflow_is_terminal() {
    let mut workflow = workflow_at_review("J1");
    workflow.begin_submit().expect("submit");
    workflow.finish_submit(Ok(()));

    assert!(matches!(workflow.next(), Err(TransitionError::AlreadySubmitted)));
    assert!(matches!(
        workflow.begin_submit(),
        Err(TransitionError::AlreadySubmitted)
    ));
    assert!(!workflow.jump_to(StepId::PersonalInfo));
    assert_eq!(workflow.state(), WorkflowState::Submitted);
}

#[test]
fn missing_posting_failure_closes_the_workflow() {
    let mut workflow = workflow_at_review("J1");
    workflow.begin_submit().expect("submit");
    let failure = SubmitFailure {
        message: "Job posting not found".to_string(),
        kind: FailureKind::NotFound,
        retryable: false,
    };
    workflow.finish_submit(Err(failure.clone()));

    assert!(matches!(
        workflow.begin_submit(),
        Err(TransitionError::NotRetryable(ref closed)) if *closed == failure
    ));
    assert!(matches!(
        workflow.edit(ReviewNotes::default()),
        Err(TransitionError::NotRetryable(_))
    ));
    assert_eq!(workflow.previous(), StepId::ReviewSubmit);
    assert!(!workflow.jump_to(StepId::PersonalInfo));
    assert_eq!(workflow.failure(), Some(&failure));
    assert!(!workflow.is_submitting());
}

#[test]
fn stepper_marks_completed_active_and_locked() {
    let mut workflow = ApplicationWorkflow::new(full_posting("J1"), None).expect("steps");
    workflow.edit(personal_info("5551234567")).expect("edit");
    workflow.next().expect("valid");

    let views = workflow.step_views();
    let statuses: Vec<_> = views.iter().map(|view| view.status).collect();
    assert_eq!(
        statuses,
        vec![StepStatus::Completed, StepStatus::Active, StepStatus::Locked]
    );
    let clickable: Vec<_> = views.iter().map(|view| view.clickable).collect();
    assert_eq!(clickable, vec![true, true, false]);
}

#[test]
fn progress_rounds_to_nearest_percent() {
    let mut workflow = ApplicationWorkflow::new(full_posting("J1"), None).expect("steps");
    assert_eq!(workflow.progress_percent(), 33);
    workflow.edit(personal_info("5551234567")).expect("edit");
    workflow.next().expect("valid");
    assert_eq!(workflow.progress_percent(), 67);
    workflow.edit(assessment("Rust")).expect("edit");
    workflow.next().expect("valid");
    assert_eq!(workflow.progress_percent(), 100);
}
