use crate::answers::AnswerSheet;
use crate::infra::http_service;
use crate::render::{
    render_outcome, render_rejection, render_review, render_step_definitions, render_stepper,
};
use clap::Args;
use job_board::config::AppConfig;
use job_board::error::AppError;
use job_board::remote::RemoteDataClient;
use job_board::workflows::application::{
    definitions_for, ApplicationService, ApplicationWorkflow, JobId, OpenOutcome, ServiceError,
    SubmitOutcome, ViewGuard,
};
use job_board::workflows::applied::AppliedJobsCache;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ApplyArgs {
    /// Job posting id
    #[arg(long)]
    pub(crate) job: String,
    /// JSON answer sheet keyed by step id (personal_info, technical_assessment, review_submit)
    #[arg(long)]
    pub(crate) answers: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct StepsArgs {
    /// Job posting id
    #[arg(long)]
    pub(crate) job: String,
}

pub(crate) async fn run_apply(config: &AppConfig, args: ApplyArgs) -> Result<(), AppError> {
    let ApplyArgs { job, answers } = args;
    let sheet = AnswerSheet::from_path(&answers)?;
    let service = http_service(config)?;
    let job_id = JobId::new(job);
    let guard = ViewGuard::new();

    let mut workflow = match service.open(&job_id, &guard).await? {
        OpenOutcome::Ready(workflow) => workflow,
        OpenOutcome::SignInRequired => {
            println!("Sign in required: set APP_SESSION_COOKIE and APP_CSRF_TOKEN to apply.");
            return Ok(());
        }
        OpenOutcome::AlreadyApplied(job_id) => {
            println!("You have already applied to {job_id}.");
            return Ok(());
        }
        OpenOutcome::Detached => return Ok(()),
    };

    let outcome = complete_and_submit(&service, &mut workflow, &sheet, &guard).await?;
    render_outcome(&outcome);
    submission_result(outcome)
}

/// A failed submission is a command failure.
fn submission_result(outcome: SubmitOutcome) -> Result<(), AppError> {
    match outcome {
        SubmitOutcome::Failed(failure) => Err(failure.into()),
        SubmitOutcome::Applied { .. } | SubmitOutcome::Detached => Ok(()),
    }
}

/// Fills each step from the answer sheet, advancing until the last step,
/// then shows the review and submits.
pub(crate) async fn complete_and_submit<C, K>(
    service: &ApplicationService<C, K>,
    workflow: &mut ApplicationWorkflow,
    sheet: &AnswerSheet,
    guard: &ViewGuard,
) -> Result<SubmitOutcome, AppError>
where
    C: RemoteDataClient + 'static,
    K: AppliedJobsCache + 'static,
{
    render_stepper(workflow);
    loop {
        if let Some(data) = sheet.for_step(workflow.current_step()) {
            workflow.edit(data)?;
        }
        if workflow.is_last_step() {
            break;
        }
        if let Err(err) = workflow.next() {
            render_rejection(&err);
            return Err(err.into());
        }
    }

    render_review(&workflow.review_summary());
    match service.submit(workflow, guard).await {
        Ok(outcome) => Ok(outcome),
        Err(err) => {
            if let ServiceError::Transition(rejection) = &err {
                render_rejection(rejection);
            }
            Err(err.into())
        }
    }
}

pub(crate) async fn run_applied(config: &AppConfig) -> Result<(), AppError> {
    let service = http_service(config)?;
    let source = service.load_applied_jobs().await;
    let jobs = service.tracker().applied_jobs();

    info!(count = jobs.len(), source = source.label(), "applied jobs loaded");
    println!("Applied jobs ({}):", source.label());
    if jobs.is_empty() {
        println!("  none");
    }
    for job_id in jobs {
        println!("  {job_id}");
    }
    Ok(())
}

pub(crate) async fn run_steps(config: &AppConfig, args: StepsArgs) -> Result<(), AppError> {
    let service = http_service(config)?;
    let job_id = JobId::new(args.job);
    let posting = service.remote().job(&job_id).await?;

    println!("{} at {}", posting.title, posting.employer.company_name);
    let definitions = definitions_for(&posting.application_steps);
    if definitions.is_empty() {
        println!("  This posting does not accept applications through the form.");
    }
    render_step_definitions(&definitions);
    Ok(())
}
