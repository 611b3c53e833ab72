use crate::infra::InMemoryRemoteClient;
use crate::render::{render_outcome, render_rejection, render_review, render_stepper};
use chrono::{TimeZone, Utc};
use clap::Args;
use job_board::error::AppError;
use job_board::remote::RemoteError;
use job_board::session::SessionContext;
use job_board::workflows::application::{
    ApplicationService, ApplicationWorkflow, Employer, JobCategory, JobId, JobLocation,
    JobPosting, OpenOutcome, PersonalInfo, PhoneNumber, ReviewNotes, SalaryRange, StepData,
    StepId, SubmitOutcome, TechnicalAssessment, UserProfile, UserRole, ViewGuard,
};
use job_board::workflows::applied::{AppliedJobsTracker, InMemoryAppliedJobsCache};
use std::sync::Arc;

pub(crate) const DEMO_JOB: &str = "job-backend-engineer";
const EARLIER_JOB: &str = "job-data-analyst";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the simulated outage on the first submission attempt.
    #[arg(long)]
    pub(crate) skip_outage: bool,
    /// Optional cover letter entered on the review step.
    #[arg(long)]
    pub(crate) cover_letter: Option<String>,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        skip_outage,
        cover_letter,
    } = args;

    let backend = Arc::new(InMemoryRemoteClient::default());
    backend.insert_job(demo_posting())?;
    backend.record_applied(JobId::new(EARLIER_JOB))?;
    backend.set_profile(demo_profile())?;

    let cache = Arc::new(InMemoryAppliedJobsCache::default());
    let tracker = Arc::new(AppliedJobsTracker::new(cache));
    let session = SessionContext::signed_in("demo-session", Some("demo-csrf".to_string()));
    let service = ApplicationService::new(backend.clone(), session, tracker);
    let guard = ViewGuard::new();

    println!("Job application demo");
    let source = service.load_applied_jobs().await;
    println!("Applied jobs loaded from {}", source.label());
    for job in [EARLIER_JOB, DEMO_JOB] {
        println!("  {job}: {:?}", service.gate(&JobId::new(job)));
    }

    let mut workflow = match service.open(&JobId::new(DEMO_JOB), &guard).await? {
        OpenOutcome::Ready(workflow) => workflow,
        other => {
            println!("Application could not be opened: {other:?}");
            return Ok(());
        }
    };
    println!();
    render_stepper(&workflow);

    println!("\nStep 1: personal information (pre-filled from profile)");
    if let Some(StepData::PersonalInfo(prefilled)) = workflow.step_data(StepId::PersonalInfo) {
        println!(
            "  {} <{}> phone {}",
            prefilled.name,
            prefilled.email,
            prefilled.phone.as_str()
        );
    }
    let mut typo = current_personal_info(&workflow);
    typo.phone = PhoneNumber::from_input("555-0100");
    workflow.edit(typo)?;
    if let Err(rejection) = workflow.next() {
        render_rejection(&rejection);
    }
    let mut fixed = current_personal_info(&workflow);
    fixed.phone = PhoneNumber::from_input("(555) 010-0199");
    workflow.edit(fixed)?;
    workflow.next()?;

    println!("\nStep 2: technical assessment");
    workflow.edit(TechnicalAssessment {
        technical_assessment: "Six years building Rust services: tokio, axum, Postgres."
            .to_string(),
    })?;
    workflow.next()?;
    println!("  Progress: {}%", workflow.progress_percent());

    println!("\nStep 3: review & submit");
    if cover_letter.is_some() {
        workflow.edit(ReviewNotes { cover_letter })?;
    }
    render_review(&workflow.review_summary());

    if !skip_outage {
        backend.fail_next_apply(RemoteError::Status {
            status: 503,
            message: "HTTP 503: Service Unavailable".to_string(),
        })?;
        println!("\nSubmitting (backend outage simulated)");
        let outcome = service.submit(&mut workflow, &guard).await?;
        render_outcome(&outcome);
        if !matches!(outcome, SubmitOutcome::Failed(_)) {
            return Ok(());
        }
    }

    println!("\nSubmitting");
    let outcome = service.submit(&mut workflow, &guard).await?;
    render_outcome(&outcome);
    println!(
        "Backend stored {} application(s); {} is now {:?}",
        backend.application_count()?,
        DEMO_JOB,
        service.gate(&JobId::new(DEMO_JOB))
    );

    match service.open(&JobId::new(DEMO_JOB), &guard).await? {
        OpenOutcome::AlreadyApplied(job_id) => {
            println!("Re-opening {job_id} redirects back to the posting.")
        }
        other => println!("Unexpected re-open result: {other:?}"),
    }
    Ok(())
}

fn current_personal_info(workflow: &ApplicationWorkflow) -> PersonalInfo {
    match workflow.step_data(StepId::PersonalInfo) {
        Some(StepData::PersonalInfo(info)) => info.clone(),
        _ => PersonalInfo::default(),
    }
}

pub(crate) fn demo_posting() -> JobPosting {
    JobPosting {
        id: JobId::new(DEMO_JOB),
        title: "Backend Engineer".to_string(),
        description: "Design and run the services behind the job board.".to_string(),
        requirements: "Rust, SQL, distributed systems".to_string(),
        location: JobLocation {
            location_state: Some("st-co".to_string()),
            location_city: Some("Denver".to_string()),
            location_state_ref: None,
        },
        salary: SalaryRange {
            salary_min: Some(130_000),
            salary_max: Some(165_000),
        },
        employer: Employer {
            company_name: "Summit Labs".to_string(),
            company_description: Some("Hiring tools for small teams".to_string()),
        },
        category: Some(JobCategory {
            name: "Engineering".to_string(),
        }),
        created_at: Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).single(),
        application_steps: StepId::ordered().to_vec(),
    }
}

fn demo_profile() -> UserProfile {
    UserProfile {
        id: "profile-demo".to_string(),
        role: Some(UserRole::JobSeeker),
        name: "Jane Doe".to_string(),
        email: "jane@x.com".to_string(),
        phone: None,
        location_state: Some("st-co".to_string()),
        location_city: Some("Denver".to_string()),
    }
}
