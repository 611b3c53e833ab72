use job_board::workflows::application::{
    ApplicationWorkflow, FailureKind, ReviewSummary, StepDefinition, SubmitOutcome,
    TransitionError,
};

pub(crate) fn render_stepper(workflow: &ApplicationWorkflow) {
    let job = workflow.job();
    println!(
        "{} at {} ({}; {})",
        job.title,
        job.employer.company_name,
        job.location.label(),
        job.salary.label()
    );
    println!("Progress: {}%", workflow.progress_percent());
    for (index, view) in workflow.step_views().iter().enumerate() {
        println!(
            "  {}. {:<22} [{}]",
            index + 1,
            view.definition.title,
            view.status.label()
        );
    }
}

pub(crate) fn render_step_definitions(definitions: &[StepDefinition]) {
    for (index, definition) in definitions.iter().enumerate() {
        println!(
            "  {}. {} ({})\n     {}",
            index + 1,
            definition.title,
            definition.id,
            definition.description
        );
    }
}

/// Prints the rejection and, for validation failures, each offending field.
pub(crate) fn render_rejection(err: &TransitionError) {
    println!("  {err}");
    if let Some(validation) = err.validation() {
        for issue in &validation.issues {
            println!("    - {}: {}", validation.step, issue);
        }
    }
}

pub(crate) fn render_review(summary: &ReviewSummary) {
    println!("Review your application");
    for section in &summary.sections {
        println!("  {}", section.title);
        for entry in &section.entries {
            println!("    {:<20} {}", format!("{}:", entry.label), entry.value);
        }
    }
}

pub(crate) fn render_outcome(outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Applied {
            job_id,
            receipt,
            duplicate,
        } => {
            if *duplicate {
                println!("Application for {job_id} was already on file.");
            } else {
                println!("Application submitted for {job_id}.");
            }
            if let Some(receipt) = receipt {
                println!(
                    "  Reference {} (status: {})",
                    receipt.id,
                    receipt.status.label()
                );
            }
        }
        SubmitOutcome::Failed(failure) => {
            println!("Submission failed: {failure}");
            match failure.kind {
                FailureKind::NotFound => println!("  This posting is no longer available."),
                FailureKind::Unauthorized => {
                    println!("  Sign in again; your answers were kept.")
                }
                FailureKind::Transient | FailureKind::Rejected => {
                    println!("  Your answers were kept; submit again to retry.")
                }
            }
        }
        SubmitOutcome::Detached => println!("Submission result ignored."),
    }
}
