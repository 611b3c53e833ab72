use crate::apply::{run_applied, run_apply, run_steps, ApplyArgs, StepsArgs};
use crate::demo::{run_demo, DemoArgs};
use clap::{Parser, Subcommand};
use job_board::config::AppConfig;
use job_board::error::AppError;
use job_board::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "job-board",
    about = "Apply to job board postings from the command line",
    version
)]
struct Cli {
    /// Override the configured API base URL (APP_API_BASE_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk a posting's application form from a JSON answer sheet and submit it
    Apply(ApplyArgs),
    /// List the postings the signed-in user has applied to
    Applied,
    /// Show the application steps a posting requires
    Steps(StepsArgs),
    /// Run the full application flow against an in-memory backend
    Demo(DemoArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(api_url) = cli.api_url.as_deref() {
        config.client.override_base_url(api_url)?;
    }

    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, api = %config.client.api_base_url, "configuration loaded");

    match cli.command {
        Command::Apply(args) => run_apply(&config, args).await,
        Command::Applied => run_applied(&config).await,
        Command::Steps(args) => run_steps(&config, args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
