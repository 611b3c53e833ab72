mod answers;
mod apply;
mod cli;
mod demo;
mod infra;
mod render;

use job_board::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
