mod cli;
mod demo;
mod infra;
mod routes;
mod server;
mod survey;

use ai_act_compass::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
