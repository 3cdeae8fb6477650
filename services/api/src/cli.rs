use crate::demo::{run_demo, DemoArgs};
use crate::server;
use crate::survey::{run_survey, SurveyArgs};
use ai_act_compass::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "AI Act Compass",
    about = "Classify AI systems against the EU AI Act risk tiers",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Walk the risk questionnaire and print the verdict as JSON
    Survey(SurveyArgs),
    /// Run an in-memory walkthrough of boards, surveys, AI analysis, and KPIs
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Survey(args) => run_survey(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
