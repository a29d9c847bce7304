// Entrypoint for the CLI application.
// - Loads config and templates up front so a broken setup fails before any
//   prompt is shown.
// - Hands a `Session` to the menu loop, which blocks until the user exits.

use anyhow::Context;
use clap::Parser;
use crossterm::style::Stylize;
use slack_status::api::SlackClient;
use slack_status::cli::Cli;
use slack_status::config::{self, Config, CONFIG_FILE, EXAMPLE_CONFIG, TEMPLATES_FILE};
use slack_status::context::Session;
use slack_status::error::AppError;
use slack_status::templates::TemplateStore;
use slack_status::ui;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.init_logging();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_fatal(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config_path = config::resolve_path(cli.config.as_deref(), CONFIG_FILE);
    let config = Config::load(&config_path)?;

    let templates = TemplateStore::new(config::resolve_path(
        cli.templates.as_deref(),
        TEMPLATES_FILE,
    ));
    let count = templates.load()?.len();
    log::info!(
        "using {} ({count} templates)",
        templates.path().display()
    );

    let api = SlackClient::from_env(&config.access_token).context("Failed to set up Slack client")?;
    let session = Session::new(config, api, templates);

    ui::run(&session)?;
    println!("Bye!");
    Ok(())
}

fn report_fatal(err: &anyhow::Error) {
    eprintln!("{}", format!("Error: {err:#}").red());
    if let Some(AppError::ConfigMissing { path }) = err.downcast_ref::<AppError>() {
        eprintln!(
            "{}",
            format!("Create {} with the following content:", path.display()).yellow()
        );
        eprintln!("{}", EXAMPLE_CONFIG.blue());
    }
}
