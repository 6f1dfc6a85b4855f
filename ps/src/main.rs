use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::info;

use progressstore::cli::{Cli, Command};
use progressstore::config::Config;
use progressstore::{ProgressEngine, ProgressStore};

fn setup_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    let file = cli.file.unwrap_or(config.progress_file);
    let engine = ProgressEngine::new(ProgressStore::new(&file, &config.project_name));

    info!(file = %file.display(), "progressstore starting");

    let output = match cli.command {
        Command::Summary => engine.show_summary(),
        Command::Milestones => engine.list_milestones(),
        Command::AddMilestone { name, description } => engine.create_milestone(&name, &description),
        Command::AddTask {
            name,
            description,
            milestone,
        } => engine.add_task(&name, &description, milestone.as_deref()),
        Command::CompleteTask { name } => engine.complete_task(&name),
    };

    match output {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "error:".red(), e);
            std::process::exit(1);
        }
    }
}
