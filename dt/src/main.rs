//! devtalk - conversational software development agent
//!
//! CLI entry point: start, resume, and list conversation sessions.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::info;

use devtalk::cli::{Cli, Command};
use devtalk::config::Config;
use devtalk::dispatch::{DispatchLoop, DispatchState};
use devtalk::planner;

fn setup_logging(verbose: bool) -> Result<()> {
    // Logs go to a file so they never interleave with the conversation
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("devtalk")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("devtalk.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "devtalk loaded config: provider={}, model={}",
        config.planner.provider, config.planner.model
    );

    match cli.command {
        Some(Command::Chat { prompt }) => cmd_chat(&config, prompt).await,
        Some(Command::Load { session_id }) => cmd_load(&config, &session_id).await,
        Some(Command::List) => cmd_list(&config),
        None => cmd_chat(&config, None).await,
    }
}

/// Build a dispatch loop over the current working directory
fn build_loop(config: &Config) -> Result<DispatchLoop> {
    config.validate()?;
    let planner = planner::create_client(&config.planner).map_err(|e| eyre::eyre!(e.to_string()))?;
    let workspace = std::env::current_dir().context("Failed to resolve working directory")?;
    Ok(DispatchLoop::new(config, planner, workspace))
}

/// Start a new conversation, optionally seeded with a prompt
async fn cmd_chat(config: &Config, prompt: Option<String>) -> Result<()> {
    let mut engine = build_loop(config)?;
    print_welcome(&engine);

    if let Some(seed) = prompt {
        println!("{} {}", ">".bright_green(), seed);
        let reply = engine.run(Some(&seed)).await?;
        print_reply(&engine, &reply);
        if engine.state() == DispatchState::Terminated {
            return Ok(());
        }
    }

    interactive_loop(&mut engine).await
}

/// Load a saved session by id and continue it
async fn cmd_load(config: &Config, session_id: &str) -> Result<()> {
    let mut engine = build_loop(config)?;

    let path = config.session.sessions_dir.join(format!("{}.json", session_id));
    if !engine.session_mut().load_session(&path) {
        eprintln!("{} could not load session: {}", "error:".red(), session_id);
        eprintln!("Use {} to see all saved sessions", "dt list".yellow());
        std::process::exit(1);
    }

    println!("{} {}", "Loaded session:".bright_cyan(), session_id);
    println!("{}\n", engine.session().conversation_summary().dimmed());

    interactive_loop(&mut engine).await
}

/// List all saved sessions, most recent first
fn cmd_list(config: &Config) -> Result<()> {
    let store = devtalk::session::SessionStore::new(&config.session.sessions_dir);
    let sessions = store.list();

    if sessions.is_empty() {
        println!("No saved sessions.");
        return Ok(());
    }

    println!("{} saved session(s):\n", sessions.len());
    for (i, session) in sessions.iter().enumerate() {
        println!("{}. {}", i + 1, session.session_id.bright_cyan());
        println!("   created:  {}", session.created_at);
        println!("   turns:    {}", session.conversation_turns);
        println!("   steps:    {}", session.steps);
        if !session.summary.is_empty() {
            let preview: String = session.summary.chars().take(100).collect();
            println!("   summary:  {}", preview.dimmed());
        }
        println!("   file:     {}", session.file_path.display());
        println!();
    }

    Ok(())
}

fn print_welcome(engine: &DispatchLoop) {
    println!();
    println!("{}", "devtalk - conversational development agent".bright_cyan().bold());
    println!("Session: {}", engine.session().state().session_id);
    println!(
        "Type {} or {} to end (the session is saved), {} to start over",
        "exit".yellow(),
        "quit".yellow(),
        "new".yellow()
    );
    println!();
}

fn print_reply(engine: &DispatchLoop, reply: &str) {
    match engine.state() {
        DispatchState::AwaitingUserInput => {
            println!("{} {}\n", "?".bright_yellow(), reply);
        }
        DispatchState::Terminated => {
            println!("{}\n{}\n", "Session finished.".bright_cyan(), reply.dimmed());
        }
        DispatchState::Running => {
            println!("{}\n", reply);
        }
    }
}

/// Forward free-text lines as user responses until an exit keyword
async fn interactive_loop(engine: &mut DispatchLoop) -> Result<()> {
    let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

    loop {
        let readline = rl.readline(&format!("{} ", ">".bright_green()));

        match readline {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(input);

                match input.to_lowercase().as_str() {
                    "exit" | "quit" => {
                        engine.session_mut().save_session();
                        println!("Session saved. Goodbye!");
                        break;
                    }
                    "new" => {
                        let seed = rl
                            .readline(&format!("{} ", "Describe the new request:".bright_cyan()))
                            .unwrap_or_default();
                        let seed = seed.trim().to_string();
                        if seed.is_empty() {
                            continue;
                        }
                        println!("{} {}", "New session:".bright_cyan(), "starting over".dimmed());
                        let reply = engine.start_new_session(&seed).await?;
                        print_reply(engine, &reply);
                    }
                    _ => {
                        engine.handle_user_response(input);
                        let reply = engine.run(None).await?;
                        print_reply(engine, &reply);
                    }
                }

                if engine.state() == DispatchState::Terminated {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C saves and exits
                println!("^C");
                engine.session_mut().save_session();
                break;
            }
            Err(ReadlineError::Eof) => {
                println!();
                engine.session_mut().save_session();
                break;
            }
            Err(err) => {
                return Err(eyre::eyre!("Readline error: {}", err));
            }
        }
    }

    Ok(())
}
