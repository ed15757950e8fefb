use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use fresh_repl::config::Config;
use fresh_repl::model::buffer::FieldRegion;
use fresh_repl::services::repl::{SessionEvent, SessionManager};
use fresh_repl::services::{log_dirs, tracing_setup};
use fresh_repl::transcript;
use serde::Serialize;
use std::path::PathBuf;

/// Replay recorded shell traffic through a REPL session and report the
/// resulting buffer fields
#[derive(Parser, Debug)]
#[command(name = "fresh-repl")]
#[command(about = "Classify REPL output into prompt, input and output fields", long_about = None)]
#[command(version)]
struct Args {
    /// JSON-lines transcript of `{"output": ..}` and `{"input": ..}` events
    #[arg(value_name = "TRANSCRIPT", required_unless_present_any = ["dump_config", "dump_schema"])]
    transcript: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file (default: XDG state dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Working directory the session is registered under (default: current dir)
    #[arg(long, value_name = "PATH")]
    working_dir: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Print the JSON schema of the configuration file and exit
    #[arg(long)]
    dump_schema: bool,
}

#[derive(Serialize)]
struct ReplayReport {
    ready: bool,
    job_control: bool,
    events: Vec<SessionEvent>,
    regions: Vec<FieldRegion>,
}

fn load_config(args: &Args) -> AnyhowResult<Config> {
    let config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> AnyhowResult<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();

    if args.dump_schema {
        return print_json(&Config::json_schema());
    }

    let config = load_config(&args)?;
    if args.dump_config {
        return print_json(&config);
    }

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(log_dirs::main_log_path);
    if let Err(e) = tracing_setup::init_global(&log_file) {
        eprintln!("Warning: could not open log file {}: {}", log_file.display(), e);
    }
    tracing::info!("fresh-repl starting, logging to {:?}", log_file);

    let transcript_path = args
        .transcript
        .as_ref()
        .context("No transcript given")?;
    let events = transcript::load_transcript(transcript_path)
        .with_context(|| format!("Failed to read transcript {}", transcript_path.display()))?;

    let working_dir = match &args.working_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let mut manager = SessionManager::new(config.repl);
    let id = manager.open(working_dir);
    let session = manager.session_mut(&id)?;
    let signalled = transcript::replay(session, &events);

    let report = ReplayReport {
        ready: session.is_ready(),
        job_control: session.in_job_control(),
        events: signalled,
        regions: session.regions(),
    };
    print_json(&report)?;

    manager.close(&id);
    Ok(())
}
