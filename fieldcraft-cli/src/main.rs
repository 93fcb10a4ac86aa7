//! fieldcraft command line
//!
//! Loads a JSON fixture into in-memory stores and runs one engine operation
//! against it, printing JSON to stdout. Logs go to stderr.
//!
//! Usage:
//!   fieldcraft --fixture site.json validate
//!   fieldcraft --fixture site.json read --record 12
//!   fieldcraft --fixture site.json write --options site-settings --input '{"phone":"555"}'

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use fieldcraft_cli::{Fixture, Target, Workspace, parse_input};
use fieldcraft_engine::EngineConfig;
use fieldcraft_types::RecordId;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "fieldcraft")]
#[command(about = "Resolve, read and write CMS field values against a fixture")]
struct Args {
    /// Path to the JSON fixture
    #[arg(short, long)]
    fixture: PathBuf,

    /// Path to an engine config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report schema issues in the fixture's field groups
    Validate,
    /// Print the field definitions that apply to a target
    Resolve(TargetArgs),
    /// Print the formatted field values of a target
    Read(TargetArgs),
    /// Sanitize and store values, then print the write summary
    Write {
        #[command(flatten)]
        target: TargetArgs,
        /// JSON object of submitted values, or @path to a file holding one
        #[arg(short, long)]
        input: String,
    },
}

#[derive(ClapArgs, Debug)]
struct TargetArgs {
    /// Content record id
    #[arg(long, conflicts_with = "options", required_unless_present = "options")]
    record: Option<u64>,

    /// Options page key
    #[arg(long)]
    options: Option<String>,
}

impl TargetArgs {
    fn target(&self) -> Result<Target> {
        match (self.record, &self.options) {
            (Some(id), _) => Ok(Target::Record(RecordId::new(id))),
            (None, Some(page)) => Ok(Target::OptionsPage(page.clone())),
            (None, None) => anyhow::bail!("one of --record or --options is required"),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let fixture = Fixture::load(&args.fixture)?;
    debug!("Loaded fixture with {} field groups", fixture.groups.len());

    let output = match &args.command {
        Command::Validate => return validate(&fixture),
        Command::Resolve(target) => load(&args, fixture)?.resolve(&target.target()?)?,
        Command::Read(target) => load(&args, fixture)?.read(&target.target()?)?,
        Command::Write { target, input } => {
            let input = parse_input(input)?;
            load(&args, fixture)?.write(&target.target()?, &input)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn validate(fixture: &Fixture) -> Result<()> {
    let issues = fixture.validate();
    for issue in &issues {
        warn!("{}", issue);
    }
    println!("{}", serde_json::to_string_pretty(&issues)?);
    if !issues.is_empty() {
        anyhow::bail!("{} schema issue(s) found", issues.len());
    }
    info!("No schema issues");
    Ok(())
}

fn load(args: &Args, fixture: Fixture) -> Result<Workspace> {
    let config = match &args.config {
        Some(path) => EngineConfig::read(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    fixture.into_workspace(config)
}
