//! `studyplan` CLI -- generate, preview, and inspect study plans from the
//! command line.
//!
//! ## Usage
//!
//! ```sh
//! # Generate a plan from a request file, JSON on stdout
//! studyplan plan -i request.json
//!
//! # Persist the plan to a file, planning as of a fixed instant
//! studyplan plan -i request.json -o plan.json --now 2026-03-02T07:00:00Z
//!
//! # Human-readable preview (never writes files)
//! cat request.json | studyplan preview
//!
//! # Show the candidate sessions the allocator would see
//! studyplan slots -i request.json --config planner.toml
//! ```

use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use clap::{Args, Parser, Subcommand};
use study_planner::{CandidateSession, PlanRequest, PlannerConfig, SessionKind, StudyPlan};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "studyplan",
    version,
    about = "Adaptive study plan generator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log planner decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct RequestArgs {
    /// Request JSON file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Plan as of this instant (RFC 3339); defaults to the system clock
    #[arg(long)]
    now: Option<String>,
    /// Planner configuration file (TOML)
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a plan as JSON
    Plan {
        #[command(flatten)]
        request: RequestArgs,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Print a human-readable plan without saving it
    Preview {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// List the candidate study sessions before page allocation
    Slots {
        #[command(flatten)]
        request: RequestArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Plan { request, output } => {
            let (req, now, config) = load(&request)?;
            let plan = req.plan(now, &config).context("Failed to generate study plan")?;
            let json = serde_json::to_string_pretty(&plan)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Preview { request } => {
            let (req, now, config) = load(&request)?;
            let plan = req.plan(now, &config).context("Failed to generate study plan")?;
            print!("{}", render_plan(&plan));
        }
        Commands::Slots { request } => {
            let (req, now, config) = load(&request)?;
            let slots = req
                .candidates(now, &config)
                .context("Failed to compute candidate sessions")?;
            print!("{}", render_slots(&slots));
        }
    }

    Ok(())
}

/// Logs go to stderr so plan JSON on stdout stays clean. `RUST_LOG`, when
/// set, replaces the default `warn` filter; `--verbose` always logs at `debug`.
fn init_logging(verbose: bool) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) if !verbose => filter,
        _ => EnvFilter::new(if verbose { "debug" } else { "warn" }),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load(args: &RequestArgs) -> Result<(PlanRequest, DateTime<Utc>, PlannerConfig)> {
    let raw = read_input(args.input.as_deref())?;
    let request = PlanRequest::from_json(&raw).context("Failed to parse plan request")?;

    let now = match args.now.as_deref() {
        Some(s) => parse_datetime(s)?,
        None => Utc::now(),
    };

    let config = match args.config.as_deref() {
        Some(path) => PlannerConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path))?,
        None => PlannerConfig::default(),
    };

    tracing::debug!(
        user_id = %request.user_id,
        target_id = %request.target.id,
        now = %now.to_rfc3339(),
        "loaded plan request"
    );

    Ok((request, now, config))
}

/// Parse RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS` interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .with_context(|| format!("Invalid --now value: '{}'", s))
}

fn fmt_time(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

fn render_plan(plan: &StudyPlan) -> String {
    let mut out = format!(
        "Plan for {} (user {}), deadline {} UTC\n",
        plan.target_id,
        plan.user_id,
        fmt_time(&plan.deadline)
    );

    if plan.is_empty() {
        out.push_str("No study sessions scheduled.\n");
        return out;
    }

    for s in &plan.sessions {
        let pages = format!("pp. {}-{}", s.pages_from, s.pages_to);
        out.push_str(&format!(
            "{} - {}  {:<14} {}\n",
            fmt_time(&s.start),
            s.end.format("%H:%M"),
            pages,
            s.note
        ));
    }

    let initial = plan
        .sessions
        .iter()
        .filter(|s| s.kind == SessionKind::Initial)
        .count();
    let overflow = plan
        .sessions
        .iter()
        .filter(|s| s.kind == SessionKind::Overflow)
        .count();
    out.push_str(&format!(
        "{} sessions: {} initial, {} overflow, {} reviews, {} minutes\n",
        plan.sessions.len(),
        initial,
        overflow,
        plan.reviews().count(),
        plan.total_minutes()
    ));
    out
}

fn render_slots(slots: &[CandidateSession]) -> String {
    let mut out = String::new();
    for slot in slots {
        out.push_str(&format!(
            "{} - {}  ({} min){}\n",
            fmt_time(&slot.start),
            slot.end.format("%H:%M"),
            slot.duration_minutes(),
            if slot.synthesized { " [fallback]" } else { "" }
        ));
    }
    out.push_str(&format!("{} candidate sessions\n", slots.len()));
    out
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
