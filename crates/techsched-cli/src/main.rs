//! techsched CLI - Technician Task Scheduling
//!
//! Command-line interface for loading tasks and technician availability,
//! running the daily scheduler, and writing the resulting tables.

mod config;
mod loader;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use techsched_core::{Renderer, ScheduleOutcome};
use techsched_render::{ExcelRenderer, JsonRenderer, TextRenderer, UNSCHEDULED_FILE_NAME};
use techsched_solver::{verify_outcome, DailyScheduler};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{FileConfig, Overrides};

#[derive(Parser)]
#[command(name = "techsched")]
#[command(author, version, about = "Technician task scheduling", long_about = None)]
struct Cli {
    /// Verbose output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule tasks against technician availability
    Schedule(ScheduleArgs),

    /// Load and validate the input files without scheduling
    Check(InputArgs),
}

#[derive(Args)]
struct InputArgs {
    /// Tasks file (JSON array)
    #[arg(long, value_name = "FILE")]
    tasks: PathBuf,

    /// Technician availability file (JSON array)
    #[arg(long, value_name = "FILE")]
    technicians: PathBuf,
}

#[derive(Args)]
struct ScheduleArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Scheduler configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// First hour of the workday
    #[arg(long, value_name = "HOUR", env = "WORKDAY_START_HOUR")]
    workday_start: Option<u32>,

    /// Hour by which every task must end
    #[arg(long, value_name = "HOUR", env = "WORKDAY_END_HOUR")]
    workday_end: Option<u32>,

    /// Minutes between candidate start times
    #[arg(long, value_name = "MINUTES", env = "SCHEDULER_INTERVAL_MINUTES")]
    interval: Option<u32>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Directory for xlsx workbooks
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Re-check the finished schedule and fail on any violation
    #[arg(long)]
    verify: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Xlsx,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let result = match cli.command {
        Commands::Schedule(args) => schedule(&args),
        Commands::Check(args) => check(&args),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn schedule(args: &ScheduleArgs) -> Result<ExitCode> {
    let file = args.config.as_deref().map(FileConfig::load).transpose()?;
    let overrides = Overrides {
        workday_start_hour: args.workday_start,
        workday_end_hour: args.workday_end,
        slot_interval_minutes: args.interval,
    };
    let config = config::resolve(file.as_ref(), &overrides)?;

    let loaded = loader::load_tasks(&args.input.tasks)?;
    let table = loader::load_technicians(&args.input.technicians)?;

    let scheduler = DailyScheduler::new(config.clone())?;
    let outcome = scheduler.run(&loaded.tasks, &table);

    match args.format {
        Format::Text => print!("{}", TextRenderer::new().render(&outcome)?),
        Format::Json => println!("{}", JsonRenderer::new().pretty().render(&outcome)?),
        Format::Xlsx => {
            let report = ExcelRenderer::new().render(&outcome)?;
            for path in report
                .write_to(&args.output_dir)
                .with_context(|| format!("failed to write workbooks to {}", args.output_dir.display()))?
            {
                info!(path = %path.display(), "wrote workbook");
            }
        }
    }

    report_outcome(&outcome, args.format, &args.output_dir);

    if args.verify {
        let violations = verify_outcome(&outcome, &loaded.tasks, &table, &config);
        if !violations.is_empty() {
            for violation in &violations {
                error!("{violation}");
            }
            eprintln!("error: schedule verification found {} violation(s)", violations.len());
            return Ok(ExitCode::FAILURE);
        }
        info!("schedule verified");
    }

    Ok(ExitCode::SUCCESS)
}

fn report_outcome(outcome: &ScheduleOutcome, format: Format, output_dir: &Path) {
    if outcome.scheduled.is_empty() {
        warn!("No tasks could be scheduled");
    }
    if outcome.is_complete() {
        info!("All tasks were successfully scheduled");
    } else if format == Format::Xlsx {
        warn!(
            "Some tasks could not be scheduled. See {} for details.",
            output_dir.join(UNSCHEDULED_FILE_NAME).display()
        );
    } else {
        warn!("Some tasks could not be scheduled. See the unscheduled tasks list for details.");
    }
}

fn check(args: &InputArgs) -> Result<ExitCode> {
    let loaded = loader::load_tasks(&args.tasks)?;
    let table = loader::load_technicians(&args.technicians)?;

    println!("Tasks: {} ({} skipped)", loaded.tasks.len(), loaded.skipped.len());
    for skipped in &loaded.skipped {
        println!("  skipped {skipped}");
    }
    println!("Technicians: {}", table.len());

    Ok(ExitCode::SUCCESS)
}
