//! CLI binary for schedule-gen.
//!
//! A thin shim over the library crate: the command-line path stands in for
//! the platform file picker, a directory stands in for document storage, and
//! `--open` hands the result to the desktop's default handler.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use schedule_gen::{
    ClientConfig, FsDocumentStorage, Notice, PathPicker, ShareCapability, Stage, SystemOpener,
    Unavailable, ViewMode, WorkflowController, WorkflowObserver, DEFAULT_BASE_URL,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI observer using indicatif ─────────────────────────────────────────────

/// Spinner that follows the transaction through its stages.
struct CliObserver {
    bar: ProgressBar,
}

impl CliObserver {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl WorkflowObserver for CliObserver {
    fn on_stage(&self, stage: Stage) {
        let (prefix, msg) = match stage {
            Stage::Uploading => ("Generating", "waiting for the schedule service…"),
            Stage::Saving => ("Saving", "writing spreadsheet…"),
            Stage::Sharing => ("Sharing", "handing off…"),
        };
        self.bar.set_prefix(prefix);
        self.bar.set_message(msg);
    }

    fn on_notice(&self, notice: &Notice) {
        self.bar.finish_and_clear();
        match notice {
            Notice::Completed(_) => eprintln!("{} {}", green("✔"), notice.message()),
            Notice::Error { .. } => eprintln!("{} {}", red("✘"), notice.message()),
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Room view, saved as ~/Documents/Schedule.xlsx
  schedule-gen Classes.xlsx

  # Teacher view with a custom name
  schedule-gen --mode teacher --name Fall2024 Classes.xlsx

  # Different deployment, save next to the input, open when done
  schedule-gen --base-url https://sched.example.edu --output-dir . --open Classes.xlsx

ENVIRONMENT VARIABLES:
  SCHEDULE_GEN_BASE_URL    Service root (default: http://127.0.0.1:5001)
  SCHEDULE_GEN_TIMEOUT     Request timeout in seconds (default: none)
  SCHEDULE_GEN_OUTPUT_DIR  Where generated schedules are saved
  RUST_LOG                 tracing filter, overrides -v / -q
"#;

/// Generate room or teacher schedules from a class timetable spreadsheet.
#[derive(Parser, Debug)]
#[command(
    name = "schedule-gen",
    version,
    about = "Generate room or teacher schedules from a class timetable spreadsheet",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Timetable spreadsheet (.xlsx or .xls).
    input: PathBuf,

    /// Schedule layout to generate.
    #[arg(short, long, value_enum, default_value = "room")]
    mode: ModeArg,

    /// Output name; ".xlsx" is appended if missing.
    #[arg(short, long, default_value = schedule_gen::workflow::DEFAULT_OUTPUT_NAME)]
    name: String,

    /// Schedule service root URL.
    #[arg(long, env = "SCHEDULE_GEN_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Directory to save into. Default: your Documents directory.
    #[arg(short, long, env = "SCHEDULE_GEN_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Give up after this many seconds. Default: wait indefinitely.
    #[arg(long, env = "SCHEDULE_GEN_TIMEOUT")]
    timeout: Option<u64>,

    /// Open the generated schedule with the system's default application.
    #[arg(long)]
    open: bool,

    /// Print the outcome as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum ModeArg {
    Room,
    Teacher,
}

impl From<ModeArg> for ViewMode {
    fn from(v: ModeArg) -> Self {
        match v {
            ModeArg::Room => ViewMode::Room,
            ModeArg::Teacher => ViewMode::Teacher,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner covers progress; library INFO logs only when asked for.
    let show_progress = shows_progress(&cli);
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build controller ─────────────────────────────────────────────────
    let config = build_config(&cli)?;

    let storage = match cli.output_dir {
        Some(ref dir) => FsDocumentStorage::new(dir),
        None => FsDocumentStorage::documents(),
    };
    let share: Arc<dyn ShareCapability> = if cli.open {
        Arc::new(SystemOpener)
    } else {
        Arc::new(Unavailable)
    };

    let mut builder = WorkflowController::builder(config)
        .picker(Arc::new(PathPicker::new(Some(cli.input.clone()))))
        .storage(Arc::new(storage))
        .share(share);
    if show_progress {
        builder = builder.observer(CliObserver::new());
    }
    let controller = builder.build().context("Failed to set up client")?;

    // ── Run transaction ──────────────────────────────────────────────────
    // With the spinner on, CliObserver has already printed the failure.
    if let Err(e) = controller.pick_file().await {
        if show_progress {
            return Ok(ExitCode::FAILURE);
        }
        return Err(e).context("Could not use input file");
    }
    controller.set_mode(cli.mode.clone().into());
    controller.set_output_name(cli.name.clone());

    let outcome = match controller.submit().await {
        Ok(outcome) => outcome,
        Err(_) if show_progress => return Ok(ExitCode::FAILURE),
        Err(e) => return Err(e).context("Generation failed"),
    };

    if cli.json {
        let json = serde_json::json!({
            "state": controller.snapshot().state,
            "path": outcome.path(),
            "shared": outcome.is_shared(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json).context("Failed to serialise outcome")?
        );
    } else if !cli.quiet && !show_progress {
        println!("{}", bold(&outcome.path().display().to_string()));
    }

    Ok(ExitCode::SUCCESS)
}

/// The spinner runs, and owns failure reporting, only in plain interactive use.
fn shows_progress(cli: &Cli) -> bool {
    !cli.quiet && !cli.json && !cli.verbose
}

/// Map CLI args to `ClientConfig`.
fn build_config(cli: &Cli) -> Result<ClientConfig> {
    let mut builder = ClientConfig::builder().base_url(&cli.base_url);
    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    builder.build().context("Invalid configuration")
}
