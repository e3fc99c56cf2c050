mod clock;
mod duration;
mod input;
mod notify;
mod plan;
mod render;
mod session;
#[cfg(test)]
mod testing;
mod timer;

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser};
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::level_filters::LevelFilter;

const EXAMPLES: &str = "\
Examples:
  pomo 25 5 4    # 25min work, 5min break, 4 sessions
  pomo 50 10 2   # 50min work, 10min break, 2 sessions
  pomo           # Default: 25min work, 5min break, 4 sessions
  pomo -i        # Ask for each value";

const STOPPED: &str = "\n\n\u{23F9}\u{FE0F}  Pomodoro timer stopped. Have a great day!";

#[derive(Parser)]
#[command(
    name = "pomo",
    about = "\u{1F345} Pomodoro timer",
    version,
    after_help = EXAMPLES
)]
struct Cli {
    /// Work interval in minutes (e.g., 25, 2.5, 1h30m, 90s)
    #[arg(allow_negative_numbers = true)]
    work_minutes: Option<String>,

    /// Break interval in minutes
    #[arg(allow_negative_numbers = true)]
    break_minutes: Option<String>,

    /// Number of work sessions
    #[arg(allow_negative_numbers = true)]
    sessions: Option<String>,

    /// Prompt for each value instead of reading arguments
    #[arg(short, long, conflicts_with_all = ["work_minutes", "break_minutes", "sessions"])]
    interactive: bool,

    /// Suppress notification sound
    #[arg(long)]
    silent: bool,

    /// Log diagnostics to stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => on_interrupt.cancel(),
            Err(e) => tracing::warn!(error = %e, "cannot listen for Ctrl+C"),
        }
    });

    let plan = if cli.interactive {
        let mut stdin = BufReader::new(tokio::io::stdin());
        match input::prompt_plan(&mut stdin, &mut std::io::stdout(), &cancel)
            .await
            .context("failed to read answers")?
        {
            input::Prompted::Plan(plan) => plan,
            input::Prompted::Cancelled => {
                println!("\n\u{274C} Setup cancelled.");
                // stdin is read on a blocking thread the runtime would wait on
                std::process::exit(0);
            }
        }
    } else {
        match input::from_args(
            cli.work_minutes.as_deref(),
            cli.break_minutes.as_deref(),
            cli.sessions.as_deref(),
        ) {
            Ok(plan) => plan,
            Err(e) => {
                eprintln!("\u{274C} {e}");
                Cli::command().print_help()?;
                return Ok(());
            }
        }
    };
    tracing::info!(?plan, "plan accepted");

    let mut env = timer::Env {
        clock: clock::SystemClock::new(),
        screen: render::TerminalScreen::new(std::io::stdout()),
        notifier: notify::DesktopNotifier::new(cli.silent),
        cancel,
        bar_width: render::BAR_WIDTH,
    };

    let outcome = session::run_session(&plan, &mut env)
        .await
        .context("failed to write to the terminal")?;

    if outcome == session::SessionOutcome::Cancelled {
        println!("{STOPPED}");
        std::process::exit(0);
    }
    Ok(())
}
