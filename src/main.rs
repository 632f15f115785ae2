use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use issue_grabber::config::AppConfig;
use issue_grabber::progress::{render_bar, FakeProgress};
use issue_grabber::queue::task::RunRequest;
use issue_grabber::queue::Runner;

#[derive(Parser)]
#[command(
    name = "issue-grabber",
    version,
    about = "Grab open GitLab issues for a subsystem into a text report"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// GitLab personal access token
    #[arg(short, long, env = "GITLAB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Subsystem label to match, e.g. "Pump Cart"
    #[arg(short, long)]
    subsystem: String,

    /// Comma-separated description keywords; leave out to grab all
    #[arg(short, long, default_value = "")]
    keywords: String,

    /// Directory the report is written to
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Override the configured GitLab group id
    #[arg(long)]
    group_id: Option<u64>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Do not draw the progress bar
    #[arg(long)]
    no_progress: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for run output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let config = AppConfig::load(cli.config.as_deref())?;
    tracing::info!(
        url = %config.gitlab.url,
        group_id = config.gitlab.group_id,
        "Loaded configuration"
    );

    let request = RunRequest {
        token: cli.token.or_else(|| config.gitlab.token.clone()).unwrap_or_default(),
        subsystem: cli.subsystem,
        keywords: cli.keywords,
        output_dir: cli.output_dir,
        group_id: cli.group_id.unwrap_or(config.gitlab.group_id),
    };
    tracing::debug!(request = ?request, "Run requested");

    let progress_config = config.progress.clone();
    let runner = Runner::new(config);
    let handle = match runner.start(request) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Input Error: {e}");
            std::process::exit(2);
        }
    };

    let progress = FakeProgress::start(&progress_config);
    let bar = (!cli.no_progress).then(|| spawn_bar(progress.subscribe()));

    let outcome = handle
        .wait(|line| {
            clear_bar(bar.is_some());
            println!("{line}");
        })
        .await;

    progress.finish();
    if let Some(bar) = bar {
        // The bar task exits once it has drawn the final value.
        let _ = bar.await;
        eprintln!();
    }

    println!("{}", outcome.message());
    if !outcome.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

/// Redraw the bar on stderr whenever the indicator changes.
fn spawn_bar(mut rx: tokio::sync::watch::Receiver<u8>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let value = *rx.borrow_and_update();
            draw_bar(value);
            if value >= issue_grabber::progress::COMPLETE || rx.changed().await.is_err() {
                break;
            }
        }
    })
}

fn draw_bar(value: u8) {
    let mut stderr = std::io::stderr().lock();
    let _ = write!(stderr, "\r{}", render_bar(value));
    let _ = stderr.flush();
}

fn clear_bar(enabled: bool) {
    if enabled {
        let mut stderr = std::io::stderr().lock();
        let _ = write!(stderr, "\r\x1b[2K");
        let _ = stderr.flush();
    }
}
