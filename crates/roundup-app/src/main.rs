// Weekly roundup entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, so stdout carries report JSON)
// 2. Parse the command line
// 3. For league subcommands: load config, build the cached ESPN provider
// 4. Run the subcommand

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use roundup_app::cache::CachedProvider;
use roundup_app::config::{self, Config};
use roundup_app::export;
use roundup_app::jobs::JobStore;
use roundup_app::provider::EspnClient;
use roundup_app::report;
use roundup_core::incentives::generate_schedule;
use roundup_core::standings::standings_with_movement;
use serde::Serialize;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "roundup")]
#[command(about = "Weekly fantasy football roundup: standings, incentives, awards, draft")]
struct Cli {
    /// Directory containing `config/league.toml`.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one week's report and print it as JSON
    Report {
        #[arg(short, long)]
        week: u32,
        /// Write the JSON here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print standings (with movement) through a week
    Standings {
        #[arg(short, long)]
        week: u32,
        /// Also write the table as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Print the incentive schedule for a season length
    Schedule {
        #[arg(short, long, default_value = "14")]
        weeks: usize,
    },
    /// Print the draft board with per-team strategy and grade
    Draft {
        /// Write the JSON here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Build every week's report in the background job store
    Season {
        /// Directory for one `week-N.json` per finished week
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
        /// Seconds to wait for each week
        #[arg(long, default_value = "120")]
        timeout_secs: u64,
    },
}

#[derive(Serialize)]
struct ScheduleLine {
    week: usize,
    key: String,
    title: String,
}

type Provider = CachedProvider<EspnClient>;

/// Config and cached provider for the league-backed subcommands.
fn league_context(root: &Path) -> anyhow::Result<(Config, Arc<Provider>)> {
    let config = config::load_config_from(root).context("failed to load configuration")?;
    info!(
        league_id = config.league.league_id,
        year = config.season_year(),
        "config loaded"
    );
    let ttl = Duration::from_secs(config.report.cache_ttl_secs);
    let provider = Arc::new(CachedProvider::new(EspnClient::from_config(&config), ttl));
    Ok((config, provider))
}

fn print_schedule(weeks: usize) -> anyhow::Result<()> {
    let schedule = generate_schedule(weeks);
    let lines: Vec<ScheduleLine> = schedule
        .keys()
        .iter()
        .enumerate()
        .map(|(i, key)| ScheduleLine {
            week: i + 1,
            key: key.as_key().into_owned(),
            title: key.title(),
        })
        .collect();
    export::write_json(std::io::stdout().lock(), &lines)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Schedule { weeks } => print_schedule(weeks)?,
        Commands::Report { week, out } => {
            let (config, provider) = league_context(&cli.root)?;
            let report = report::weekly_report(provider.as_ref(), week, &config.report_options())
                .await
                .context("failed to build weekly report")?;
            match out {
                Some(path) => export::write_json_file(&path, &report)?,
                None => export::write_json(std::io::stdout().lock(), &report)?,
            }
        }
        Commands::Standings { week, csv } => {
            let (_, provider) = league_context(&cli.root)?;
            let input = report::load_week_input(provider.as_ref(), week)
                .await
                .context("failed to load league data")?;
            let standings = standings_with_movement(&input.teams, &input.weeks, input.week);
            if let Some(path) = csv {
                export::write_standings_csv_file(&path, &standings)?;
                info!(path = %path.display(), "standings CSV written");
            }
            export::write_json(std::io::stdout().lock(), &standings)?;
        }
        Commands::Draft { out } => {
            let (_, provider) = league_context(&cli.root)?;
            let board = report::draft_board(provider.as_ref())
                .await
                .context("failed to load draft")?;
            match out {
                Some(path) => export::write_json_file(&path, &board)?,
                None => export::write_json(std::io::stdout().lock(), &board)?,
            }
        }
        Commands::Season {
            out_dir,
            timeout_secs,
        } => {
            let (config, provider) = league_context(&cli.root)?;
            let jobs = JobStore::new(Duration::from_secs(config.report.job_ttl_secs));
            let reports = report::season_reports(
                provider,
                &config.report_options(),
                &jobs,
                Duration::from_secs(timeout_secs),
            )
            .await
            .context("failed to load league")?;

            if let Some(dir) = &out_dir {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create {}", dir.display()))?;
            }
            for (week, outcome) in reports {
                match (outcome, &out_dir) {
                    (Ok(report), Some(dir)) => {
                        export::write_json_file(&dir.join(format!("week-{week}.json")), &report)?;
                    }
                    (Ok(report), None) => info!(
                        week,
                        incentive = %report.incentive.this_title,
                        awards = report.awards.len(),
                        "week ready"
                    ),
                    (Err(message), _) => error!(week, error = %message, "week failed"),
                }
            }
        }
    }

    Ok(())
}

/// Initialize tracing to stderr so stdout stays machine-readable.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("roundup=info,roundup_app=info,roundup_core=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
