// Loading provider data for a week and building its report.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::try_join_all;
use roundup_core::draft::{build_draft_board, DraftBoard};
use roundup_core::league::BoxScore;
use roundup_core::report::{build_weekly_report, ReportOptions, WeekInput, WeeklyReport};
use tracing::{debug, info, warn};

use crate::jobs::{JobOutcome, JobStore};
use crate::provider::{LeagueProvider, ProviderError};

const JOB_POLL: Duration = Duration::from_millis(50);

/// Fetch everything needed for `week`'s report.
///
/// The requested week is clamped into the season. Every week from the
/// first scoring week through the report week is fetched concurrently, since
/// standings are refolded from week 1 each time.
pub async fn load_week_input<P>(provider: &P, week: u32) -> Result<WeekInput, ProviderError>
where
    P: LeagueProvider + ?Sized,
{
    let league = provider.league().await?;
    let week = league.bounds.clamp_week(week);

    let weeks: Vec<Vec<BoxScore>> =
        try_join_all((1..=week).map(|w| fetch_week(provider, w, league.bounds.first_week)))
            .await?;
    debug!(week, weeks = weeks.len(), "loaded box scores");

    Ok(WeekInput {
        league_name: league.name,
        week,
        bounds: league.bounds,
        teams: league.teams,
        weeks,
    })
}

/// Weeks before the season's first scoring week have no games.
async fn fetch_week<P>(provider: &P, week: u32, first_week: u32) -> Result<Vec<BoxScore>, ProviderError>
where
    P: LeagueProvider + ?Sized,
{
    if week < first_week {
        return Ok(Vec::new());
    }
    provider.box_scores(week).await
}

/// Load and build the report for `week`.
pub async fn weekly_report<P>(
    provider: &P,
    week: u32,
    options: &ReportOptions,
) -> Result<WeeklyReport, ProviderError>
where
    P: LeagueProvider + ?Sized,
{
    let input = load_week_input(provider, week).await?;
    let report = build_weekly_report(&input, options);
    info!(
        league = %report.league_name,
        week = report.nav.week,
        "report ready"
    );
    Ok(report)
}

/// Load the draft and join it with the league's teams.
pub async fn draft_board<P>(provider: &P) -> Result<DraftBoard, ProviderError>
where
    P: LeagueProvider + ?Sized,
{
    let (league, selections) = futures_util::try_join!(provider.league(), provider.draft())?;
    let board = build_draft_board(&selections, &league.teams);
    info!(
        league = %league.name,
        picks = board.total_picks,
        rounds = board.rounds,
        "draft board ready"
    );
    Ok(board)
}

/// Job key for one week's report.
pub fn report_job_key(league_name: &str, week: u32) -> String {
    format!("report:{league_name}:{week}")
}

/// Build every week's report through the job store.
///
/// Weeks already finished in `jobs` are reused; the rest are spawned and
/// awaited. Weeks still unfinished after `timeout` are left out.
pub async fn season_reports<P>(
    provider: Arc<P>,
    options: &ReportOptions,
    jobs: &Arc<JobStore<WeeklyReport>>,
    timeout: Duration,
) -> Result<Vec<(u32, JobOutcome<WeeklyReport>)>, ProviderError>
where
    P: LeagueProvider + 'static,
{
    let league = provider.league().await?;
    let weeks = league.bounds.first_week..=league.bounds.last_week;

    let mut keys = Vec::new();
    for week in weeks {
        let key = report_job_key(&league.name, week);
        let provider = Arc::clone(&provider);
        let options = options.clone();
        jobs.ensure_job(&key, move || async move {
            weekly_report(provider.as_ref(), week, &options).await
        });
        keys.push((week, key));
    }

    let mut reports = Vec::with_capacity(keys.len());
    for (week, key) in keys {
        match jobs.wait(&key, JOB_POLL, timeout).await {
            Some(outcome) => reports.push((week, outcome)),
            None => warn!(week, "report job did not finish in time"),
        }
    }
    Ok(reports)
}
