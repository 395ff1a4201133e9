// Weekly incentives: catalog keys, season schedule, and winner resolution.

pub mod key;
pub mod resolver;
pub mod schedule;

use serde::{Deserialize, Serialize};

pub use key::{describe_incentive_title, IncentiveKey};
pub use resolver::{compute_incentive_winner, IncentiveResult};
pub use schedule::{generate_schedule, IncentiveSchedule};

use crate::performance::PlayerPerformance;
use crate::scoreboard::{IncentivesSummary, Matchup};

/// The incentive block shown on a weekly report.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeeklyIncentive {
    /// Wire key of this week's incentive; `None` when the schedule is empty.
    pub key: Option<String>,
    pub this_title: String,
    pub winner_text: String,
    pub next_title: String,
}

/// Resolve this week's incentive and tease next week's.
pub fn weekly_incentive(
    schedule: &IncentiveSchedule,
    week: u32,
    first_week: u32,
    matchups: &[Matchup],
    summary: &IncentivesSummary,
    performances: &[PlayerPerformance],
) -> WeeklyIncentive {
    let Some(this_key) = schedule.for_week(week, first_week) else {
        return WeeklyIncentive::default();
    };
    let result = compute_incentive_winner(this_key, matchups, summary, performances);
    let next_title = schedule
        .next_after(week, first_week)
        .map(IncentiveKey::title)
        .unwrap_or_default();

    WeeklyIncentive {
        key: Some(this_key.as_key().into_owned()),
        this_title: result.title,
        winner_text: result.winner_text,
        next_title,
    }
}
