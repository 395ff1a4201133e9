// Season-long incentive rotation without repeats.

use serde::Serialize;

use super::key::{catalog, catalog_len, IncentiveKey};

/// Secondary keys appended, in order, when the season outlasts the catalog.
/// Keys already in the schedule are skipped.
const EXTENSIONS: &[IncentiveKey] = &[
    IncentiveKey::HighestScoringQbStarter,
    IncentiveKey::HighestScoringRbStarter,
    IncentiveKey::HighestScoringWrStarter,
    IncentiveKey::HighestScoringTeStarter,
    IncentiveKey::HighestScoringKStarter,
    IncentiveKey::HighestScoringPlayerBench,
    IncentiveKey::Most20PlusPointStarters,
    IncentiveKey::Most15PlusPointStarters,
    IncentiveKey::Most10PlusPointBenchPlayers,
    IncentiveKey::HighestTeamBenchPoints,
    IncentiveKey::HighestStartingLineupPoints,
];

/// One incentive key per regular-season week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncentiveSchedule {
    keys: Vec<IncentiveKey>,
}

impl IncentiveSchedule {
    /// Build the schedule for a season of `regular_season_weeks` weeks.
    ///
    /// Pure and deterministic. Seasons no longer than the catalog take its
    /// first entries in order; longer seasons append the extension list and
    /// then `custom_incentive_week_K` placeholders.
    pub fn generate(regular_season_weeks: usize) -> Self {
        let mut keys: Vec<IncentiveKey> = catalog().take(regular_season_weeks).collect();
        if regular_season_weeks <= catalog_len() {
            return IncentiveSchedule { keys };
        }

        for ext in EXTENSIONS {
            if keys.len() >= regular_season_weeks {
                break;
            }
            if !keys.contains(ext) {
                keys.push(ext.clone());
            }
        }
        while keys.len() < regular_season_weeks {
            keys.push(IncentiveKey::Placeholder(keys.len() + 1));
        }

        IncentiveSchedule { keys }
    }

    pub fn keys(&self) -> &[IncentiveKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Schedule index for `week`, clamped into the schedule.
    pub fn index_for_week(&self, week: u32, first_week: u32) -> Option<usize> {
        if self.keys.is_empty() {
            return None;
        }
        let offset = week.saturating_sub(first_week) as usize;
        Some(offset.min(self.keys.len() - 1))
    }

    /// The incentive running in `week`.
    pub fn for_week(&self, week: u32, first_week: u32) -> Option<&IncentiveKey> {
        self.index_for_week(week, first_week).map(|i| &self.keys[i])
    }

    /// The incentive announced as "next week" during `week`.
    ///
    /// From the last scheduled week onward (playoffs included) this wraps to
    /// the first entry. `None` only for an empty schedule.
    pub fn next_after(&self, week: u32, first_week: u32) -> Option<&IncentiveKey> {
        let index = self.index_for_week(week, first_week)?;
        self.keys.get(index + 1).or_else(|| self.keys.first())
    }
}

/// Convenience wrapper around [`IncentiveSchedule::generate`].
pub fn generate_schedule(regular_season_weeks: usize) -> IncentiveSchedule {
    IncentiveSchedule::generate(regular_season_weeks)
}
