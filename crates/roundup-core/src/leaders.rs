// Best and worst starters per position.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::performance::PlayerPerformance;
use crate::position::Position;

/// Leaders for one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionLeaders {
    /// Display code, e.g. `QB` or `D/ST`.
    pub position: String,
    /// Highest scorers first.
    pub best: Vec<PlayerPerformance>,
    /// Lowest scorers first.
    pub busts: Vec<PlayerPerformance>,
}

/// Top `top_n` and bottom `bottom_n` starters for each position, in the order
/// the positions are given.
///
/// Position codes go through [`Position::from_code`], so every defense alias
/// lands in the defense row. Sorts are stable: equal scores keep performance
/// order. A position with no starters still gets a row with empty lists.
pub fn compute_position_leaders(
    performances: &[PlayerPerformance],
    positions: &[Position],
    top_n: usize,
    bottom_n: usize,
) -> Vec<PositionLeaders> {
    positions
        .iter()
        .map(|pos| {
            let mut pool: Vec<&PlayerPerformance> = performances
                .iter()
                .filter(|p| p.is_starter() && pos.matches_code(&p.position))
                .collect();

            pool.sort_by(|a, b| b.points.total_cmp(&a.points));
            let best = pool.iter().take(top_n).map(|p| (*p).clone()).collect();

            pool.sort_by(|a, b| a.points.total_cmp(&b.points));
            let busts = pool.iter().take(bottom_n).map(|p| (*p).clone()).collect();

            debug!(position = %pos, pool = pool.len(), "position pool");
            PositionLeaders {
                position: pos.code().to_string(),
                best,
                busts,
            }
        })
        .collect()
}
