// League data providers.
//
// The engine only sees `LeagueProvider`; the ESPN client, the TTL cache and
// the test fixtures all sit behind it.

pub mod espn;

use std::sync::Arc;

use async_trait::async_trait;
use roundup_core::draft::DraftSelection;
use roundup_core::league::{BoxScore, LeagueTeam, SeasonBounds};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use espn::EspnClient;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider rejected the league credentials (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("league is private and no ESPN credentials are configured")]
    MissingCredentials,

    #[error("provider unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from provider")]
    UnexpectedStatus { status: u16 },

    #[error("failed to decode provider payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ProviderError {
    /// Authentication failures, as opposed to transport or data problems.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            ProviderError::Unauthorized { .. } | ProviderError::MissingCredentials
        )
    }
}

// ---------------------------------------------------------------------------
// League snapshot
// ---------------------------------------------------------------------------

/// League-level data that does not change week to week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueSnapshot {
    pub name: String,
    pub teams: Vec<LeagueTeam>,
    pub bounds: SeasonBounds,
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Source of league rosters, weekly box scores and the draft.
#[async_trait]
pub trait LeagueProvider: Send + Sync {
    async fn league(&self) -> Result<LeagueSnapshot, ProviderError>;

    /// Box scores for one scoring week. An unplayed or unknown week is an
    /// empty list, not an error.
    async fn box_scores(&self, week: u32) -> Result<Vec<BoxScore>, ProviderError>;

    /// The season's draft selections in draft order. A league that has not
    /// drafted yet returns an empty list.
    async fn draft(&self) -> Result<Vec<DraftSelection>, ProviderError>;
}

#[async_trait]
impl<P: LeagueProvider + ?Sized> LeagueProvider for Arc<P> {
    async fn league(&self) -> Result<LeagueSnapshot, ProviderError> {
        (**self).league().await
    }

    async fn box_scores(&self, week: u32) -> Result<Vec<BoxScore>, ProviderError> {
        (**self).box_scores(week).await
    }

    async fn draft(&self) -> Result<Vec<DraftSelection>, ProviderError> {
        (**self).draft().await
    }
}
