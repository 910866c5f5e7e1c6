//! Rating history and standings rows produced by the recompute.

use crate::models::game::MatchId;
use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One point of a participant's rating series. Never edited after creation;
/// the whole series is rebuilt by a recompute.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RatingHistoryPoint {
    pub player_id: PlayerId,
    pub rating: i32,
    pub at: DateTime<Utc>,
    /// None for the seed point written at tournament start.
    pub match_id: Option<MatchId>,
}

/// One participant's aggregate record within a round-robin, group or tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub player_id: PlayerId,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub points: u32,
    /// Points scored minus points conceded across all sets.
    pub point_differential: i64,
    /// 1-based position in the ranked table.
    pub rank: u32,
}
