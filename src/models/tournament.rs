//! Tournament, its configuration, state and errors.

use crate::models::game::{GameMatch, MatchFormat, MatchId, OrderKey, Stage};
use crate::models::group::Group;
use crate::models::history::{RatingHistoryPoint, StandingsRow};
use crate::models::player::{Participant, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Broad class of a [`TournamentError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Caller mistake; retrying the same request fails again.
    InvalidInput,
    /// The write would break a structural invariant and was blocked.
    ConsistencyViolation,
    NotFound,
}

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    #[error("need at least 2 participants, found {found}")]
    NotEnoughPlayers { found: usize },
    #[error("invalid state for this action")]
    InvalidState,
    #[error("participant name must not be empty")]
    EmptyPlayerName,
    #[error("a participant with this name already exists")]
    DuplicatePlayerName,
    #[error("invalid group configuration: {0}")]
    InvalidGroupConfig(String),
    #[error("invalid score: {0}")]
    InvalidScore(String),
    #[error("match {0} is already completed; reset it first")]
    MatchAlreadyCompleted(MatchId),
    #[error("match {0} is waiting for an earlier result")]
    MatchNotReady(MatchId),
    #[error("match {0} has no result to reset")]
    MatchNotCompleted(MatchId),
    #[error("match {0} is a bye and cannot be reported or reset")]
    ByeMatch(MatchId),
    #[error("match {0} depends on this result and is already completed")]
    DownstreamMatchCompleted(MatchId),
    #[error("match {match_id} cannot be completed before {not_before}")]
    CompletedTooEarly {
        match_id: MatchId,
        not_before: DateTime<Utc>,
    },
    #[error("the playoff bracket has already started")]
    PlayoffAlreadyStarted,
    #[error("participant {player_id} is not part of match {match_id}")]
    WinnerNotInMatch {
        match_id: MatchId,
        player_id: PlayerId,
    },
    #[error("match {0} is completed but has no winner")]
    MissingWinner(MatchId),
    #[error("participant {0} is not registered in this tournament")]
    UnknownParticipant(PlayerId),
    #[error("participant {0} not found")]
    PlayerNotFound(PlayerId),
    #[error("match {0} not found")]
    MatchNotFound(MatchId),
    #[error("group {0} not found")]
    GroupNotFound(usize),
    #[error("tournament {0} not found")]
    TournamentNotFound(TournamentId),
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        use TournamentError::*;
        match self {
            WinnerNotInMatch { .. } | MissingWinner(_) | UnknownParticipant(_) => {
                ErrorKind::ConsistencyViolation
            }
            PlayerNotFound(_) | MatchNotFound(_) | GroupNotFound(_) | TournamentNotFound(_) => {
                ErrorKind::NotFound
            }
            _ => ErrorKind::InvalidInput,
        }
    }
}

/// How the schedule is built.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum TournamentFormat {
    #[default]
    SingleElimination,
    RoundRobin,
    /// Round-robin groups whose top finishers feed a single-elimination playoff.
    GroupStage {
        num_groups: usize,
        advance_per_group: usize,
    },
}

/// Tournament configuration supplied at creation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub format: TournamentFormat,
    #[serde(default)]
    pub match_format: MatchFormat,
}

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    /// Registering participants; nothing scheduled.
    #[default]
    Setup,
    /// Group matches in progress.
    GroupStage,
    /// Round-robin matches in progress.
    RoundRobin,
    /// Single-elimination bracket (or group-stage playoff) in progress.
    Elimination,
    Completed,
}

/// One round of the elimination bracket, for rendering.
#[derive(Clone, Debug, Serialize)]
pub struct RoundView<'a> {
    pub round: u32,
    pub name: &'a str,
    pub matches: Vec<&'a GameMatch>,
}

/// Full tournament state: participants, match log, groups and derived data.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub config: TournamentConfig,
    pub state: TournamentState,
    pub players: Vec<Participant>,
    /// Every match ever scheduled, completed or not.
    pub matches: Vec<GameMatch>,
    /// Empty unless the format is group stage.
    pub groups: Vec<Group>,
    /// Whole-tournament standings, refreshed by every recompute.
    pub standings: Vec<StandingsRow>,
    /// Rebuilt in full by every recompute.
    pub rating_history: Vec<RatingHistoryPoint>,
    /// Next completion sequence number.
    pub next_sequence: u64,
}

impl Tournament {
    /// Create a new tournament in Setup state with no participants.
    pub fn new(name: impl Into<String>, config: TournamentConfig) -> Self {
        Self::new_at(name, config, Utc::now())
    }

    /// Like [`new`](Self::new) with an explicit creation time.
    pub fn new_at(
        name: impl Into<String>,
        config: TournamentConfig,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at,
            config,
            state: TournamentState::Setup,
            players: Vec::new(),
            matches: Vec::new(),
            groups: Vec::new(),
            standings: Vec::new(),
            rating_history: Vec::new(),
            next_sequence: 0,
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Participant> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_match(&self, id: MatchId) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub(crate) fn match_index(&self, id: MatchId) -> Result<usize, TournamentError> {
        self.matches
            .iter()
            .position(|m| m.id == id)
            .ok_or(TournamentError::MatchNotFound(id))
    }

    /// Add a participant (only valid in Setup). Names must be unique (case-insensitive).
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        rating: i32,
    ) -> Result<PlayerId, TournamentError> {
        if self.state != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(TournamentError::EmptyPlayerName);
        }
        let is_duplicate = self
            .players
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name_trimmed));
        if is_duplicate {
            return Err(TournamentError::DuplicatePlayerName);
        }
        let participant = Participant::new(name_trimmed, rating);
        let id = participant.id;
        self.players.push(participant);
        Ok(id)
    }

    /// Remove a participant by id (only valid in Setup).
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<(), TournamentError> {
        if self.state != TournamentState::Setup {
            return Err(TournamentError::InvalidState);
        }
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(TournamentError::PlayerNotFound(player_id))?;
        self.players.remove(idx);
        Ok(())
    }

    pub fn matches_in(&self, stage: Stage) -> impl Iterator<Item = &GameMatch> + Clone + '_ {
        self.matches.iter().filter(move |m| m.stage == stage)
    }

    /// Elimination matches grouped by round, in slot order.
    pub fn rounds(&self) -> Vec<RoundView<'_>> {
        let mut rounds: Vec<RoundView<'_>> = Vec::new();
        for m in self.matches_in(Stage::Elimination) {
            match rounds.iter_mut().find(|r| r.round == m.round) {
                Some(r) => r.matches.push(m),
                None => rounds.push(RoundView {
                    round: m.round,
                    name: &m.round_name,
                    matches: vec![m],
                }),
            }
        }
        rounds.sort_by_key(|r| r.round);
        for r in &mut rounds {
            r.matches.sort_by_key(|m| m.slot);
        }
        rounds
    }

    /// Winner of the elimination final, once played.
    pub fn champion(&self) -> Option<PlayerId> {
        self.matches_in(Stage::Elimination)
            .find(|m| m.next.is_none() && m.is_completed())
            .and_then(|m| m.winner)
    }

    /// Hand out the next chronological key, timestamped `at`.
    pub(crate) fn next_order(&mut self, at: DateTime<Utc>) -> OrderKey {
        let key = OrderKey {
            at,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        key
    }
}
