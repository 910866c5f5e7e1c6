//! Data structures for the ladder: participants, matches, groups, tournament state.

mod game;
mod group;
mod history;
mod player;
mod tournament;

pub use game::{
    Advance, GameMatch, MatchFormat, MatchId, MatchStatus, OrderKey, Outcome, SetScore, Side, Slot,
    Stage,
};
pub use group::Group;
pub use history::{RatingHistoryPoint, StandingsRow};
pub use player::{Participant, PlayerId, DEFAULT_RATING, RATING_FLOOR};
pub use tournament::{
    ErrorKind, RoundView, Tournament, TournamentConfig, TournamentError, TournamentFormat,
    TournamentId, TournamentState,
};
