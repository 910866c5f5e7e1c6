//! Ladder tournament engine: library with models, business logic and a
//! per-tournament store.

pub mod csv_io;
pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    recommended, recompute, repair, report_result, reset_result, start_tournament, Recommendation,
};
pub use models::{
    ErrorKind, GameMatch, Group, MatchFormat, MatchId, MatchStatus, Participant, PlayerId,
    RatingHistoryPoint, SetScore, Side, Slot, Stage, StandingsRow, Tournament, TournamentConfig,
    TournamentError, TournamentFormat, TournamentId, TournamentState,
};
pub use store::TournamentStore;
