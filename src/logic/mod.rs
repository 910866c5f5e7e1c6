//! Tournament business logic: scheduling, standings, ratings, streaks and progression.

pub mod bracket;
pub mod groups;
mod progression;
pub mod rating;
pub mod replay;
pub mod round_robin;
mod setup;
pub mod standings;
pub mod streak;

pub use bracket::{generate_bracket, seed_by_rating};
pub use groups::{generate_group_matches, partition_groups, playoff_seeds};
pub use progression::{recommended, repair, report_result, reset_result};
pub use rating::{rate, rate_match, RatingChange};
pub use replay::{recompute, replay, Replay};
pub use round_robin::{generate_round_robin, recommended_matches, Recommendation};
pub use setup::start_tournament;
pub use standings::standings;
pub use streak::{streaks, Streaks};
