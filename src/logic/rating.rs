//! Elo-style rating updates.

use crate::models::{Outcome, RATING_FLOOR};
use serde::{Deserialize, Serialize};

/// K-factor for rating updates.
pub const K_FACTOR: f64 = 32.0;

/// Result of applying one match to one participant's rating.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub change: i32,
    pub new_rating: i32,
}

/// Expected score of a participant rated `rating` against `opponent_rating`.
pub fn expected_score(rating: i32, opponent_rating: i32) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf(f64::from(opponent_rating - rating) / 400.0))
}

/// Rating update for one participant after one match.
///
/// Both participants of a match must be updated from their ratings as of
/// immediately before that match.
pub fn rate(rating: i32, opponent_rating: i32, outcome: Outcome) -> RatingChange {
    let actual = match outcome {
        Outcome::Win => 1.0,
        Outcome::Loss => 0.0,
    };
    let change = (K_FACTOR * (actual - expected_score(rating, opponent_rating))).round() as i32;
    RatingChange {
        change,
        new_rating: (rating + change).max(RATING_FLOOR),
    }
}

/// Updates for (winner, loser) of one match, both computed from pre-match ratings.
pub fn rate_match(winner_rating: i32, loser_rating: i32) -> (RatingChange, RatingChange) {
    (
        rate(winner_rating, loser_rating, Outcome::Win),
        rate(loser_rating, winner_rating, Outcome::Loss),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_ratings_expect_half() {
        assert!((expected_score(1000, 1000) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn equal_ratings_change_symmetrically() {
        let (winner, loser) = rate_match(1000, 1000);
        assert_eq!(winner.change, 16);
        assert_eq!(loser.change, -16);
        assert_eq!(winner.new_rating, 1016);
        assert_eq!(loser.new_rating, 984);
    }

    #[test]
    fn underdog_win_gains_more() {
        let upset = rate(1000, 1400, Outcome::Win);
        let expected = rate(1400, 1000, Outcome::Win);
        assert!(upset.change > expected.change);
        assert_eq!(upset.change, 29);
        assert_eq!(expected.change, 3);
    }

    #[test]
    fn rating_never_drops_below_floor() {
        let result = rate(805, 805, Outcome::Loss);
        assert_eq!(result.change, -16);
        assert_eq!(result.new_rating, RATING_FLOOR);
    }

    #[test]
    fn floor_holds_for_floor_rated_loser() {
        let result = rate(RATING_FLOOR, 900, Outcome::Loss);
        assert!(result.change < 0);
        assert_eq!(result.new_rating, RATING_FLOOR);
    }
}
