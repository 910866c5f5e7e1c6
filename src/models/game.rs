//! Match, slots, set scores and the chronological ordering key.

use crate::models::player::PlayerId;
use crate::models::tournament::{TournamentError, TournamentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One side of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    A,
    B,
}

/// Win or loss from one participant's point of view. There are no draws.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
}

/// Occupant of one side of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "player_id")]
pub enum Slot {
    Entrant(PlayerId),
    /// No opponent; the other side advances without playing.
    Bye,
    /// Filled later by winner propagation.
    Tbd,
}

impl Slot {
    pub fn player(self) -> Option<PlayerId> {
        match self {
            Slot::Entrant(id) => Some(id),
            _ => None,
        }
    }
}

/// Number of sets a match is played over.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFormat {
    #[default]
    BestOf1,
    BestOf3,
    BestOf5,
}

impl MatchFormat {
    pub fn best_of(self) -> u32 {
        match self {
            MatchFormat::BestOf1 => 1,
            MatchFormat::BestOf3 => 3,
            MatchFormat::BestOf5 => 5,
        }
    }

    /// Sets needed to win the match.
    pub fn sets_to_win(self) -> u32 {
        self.best_of() / 2 + 1
    }

    /// Check a reported set sequence and return the side that won it.
    ///
    /// The winner must be the first side to reach the majority of sets and
    /// nothing may be played after that point. Tied sets are rejected.
    pub fn decide(self, sets: &[SetScore]) -> Result<Side, TournamentError> {
        let needed = self.sets_to_win();
        let (mut won_a, mut won_b) = (0u32, 0u32);

        for (index, set) in sets.iter().enumerate() {
            if won_a == needed || won_b == needed {
                return Err(TournamentError::InvalidScore(format!(
                    "set {} was played after the match was decided",
                    index + 1
                )));
            }
            match set.winner() {
                Some(Side::A) => won_a += 1,
                Some(Side::B) => won_b += 1,
                None => {
                    return Err(TournamentError::InvalidScore(format!(
                        "set {} is tied {}-{}",
                        index + 1,
                        set.a,
                        set.b
                    )))
                }
            }
        }

        if won_a == needed {
            Ok(Side::A)
        } else if won_b == needed {
            Ok(Side::B)
        } else {
            Err(TournamentError::InvalidScore(format!(
                "no side reached {} sets in a best of {}",
                needed,
                self.best_of()
            )))
        }
    }
}

/// Points scored by side A and side B in one set.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    pub a: u32,
    pub b: u32,
}

impl SetScore {
    pub fn new(a: u32, b: u32) -> Self {
        Self { a, b }
    }

    pub fn winner(&self) -> Option<Side> {
        match self.a.cmp(&self.b) {
            std::cmp::Ordering::Greater => Some(Side::A),
            std::cmp::Ordering::Less => Some(Side::B),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Points of `side` minus points of the other side.
    pub fn differential(&self, side: Side) -> i64 {
        let (own, other) = match side {
            Side::A => (self.a, self.b),
            Side::B => (self.b, self.a),
        };
        i64::from(own) - i64::from(other)
    }
}

/// Chronological position of a completed match.
///
/// Ordered by timestamp, then by the tournament's completion sequence number.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct OrderKey {
    pub at: DateTime<Utc>,
    pub sequence: u64,
}

/// Whether a match has been played.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Completed,
}

/// Phase of the tournament this match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "group")]
pub enum Stage {
    Elimination,
    RoundRobin,
    Group(usize),
}

/// Where the winner of an elimination match goes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Advance {
    pub match_id: MatchId,
    pub side: Side,
}

/// A single match between two sides.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub stage: Stage,
    /// 1-based round number within the stage.
    pub round: u32,
    pub round_name: String,
    /// 0-based position within the round.
    pub slot: u32,
    pub side_a: Slot,
    pub side_b: Slot,
    pub status: MatchStatus,
    /// None until completed.
    pub winner: Option<PlayerId>,
    pub sets: Vec<SetScore>,
    /// Assigned when the match is completed.
    pub order: Option<OrderKey>,
    /// Fixed at generation for elimination matches; None for the final.
    pub next: Option<Advance>,
}

impl GameMatch {
    pub fn new(
        tournament_id: TournamentId,
        stage: Stage,
        round: u32,
        round_name: impl Into<String>,
        slot: u32,
        side_a: Slot,
        side_b: Slot,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            stage,
            round,
            round_name: round_name.into(),
            slot,
            side_a,
            side_b,
            status: MatchStatus::Scheduled,
            winner: None,
            sets: Vec::new(),
            order: None,
            next: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    pub fn is_bye(&self) -> bool {
        self.side_a == Slot::Bye || self.side_b == Slot::Bye
    }

    pub fn slot(&self, side: Side) -> Slot {
        match side {
            Side::A => self.side_a,
            Side::B => self.side_b,
        }
    }

    pub fn slot_mut(&mut self, side: Side) -> &mut Slot {
        match side {
            Side::A => &mut self.side_a,
            Side::B => &mut self.side_b,
        }
    }

    /// Both participants, if both sides are filled.
    pub fn players(&self) -> Option<(PlayerId, PlayerId)> {
        Some((self.side_a.player()?, self.side_b.player()?))
    }

    pub fn side_of(&self, player: PlayerId) -> Option<Side> {
        if self.side_a == Slot::Entrant(player) {
            Some(Side::A)
        } else if self.side_b == Slot::Entrant(player) {
            Some(Side::B)
        } else {
            None
        }
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.side_of(player).is_some()
    }

    /// True for a completed match that both participants actually played.
    pub fn is_played(&self) -> bool {
        self.is_completed() && !self.is_bye()
    }

    /// Outcome for `player` in a played match; None otherwise.
    pub fn outcome_for(&self, player: PlayerId) -> Option<Outcome> {
        if !self.is_played() || !self.involves(player) {
            return None;
        }
        match self.winner {
            Some(w) if w == player => Some(Outcome::Win),
            Some(_) => Some(Outcome::Loss),
            None => None,
        }
    }

    /// Sum over every set of points scored by `player` minus points conceded.
    pub fn point_differential(&self, player: PlayerId) -> i64 {
        match self.side_of(player) {
            Some(side) => self.sets.iter().map(|s| s.differential(side)).sum(),
            None => 0,
        }
    }

    /// Complete a match that has a BYE on one side, awarding it to the other side.
    pub(crate) fn complete_bye(&mut self, order: OrderKey) {
        self.winner = self.side_a.player().or(self.side_b.player());
        self.status = MatchStatus::Completed;
        self.sets.clear();
        self.order = Some(order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets(scores: &[(u32, u32)]) -> Vec<SetScore> {
        scores.iter().map(|&(a, b)| SetScore::new(a, b)).collect()
    }

    #[test]
    fn best_of_three_needs_two_sets() {
        let format = MatchFormat::BestOf3;
        assert_eq!(format.decide(&sets(&[(11, 5), (6, 11), (11, 7)])), Ok(Side::A));
        assert_eq!(format.decide(&sets(&[(3, 11), (9, 11)])), Ok(Side::B));
        assert!(format.decide(&sets(&[(11, 5)])).is_err());
    }

    #[test]
    fn sets_after_decision_are_rejected() {
        let format = MatchFormat::BestOf3;
        assert!(format.decide(&sets(&[(11, 5), (11, 7), (5, 11)])).is_err());
    }

    #[test]
    fn best_of_five_needs_three_sets() {
        let format = MatchFormat::BestOf5;
        let five_setter = sets(&[(11, 9), (8, 11), (11, 6), (5, 11), (11, 3)]);
        assert_eq!(format.decide(&five_setter), Ok(Side::A));
        assert_eq!(format.decide(&sets(&[(4, 11), (6, 11), (9, 11)])), Ok(Side::B));
        assert!(format.decide(&sets(&[(11, 4), (11, 6)])).is_err());
        assert!(matches!(
            format.decide(&sets(&[(11, 4), (11, 6), (11, 9), (3, 11)])),
            Err(TournamentError::InvalidScore(_))
        ));
    }

    #[test]
    fn tied_set_is_rejected() {
        assert!(MatchFormat::BestOf1.decide(&sets(&[(10, 10)])).is_err());
        assert!(MatchFormat::BestOf1.decide(&[]).is_err());
    }

    #[test]
    fn order_key_sorts_by_time_then_sequence() {
        let at = Utc::now();
        let first = OrderKey { at, sequence: 1 };
        let second = OrderKey { at, sequence: 2 };
        let later = OrderKey {
            at: at + chrono::Duration::seconds(1),
            sequence: 0,
        };
        assert!(first < second);
        assert!(second < later);
    }
}
