//! Participant data structure.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a participant (used in matches and lookups).
pub type PlayerId = Uuid;

/// Rating given to a participant registered without one.
pub const DEFAULT_RATING: i32 = 1000;

/// Lowest rating a participant can ever hold.
pub const RATING_FLOOR: i32 = 800;

/// A registered participant.
///
/// `rating`, the streak counters and the win/loss totals are a cached
/// projection of the match log. They are only written by
/// [`recompute`](crate::logic::recompute); read them through the accessors.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: PlayerId,
    pub name: String,
    /// Rating supplied by the registry when the participant was entered.
    pub initial_rating: i32,
    rating: i32,
    current_streak: u32,
    best_streak: u32,
    wins: u32,
    losses: u32,
}

impl Participant {
    /// Create a participant with the given name and starting rating (clamped to the floor).
    pub fn new(name: impl Into<String>, rating: i32) -> Self {
        let rating = rating.max(RATING_FLOOR);
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            initial_rating: rating,
            rating,
            current_streak: 0,
            best_streak: 0,
            wins: 0,
            losses: 0,
        }
    }

    pub fn rating(&self) -> i32 {
        self.rating
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    /// Drop every derived value back to the registration snapshot.
    pub(crate) fn clear_derived(&mut self) {
        self.rating = self.initial_rating;
        self.current_streak = 0;
        self.best_streak = 0;
        self.wins = 0;
        self.losses = 0;
    }

    pub(crate) fn set_derived(
        &mut self,
        rating: i32,
        current_streak: u32,
        best_streak: u32,
        wins: u32,
        losses: u32,
    ) {
        self.rating = rating;
        self.current_streak = current_streak;
        self.best_streak = best_streak;
        self.wins = wins;
        self.losses = losses;
    }
}
