//! Win streak counters.

use crate::models::Outcome;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Streaks {
    /// Consecutive wins counted back from the most recent match.
    pub current: u32,
    /// Longest run of consecutive wins anywhere in the history.
    pub best: u32,
}

/// Compute both counters from a chronological outcome sequence, most recent last.
pub fn streaks<I>(outcomes: I) -> Streaks
where
    I: IntoIterator<Item = Outcome>,
{
    let mut run = 0;
    let mut best = 0;
    for outcome in outcomes {
        match outcome {
            Outcome::Win => {
                run += 1;
                best = best.max(run);
            }
            Outcome::Loss => run = 0,
        }
    }
    Streaks { current: run, best }
}
