//! Round-robin schedule and the recommended-next-match ordering.

use crate::models::{GameMatch, MatchId, PlayerId, Slot, Stage, TournamentError, TournamentId};
use serde::Serialize;
use std::collections::HashMap;

/// Every unordered pair of `players` exactly once, as scheduled matches.
///
/// Pairs are arranged into rounds with the circle method so that nobody plays
/// twice in one round; with an odd count one participant rests each round.
pub fn generate_round_robin(
    tournament_id: TournamentId,
    stage: Stage,
    players: &[PlayerId],
) -> Result<Vec<GameMatch>, TournamentError> {
    if players.len() < 2 {
        return Err(TournamentError::NotEnoughPlayers {
            found: players.len(),
        });
    }

    // Pad to an even count; the padding index is the resting spot.
    let n = players.len() + players.len() % 2;
    let num_rounds = n - 1;
    let mut circle: Vec<usize> = (0..n).collect();
    let mut matches = Vec::with_capacity(players.len() * (players.len() - 1) / 2);

    log::debug!(
        "Creating round robin for {} entrants over {} rounds",
        players.len(),
        num_rounds
    );

    for round in 1..=num_rounds {
        let mut slot = 0;
        for i in 0..n / 2 {
            let (first, second) = (circle[i], circle[n - 1 - i]);
            let (Some(&a), Some(&b)) = (players.get(first), players.get(second)) else {
                continue;
            };
            matches.push(GameMatch::new(
                tournament_id,
                stage,
                round as u32,
                format!("Round {}", round),
                slot,
                Slot::Entrant(a),
                Slot::Entrant(b),
            ));
            slot += 1;
        }
        // Entry 0 stays pinned; everyone else moves one seat round the circle.
        circle[1..].rotate_right(1);
    }

    Ok(matches)
}

/// A scheduled pairing, ranked by how urgently it should be played next.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Recommendation {
    pub match_id: MatchId,
    pub player_a: PlayerId,
    pub player_b: PlayerId,
    /// Lower is more recommended.
    pub priority: i64,
}

/// Rank the uncompleted pairs of a round-robin (or one group) and return the top `limit`.
///
/// Priority is `|played(X) - played(Y)| * 1000 - (played(X) + played(Y))`,
/// ascending, so pairs that even out match counts come first and, among
/// those, pairs that are further along overall. Equal priorities keep
/// schedule order.
pub fn recommended_matches<'a, I>(matches: I, limit: usize) -> Vec<Recommendation>
where
    I: IntoIterator<Item = &'a GameMatch>,
    I::IntoIter: Clone,
{
    let matches = matches.into_iter();

    let mut played: HashMap<PlayerId, i64> = HashMap::new();
    for m in matches.clone().filter(|m| m.is_played()) {
        if let Some((a, b)) = m.players() {
            *played.entry(a).or_default() += 1;
            *played.entry(b).or_default() += 1;
        }
    }
    let played_by = |p: PlayerId| played.get(&p).copied().unwrap_or(0);

    let mut pending: Vec<Recommendation> = matches
        .filter(|m| !m.is_completed())
        .filter_map(|m| {
            let (a, b) = m.players()?;
            let (pa, pb) = (played_by(a), played_by(b));
            Some(Recommendation {
                match_id: m.id,
                player_a: a,
                player_b: b,
                priority: (pa - pb).abs() * 1000 - (pa + pb),
            })
        })
        .collect();

    pending.sort_by_key(|r| r.priority);
    pending.truncate(limit);
    pending
}
