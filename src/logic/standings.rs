//! Ranked standings for a round-robin, a group, or a whole tournament.

use crate::models::{GameMatch, Outcome, PlayerId, StandingsRow};
use std::collections::HashMap;

/// Table points awarded per win. Losses score nothing.
pub const POINTS_PER_WIN: u32 = 3;

/// Rank `players` by the played matches among them.
///
/// Only completed, non-BYE matches whose two participants are both in
/// `players` count. Order is points descending, then point differential
/// descending; participants equal on both keep their order in `players`.
pub fn standings<'a, I>(players: &[PlayerId], matches: I) -> Vec<StandingsRow>
where
    I: IntoIterator<Item = &'a GameMatch>,
{
    let mut rows: Vec<StandingsRow> = players
        .iter()
        .map(|&player_id| StandingsRow {
            player_id,
            played: 0,
            wins: 0,
            losses: 0,
            points: 0,
            point_differential: 0,
            rank: 0,
        })
        .collect();
    let index: HashMap<PlayerId, usize> = players
        .iter()
        .enumerate()
        .map(|(i, &p)| (p, i))
        .collect();

    for m in matches.into_iter().filter(|m| m.is_played()) {
        let Some((a, b)) = m.players() else { continue };
        let (Some(&ia), Some(&ib)) = (index.get(&a), index.get(&b)) else {
            continue;
        };
        for (player, i) in [(a, ia), (b, ib)] {
            let row = &mut rows[i];
            row.played += 1;
            match m.outcome_for(player) {
                Some(Outcome::Win) => {
                    row.wins += 1;
                    row.points += POINTS_PER_WIN;
                }
                Some(Outcome::Loss) => row.losses += 1,
                None => {}
            }
            row.point_differential += m.point_differential(player);
        }
    }

    // Stable: ties on both keys keep input order.
    rows.sort_by(|x, y| {
        y.points
            .cmp(&x.points)
            .then(y.point_differential.cmp(&x.point_differential))
    });
    for (position, row) in rows.iter_mut().enumerate() {
        row.rank = position as u32 + 1;
    }
    rows
}

/// The first `count` participants of a ranked table.
pub fn top(rows: &[StandingsRow], count: usize) -> Vec<PlayerId> {
    rows.iter().take(count).map(|r| r.player_id).collect()
}
