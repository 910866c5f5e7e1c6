//! Full recompute of derived state from the match log.
//!
//! Ratings, streaks, win/loss totals, the rating history and standings are
//! never patched in place. Every change to the log (a new result, a reset, a
//! repair request) wipes them and replays the completed matches in
//! chronological order. Replaying the same log always yields the same output.

use crate::logic::rating::rate_match;
use crate::logic::standings::standings;
use crate::logic::streak::{streaks, Streaks};
use crate::models::{
    GameMatch, Outcome, Participant, PlayerId, RatingHistoryPoint, Stage, Tournament,
    TournamentError, TournamentState,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Per-participant result of a replay.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ReplayedPlayer {
    pub rating: i32,
    pub streaks: Streaks,
    pub wins: u32,
    pub losses: u32,
}

/// Everything derived from one replay of a match log.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Replay {
    pub players: HashMap<PlayerId, ReplayedPlayer>,
    pub history: Vec<RatingHistoryPoint>,
}

/// Completed matches in replay order: by [`OrderKey`](crate::models::OrderKey), then id.
pub fn chronological<'a, I>(matches: I) -> Vec<&'a GameMatch>
where
    I: IntoIterator<Item = &'a GameMatch>,
{
    let mut completed: Vec<&GameMatch> = matches
        .into_iter()
        .filter(|m| m.is_completed())
        .collect();
    completed.sort_by_key(|m| (m.order, m.id));
    completed
}

/// Replay `matches` for `players`, starting each from their initial rating.
///
/// One seed history point is written per participant at `seeded_at`, then one
/// point per participant per played match. BYE matches change nothing.
pub fn replay<'a, I>(
    players: &[Participant],
    seeded_at: DateTime<Utc>,
    matches: I,
) -> Result<Replay, TournamentError>
where
    I: IntoIterator<Item = &'a GameMatch>,
{
    let mut ratings: HashMap<PlayerId, i32> =
        players.iter().map(|p| (p.id, p.initial_rating)).collect();
    let mut outcomes: HashMap<PlayerId, Vec<Outcome>> =
        players.iter().map(|p| (p.id, Vec::new())).collect();

    let mut history: Vec<RatingHistoryPoint> = players
        .iter()
        .map(|p| RatingHistoryPoint {
            player_id: p.id,
            rating: p.initial_rating,
            at: seeded_at,
            match_id: None,
        })
        .collect();

    let ordered = chronological(matches);
    log::debug!("Replaying {} completed matches", ordered.len());

    for m in ordered {
        if m.is_bye() {
            continue;
        }
        let winner = m.winner.ok_or(TournamentError::MissingWinner(m.id))?;
        let (a, b) = m.players().ok_or(TournamentError::MatchNotReady(m.id))?;
        let loser = match winner {
            w if w == a => b,
            w if w == b => a,
            w => {
                return Err(TournamentError::WinnerNotInMatch {
                    match_id: m.id,
                    player_id: w,
                })
            }
        };

        let winner_before = *ratings
            .get(&winner)
            .ok_or(TournamentError::UnknownParticipant(winner))?;
        let loser_before = *ratings
            .get(&loser)
            .ok_or(TournamentError::UnknownParticipant(loser))?;
        let (winner_change, loser_change) = rate_match(winner_before, loser_before);

        ratings.insert(winner, winner_change.new_rating);
        ratings.insert(loser, loser_change.new_rating);
        outcomes.entry(winner).or_default().push(Outcome::Win);
        outcomes.entry(loser).or_default().push(Outcome::Loss);

        let at = m.order.map(|o| o.at).unwrap_or(seeded_at);
        for player in [a, b] {
            history.push(RatingHistoryPoint {
                player_id: player,
                rating: ratings[&player],
                at,
                match_id: Some(m.id),
            });
        }
    }

    let players = players
        .iter()
        .map(|p| {
            let series = outcomes.get(&p.id).map(Vec::as_slice).unwrap_or_default();
            let wins = series.iter().filter(|o| **o == Outcome::Win).count() as u32;
            let replayed = ReplayedPlayer {
                rating: ratings[&p.id],
                streaks: streaks(series.iter().copied()),
                wins,
                losses: series.len() as u32 - wins,
            };
            (p.id, replayed)
        })
        .collect();

    Ok(Replay { players, history })
}

/// Wipe and rebuild every derived value of `tournament` from its match log.
///
/// This is also the repair operation: running it on an unchanged log leaves
/// the tournament byte-for-byte identical.
pub fn recompute(tournament: &mut Tournament) -> Result<(), TournamentError> {
    for p in &mut tournament.players {
        p.clear_derived();
    }
    tournament.rating_history.clear();
    tournament.standings.clear();
    for g in &mut tournament.groups {
        g.standings.clear();
    }
    if tournament.state == TournamentState::Setup {
        return Ok(());
    }

    let result = replay(&tournament.players, tournament.created_at, &tournament.matches)?;

    for p in &mut tournament.players {
        if let Some(r) = result.players.get(&p.id) {
            p.set_derived(r.rating, r.streaks.current, r.streaks.best, r.wins, r.losses);
        }
    }
    tournament.rating_history = result.history;

    let ids: Vec<PlayerId> = tournament.players.iter().map(|p| p.id).collect();
    tournament.standings = standings(&ids, &tournament.matches);
    for g in &mut tournament.groups {
        let stage = Stage::Group(g.index);
        g.standings = standings(&g.players, tournament.matches.iter().filter(|m| m.stage == stage));
    }

    log::debug!(
        "Recomputed tournament {}: {} rating points",
        tournament.id,
        tournament.rating_history.len()
    );
    Ok(())
}
