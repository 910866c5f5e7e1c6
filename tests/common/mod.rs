//! Shared helpers for the integration tests.
#![allow(dead_code)]

use chrono::Duration;
use ladder_tournament::{
    report_result, GameMatch, MatchFormat, MatchId, PlayerId, SetScore, Side, Tournament,
    TournamentConfig, TournamentFormat,
};

/// `n` participants P0..P(n-1) with strictly descending ratings, so P0 is seed 1.
pub fn tournament_with_players(n: usize, format: TournamentFormat) -> Tournament {
    tournament_with_format(n, format, MatchFormat::BestOf1)
}

pub fn tournament_with_format(
    n: usize,
    format: TournamentFormat,
    match_format: MatchFormat,
) -> Tournament {
    let config = TournamentConfig {
        format,
        match_format,
    };
    let mut t = Tournament::new("Spring ladder", config);
    for i in 0..n {
        t.add_player(format!("P{i}"), 1000 + 10 * (n - i) as i32)
            .unwrap();
    }
    t
}

pub fn player_ids(t: &Tournament) -> Vec<PlayerId> {
    t.players.iter().map(|p| p.id).collect()
}

/// A best-of-1 score won by `winner`.
pub fn single_set_for(m: &GameMatch, winner: PlayerId) -> Vec<SetScore> {
    match m.side_of(winner).expect("winner plays in this match") {
        Side::A => vec![SetScore::new(11, 7)],
        Side::B => vec![SetScore::new(7, 11)],
    }
}

/// Report a best-of-1 win, one minute after the previous completion.
pub fn win(t: &mut Tournament, match_id: MatchId, winner: PlayerId) {
    let m = t.get_match(match_id).expect("match exists");
    let sets = single_set_for(m, winner);
    let at = t.created_at + Duration::minutes(t.next_sequence as i64 + 1);
    report_result(t, match_id, winner, sets, at).unwrap();
}

/// The scheduled match between `a` and `b`.
pub fn match_between(t: &Tournament, a: PlayerId, b: PlayerId) -> MatchId {
    t.matches
        .iter()
        .find(|m| m.involves(a) && m.involves(b))
        .map(|m| m.id)
        .expect("pair is scheduled")
}

/// Unplayed matches with both sides filled.
pub fn ready_matches(t: &Tournament) -> Vec<MatchId> {
    t.matches
        .iter()
        .filter(|m| !m.is_completed() && m.players().is_some())
        .map(|m| m.id)
        .collect()
}

/// Play every ready match, letting the better seed (earlier registration) win,
/// until nothing is left to play.
pub fn play_out_by_seed(t: &mut Tournament) {
    loop {
        let ready = ready_matches(t);
        if ready.is_empty() {
            break;
        }
        for id in ready {
            let (a, b) = t.get_match(id).and_then(|m| m.players()).unwrap();
            let seed = |p: PlayerId| t.players.iter().position(|x| x.id == p).unwrap();
            let winner = if seed(a) < seed(b) { a } else { b };
            win(t, id, winner);
        }
    }
}
