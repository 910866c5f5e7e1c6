mod common;

use common::{match_between, player_ids, tournament_with_players, win};
use ladder_tournament::logic::generate_round_robin;
use ladder_tournament::{recommended, start_tournament, Stage, TournamentFormat, TournamentState};
use std::collections::HashSet;
use uuid::Uuid;

#[test]
fn every_pair_meets_exactly_once() {
    for n in 2..=9 {
        let players: Vec<Uuid> = (0..n).map(|_| Uuid::new_v4()).collect();
        let matches = generate_round_robin(Uuid::nil(), Stage::RoundRobin, &players).unwrap();
        assert_eq!(matches.len(), n * (n - 1) / 2, "{} participants", n);

        let pairs: HashSet<(Uuid, Uuid)> = matches
            .iter()
            .map(|m| {
                let (a, b) = m.players().unwrap();
                (a.min(b), a.max(b))
            })
            .collect();
        assert_eq!(pairs.len(), matches.len());
        assert!(matches.iter().all(|m| !m.is_bye()));
    }
}

#[test]
fn round_robin_needs_two_participants() {
    assert!(generate_round_robin(Uuid::nil(), Stage::RoundRobin, &[Uuid::new_v4()]).is_err());
}

#[test]
fn started_round_robin_schedules_all_pairs() {
    let mut t = tournament_with_players(5, TournamentFormat::RoundRobin);
    start_tournament(&mut t).unwrap();
    assert_eq!(t.state, TournamentState::RoundRobin);
    assert_eq!(t.matches.len(), 10);
    assert_eq!(t.standings.len(), 5);
    assert!(t.standings.iter().all(|r| r.played == 0));
}

#[test]
fn recommendations_even_out_match_counts() {
    let mut t = tournament_with_players(5, TournamentFormat::RoundRobin);
    start_tournament(&mut t).unwrap();
    let ids = player_ids(&t);
    let (a, b, c, d, e) = (ids[0], ids[1], ids[2], ids[3], ids[4]);

    // Played: A twice, B never, C once.
    let pair = match_between(&t, a, d);
    win(&mut t, pair, a);
    let pair = match_between(&t, a, e);
    win(&mut t, pair, e);
    let pair = match_between(&t, c, d);
    win(&mut t, pair, c);

    let recs = recommended(&t, None, 10).unwrap();
    assert_eq!(recs.len(), 7);
    assert!(recs.windows(2).all(|w| w[0].priority <= w[1].priority));

    let position = |x: Uuid, y: Uuid| {
        recs.iter()
            .position(|r| {
                (r.player_a == x && r.player_b == y) || (r.player_a == y && r.player_b == x)
            })
            .unwrap()
    };
    let ab = position(a, b);
    assert!(ab > position(b, c));
    assert!(ab > position(a, c));

    // |2 - 0| * 1000 - 2
    assert_eq!(recs[ab].priority, 1998);
    // |0 - 1| * 1000 - 1
    assert_eq!(recs[position(b, c)].priority, 999);
    // |2 - 1| * 1000 - 3
    assert_eq!(recs[position(a, c)].priority, 997);
}

#[test]
fn recommendations_skip_played_pairs_and_respect_the_limit() {
    let mut t = tournament_with_players(4, TournamentFormat::RoundRobin);
    start_tournament(&mut t).unwrap();
    let ids = player_ids(&t);
    let played = match_between(&t, ids[0], ids[1]);
    win(&mut t, played, ids[1]);

    let recs = recommended(&t, None, 2).unwrap();
    assert_eq!(recs.len(), 2);
    let all = recommended(&t, None, 100).unwrap();
    assert_eq!(all.len(), 5);
    assert!(all.iter().all(|r| r.match_id != played));
    // The two who have not played yet are the best pairing.
    assert_eq!(all[0].priority, 0);
    assert!(all[0].player_a == ids[2] || all[0].player_b == ids[2]);
}

#[test]
fn round_robin_completes_after_the_last_match() {
    let mut t = tournament_with_players(3, TournamentFormat::RoundRobin);
    start_tournament(&mut t).unwrap();
    let ids = player_ids(&t);

    let pair = match_between(&t, ids[0], ids[1]);
    win(&mut t, pair, ids[0]);
    let pair = match_between(&t, ids[0], ids[2]);
    win(&mut t, pair, ids[0]);
    assert_eq!(t.state, TournamentState::RoundRobin);
    let pair = match_between(&t, ids[1], ids[2]);
    win(&mut t, pair, ids[2]);
    assert_eq!(t.state, TournamentState::Completed);
}
