mod common;

use chrono::Duration;
use common::{player_ids, single_set_for, tournament_with_players, win};
use ladder_tournament::{
    recommended, report_result, reset_result, start_tournament, PlayerId, Stage, Tournament,
    TournamentError, TournamentFormat, TournamentState,
};

fn two_groups_of_four() -> Tournament {
    let format = TournamentFormat::GroupStage {
        num_groups: 2,
        advance_per_group: 2,
    };
    let mut t = tournament_with_players(8, format);
    start_tournament(&mut t).unwrap();
    t
}

/// Play every group match, the better seed winning.
fn finish_groups(t: &mut Tournament) {
    let ids = player_ids(t);
    let pending: Vec<_> = t
        .matches
        .iter()
        .filter(|m| matches!(m.stage, Stage::Group(_)) && !m.is_completed())
        .map(|m| m.id)
        .collect();
    for id in pending {
        let (a, b) = t.get_match(id).and_then(|m| m.players()).unwrap();
        let seed = |p: PlayerId| ids.iter().position(|x| *x == p).unwrap();
        win(t, id, if seed(a) < seed(b) { a } else { b });
    }
}

#[test]
fn groups_are_contiguous_seed_blocks() {
    let t = two_groups_of_four();
    let ids = player_ids(&t);
    assert_eq!(t.state, TournamentState::GroupStage);
    assert_eq!(t.groups.len(), 2);
    assert_eq!(t.groups[0].name, "Group A");
    assert_eq!(t.groups[0].players, ids[..4].to_vec());
    assert_eq!(t.groups[1].players, ids[4..].to_vec());
    // Two closed round-robins of four.
    assert_eq!(t.matches.len(), 12);
    assert_eq!(t.matches_in(Stage::Group(1)).count(), 6);
    assert_eq!(t.matches_in(Stage::Elimination).count(), 0);
}

#[test]
fn invalid_group_config_is_refused_at_start() {
    let format = TournamentFormat::GroupStage {
        num_groups: 3,
        advance_per_group: 1,
    };
    let mut t = tournament_with_players(5, format);
    let err = start_tournament(&mut t).unwrap_err();
    assert!(matches!(err, TournamentError::InvalidGroupConfig(_)));
    assert_eq!(t.state, TournamentState::Setup);
    assert!(t.groups.is_empty());
    assert!(t.matches.is_empty());
}

#[test]
fn playoff_is_generated_once_every_group_is_done() {
    let mut t = two_groups_of_four();
    let ids = player_ids(&t);
    finish_groups(&mut t);

    assert_eq!(t.state, TournamentState::Elimination);
    let rounds = t.rounds();
    assert_eq!(rounds.len(), 2);
    assert_eq!(rounds[0].name, "Semifinals");
    // Winners first (A then B), then runners-up: P0, P4, P1, P5.
    assert_eq!(rounds[0].matches[0].players(), Some((ids[0], ids[5])));
    assert_eq!(rounds[0].matches[1].players(), Some((ids[4], ids[1])));

    let group_a = &t.groups[0].standings;
    assert_eq!(group_a[0].player_id, ids[0]);
    assert_eq!(group_a[0].points, 9);
    assert_eq!(group_a[0].rank, 1);
    assert_eq!(group_a[3].player_id, ids[3]);
    assert_eq!(group_a[3].points, 0);
}

#[test]
fn group_stage_stays_open_until_the_last_group_match() {
    let mut t = two_groups_of_four();
    let ids = player_ids(&t);
    let last = t
        .matches_in(Stage::Group(1))
        .last()
        .map(|m| m.id)
        .unwrap();

    // Everything but `last` played.
    let pending: Vec<_> = t
        .matches
        .iter()
        .filter(|m| m.id != last)
        .map(|m| m.id)
        .collect();
    for id in pending {
        let (a, b) = t.get_match(id).and_then(|m| m.players()).unwrap();
        let seed = |p: PlayerId| ids.iter().position(|x| *x == p).unwrap();
        win(&mut t, id, if seed(a) < seed(b) { a } else { b });
    }
    assert_eq!(t.state, TournamentState::GroupStage);
    assert_eq!(t.matches_in(Stage::Elimination).count(), 0);

    let (a, _) = t.get_match(last).and_then(|m| m.players()).unwrap();
    win(&mut t, last, a);
    assert_eq!(t.state, TournamentState::Elimination);
    assert_eq!(t.matches_in(Stage::Elimination).count(), 3);
}

#[test]
fn resetting_a_group_match_discards_an_unplayed_playoff() {
    let mut t = two_groups_of_four();
    finish_groups(&mut t);
    let group_match = t.matches_in(Stage::Group(0)).next().unwrap().id;

    reset_result(&mut t, group_match).unwrap();
    assert_eq!(t.state, TournamentState::GroupStage);
    assert_eq!(t.matches.len(), 12);
    assert!(!t.get_match(group_match).unwrap().is_completed());

    finish_groups(&mut t);
    assert_eq!(t.state, TournamentState::Elimination);
    assert_eq!(t.matches_in(Stage::Elimination).count(), 3);
}

#[test]
fn group_results_are_locked_once_the_playoff_has_started() {
    let mut t = two_groups_of_four();
    finish_groups(&mut t);
    let semi = t.rounds()[0].matches[0].id;
    let (a, _) = t.get_match(semi).and_then(|m| m.players()).unwrap();
    win(&mut t, semi, a);

    let group_match = t.matches_in(Stage::Group(1)).next().unwrap().id;
    assert_eq!(
        reset_result(&mut t, group_match),
        Err(TournamentError::PlayoffAlreadyStarted)
    );
    assert!(t.get_match(group_match).unwrap().is_completed());
}

#[test]
fn recommendations_are_per_group() {
    let t = two_groups_of_four();
    let ids = player_ids(&t);
    let recs = recommended(&t, Some(1), 10).unwrap();
    assert_eq!(recs.len(), 6);
    assert!(recs
        .iter()
        .all(|r| ids[4..].contains(&r.player_a) && ids[4..].contains(&r.player_b)));

    assert_eq!(
        recommended(&t, Some(2), 10).unwrap_err(),
        TournamentError::GroupNotFound(2)
    );
}

#[test]
fn playoff_result_cannot_predate_the_group_stage() {
    let mut t = two_groups_of_four();
    finish_groups(&mut t);
    let groups_done = t
        .matches
        .iter()
        .filter(|m| matches!(m.stage, Stage::Group(_)))
        .filter_map(|m| m.order.map(|o| o.at))
        .max()
        .unwrap();

    let semi = t.rounds()[0].matches[0].id;
    let (a, _) = t.get_match(semi).and_then(|m| m.players()).unwrap();
    let sets = single_set_for(t.get_match(semi).unwrap(), a);
    let early = groups_done - Duration::seconds(30);
    assert_eq!(
        report_result(&mut t, semi, a, sets.clone(), early),
        Err(TournamentError::CompletedTooEarly {
            match_id: semi,
            not_before: groups_done,
        })
    );

    report_result(&mut t, semi, a, sets, groups_done).unwrap();
    assert!(t.get_match(semi).unwrap().is_completed());
}
