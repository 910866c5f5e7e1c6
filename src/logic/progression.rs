//! Result reporting, resets and repair.
//!
//! Every operation here works on a draft copy of the tournament and only
//! replaces the caller's value once the whole update (winner, propagation,
//! stage transition and the full recompute) has succeeded.

use crate::logic::bracket::{generate_bracket, propagate_winner, retract_winner};
use crate::logic::groups::{group_stage_complete, playoff_seeds};
use crate::logic::replay::recompute;
use crate::logic::round_robin::{recommended_matches, Recommendation};
use crate::models::{
    GameMatch, MatchId, MatchStatus, PlayerId, SetScore, Stage, Tournament, TournamentError,
    TournamentState,
};
use chrono::{DateTime, Utc};

/// Run `f` against a copy of `tournament` and keep the copy only on success.
pub(crate) fn commit<F>(tournament: &mut Tournament, f: F) -> Result<(), TournamentError>
where
    F: FnOnce(&mut Tournament) -> Result<(), TournamentError>,
{
    let mut draft = tournament.clone();
    f(&mut draft)?;
    *tournament = draft;
    Ok(())
}

fn in_play(state: TournamentState) -> bool {
    matches!(
        state,
        TournamentState::GroupStage | TournamentState::RoundRobin | TournamentState::Elimination
    )
}

/// Record the result of a match completed at `at`.
///
/// `winner` must be one of the two participants and `sets` must be a valid
/// score in the tournament's match format won by that participant. `at` may
/// not precede the tournament's creation or any result this match depends
/// on. The match is keyed after every earlier completion, its winner moves on in the
/// bracket, a finished group stage generates the playoff bracket, and all
/// derived state is recomputed.
pub fn report_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner: PlayerId,
    sets: Vec<SetScore>,
    at: DateTime<Utc>,
) -> Result<(), TournamentError> {
    if !in_play(tournament.state) {
        return Err(TournamentError::InvalidState);
    }

    commit(tournament, |t| {
        let index = t.match_index(match_id)?;
        let m = &t.matches[index];
        if m.is_bye() {
            return Err(TournamentError::ByeMatch(match_id));
        }
        if m.is_completed() {
            return Err(TournamentError::MatchAlreadyCompleted(match_id));
        }
        if m.players().is_none() {
            return Err(TournamentError::MatchNotReady(match_id));
        }
        let side = m.side_of(winner).ok_or(TournamentError::WinnerNotInMatch {
            match_id,
            player_id: winner,
        })?;
        if t.config.match_format.decide(&sets)? != side {
            return Err(TournamentError::InvalidScore(
                "the reported sets were won by the other side".to_owned(),
            ));
        }
        let stage = m.stage;

        let not_before = earliest_completion(t, match_id, stage);
        if at < not_before {
            return Err(TournamentError::CompletedTooEarly {
                match_id,
                not_before,
            });
        }

        let order = t.next_order(at);
        let m = &mut t.matches[index];
        m.status = MatchStatus::Completed;
        m.winner = Some(winner);
        m.sets = sets;
        m.order = Some(order);

        if stage == Stage::Elimination {
            propagate_winner(&mut t.matches, index)?;
        }
        advance_stage(t, at)?;
        recompute(t)
    })
}

/// Earliest completion time a result for `match_id` may carry.
///
/// Nothing completes before the tournament was created. An elimination match
/// also cannot complete before the matches feeding it, nor before the group
/// stage that produced the playoff.
fn earliest_completion(t: &Tournament, match_id: MatchId, stage: Stage) -> DateTime<Utc> {
    let completed_at = |m: &GameMatch| m.order.map(|o| o.at);
    let mut earliest = t.created_at;
    if stage == Stage::Elimination {
        let feeders = t
            .matches_in(Stage::Elimination)
            .filter(|m| m.next.is_some_and(|n| n.match_id == match_id));
        let groups = t
            .matches
            .iter()
            .filter(|m| matches!(m.stage, Stage::Group(_)));
        if let Some(latest) = feeders.chain(groups).filter_map(completed_at).max() {
            earliest = earliest.max(latest);
        }
    }
    earliest
}

/// Move the tournament on once its current stage is finished.
fn advance_stage(t: &mut Tournament, at: DateTime<Utc>) -> Result<(), TournamentError> {
    match t.state {
        TournamentState::GroupStage if group_stage_complete(&t.matches) => {
            let seeds = playoff_seeds(&t.groups, &t.matches);
            let id = t.id;
            let playoff = generate_bracket(id, &seeds, || t.next_order(at))?;
            log::info!(
                "Group stage of {} complete, {} qualifiers enter the playoff",
                t.id,
                seeds.len()
            );
            t.matches.extend(playoff);
            t.state = TournamentState::Elimination;
        }
        TournamentState::RoundRobin if t.matches.iter().all(|m| m.is_completed()) => {
            log::info!("Round robin of {} complete", t.id);
            t.state = TournamentState::Completed;
        }
        TournamentState::Elimination => {
            if let Some(champion) = t.champion() {
                log::info!("Tournament {} won by {}", t.id, champion);
                t.state = TournamentState::Completed;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Revert a completed match to scheduled and recompute everything derived from it.
///
/// An elimination result can only be reset while the match its winner moved
/// into is still unplayed. Resetting a group match discards an auto-generated
/// playoff bracket as long as none of its matches has been played.
pub fn reset_result(tournament: &mut Tournament, match_id: MatchId) -> Result<(), TournamentError> {
    if tournament.state == TournamentState::Setup {
        return Err(TournamentError::InvalidState);
    }

    commit(tournament, |t| {
        let index = t.match_index(match_id)?;
        let m = &t.matches[index];
        if m.is_bye() {
            return Err(TournamentError::ByeMatch(match_id));
        }
        if !m.is_completed() {
            return Err(TournamentError::MatchNotCompleted(match_id));
        }
        let stage = m.stage;

        match stage {
            Stage::Elimination => {
                retract_winner(&mut t.matches, index)?;
                t.state = TournamentState::Elimination;
            }
            Stage::Group(_) => {
                if t.matches_in(Stage::Elimination).any(|m| m.is_played()) {
                    return Err(TournamentError::PlayoffAlreadyStarted);
                }
                t.matches.retain(|m| m.stage != Stage::Elimination);
                t.state = TournamentState::GroupStage;
            }
            Stage::RoundRobin => t.state = TournamentState::RoundRobin,
        }

        // `retain` above may have shifted positions.
        let index = t.match_index(match_id)?;
        let m = &mut t.matches[index];
        m.status = MatchStatus::Scheduled;
        m.winner = None;
        m.sets.clear();
        m.order = None;

        log::info!("Reset result of match {} in {}", match_id, t.id);
        recompute(t)
    })
}

/// Repair: rebuild all derived state from the match log.
pub fn repair(tournament: &mut Tournament) -> Result<(), TournamentError> {
    commit(tournament, recompute)
}

/// Recommended next matches of the round-robin stage, or of group `group`.
pub fn recommended(
    tournament: &Tournament,
    group: Option<usize>,
    limit: usize,
) -> Result<Vec<Recommendation>, TournamentError> {
    let stage = match group {
        Some(index) if index < tournament.groups.len() => Stage::Group(index),
        Some(index) => return Err(TournamentError::GroupNotFound(index)),
        None => Stage::RoundRobin,
    };
    Ok(recommended_matches(tournament.matches_in(stage), limit))
}
