//! Group stage: partitioning, per-group schedules and playoff qualification.

use crate::logic::round_robin::generate_round_robin;
use crate::logic::standings::{standings, top};
use crate::models::{GameMatch, Group, PlayerId, Stage, TournamentError, TournamentId};

/// Split `seeds` into `num_groups` contiguous seed blocks of `ceil(N / num_groups)`.
///
/// Seeds 1..k form group A, the next k group B, and so on; the last group may
/// be smaller. Every group needs at least two members and `advance_per_group`
/// must fit in the smallest group.
pub fn partition_groups(
    seeds: &[PlayerId],
    num_groups: usize,
    advance_per_group: usize,
) -> Result<Vec<Group>, TournamentError> {
    if seeds.len() < 2 {
        return Err(TournamentError::NotEnoughPlayers { found: seeds.len() });
    }
    if num_groups == 0 {
        return Err(TournamentError::InvalidGroupConfig(
            "at least one group is required".to_owned(),
        ));
    }
    if advance_per_group == 0 {
        return Err(TournamentError::InvalidGroupConfig(
            "at least one participant per group must advance".to_owned(),
        ));
    }

    let group_size = seeds.len().div_ceil(num_groups);
    let groups: Vec<Group> = seeds
        .chunks(group_size)
        .enumerate()
        .map(|(index, chunk)| Group::new(index, chunk.to_vec(), advance_per_group))
        .collect();

    if groups.len() != num_groups {
        return Err(TournamentError::InvalidGroupConfig(format!(
            "{} participants cannot fill {} groups of {}",
            seeds.len(),
            num_groups,
            group_size
        )));
    }
    let smallest = groups.iter().map(|g| g.players.len()).min().unwrap_or(0);
    if smallest < 2 {
        return Err(TournamentError::InvalidGroupConfig(
            "every group needs at least 2 participants".to_owned(),
        ));
    }
    if advance_per_group > smallest {
        return Err(TournamentError::InvalidGroupConfig(format!(
            "cannot advance {} from a group of {}",
            advance_per_group, smallest
        )));
    }
    if advance_per_group * num_groups < 2 {
        return Err(TournamentError::InvalidGroupConfig(
            "the playoff needs at least 2 participants".to_owned(),
        ));
    }

    log::debug!(
        "Partitioned {} participants into {} groups of up to {}",
        seeds.len(),
        num_groups,
        group_size
    );
    Ok(groups)
}

/// The closed round-robin of every group, one after another.
pub fn generate_group_matches(
    tournament_id: TournamentId,
    groups: &[Group],
) -> Result<Vec<GameMatch>, TournamentError> {
    let mut matches = Vec::new();
    for group in groups {
        matches.extend(generate_round_robin(
            tournament_id,
            Stage::Group(group.index),
            &group.players,
        )?);
    }
    Ok(matches)
}

/// True once every match of every group has been completed.
pub fn group_stage_complete(matches: &[GameMatch]) -> bool {
    let mut group_matches = matches
        .iter()
        .filter(|m| matches!(m.stage, Stage::Group(_)))
        .peekable();
    group_matches.peek().is_some() && group_matches.all(|m| m.is_completed())
}

/// Qualifiers of every group, re-seeded by finishing position.
///
/// All group winners come first (in group order), then all runners-up, and so
/// on down to `advance_count`.
pub fn playoff_seeds(groups: &[Group], matches: &[GameMatch]) -> Vec<PlayerId> {
    let qualifiers: Vec<Vec<PlayerId>> = groups
        .iter()
        .map(|g| {
            let stage = Stage::Group(g.index);
            let rows = standings(&g.players, matches.iter().filter(|m| m.stage == stage));
            top(&rows, g.advance_count)
        })
        .collect();

    let deepest = qualifiers.iter().map(Vec::len).max().unwrap_or(0);
    (0..deepest)
        .flat_map(|place| qualifiers.iter().filter_map(move |q| q.get(place).copied()))
        .collect()
}
