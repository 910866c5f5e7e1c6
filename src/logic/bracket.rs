//! Single-elimination bracket: generation, seeding and winner propagation.

use crate::models::{
    Advance, GameMatch, MatchStatus, OrderKey, Participant, PlayerId, Side, Slot, Stage,
    TournamentError, TournamentId,
};

/// Participant ids ordered by descending starting rating (seed 1 first).
/// Equal ratings keep registration order.
pub fn seed_by_rating(players: &[Participant]) -> Vec<PlayerId> {
    let mut seeded: Vec<&Participant> = players.iter().collect();
    seeded.sort_by(|a, b| b.initial_rating.cmp(&a.initial_rating));
    seeded.into_iter().map(|p| p.id).collect()
}

/// Display name of a round entered by `entrants` participants.
pub fn round_name(entrants: usize, round: u32) -> String {
    match entrants {
        2 => "Final".to_owned(),
        4 => "Semifinals".to_owned(),
        8 => "Quarterfinals".to_owned(),
        16 | 32 => format!("Round of {}", entrants),
        _ => format!("Round {}", round),
    }
}

/// 1-based seeds in first-round slot order for a bracket of `size` (a power of two).
///
/// Every adjacent pair is `(i, size + 1 - i)` and the top two seeds can only
/// meet in the final.
pub fn seed_order(size: usize) -> Vec<usize> {
    debug_assert!(size.is_power_of_two());
    let mut order = vec![1];
    while order.len() < size {
        let width = order.len() * 2;
        order = order
            .iter()
            .flat_map(|&seed| [seed, width + 1 - seed])
            .collect();
    }
    order
}

/// Build the full bracket for `seeds` (seed 1 first).
///
/// The seed list is padded with BYEs to the next power of two `P`, giving
/// exactly `P - 1` matches. First-round BYE matches are completed right away
/// with keys drawn from `next_order`, and their winners are placed into the
/// second round.
pub fn generate_bracket<F>(
    tournament_id: TournamentId,
    seeds: &[PlayerId],
    mut next_order: F,
) -> Result<Vec<GameMatch>, TournamentError>
where
    F: FnMut() -> OrderKey,
{
    if seeds.len() < 2 {
        return Err(TournamentError::NotEnoughPlayers { found: seeds.len() });
    }

    let size = seeds.len().next_power_of_two();
    let num_rounds = size.trailing_zeros();

    log::debug!(
        "Creating single elimination bracket: {} entrants, size {}, {} rounds",
        seeds.len(),
        size,
        num_rounds
    );

    let seed_slot = |seed: usize| match seeds.get(seed - 1) {
        Some(&id) => Slot::Entrant(id),
        None => Slot::Bye,
    };

    let mut matches = Vec::with_capacity(size - 1);
    let order = seed_order(size);
    let mut round_start = Vec::with_capacity(num_rounds as usize);

    for round in 1..=num_rounds {
        let entrants = size >> (round - 1);
        let name = round_name(entrants, round);
        round_start.push(matches.len());
        for slot in 0..entrants / 2 {
            let (side_a, side_b) = if round == 1 {
                (seed_slot(order[2 * slot]), seed_slot(order[2 * slot + 1]))
            } else {
                (Slot::Tbd, Slot::Tbd)
            };
            matches.push(GameMatch::new(
                tournament_id,
                Stage::Elimination,
                round,
                name.clone(),
                slot as u32,
                side_a,
                side_b,
            ));
        }
    }

    // Feeds are fixed here and never recomputed.
    for round in 1..num_rounds as usize {
        let (start, next_start) = (round_start[round - 1], round_start[round]);
        for index in start..next_start {
            let offset = index - start;
            let target = &matches[next_start + offset / 2];
            let advance = Advance {
                match_id: target.id,
                side: if offset % 2 == 0 { Side::A } else { Side::B },
            };
            matches[index].next = Some(advance);
        }
    }

    for index in 0..size / 2 {
        if matches[index].is_bye() {
            matches[index].complete_bye(next_order());
            propagate_winner(&mut matches, index)?;
        }
    }

    log::debug!("Created bracket with {} matches", matches.len());
    Ok(matches)
}

/// Write the winner of `matches[index]` into its predetermined next slot.
pub fn propagate_winner(matches: &mut [GameMatch], index: usize) -> Result<(), TournamentError> {
    let source = &matches[index];
    let Some(advance) = source.next else {
        return Ok(());
    };
    let winner = source
        .winner
        .ok_or(TournamentError::MissingWinner(source.id))?;
    let target = matches
        .iter_mut()
        .find(|m| m.id == advance.match_id)
        .ok_or(TournamentError::MatchNotFound(advance.match_id))?;
    *target.slot_mut(advance.side) = Slot::Entrant(winner);
    Ok(())
}

/// Undo [`propagate_winner`] for `matches[index]`.
///
/// Refused if the downstream match has already been played.
pub fn retract_winner(matches: &mut [GameMatch], index: usize) -> Result<(), TournamentError> {
    let Some(advance) = matches[index].next else {
        return Ok(());
    };
    let target = matches
        .iter_mut()
        .find(|m| m.id == advance.match_id)
        .ok_or(TournamentError::MatchNotFound(advance.match_id))?;
    if target.status == MatchStatus::Completed {
        return Err(TournamentError::DownstreamMatchCompleted(target.id));
    }
    *target.slot_mut(advance.side) = Slot::Tbd;
    Ok(())
}
