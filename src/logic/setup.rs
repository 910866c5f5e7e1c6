//! Setup phase: start the tournament (generate the schedule for its format).

use crate::logic::bracket::{generate_bracket, seed_by_rating};
use crate::logic::groups::{generate_group_matches, partition_groups};
use crate::logic::progression::commit;
use crate::logic::replay::recompute;
use crate::logic::round_robin::generate_round_robin;
use crate::models::{Stage, Tournament, TournamentError, TournamentFormat, TournamentState};

/// Start the tournament: seed participants by rating, build the schedule and
/// move out of Setup. Requires at least 2 participants.
///
/// BYE matches created here are keyed at the tournament's creation time.
pub fn start_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Setup {
        return Err(TournamentError::InvalidState);
    }
    if tournament.players.len() < 2 {
        return Err(TournamentError::NotEnoughPlayers {
            found: tournament.players.len(),
        });
    }

    commit(tournament, |t| {
        let seeds = seed_by_rating(&t.players);
        let (id, created_at) = (t.id, t.created_at);

        match t.config.format {
            TournamentFormat::SingleElimination => {
                let matches = generate_bracket(id, &seeds, || t.next_order(created_at))?;
                t.matches = matches;
                t.state = TournamentState::Elimination;
            }
            TournamentFormat::RoundRobin => {
                t.matches = generate_round_robin(id, Stage::RoundRobin, &seeds)?;
                t.state = TournamentState::RoundRobin;
            }
            TournamentFormat::GroupStage {
                num_groups,
                advance_per_group,
            } => {
                let groups = partition_groups(&seeds, num_groups, advance_per_group)?;
                t.matches = generate_group_matches(id, &groups)?;
                t.groups = groups;
                t.state = TournamentState::GroupStage;
            }
        }

        log::info!(
            "Started tournament {} ({:?}) with {} participants and {} matches",
            t.id,
            t.config.format,
            t.players.len(),
            t.matches.len()
        );
        recompute(t)
    })
}
