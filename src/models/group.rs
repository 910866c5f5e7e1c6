//! Group-stage groups.

use crate::models::history::StandingsRow;
use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};

/// A closed round-robin group feeding the playoff bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub index: usize,
    /// "Group A", "Group B", ...
    pub name: String,
    /// Members in seed order.
    pub players: Vec<PlayerId>,
    /// How many members advance to the playoff bracket.
    pub advance_count: usize,
    /// Refreshed by every recompute.
    pub standings: Vec<StandingsRow>,
}

impl Group {
    pub fn new(index: usize, players: Vec<PlayerId>, advance_count: usize) -> Self {
        Self {
            index,
            name: group_name(index),
            players,
            advance_count,
            standings: Vec::new(),
        }
    }
}

fn group_name(index: usize) -> String {
    match u8::try_from(index).ok().filter(|i| *i < 26) {
        Some(i) => format!("Group {}", char::from(b'A' + i)),
        None => format!("Group {}", index + 1),
    }
}
