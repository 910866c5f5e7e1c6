//! CSV exchange with the registry: participant import and standings export.

use crate::models::{StandingsRow, Tournament, TournamentError, DEFAULT_RATING};
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CsvError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Tournament(#[from] TournamentError),
    #[error("line {line}: {source}")]
    Row {
        line: u64,
        #[source]
        source: TournamentError,
    },
}

/// One registry row: `name,rating`. A blank rating means the default.
#[derive(Debug, Deserialize)]
struct ParticipantRecord {
    name: String,
    #[serde(default)]
    rating: Option<i32>,
}

#[derive(Debug, Serialize)]
struct StandingsRecord<'a> {
    rank: u32,
    name: &'a str,
    played: u32,
    wins: u32,
    losses: u32,
    points: u32,
    point_differential: i64,
}

/// Register every row of a `name,rating` CSV into a tournament in Setup.
///
/// Returns the number of participants added. Stops at the first bad row and
/// leaves the tournament unchanged in that case.
pub fn import_participants<R: io::Read>(
    tournament: &mut Tournament,
    reader: R,
) -> Result<usize, CsvError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut row = csv::StringRecord::new();

    let mut draft = tournament.clone();
    let mut added = 0;
    while rdr.read_record(&mut row)? {
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let record: ParticipantRecord = row.deserialize(Some(&headers))?;
        draft
            .add_player(record.name, record.rating.unwrap_or(DEFAULT_RATING))
            .map_err(|source| CsvError::Row { line, source })?;
        added += 1;
    }

    log::debug!("Imported {} participants into {}", added, tournament.id);
    *tournament = draft;
    Ok(added)
}

/// Write a standings table as CSV, resolving participant names from `tournament`.
pub fn write_standings<W: io::Write>(
    writer: W,
    tournament: &Tournament,
    rows: &[StandingsRow],
) -> Result<(), CsvError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        let name = tournament
            .player(row.player_id)
            .map(|p| p.name.as_str())
            .unwrap_or_default();
        wtr.serialize(StandingsRecord {
            rank: row.rank,
            name,
            played: row.played,
            wins: row.wins,
            losses: row.losses,
            points: row.points,
            point_differential: row.point_differential,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TournamentConfig;

    #[test]
    fn imports_names_and_ratings() {
        let mut t = Tournament::new("ladder", TournamentConfig::default());
        let data = "name,rating\nAda,1200\nBo,\nCy,900\n";
        assert_eq!(import_participants(&mut t, data.as_bytes()).unwrap(), 3);
        assert_eq!(t.players[0].initial_rating, 1200);
        assert_eq!(t.players[1].initial_rating, DEFAULT_RATING);
        assert_eq!(t.players[2].name, "Cy");
    }

    #[test]
    fn duplicate_row_leaves_tournament_untouched() {
        let mut t = Tournament::new("ladder", TournamentConfig::default());
        let data = "name,rating\nAda,1200\nada,1000\n";
        let err = import_participants(&mut t, data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            CsvError::Row {
                source: TournamentError::DuplicatePlayerName,
                ..
            }
        ));
        assert!(t.players.is_empty());
    }

    #[test]
    fn writes_standings_with_names() {
        let mut t = Tournament::new("ladder", TournamentConfig::default());
        let ada = t.add_player("Ada", 1000).unwrap();
        let rows = vec![StandingsRow {
            player_id: ada,
            played: 2,
            wins: 1,
            losses: 1,
            points: 3,
            point_differential: -4,
            rank: 1,
        }];
        let mut out = Vec::new();
        write_standings(&mut out, &t, &rows).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "rank,name,played,wins,losses,points,point_differential\n1,Ada,2,1,1,3,-4\n"
        );
    }
}
