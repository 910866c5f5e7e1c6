//! In-memory tournament store with one exclusive update scope per tournament.

use crate::models::{Tournament, TournamentError, TournamentId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, TryLockError};
use std::time::{Duration, Instant};

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
#[derive(Debug)]
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// Tournaments by id.
///
/// The map lock is only held to look an entry up; all work on a tournament
/// happens under that tournament's own mutex, so unrelated tournaments never
/// wait on each other while updates to one tournament are serialized.
#[derive(Debug, Default)]
pub struct TournamentStore {
    tournaments: RwLock<HashMap<TournamentId, Arc<Mutex<TournamentEntry>>>>,
}

// Engine updates are all-or-nothing, so a poisoned lock still guards consistent data.
fn lock(entry: &Mutex<TournamentEntry>) -> MutexGuard<'_, TournamentEntry> {
    entry.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, tournament: Tournament) -> TournamentId {
        let id = tournament.id;
        let entry = TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        };
        self.tournaments
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(Mutex::new(entry)));
        id
    }

    pub fn remove(&self, id: TournamentId) -> Option<Tournament> {
        let entry = self
            .tournaments
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)?;
        let tournament = lock(&entry).tournament.clone();
        Some(tournament)
    }

    pub fn len(&self) -> usize {
        self.tournaments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry(&self, id: TournamentId) -> Result<Arc<Mutex<TournamentEntry>>, TournamentError> {
        self.tournaments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    /// Run `f` on a tournament. Refreshes its last activity.
    pub fn read<T, F>(&self, id: TournamentId, f: F) -> Result<T, TournamentError>
    where
        F: FnOnce(&Tournament) -> T,
    {
        let entry = self.entry(id)?;
        let mut guard = lock(&entry);
        guard.last_activity = Instant::now();
        Ok(f(&guard.tournament))
    }

    /// Apply `f` to a tournament inside its exclusive update scope.
    ///
    /// `f` works on the stored tournament directly. The engine's mutating
    /// operations are all-or-nothing, so an `Err` from one of them leaves the
    /// tournament as it was.
    pub fn update<T, E, F>(&self, id: TournamentId, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Tournament) -> Result<T, E>,
        E: From<TournamentError> + fmt::Display,
    {
        let entry = self.entry(id)?;
        let mut guard = lock(&entry);
        // Evicted between the lookup and the lock: the entry is orphaned.
        if !self.is_current(id, &entry) {
            return Err(TournamentError::TournamentNotFound(id).into());
        }
        guard.last_activity = Instant::now();

        f(&mut guard.tournament).map_err(|err| {
            log::warn!("Update of tournament {} refused: {}", id, err);
            err
        })
    }

    fn is_current(&self, id: TournamentId, entry: &Arc<Mutex<TournamentEntry>>) -> bool {
        self.tournaments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .is_some_and(|stored| Arc::ptr_eq(stored, entry))
    }

    /// Drop tournaments not touched for `max_idle`. Returns how many were removed.
    pub fn evict_inactive(&self, max_idle: Duration) -> usize {
        let mut map = self
            .tournaments
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = map.len();
        // An entry locked right now is in use and stays.
        map.retain(|_, entry| match entry.try_lock() {
            Ok(guard) => guard.last_activity.elapsed() < max_idle,
            Err(TryLockError::Poisoned(poisoned)) => {
                poisoned.into_inner().last_activity.elapsed() < max_idle
            }
            Err(TryLockError::WouldBlock) => true,
        });
        before - map.len()
    }
}
