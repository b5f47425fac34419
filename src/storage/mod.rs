//! Persistence boundary.
//!
//! The engine talks to storage through the [`TournamentStore`] trait; the
//! concrete implementation is a JSONL document store with one directory per
//! tournament. Timeouts and retries are the store's concern, never the
//! engine's: failures surface unwrapped as [`StorageError`].

mod jsonl;

pub use jsonl::{JsonlReader, JsonlStore, JsonlWriter, RecordFile};

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Pairing, PairingId, Participant, ParticipantId, ParticipationStatus, Round, RoundId,
    TournamentId,
};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("No stored record with id {0}")]
    MissingRecord(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn tournaments_dir(&self) -> PathBuf {
        self.data_dir.join("tournaments")
    }

    pub fn tournament_dir(&self, tournament_id: &TournamentId) -> PathBuf {
        self.tournaments_dir().join(tournament_id.as_str())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Abstract persistence interface required by the engine.
///
/// Pairing and round lookups are by bare ID because result recording and
/// round completion are keyed that way by callers; implementations may have
/// to search across tournaments for these.
#[async_trait]
pub trait TournamentStore: Send + Sync {
    /// All participants registered for a tournament.
    async fn participants(
        &self,
        tournament_id: &TournamentId,
    ) -> Result<Vec<Participant>, StorageError>;

    /// Participants filtered by participation status.
    async fn participants_by_status(
        &self,
        tournament_id: &TournamentId,
        status: ParticipationStatus,
    ) -> Result<Vec<Participant>, StorageError>;

    /// Look up a single participant by ID.
    async fn participant(
        &self,
        participant_id: &ParticipantId,
    ) -> Result<Option<Participant>, StorageError>;

    async fn insert_participant(&self, participant: &Participant) -> Result<(), StorageError>;

    /// Replace the stored participant with the same ID.
    async fn update_participant(&self, participant: &Participant) -> Result<(), StorageError>;

    async fn remove_participant(&self, participant_id: &ParticipantId)
        -> Result<(), StorageError>;

    async fn insert_round(&self, round: &Round) -> Result<(), StorageError>;

    /// Replace the stored round with the same ID.
    async fn update_round(&self, round: &Round) -> Result<(), StorageError>;

    /// Look up a single round by ID.
    async fn round(&self, round_id: &RoundId) -> Result<Option<Round>, StorageError>;

    /// Look up a round by tournament and round number. When duplicates
    /// exist (unguarded concurrent generation), the earliest created wins.
    async fn round_by_number(
        &self,
        tournament_id: &TournamentId,
        round_number: u32,
    ) -> Result<Option<Round>, StorageError>;

    /// Insert a batch of pairings for a freshly generated round.
    async fn insert_pairings(&self, pairings: &[Pairing]) -> Result<(), StorageError>;

    /// Replace the stored pairing with the same ID.
    async fn update_pairing(&self, pairing: &Pairing) -> Result<(), StorageError>;

    /// Look up a single pairing by ID.
    async fn pairing(&self, pairing_id: &PairingId) -> Result<Option<Pairing>, StorageError>;

    /// Pairings for one round, ordered by table number.
    async fn round_pairings(
        &self,
        tournament_id: &TournamentId,
        round_id: &RoundId,
    ) -> Result<Vec<Pairing>, StorageError>;

    /// Every pairing recorded for a tournament, across all rounds.
    async fn tournament_pairings(
        &self,
        tournament_id: &TournamentId,
    ) -> Result<Vec<Pairing>, StorageError>;

    /// Rounds for a tournament, ordered by round number.
    async fn rounds(&self, tournament_id: &TournamentId) -> Result<Vec<Round>, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityId;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));
        assert_eq!(config.tournaments_dir(), PathBuf::from("/data/tournaments"));
        assert_eq!(
            config.tournament_dir(&EntityId::from("gt-heat-3")),
            PathBuf::from("/data/tournaments/gt-heat-3")
        );
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }
}
