//! Pairing & standings engine.
//!
//! The [`Engine`] facade is the orchestration surface the rest of the
//! system calls: generate a round's pairings, record a match result,
//! complete a round, read standings. Each operation is a bounded sequence
//! of storage reads and writes on a single task; there is no locking and
//! no automatic retry or rollback. A failed pairing generation can leave
//! an orphan round behind (round creation and pairing creation are not
//! transactional); callers may need to clean up manually.

mod pairing;
mod result;
mod round;
mod standings;

pub use round::PairingView;
pub use standings::compute_placings;

use std::sync::Arc;

use thiserror::Error;

use crate::models::{PairingId, PairingMethod, ParticipantId, RoundId, TournamentId, UserId};
use crate::storage::{StorageError, TournamentStore};

/// Errors raised by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("not enough checked-in participants to generate pairings ({count} eligible, need 2)")]
    InsufficientParticipants { count: usize },

    #[error("round number must be a positive integer, got {0}")]
    InvalidRoundNumber(u32),

    #[error("invalid score {0}: scores must be non-negative integers")]
    InvalidScore(i64),

    #[error("pairing not found: {0}")]
    PairingNotFound(PairingId),

    #[error("round not found: {0}")]
    RoundNotFound(RoundId),

    #[error("participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    #[error("user {user} is already registered for tournament {tournament}")]
    AlreadyRegistered {
        tournament: TournamentId,
        user: UserId,
    },

    #[error("pairing method '{0}' is not implemented")]
    UnsupportedPairingMethod(PairingMethod),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Facade over the pairing and standings operations.
///
/// Cheap to clone; all clones share the same store.
#[derive(Clone)]
pub struct Engine {
    store: Arc<dyn TournamentStore>,
}

impl Engine {
    pub fn new(store: Arc<dyn TournamentStore>) -> Self {
        Self { store }
    }

    pub(crate) fn store(&self) -> &dyn TournamentStore {
        self.store.as_ref()
    }
}
