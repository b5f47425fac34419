//! Match result recording.

use tracing::info;

use super::{Engine, EngineError};
use crate::models::{Pairing, PairingId};
use crate::storage::TournamentStore;

/// Scores arrive from the outside world as signed integers so that
/// negative input is representable and can be rejected.
fn validate_score(score: i64) -> Result<u32, EngineError> {
    u32::try_from(score).map_err(|_| EngineError::InvalidScore(score))
}

impl Engine {
    /// Record the result of one match.
    ///
    /// The winner is derived purely from the two scores. Recording again
    /// on the same pairing overwrites the previous result, so corrections
    /// update in place rather than append. After the pairing is written, both
    /// involved participants' aggregate projections are recomputed from
    /// the full pairing history.
    pub async fn record_match_result(
        &self,
        pairing_id: &PairingId,
        player1_score: i64,
        player2_score: i64,
    ) -> Result<Pairing, EngineError> {
        let score1 = validate_score(player1_score)?;
        let score2 = validate_score(player2_score)?;

        let mut pairing = self
            .store()
            .pairing(pairing_id)
            .await?
            .ok_or_else(|| EngineError::PairingNotFound(pairing_id.clone()))?;

        pairing.record_result(score1, score2);
        self.store().update_pairing(&pairing).await?;

        let mut involved = vec![pairing.player1_id.clone()];
        if let Some(player2_id) = &pairing.player2_id {
            involved.push(player2_id.clone());
        }
        self.refresh_aggregates(&pairing.tournament_id, &involved)
            .await?;

        info!(
            pairing = %pairing_id,
            table = pairing.table_number,
            score1,
            score2,
            winner = ?pairing.winner,
            "recorded match result"
        );

        Ok(pairing)
    }
}
