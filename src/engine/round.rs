//! Round lifecycle and pairing display views.

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use super::{Engine, EngineError};
use crate::models::{MatchWinner, PairingId, Participant, Round, RoundId, TournamentId};
use crate::storage::TournamentStore;

/// One table's pairing joined to its participants, for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingView {
    pub id: PairingId,

    pub table_number: u32,

    /// `None` when the participant has since been removed
    pub player1: Option<Participant>,

    /// `None` for a bye or a removed participant
    pub player2: Option<Participant>,

    pub player1_score: Option<u32>,

    pub player2_score: Option<u32>,

    pub winner: Option<MatchWinner>,
}

impl Engine {
    /// Complete a round: set status and stamp the end time.
    ///
    /// Deliberately permissive: a round may be closed with unreported
    /// pairings; those keep a null winner unless corrected later.
    pub async fn complete_round(&self, round_id: &RoundId) -> Result<Round, EngineError> {
        let mut round = self
            .store()
            .round(round_id)
            .await?
            .ok_or_else(|| EngineError::RoundNotFound(round_id.clone()))?;

        round.complete();
        self.store().update_round(&round).await?;

        info!(
            tournament = %round.tournament_id,
            round = round.round_number,
            "completed round"
        );

        Ok(round)
    }

    /// Pairings for a round number, joined to participant details and
    /// ordered by table. A round that has not been generated yet reads
    /// as an empty list.
    pub async fn get_round_pairings(
        &self,
        tournament_id: &TournamentId,
        round_number: u32,
    ) -> Result<Vec<PairingView>, EngineError> {
        let Some(round) = self
            .store()
            .round_by_number(tournament_id, round_number)
            .await?
        else {
            return Ok(Vec::new());
        };

        let pairings = self.store().round_pairings(tournament_id, &round.id).await?;
        let participants: HashMap<_, _> = self
            .store()
            .participants(tournament_id)
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        Ok(pairings
            .into_iter()
            .map(|pairing| PairingView {
                player1: participants.get(&pairing.player1_id).cloned(),
                player2: pairing
                    .player2_id
                    .as_ref()
                    .and_then(|id| participants.get(id).cloned()),
                id: pairing.id,
                table_number: pairing.table_number,
                player1_score: pairing.player1_score,
                player2_score: pairing.player2_score,
                winner: pairing.winner,
            })
            .collect())
    }
}
