//! Standings computation.
//!
//! Standings are a pure fold over the pairing history. Participants'
//! stored aggregate fields are refreshed from the same fold after each
//! recorded result, but the ranking never reads them, so a missed refresh
//! cannot reorder the table.

use std::collections::HashMap;

use super::{Engine, EngineError};
use crate::models::{
    MatchWinner, Pairing, Participant, ParticipantId, Round, Standing, TournamentId,
    WinLossRecord,
};
use crate::storage::TournamentStore;

/// Accumulated results for one participant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ResultTotals {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    /// Battle points per played round, in round order. Byes and
    /// unreported rounds contribute 0.
    pub battle_points: Vec<u32>,
}

impl ResultTotals {
    pub fn total_battle_points(&self) -> u32 {
        self.battle_points.iter().sum()
    }
}

/// Fold one participant's results out of the pairing history.
///
/// `rounds` must be ordered by round number; only rounds the participant
/// was paired in contribute to the battle-point sequence.
pub(crate) fn result_totals(
    participant_id: &ParticipantId,
    rounds: &[Round],
    pairings: &[Pairing],
) -> ResultTotals {
    let mut totals = ResultTotals::default();

    for round in rounds {
        let Some(pairing) = pairings
            .iter()
            .find(|p| p.round_id == round.id && p.involves(participant_id))
        else {
            continue;
        };

        let is_player1 = pairing.player1_id == *participant_id;
        let own_score = if is_player1 {
            pairing.player1_score.unwrap_or(0)
        } else {
            pairing.player2_score.unwrap_or(0)
        };
        totals.battle_points.push(own_score);

        match pairing.winner {
            Some(MatchWinner::Draw) => totals.draws += 1,
            Some(MatchWinner::Player1) if is_player1 => totals.wins += 1,
            Some(MatchWinner::Player2) if !is_player1 => totals.wins += 1,
            Some(_) => totals.losses += 1,
            // Unreported match: no win/loss/draw contribution
            None => {}
        }
    }

    totals
}

/// Rank participants by wins, then total battle points, both descending.
/// Ties keep their relative order and receive distinct successive ranks.
pub fn compute_placings(
    participants: &[Participant],
    rounds: &[Round],
    pairings: &[Pairing],
) -> Vec<Standing> {
    let mut standings: Vec<Standing> = participants
        .iter()
        .map(|p| {
            let totals = result_totals(&p.id, rounds, pairings);
            Standing {
                rank: 0,
                participant_id: p.id.clone(),
                player_name: p.display_name(),
                team_name: p.team_name.clone(),
                faction: p.faction.clone(),
                record: WinLossRecord::new(totals.wins, totals.losses, totals.draws),
                total_battle_points: totals.total_battle_points(),
                battle_points: totals.battle_points,
            }
        })
        .collect();

    standings.sort_by(|a, b| b.ranking_key().cmp(&a.ranking_key()));

    for (i, standing) in standings.iter_mut().enumerate() {
        standing.rank = (i + 1) as u32;
    }

    standings
}

impl Engine {
    /// Current standings for a tournament. An empty roster yields an
    /// empty table, not an error.
    pub async fn get_tournament_placings(
        &self,
        tournament_id: &TournamentId,
    ) -> Result<Vec<Standing>, EngineError> {
        let participants = self.store().participants(tournament_id).await?;
        if participants.is_empty() {
            return Ok(Vec::new());
        }

        let rounds = self.store().rounds(tournament_id).await?;
        let pairings = self.store().tournament_pairings(tournament_id).await?;

        Ok(compute_placings(&participants, &rounds, &pairings))
    }

    /// Recompute and persist the aggregate projection for the given
    /// participants from the full pairing history.
    pub(crate) async fn refresh_aggregates(
        &self,
        tournament_id: &TournamentId,
        participant_ids: &[ParticipantId],
    ) -> Result<(), EngineError> {
        let rounds = self.store().rounds(tournament_id).await?;
        let pairings = self.store().tournament_pairings(tournament_id).await?;

        let mut participants: HashMap<ParticipantId, Participant> = self
            .store()
            .participants(tournament_id)
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        for id in participant_ids {
            let Some(participant) = participants.get_mut(id) else {
                // Removed since pairing; nothing to refresh
                continue;
            };
            let totals = result_totals(id, &rounds, &pairings);
            participant.set_aggregates(
                totals.wins,
                totals.losses,
                totals.draws,
                totals.battle_points,
            );
            self.store().update_participant(participant).await?;
        }

        Ok(())
    }
}
