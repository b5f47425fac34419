//! Pairing model — one table's match for one round.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{EntityId, PairingId, ParticipantId, RoundId, TournamentId};

/// How pairings are generated for a round.
///
/// Only `Random` is implemented; the other methods are accepted in
/// configuration but fail explicitly when selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingMethod {
    Random,
    Swiss,
    Manual,
}

impl Default for PairingMethod {
    fn default() -> Self {
        PairingMethod::Random
    }
}

impl fmt::Display for PairingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PairingMethod::Random => "random",
            PairingMethod::Swiss => "swiss",
            PairingMethod::Manual => "manual",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for PairingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(PairingMethod::Random),
            "swiss" => Ok(PairingMethod::Swiss),
            "manual" => Ok(PairingMethod::Manual),
            other => Err(format!("unknown pairing method: {}", other)),
        }
    }
}

/// Match outcome, derived purely from the two scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchWinner {
    Player1,
    Player2,
    Draw,
}

impl MatchWinner {
    /// Derive the winner from battle points. Equal scores are a draw.
    pub fn from_scores(player1_score: u32, player2_score: u32) -> Self {
        if player1_score > player2_score {
            MatchWinner::Player1
        } else if player2_score > player1_score {
            MatchWinner::Player2
        } else {
            MatchWinner::Draw
        }
    }
}

/// One table's match between two participants, or one participant and a bye.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pairing {
    pub id: PairingId,

    pub tournament_id: TournamentId,

    pub round_id: RoundId,

    /// 1-based, dense within the round
    pub table_number: u32,

    pub player1_id: ParticipantId,

    /// `None` signifies a bye for player 1
    pub player2_id: Option<ParticipantId>,

    /// Battle points, set when the result is recorded
    pub player1_score: Option<u32>,

    pub player2_score: Option<u32>,

    /// Auto-set to `Player1` for a bye; otherwise derived from scores
    pub winner: Option<MatchWinner>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Pairing {
    /// Create a pairing. Passing `None` for `player2_id` creates a bye:
    /// the winner is set immediately and the scores stay empty.
    pub fn new(
        tournament_id: TournamentId,
        round_id: RoundId,
        table_number: u32,
        player1_id: ParticipantId,
        player2_id: Option<ParticipantId>,
    ) -> Self {
        let winner = if player2_id.is_none() {
            Some(MatchWinner::Player1)
        } else {
            None
        };
        let now = Utc::now();

        Self {
            id: EntityId::random(),
            tournament_id,
            round_id,
            table_number,
            player1_id,
            player2_id,
            player1_score: None,
            player2_score: None,
            winner,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this pairing is a bye.
    pub fn is_bye(&self) -> bool {
        self.player2_id.is_none()
    }

    /// Whether the given participant plays in this pairing.
    pub fn involves(&self, participant_id: &ParticipantId) -> bool {
        self.player1_id == *participant_id || self.player2_id.as_ref() == Some(participant_id)
    }

    /// Record (or overwrite) the match result. Winner is derived from the
    /// scores; calling this again replaces the previous result.
    pub fn record_result(&mut self, player1_score: u32, player2_score: u32) {
        self.player1_score = Some(player1_score);
        self.player2_score = Some(player2_score);
        self.winner = Some(MatchWinner::from_scores(player1_score, player2_score));
        self.updated_at = Utc::now();
    }
}
