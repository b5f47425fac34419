//! Round model — one numbered stage of a tournament.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, RoundId, TournamentId};

/// Round lifecycle state. Terminal once `Completed`; reopening is not
/// supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundStatus {
    Pending,
    InProgress,
    Completed,
}

/// A tournament round.
///
/// Created when pairings are first generated for its round number and
/// flipped to `InProgress` once those pairings are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub id: RoundId,

    pub tournament_id: TournamentId,

    /// 1-based round number
    pub round_number: u32,

    pub status: RoundStatus,

    pub start_time: DateTime<Utc>,

    /// Set when the round is completed
    pub end_time: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Round {
    /// Create a new pending round.
    pub fn new(tournament_id: TournamentId, round_number: u32) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::random(),
            tournament_id,
            round_number,
            status: RoundStatus::Pending,
            start_time: now,
            end_time: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the round as in progress.
    pub fn start(&mut self) {
        self.status = RoundStatus::InProgress;
        self.updated_at = Utc::now();
    }

    /// Mark the round as completed and stamp the end time.
    pub fn complete(&mut self) {
        let now = Utc::now();
        self.status = RoundStatus::Completed;
        self.end_time = Some(now);
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_round_pending() {
        let round = Round::new(EntityId::from("gt-heat-3"), 1);
        assert_eq!(round.status, RoundStatus::Pending);
        assert_eq!(round.round_number, 1);
        assert!(round.end_time.is_none());
    }

    #[test]
    fn test_round_ids_unique() {
        let a = Round::new(EntityId::from("gt-heat-3"), 1);
        let b = Round::new(EntityId::from("gt-heat-3"), 1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_start_and_complete() {
        let mut round = Round::new(EntityId::from("gt-heat-3"), 2);
        round.start();
        assert_eq!(round.status, RoundStatus::InProgress);
        assert!(round.end_time.is_none());

        round.complete();
        assert_eq!(round.status, RoundStatus::Completed);
        assert!(round.end_time.is_some());
    }

    #[test]
    fn test_serialization_wire_names() {
        let round = Round::new(EntityId::from("gt-heat-3"), 3);
        let json = serde_json::to_value(&round).unwrap();
        assert_eq!(json["roundNumber"], 3);
        assert_eq!(json["status"], "pending");
        assert!(json["endTime"].is_null());

        let back: Round = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, round.id);
    }
}
