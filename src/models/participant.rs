//! Participant model — one player's registration in one tournament.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, ParticipantId, TournamentId, UserId};

/// Army-list submission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListStatus {
    Unsubmitted,
    Submitted,
    SubmittedWithErrors,
}

/// Participation state within the tournament.
///
/// Only `CheckedIn` participants are eligible when pairings are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParticipationStatus {
    Registered,
    CheckedIn,
    Dropped,
}

/// A player registered for a tournament.
///
/// The aggregate result fields (`wins`, `losses`, `draws`, `battle_points`,
/// `total_battle_points`) are a projection recomputed from the pairing
/// history after every recorded result. Standings re-fold the history
/// themselves, so these fields are for display and never reorder the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Unique identifier (derived from tournament id + user id)
    pub id: ParticipantId,

    /// Tournament this registration belongs to
    pub tournament_id: TournamentId,

    /// Owning user. Synthetic for manually added players.
    pub user_id: UserId,

    pub first_name: String,

    pub last_name: String,

    pub team_name: Option<String>,

    /// Declared faction (e.g. "Aeldari", "Death Guard")
    pub faction: Option<String>,

    /// Army list text, once submitted
    pub army_list: Option<String>,

    pub list_status: ListStatus,

    pub participation_status: ParticipationStatus,

    /// Wins, recomputed from the pairing history
    pub wins: u32,

    pub losses: u32,

    pub draws: u32,

    /// Battle points per played round, in round order
    pub battle_points: Vec<u32>,

    pub total_battle_points: u32,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Participant {
    /// Create a new registration. The ID is derived from (tournament, user),
    /// so registering the same user twice yields the same ID.
    pub fn new(
        tournament_id: TournamentId,
        user_id: UserId,
        first_name: String,
        last_name: String,
    ) -> Self {
        let id = EntityId::generate(&[tournament_id.as_str(), user_id.as_str()]);
        let now = Utc::now();

        Self {
            id,
            tournament_id,
            user_id,
            first_name,
            last_name,
            team_name: None,
            faction: None,
            army_list: None,
            list_status: ListStatus::Unsubmitted,
            participation_status: ParticipationStatus::Registered,
            wins: 0,
            losses: 0,
            draws: 0,
            battle_points: Vec::new(),
            total_battle_points: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder method to set team name.
    pub fn with_team_name(mut self, team_name: String) -> Self {
        self.team_name = Some(team_name);
        self
    }

    /// Builder method to set faction.
    pub fn with_faction(mut self, faction: String) -> Self {
        self.faction = Some(faction);
        self
    }

    /// Full display name.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether this participant is eligible for pairing.
    pub fn is_eligible(&self) -> bool {
        self.participation_status == ParticipationStatus::CheckedIn
    }

    /// Change participation status.
    pub fn set_status(&mut self, status: ParticipationStatus) {
        self.participation_status = status;
        self.updated_at = Utc::now();
    }

    /// Store a submitted army list.
    pub fn submit_army_list(&mut self, list: String) {
        self.army_list = Some(list);
        self.list_status = ListStatus::Submitted;
        self.updated_at = Utc::now();
    }

    /// Replace the aggregate result projection.
    pub fn set_aggregates(&mut self, wins: u32, losses: u32, draws: u32, battle_points: Vec<u32>) {
        self.wins = wins;
        self.losses = losses;
        self.draws = draws;
        self.total_battle_points = battle_points.iter().sum();
        self.battle_points = battle_points;
        self.updated_at = Utc::now();
    }
}
