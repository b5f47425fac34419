//! Roster management.
//!
//! Registration, organiser-side participant management, check-in, and
//! army-list submission. Participants carry their pairing eligibility:
//! only checked-in players are picked up when a round is generated.

use std::sync::Arc;

use tracing::info;

use crate::engine::EngineError;
use crate::models::{
    EntityId, Participant, ParticipantId, ParticipationStatus, TournamentId, UserId,
};
use crate::storage::TournamentStore;

/// Player details captured at registration.
#[derive(Debug, Clone)]
pub struct PlayerDetails {
    pub first_name: String,
    pub last_name: String,
    pub team_name: Option<String>,
    pub faction: Option<String>,
}

impl PlayerDetails {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            team_name: None,
            faction: None,
        }
    }

    pub fn with_team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = Some(team_name.into());
        self
    }

    pub fn with_faction(mut self, faction: impl Into<String>) -> Self {
        self.faction = Some(faction.into());
        self
    }
}

/// Roster operations over the shared store.
#[derive(Clone)]
pub struct Roster {
    store: Arc<dyn TournamentStore>,
}

impl Roster {
    pub fn new(store: Arc<dyn TournamentStore>) -> Self {
        Self { store }
    }

    fn build_participant(
        tournament_id: &TournamentId,
        user_id: UserId,
        details: PlayerDetails,
    ) -> Participant {
        let mut participant = Participant::new(
            tournament_id.clone(),
            user_id,
            details.first_name,
            details.last_name,
        );
        if let Some(team_name) = details.team_name {
            participant = participant.with_team_name(team_name);
        }
        if let Some(faction) = details.faction {
            participant = participant.with_faction(faction);
        }
        participant
    }

    /// Register a user for a tournament. Registering the same user twice
    /// is rejected; participant IDs are derived from (tournament, user),
    /// so the duplicate check is a single lookup.
    pub async fn register(
        &self,
        tournament_id: &TournamentId,
        user_id: &UserId,
        details: PlayerDetails,
    ) -> Result<Participant, EngineError> {
        let id = EntityId::generate(&[tournament_id.as_str(), user_id.as_str()]);
        if self.store.participant(&id).await?.is_some() {
            return Err(EngineError::AlreadyRegistered {
                tournament: tournament_id.clone(),
                user: user_id.clone(),
            });
        }

        let participant = Self::build_participant(tournament_id, user_id.clone(), details);
        self.store.insert_participant(&participant).await?;

        info!(
            tournament = %tournament_id,
            participant = %participant.id,
            "registered participant"
        );
        Ok(participant)
    }

    /// Add a manually entered player (no user account); a synthetic user
    /// ID is generated for them.
    pub async fn add_participant(
        &self,
        tournament_id: &TournamentId,
        details: PlayerDetails,
    ) -> Result<Participant, EngineError> {
        let participant =
            Self::build_participant(tournament_id, EntityId::random(), details);
        self.store.insert_participant(&participant).await?;

        info!(
            tournament = %tournament_id,
            participant = %participant.id,
            "added manual participant"
        );
        Ok(participant)
    }

    /// Remove a participant from their tournament entirely.
    pub async fn remove(&self, participant_id: &ParticipantId) -> Result<(), EngineError> {
        if self.store.participant(participant_id).await?.is_none() {
            return Err(EngineError::ParticipantNotFound(participant_id.clone()));
        }
        self.store.remove_participant(participant_id).await?;

        info!(participant = %participant_id, "removed participant");
        Ok(())
    }

    /// Store a submitted army list and flip the list status.
    pub async fn submit_army_list(
        &self,
        participant_id: &ParticipantId,
        list: String,
    ) -> Result<Participant, EngineError> {
        let mut participant = self.require(participant_id).await?;
        participant.submit_army_list(list);
        self.store.update_participant(&participant).await?;
        Ok(participant)
    }

    /// Change a participant's participation status (organiser action).
    pub async fn set_status(
        &self,
        participant_id: &ParticipantId,
        status: ParticipationStatus,
    ) -> Result<Participant, EngineError> {
        let mut participant = self.require(participant_id).await?;
        participant.set_status(status);
        self.store.update_participant(&participant).await?;
        Ok(participant)
    }

    /// Check in every registered participant. Dropped and already
    /// checked-in players are untouched. Returns how many were flipped.
    pub async fn check_in_all(&self, tournament_id: &TournamentId) -> Result<usize, EngineError> {
        let registered = self
            .store
            .participants_by_status(tournament_id, ParticipationStatus::Registered)
            .await?;

        let count = registered.len();
        for mut participant in registered {
            participant.set_status(ParticipationStatus::CheckedIn);
            self.store.update_participant(&participant).await?;
        }

        info!(tournament = %tournament_id, count, "checked in all registered participants");
        Ok(count)
    }

    /// The full roster for a tournament.
    pub async fn roster(
        &self,
        tournament_id: &TournamentId,
    ) -> Result<Vec<Participant>, EngineError> {
        Ok(self.store.participants(tournament_id).await?)
    }

    async fn require(&self, participant_id: &ParticipantId) -> Result<Participant, EngineError> {
        self.store
            .participant(participant_id)
            .await?
            .ok_or_else(|| EngineError::ParticipantNotFound(participant_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListStatus;
    use crate::storage::{JsonlStore, StorageConfig};
    use tempfile::TempDir;

    fn roster(temp_dir: &TempDir) -> Roster {
        Roster::new(Arc::new(JsonlStore::new(StorageConfig::new(
            temp_dir.path().to_path_buf(),
        ))))
    }

    fn tournament() -> TournamentId {
        EntityId::from("gt-heat-3")
    }

    #[tokio::test]
    async fn test_register_and_duplicate_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let roster = roster(&temp_dir);
        let user = EntityId::from("user-1");

        let p = roster
            .register(
                &tournament(),
                &user,
                PlayerDetails::new("Alice", "Ashford").with_faction("Aeldari"),
            )
            .await
            .unwrap();
        assert_eq!(p.participation_status, ParticipationStatus::Registered);
        assert_eq!(p.faction.as_deref(), Some("Aeldari"));

        let again = roster
            .register(&tournament(), &user, PlayerDetails::new("Alice", "Ashford"))
            .await;
        assert!(matches!(
            again,
            Err(EngineError::AlreadyRegistered { .. })
        ));

        assert_eq!(roster.roster(&tournament()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_same_user_different_tournaments() {
        let temp_dir = TempDir::new().unwrap();
        let roster = roster(&temp_dir);
        let user = EntityId::from("user-1");

        roster
            .register(&tournament(), &user, PlayerDetails::new("Alice", "Ashford"))
            .await
            .unwrap();
        roster
            .register(
                &EntityId::from("other-gt"),
                &user,
                PlayerDetails::new("Alice", "Ashford"),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_add_manual_participants_distinct() {
        let temp_dir = TempDir::new().unwrap();
        let roster = roster(&temp_dir);

        let a = roster
            .add_participant(&tournament(), PlayerDetails::new("Walk", "In"))
            .await
            .unwrap();
        let b = roster
            .add_participant(&tournament(), PlayerDetails::new("Walk", "In"))
            .await
            .unwrap();
        // Same name, but distinct synthetic users, so distinct entries
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_remove_participant() {
        let temp_dir = TempDir::new().unwrap();
        let roster = roster(&temp_dir);

        let p = roster
            .add_participant(&tournament(), PlayerDetails::new("Alice", "Ashford"))
            .await
            .unwrap();
        roster.remove(&p.id).await.unwrap();
        assert!(roster.roster(&tournament()).await.unwrap().is_empty());

        let missing = roster.remove(&p.id).await;
        assert!(matches!(
            missing,
            Err(EngineError::ParticipantNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_army_list() {
        let temp_dir = TempDir::new().unwrap();
        let roster = roster(&temp_dir);

        let p = roster
            .add_participant(&tournament(), PlayerDetails::new("Alice", "Ashford"))
            .await
            .unwrap();
        let updated = roster
            .submit_army_list(&p.id, "2000pts Aeldari - Warhost".to_string())
            .await
            .unwrap();
        assert_eq!(updated.list_status, ListStatus::Submitted);
        assert!(updated.army_list.is_some());
    }

    #[tokio::test]
    async fn test_check_in_all_flips_only_registered() {
        let temp_dir = TempDir::new().unwrap();
        let roster = roster(&temp_dir);

        let a = roster
            .add_participant(&tournament(), PlayerDetails::new("Alice", "Ashford"))
            .await
            .unwrap();
        let b = roster
            .add_participant(&tournament(), PlayerDetails::new("Bob", "Barrow"))
            .await
            .unwrap();
        let dropped = roster
            .add_participant(&tournament(), PlayerDetails::new("Dana", "Dropped"))
            .await
            .unwrap();
        roster
            .set_status(&dropped.id, ParticipationStatus::Dropped)
            .await
            .unwrap();

        let count = roster.check_in_all(&tournament()).await.unwrap();
        assert_eq!(count, 2);

        let all = roster.roster(&tournament()).await.unwrap();
        for p in &all {
            let expected = if p.id == dropped.id {
                ParticipationStatus::Dropped
            } else {
                ParticipationStatus::CheckedIn
            };
            assert_eq!(p.participation_status, expected, "participant {}", p.id);
        }
        assert!(all.iter().any(|p| p.id == a.id));
        assert!(all.iter().any(|p| p.id == b.id));
    }

    #[tokio::test]
    async fn test_set_status_unknown_participant() {
        let temp_dir = TempDir::new().unwrap();
        let roster = roster(&temp_dir);

        let result = roster
            .set_status(&EntityId::from("missing"), ParticipationStatus::CheckedIn)
            .await;
        assert!(matches!(
            result,
            Err(EngineError::ParticipantNotFound(_))
        ));
    }
}
