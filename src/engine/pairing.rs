//! Round pairing generation.
//!
//! The random method shuffles the checked-in roster (Fisher-Yates via
//! `rand`) and pairs consecutive players, assigning dense table numbers.
//! An odd roster leaves the last player with a bye. The random source is
//! injected so tests can pin a seed; production callers pass a fresh
//! entropy-seeded RNG.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use super::{Engine, EngineError};
use crate::models::{
    Pairing, PairingMethod, Participant, ParticipationStatus, Round, TournamentId,
};
use crate::storage::TournamentStore;

impl Engine {
    /// Generate pairings for one round of a tournament.
    ///
    /// Creates the round record, writes one pairing per table, then flips
    /// the round to in-progress. Requires at least two checked-in
    /// participants. Generating the same round number twice is not guarded
    /// against; callers drive rounds monotonically.
    pub async fn generate_pairings<R>(
        &self,
        tournament_id: &TournamentId,
        round_number: u32,
        method: PairingMethod,
        mut rng: R,
    ) -> Result<Vec<Pairing>, EngineError>
    where
        R: Rng + Send,
    {
        if round_number == 0 {
            return Err(EngineError::InvalidRoundNumber(round_number));
        }
        match method {
            PairingMethod::Random => {}
            other => return Err(EngineError::UnsupportedPairingMethod(other)),
        }

        let mut eligible: Vec<Participant> = self
            .store()
            .participants_by_status(tournament_id, ParticipationStatus::CheckedIn)
            .await?;

        if eligible.len() < 2 {
            return Err(EngineError::InsufficientParticipants {
                count: eligible.len(),
            });
        }

        let mut round = Round::new(tournament_id.clone(), round_number);
        self.store().insert_round(&round).await?;

        eligible.shuffle(&mut rng);

        let pairings: Vec<Pairing> = eligible
            .chunks(2)
            .enumerate()
            .map(|(i, pair)| {
                Pairing::new(
                    tournament_id.clone(),
                    round.id.clone(),
                    (i + 1) as u32,
                    pair[0].id.clone(),
                    pair.get(1).map(|p| p.id.clone()),
                )
            })
            .collect();

        self.store().insert_pairings(&pairings).await?;

        round.start();
        self.store().update_round(&round).await?;

        info!(
            tournament = %tournament_id,
            round = round_number,
            tables = pairings.len(),
            players = eligible.len(),
            "generated round pairings"
        );

        Ok(pairings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityId, MatchWinner, RoundStatus};
    use crate::storage::{JsonlStore, StorageConfig, TournamentStore};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn engine_with_players(temp_dir: &TempDir, checked_in: usize) -> (Engine, Vec<EntityId>) {
        let store = Arc::new(JsonlStore::new(StorageConfig::new(
            temp_dir.path().to_path_buf(),
        )));
        let tournament = EntityId::from("gt-heat-3");

        let mut ids = Vec::new();
        for i in 0..checked_in {
            let mut p = Participant::new(
                tournament.clone(),
                EntityId::from(format!("user-{}", i).as_str()),
                format!("Player{}", i),
                "Test".to_string(),
            );
            p.set_status(ParticipationStatus::CheckedIn);
            ids.push(p.id.clone());
            store.insert_participant(&p).await.unwrap();
        }

        (Engine::new(store), ids)
    }

    fn tournament_id() -> EntityId {
        EntityId::from("gt-heat-3")
    }

    #[tokio::test]
    async fn test_pairings_partition_the_roster() {
        let temp_dir = TempDir::new().unwrap();
        let (engine, ids) = engine_with_players(&temp_dir, 8).await;

        let pairings = engine
            .generate_pairings(
                &tournament_id(),
                1,
                PairingMethod::Random,
                StdRng::seed_from_u64(7),
            )
            .await
            .unwrap();

        assert_eq!(pairings.len(), 4);

        let mut seen = BTreeSet::new();
        for p in &pairings {
            assert!(seen.insert(p.player1_id.as_str().to_string()));
            let p2 = p.player2_id.as_ref().expect("even roster has no bye");
            assert!(seen.insert(p2.as_str().to_string()));
        }
        let expected: BTreeSet<String> =
            ids.iter().map(|id| id.as_str().to_string()).collect();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn test_odd_roster_gets_exactly_one_bye() {
        let temp_dir = TempDir::new().unwrap();
        let (engine, _) = engine_with_players(&temp_dir, 5).await;

        let pairings = engine
            .generate_pairings(
                &tournament_id(),
                1,
                PairingMethod::Random,
                StdRng::seed_from_u64(7),
            )
            .await
            .unwrap();

        assert_eq!(pairings.len(), 3);

        let byes: Vec<_> = pairings.iter().filter(|p| p.is_bye()).collect();
        assert_eq!(byes.len(), 1);
        let bye = byes[0];
        assert_eq!(bye.winner, Some(MatchWinner::Player1));
        assert!(bye.player1_score.is_none());
        assert!(bye.player2_score.is_none());
        // The bye lands on the last table
        assert_eq!(bye.table_number, 3);
    }

    #[tokio::test]
    async fn test_table_numbers_dense_from_one() {
        let temp_dir = TempDir::new().unwrap();
        let (engine, _) = engine_with_players(&temp_dir, 9).await;

        let pairings = engine
            .generate_pairings(
                &tournament_id(),
                1,
                PairingMethod::Random,
                StdRng::seed_from_u64(42),
            )
            .await
            .unwrap();

        let tables: Vec<u32> = pairings.iter().map(|p| p.table_number).collect();
        assert_eq!(tables, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_only_checked_in_players_are_paired() {
        let temp_dir = TempDir::new().unwrap();
        let (engine, _) = engine_with_players(&temp_dir, 4).await;

        // Registered but never checked in; must not appear in pairings
        let spectator = Participant::new(
            tournament_id(),
            EntityId::from("user-spectator"),
            "Sam".to_string(),
            "Spectator".to_string(),
        );
        engine.store().insert_participant(&spectator).await.unwrap();

        let pairings = engine
            .generate_pairings(
                &tournament_id(),
                1,
                PairingMethod::Random,
                StdRng::seed_from_u64(7),
            )
            .await
            .unwrap();

        assert_eq!(pairings.len(), 2);
        assert!(pairings.iter().all(|p| !p.involves(&spectator.id)));
    }

    #[tokio::test]
    async fn test_insufficient_participants() {
        let temp_dir = TempDir::new().unwrap();
        let (engine, _) = engine_with_players(&temp_dir, 1).await;

        let result = engine
            .generate_pairings(
                &tournament_id(),
                1,
                PairingMethod::Random,
                StdRng::seed_from_u64(7),
            )
            .await;

        assert!(matches!(
            result,
            Err(EngineError::InsufficientParticipants { count: 1 })
        ));
    }

    #[tokio::test]
    async fn test_round_zero_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let (engine, _) = engine_with_players(&temp_dir, 4).await;

        let result = engine
            .generate_pairings(
                &tournament_id(),
                0,
                PairingMethod::Random,
                StdRng::seed_from_u64(7),
            )
            .await;

        assert!(matches!(result, Err(EngineError::InvalidRoundNumber(0))));
    }

    #[tokio::test]
    async fn test_unimplemented_methods_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let (engine, _) = engine_with_players(&temp_dir, 4).await;

        for method in [PairingMethod::Swiss, PairingMethod::Manual] {
            let result = engine
                .generate_pairings(&tournament_id(), 1, method, StdRng::seed_from_u64(7))
                .await;
            assert!(matches!(
                result,
                Err(EngineError::UnsupportedPairingMethod(m)) if m == method
            ));
        }
    }

    #[tokio::test]
    async fn test_same_seed_same_pairings() {
        let temp_a = TempDir::new().unwrap();
        let temp_b = TempDir::new().unwrap();
        let (engine_a, _) = engine_with_players(&temp_a, 6).await;
        let (engine_b, _) = engine_with_players(&temp_b, 6).await;

        let a = engine_a
            .generate_pairings(
                &tournament_id(),
                1,
                PairingMethod::Random,
                StdRng::seed_from_u64(99),
            )
            .await
            .unwrap();
        let b = engine_b
            .generate_pairings(
                &tournament_id(),
                1,
                PairingMethod::Random,
                StdRng::seed_from_u64(99),
            )
            .await
            .unwrap();

        let layout =
            |ps: &[Pairing]| -> Vec<(String, Option<String>)> {
                ps.iter()
                    .map(|p| {
                        (
                            p.player1_id.as_str().to_string(),
                            p.player2_id.as_ref().map(|id| id.as_str().to_string()),
                        )
                    })
                    .collect()
            };
        assert_eq!(layout(&a), layout(&b));
    }

    #[tokio::test]
    async fn test_round_record_created_in_progress() {
        let temp_dir = TempDir::new().unwrap();
        let (engine, _) = engine_with_players(&temp_dir, 4).await;

        engine
            .generate_pairings(
                &tournament_id(),
                1,
                PairingMethod::Random,
                StdRng::seed_from_u64(7),
            )
            .await
            .unwrap();

        let round = engine
            .store()
            .round_by_number(&tournament_id(), 1)
            .await
            .unwrap()
            .expect("round record created");
        assert_eq!(round.status, RoundStatus::InProgress);
        assert!(round.end_time.is_none());
    }
}
