//! # Blackstone
//!
//! A tabletop wargaming tournament engine.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (participants, rounds, pairings, standings)
//! - **storage**: Persistence boundary (store trait, JSONL document store)
//! - **engine**: Pairing generation, result recording, round lifecycle, standings
//! - **roster**: Registration, check-in, and army-list management
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod config;
pub mod engine;
pub mod models;
pub mod roster;
pub mod storage;

pub use models::*;
