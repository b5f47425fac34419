//! Round, pairing, and standings endpoints.

use axum::extract::{Path, State};
use axum::Json;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::engine::PairingView;
use crate::models::{EntityId, Pairing, PairingMethod, Round, Standing};

#[derive(Debug, Deserialize)]
pub struct GeneratePairingsRequest {
    #[serde(default)]
    pub method: Option<PairingMethod>,
}

#[derive(Debug, Serialize)]
pub struct PairingsResponse {
    pub pairings: Vec<Pairing>,
}

pub async fn generate_round_pairings(
    State(state): State<AppState>,
    Path((tournament_id, round_number)): Path<(String, u32)>,
    Json(request): Json<GeneratePairingsRequest>,
) -> Result<Json<PairingsResponse>, ApiError> {
    let method = request.method.unwrap_or(state.default_pairing_method);
    let pairings = state
        .engine
        .generate_pairings(
            &EntityId::from(tournament_id.as_str()),
            round_number,
            method,
            StdRng::from_entropy(),
        )
        .await?;

    Ok(Json(PairingsResponse { pairings }))
}

#[derive(Debug, Serialize)]
pub struct RoundPairingsResponse {
    pub pairings: Vec<PairingView>,
}

pub async fn get_round_pairings(
    State(state): State<AppState>,
    Path((tournament_id, round_number)): Path<(String, u32)>,
) -> Result<Json<RoundPairingsResponse>, ApiError> {
    let pairings = state
        .engine
        .get_round_pairings(&EntityId::from(tournament_id.as_str()), round_number)
        .await?;

    Ok(Json(RoundPairingsResponse { pairings }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResultRequest {
    pub player1_score: i64,
    pub player2_score: i64,
}

#[derive(Debug, Serialize)]
pub struct RecordResultResponse {
    pub pairing: Pairing,
}

pub async fn record_result(
    State(state): State<AppState>,
    Path(pairing_id): Path<String>,
    Json(request): Json<RecordResultRequest>,
) -> Result<Json<RecordResultResponse>, ApiError> {
    let pairing = state
        .engine
        .record_match_result(
            &EntityId::from(pairing_id.as_str()),
            request.player1_score,
            request.player2_score,
        )
        .await?;

    Ok(Json(RecordResultResponse { pairing }))
}

#[derive(Debug, Serialize)]
pub struct CompleteRoundResponse {
    pub round: Round,
}

pub async fn complete_round(
    State(state): State<AppState>,
    Path(round_id): Path<String>,
) -> Result<Json<CompleteRoundResponse>, ApiError> {
    let round = state
        .engine
        .complete_round(&EntityId::from(round_id.as_str()))
        .await?;

    Ok(Json(CompleteRoundResponse { round }))
}

#[derive(Debug, Serialize)]
pub struct PlacingsResponse {
    pub placings: Vec<Standing>,
}

pub async fn get_placings(
    State(state): State<AppState>,
    Path(tournament_id): Path<String>,
) -> Result<Json<PlacingsResponse>, ApiError> {
    let placings = state
        .engine
        .get_tournament_placings(&EntityId::from(tournament_id.as_str()))
        .await?;

    Ok(Json(PlacingsResponse { placings }))
}
