//! Roster endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{EntityId, Participant, ParticipationStatus};
use crate::roster::PlayerDetails;

#[derive(Debug, Serialize)]
pub struct RosterResponse {
    pub participants: Vec<Participant>,
}

pub async fn list_roster(
    State(state): State<AppState>,
    Path(tournament_id): Path<String>,
) -> Result<Json<RosterResponse>, ApiError> {
    let participants = state
        .roster
        .roster(&EntityId::from(tournament_id.as_str()))
        .await?;

    Ok(Json(RosterResponse { participants }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddParticipantRequest {
    /// When present, registers this user; otherwise adds a manual entry
    pub user_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub team_name: Option<String>,
    pub faction: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ParticipantResponse {
    pub participant: Participant,
}

pub async fn add_participant(
    State(state): State<AppState>,
    Path(tournament_id): Path<String>,
    Json(request): Json<AddParticipantRequest>,
) -> Result<Json<ParticipantResponse>, ApiError> {
    let tournament_id = EntityId::from(tournament_id.as_str());

    let mut details = PlayerDetails::new(request.first_name, request.last_name);
    if let Some(team_name) = request.team_name {
        details = details.with_team_name(team_name);
    }
    if let Some(faction) = request.faction {
        details = details.with_faction(faction);
    }

    let participant = match request.user_id {
        Some(user_id) => {
            state
                .roster
                .register(&tournament_id, &EntityId::from(user_id.as_str()), details)
                .await?
        }
        None => state.roster.add_participant(&tournament_id, details).await?,
    };

    Ok(Json(ParticipantResponse { participant }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResponse {
    pub checked_in: usize,
}

pub async fn check_in_all(
    State(state): State<AppState>,
    Path(tournament_id): Path<String>,
) -> Result<Json<CheckInResponse>, ApiError> {
    let checked_in = state
        .roster
        .check_in_all(&EntityId::from(tournament_id.as_str()))
        .await?;

    Ok(Json(CheckInResponse { checked_in }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitListRequest {
    pub army_list: String,
}

pub async fn submit_army_list(
    State(state): State<AppState>,
    Path(participant_id): Path<String>,
    Json(request): Json<SubmitListRequest>,
) -> Result<Json<ParticipantResponse>, ApiError> {
    let participant = state
        .roster
        .submit_army_list(&EntityId::from(participant_id.as_str()), request.army_list)
        .await?;

    Ok(Json(ParticipantResponse { participant }))
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: ParticipationStatus,
}

pub async fn set_status(
    State(state): State<AppState>,
    Path(participant_id): Path<String>,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<ParticipantResponse>, ApiError> {
    let participant = state
        .roster
        .set_status(&EntityId::from(participant_id.as_str()), request.status)
        .await?;

    Ok(Json(ParticipantResponse { participant }))
}

#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub removed: bool,
}

pub async fn remove_participant(
    State(state): State<AppState>,
    Path(participant_id): Path<String>,
) -> Result<Json<RemoveResponse>, ApiError> {
    state
        .roster
        .remove(&EntityId::from(participant_id.as_str()))
        .await?;

    Ok(Json(RemoveResponse { removed: true }))
}
