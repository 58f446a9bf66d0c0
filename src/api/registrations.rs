use super::error::{ApiJson, ApiPath};
use crate::billing::{ParticipantCounts, PriceQuote};
use crate::error::AppResult;
use crate::models::{
    Gender, GroupRegistration, HousingType, IndividualRegistration, Participant, ParticipantType,
    Room, RoomType, RoomWithBeds,
};
use crate::services::registration_service::{
    GroupRegistrationInput, IndividualRegistrationInput, ParticipantInput, RoomInput,
};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRegistrationRequest {
    pub group_name: String,
    pub leader_name: String,
    pub leader_email: String,
    pub housing_type: HousingType,
    #[serde(flatten)]
    pub counts: ParticipantCounts,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualRegistrationRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
    pub gender: Gender,
    pub participant_type: ParticipantType,
    pub housing_type: HousingType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse<T> {
    pub registration: T,
    pub quote: PriceQuote,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRequest {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub gender: Gender,
    pub participant_type: ParticipantType,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRequest {
    pub building: String,
    pub name: String,
    pub capacity: i32,
    pub gender: Gender,
    pub room_type: RoomType,
    pub group_registration_id: Option<Uuid>,
    #[serde(default)]
    pub display_order: i32,
}

pub async fn create_group(
    State(state): State<Arc<AppState>>,
    ApiPath(event_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<GroupRegistrationRequest>,
) -> AppResult<(StatusCode, Json<RegistrationResponse<GroupRegistration>>)> {
    let (registration, quote) = state
        .registration_service
        .create_group_registration(
            event_id,
            GroupRegistrationInput {
                group_name: body.group_name,
                leader_name: body.leader_name,
                leader_email: body.leader_email,
                housing_type: body.housing_type,
                counts: body.counts,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse { registration, quote }),
    ))
}

pub async fn list_groups(
    State(state): State<Arc<AppState>>,
    ApiPath(event_id): ApiPath<Uuid>,
) -> AppResult<Json<Vec<GroupRegistration>>> {
    Ok(Json(
        state.registration_service.list_group_registrations(event_id).await?,
    ))
}

pub async fn get_group(
    State(state): State<Arc<AppState>>,
    ApiPath(registration_id): ApiPath<Uuid>,
) -> AppResult<Json<GroupRegistration>> {
    Ok(Json(
        state
            .registration_service
            .get_group_registration(registration_id)
            .await?,
    ))
}

pub async fn get_individual(
    State(state): State<Arc<AppState>>,
    ApiPath(registration_id): ApiPath<Uuid>,
) -> AppResult<Json<IndividualRegistration>> {
    Ok(Json(
        state
            .registration_service
            .get_individual_registration(registration_id)
            .await?,
    ))
}

pub async fn create_individual(
    State(state): State<Arc<AppState>>,
    ApiPath(event_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<IndividualRegistrationRequest>,
) -> AppResult<(StatusCode, Json<RegistrationResponse<IndividualRegistration>>)> {
    let (registration, quote) = state
        .registration_service
        .create_individual_registration(
            event_id,
            IndividualRegistrationInput {
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                age: body.age,
                gender: body.gender,
                participant_type: body.participant_type,
                housing_type: body.housing_type,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse { registration, quote }),
    ))
}

pub async fn add_participant(
    State(state): State<Arc<AppState>>,
    ApiPath(group_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<ParticipantRequest>,
) -> AppResult<(StatusCode, Json<Participant>)> {
    let participant = state
        .registration_service
        .add_participant(
            group_id,
            ParticipantInput {
                first_name: body.first_name,
                last_name: body.last_name,
                age: body.age,
                gender: body.gender,
                participant_type: body.participant_type,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(participant)))
}

pub async fn list_participants(
    State(state): State<Arc<AppState>>,
    ApiPath(group_id): ApiPath<Uuid>,
) -> AppResult<Json<Vec<Participant>>> {
    Ok(Json(state.registration_service.list_participants(group_id).await?))
}

pub async fn create_room(
    State(state): State<Arc<AppState>>,
    ApiPath(event_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<RoomRequest>,
) -> AppResult<(StatusCode, Json<Room>)> {
    let room = state
        .registration_service
        .create_room(
            event_id,
            RoomInput {
                building: body.building,
                name: body.name,
                capacity: body.capacity,
                gender: body.gender,
                room_type: body.room_type,
                group_registration_id: body.group_registration_id,
                display_order: body.display_order,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(room)))
}

pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
    ApiPath(event_id): ApiPath<Uuid>,
) -> AppResult<Json<Vec<RoomWithBeds>>> {
    Ok(Json(state.registration_service.list_rooms(event_id).await?))
}
