use super::error::{ApiJson, ApiPath};
use crate::allocation::CategoryTag;
use crate::error::AppResult;
use crate::models::{HousingLock, RoomWithBeds};
use crate::services::housing_service::{AutoAssignResult, HousingStatus, UnassignResult};
use crate::AppState;
use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub participant_id: Uuid,
    pub room_id: Uuid,
    pub bed_number: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignRequest {
    pub participant_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoAssignRequest {
    pub category: CategoryTag,
}

pub async fn status(
    State(state): State<Arc<AppState>>,
    ApiPath(group_id): ApiPath<Uuid>,
) -> AppResult<Json<HousingStatus>> {
    Ok(Json(state.housing_service.status(group_id).await?))
}

pub async fn assign(
    State(state): State<Arc<AppState>>,
    ApiPath(group_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<AssignRequest>,
) -> AppResult<Json<RoomWithBeds>> {
    let room = state
        .housing_service
        .assign(group_id, body.participant_id, body.room_id, body.bed_number)
        .await?;
    Ok(Json(room))
}

pub async fn unassign(
    State(state): State<Arc<AppState>>,
    ApiPath(group_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UnassignRequest>,
) -> AppResult<Json<UnassignResult>> {
    Ok(Json(
        state
            .housing_service
            .unassign(group_id, body.participant_id)
            .await?,
    ))
}

pub async fn auto_assign(
    State(state): State<Arc<AppState>>,
    ApiPath(group_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<AutoAssignRequest>,
) -> AppResult<Json<AutoAssignResult>> {
    Ok(Json(
        state
            .housing_service
            .auto_assign(group_id, body.category)
            .await?,
    ))
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    ApiPath(group_id): ApiPath<Uuid>,
) -> AppResult<Json<HousingLock>> {
    Ok(Json(state.housing_service.submit(group_id).await?))
}

pub async fn request_unlock(
    State(state): State<Arc<AppState>>,
    ApiPath(group_id): ApiPath<Uuid>,
) -> AppResult<Json<HousingLock>> {
    Ok(Json(state.housing_service.request_unlock(group_id).await?))
}

pub async fn approve_unlock(
    State(state): State<Arc<AppState>>,
    ApiPath(group_id): ApiPath<Uuid>,
) -> AppResult<Json<HousingLock>> {
    Ok(Json(state.housing_service.approve_unlock(group_id).await?))
}
