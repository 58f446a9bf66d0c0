use super::error::{ApiJson, ApiPath, OptionalApiJson};
use crate::allocation::{AssignOrder, BalanceReport};
use crate::error::{AppError, AppResult};
use crate::models::{MealGroup, MealGroupAssignment, RegistrationRef};
use crate::repositories::NewMealGroup;
use crate::services::meal_group_service::{MealAutoAssignResult, MealUnassignResult};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealGroupRequest {
    pub name: String,
    pub color_hex: String,
    pub capacity: i32,
    pub breakfast_time: Option<String>,
    pub lunch_time: Option<String>,
    pub dinner_time: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i32,
}

/// Identifies one registration by either of its id columns
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationIds {
    pub group_registration_id: Option<Uuid>,
    pub individual_registration_id: Option<Uuid>,
}

impl RegistrationIds {
    pub fn registration(&self) -> AppResult<RegistrationRef> {
        RegistrationRef::from_ids(self.group_registration_id, self.individual_registration_id)
            .ok_or_else(|| {
                AppError::Validation(
                    "Exactly one of groupRegistrationId or individualRegistrationId is required"
                        .into(),
                )
            })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignMealGroupRequest {
    pub meal_group_id: Uuid,
    #[serde(flatten)]
    pub ids: RegistrationIds,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealAutoAssignRequest {
    #[serde(default)]
    pub order: AssignOrder,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    ApiPath(event_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<CreateMealGroupRequest>,
) -> AppResult<(StatusCode, Json<MealGroup>)> {
    let group = state
        .meal_group_service
        .create(NewMealGroup {
            event_id,
            name: body.name.trim().to_string(),
            color_hex: body.color_hex,
            capacity: body.capacity,
            breakfast_time: body.breakfast_time,
            lunch_time: body.lunch_time,
            dinner_time: body.dinner_time,
            is_active: body.is_active,
            display_order: body.display_order,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    ApiPath(event_id): ApiPath<Uuid>,
) -> AppResult<Json<Vec<MealGroup>>> {
    Ok(Json(state.meal_group_service.list(event_id).await?))
}

pub async fn assign(
    State(state): State<Arc<AppState>>,
    ApiPath(event_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<AssignMealGroupRequest>,
) -> AppResult<(StatusCode, Json<MealGroupAssignment>)> {
    let registration = body.ids.registration()?;
    let assignment = state
        .meal_group_service
        .assign(event_id, body.meal_group_id, registration)
        .await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

pub async fn unassign(
    State(state): State<Arc<AppState>>,
    ApiPath(event_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<RegistrationIds>,
) -> AppResult<Json<MealUnassignResult>> {
    let registration = body.registration()?;
    Ok(Json(
        state
            .meal_group_service
            .unassign(event_id, registration)
            .await?,
    ))
}

/// The body is optional; without one registrations go in creation order
pub async fn auto_assign(
    State(state): State<Arc<AppState>>,
    ApiPath(event_id): ApiPath<Uuid>,
    OptionalApiJson(body): OptionalApiJson<MealAutoAssignRequest>,
) -> AppResult<Json<MealAutoAssignResult>> {
    let order = body.map(|b| b.order).unwrap_or_default();
    Ok(Json(
        state
            .meal_group_service
            .auto_assign(event_id, order)
            .await?,
    ))
}

pub async fn balance(
    State(state): State<Arc<AppState>>,
    ApiPath(event_id): ApiPath<Uuid>,
) -> AppResult<Json<BalanceReport>> {
    Ok(Json(state.meal_group_service.balance(event_id).await?))
}
