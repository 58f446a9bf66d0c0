use super::error::{ApiJson, ApiPath};
use crate::billing::{ParticipantCounts, PriceQuote};
use crate::error::AppResult;
use crate::models::{Event, EventPricing, HousingType};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub organization_id: Uuid,
    pub name: String,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    pub youth_regular_price: Decimal,
    pub chaperone_regular_price: Decimal,
    #[serde(default)]
    pub clergy_regular_price: Decimal,
    pub on_campus_youth_price: Option<Decimal>,
    pub on_campus_chaperone_price: Option<Decimal>,
    pub off_campus_youth_price: Option<Decimal>,
    pub off_campus_chaperone_price: Option<Decimal>,
    pub day_pass_youth_price: Option<Decimal>,
    pub day_pass_chaperone_price: Option<Decimal>,
    #[serde(default)]
    pub deposit_percent: Decimal,
}

impl PricingRequest {
    fn into_pricing(self, event_id: Uuid) -> EventPricing {
        EventPricing {
            event_id,
            youth_regular_price: self.youth_regular_price,
            chaperone_regular_price: self.chaperone_regular_price,
            clergy_regular_price: self.clergy_regular_price,
            on_campus_youth_price: self.on_campus_youth_price,
            on_campus_chaperone_price: self.on_campus_chaperone_price,
            off_campus_youth_price: self.off_campus_youth_price,
            off_campus_chaperone_price: self.off_campus_chaperone_price,
            day_pass_youth_price: self.day_pass_youth_price,
            day_pass_chaperone_price: self.day_pass_chaperone_price,
            deposit_percent: self.deposit_percent,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub housing_type: HousingType,
    #[serde(flatten)]
    pub counts: ParticipantCounts,
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<Event>)> {
    let event = state
        .registration_service
        .create_event(body.organization_id, &body.name, body.starts_on, body.ends_on)
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    ApiPath(event_id): ApiPath<Uuid>,
) -> AppResult<Json<Event>> {
    Ok(Json(state.registration_service.get_event(event_id).await?))
}

pub async fn put_pricing(
    State(state): State<Arc<AppState>>,
    ApiPath(event_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<PricingRequest>,
) -> AppResult<Json<EventPricing>> {
    let pricing = state
        .registration_service
        .upsert_pricing(body.into_pricing(event_id))
        .await?;
    Ok(Json(pricing))
}

pub async fn get_pricing(
    State(state): State<Arc<AppState>>,
    ApiPath(event_id): ApiPath<Uuid>,
) -> AppResult<Json<EventPricing>> {
    Ok(Json(state.registration_service.get_pricing(event_id).await?))
}

pub async fn quote(
    State(state): State<Arc<AppState>>,
    ApiPath(event_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<QuoteRequest>,
) -> AppResult<Json<PriceQuote>> {
    let quote = state
        .registration_service
        .quote(event_id, &body.counts, body.housing_type)
        .await?;
    Ok(Json(quote))
}
