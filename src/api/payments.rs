use super::error::{ApiJson, ApiPath};
use crate::error::AppResult;
use crate::models::{Payment, PaymentBalance, PaymentKind};
use crate::services::payment_service::PaymentInput;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

fn default_kind() -> PaymentKind {
    PaymentKind::Payment
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[serde(default = "default_kind")]
    pub kind: PaymentKind,
    pub amount: Decimal,
    pub method: String,
    pub note: Option<String>,
}

pub async fn record(
    State(state): State<Arc<AppState>>,
    ApiPath(registration_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<PaymentRequest>,
) -> AppResult<(StatusCode, Json<PaymentBalance>)> {
    let balance = state
        .payment_service
        .record_payment(
            registration_id,
            PaymentInput {
                kind: body.kind,
                amount: body.amount,
                method: body.method,
                note: body.note,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(balance)))
}

pub async fn history(
    State(state): State<Arc<AppState>>,
    ApiPath(registration_id): ApiPath<Uuid>,
) -> AppResult<Json<Vec<Payment>>> {
    Ok(Json(state.payment_service.history(registration_id).await?))
}

pub async fn balance(
    State(state): State<Arc<AppState>>,
    ApiPath(registration_id): ApiPath<Uuid>,
) -> AppResult<Json<PaymentBalance>> {
    Ok(Json(state.payment_service.balance(registration_id).await?))
}
