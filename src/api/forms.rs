use super::error::{ApiJson, ApiPath};
use crate::documents::{LiabilityFormData, RenderFormat};
use crate::error::{AppError, AppResult};
use crate::models::{FormType, LiabilityForm};
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use http::{header, HeaderMap, HeaderValue, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFormRequest {
    pub participant_id: Option<Uuid>,
    pub form_type: FormType,
    pub data: LiabilityFormData,
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentQuery {
    pub format: Option<String>,
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    ApiPath(event_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<SubmitFormRequest>,
) -> AppResult<(StatusCode, Json<LiabilityForm>)> {
    let form = state
        .liability_form_service
        .submit(event_id, body.participant_id, body.form_type, body.data)
        .await?;
    Ok((StatusCode::CREATED, Json(form)))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    ApiPath(form_id): ApiPath<Uuid>,
) -> AppResult<Json<LiabilityForm>> {
    Ok(Json(state.liability_form_service.get(form_id).await?))
}

fn header_value(value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| AppError::Message(format!("Invalid header value: {}", e)))
}

/// Rendered document; honours `If-None-Match` against the content ETag
pub async fn document(
    State(state): State<Arc<AppState>>,
    ApiPath(form_id): ApiPath<Uuid>,
    Query(query): Query<DocumentQuery>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let format = match query.format.as_deref() {
        Some(raw) => raw.parse::<RenderFormat>()?,
        None => RenderFormat::default(),
    };

    let rendered = state.liability_form_service.render(form_id, format).await?;
    let etag = header_value(&rendered.etag)?;

    let not_modified = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').any(|tag| tag.trim() == rendered.etag || tag.trim() == "*"))
        .unwrap_or(false);

    if not_modified {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
    }

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, header_value(rendered.content_type)?),
            (header::ETAG, etag),
        ],
        rendered.bytes,
    )
        .into_response())
}
