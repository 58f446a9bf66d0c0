//! HTTP surface: routes, extractors and error responses

pub mod error;
pub mod events;
pub mod forms;
pub mod housing;
pub mod meal_groups;
pub mod payments;
pub mod registrations;

use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use error::{ApiJson, ApiPath, ErrorBody, OptionalApiJson};

/// Liveness check; does not touch the database
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Readiness check; 503 while the database is unreachable
pub async fn ready(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    match state.database.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(e) => {
            warn!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "message": "Database unavailable" })),
            )
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        // Events and pricing
        .route("/api/events", post(events::create_event))
        .route("/api/events/:event_id", get(events::get_event))
        .route(
            "/api/events/:event_id/pricing",
            get(events::get_pricing).put(events::put_pricing),
        )
        .route("/api/events/:event_id/pricing/quote", post(events::quote))
        // Registrations, participants and rooms
        .route(
            "/api/events/:event_id/registrations/group",
            get(registrations::list_groups).post(registrations::create_group),
        )
        .route(
            "/api/events/:event_id/registrations/individual",
            post(registrations::create_individual),
        )
        .route(
            "/api/registrations/group/:registration_id",
            get(registrations::get_group),
        )
        .route(
            "/api/registrations/individual/:registration_id",
            get(registrations::get_individual),
        )
        .route(
            "/api/groups/:group_id/participants",
            get(registrations::list_participants).post(registrations::add_participant),
        )
        .route(
            "/api/events/:event_id/rooms",
            get(registrations::list_rooms).post(registrations::create_room),
        )
        // Housing
        .route("/api/groups/:group_id/housing", get(housing::status))
        .route("/api/groups/:group_id/housing/assign", post(housing::assign))
        .route("/api/groups/:group_id/housing/unassign", post(housing::unassign))
        .route(
            "/api/groups/:group_id/housing/auto-assign",
            post(housing::auto_assign),
        )
        .route("/api/groups/:group_id/housing/submit", post(housing::submit))
        .route(
            "/api/groups/:group_id/housing/request-unlock",
            post(housing::request_unlock),
        )
        .route(
            "/api/groups/:group_id/housing/approve-unlock",
            post(housing::approve_unlock),
        )
        // Meal groups
        .route(
            "/api/events/:event_id/poros/meal-groups",
            get(meal_groups::list).post(meal_groups::create),
        )
        .route(
            "/api/events/:event_id/poros/meal-group-assignments",
            post(meal_groups::assign).delete(meal_groups::unassign),
        )
        .route(
            "/api/events/:event_id/poros/meal-groups/auto-assign",
            post(meal_groups::auto_assign),
        )
        .route(
            "/api/events/:event_id/poros/meal-groups/balance",
            get(meal_groups::balance),
        )
        // Payments
        .route(
            "/api/registrations/:registration_id/payments",
            get(payments::history).post(payments::record),
        )
        .route(
            "/api/registrations/:registration_id/balance",
            get(payments::balance),
        )
        // Liability forms
        .route("/api/events/:event_id/liability-forms", post(forms::submit))
        .route("/api/liability-forms/:form_id", get(forms::get))
        .route("/api/liability-forms/:form_id/document", get(forms::document))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
