//! Rally Backend Library
//!
//! Conference registration backend: housing allocation, meal-group balancing,
//! pricing, payment ledger and liability forms. Exposed for the binary and tests.

pub mod allocation;
pub mod api;
pub mod billing;
pub mod config;
pub mod database;
pub mod documents;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};

use database::Database;
use repositories::*;
use services::*;
use std::sync::Arc;

/// Application state containing all services
pub struct AppState {
    pub database: Database,
    pub registration_service: Arc<RegistrationService>,
    pub housing_service: Arc<HousingService>,
    pub meal_group_service: Arc<MealGroupService>,
    pub payment_service: Arc<PaymentService>,
    pub liability_form_service: Arc<LiabilityFormService>,
    pub audit: Arc<AuditTrailService>,
}

impl AppState {
    /// Wire repositories and services over one pool
    pub fn new(pool: sqlx::PgPool, audit: AuditTrailService) -> Self {
        let database = Database::new(pool.clone());
        let audit = Arc::new(audit);

        let event_repo = Arc::new(EventRepository::new(pool.clone()));
        let registration_repo = Arc::new(RegistrationRepository::new(pool.clone()));
        let participant_repo = Arc::new(ParticipantRepository::new(pool.clone()));
        let room_repo = Arc::new(RoomRepository::new(pool.clone()));
        let lock_repo = Arc::new(HousingLockRepository::new(pool.clone()));
        let meal_group_repo = Arc::new(MealGroupRepository::new(pool.clone()));
        let payment_repo = Arc::new(PaymentRepository::new(pool.clone()));
        let form_repo = Arc::new(LiabilityFormRepository::new(pool.clone()));

        Self {
            database,
            registration_service: Arc::new(RegistrationService::new(
                pool.clone(),
                event_repo.clone(),
                registration_repo.clone(),
                participant_repo.clone(),
                room_repo.clone(),
                payment_repo.clone(),
            )),
            housing_service: Arc::new(HousingService::new(
                pool.clone(),
                registration_repo.clone(),
                participant_repo.clone(),
                room_repo,
                lock_repo,
                audit.clone(),
            )),
            meal_group_service: Arc::new(MealGroupService::new(
                pool.clone(),
                event_repo.clone(),
                registration_repo,
                meal_group_repo,
                audit.clone(),
            )),
            payment_service: Arc::new(PaymentService::new(pool, payment_repo, audit.clone())),
            liability_form_service: Arc::new(LiabilityFormService::new(
                event_repo,
                participant_repo,
                form_repo,
            )),
            audit,
        }
    }
}
