use crate::allocation::meal_balance::{self, MealGroupLoad};
use crate::allocation::{AssignOrder, BalanceReport};
use crate::error::{AppError, AppResult};
use crate::models::meal_group::is_valid_color_hex;
use crate::models::{MealGroup, MealGroupAssignment, RegistrationRef};
use crate::repositories::{EventRepository, MealGroupRepository, NewMealGroup, RegistrationRepository};
use crate::services::AuditTrailService;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealUnassignResult {
    pub unassigned: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealAutoAssignResult {
    pub assigned: usize,
    pub skipped: usize,
    pub skipped_registrations: Vec<RegistrationRef>,
}

/// Meal-group ("poros") management and balancing for an event
pub struct MealGroupService {
    pool: PgPool,
    event_repo: Arc<EventRepository>,
    registration_repo: Arc<RegistrationRepository>,
    meal_group_repo: Arc<MealGroupRepository>,
    audit: Arc<AuditTrailService>,
}

impl MealGroupService {
    pub fn new(
        pool: PgPool,
        event_repo: Arc<EventRepository>,
        registration_repo: Arc<RegistrationRepository>,
        meal_group_repo: Arc<MealGroupRepository>,
        audit: Arc<AuditTrailService>,
    ) -> Self {
        Self {
            pool,
            event_repo,
            registration_repo,
            meal_group_repo,
            audit,
        }
    }

    async fn ensure_event(&self, event_id: Uuid) -> AppResult<()> {
        self.event_repo
            .find_by_id(event_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))
    }

    pub async fn create(&self, new: NewMealGroup) -> AppResult<MealGroup> {
        if new.name.trim().is_empty() {
            return Err(AppError::Validation("Meal group name is required".into()));
        }
        if !is_valid_color_hex(&new.color_hex) {
            return Err(AppError::Validation(format!(
                "Color must be #RRGGBB, got {}",
                new.color_hex
            )));
        }
        if new.capacity <= 0 {
            return Err(AppError::Validation("Capacity must be positive".into()));
        }
        self.ensure_event(new.event_id).await?;

        let group = self.meal_group_repo.create(&new).await?;
        info!("Created meal group: event={}, id={}, name={}", group.event_id, group.id, group.name);
        Ok(group)
    }

    /// Meal groups of an event with their computed sizes
    pub async fn list(&self, event_id: Uuid) -> AppResult<Vec<MealGroup>> {
        self.ensure_event(event_id).await?;
        let mut conn = self.pool.acquire().await?;
        Ok(self.meal_group_repo.list_by_event(&mut conn, event_id).await?)
    }

    /// Manually place a registration into a meal group
    pub async fn assign(
        &self,
        event_id: Uuid,
        meal_group_id: Uuid,
        registration: RegistrationRef,
    ) -> AppResult<MealGroupAssignment> {
        info!(
            "Assigning meal group: event={}, meal_group={}, {}",
            event_id, meal_group_id, registration
        );

        let mut tx = self.pool.begin().await?;
        let group = self
            .meal_group_repo
            .find_in_event_for_update(&mut tx, meal_group_id, event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Meal group {} not found", meal_group_id)))?;
        let headcount = self
            .registration_repo
            .headcount_for_update(&mut tx, event_id, registration)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} not found", registration)))?;

        if let Some(existing) = self.meal_group_repo.find_assignment(&mut tx, registration).await? {
            return Err(AppError::Conflict(format!(
                "{} is already assigned to meal group {}",
                registration, existing.meal_group_id
            )));
        }

        meal_balance::check_capacity(&group, headcount)?;

        let assignment = self
            .meal_group_repo
            .create_assignment(&mut tx, meal_group_id, registration)
            .await?;
        tx.commit().await?;

        self.audit.log_meal_group_assigned(event_id, &assignment).await;
        Ok(assignment)
    }

    /// Remove a registration from its meal group; idempotent
    pub async fn unassign(
        &self,
        event_id: Uuid,
        registration: RegistrationRef,
    ) -> AppResult<MealUnassignResult> {
        info!("Unassigning meal group: event={}, {}", event_id, registration);

        let mut tx = self.pool.begin().await?;
        self.registration_repo
            .headcount_for_update(&mut tx, event_id, registration)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} not found", registration)))?;

        let deleted = self.meal_group_repo.delete_assignment(&mut tx, registration).await?;
        tx.commit().await?;

        if let Some(assignment) = &deleted {
            self.audit
                .log_meal_group_unassigned(event_id, registration, assignment.meal_group_id)
                .await;
        }

        Ok(MealUnassignResult {
            unassigned: deleted.is_some(),
        })
    }

    /// Greedy smallest-group placement of every unassigned registration
    pub async fn auto_assign(
        &self,
        event_id: Uuid,
        order: AssignOrder,
    ) -> AppResult<MealAutoAssignResult> {
        info!("Auto-assigning meal groups: event={}, order={:?}", event_id, order);
        self.ensure_event(event_id).await?;

        let mut tx = self.pool.begin().await?;
        self.meal_group_repo.lock_event_groups(&mut tx, event_id).await?;
        let groups = self.meal_group_repo.list_by_event(&mut tx, event_id).await?;
        let pending = self.meal_group_repo.list_pending(&mut tx, event_id).await?;

        let loads: Vec<MealGroupLoad> = groups.iter().map(MealGroupLoad::from).collect();
        let plan = meal_balance::plan_auto_assign(&loads, &pending, order);

        for placement in &plan.placements {
            self.meal_group_repo
                .create_assignment(&mut tx, placement.meal_group_id, placement.registration)
                .await?;
        }
        tx.commit().await?;

        info!(
            "Meal auto-assign complete: event={}, assigned={}, skipped={}",
            event_id,
            plan.placements.len(),
            plan.skipped.len()
        );
        self.audit.log_meal_groups_auto_assigned(event_id, &plan).await;

        Ok(MealAutoAssignResult {
            assigned: plan.placements.len(),
            skipped: plan.skipped.len(),
            skipped_registrations: plan.skipped,
        })
    }

    /// Balance dashboard over the active meal groups
    pub async fn balance(&self, event_id: Uuid) -> AppResult<BalanceReport> {
        let groups = self.list(event_id).await?;
        Ok(meal_balance::balance_report(&groups))
    }
}
