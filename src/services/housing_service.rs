use crate::allocation::housing::{self, CategoryCount};
use crate::allocation::CategoryTag;
use crate::error::{AppError, AppResult};
use crate::models::{GroupRegistration, HousingLock, Participant, RoomWithBeds};
use crate::repositories::{
    HousingLockRepository, ParticipantRepository, RegistrationRepository, RoomRepository,
};
use crate::services::AuditTrailService;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Housing overview of one group
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HousingStatus {
    pub group_registration_id: Uuid,
    pub event_id: Uuid,
    pub lock: HousingLock,
    /// Rooms the group may use, in display order
    pub rooms: Vec<RoomWithBeds>,
    pub participants: Vec<Participant>,
    pub counts: Vec<CategoryCount>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignResult {
    pub unassigned: bool,
    pub participant: Participant,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoAssignResult {
    pub category: CategoryTag,
    pub assigned: usize,
    pub unplaced: usize,
}

/// Bed assignment for group registrations.
///
/// Every mutation runs in one transaction and takes row locks in the same
/// order: housing lock, participants, rooms.
pub struct HousingService {
    pool: PgPool,
    registration_repo: Arc<RegistrationRepository>,
    participant_repo: Arc<ParticipantRepository>,
    room_repo: Arc<RoomRepository>,
    lock_repo: Arc<HousingLockRepository>,
    audit: Arc<AuditTrailService>,
}

impl HousingService {
    pub fn new(
        pool: PgPool,
        registration_repo: Arc<RegistrationRepository>,
        participant_repo: Arc<ParticipantRepository>,
        room_repo: Arc<RoomRepository>,
        lock_repo: Arc<HousingLockRepository>,
        audit: Arc<AuditTrailService>,
    ) -> Self {
        Self {
            pool,
            registration_repo,
            participant_repo,
            room_repo,
            lock_repo,
            audit,
        }
    }

    async fn group(&self, group_id: Uuid) -> AppResult<GroupRegistration> {
        self.registration_repo
            .find_group(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group registration {} not found", group_id)))
    }

    /// Lock state, eligible rooms with beds and per-category counts
    pub async fn status(&self, group_id: Uuid) -> AppResult<HousingStatus> {
        let group = self.group(group_id).await?;
        let lock = self.lock_repo.find(group_id).await?;

        let mut conn = self.pool.acquire().await?;
        let participants = self.participant_repo.list_by_group(&mut conn, group_id).await?;
        let rooms: Vec<_> = self
            .room_repo
            .list_by_event(&mut conn, group.event_id)
            .await?
            .into_iter()
            .filter(|room| room.is_available_to(group_id))
            .collect();
        let room_ids: Vec<Uuid> = rooms.iter().map(|r| r.id).collect();
        let occupants = self.participant_repo.list_occupants(&mut conn, &room_ids).await?;

        let rooms = rooms
            .into_iter()
            .map(|room| RoomWithBeds::from_occupants(room, &occupants))
            .collect();
        let counts = housing::category_counts(&participants);

        Ok(HousingStatus {
            group_registration_id: group_id,
            event_id: group.event_id,
            lock,
            rooms,
            participants,
            counts,
        })
    }

    /// Put a participant of the group into one bed
    pub async fn assign(
        &self,
        group_id: Uuid,
        participant_id: Uuid,
        room_id: Uuid,
        bed_number: i32,
    ) -> AppResult<RoomWithBeds> {
        info!(
            "Assigning bed: group={}, participant={}, room={}, bed={}",
            group_id, participant_id, room_id, bed_number
        );
        let group = self.group(group_id).await?;

        let mut tx = self.pool.begin().await?;
        let lock = self.lock_repo.find_for_update(&mut tx, group_id).await?;
        let participant = self
            .participant_repo
            .find_in_group_for_update(&mut tx, participant_id, group_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Participant {} not found", participant_id)))?;
        let room = self
            .room_repo
            .find_in_event_for_update(&mut tx, room_id, group.event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Room {} not found", room_id)))?;

        let occupants = self.participant_repo.list_occupants(&mut tx, &[room.id]).await?;
        let current = RoomWithBeds::from_occupants(room.clone(), &occupants);
        housing::check_assignment(
            &participant,
            &room,
            bed_number,
            current.occupant(bed_number),
            &lock,
        )?;

        if participant.bed() != Some((room.id, bed_number)) {
            self.participant_repo
                .set_bed(&mut tx, participant.id, Some((room.id, bed_number)))
                .await?;
        }

        let occupants = self.participant_repo.list_occupants(&mut tx, &[room.id]).await?;
        tx.commit().await?;

        self.audit
            .log_bed_assigned(group.event_id, group_id, participant_id, room_id, bed_number)
            .await;

        Ok(RoomWithBeds::from_occupants(room, &occupants))
    }

    /// Clear a participant's bed. Already-unassigned participants succeed
    /// with `unassigned: false`.
    pub async fn unassign(&self, group_id: Uuid, participant_id: Uuid) -> AppResult<UnassignResult> {
        info!("Unassigning bed: group={}, participant={}", group_id, participant_id);
        let group = self.group(group_id).await?;

        let mut tx = self.pool.begin().await?;
        let lock = self.lock_repo.find_for_update(&mut tx, group_id).await?;
        let participant = self
            .participant_repo
            .find_in_group_for_update(&mut tx, participant_id, group_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Participant {} not found", participant_id)))?;

        housing::check_unassignment(&lock)?;

        let Some(previous) = participant.bed() else {
            tx.commit().await?;
            return Ok(UnassignResult {
                unassigned: false,
                participant,
            });
        };

        let participant = self.participant_repo.set_bed(&mut tx, participant_id, None).await?;
        tx.commit().await?;

        self.audit
            .log_bed_unassigned(group.event_id, group_id, participant_id, previous)
            .await;

        Ok(UnassignResult {
            unassigned: true,
            participant,
        })
    }

    /// First-fit placement of the group's unassigned participants of one category
    pub async fn auto_assign(&self, group_id: Uuid, category: CategoryTag) -> AppResult<AutoAssignResult> {
        info!("Auto-assigning housing: group={}, category={}", group_id, category);
        let group = self.group(group_id).await?;

        let mut tx = self.pool.begin().await?;
        let lock = self.lock_repo.find_for_update(&mut tx, group_id).await?;
        housing::check_unassignment(&lock)?;

        let participants = self
            .participant_repo
            .list_by_group_for_update(&mut tx, group_id)
            .await?;
        let rooms = self
            .room_repo
            .list_for_category_for_update(
                &mut tx,
                group.event_id,
                category.gender().as_str(),
                category.room_type().as_str(),
            )
            .await?;
        let room_ids: Vec<Uuid> = rooms.iter().map(|r| r.id).collect();
        let occupants = self.participant_repo.list_occupants(&mut tx, &room_ids).await?;
        let rooms: Vec<RoomWithBeds> = rooms
            .into_iter()
            .map(|room| RoomWithBeds::from_occupants(room, &occupants))
            .collect();

        let plan = housing::plan_auto_assign(group_id, category, &participants, &rooms);
        for placement in &plan.placements {
            self.participant_repo
                .set_bed(
                    &mut tx,
                    placement.participant_id,
                    Some((placement.room_id, placement.bed_number)),
                )
                .await?;
        }
        tx.commit().await?;

        info!(
            "Auto-assign complete: group={}, assigned={}, unplaced={}",
            group_id,
            plan.assigned(),
            plan.unplaced
        );
        self.audit
            .log_housing_auto_assigned(group.event_id, group_id, category, &plan)
            .await;

        Ok(AutoAssignResult {
            category,
            assigned: plan.assigned(),
            unplaced: plan.unplaced,
        })
    }

    /// Lock the group's housing
    pub async fn submit(&self, group_id: Uuid) -> AppResult<HousingLock> {
        self.transition(group_id, "housing_submitted", |lock, now| Ok(housing::submit(lock, now)))
            .await
    }

    /// Ask the organizer to reopen a locked group
    pub async fn request_unlock(&self, group_id: Uuid) -> AppResult<HousingLock> {
        self.transition(group_id, "housing_unlock_requested", housing::request_unlock)
            .await
    }

    /// Organizer approval of an unlock
    pub async fn approve_unlock(&self, group_id: Uuid) -> AppResult<HousingLock> {
        self.transition(group_id, "housing_unlock_approved", |lock, _| {
            Ok(housing::approve_unlock(lock))
        })
        .await
    }

    async fn transition<F>(&self, group_id: Uuid, action: &str, apply: F) -> AppResult<HousingLock>
    where
        F: FnOnce(
            &HousingLock,
            chrono::NaiveDateTime,
        ) -> Result<HousingLock, crate::allocation::AllocationError>,
    {
        let group = self.group(group_id).await?;

        let mut tx = self.pool.begin().await?;
        let current = self.lock_repo.find_for_update(&mut tx, group_id).await?;
        let next = apply(&current, chrono::Utc::now().naive_utc())?;

        if next == current {
            tx.commit().await?;
            return Ok(current);
        }

        let saved = self.lock_repo.save(&mut tx, &next).await?;
        tx.commit().await?;

        info!(
            "Housing {}: group={}, locked={}, unlock_requested={}",
            action, group_id, saved.is_locked, saved.unlock_requested
        );
        self.audit.log_housing_lock(action, group.event_id, &saved).await;

        Ok(saved)
    }
}
