use crate::billing::pricing::{self, ParticipantCounts, PriceQuote};
use crate::error::{AppError, AppResult};
use crate::models::{
    Event, EventPricing, Gender, GroupRegistration, HousingType, IndividualRegistration,
    Participant, ParticipantType, RegistrationKind, Room, RoomType, RoomWithBeds,
    MAX_ROOM_CAPACITY,
};
use crate::repositories::{
    EventRepository, NewGroupRegistration, NewIndividualRegistration, NewRoom,
    ParticipantRepository, PaymentRepository, RegistrationRepository, RoomRepository,
};
use chrono::NaiveDate;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Group registration as submitted by a group leader
#[derive(Debug, Clone)]
pub struct GroupRegistrationInput {
    pub group_name: String,
    pub leader_name: String,
    pub leader_email: String,
    pub housing_type: HousingType,
    pub counts: ParticipantCounts,
}

#[derive(Debug, Clone)]
pub struct IndividualRegistrationInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
    pub gender: Gender,
    pub participant_type: ParticipantType,
    pub housing_type: HousingType,
}

#[derive(Debug, Clone)]
pub struct ParticipantInput {
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub gender: Gender,
    pub participant_type: ParticipantType,
}

#[derive(Debug, Clone)]
pub struct RoomInput {
    pub building: String,
    pub name: String,
    pub capacity: i32,
    pub gender: Gender,
    pub room_type: RoomType,
    pub group_registration_id: Option<Uuid>,
    pub display_order: i32,
}

fn require(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn count(value: impl Into<u64>, field: &str) -> AppResult<i32> {
    i32::try_from(value.into()).map_err(|_| AppError::Validation(format!("{} is too large", field)))
}

/// Events, pricing, registrations, participants and rooms
pub struct RegistrationService {
    pool: PgPool,
    event_repo: Arc<EventRepository>,
    registration_repo: Arc<RegistrationRepository>,
    participant_repo: Arc<ParticipantRepository>,
    room_repo: Arc<RoomRepository>,
    payment_repo: Arc<PaymentRepository>,
}

impl RegistrationService {
    pub fn new(
        pool: PgPool,
        event_repo: Arc<EventRepository>,
        registration_repo: Arc<RegistrationRepository>,
        participant_repo: Arc<ParticipantRepository>,
        room_repo: Arc<RoomRepository>,
        payment_repo: Arc<PaymentRepository>,
    ) -> Self {
        Self {
            pool,
            event_repo,
            registration_repo,
            participant_repo,
            room_repo,
            payment_repo,
        }
    }

    // =========================================================================
    // Events and pricing
    // =========================================================================

    pub async fn create_event(
        &self,
        organization_id: Uuid,
        name: &str,
        starts_on: Option<NaiveDate>,
        ends_on: Option<NaiveDate>,
    ) -> AppResult<Event> {
        require(name, "Event name")?;
        if let (Some(start), Some(end)) = (starts_on, ends_on) {
            if end < start {
                return Err(AppError::Validation("Event cannot end before it starts".into()));
            }
        }

        let event = self
            .event_repo
            .create(organization_id, name.trim(), starts_on, ends_on)
            .await?;
        info!("Created event: id={}, organization={}", event.id, organization_id);
        Ok(event)
    }

    pub async fn get_event(&self, event_id: Uuid) -> AppResult<Event> {
        self.event_repo
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))
    }

    pub async fn upsert_pricing(&self, pricing: EventPricing) -> AppResult<EventPricing> {
        pricing::validate_pricing(&pricing)?;
        self.get_event(pricing.event_id).await?;

        let saved = self.event_repo.upsert_pricing(&pricing).await?;
        info!("Updated pricing: event={}", saved.event_id);
        Ok(saved)
    }

    pub async fn get_pricing(&self, event_id: Uuid) -> AppResult<EventPricing> {
        self.event_repo
            .find_pricing(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Pricing for event {} not found", event_id)))
    }

    /// Price a prospective registration without storing anything
    pub async fn quote(
        &self,
        event_id: Uuid,
        counts: &ParticipantCounts,
        housing_type: HousingType,
    ) -> AppResult<PriceQuote> {
        let table = self.get_pricing(event_id).await?;
        Ok(pricing::compute_quote(&table, counts, housing_type)?)
    }

    // =========================================================================
    // Registrations
    // =========================================================================

    /// Price and store a group registration, open its payment account
    pub async fn create_group_registration(
        &self,
        event_id: Uuid,
        input: GroupRegistrationInput,
    ) -> AppResult<(GroupRegistration, PriceQuote)> {
        require(&input.group_name, "Group name")?;
        require(&input.leader_name, "Leader name")?;
        require(&input.leader_email, "Leader email")?;

        let quote = self.quote(event_id, &input.counts, input.housing_type).await?;
        let counts = &input.counts;
        let new = NewGroupRegistration {
            event_id,
            group_name: input.group_name.trim().to_string(),
            leader_name: input.leader_name.trim().to_string(),
            leader_email: input.leader_email.trim().to_string(),
            housing_type: input.housing_type.as_str().to_string(),
            youth_count_male_u18: count(counts.youth_count_male_u18, "youthCountMaleU18")?,
            youth_count_female_u18: count(counts.youth_count_female_u18, "youthCountFemaleU18")?,
            chaperone_count_male: count(counts.chaperone_count_male, "chaperoneCountMale")?,
            chaperone_count_female: count(counts.chaperone_count_female, "chaperoneCountFemale")?,
            clergy_count: count(counts.clergy_count, "clergyCount")?,
            total_participants: count(counts.total(), "Participant total")?,
            total_amount: quote.total,
            deposit_amount: quote.deposit,
        };

        let mut tx = self.pool.begin().await?;
        let registration = self.registration_repo.create_group(&mut tx, &new).await?;
        self.payment_repo
            .create_account(
                &mut tx,
                registration.id,
                event_id,
                RegistrationKind::Group,
                registration.total_amount,
            )
            .await?;
        tx.commit().await?;

        info!(
            "Created group registration: event={}, id={}, participants={}, total={}",
            event_id, registration.id, registration.total_participants, registration.total_amount
        );
        Ok((registration, quote))
    }

    /// Price and store a single-person registration
    pub async fn create_individual_registration(
        &self,
        event_id: Uuid,
        input: IndividualRegistrationInput,
    ) -> AppResult<(IndividualRegistration, PriceQuote)> {
        require(&input.first_name, "First name")?;
        require(&input.last_name, "Last name")?;
        require(&input.email, "Email")?;
        if input.age < 0 {
            return Err(AppError::Validation("Age cannot be negative".into()));
        }

        let counts = ParticipantCounts::single(input.participant_type, input.gender == Gender::Male);
        let quote = self.quote(event_id, &counts, input.housing_type).await?;
        let new = NewIndividualRegistration {
            event_id,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email: input.email.trim().to_string(),
            age: input.age,
            gender: input.gender.as_str().to_string(),
            participant_type: input.participant_type.as_str().to_string(),
            housing_type: input.housing_type.as_str().to_string(),
            total_amount: quote.total,
        };

        let mut tx = self.pool.begin().await?;
        let registration = self.registration_repo.create_individual(&mut tx, &new).await?;
        self.payment_repo
            .create_account(
                &mut tx,
                registration.id,
                event_id,
                RegistrationKind::Individual,
                registration.total_amount,
            )
            .await?;
        tx.commit().await?;

        info!(
            "Created individual registration: event={}, id={}, total={}",
            event_id, registration.id, registration.total_amount
        );
        Ok((registration, quote))
    }

    pub async fn get_group_registration(&self, id: Uuid) -> AppResult<GroupRegistration> {
        self.registration_repo
            .find_group(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group registration {} not found", id)))
    }

    pub async fn get_individual_registration(&self, id: Uuid) -> AppResult<IndividualRegistration> {
        self.registration_repo
            .find_individual(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Individual registration {} not found", id)))
    }

    pub async fn list_group_registrations(&self, event_id: Uuid) -> AppResult<Vec<GroupRegistration>> {
        self.get_event(event_id).await?;
        Ok(self.registration_repo.list_groups_by_event(event_id).await?)
    }

    // =========================================================================
    // Participants
    // =========================================================================

    pub async fn add_participant(&self, group_id: Uuid, input: ParticipantInput) -> AppResult<Participant> {
        require(&input.first_name, "First name")?;
        require(&input.last_name, "Last name")?;
        if input.age < 0 {
            return Err(AppError::Validation("Age cannot be negative".into()));
        }
        self.get_group_registration(group_id).await?;

        let participant = self
            .participant_repo
            .create(
                group_id,
                input.first_name.trim(),
                input.last_name.trim(),
                input.age,
                input.gender.as_str(),
                input.participant_type.as_str(),
            )
            .await?;
        info!("Added participant: group={}, id={}", group_id, participant.id);
        Ok(participant)
    }

    pub async fn list_participants(&self, group_id: Uuid) -> AppResult<Vec<Participant>> {
        self.get_group_registration(group_id).await?;
        let mut conn = self.pool.acquire().await?;
        Ok(self.participant_repo.list_by_group(&mut conn, group_id).await?)
    }

    // =========================================================================
    // Rooms
    // =========================================================================

    pub async fn create_room(&self, event_id: Uuid, input: RoomInput) -> AppResult<Room> {
        require(&input.building, "Building")?;
        require(&input.name, "Room name")?;
        if !(1..=MAX_ROOM_CAPACITY).contains(&input.capacity) {
            return Err(AppError::Validation(format!(
                "Room capacity must be between 1 and {}",
                MAX_ROOM_CAPACITY
            )));
        }
        self.get_event(event_id).await?;
        if let Some(group_id) = input.group_registration_id {
            let group = self.get_group_registration(group_id).await?;
            if group.event_id != event_id {
                return Err(AppError::Validation(format!(
                    "Group registration {} belongs to another event",
                    group_id
                )));
            }
        }

        let room = self
            .room_repo
            .create(&NewRoom {
                event_id,
                building: input.building.trim().to_string(),
                name: input.name.trim().to_string(),
                capacity: input.capacity,
                gender: input.gender.as_str().to_string(),
                room_type: input.room_type.as_str().to_string(),
                group_registration_id: input.group_registration_id,
                display_order: input.display_order,
            })
            .await?;
        info!("Created room: event={}, id={}, capacity={}", event_id, room.id, room.capacity);
        Ok(room)
    }

    /// All rooms of an event with their beds
    pub async fn list_rooms(&self, event_id: Uuid) -> AppResult<Vec<RoomWithBeds>> {
        self.get_event(event_id).await?;

        let mut conn = self.pool.acquire().await?;
        let rooms = self.room_repo.list_by_event(&mut conn, event_id).await?;
        let room_ids: Vec<Uuid> = rooms.iter().map(|r| r.id).collect();
        let occupants = self.participant_repo.list_occupants(&mut conn, &room_ids).await?;

        Ok(rooms
            .into_iter()
            .map(|room| RoomWithBeds::from_occupants(room, &occupants))
            .collect())
    }
}
