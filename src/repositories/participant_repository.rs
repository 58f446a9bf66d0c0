use crate::error::RepositoryError;
use crate::models::Participant;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

const PARTICIPANT_COLUMNS: &str = r#"
    id,
    group_registration_id,
    first_name,
    last_name,
    age,
    gender,
    participant_type,
    room_id,
    bed_number,
    created_at
"#;

/// Repository for the people attached to group registrations
pub struct ParticipantRepository {
    pool: PgPool,
}

impl ParticipantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an unassigned participant
    pub async fn create(
        &self,
        group_registration_id: Uuid,
        first_name: &str,
        last_name: &str,
        age: i32,
        gender: &str,
        participant_type: &str,
    ) -> Result<Participant, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO participants (group_registration_id, first_name, last_name, age, gender, participant_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            PARTICIPANT_COLUMNS
        );
        let participant = sqlx::query_as::<_, Participant>(&sql)
            .bind(group_registration_id)
            .bind(first_name)
            .bind(last_name)
            .bind(age)
            .bind(gender)
            .bind(participant_type)
            .fetch_one(&self.pool)
            .await?;

        Ok(participant)
    }

    /// Participant of an event, found through its group registration
    pub async fn find_in_event(
        &self,
        id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<Participant>, RepositoryError> {
        let sql = r#"
            SELECT p.id, p.group_registration_id, p.first_name, p.last_name, p.age,
                   p.gender, p.participant_type, p.room_id, p.bed_number, p.created_at
            FROM participants p
            JOIN group_registrations g ON g.id = p.group_registration_id
            WHERE p.id = $1 AND g.event_id = $2
        "#;
        let participant = sqlx::query_as::<_, Participant>(sql)
            .bind(id)
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(participant)
    }

    /// Lock a participant of a group for update
    pub async fn find_in_group_for_update(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        group_registration_id: Uuid,
    ) -> Result<Option<Participant>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM participants
            WHERE id = $1 AND group_registration_id = $2
            FOR UPDATE
            "#,
            PARTICIPANT_COLUMNS
        );
        let participant = sqlx::query_as::<_, Participant>(&sql)
            .bind(id)
            .bind(group_registration_id)
            .fetch_optional(conn)
            .await?;

        Ok(participant)
    }

    /// Participants of a group in registration order (`created_at`, then id)
    pub async fn list_by_group(
        &self,
        conn: &mut PgConnection,
        group_registration_id: Uuid,
    ) -> Result<Vec<Participant>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM participants
            WHERE group_registration_id = $1
            ORDER BY created_at, id
            "#,
            PARTICIPANT_COLUMNS
        );
        let participants = sqlx::query_as::<_, Participant>(&sql)
            .bind(group_registration_id)
            .fetch_all(conn)
            .await?;

        Ok(participants)
    }

    /// Same as [`list_by_group`](Self::list_by_group) with the rows locked
    pub async fn list_by_group_for_update(
        &self,
        conn: &mut PgConnection,
        group_registration_id: Uuid,
    ) -> Result<Vec<Participant>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM participants
            WHERE group_registration_id = $1
            ORDER BY created_at, id
            FOR UPDATE
            "#,
            PARTICIPANT_COLUMNS
        );
        let participants = sqlx::query_as::<_, Participant>(&sql)
            .bind(group_registration_id)
            .fetch_all(conn)
            .await?;

        Ok(participants)
    }

    /// Everyone sleeping in any of `room_ids`, whatever their group
    pub async fn list_occupants(
        &self,
        conn: &mut PgConnection,
        room_ids: &[Uuid],
    ) -> Result<Vec<Participant>, RepositoryError> {
        if room_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            r#"
            SELECT {}
            FROM participants
            WHERE room_id = ANY($1)
            ORDER BY room_id, bed_number
            "#,
            PARTICIPANT_COLUMNS
        );
        let participants = sqlx::query_as::<_, Participant>(&sql)
            .bind(room_ids)
            .fetch_all(conn)
            .await?;

        Ok(participants)
    }

    /// Place a participant in a bed, or clear the bed with `None`
    pub async fn set_bed(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        bed: Option<(Uuid, i32)>,
    ) -> Result<Participant, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE participants
            SET room_id = $2, bed_number = $3
            WHERE id = $1
            RETURNING {}
            "#,
            PARTICIPANT_COLUMNS
        );
        let participant = sqlx::query_as::<_, Participant>(&sql)
            .bind(id)
            .bind(bed.map(|(room_id, _)| room_id))
            .bind(bed.map(|(_, bed_number)| bed_number))
            .fetch_one(conn)
            .await?;

        Ok(participant)
    }
}
