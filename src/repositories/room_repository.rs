use crate::error::RepositoryError;
use crate::models::Room;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

const ROOM_COLUMNS: &str = r#"
    id,
    event_id,
    building,
    name,
    capacity,
    gender,
    room_type,
    group_registration_id,
    display_order,
    created_at
"#;

/// Insert payload for a room
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub event_id: Uuid,
    pub building: String,
    pub name: String,
    pub capacity: i32,
    pub gender: String,
    pub room_type: String,
    pub group_registration_id: Option<Uuid>,
    pub display_order: i32,
}

/// Repository for rooms; beds are the numbers 1..=capacity of a room
pub struct RoomRepository {
    pool: PgPool,
}

impl RoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: &NewRoom) -> Result<Room, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO rooms (event_id, building, name, capacity, gender, room_type, group_registration_id, display_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            ROOM_COLUMNS
        );
        let room = sqlx::query_as::<_, Room>(&sql)
            .bind(new.event_id)
            .bind(&new.building)
            .bind(&new.name)
            .bind(new.capacity)
            .bind(&new.gender)
            .bind(&new.room_type)
            .bind(new.group_registration_id)
            .bind(new.display_order)
            .fetch_one(&self.pool)
            .await?;

        Ok(room)
    }

    /// Lock a room of an event for update
    pub async fn find_in_event_for_update(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<Room>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM rooms WHERE id = $1 AND event_id = $2 FOR UPDATE",
            ROOM_COLUMNS
        );
        let room = sqlx::query_as::<_, Room>(&sql)
            .bind(id)
            .bind(event_id)
            .fetch_optional(conn)
            .await?;

        Ok(room)
    }

    /// Rooms of an event in display order
    pub async fn list_by_event(
        &self,
        conn: &mut PgConnection,
        event_id: Uuid,
    ) -> Result<Vec<Room>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM rooms
            WHERE event_id = $1
            ORDER BY display_order, building, name, id
            "#,
            ROOM_COLUMNS
        );
        let rooms = sqlx::query_as::<_, Room>(&sql)
            .bind(event_id)
            .fetch_all(conn)
            .await?;

        Ok(rooms)
    }

    /// Lock the rooms of one gender and room type, in display order.
    ///
    /// Auto-assign holds these locks so a concurrent manual assignment into
    /// the same rooms waits for it.
    pub async fn list_for_category_for_update(
        &self,
        conn: &mut PgConnection,
        event_id: Uuid,
        gender: &str,
        room_type: &str,
    ) -> Result<Vec<Room>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM rooms
            WHERE event_id = $1 AND gender = $2 AND room_type = $3
            ORDER BY display_order, building, name, id
            FOR UPDATE
            "#,
            ROOM_COLUMNS
        );
        let rooms = sqlx::query_as::<_, Room>(&sql)
            .bind(event_id)
            .bind(gender)
            .bind(room_type)
            .fetch_all(conn)
            .await?;

        Ok(rooms)
    }
}
