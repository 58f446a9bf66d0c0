use crate::allocation::PendingRegistration;
use crate::error::RepositoryError;
use crate::models::{MealGroup, MealGroupAssignment, RegistrationRef};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

/// Meal groups with `current_size` summed from the assignment rows: a group
/// registration counts its `total_participants`, an individual counts one.
const MEAL_GROUP_WITH_SIZE: &str = r#"
    SELECT
        g.id,
        g.event_id,
        g.name,
        g.color_hex,
        g.capacity,
        g.breakfast_time,
        g.lunch_time,
        g.dinner_time,
        g.is_active,
        g.display_order,
        g.created_at,
        COALESCE(SUM(
            CASE
                WHEN a.group_registration_id IS NOT NULL THEN gr.total_participants
                WHEN a.individual_registration_id IS NOT NULL THEN 1
                ELSE 0
            END
        ), 0)::BIGINT AS current_size
    FROM meal_groups g
    LEFT JOIN meal_group_assignments a ON a.meal_group_id = g.id
    LEFT JOIN group_registrations gr ON gr.id = a.group_registration_id
"#;

const ASSIGNMENT_COLUMNS: &str =
    "id, meal_group_id, group_registration_id, individual_registration_id, assigned_at";

/// Insert payload for a meal group
#[derive(Debug, Clone)]
pub struct NewMealGroup {
    pub event_id: Uuid,
    pub name: String,
    pub color_hex: String,
    pub capacity: i32,
    pub breakfast_time: Option<String>,
    pub lunch_time: Option<String>,
    pub dinner_time: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
}

#[derive(Debug, FromRow)]
struct PendingRow {
    group_registration_id: Option<Uuid>,
    individual_registration_id: Option<Uuid>,
    headcount: i64,
}

/// Repository for meal groups and their assignment rows
pub struct MealGroupRepository {
    pool: PgPool,
}

impl MealGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: &NewMealGroup) -> Result<MealGroup, RepositoryError> {
        let group = sqlx::query_as::<_, MealGroup>(
            r#"
            INSERT INTO meal_groups (
                event_id, name, color_hex, capacity, breakfast_time, lunch_time,
                dinner_time, is_active, display_order
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING
                id, event_id, name, color_hex, capacity, breakfast_time, lunch_time,
                dinner_time, is_active, display_order, created_at, 0::BIGINT AS current_size
            "#,
        )
        .bind(new.event_id)
        .bind(&new.name)
        .bind(&new.color_hex)
        .bind(new.capacity)
        .bind(&new.breakfast_time)
        .bind(&new.lunch_time)
        .bind(&new.dinner_time)
        .bind(new.is_active)
        .bind(new.display_order)
        .fetch_one(&self.pool)
        .await?;

        Ok(group)
    }

    /// Meal groups of an event in display order, with computed sizes
    pub async fn list_by_event(
        &self,
        conn: &mut PgConnection,
        event_id: Uuid,
    ) -> Result<Vec<MealGroup>, RepositoryError> {
        let sql = format!(
            r#"
            {}
            WHERE g.event_id = $1
            GROUP BY g.id
            ORDER BY g.display_order, g.created_at, g.id
            "#,
            MEAL_GROUP_WITH_SIZE
        );
        let groups = sqlx::query_as::<_, MealGroup>(&sql)
            .bind(event_id)
            .fetch_all(conn)
            .await?;

        Ok(groups)
    }

    /// Lock every meal group row of an event.
    ///
    /// Aggregates cannot carry `FOR UPDATE`, so the rows are locked here and
    /// sizes read afterwards with [`list_by_event`](Self::list_by_event).
    pub async fn lock_event_groups(
        &self,
        conn: &mut PgConnection,
        event_id: Uuid,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            SELECT id FROM meal_groups
            WHERE event_id = $1
            ORDER BY display_order, created_at, id
            FOR UPDATE
            "#,
        )
        .bind(event_id)
        .fetch_all(conn)
        .await?;

        Ok(())
    }

    /// Lock one meal group of an event and return it with its current size
    pub async fn find_in_event_for_update(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<MealGroup>, RepositoryError> {
        let locked: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM meal_groups WHERE id = $1 AND event_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(event_id)
        .fetch_optional(&mut *conn)
        .await?;

        if locked.is_none() {
            return Ok(None);
        }

        let sql = format!("{} WHERE g.id = $1 GROUP BY g.id", MEAL_GROUP_WITH_SIZE);
        let group = sqlx::query_as::<_, MealGroup>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(group)
    }

    /// Current assignment of a registration, if any
    pub async fn find_assignment(
        &self,
        conn: &mut PgConnection,
        registration: RegistrationRef,
    ) -> Result<Option<MealGroupAssignment>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM meal_group_assignments
            WHERE group_registration_id = $1 OR individual_registration_id = $2
            "#,
            ASSIGNMENT_COLUMNS
        );
        let assignment = sqlx::query_as::<_, MealGroupAssignment>(&sql)
            .bind(registration.group_id())
            .bind(registration.individual_id())
            .fetch_optional(conn)
            .await?;

        Ok(assignment)
    }

    /// Attach a registration to a meal group.
    ///
    /// The partial unique indexes reject a second assignment of the same
    /// registration; that surfaces as [`RepositoryError::Duplicate`].
    pub async fn create_assignment(
        &self,
        conn: &mut PgConnection,
        meal_group_id: Uuid,
        registration: RegistrationRef,
    ) -> Result<MealGroupAssignment, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO meal_group_assignments (meal_group_id, group_registration_id, individual_registration_id)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            ASSIGNMENT_COLUMNS
        );
        let assignment = sqlx::query_as::<_, MealGroupAssignment>(&sql)
            .bind(meal_group_id)
            .bind(registration.group_id())
            .bind(registration.individual_id())
            .fetch_one(conn)
            .await?;

        Ok(assignment)
    }

    /// Remove a registration's assignment, returning the deleted row
    pub async fn delete_assignment(
        &self,
        conn: &mut PgConnection,
        registration: RegistrationRef,
    ) -> Result<Option<MealGroupAssignment>, RepositoryError> {
        let sql = format!(
            r#"
            DELETE FROM meal_group_assignments
            WHERE group_registration_id = $1 OR individual_registration_id = $2
            RETURNING {}
            "#,
            ASSIGNMENT_COLUMNS
        );
        let deleted = sqlx::query_as::<_, MealGroupAssignment>(&sql)
            .bind(registration.group_id())
            .bind(registration.individual_id())
            .fetch_optional(conn)
            .await?;

        Ok(deleted)
    }

    /// Registrations of an event without a meal group, in creation order
    pub async fn list_pending(
        &self,
        conn: &mut PgConnection,
        event_id: Uuid,
    ) -> Result<Vec<PendingRegistration>, RepositoryError> {
        let rows = sqlx::query_as::<_, PendingRow>(
            r#"
            SELECT
                gr.id AS group_registration_id,
                NULL::UUID AS individual_registration_id,
                gr.total_participants::BIGINT AS headcount,
                gr.created_at
            FROM group_registrations gr
            WHERE gr.event_id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM meal_group_assignments a WHERE a.group_registration_id = gr.id
              )
            UNION ALL
            SELECT
                NULL::UUID AS group_registration_id,
                ir.id AS individual_registration_id,
                1::BIGINT AS headcount,
                ir.created_at
            FROM individual_registrations ir
            WHERE ir.event_id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM meal_group_assignments a WHERE a.individual_registration_id = ir.id
              )
            ORDER BY created_at, group_registration_id, individual_registration_id
            "#,
        )
        .bind(event_id)
        .fetch_all(conn)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                RegistrationRef::from_ids(row.group_registration_id, row.individual_registration_id)
                    .map(|registration| PendingRegistration {
                        registration,
                        headcount: row.headcount,
                    })
            })
            .collect())
    }
}
