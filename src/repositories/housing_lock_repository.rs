use crate::error::RepositoryError;
use crate::models::HousingLock;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

const LOCK_COLUMNS: &str =
    "group_registration_id, is_locked, locked_at, unlock_requested, unlock_requested_at, updated_at";

/// Repository for the per-group housing lock. A group without a row is unlocked.
pub struct HousingLockRepository {
    pool: PgPool,
}

impl HousingLockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Current lock state, defaulting to unlocked
    pub async fn find(&self, group_registration_id: Uuid) -> Result<HousingLock, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM housing_locks WHERE group_registration_id = $1",
            LOCK_COLUMNS
        );
        let lock = sqlx::query_as::<_, HousingLock>(&sql)
            .bind(group_registration_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(lock.unwrap_or_else(|| HousingLock::unlocked(group_registration_id)))
    }

    /// Create the row if missing, then lock it for the rest of the transaction
    pub async fn find_for_update(
        &self,
        conn: &mut PgConnection,
        group_registration_id: Uuid,
    ) -> Result<HousingLock, RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO housing_locks (group_registration_id)
            VALUES ($1)
            ON CONFLICT (group_registration_id) DO NOTHING
            "#,
        )
        .bind(group_registration_id)
        .execute(&mut *conn)
        .await?;

        let sql = format!(
            "SELECT {} FROM housing_locks WHERE group_registration_id = $1 FOR UPDATE",
            LOCK_COLUMNS
        );
        let lock = sqlx::query_as::<_, HousingLock>(&sql)
            .bind(group_registration_id)
            .fetch_one(conn)
            .await?;

        Ok(lock)
    }

    /// Write back the lock flags
    pub async fn save(
        &self,
        conn: &mut PgConnection,
        lock: &HousingLock,
    ) -> Result<HousingLock, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE housing_locks
            SET is_locked = $2,
                locked_at = $3,
                unlock_requested = $4,
                unlock_requested_at = $5,
                updated_at = NOW()
            WHERE group_registration_id = $1
            RETURNING {}
            "#,
            LOCK_COLUMNS
        );
        let saved = sqlx::query_as::<_, HousingLock>(&sql)
            .bind(lock.group_registration_id)
            .bind(lock.is_locked)
            .bind(lock.locked_at)
            .bind(lock.unlock_requested)
            .bind(lock.unlock_requested_at)
            .fetch_one(conn)
            .await?;

        Ok(saved)
    }
}
