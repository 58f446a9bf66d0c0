use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Submission state of a group's housing.
///
/// Groups without a row are unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HousingLock {
    pub group_registration_id: Uuid,
    pub is_locked: bool,
    pub locked_at: Option<NaiveDateTime>,
    pub unlock_requested: bool,
    pub unlock_requested_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

impl HousingLock {
    /// State of a group that has never submitted
    pub fn unlocked(group_registration_id: Uuid) -> Self {
        Self {
            group_registration_id,
            is_locked: false,
            locked_at: None,
            unlock_requested: false,
            unlock_requested_at: None,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}
