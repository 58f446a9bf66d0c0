use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::RegistrationRef;

/// Colored meal cohort.
///
/// `current_size` is not a column: repositories compute it from the
/// assignment rows (headcount of every assigned registration) on each read.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MealGroup {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub color_hex: String,
    pub capacity: i32,
    pub breakfast_time: Option<String>,
    pub lunch_time: Option<String>,
    pub dinner_time: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: NaiveDateTime,
    pub current_size: i64,
}

/// Join row attaching one registration to one meal group
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MealGroupAssignment {
    pub id: Uuid,
    pub meal_group_id: Uuid,
    pub group_registration_id: Option<Uuid>,
    pub individual_registration_id: Option<Uuid>,
    pub assigned_at: NaiveDateTime,
}

impl MealGroupAssignment {
    pub fn registration(&self) -> Option<RegistrationRef> {
        RegistrationRef::from_ids(self.group_registration_id, self.individual_registration_id)
    }
}

/// Basic hex color check used when creating meal groups (`#RRGGBB`)
pub fn is_valid_color_hex(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_validation() {
        assert!(is_valid_color_hex("#1E90FF"));
        assert!(is_valid_color_hex("#00ff00"));
        assert!(!is_valid_color_hex("1E90FF"));
        assert!(!is_valid_color_hex("#1E90F"));
        assert!(!is_valid_color_hex("#GGGGGG"));
    }
}
