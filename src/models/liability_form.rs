use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Liability form variant a participant submits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormType {
    Minor,
    Adult,
    Chaperone,
    Clergy,
}

impl FormType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::Minor => "minor",
            FormType::Adult => "adult",
            FormType::Chaperone => "chaperone",
            FormType::Clergy => "clergy",
        }
    }
}

impl FromStr for FormType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minor" => Ok(FormType::Minor),
            "adult" => Ok(FormType::Adult),
            "chaperone" => Ok(FormType::Chaperone),
            "clergy" => Ok(FormType::Clergy),
            _ => Err(format!("Invalid form type: {}", s)),
        }
    }
}

/// Submitted liability form. `data` holds the validated
/// `documents::LiabilityFormData` as JSONB.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LiabilityForm {
    pub id: Uuid,
    pub event_id: Uuid,
    pub participant_id: Option<Uuid>,
    pub form_type: String, // Stored as TEXT, use FormType for type safety
    pub data: Value,
    pub submitted_at: NaiveDateTime,
}

impl LiabilityForm {
    pub fn form_type_enum(&self) -> Result<FormType, String> {
        self.form_type.parse()
    }
}
