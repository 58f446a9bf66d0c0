use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Gender as recorded at registration and on rooms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(format!("Invalid gender: {}", s)),
        }
    }
}

/// Role a participant attends in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantType {
    Youth,
    Chaperone,
    Clergy,
}

impl ParticipantType {
    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantType::Youth => "youth",
            ParticipantType::Chaperone => "chaperone",
            ParticipantType::Clergy => "clergy",
        }
    }
}

impl FromStr for ParticipantType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "youth" => Ok(ParticipantType::Youth),
            "chaperone" => Ok(ParticipantType::Chaperone),
            "clergy" => Ok(ParticipantType::Clergy),
            _ => Err(format!("Invalid participant type: {}", s)),
        }
    }
}

/// A person attending with a group registration.
///
/// `room_id` and `bed_number` are either both set or both null; the
/// database enforces this with a check constraint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: Uuid,
    pub group_registration_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub gender: String,           // Stored as TEXT, use Gender for type safety
    pub participant_type: String, // Stored as TEXT, use ParticipantType for type safety
    pub room_id: Option<Uuid>,
    pub bed_number: Option<i32>,
    pub created_at: NaiveDateTime,
}

impl Participant {
    /// Get gender as an enum
    pub fn gender_enum(&self) -> Option<Gender> {
        self.gender.parse().ok()
    }

    /// Get participant type as an enum
    pub fn type_enum(&self) -> Option<ParticipantType> {
        self.participant_type.parse().ok()
    }

    /// The bed this participant occupies, if any
    pub fn bed(&self) -> Option<(Uuid, i32)> {
        match (self.room_id, self.bed_number) {
            (Some(room_id), Some(bed_number)) => Some((room_id, bed_number)),
            _ => None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.bed().is_some()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
