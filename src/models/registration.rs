use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Which registration table a registration id refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationKind {
    Group,
    Individual,
}

impl RegistrationKind {
    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationKind::Group => "group",
            RegistrationKind::Individual => "individual",
        }
    }
}

impl FromStr for RegistrationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "group" => Ok(RegistrationKind::Group),
            "individual" => Ok(RegistrationKind::Individual),
            _ => Err(format!("Invalid registration kind: {}", s)),
        }
    }
}

/// Reference to either kind of registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum RegistrationRef {
    Group(Uuid),
    Individual(Uuid),
}

impl RegistrationRef {
    /// Build from the pair of optional ids used by request bodies and the
    /// assignment table; exactly one must be set.
    pub fn from_ids(group: Option<Uuid>, individual: Option<Uuid>) -> Option<Self> {
        match (group, individual) {
            (Some(id), None) => Some(RegistrationRef::Group(id)),
            (None, Some(id)) => Some(RegistrationRef::Individual(id)),
            _ => None,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            RegistrationRef::Group(id) | RegistrationRef::Individual(id) => *id,
        }
    }

    pub fn kind(&self) -> RegistrationKind {
        match self {
            RegistrationRef::Group(_) => RegistrationKind::Group,
            RegistrationRef::Individual(_) => RegistrationKind::Individual,
        }
    }

    pub fn group_id(&self) -> Option<Uuid> {
        match self {
            RegistrationRef::Group(id) => Some(*id),
            RegistrationRef::Individual(_) => None,
        }
    }

    pub fn individual_id(&self) -> Option<Uuid> {
        match self {
            RegistrationRef::Individual(id) => Some(*id),
            RegistrationRef::Group(_) => None,
        }
    }
}

impl fmt::Display for RegistrationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} registration {}", self.kind().as_str(), self.id())
    }
}

/// Group registration with its headcount by category and computed price
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GroupRegistration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub group_name: String,
    pub leader_name: String,
    pub leader_email: String,
    pub housing_type: String, // Stored as TEXT, use HousingType for type safety
    pub youth_count_male_u18: i32,
    pub youth_count_female_u18: i32,
    pub chaperone_count_male: i32,
    pub chaperone_count_female: i32,
    pub clergy_count: i32,
    pub total_participants: i32,
    pub total_amount: Decimal,
    pub deposit_amount: Decimal,
    pub created_at: NaiveDateTime,
}

/// Single-person registration
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct IndividualRegistration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
    pub gender: String,
    pub participant_type: String,
    pub housing_type: String,
    pub total_amount: Decimal,
    pub created_at: NaiveDateTime,
}
