use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

use super::{Gender, Participant};

/// Who a room is set aside for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Youth,
    Chaperone,
}

impl RoomType {
    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Youth => "youth",
            RoomType::Chaperone => "chaperone",
        }
    }
}

impl FromStr for RoomType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "youth" => Ok(RoomType::Youth),
            "chaperone" => Ok(RoomType::Chaperone),
            _ => Err(format!("Invalid room type: {}", s)),
        }
    }
}

/// Most beds a room may have; matches the `rooms.capacity` CHECK
pub const MAX_ROOM_CAPACITY: i32 = 50;

/// Physical room with `capacity` beds numbered 1..=capacity.
///
/// A room with a `group_registration_id` is reserved for that group; a room
/// without one may be filled by any group.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: Uuid,
    pub event_id: Uuid,
    pub building: String,
    pub name: String,
    pub capacity: i32,
    pub gender: String,    // Stored as TEXT, use Gender for type safety
    pub room_type: String, // Stored as TEXT, use RoomType for type safety
    pub group_registration_id: Option<Uuid>,
    pub display_order: i32,
    pub created_at: NaiveDateTime,
}

impl Room {
    /// Get gender as an enum
    pub fn gender_enum(&self) -> Option<Gender> {
        self.gender.parse().ok()
    }

    /// Get room type as an enum
    pub fn room_type_enum(&self) -> Option<RoomType> {
        self.room_type.parse().ok()
    }

    /// Whether `bed_number` addresses a bed in this room
    pub fn has_bed(&self, bed_number: i32) -> bool {
        bed_number >= 1 && bed_number <= self.capacity
    }

    /// Whether a participant of `group_registration_id` may use this room
    pub fn is_available_to(&self, group_registration_id: Uuid) -> bool {
        self.group_registration_id
            .map_or(true, |reserved| reserved == group_registration_id)
    }
}

/// One addressable bed and its occupant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BedSlot {
    pub bed_number: i32,
    pub participant_id: Option<Uuid>,
    pub participant_name: Option<String>,
}

/// Room together with its ordered bed slots
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomWithBeds {
    #[serde(flatten)]
    pub room: Room,
    pub beds: Vec<BedSlot>,
}

impl RoomWithBeds {
    /// Build the bed list from the participants currently placed in `room`.
    /// Participants placed elsewhere are ignored.
    pub fn from_occupants(room: Room, occupants: &[Participant]) -> Self {
        let by_bed: HashMap<i32, &Participant> = occupants
            .iter()
            .filter(|p| p.room_id == Some(room.id))
            .filter_map(|p| p.bed_number.map(|bed| (bed, p)))
            .collect();

        let beds = (1..=room.capacity)
            .map(|bed_number| {
                let occupant = by_bed.get(&bed_number);
                BedSlot {
                    bed_number,
                    participant_id: occupant.map(|p| p.id),
                    participant_name: occupant.map(|p| p.full_name()),
                }
            })
            .collect();

        Self { room, beds }
    }

    pub fn free_beds(&self) -> impl Iterator<Item = i32> + '_ {
        self.beds
            .iter()
            .filter(|slot| slot.participant_id.is_none())
            .map(|slot| slot.bed_number)
    }

    pub fn occupant(&self, bed_number: i32) -> Option<Uuid> {
        self.beds
            .iter()
            .find(|slot| slot.bed_number == bed_number)
            .and_then(|slot| slot.participant_id)
    }
}
