use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{Gender, Participant, ParticipantType, Room, RoomType};

/// Age at which a youth registrant is housed with the adults
pub const ADULT_AGE: i32 = 18;

/// Housing category: gender × (under-18 youth | chaperone)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryTag {
    MaleU18,
    FemaleU18,
    MaleChaperone,
    FemaleChaperone,
}

impl CategoryTag {
    pub const ALL: [CategoryTag; 4] = [
        CategoryTag::MaleU18,
        CategoryTag::FemaleU18,
        CategoryTag::MaleChaperone,
        CategoryTag::FemaleChaperone,
    ];

    pub fn new(gender: Gender, room_type: RoomType) -> Self {
        match (gender, room_type) {
            (Gender::Male, RoomType::Youth) => CategoryTag::MaleU18,
            (Gender::Female, RoomType::Youth) => CategoryTag::FemaleU18,
            (Gender::Male, RoomType::Chaperone) => CategoryTag::MaleChaperone,
            (Gender::Female, RoomType::Chaperone) => CategoryTag::FemaleChaperone,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryTag::MaleU18 => "male_u18",
            CategoryTag::FemaleU18 => "female_u18",
            CategoryTag::MaleChaperone => "male_chaperone",
            CategoryTag::FemaleChaperone => "female_chaperone",
        }
    }

    pub fn gender(&self) -> Gender {
        match self {
            CategoryTag::MaleU18 | CategoryTag::MaleChaperone => Gender::Male,
            CategoryTag::FemaleU18 | CategoryTag::FemaleChaperone => Gender::Female,
        }
    }

    pub fn room_type(&self) -> RoomType {
        match self {
            CategoryTag::MaleU18 | CategoryTag::FemaleU18 => RoomType::Youth,
            CategoryTag::MaleChaperone | CategoryTag::FemaleChaperone => RoomType::Chaperone,
        }
    }
}

impl fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryTag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid housing category: {}", s))
    }
}

/// Anything that is filtered by housing category.
///
/// Participants and rooms share this one derivation so allocation and the
/// housing views can never disagree.
pub trait Categorized {
    fn category(&self) -> Option<CategoryTag>;
}

/// Category of a person; clergy are housed outside the allocator.
pub fn participant_category(
    gender: Gender,
    participant_type: ParticipantType,
    age: i32,
) -> Option<CategoryTag> {
    let room_type = match participant_type {
        ParticipantType::Clergy => return None,
        ParticipantType::Chaperone => RoomType::Chaperone,
        ParticipantType::Youth if age >= ADULT_AGE => RoomType::Chaperone,
        ParticipantType::Youth => RoomType::Youth,
    };
    Some(CategoryTag::new(gender, room_type))
}

impl Categorized for Participant {
    fn category(&self) -> Option<CategoryTag> {
        participant_category(self.gender_enum()?, self.type_enum()?, self.age)
    }
}

impl Categorized for Room {
    fn category(&self) -> Option<CategoryTag> {
        Some(CategoryTag::new(self.gender_enum()?, self.room_type_enum()?))
    }
}
