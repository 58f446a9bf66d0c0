//! Domain models for the Rally backend.
//!
//! This module contains the database-backed rows for events, registrations,
//! housing, meal groups, payments and liability forms, plus the string
//! enums those rows carry.

pub mod event;
pub mod housing_lock;
pub mod liability_form;
pub mod meal_group;
pub mod participant;
pub mod payment;
pub mod registration;
pub mod room;

// Re-export all models for convenient access
pub use event::{Event, EventPricing, HousingType};
pub use housing_lock::HousingLock;
pub use liability_form::{FormType, LiabilityForm};
pub use meal_group::{MealGroup, MealGroupAssignment};
pub use participant::{Gender, Participant, ParticipantType};
pub use payment::{Payment, PaymentAccount, PaymentBalance, PaymentKind, PaymentStatus};
pub use registration::{
    GroupRegistration, IndividualRegistration, RegistrationKind, RegistrationRef,
};
pub use room::{BedSlot, Room, RoomType, RoomWithBeds, MAX_ROOM_CAPACITY};
