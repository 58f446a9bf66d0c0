//! Housing and meal-group allocation.
//!
//! Everything in here is a pure function over rows the services have
//! already loaded (and locked) inside a transaction.

pub mod category;
pub mod housing;
pub mod meal_balance;

pub use category::{Categorized, CategoryTag};
pub use housing::{AutoAssignPlan, CategoryCount, Placement};
pub use meal_balance::{AssignOrder, BalancePlan, BalanceReport, MealGroupLoad, PendingRegistration};

use thiserror::Error;
use uuid::Uuid;

/// Precondition failures of allocation mutations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("Housing for this group has been submitted and is locked")]
    Locked,

    #[error("Housing for this group is not locked")]
    NotLocked,

    #[error("Bed {bed_number} does not exist in a room with {capacity} beds")]
    BedOutOfRange { bed_number: i32, capacity: i32 },

    #[error("Room {0} is reserved for another group")]
    RoomNotEligible(Uuid),

    #[error("Participant {0} is not housed through room assignment")]
    NotHousable(Uuid),

    #[error("Room {0} has no valid gender/type category")]
    RoomCategoryUnknown(Uuid),

    #[error("Participant category {participant} does not match room category {room}")]
    CategoryMismatch {
        participant: CategoryTag,
        room: CategoryTag,
    },

    #[error("Bed {bed_number} in room {room_id} is already occupied")]
    BedOccupied { room_id: Uuid, bed_number: i32 },

    #[error("Meal group {name} cannot take {headcount} more (capacity {capacity}, current {current_size})")]
    MealGroupFull {
        name: String,
        capacity: i32,
        current_size: i64,
        headcount: i64,
    },

    #[error("Meal group {0} is not active")]
    MealGroupInactive(String),
}
