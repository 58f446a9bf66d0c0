//! Bed assignment rules and first-fit auto-assignment.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AllocationError, Categorized, CategoryTag};
use crate::models::{HousingLock, Participant, Room, RoomWithBeds};

/// One participant placed into one bed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub participant_id: Uuid,
    pub room_id: Uuid,
    pub bed_number: i32,
}

/// Result of planning an auto-assign batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoAssignPlan {
    pub placements: Vec<Placement>,
    /// Participants of the category left without a bed
    pub unplaced: usize,
}

impl AutoAssignPlan {
    pub fn assigned(&self) -> usize {
        self.placements.len()
    }
}

/// Check every precondition of placing `participant` into `bed_number` of
/// `room`.
///
/// `occupant` is whoever currently holds that bed. Re-assigning a participant
/// to the bed they already hold is accepted.
pub fn check_assignment(
    participant: &Participant,
    room: &Room,
    bed_number: i32,
    occupant: Option<Uuid>,
    lock: &HousingLock,
) -> Result<(), AllocationError> {
    if lock.is_locked {
        return Err(AllocationError::Locked);
    }

    if !room.has_bed(bed_number) {
        return Err(AllocationError::BedOutOfRange {
            bed_number,
            capacity: room.capacity,
        });
    }

    if !room.is_available_to(participant.group_registration_id) {
        return Err(AllocationError::RoomNotEligible(room.id));
    }

    let participant_category = participant
        .category()
        .ok_or(AllocationError::NotHousable(participant.id))?;
    let room_category = room
        .category()
        .ok_or(AllocationError::RoomCategoryUnknown(room.id))?;
    if participant_category != room_category {
        return Err(AllocationError::CategoryMismatch {
            participant: participant_category,
            room: room_category,
        });
    }

    match occupant {
        Some(current) if current != participant.id => Err(AllocationError::BedOccupied {
            room_id: room.id,
            bed_number,
        }),
        _ => Ok(()),
    }
}

/// Unassignment and auto-assignment only need the group to be unlocked
pub fn check_unassignment(lock: &HousingLock) -> Result<(), AllocationError> {
    if lock.is_locked {
        return Err(AllocationError::Locked);
    }
    Ok(())
}

/// Lock the group's housing. Submitting an already locked group changes
/// nothing; incomplete housing may be submitted.
pub fn submit(lock: &HousingLock, now: NaiveDateTime) -> HousingLock {
    if lock.is_locked {
        return lock.clone();
    }
    HousingLock {
        is_locked: true,
        locked_at: Some(now),
        unlock_requested: false,
        unlock_requested_at: None,
        ..lock.clone()
    }
}

/// Flag a locked group for organizer review
pub fn request_unlock(lock: &HousingLock, now: NaiveDateTime) -> Result<HousingLock, AllocationError> {
    if !lock.is_locked {
        return Err(AllocationError::NotLocked);
    }
    if lock.unlock_requested {
        return Ok(lock.clone());
    }
    Ok(HousingLock {
        unlock_requested: true,
        unlock_requested_at: Some(now),
        ..lock.clone()
    })
}

/// Organizer approval: reopen the group and clear any request
pub fn approve_unlock(lock: &HousingLock) -> HousingLock {
    HousingLock {
        is_locked: false,
        locked_at: None,
        unlock_requested: false,
        unlock_requested_at: None,
        ..lock.clone()
    }
}

/// First-fit placement of the group's unassigned participants of `category`.
///
/// Participants are taken in the order given; rooms in the order given (the
/// display order) and beds in ascending bed number. Rooms of another category
/// or reserved for another group are skipped. No roommate preference or
/// balancing is attempted.
pub fn plan_auto_assign(
    group_registration_id: Uuid,
    category: CategoryTag,
    participants: &[Participant],
    rooms: &[RoomWithBeds],
) -> AutoAssignPlan {
    let mut free_beds = rooms
        .iter()
        .filter(|r| r.room.category() == Some(category))
        .filter(|r| r.room.is_available_to(group_registration_id))
        .flat_map(|r| {
            let room_id = r.room.id;
            let mut beds: Vec<i32> = r.free_beds().collect();
            beds.sort_unstable();
            beds.into_iter().map(move |bed_number| (room_id, bed_number))
        });

    let mut plan = AutoAssignPlan::default();
    let pending = participants
        .iter()
        .filter(|p| p.group_registration_id == group_registration_id)
        .filter(|p| !p.is_assigned())
        .filter(|p| p.category() == Some(category));

    for participant in pending {
        match free_beds.next() {
            Some((room_id, bed_number)) => plan.placements.push(Placement {
                participant_id: participant.id,
                room_id,
                bed_number,
            }),
            None => plan.unplaced += 1,
        }
    }

    plan
}

/// Assigned and unassigned counts for one category of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: CategoryTag,
    pub assigned: usize,
    pub unassigned: usize,
}

pub fn category_counts(participants: &[Participant]) -> Vec<CategoryCount> {
    CategoryTag::ALL
        .into_iter()
        .map(|category| {
            let (assigned, unassigned) = participants
                .iter()
                .filter(|p| p.category() == Some(category))
                .fold((0, 0), |(a, u), p| {
                    if p.is_assigned() {
                        (a + 1, u)
                    } else {
                        (a, u + 1)
                    }
                });
            CategoryCount {
                category,
                assigned,
                unassigned,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashSet;

    fn participant(group: Uuid, gender: &str, kind: &str, age: i32) -> Participant {
        Participant {
            id: Uuid::new_v4(),
            group_registration_id: group,
            first_name: "Test".to_string(),
            last_name: "Person".to_string(),
            age,
            gender: gender.to_string(),
            participant_type: kind.to_string(),
            room_id: None,
            bed_number: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn room(gender: &str, room_type: &str, capacity: i32, order: i32) -> Room {
        Room {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            building: "North Hall".to_string(),
            name: format!("Room {}", order),
            capacity,
            gender: gender.to_string(),
            room_type: room_type.to_string(),
            group_registration_id: None,
            display_order: order,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn unlocked() -> HousingLock {
        HousingLock::unlocked(Uuid::new_v4())
    }

    #[test]
    fn test_assignment_accepted_for_matching_category() {
        let group = Uuid::new_v4();
        let p = participant(group, "male", "youth", 15);
        let r = room("male", "youth", 4, 1);
        assert_eq!(check_assignment(&p, &r, 2, None, &unlocked()), Ok(()));
    }

    #[test]
    fn test_assignment_rejected_when_locked() {
        let group = Uuid::new_v4();
        let p = participant(group, "male", "youth", 15);
        let r = room("male", "youth", 4, 1);
        let mut lock = HousingLock::unlocked(group);
        lock.is_locked = true;
        assert_eq!(check_assignment(&p, &r, 1, None, &lock), Err(AllocationError::Locked));
    }

    #[test]
    fn test_assignment_rejected_on_category_mismatch() {
        let group = Uuid::new_v4();
        let p = participant(group, "female", "youth", 15);
        let r = room("male", "youth", 4, 1);
        assert_eq!(
            check_assignment(&p, &r, 1, None, &unlocked()),
            Err(AllocationError::CategoryMismatch {
                participant: CategoryTag::FemaleU18,
                room: CategoryTag::MaleU18,
            })
        );
    }

    #[test]
    fn test_assignment_rejected_when_bed_occupied() {
        let group = Uuid::new_v4();
        let p = participant(group, "male", "chaperone", 40);
        let r = room("male", "chaperone", 2, 1);
        let other = Uuid::new_v4();
        assert_eq!(
            check_assignment(&p, &r, 2, Some(other), &unlocked()),
            Err(AllocationError::BedOccupied {
                room_id: r.id,
                bed_number: 2
            })
        );
        // Same participant re-selecting their own bed is fine
        assert_eq!(check_assignment(&p, &r, 2, Some(p.id), &unlocked()), Ok(()));
    }

    #[test]
    fn test_assignment_rejected_for_missing_bed() {
        let group = Uuid::new_v4();
        let p = participant(group, "male", "youth", 15);
        let r = room("male", "youth", 3, 1);
        assert!(matches!(
            check_assignment(&p, &r, 0, None, &unlocked()),
            Err(AllocationError::BedOutOfRange { .. })
        ));
        assert!(matches!(
            check_assignment(&p, &r, 4, None, &unlocked()),
            Err(AllocationError::BedOutOfRange { capacity: 3, .. })
        ));
    }

    #[test]
    fn test_assignment_rejected_for_reserved_room_and_clergy() {
        let group = Uuid::new_v4();
        let mut r = room("male", "chaperone", 2, 1);
        r.group_registration_id = Some(Uuid::new_v4());
        let p = participant(group, "male", "chaperone", 40);
        assert_eq!(
            check_assignment(&p, &r, 1, None, &unlocked()),
            Err(AllocationError::RoomNotEligible(r.id))
        );

        r.group_registration_id = Some(group);
        let priest = participant(group, "male", "clergy", 55);
        assert_eq!(
            check_assignment(&priest, &r, 1, None, &unlocked()),
            Err(AllocationError::NotHousable(priest.id))
        );
    }

    #[test]
    fn test_unassignment_locked() {
        let mut lock = unlocked();
        assert!(check_unassignment(&lock).is_ok());
        lock.is_locked = true;
        assert_eq!(check_unassignment(&lock), Err(AllocationError::Locked));
    }

    #[test]
    fn test_lock_cycle() {
        let now = Utc::now().naive_utc();
        let open = unlocked();
        assert_eq!(request_unlock(&open, now), Err(AllocationError::NotLocked));

        let locked = submit(&open, now);
        assert!(locked.is_locked);
        assert_eq!(locked.locked_at, Some(now));
        assert_eq!(submit(&locked, Utc::now().naive_utc()), locked);

        let requested = request_unlock(&locked, now).unwrap();
        assert!(requested.is_locked && requested.unlock_requested);

        let reopened = approve_unlock(&requested);
        assert!(!reopened.is_locked && !reopened.unlock_requested);
        assert_eq!(reopened.locked_at, None);
    }

    #[test]
    fn test_resubmit_clears_pending_request() {
        let now = Utc::now().naive_utc();
        let mut lock = unlocked();
        lock.unlock_requested = true;
        let locked = submit(&lock, now);
        assert!(!locked.unlock_requested);
    }

    #[test]
    fn test_auto_assign_fills_rooms_in_order_then_beds_ascending() {
        let group = Uuid::new_v4();
        let participants: Vec<Participant> =
            (0..5).map(|_| participant(group, "female", "youth", 14)).collect();

        let first = room("female", "youth", 2, 1);
        let second = room("female", "youth", 3, 2);
        let rooms = vec![
            RoomWithBeds::from_occupants(first.clone(), &[]),
            RoomWithBeds::from_occupants(second.clone(), &[]),
        ];

        let plan = plan_auto_assign(group, CategoryTag::FemaleU18, &participants, &rooms);
        assert_eq!(plan.assigned(), 5);
        assert_eq!(plan.unplaced, 0);

        let beds: Vec<(Uuid, i32)> = plan.placements.iter().map(|p| (p.room_id, p.bed_number)).collect();
        assert_eq!(
            beds,
            vec![
                (first.id, 1),
                (first.id, 2),
                (second.id, 1),
                (second.id, 2),
                (second.id, 3)
            ]
        );
        let ids: Vec<Uuid> = plan.placements.iter().map(|p| p.participant_id).collect();
        assert_eq!(ids, participants.iter().map(|p| p.id).collect::<Vec<_>>());
    }

    #[test]
    fn test_auto_assign_assigns_min_of_participants_and_free_beds() {
        let group = Uuid::new_v4();
        let mut participants: Vec<Participant> =
            (0..4).map(|_| participant(group, "male", "youth", 16)).collect();

        let r = room("male", "youth", 3, 1);
        // Bed 2 already held by someone in the group
        participants[0].room_id = Some(r.id);
        participants[0].bed_number = Some(2);
        let rooms = vec![RoomWithBeds::from_occupants(r.clone(), &participants)];

        let plan = plan_auto_assign(group, CategoryTag::MaleU18, &participants, &rooms);
        // k = 3 unassigned, m = 2 free beds
        assert_eq!(plan.assigned(), 2);
        assert_eq!(plan.unplaced, 1);
        let beds: Vec<i32> = plan.placements.iter().map(|p| p.bed_number).collect();
        assert_eq!(beds, vec![1, 3]);
    }

    #[test]
    fn test_auto_assign_ignores_other_categories_and_reserved_rooms() {
        let group = Uuid::new_v4();
        let participants = vec![
            participant(group, "male", "youth", 16),
            participant(group, "female", "youth", 16),
            participant(group, "male", "chaperone", 45),
        ];
        let mut reserved = room("male", "youth", 4, 1);
        reserved.group_registration_id = Some(Uuid::new_v4());
        let wrong_type = room("male", "chaperone", 4, 2);
        let rooms = vec![
            RoomWithBeds::from_occupants(reserved, &[]),
            RoomWithBeds::from_occupants(wrong_type, &[]),
        ];

        let plan = plan_auto_assign(group, CategoryTag::MaleU18, &participants, &rooms);
        assert_eq!(plan.assigned(), 0);
        assert_eq!(plan.unplaced, 1);
    }

    #[test]
    fn test_auto_assign_never_double_books_a_bed() {
        let group = Uuid::new_v4();
        let participants: Vec<Participant> =
            (0..10).map(|_| participant(group, "female", "chaperone", 30)).collect();
        let rooms: Vec<RoomWithBeds> = (1..=3)
            .map(|i| RoomWithBeds::from_occupants(room("female", "chaperone", 2, i), &[]))
            .collect();

        let plan = plan_auto_assign(group, CategoryTag::FemaleChaperone, &participants, &rooms);
        let unique: HashSet<(Uuid, i32)> =
            plan.placements.iter().map(|p| (p.room_id, p.bed_number)).collect();
        assert_eq!(unique.len(), plan.placements.len());
        assert_eq!(plan.assigned(), 6);
        assert_eq!(plan.unplaced, 4);
    }

    #[test]
    fn test_category_counts() {
        let group = Uuid::new_v4();
        let mut participants = vec![
            participant(group, "male", "youth", 16),
            participant(group, "male", "youth", 16),
            participant(group, "male", "clergy", 60),
        ];
        participants[0].room_id = Some(Uuid::new_v4());
        participants[0].bed_number = Some(1);

        let counts = category_counts(&participants);
        let male_u18 = counts
            .iter()
            .find(|c| c.category == CategoryTag::MaleU18)
            .unwrap();
        assert_eq!(male_u18.assigned, 1);
        assert_eq!(male_u18.unassigned, 1);
        let total: usize = counts.iter().map(|c| c.assigned + c.unassigned).sum();
        assert_eq!(total, 2);
    }
}
