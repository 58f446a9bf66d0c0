//! Greedy meal-group balancing and the balance dashboard read model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AllocationError;
use crate::models::{MealGroup, RegistrationRef};

/// A group is flagged low when it holds less than this share of the mean
pub const LOW_SHARE_THRESHOLD: Decimal = Decimal::from_parts(7, 0, 0, false, 1);

/// Order in which pending registrations are handed out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignOrder {
    /// Registration creation order
    #[default]
    Registration,
    /// Largest headcount first, creation order among equals
    LargestFirst,
}

/// Load of one meal group as seen by the balancer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealGroupLoad {
    pub id: Uuid,
    pub capacity: i64,
    pub current_size: i64,
    pub is_active: bool,
}

impl From<&MealGroup> for MealGroupLoad {
    fn from(group: &MealGroup) -> Self {
        Self {
            id: group.id,
            capacity: i64::from(group.capacity),
            current_size: group.current_size,
            is_active: group.is_active,
        }
    }
}

/// Registration without a meal group, with the number of people it brings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRegistration {
    pub registration: RegistrationRef,
    pub headcount: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlacement {
    pub registration: RegistrationRef,
    pub meal_group_id: Uuid,
    pub headcount: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancePlan {
    pub placements: Vec<MealPlacement>,
    /// Registrations no active group had room for
    pub skipped: Vec<RegistrationRef>,
}

/// Hand each pending registration to the active group that is currently
/// smallest and can still fit it.
///
/// Sizes are updated after every pick, so later registrations in the same
/// batch see earlier ones. Ties go to the group that comes first in
/// `groups` (display order). Already-assigned registrations are never moved.
pub fn plan_auto_assign(
    groups: &[MealGroupLoad],
    pending: &[PendingRegistration],
    order: AssignOrder,
) -> BalancePlan {
    let mut loads: Vec<MealGroupLoad> = groups.iter().filter(|g| g.is_active).cloned().collect();

    let mut queue: Vec<PendingRegistration> = pending.to_vec();
    if order == AssignOrder::LargestFirst {
        // stable: equal headcounts keep creation order
        queue.sort_by(|a, b| b.headcount.cmp(&a.headcount));
    }

    let mut plan = BalancePlan::default();
    for registration in queue {
        let target = loads
            .iter_mut()
            .filter(|g| g.current_size + registration.headcount <= g.capacity)
            .min_by_key(|g| g.current_size);

        match target {
            Some(group) => {
                group.current_size += registration.headcount;
                plan.placements.push(MealPlacement {
                    registration: registration.registration,
                    meal_group_id: group.id,
                    headcount: registration.headcount,
                });
            }
            None => plan.skipped.push(registration.registration),
        }
    }

    plan
}

/// Manual assignment check: the group must be active and able to take
/// `headcount` more people.
pub fn check_capacity(group: &MealGroup, headcount: i64) -> Result<(), AllocationError> {
    if !group.is_active {
        return Err(AllocationError::MealGroupInactive(group.name.clone()));
    }
    if group.current_size + headcount > i64::from(group.capacity) {
        return Err(AllocationError::MealGroupFull {
            name: group.name.clone(),
            capacity: group.capacity,
            current_size: group.current_size,
            headcount,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupShare {
    pub id: Uuid,
    pub name: String,
    pub color_hex: String,
    pub capacity: i32,
    pub current_size: i64,
    pub share_percent: Decimal,
    pub is_low: bool,
}

/// Balance dashboard over the active meal groups of an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceReport {
    pub total_assigned: i64,
    pub mean_size: Decimal,
    pub groups: Vec<GroupShare>,
}

/// Compute the dashboard; nothing here is stored.
pub fn balance_report(groups: &[MealGroup]) -> BalanceReport {
    let active: Vec<&MealGroup> = groups.iter().filter(|g| g.is_active).collect();
    let total_assigned: i64 = active.iter().map(|g| g.current_size).sum();

    let mean_size = if active.is_empty() {
        Decimal::ZERO
    } else {
        Decimal::from(total_assigned) / Decimal::from(active.len() as u64)
    };
    let low_line = mean_size * LOW_SHARE_THRESHOLD;

    let groups = active
        .into_iter()
        .map(|g| {
            let size = Decimal::from(g.current_size);
            let share_percent = if total_assigned == 0 {
                Decimal::ZERO
            } else {
                (size / Decimal::from(total_assigned) * Decimal::ONE_HUNDRED).round_dp(2)
            };
            GroupShare {
                id: g.id,
                name: g.name.clone(),
                color_hex: g.color_hex.clone(),
                capacity: g.capacity,
                current_size: g.current_size,
                share_percent,
                is_low: size < low_line,
            }
        })
        .collect();

    BalanceReport {
        total_assigned,
        mean_size: mean_size.round_dp(2),
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn load(size: i64) -> MealGroupLoad {
        MealGroupLoad {
            id: Uuid::new_v4(),
            capacity: 100,
            current_size: size,
            is_active: true,
        }
    }

    fn group(name: &str, size: i64, active: bool) -> MealGroup {
        MealGroup {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            name: name.to_string(),
            color_hex: "#FF0000".to_string(),
            capacity: 100,
            breakfast_time: None,
            lunch_time: None,
            dinner_time: None,
            is_active: active,
            display_order: 0,
            created_at: Utc::now().naive_utc(),
            current_size: size,
        }
    }

    fn pending(headcount: i64) -> PendingRegistration {
        PendingRegistration {
            registration: RegistrationRef::Group(Uuid::new_v4()),
            headcount,
        }
    }

    fn final_sizes(groups: &[MealGroupLoad], plan: &BalancePlan) -> Vec<i64> {
        groups
            .iter()
            .map(|g| {
                g.current_size
                    + plan
                        .placements
                        .iter()
                        .filter(|p| p.meal_group_id == g.id)
                        .map(|p| p.headcount)
                        .sum::<i64>()
            })
            .collect()
    }

    #[test]
    fn test_equal_groups_take_one_each() {
        let groups = vec![load(10), load(10), load(10)];
        let batch = vec![pending(1), pending(1), pending(1)];
        let plan = plan_auto_assign(&groups, &batch, AssignOrder::Registration);
        assert_eq!(final_sizes(&groups, &plan), vec![11, 11, 11]);
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn test_large_group_goes_to_smallest_first() {
        let groups = vec![load(10), load(10), load(10)];
        let batch = vec![pending(9)];
        let plan = plan_auto_assign(&groups, &batch, AssignOrder::Registration);
        assert_eq!(final_sizes(&groups, &plan), vec![19, 10, 10]);
    }

    #[test]
    fn test_sizes_recomputed_within_batch() {
        let groups = vec![load(10), load(10), load(10)];
        let batch = vec![pending(9), pending(1), pending(1), pending(1)];
        let plan = plan_auto_assign(&groups, &batch, AssignOrder::Registration);
        // 9 → A, then B and C get one each, then B (tie with C, display order)
        assert_eq!(final_sizes(&groups, &plan), vec![19, 12, 11]);
    }

    #[test]
    fn test_largest_first_order() {
        let groups = vec![load(0), load(0)];
        let small = pending(2);
        let big = pending(8);
        let plan = plan_auto_assign(&groups, &[small, big], AssignOrder::LargestFirst);
        assert_eq!(plan.placements[0].registration, big.registration);
        assert_eq!(final_sizes(&groups, &plan), vec![8, 2]);
    }

    #[test]
    fn test_inactive_and_full_groups_skipped() {
        let mut inactive = load(0);
        inactive.is_active = false;
        let mut nearly_full = load(0);
        nearly_full.capacity = 3;
        let groups = vec![inactive, nearly_full];

        let fits = pending(3);
        let too_big = pending(1);
        let plan = plan_auto_assign(&groups, &[fits, too_big], AssignOrder::Registration);
        assert_eq!(plan.placements.len(), 1);
        assert_eq!(plan.placements[0].meal_group_id, groups[1].id);
        assert_eq!(plan.skipped, vec![too_big.registration]);
    }

    #[test]
    fn test_no_groups_skips_everything() {
        let batch = vec![pending(1), pending(2)];
        let plan = plan_auto_assign(&[], &batch, AssignOrder::Registration);
        assert!(plan.placements.is_empty());
        assert_eq!(plan.skipped.len(), 2);
    }

    #[test]
    fn test_check_capacity() {
        let mut g = group("Red", 98, true);
        assert!(check_capacity(&g, 2).is_ok());
        assert!(matches!(
            check_capacity(&g, 3),
            Err(AllocationError::MealGroupFull { .. })
        ));
        g.is_active = false;
        assert_eq!(
            check_capacity(&g, 1),
            Err(AllocationError::MealGroupInactive("Red".to_string()))
        );
    }

    #[test]
    fn test_balance_report_shares_and_low_flag() {
        let groups = vec![
            group("Red", 40, true),
            group("Blue", 40, true),
            group("Green", 20, true),
            group("Gray", 500, false),
        ];
        let report = balance_report(&groups);

        assert_eq!(report.total_assigned, 100);
        assert_eq!(report.groups.len(), 3);
        assert_eq!(report.mean_size, Decimal::new(3333, 2));
        assert_eq!(report.groups[0].share_percent, Decimal::new(40, 0));
        assert_eq!(report.groups[2].share_percent, Decimal::new(20, 0));
        // 70% of 33.33 is 23.33: only Green is low
        let low: Vec<&str> = report
            .groups
            .iter()
            .filter(|g| g.is_low)
            .map(|g| g.name.as_str())
            .collect();
        assert_eq!(low, vec!["Green"]);
    }

    #[test]
    fn test_balance_report_empty() {
        let report = balance_report(&[group("Red", 0, true)]);
        assert_eq!(report.total_assigned, 0);
        assert_eq!(report.groups[0].share_percent, Decimal::ZERO);
        assert!(!report.groups[0].is_low);
    }
}
