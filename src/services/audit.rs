use crate::allocation::{AutoAssignPlan, BalancePlan, CategoryTag};
use crate::error::{AppError, AppResult};
use crate::models::{HousingLock, MealGroupAssignment, Payment, RegistrationRef};
use chrono::{NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

/// Audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub timestamp: i64,
    pub action: String, // "bed_assigned", "housing_submitted", "meal_group_assigned", etc.
    pub event_id: Option<Uuid>,
    pub group_registration_id: Option<Uuid>,
    pub details: serde_json::Value,
}

impl AuditLogEntry {
    fn new(
        action: &str,
        event_id: Option<Uuid>,
        group_registration_id: Option<Uuid>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            timestamp: Utc::now().timestamp(),
            action: action.to_string(),
            event_id,
            group_registration_id,
            details,
        }
    }
}

/// File currently being appended to and the UTC day it covers
struct DailyFile {
    date: NaiveDate,
    file: std::fs::File,
}

/// Append-only JSON-lines trail of housing, meal-group and payment mutations.
///
/// Entries go to `audit_<date>.log` for the UTC day of their timestamp, so a
/// long-running server starts a new file at midnight. Recording never fails
/// the caller: write errors are logged and dropped.
pub struct AuditTrailService {
    log_directory: PathBuf,
    current: Arc<Mutex<DailyFile>>,
}

fn open_log(path: &Path) -> AppResult<std::fs::File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::Message(format!("Failed to open audit log file: {}", e)))
}

impl AuditTrailService {
    /// Create a new audit trail service writing into `log_directory`
    pub fn new(log_directory: PathBuf) -> AppResult<Self> {
        std::fs::create_dir_all(&log_directory)
            .map_err(|e| AppError::Message(format!("Failed to create log directory: {}", e)))?;

        let date = Utc::now().date_naive();
        let log_file = Self::file_for(&log_directory, date);
        let file = open_log(&log_file)?;

        info!("Audit trail initialized: {:?}", log_file);

        Ok(Self {
            log_directory,
            current: Arc::new(Mutex::new(DailyFile { date, file })),
        })
    }

    fn file_for(log_directory: &Path, date: NaiveDate) -> PathBuf {
        log_directory.join(format!("audit_{}.log", date.format("%Y-%m-%d")))
    }

    /// Today's log file
    pub fn log_file(&self) -> PathBuf {
        Self::file_for(&self.log_directory, Utc::now().date_naive())
    }

    /// Write one entry into the file of its day
    pub async fn log(&self, entry: AuditLogEntry) -> AppResult<()> {
        let json = serde_json::to_string(&entry)?;
        let date = Utc
            .timestamp_opt(entry.timestamp, 0)
            .single()
            .map(|at| at.date_naive())
            .unwrap_or_else(|| Utc::now().date_naive());

        let mut current = self.current.lock().await;
        if current.date != date {
            let path = Self::file_for(&self.log_directory, date);
            current.file = open_log(&path)?;
            current.date = date;
            info!("Audit trail rotated: {:?}", path);
        }

        writeln!(current.file, "{}", json)
            .map_err(|e| AppError::Message(format!("Failed to write audit log: {}", e)))?;

        current
            .file
            .flush()
            .map_err(|e| AppError::Message(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    async fn record(&self, entry: AuditLogEntry) {
        let action = entry.action.clone();
        if let Err(e) = self.log(entry).await {
            warn!("Audit entry {} not written: {}", action, e);
        }
    }

    pub async fn log_bed_assigned(
        &self,
        event_id: Uuid,
        group_id: Uuid,
        participant_id: Uuid,
        room_id: Uuid,
        bed_number: i32,
    ) {
        self.record(AuditLogEntry::new(
            "bed_assigned",
            Some(event_id),
            Some(group_id),
            serde_json::json!({
                "participant_id": participant_id.to_string(),
                "room_id": room_id.to_string(),
                "bed_number": bed_number,
            }),
        ))
        .await
    }

    pub async fn log_bed_unassigned(
        &self,
        event_id: Uuid,
        group_id: Uuid,
        participant_id: Uuid,
        previous: (Uuid, i32),
    ) {
        self.record(AuditLogEntry::new(
            "bed_unassigned",
            Some(event_id),
            Some(group_id),
            serde_json::json!({
                "participant_id": participant_id.to_string(),
                "room_id": previous.0.to_string(),
                "bed_number": previous.1,
            }),
        ))
        .await
    }

    pub async fn log_housing_auto_assigned(
        &self,
        event_id: Uuid,
        group_id: Uuid,
        category: CategoryTag,
        plan: &AutoAssignPlan,
    ) {
        self.record(AuditLogEntry::new(
            "housing_auto_assigned",
            Some(event_id),
            Some(group_id),
            serde_json::json!({
                "category": category.as_str(),
                "assigned": plan.assigned(),
                "unplaced": plan.unplaced,
            }),
        ))
        .await
    }

    /// Lock transitions: submitted, unlock requested, unlock approved
    pub async fn log_housing_lock(&self, action: &str, event_id: Uuid, lock: &HousingLock) {
        self.record(AuditLogEntry::new(
            action,
            Some(event_id),
            Some(lock.group_registration_id),
            serde_json::json!({
                "is_locked": lock.is_locked,
                "unlock_requested": lock.unlock_requested,
            }),
        ))
        .await
    }

    pub async fn log_meal_group_assigned(&self, event_id: Uuid, assignment: &MealGroupAssignment) {
        self.record(AuditLogEntry::new(
            "meal_group_assigned",
            Some(event_id),
            assignment.group_registration_id,
            serde_json::json!({
                "meal_group_id": assignment.meal_group_id.to_string(),
                "individual_registration_id": assignment.individual_registration_id.map(|id| id.to_string()),
            }),
        ))
        .await
    }

    pub async fn log_meal_group_unassigned(
        &self,
        event_id: Uuid,
        registration: RegistrationRef,
        meal_group_id: Uuid,
    ) {
        self.record(AuditLogEntry::new(
            "meal_group_unassigned",
            Some(event_id),
            registration.group_id(),
            serde_json::json!({
                "registration": registration,
                "meal_group_id": meal_group_id.to_string(),
            }),
        ))
        .await
    }

    pub async fn log_meal_groups_auto_assigned(&self, event_id: Uuid, plan: &BalancePlan) {
        self.record(AuditLogEntry::new(
            "meal_groups_auto_assigned",
            Some(event_id),
            None,
            serde_json::json!({
                "assigned": plan.placements.len(),
                "skipped": plan.skipped.len(),
            }),
        ))
        .await
    }

    pub async fn log_payment_recorded(&self, event_id: Uuid, payment: &Payment) {
        self.record(AuditLogEntry::new(
            "payment_recorded",
            Some(event_id),
            None,
            serde_json::json!({
                "payment_id": payment.id.to_string(),
                "registration_id": payment.registration_id.to_string(),
                "kind": payment.kind,
                "amount": payment.amount.to_string(),
                "method": payment.method,
            }),
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_entries_appended_as_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let audit = AuditTrailService::new(dir.path().to_path_buf()).unwrap();

        let group = Uuid::new_v4();
        audit
            .log_bed_assigned(Uuid::new_v4(), group, Uuid::new_v4(), Uuid::new_v4(), 2)
            .await;
        audit
            .log_housing_lock("housing_submitted", Uuid::new_v4(), &HousingLock::unlocked(group))
            .await;

        let contents = std::fs::read_to_string(audit.log_file()).unwrap();
        let entries: Vec<AuditLogEntry> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "bed_assigned");
        assert_eq!(entries[0].details["bed_number"], 2);
        assert_eq!(entries[1].group_registration_id, Some(group));
    }

    #[tokio::test]
    async fn test_entries_go_to_the_file_of_their_day() {
        let dir = tempfile::tempdir().unwrap();
        let audit = AuditTrailService::new(dir.path().to_path_buf()).unwrap();

        let mut earlier = AuditLogEntry::new("payment_recorded", None, None, serde_json::json!({}));
        earlier.timestamp = Utc
            .with_ymd_and_hms(2024, 7, 12, 23, 59, 0)
            .unwrap()
            .timestamp();
        let mut later = earlier.clone();
        later.timestamp += 120;
        later.action = "bed_assigned".to_string();

        audit.log(earlier).await.unwrap();
        audit.log(later).await.unwrap();

        let first = std::fs::read_to_string(dir.path().join("audit_2024-07-12.log")).unwrap();
        let second = std::fs::read_to_string(dir.path().join("audit_2024-07-13.log")).unwrap();
        assert_eq!(first.lines().count(), 1);
        assert!(first.contains("payment_recorded"));
        assert_eq!(second.lines().count(), 1);
        assert!(second.contains("bed_assigned"));
    }
}
