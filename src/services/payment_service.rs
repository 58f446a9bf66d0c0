use crate::billing::ledger;
use crate::error::{AppError, AppResult};
use crate::models::{Payment, PaymentAccount, PaymentBalance, PaymentKind};
use crate::repositories::PaymentRepository;
use crate::services::AuditTrailService;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// A payment or refund to record against a registration
#[derive(Debug, Clone)]
pub struct PaymentInput {
    pub kind: PaymentKind,
    pub amount: Decimal,
    pub method: String,
    pub note: Option<String>,
}

fn balance_of(account: &PaymentAccount, entries: &[Payment]) -> PaymentBalance {
    let summary = ledger::summarize(account.total_amount_due, ledger::net_paid(entries));
    PaymentBalance {
        registration_id: account.registration_id,
        event_id: account.event_id,
        registration_kind: account.registration_kind.clone(),
        total_amount_due: account.total_amount_due,
        amount_paid: summary.amount_paid,
        amount_remaining: summary.amount_remaining,
        overpaid_amount: summary.overpaid_amount,
        status: summary.status,
    }
}

/// Payment ledger per registration
pub struct PaymentService {
    pool: PgPool,
    payment_repo: Arc<PaymentRepository>,
    audit: Arc<AuditTrailService>,
}

impl PaymentService {
    pub fn new(pool: PgPool, payment_repo: Arc<PaymentRepository>, audit: Arc<AuditTrailService>) -> Self {
        Self {
            pool,
            payment_repo,
            audit,
        }
    }

    async fn account(&self, conn: &mut PgConnection, registration_id: Uuid) -> AppResult<PaymentAccount> {
        self.payment_repo
            .find_account_for_update(conn, registration_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No payment account for registration {}", registration_id))
            })
    }

    /// Append an entry and return the updated balance
    pub async fn record_payment(
        &self,
        registration_id: Uuid,
        input: PaymentInput,
    ) -> AppResult<PaymentBalance> {
        if input.method.trim().is_empty() {
            return Err(AppError::Validation("Payment method is required".into()));
        }
        info!(
            "Recording {}: registration={}, amount={}",
            input.kind.as_str(),
            registration_id,
            input.amount
        );

        let mut tx = self.pool.begin().await?;
        let account = self.account(&mut tx, registration_id).await?;
        let entries = self.payment_repo.list_entries(&mut tx, registration_id).await?;

        ledger::check_entry(input.kind, input.amount, ledger::net_paid(&entries))?;

        let payment = self
            .payment_repo
            .insert_entry(
                &mut tx,
                registration_id,
                input.kind,
                input.amount,
                input.method.trim(),
                input.note.as_deref(),
            )
            .await?;
        let entries = self.payment_repo.list_entries(&mut tx, registration_id).await?;
        tx.commit().await?;

        self.audit.log_payment_recorded(account.event_id, &payment).await;
        Ok(balance_of(&account, &entries))
    }

    pub async fn balance(&self, registration_id: Uuid) -> AppResult<PaymentBalance> {
        let account = self
            .payment_repo
            .find_account(registration_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No payment account for registration {}", registration_id))
            })?;
        let mut conn = self.pool.acquire().await?;
        let entries = self.payment_repo.list_entries(&mut conn, registration_id).await?;
        Ok(balance_of(&account, &entries))
    }

    /// Ledger entries, oldest first
    pub async fn history(&self, registration_id: Uuid) -> AppResult<Vec<Payment>> {
        if self.payment_repo.find_account(registration_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "No payment account for registration {}",
                registration_id
            )));
        }
        let mut conn = self.pool.acquire().await?;
        Ok(self.payment_repo.list_entries(&mut conn, registration_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentStatus;
    use chrono::Utc;

    #[test]
    fn test_balance_of_account() {
        let now = Utc::now().naive_utc();
        let account = PaymentAccount {
            registration_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            registration_kind: "group".to_string(),
            total_amount_due: Decimal::new(1000, 0),
            created_at: now,
            updated_at: now,
        };
        let entry = |kind: PaymentKind, amount: i64| Payment {
            id: Uuid::new_v4(),
            registration_id: account.registration_id,
            kind: kind.as_str().to_string(),
            amount: Decimal::new(amount, 0),
            method: "card".to_string(),
            note: None,
            recorded_at: now,
        };

        let balance = balance_of(
            &account,
            &[entry(PaymentKind::Payment, 600), entry(PaymentKind::Refund, 100)],
        );
        assert_eq!(balance.amount_paid, Decimal::new(500, 0));
        assert_eq!(balance.amount_remaining, Decimal::new(500, 0));
        assert_eq!(balance.status, PaymentStatus::Partial);
    }
}
