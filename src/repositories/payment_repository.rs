use crate::error::RepositoryError;
use crate::models::{Payment, PaymentAccount, PaymentKind, RegistrationKind};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

const ACCOUNT_COLUMNS: &str =
    "registration_id, event_id, registration_kind, total_amount_due, created_at, updated_at";

const PAYMENT_COLUMNS: &str = "id, registration_id, kind, amount, method, note, recorded_at";

/// Repository for payment accounts and their ledger entries
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open the account of a new registration
    pub async fn create_account(
        &self,
        conn: &mut PgConnection,
        registration_id: Uuid,
        event_id: Uuid,
        kind: RegistrationKind,
        total_amount_due: Decimal,
    ) -> Result<PaymentAccount, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO payment_accounts (registration_id, event_id, registration_kind, total_amount_due)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        );
        let account = sqlx::query_as::<_, PaymentAccount>(&sql)
            .bind(registration_id)
            .bind(event_id)
            .bind(kind.as_str())
            .bind(total_amount_due)
            .fetch_one(conn)
            .await?;

        Ok(account)
    }

    pub async fn find_account(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<PaymentAccount>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM payment_accounts WHERE registration_id = $1",
            ACCOUNT_COLUMNS
        );
        let account = sqlx::query_as::<_, PaymentAccount>(&sql)
            .bind(registration_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    /// Lock an account so concurrent refunds see each other
    pub async fn find_account_for_update(
        &self,
        conn: &mut PgConnection,
        registration_id: Uuid,
    ) -> Result<Option<PaymentAccount>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM payment_accounts WHERE registration_id = $1 FOR UPDATE",
            ACCOUNT_COLUMNS
        );
        let account = sqlx::query_as::<_, PaymentAccount>(&sql)
            .bind(registration_id)
            .fetch_optional(conn)
            .await?;

        Ok(account)
    }

    /// Append a payment or refund and bump the account's `updated_at`
    pub async fn insert_entry(
        &self,
        conn: &mut PgConnection,
        registration_id: Uuid,
        kind: PaymentKind,
        amount: Decimal,
        method: &str,
        note: Option<&str>,
    ) -> Result<Payment, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO payments (registration_id, kind, amount, method, note)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            PAYMENT_COLUMNS
        );
        let payment = sqlx::query_as::<_, Payment>(&sql)
            .bind(registration_id)
            .bind(kind.as_str())
            .bind(amount)
            .bind(method)
            .bind(note)
            .fetch_one(&mut *conn)
            .await?;

        sqlx::query("UPDATE payment_accounts SET updated_at = NOW() WHERE registration_id = $1")
            .bind(registration_id)
            .execute(conn)
            .await?;

        Ok(payment)
    }

    /// Ledger entries of an account, oldest first
    pub async fn list_entries(
        &self,
        conn: &mut PgConnection,
        registration_id: Uuid,
    ) -> Result<Vec<Payment>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM payments
            WHERE registration_id = $1
            ORDER BY recorded_at, id
            "#,
            PAYMENT_COLUMNS
        );
        let payments = sqlx::query_as::<_, Payment>(&sql)
            .bind(registration_id)
            .fetch_all(conn)
            .await?;

        Ok(payments)
    }
}
