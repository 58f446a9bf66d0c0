use crate::error::RepositoryError;
use crate::models::{Event, EventPricing};
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

const EVENT_COLUMNS: &str = "id, organization_id, name, starts_on, ends_on, created_at";

const PRICING_COLUMNS: &str = r#"
    event_id,
    youth_regular_price,
    chaperone_regular_price,
    clergy_regular_price,
    on_campus_youth_price,
    on_campus_chaperone_price,
    off_campus_youth_price,
    off_campus_chaperone_price,
    day_pass_youth_price,
    day_pass_chaperone_price,
    deposit_percent,
    updated_at
"#;

/// Repository for events and their pricing tables
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Create a new EventRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new event
    pub async fn create(
        &self,
        organization_id: Uuid,
        name: &str,
        starts_on: Option<NaiveDate>,
        ends_on: Option<NaiveDate>,
    ) -> Result<Event, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO events (organization_id, name, starts_on, ends_on)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            EVENT_COLUMNS
        );
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(organization_id)
            .bind(name)
            .bind(starts_on)
            .bind(ends_on)
            .fetch_one(&self.pool)
            .await?;

        Ok(event)
    }

    /// Find an event by UUID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, RepositoryError> {
        let sql = format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS);
        let event = sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(event)
    }

    /// Insert or replace the pricing table of an event
    pub async fn upsert_pricing(&self, pricing: &EventPricing) -> Result<EventPricing, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO event_pricing (
                event_id,
                youth_regular_price,
                chaperone_regular_price,
                clergy_regular_price,
                on_campus_youth_price,
                on_campus_chaperone_price,
                off_campus_youth_price,
                off_campus_chaperone_price,
                day_pass_youth_price,
                day_pass_chaperone_price,
                deposit_percent
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (event_id) DO UPDATE SET
                youth_regular_price = EXCLUDED.youth_regular_price,
                chaperone_regular_price = EXCLUDED.chaperone_regular_price,
                clergy_regular_price = EXCLUDED.clergy_regular_price,
                on_campus_youth_price = EXCLUDED.on_campus_youth_price,
                on_campus_chaperone_price = EXCLUDED.on_campus_chaperone_price,
                off_campus_youth_price = EXCLUDED.off_campus_youth_price,
                off_campus_chaperone_price = EXCLUDED.off_campus_chaperone_price,
                day_pass_youth_price = EXCLUDED.day_pass_youth_price,
                day_pass_chaperone_price = EXCLUDED.day_pass_chaperone_price,
                deposit_percent = EXCLUDED.deposit_percent,
                updated_at = NOW()
            RETURNING {}
            "#,
            PRICING_COLUMNS
        );
        let saved = sqlx::query_as::<_, EventPricing>(&sql)
            .bind(pricing.event_id)
            .bind(pricing.youth_regular_price)
            .bind(pricing.chaperone_regular_price)
            .bind(pricing.clergy_regular_price)
            .bind(pricing.on_campus_youth_price)
            .bind(pricing.on_campus_chaperone_price)
            .bind(pricing.off_campus_youth_price)
            .bind(pricing.off_campus_chaperone_price)
            .bind(pricing.day_pass_youth_price)
            .bind(pricing.day_pass_chaperone_price)
            .bind(pricing.deposit_percent)
            .fetch_one(&self.pool)
            .await?;

        Ok(saved)
    }

    /// Get the pricing table of an event
    pub async fn find_pricing(&self, event_id: Uuid) -> Result<Option<EventPricing>, RepositoryError> {
        let sql = format!("SELECT {} FROM event_pricing WHERE event_id = $1", PRICING_COLUMNS);
        let pricing = sqlx::query_as::<_, EventPricing>(&sql)
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(pricing)
    }
}
