use crate::error::RepositoryError;
use crate::models::{FormType, LiabilityForm};
use sqlx::PgPool;
use uuid::Uuid;

const FORM_COLUMNS: &str = "id, event_id, participant_id, form_type, data, submitted_at";

/// Repository for submitted liability forms
pub struct LiabilityFormRepository {
    pool: PgPool,
}

impl LiabilityFormRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        event_id: Uuid,
        participant_id: Option<Uuid>,
        form_type: FormType,
        data: &serde_json::Value,
    ) -> Result<LiabilityForm, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO liability_forms (event_id, participant_id, form_type, data)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            FORM_COLUMNS
        );
        let form = sqlx::query_as::<_, LiabilityForm>(&sql)
            .bind(event_id)
            .bind(participant_id)
            .bind(form_type.as_str())
            .bind(data)
            .fetch_one(&self.pool)
            .await?;

        Ok(form)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<LiabilityForm>, RepositoryError> {
        let sql = format!("SELECT {} FROM liability_forms WHERE id = $1", FORM_COLUMNS);
        let form = sqlx::query_as::<_, LiabilityForm>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(form)
    }
}
