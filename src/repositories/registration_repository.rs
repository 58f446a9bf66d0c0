use crate::error::RepositoryError;
use crate::models::{GroupRegistration, IndividualRegistration, RegistrationRef};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

const GROUP_COLUMNS: &str = r#"
    id,
    event_id,
    group_name,
    leader_name,
    leader_email,
    housing_type,
    youth_count_male_u18,
    youth_count_female_u18,
    chaperone_count_male,
    chaperone_count_female,
    clergy_count,
    total_participants,
    total_amount,
    deposit_amount,
    created_at
"#;

const INDIVIDUAL_COLUMNS: &str = r#"
    id,
    event_id,
    first_name,
    last_name,
    email,
    age,
    gender,
    participant_type,
    housing_type,
    total_amount,
    created_at
"#;

/// Insert payload for a group registration
#[derive(Debug, Clone)]
pub struct NewGroupRegistration {
    pub event_id: Uuid,
    pub group_name: String,
    pub leader_name: String,
    pub leader_email: String,
    pub housing_type: String,
    pub youth_count_male_u18: i32,
    pub youth_count_female_u18: i32,
    pub chaperone_count_male: i32,
    pub chaperone_count_female: i32,
    pub clergy_count: i32,
    pub total_participants: i32,
    pub total_amount: Decimal,
    pub deposit_amount: Decimal,
}

/// Insert payload for an individual registration
#[derive(Debug, Clone)]
pub struct NewIndividualRegistration {
    pub event_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
    pub gender: String,
    pub participant_type: String,
    pub housing_type: String,
    pub total_amount: Decimal,
}

/// Repository for group and individual registrations
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a group registration
    pub async fn create_group(
        &self,
        conn: &mut PgConnection,
        new: &NewGroupRegistration,
    ) -> Result<GroupRegistration, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO group_registrations (
                event_id, group_name, leader_name, leader_email, housing_type,
                youth_count_male_u18, youth_count_female_u18,
                chaperone_count_male, chaperone_count_female, clergy_count,
                total_participants, total_amount, deposit_amount
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            GROUP_COLUMNS
        );
        let registration = sqlx::query_as::<_, GroupRegistration>(&sql)
            .bind(new.event_id)
            .bind(&new.group_name)
            .bind(&new.leader_name)
            .bind(&new.leader_email)
            .bind(&new.housing_type)
            .bind(new.youth_count_male_u18)
            .bind(new.youth_count_female_u18)
            .bind(new.chaperone_count_male)
            .bind(new.chaperone_count_female)
            .bind(new.clergy_count)
            .bind(new.total_participants)
            .bind(new.total_amount)
            .bind(new.deposit_amount)
            .fetch_one(conn)
            .await?;

        Ok(registration)
    }

    pub async fn create_individual(
        &self,
        conn: &mut PgConnection,
        new: &NewIndividualRegistration,
    ) -> Result<IndividualRegistration, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO individual_registrations (
                event_id, first_name, last_name, email, age, gender,
                participant_type, housing_type, total_amount
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            INDIVIDUAL_COLUMNS
        );
        let registration = sqlx::query_as::<_, IndividualRegistration>(&sql)
            .bind(new.event_id)
            .bind(&new.first_name)
            .bind(&new.last_name)
            .bind(&new.email)
            .bind(new.age)
            .bind(&new.gender)
            .bind(&new.participant_type)
            .bind(&new.housing_type)
            .bind(new.total_amount)
            .fetch_one(conn)
            .await?;

        Ok(registration)
    }

    /// Find a group registration by UUID
    pub async fn find_group(&self, id: Uuid) -> Result<Option<GroupRegistration>, RepositoryError> {
        let sql = format!("SELECT {} FROM group_registrations WHERE id = $1", GROUP_COLUMNS);
        let registration = sqlx::query_as::<_, GroupRegistration>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(registration)
    }

    pub async fn find_individual(
        &self,
        id: Uuid,
    ) -> Result<Option<IndividualRegistration>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM individual_registrations WHERE id = $1",
            INDIVIDUAL_COLUMNS
        );
        let registration = sqlx::query_as::<_, IndividualRegistration>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(registration)
    }

    /// All group registrations of an event, oldest first
    pub async fn list_groups_by_event(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<GroupRegistration>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM group_registrations
            WHERE event_id = $1
            ORDER BY created_at, id
            "#,
            GROUP_COLUMNS
        );
        let registrations = sqlx::query_as::<_, GroupRegistration>(&sql)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(registrations)
    }

    /// Number of people a registration brings, if it belongs to the event.
    ///
    /// The registration row is locked so its headcount cannot change while a
    /// meal-group assignment is being validated.
    pub async fn headcount_for_update(
        &self,
        conn: &mut PgConnection,
        event_id: Uuid,
        registration: RegistrationRef,
    ) -> Result<Option<i64>, RepositoryError> {
        let sql = match registration {
            RegistrationRef::Group(_) => {
                r#"
                SELECT total_participants::BIGINT
                FROM group_registrations
                WHERE id = $1 AND event_id = $2
                FOR UPDATE
                "#
            }
            RegistrationRef::Individual(_) => {
                r#"
                SELECT 1::BIGINT
                FROM individual_registrations
                WHERE id = $1 AND event_id = $2
                FOR UPDATE
                "#
            }
        };
        let headcount: Option<(i64,)> = sqlx::query_as(sql)
            .bind(registration.id())
            .bind(event_id)
            .fetch_optional(conn)
            .await?;

        Ok(headcount.map(|(n,)| n))
    }
}
