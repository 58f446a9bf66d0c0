use axum::response::IntoResponse;
use rally_backend::allocation::{self, AllocationError, CategoryTag};
use rally_backend::billing::{ledger, pricing, LedgerError, ParticipantCounts};
use rally_backend::config::{DatabaseConfig, LogFormat};
use rally_backend::documents::{self, FormError, RenderFormat};
use rally_backend::error::{AppError, RepositoryError};
use rally_backend::models::*;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Error mapping from domain errors to HTTP statuses
#[test]
fn test_allocation_error_statuses() {
    let locked: AppError = AllocationError::Locked.into();
    assert_eq!(locked.status_code(), 423);

    let occupied: AppError = AllocationError::BedOccupied {
        room_id: Uuid::new_v4(),
        bed_number: 1,
    }
    .into();
    assert_eq!(occupied.status_code(), 409);

    let not_locked: AppError = AllocationError::NotLocked.into();
    assert_eq!(not_locked.status_code(), 422);

    let reserved: AppError = AllocationError::RoomNotEligible(Uuid::new_v4()).into();
    assert_eq!(reserved.status_code(), 400);
}

#[test]
fn test_ledger_and_form_error_statuses() {
    let refund: AppError = LedgerError::RefundExceedsPaid {
        refund: Decimal::new(10, 0),
        paid: Decimal::ZERO,
    }
    .into();
    assert_eq!(refund.status_code(), 422);

    let crowd: AppError = pricing::PricingError::TooManyParticipants {
        total: 10_001,
        limit: pricing::MAX_REGISTRATION_PARTICIPANTS,
    }
    .into();
    assert_eq!(crowd.status_code(), 400);

    let amount: AppError = LedgerError::NonPositiveAmount(Decimal::ZERO).into();
    assert_eq!(amount.status_code(), 400);

    let missing: AppError = FormError::MissingField("signedOn").into();
    assert_eq!(missing.status_code(), 400);

    let render: AppError = FormError::Render("broken".to_string()).into();
    assert!(render.is_internal());
}

#[test]
fn test_duplicate_maps_to_conflict() {
    let err: AppError = RepositoryError::Duplicate("bed taken".to_string()).into();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(err.status_code(), 409);
}

#[tokio::test]
async fn test_internal_errors_hide_details() {
    let response = AppError::Message("connection string leaked".to_string()).into_response();
    assert_eq!(response.status().as_u16(), 500);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Internal server error");
}

#[tokio::test]
async fn test_client_errors_carry_message() {
    let response = AppError::NotFound("Event 42 not found".to_string()).into_response();
    assert_eq!(response.status().as_u16(), 404);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"].as_str().unwrap().contains("Event 42"));
}

/// Registration references
#[test]
fn test_registration_ref_requires_exactly_one_id() {
    let id = Uuid::new_v4();
    assert_eq!(
        RegistrationRef::from_ids(Some(id), None),
        Some(RegistrationRef::Group(id))
    );
    assert_eq!(
        RegistrationRef::from_ids(None, Some(id)),
        Some(RegistrationRef::Individual(id))
    );
    assert_eq!(RegistrationRef::from_ids(Some(id), Some(id)), None);
    assert_eq!(RegistrationRef::from_ids(None, None), None);
}

/// Configuration
#[test]
fn test_log_format_parsing() {
    assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
    assert_eq!("Pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
    assert!("xml".parse::<LogFormat>().is_err());
}

#[test]
fn test_database_config_validation() {
    let mut config = DatabaseConfig::default();
    assert!(config.validate().is_ok());

    config.max_connections = 0;
    assert!(config.validate().is_err());
}

/// Pricing and ledger together: a registration paid by its deposit
#[test]
fn test_deposit_payment_leaves_partial_balance() {
    let table = EventPricing::flat(
        Uuid::new_v4(),
        Decimal::new(100, 0),
        Decimal::new(50, 0),
        Decimal::ZERO,
        Decimal::new(25, 0),
    );
    let counts = ParticipantCounts {
        youth_count_female_u18: 4,
        ..Default::default()
    };
    let quote = pricing::compute_quote(&table, &counts, HousingType::OffCampus).unwrap();
    assert_eq!(quote.total, Decimal::new(400, 0));
    assert_eq!(quote.deposit, Decimal::new(100, 0));

    let summary = ledger::summarize(quote.total, quote.deposit);
    assert_eq!(summary.status, PaymentStatus::Partial);
    assert_eq!(summary.amount_remaining, quote.balance);
}

/// Housing categories
#[test]
fn test_category_of_each_participant_type() {
    use allocation::category::participant_category;

    assert_eq!(
        participant_category(Gender::Female, ParticipantType::Youth, 14),
        Some(CategoryTag::FemaleU18)
    );
    assert_eq!(
        participant_category(Gender::Male, ParticipantType::Youth, 18),
        Some(CategoryTag::MaleChaperone)
    );
    assert_eq!(
        participant_category(Gender::Male, ParticipantType::Clergy, 55),
        None
    );
}

/// Documents
#[test]
fn test_clergy_form_requires_diocese() {
    let data = documents::LiabilityFormData {
        participant_name: Some("Fr. John".to_string()),
        date_of_birth: chrono::NaiveDate::from_ymd_opt(1970, 1, 1),
        emergency_contact_name: Some("Parish Office".to_string()),
        emergency_contact_phone: Some("555-0199".to_string()),
        signature_name: Some("Fr. John".to_string()),
        signed_on: chrono::NaiveDate::from_ymd_opt(2024, 5, 1),
        ..Default::default()
    };

    let err = documents::validate(FormType::Clergy, &data).unwrap_err();
    assert!(matches!(err, FormError::MissingField("diocese")));

    // The same data is a complete adult form
    assert!(documents::validate(FormType::Adult, &data).is_ok());
    let document = documents::build_document(FormType::Adult, &data).unwrap();
    let rendered =
        documents::render_document(RenderFormat::Json.renderer().as_ref(), &document).unwrap();
    assert_eq!(rendered.content_type, "application/json");
    assert!(rendered.etag.starts_with('"'));
}
