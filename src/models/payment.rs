//! Payment ledger rows

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Direction of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Payment,
    Refund,
}

impl PaymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Payment => "payment",
            PaymentKind::Refund => "refund",
        }
    }
}

impl FromStr for PaymentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "payment" => Ok(PaymentKind::Payment),
            "refund" => Ok(PaymentKind::Refund),
            _ => Err(format!("Invalid payment kind: {}", s)),
        }
    }
}

/// Derived settlement state of a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    PaidFull,
    Overpaid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Partial => "partial",
            PaymentStatus::PaidFull => "paid_full",
            PaymentStatus::Overpaid => "overpaid",
        }
    }
}

/// One payment or refund recorded against a registration
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub registration_id: Uuid,
    pub kind: String, // Stored as TEXT, use PaymentKind for type safety
    pub amount: Decimal,
    pub method: String,
    pub note: Option<String>,
    pub recorded_at: NaiveDateTime,
}

impl Payment {
    pub fn kind_enum(&self) -> Option<PaymentKind> {
        self.kind.parse().ok()
    }
}

/// Balance view of a registration.
///
/// Only `total_amount_due` is stored; the rest is derived from the payment
/// rows by `billing::ledger::summarize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBalance {
    pub registration_id: Uuid,
    pub event_id: Uuid,
    pub registration_kind: String,
    pub total_amount_due: Decimal,
    pub amount_paid: Decimal,
    pub amount_remaining: Decimal,
    pub overpaid_amount: Decimal,
    pub status: PaymentStatus,
}

/// Stored part of a registration's balance
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAccount {
    pub registration_id: Uuid,
    pub event_id: Uuid,
    pub registration_kind: String,
    pub total_amount_due: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
