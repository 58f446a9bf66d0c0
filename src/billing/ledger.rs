use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Payment, PaymentKind, PaymentStatus};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("Refund of {refund} exceeds the {paid} currently paid")]
    RefundExceedsPaid { refund: Decimal, paid: Decimal },
}

/// Derived balance figures for one registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub amount_paid: Decimal,
    pub amount_remaining: Decimal,
    pub overpaid_amount: Decimal,
    pub status: PaymentStatus,
}

/// Net amount paid: payments minus refunds. Rows with an unknown kind are
/// ignored.
pub fn net_paid(payments: &[Payment]) -> Decimal {
    payments
        .iter()
        .fold(Decimal::ZERO, |acc, payment| match payment.kind_enum() {
            Some(PaymentKind::Payment) => acc + payment.amount,
            Some(PaymentKind::Refund) => acc - payment.amount,
            None => acc,
        })
}

/// Summarize a ledger against the amount due.
///
/// `amount_remaining` is never negative; money beyond the amount due is
/// reported as `overpaid_amount` with the `Overpaid` status.
pub fn summarize(total_due: Decimal, amount_paid: Decimal) -> LedgerSummary {
    let amount_remaining = (total_due - amount_paid).max(Decimal::ZERO);
    let overpaid_amount = (amount_paid - total_due).max(Decimal::ZERO);

    let status = if amount_paid > total_due {
        PaymentStatus::Overpaid
    } else if amount_paid == total_due {
        PaymentStatus::PaidFull
    } else if amount_paid <= Decimal::ZERO {
        PaymentStatus::Unpaid
    } else {
        PaymentStatus::Partial
    };

    LedgerSummary {
        amount_paid,
        amount_remaining,
        overpaid_amount,
        status,
    }
}

/// Validate a new ledger entry against what is currently paid
pub fn check_entry(
    kind: PaymentKind,
    amount: Decimal,
    current_paid: Decimal,
) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount(amount));
    }
    if kind == PaymentKind::Refund && amount > current_paid {
        return Err(LedgerError::RefundExceedsPaid {
            refund: amount,
            paid: current_paid,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn entry(kind: PaymentKind, amount: i64) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            registration_id: Uuid::new_v4(),
            kind: kind.as_str().to_string(),
            amount: Decimal::new(amount, 0),
            method: "check".to_string(),
            note: None,
            recorded_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_status_progression() {
        let due = Decimal::new(500, 0);
        assert_eq!(summarize(due, Decimal::ZERO).status, PaymentStatus::Unpaid);
        assert_eq!(summarize(due, Decimal::new(100, 0)).status, PaymentStatus::Partial);
        assert_eq!(summarize(due, due).status, PaymentStatus::PaidFull);
        assert_eq!(summarize(due, Decimal::new(600, 0)).status, PaymentStatus::Overpaid);
    }

    #[test]
    fn test_remaining_never_negative() {
        let summary = summarize(Decimal::new(500, 0), Decimal::new(650, 0));
        assert_eq!(summary.amount_remaining, Decimal::ZERO);
        assert_eq!(summary.overpaid_amount, Decimal::new(150, 0));

        let summary = summarize(Decimal::new(500, 0), Decimal::new(120, 0));
        assert_eq!(summary.amount_remaining, Decimal::new(380, 0));
        assert_eq!(summary.overpaid_amount, Decimal::ZERO);
    }

    #[test]
    fn test_nothing_due_is_paid_full() {
        assert_eq!(
            summarize(Decimal::ZERO, Decimal::ZERO).status,
            PaymentStatus::PaidFull
        );
    }

    #[test]
    fn test_net_paid_subtracts_refunds() {
        let ledger = vec![
            entry(PaymentKind::Payment, 200),
            entry(PaymentKind::Payment, 150),
            entry(PaymentKind::Refund, 50),
        ];
        assert_eq!(net_paid(&ledger), Decimal::new(300, 0));
    }

    #[test]
    fn test_check_entry() {
        let paid = Decimal::new(100, 0);
        assert!(check_entry(PaymentKind::Payment, Decimal::new(1, 0), paid).is_ok());
        assert_eq!(
            check_entry(PaymentKind::Payment, Decimal::ZERO, paid),
            Err(LedgerError::NonPositiveAmount(Decimal::ZERO))
        );
        assert!(check_entry(PaymentKind::Refund, paid, paid).is_ok());
        assert!(matches!(
            check_entry(PaymentKind::Refund, Decimal::new(101, 0), paid),
            Err(LedgerError::RefundExceedsPaid { .. })
        ));
    }
}
