//! Registration pricing and the payment ledger.

pub mod ledger;
pub mod pricing;

pub use ledger::{LedgerError, LedgerSummary};
pub use pricing::{ParticipantCounts, PriceQuote, PricingError};
