use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{EventPricing, HousingType, ParticipantType};

/// Most people a single registration may bring
pub const MAX_REGISTRATION_PARTICIPANTS: u64 = 10_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("Price for {0} cannot be negative")]
    NegativePrice(&'static str),

    #[error("Deposit percent must be between 0 and 100, got {0}")]
    InvalidDepositPercent(Decimal),

    #[error("Registration of {total} participants exceeds the limit of {limit}")]
    TooManyParticipants { total: u64, limit: u64 },
}

/// Headcount of a registration by pricing category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticipantCounts {
    pub youth_count_male_u18: u32,
    pub youth_count_female_u18: u32,
    pub chaperone_count_male: u32,
    pub chaperone_count_female: u32,
    pub clergy_count: u32,
}

impl ParticipantCounts {
    /// Counts for a single registrant of the given type
    pub fn single(participant_type: ParticipantType, is_male: bool) -> Self {
        let mut counts = Self::default();
        match (participant_type, is_male) {
            (ParticipantType::Youth, true) => counts.youth_count_male_u18 = 1,
            (ParticipantType::Youth, false) => counts.youth_count_female_u18 = 1,
            (ParticipantType::Chaperone, true) => counts.chaperone_count_male = 1,
            (ParticipantType::Chaperone, false) => counts.chaperone_count_female = 1,
            (ParticipantType::Clergy, _) => counts.clergy_count = 1,
        }
        counts
    }

    // Sums are taken in u64 so no combination of u32 counts can overflow
    pub fn youth(&self) -> u64 {
        u64::from(self.youth_count_male_u18) + u64::from(self.youth_count_female_u18)
    }

    pub fn chaperones(&self) -> u64 {
        u64::from(self.chaperone_count_male) + u64::from(self.chaperone_count_female)
    }

    pub fn total(&self) -> u64 {
        self.youth() + self.chaperones() + u64::from(self.clergy_count)
    }

    /// Reject registrations above [`MAX_REGISTRATION_PARTICIPANTS`]
    pub fn check_limit(&self) -> Result<u64, PricingError> {
        let total = self.total();
        if total > MAX_REGISTRATION_PARTICIPANTS {
            return Err(PricingError::TooManyParticipants {
                total,
                limit: MAX_REGISTRATION_PARTICIPANTS,
            });
        }
        Ok(total)
    }
}

/// Price breakdown for a registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub housing_type: HousingType,
    pub youth_unit_price: Decimal,
    pub chaperone_unit_price: Decimal,
    pub clergy_unit_price: Decimal,
    pub youth_subtotal: Decimal,
    pub chaperone_subtotal: Decimal,
    pub clergy_subtotal: Decimal,
    pub total: Decimal,
    pub deposit: Decimal,
    pub balance: Decimal,
}

/// Round a currency amount to cents, halves away from zero
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Check a pricing table before it is stored or used
pub fn validate_pricing(pricing: &EventPricing) -> Result<(), PricingError> {
    let prices = [
        ("youth", Some(pricing.youth_regular_price)),
        ("chaperones", Some(pricing.chaperone_regular_price)),
        ("clergy", Some(pricing.clergy_regular_price)),
        ("on-campus youth", pricing.on_campus_youth_price),
        ("on-campus chaperones", pricing.on_campus_chaperone_price),
        ("off-campus youth", pricing.off_campus_youth_price),
        ("off-campus chaperones", pricing.off_campus_chaperone_price),
        ("day-pass youth", pricing.day_pass_youth_price),
        ("day-pass chaperones", pricing.day_pass_chaperone_price),
    ];
    if let Some((name, _)) = prices
        .iter()
        .find(|(_, price)| price.map_or(false, |p| p < Decimal::ZERO))
    {
        return Err(PricingError::NegativePrice(*name));
    }

    if pricing.deposit_percent < Decimal::ZERO || pricing.deposit_percent > Decimal::ONE_HUNDRED {
        return Err(PricingError::InvalidDepositPercent(pricing.deposit_percent));
    }

    Ok(())
}

/// Price a registration.
///
/// Each category uses the housing-type override when the table has one and
/// the regular price otherwise. The deposit is `deposit_percent` of the
/// total; the balance is what remains.
pub fn compute_quote(
    pricing: &EventPricing,
    counts: &ParticipantCounts,
    housing_type: HousingType,
) -> Result<PriceQuote, PricingError> {
    validate_pricing(pricing)?;
    counts.check_limit()?;

    let youth_unit_price = pricing.youth_price(housing_type);
    let chaperone_unit_price = pricing.chaperone_price(housing_type);
    let clergy_unit_price = pricing.clergy_price();

    let youth_subtotal = round_currency(youth_unit_price * Decimal::from(counts.youth()));
    let chaperone_subtotal =
        round_currency(chaperone_unit_price * Decimal::from(counts.chaperones()));
    let clergy_subtotal = round_currency(clergy_unit_price * Decimal::from(counts.clergy_count));

    let total = youth_subtotal + chaperone_subtotal + clergy_subtotal;
    let deposit = round_currency(total * pricing.deposit_percent / Decimal::ONE_HUNDRED);
    let balance = total - deposit;

    Ok(PriceQuote {
        housing_type,
        youth_unit_price,
        chaperone_unit_price,
        clergy_unit_price,
        youth_subtotal,
        chaperone_subtotal,
        clergy_subtotal,
        total,
        deposit,
        balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn pricing() -> EventPricing {
        let mut pricing = EventPricing::flat(
            Uuid::new_v4(),
            Decimal::new(180, 0),
            Decimal::new(90, 0),
            Decimal::ZERO,
            Decimal::new(25, 0),
        );
        pricing.on_campus_youth_price = Some(Decimal::new(200, 0));
        pricing.day_pass_chaperone_price = Some(Decimal::new(4550, 2));
        pricing
    }

    #[test]
    fn test_on_campus_youth_subtotal() {
        let counts = ParticipantCounts {
            youth_count_male_u18: 5,
            youth_count_female_u18: 3,
            ..Default::default()
        };
        let quote = compute_quote(&pricing(), &counts, HousingType::OnCampus).unwrap();

        assert_eq!(quote.youth_subtotal, Decimal::new(1600, 0));
        assert_eq!(quote.total, Decimal::new(1600, 0));
        assert_eq!(quote.deposit, Decimal::new(400, 0));
        assert_eq!(quote.balance, Decimal::new(1200, 0));
    }

    #[test]
    fn test_missing_override_falls_back_to_regular() {
        let counts = ParticipantCounts {
            youth_count_female_u18: 2,
            chaperone_count_male: 1,
            ..Default::default()
        };
        let quote = compute_quote(&pricing(), &counts, HousingType::OffCampus).unwrap();
        assert_eq!(quote.youth_unit_price, Decimal::new(180, 0));
        assert_eq!(quote.chaperone_unit_price, Decimal::new(90, 0));
        assert_eq!(quote.total, Decimal::new(450, 0));
    }

    #[test]
    fn test_zero_counts() {
        let quote =
            compute_quote(&pricing(), &ParticipantCounts::default(), HousingType::DayPass).unwrap();
        assert_eq!(quote.total, Decimal::ZERO);
        assert_eq!(quote.deposit, Decimal::ZERO);
        assert_eq!(quote.balance, Decimal::ZERO);
    }

    #[test]
    fn test_deposit_rounds_to_cents() {
        let mut table = pricing();
        table.deposit_percent = Decimal::new(333, 1); // 33.3%
        let counts = ParticipantCounts {
            chaperone_count_female: 1,
            ..Default::default()
        };
        let quote = compute_quote(&table, &counts, HousingType::DayPass).unwrap();
        // 45.50 * 0.333 = 15.1515
        assert_eq!(quote.total, Decimal::new(4550, 2));
        assert_eq!(quote.deposit, Decimal::new(1515, 2));
        assert_eq!(quote.balance, Decimal::new(3035, 2));
        assert_eq!(quote.deposit + quote.balance, quote.total);
    }

    #[test]
    fn test_round_currency_midpoint() {
        assert_eq!(round_currency(Decimal::new(12345, 3)), Decimal::new(1235, 2));
        assert_eq!(round_currency(Decimal::new(-12345, 3)), Decimal::new(-1235, 2));
    }

    #[test]
    fn test_invalid_tables_rejected() {
        let mut table = pricing();
        table.deposit_percent = Decimal::new(101, 0);
        assert_eq!(
            compute_quote(&table, &ParticipantCounts::default(), HousingType::OnCampus),
            Err(PricingError::InvalidDepositPercent(Decimal::new(101, 0)))
        );

        let mut table = pricing();
        table.off_campus_youth_price = Some(Decimal::new(-1, 0));
        assert_eq!(
            validate_pricing(&table),
            Err(PricingError::NegativePrice("off-campus youth"))
        );
    }

    #[test]
    fn test_counts_at_limit_are_priced() {
        let counts = ParticipantCounts {
            youth_count_male_u18: 9_999,
            clergy_count: 1,
            ..Default::default()
        };
        assert_eq!(counts.check_limit(), Ok(MAX_REGISTRATION_PARTICIPANTS));

        let quote = compute_quote(&pricing(), &counts, HousingType::OnCampus).unwrap();
        assert_eq!(quote.youth_subtotal, Decimal::new(1_999_800, 0));
    }

    #[test]
    fn test_counts_above_limit_rejected() {
        let counts = ParticipantCounts {
            youth_count_male_u18: 10_000,
            chaperone_count_female: 1,
            ..Default::default()
        };
        assert_eq!(
            compute_quote(&pricing(), &counts, HousingType::OffCampus),
            Err(PricingError::TooManyParticipants {
                total: 10_001,
                limit: MAX_REGISTRATION_PARTICIPANTS,
            })
        );
    }

    #[test]
    fn test_max_counts_do_not_overflow() {
        let counts = ParticipantCounts {
            youth_count_male_u18: u32::MAX,
            youth_count_female_u18: 1,
            chaperone_count_male: u32::MAX,
            chaperone_count_female: u32::MAX,
            clergy_count: u32::MAX,
        };
        assert_eq!(counts.youth(), u64::from(u32::MAX) + 1);
        assert_eq!(counts.total(), 4 * u64::from(u32::MAX) + 1);
        assert!(matches!(
            compute_quote(&pricing(), &counts, HousingType::OnCampus),
            Err(PricingError::TooManyParticipants { .. })
        ));
    }

    #[test]
    fn test_single_counts() {
        let counts = ParticipantCounts::single(ParticipantType::Chaperone, false);
        assert_eq!(counts.chaperone_count_female, 1);
        assert_eq!(counts.total(), 1);
    }
}
