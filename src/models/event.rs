use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Where registrants of an event are housed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingType {
    OnCampus,
    OffCampus,
    DayPass,
}

impl HousingType {
    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            HousingType::OnCampus => "on_campus",
            HousingType::OffCampus => "off_campus",
            HousingType::DayPass => "day_pass",
        }
    }
}

impl FromStr for HousingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "on_campus" => Ok(HousingType::OnCampus),
            "off_campus" => Ok(HousingType::OffCampus),
            "day_pass" => Ok(HousingType::DayPass),
            _ => Err(format!("Invalid housing type: {}", s)),
        }
    }
}

impl From<HousingType> for String {
    fn from(housing_type: HousingType) -> Self {
        housing_type.as_str().to_string()
    }
}

/// Event model; `organization_id` is the tenant boundary
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

/// Per-event pricing table.
///
/// The `*_regular_price` columns are the fallback; the housing-type columns
/// override them when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EventPricing {
    pub event_id: Uuid,
    pub youth_regular_price: Decimal,
    pub chaperone_regular_price: Decimal,
    pub clergy_regular_price: Decimal,
    pub on_campus_youth_price: Option<Decimal>,
    pub on_campus_chaperone_price: Option<Decimal>,
    pub off_campus_youth_price: Option<Decimal>,
    pub off_campus_chaperone_price: Option<Decimal>,
    pub day_pass_youth_price: Option<Decimal>,
    pub day_pass_chaperone_price: Option<Decimal>,
    pub deposit_percent: Decimal,
    pub updated_at: NaiveDateTime,
}

impl EventPricing {
    /// A pricing table with flat regular prices and no overrides
    pub fn flat(
        event_id: Uuid,
        youth: Decimal,
        chaperone: Decimal,
        clergy: Decimal,
        deposit_percent: Decimal,
    ) -> Self {
        Self {
            event_id,
            youth_regular_price: youth,
            chaperone_regular_price: chaperone,
            clergy_regular_price: clergy,
            on_campus_youth_price: None,
            on_campus_chaperone_price: None,
            off_campus_youth_price: None,
            off_campus_chaperone_price: None,
            day_pass_youth_price: None,
            day_pass_chaperone_price: None,
            deposit_percent,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Youth price for a housing type, falling back to the regular price
    pub fn youth_price(&self, housing_type: HousingType) -> Decimal {
        let override_price = match housing_type {
            HousingType::OnCampus => self.on_campus_youth_price,
            HousingType::OffCampus => self.off_campus_youth_price,
            HousingType::DayPass => self.day_pass_youth_price,
        };
        override_price.unwrap_or(self.youth_regular_price)
    }

    /// Chaperone price for a housing type, falling back to the regular price
    pub fn chaperone_price(&self, housing_type: HousingType) -> Decimal {
        let override_price = match housing_type {
            HousingType::OnCampus => self.on_campus_chaperone_price,
            HousingType::OffCampus => self.off_campus_chaperone_price,
            HousingType::DayPass => self.day_pass_chaperone_price,
        };
        override_price.unwrap_or(self.chaperone_regular_price)
    }

    /// Clergy have no housing-type overrides
    pub fn clergy_price(&self) -> Decimal {
        self.clergy_regular_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_falls_back_to_regular() {
        let mut pricing = EventPricing::flat(
            Uuid::new_v4(),
            Decimal::new(150, 0),
            Decimal::new(75, 0),
            Decimal::ZERO,
            Decimal::new(25, 0),
        );
        pricing.on_campus_youth_price = Some(Decimal::new(200, 0));

        assert_eq!(pricing.youth_price(HousingType::OnCampus), Decimal::new(200, 0));
        assert_eq!(pricing.youth_price(HousingType::DayPass), Decimal::new(150, 0));
        assert_eq!(pricing.chaperone_price(HousingType::OnCampus), Decimal::new(75, 0));
    }

    #[test]
    fn test_housing_type_round_trip_strings() {
        assert_eq!("ON_CAMPUS".parse::<HousingType>().unwrap(), HousingType::OnCampus);
        assert_eq!(HousingType::DayPass.as_str(), "day_pass");
        assert!("tent".parse::<HousingType>().is_err());
    }
}
