use crate::utils::error::{FareError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Service class of a ride. Each class has its own per-kilometre rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tariff {
    Economy,
    Comfort,
    ComfortPlus,
    Business,
}

impl Tariff {
    pub const ALL: [Tariff; 4] = [
        Tariff::Economy,
        Tariff::Comfort,
        Tariff::ComfortPlus,
        Tariff::Business,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Tariff::Economy => "economy",
            Tariff::Comfort => "comfort",
            Tariff::ComfortPlus => "comfort_plus",
            Tariff::Business => "business",
        }
    }

    /// Russian name used on the rate card.
    pub fn local_name(&self) -> &'static str {
        match self {
            Tariff::Economy => "эконом",
            Tariff::Comfort => "комфорт",
            Tariff::ComfortPlus => "комфорт_плюс",
            Tariff::Business => "бизнес",
        }
    }

    pub fn available() -> String {
        Tariff::ALL
            .iter()
            .map(|t| t.id())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Tariff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Tariff {
    type Err = FareError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Tariff::ALL
            .iter()
            .copied()
            .find(|t| t.id() == normalized || t.local_name() == normalized)
            .ok_or_else(|| FareError::UnknownTariff {
                name: s.to_string(),
                available: Tariff::available(),
            })
    }
}

/// Ride condition that scales the fare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Traffic,
    Weather,
    Demand,
}

impl Factor {
    pub fn name(&self) -> &'static str {
        match self {
            Factor::Traffic => "traffic",
            Factor::Weather => "weather",
            Factor::Demand => "demand",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Severity level of a [`Factor`], from 1 (no effect) to 5 (extreme).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(factor: Factor, value: i64) -> Result<Self> {
        if value < Self::MIN as i64 || value > Self::MAX as i64 {
            return Err(FareError::RatingOutOfRange {
                factor: factor.name().to_string(),
                value,
            });
        }
        Ok(Self(value as u8))
    }

    /// Parses a whole number; fractional or non-numeric text is rejected
    /// before the range check.
    pub fn parse(factor: Factor, text: &str) -> Result<Self> {
        let value = text
            .trim()
            .parse::<i64>()
            .map_err(|_| FareError::InvalidNumber {
                field: format!("{} rating", factor),
                value: text.to_string(),
            })?;
        Self::new(factor, value)
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    /// Zero-based position in a multiplier table.
    pub(crate) fn index(&self) -> usize {
        (self.0 - Self::MIN) as usize
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trip length in kilometres. Always finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Distance(f64);

impl Distance {
    pub fn new(km: f64) -> Result<Self> {
        if !km.is_finite() {
            return Err(FareError::InvalidNumber {
                field: "distance".to_string(),
                value: km.to_string(),
            });
        }
        if km <= 0.0 {
            return Err(FareError::InvalidDistance {
                value: km.to_string(),
                reason: "distance must be positive".to_string(),
            });
        }
        Ok(Self(km))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let km = text
            .trim()
            .parse::<f64>()
            .map_err(|_| FareError::InvalidNumber {
                field: "distance".to_string(),
                value: text.to_string(),
            })?;
        Self::new(km)
    }

    pub fn km(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FareRequest {
    pub distance: Distance,
    pub tariff: Tariff,
    pub traffic: Rating,
    pub weather: Rating,
    pub demand: Rating,
}

impl FareRequest {
    /// A ride under normal conditions: every rating at its minimum.
    pub fn new(distance: Distance, tariff: Tariff) -> Self {
        Self {
            distance,
            tariff,
            traffic: Rating::default(),
            weather: Rating::default(),
            demand: Rating::default(),
        }
    }

    pub fn with_traffic(mut self, rating: Rating) -> Self {
        self.traffic = rating;
        self
    }

    pub fn with_weather(mut self, rating: Rating) -> Self {
        self.weather = rating;
        self
    }

    pub fn with_demand(mut self, rating: Rating) -> Self {
        self.demand = rating;
        self
    }

    pub fn rating(&self, factor: Factor) -> Rating {
        match factor {
            Factor::Traffic => self.traffic,
            Factor::Weather => self.weather,
            Factor::Demand => self.demand,
        }
    }

    /// Validates raw inputs in the order distance, tariff, traffic, weather, demand.
    pub fn from_raw(
        distance: f64,
        tariff: &str,
        traffic: i64,
        weather: i64,
        demand: i64,
    ) -> Result<Self> {
        Ok(Self {
            distance: Distance::new(distance)?,
            tariff: tariff.parse()?,
            traffic: Rating::new(Factor::Traffic, traffic)?,
            weather: Rating::new(Factor::Weather, weather)?,
            demand: Rating::new(Factor::Demand, demand)?,
        })
    }
}

/// Rounds a rouble amount to kopecks, half to even on the exact decimal value
/// of the double. `x.xx5` literals usually sit just below or above the tie.
pub fn round_to_kopecks(amount: f64) -> f64 {
    format!("{:.2}", amount).parse().unwrap_or(amount)
}

/// Priced ride with every intermediate value of the calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareQuote {
    pub request: FareRequest,
    pub rate_per_km: f64,
    pub base_fare: f64,
    pub traffic_multiplier: f64,
    pub weather_multiplier: f64,
    pub demand_multiplier: f64,
    pub total_multiplier: f64,
    pub unrounded_fare: f64,
    pub minimum_applied: bool,
    pub fare: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TariffInfo {
    pub tariffs: Vec<Tariff>,
    pub rates: BTreeMap<Tariff, f64>,
    pub min_fare: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_kopecks_uses_exact_decimal_value() {
        assert_eq!(round_to_kopecks(574.4249), 574.42);
        assert_eq!(round_to_kopecks(4921.876), 4921.88);
        assert_eq!(round_to_kopecks(50.0), 50.0);
        // scaling by 100 first would push this one up to 208.73
        assert_eq!(round_to_kopecks(150.0 * (1.1 * 1.15 * 1.1)), 208.72);
        // exact ties go to the even kopeck
        assert_eq!(round_to_kopecks(50.625), 50.62);
        assert_eq!(round_to_kopecks(4921.875), 4921.88);
    }

    #[test]
    fn test_tariff_parses_ids_and_local_names() {
        assert_eq!("economy".parse::<Tariff>().unwrap(), Tariff::Economy);
        assert_eq!(" Comfort-Plus ".parse::<Tariff>().unwrap(), Tariff::ComfortPlus);
        assert_eq!("эконом".parse::<Tariff>().unwrap(), Tariff::Economy);
        assert_eq!("комфорт_плюс".parse::<Tariff>().unwrap(), Tariff::ComfortPlus);
        assert_eq!("Бизнес".parse::<Tariff>().unwrap(), Tariff::Business);
    }

    #[test]
    fn test_unknown_tariff_lists_available() {
        let err = "премиум".parse::<Tariff>().unwrap_err();
        match err {
            FareError::UnknownTariff { name, available } => {
                assert_eq!(name, "премиум");
                assert_eq!(available, "economy, comfort, comfort_plus, business");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rating_bounds() {
        for level in 1..=5 {
            assert_eq!(Rating::new(Factor::Traffic, level).unwrap().level() as i64, level);
        }
        assert!(matches!(
            Rating::new(Factor::Weather, 0),
            Err(FareError::RatingOutOfRange { value: 0, .. })
        ));
        assert!(matches!(
            Rating::new(Factor::Demand, 6),
            Err(FareError::RatingOutOfRange { value: 6, .. })
        ));
    }

    #[test]
    fn test_rating_rejects_fractions_as_type_errors() {
        assert!(matches!(
            Rating::parse(Factor::Traffic, "3.5"),
            Err(FareError::InvalidNumber { .. })
        ));
        assert!(matches!(
            Rating::parse(Factor::Traffic, "9"),
            Err(FareError::RatingOutOfRange { .. })
        ));
        assert_eq!(Rating::parse(Factor::Traffic, " 4 ").unwrap().level(), 4);
    }

    #[test]
    fn test_distance_validation() {
        assert!(Distance::new(10.0).is_ok());
        assert!(Distance::new(0.5).is_ok());
        assert!(matches!(
            Distance::new(-5.0),
            Err(FareError::InvalidDistance { .. })
        ));
        assert!(matches!(
            Distance::new(0.0),
            Err(FareError::InvalidDistance { .. })
        ));
        assert!(matches!(
            Distance::new(f64::NAN),
            Err(FareError::InvalidNumber { .. })
        ));
        assert!(matches!(
            Distance::parse("10 км"),
            Err(FareError::InvalidNumber { .. })
        ));
        assert!(matches!(
            Distance::parse(""),
            Err(FareError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_from_raw_reports_first_invalid_field() {
        let err = FareRequest::from_raw(-1.0, "премиум", 9, 1, 1).unwrap_err();
        assert!(matches!(err, FareError::InvalidDistance { .. }));

        let err = FareRequest::from_raw(1.0, "economy", 1, 7, 1).unwrap_err();
        assert!(err.to_string().starts_with("weather rating"));
    }
}
