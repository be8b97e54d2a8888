use crate::core::schedule::FareSchedule;
use crate::domain::model::{
    round_to_kopecks, Distance, Factor, FareQuote, FareRequest, Rating, Tariff, TariffInfo,
};
use crate::utils::error::{FareError, Result};
use crate::utils::validation::Validate;

/// Prices taxi rides against a [`FareSchedule`].
///
/// ```
/// use taxi_fare::{Distance, FareRequest, Tariff, TaxiCalculator};
///
/// let calc = TaxiCalculator::new();
/// let request = FareRequest::new(Distance::new(10.0).unwrap(), Tariff::Economy);
/// assert_eq!(calc.calculate_fare(&request).unwrap(), 1000.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaxiCalculator {
    schedule: FareSchedule,
}

impl TaxiCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schedule(schedule: FareSchedule) -> Result<Self> {
        schedule.validate()?;
        Ok(Self { schedule })
    }

    pub fn validate_distance(&self, km: f64) -> Result<Distance> {
        Distance::new(km)
    }

    pub fn validate_tariff(&self, name: &str) -> Result<Tariff> {
        name.parse()
    }

    pub fn validate_rating(&self, factor: Factor, value: i64) -> Result<Rating> {
        Rating::new(factor, value)
    }

    /// Final fare in roubles, rounded to kopecks.
    pub fn calculate_fare(&self, request: &FareRequest) -> Result<f64> {
        Ok(self.quote(request)?.fare)
    }

    pub fn quote(&self, request: &FareRequest) -> Result<FareQuote> {
        let rate_per_km = self.schedule.rates.rate(request.tariff);
        let base_fare = request.distance.km() * rate_per_km;

        let multipliers = &self.schedule.multipliers;
        let traffic_multiplier = multipliers.traffic.get(request.traffic);
        let weather_multiplier = multipliers.weather.get(request.weather);
        let demand_multiplier = multipliers.demand.get(request.demand);
        let total_multiplier = traffic_multiplier * weather_multiplier * demand_multiplier;

        let unrounded_fare = base_fare * total_multiplier;
        if !unrounded_fare.is_finite() {
            return Err(FareError::FareOverflow {
                distance: request.distance.to_string(),
            });
        }
        let minimum_applied = unrounded_fare < self.schedule.min_fare;
        let fare = round_to_kopecks(unrounded_fare.max(self.schedule.min_fare));

        tracing::debug!(
            tariff = %request.tariff,
            distance_km = request.distance.km(),
            base_fare,
            total_multiplier,
            fare,
            minimum_applied,
            "priced ride"
        );

        Ok(FareQuote {
            request: *request,
            rate_per_km,
            base_fare,
            traffic_multiplier,
            weather_multiplier,
            demand_multiplier,
            total_multiplier,
            unrounded_fare,
            minimum_applied,
            fare,
        })
    }

    pub fn tariff_info(&self) -> TariffInfo {
        TariffInfo {
            tariffs: Tariff::ALL.to_vec(),
            rates: Tariff::ALL
                .iter()
                .map(|t| (*t, self.schedule.rates.rate(*t)))
                .collect(),
            min_fare: self.schedule.min_fare,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schedule::MultiplierTable;

    fn request(km: f64, tariff: Tariff) -> FareRequest {
        FareRequest::new(Distance::new(km).unwrap(), tariff)
    }

    fn rating(factor: Factor, level: i64) -> Rating {
        Rating::new(factor, level).unwrap()
    }

    #[test]
    fn test_quote_breakdown() {
        let calc = TaxiCalculator::new();
        let quote = calc.quote(
            &request(10.0, Tariff::Economy)
                .with_traffic(rating(Factor::Traffic, 5))
                .with_demand(rating(Factor::Demand, 2)),
        ).unwrap();
        assert_eq!(quote.rate_per_km, 100.0);
        assert_eq!(quote.base_fare, 1000.0);
        assert_eq!(quote.traffic_multiplier, 2.0);
        assert_eq!(quote.weather_multiplier, 1.0);
        assert_eq!(quote.demand_multiplier, 1.1);
        assert!(!quote.minimum_applied);
        assert!((quote.fare - 2200.0).abs() < 1e-9);
    }

    #[test]
    fn test_minimum_fare_is_flagged() {
        let calc = TaxiCalculator::new();
        let quote = calc.quote(&request(0.2, Tariff::Economy)).unwrap();
        assert!(quote.minimum_applied);
        assert!((quote.unrounded_fare - 20.0).abs() < 1e-9);
        assert_eq!(quote.fare, 50.0);
    }

    #[test]
    fn test_fare_at_exact_minimum_is_not_flagged() {
        let calc = TaxiCalculator::new();
        let quote = calc.quote(&request(0.5, Tariff::Economy)).unwrap();
        assert!(!quote.minimum_applied);
        assert_eq!(quote.fare, 50.0);
    }

    #[test]
    fn test_custom_schedule() {
        let mut schedule = FareSchedule::default();
        schedule.rates.economy = 80.0;
        schedule.min_fare = 0.0;
        schedule.multipliers.traffic = MultiplierTable::new([1.0, 1.0, 1.0, 1.0, 3.0]);
        let calc = TaxiCalculator::with_schedule(schedule).unwrap();

        let fare = calc
            .calculate_fare(&request(0.1, Tariff::Economy).with_traffic(rating(Factor::Traffic, 5)))
            .unwrap();
        assert!((fare - 24.0).abs() < 1e-9);
        assert_eq!(calc.tariff_info().rates[&Tariff::Economy], 80.0);
    }

    #[test]
    fn test_invalid_schedule_is_rejected() {
        let mut schedule = FareSchedule::default();
        schedule.min_fare = f64::NAN;
        assert!(TaxiCalculator::with_schedule(schedule).is_err());
    }

    #[test]
    fn test_fare_is_rounded_from_exact_decimal_value() {
        let calc = TaxiCalculator::new();
        let quote = calc
            .quote(
                &request(1.0, Tariff::Comfort)
                    .with_traffic(rating(Factor::Traffic, 2))
                    .with_weather(rating(Factor::Weather, 3))
                    .with_demand(rating(Factor::Demand, 2)),
            )
            .unwrap();
        assert_eq!(quote.fare, 208.72);
    }

    #[test]
    fn test_unbounded_fare_is_rejected() {
        let calc = TaxiCalculator::new();
        let err = calc
            .quote(&request(1e308, Tariff::Business).with_traffic(rating(Factor::Traffic, 5)))
            .unwrap_err();
        assert!(matches!(err, FareError::FareOverflow { .. }));
        assert_eq!(err.exit_code(), 1);
    }
}
