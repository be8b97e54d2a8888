use crate::domain::model::{Factor, Rating, Tariff};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_negative_amount, validate_positive_amount, Validate};
use serde::{Deserialize, Serialize};

/// Per-kilometre rate of every tariff, in roubles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffRates {
    pub economy: f64,
    pub comfort: f64,
    pub comfort_plus: f64,
    pub business: f64,
}

impl TariffRates {
    pub fn rate(&self, tariff: Tariff) -> f64 {
        match tariff {
            Tariff::Economy => self.economy,
            Tariff::Comfort => self.comfort,
            Tariff::ComfortPlus => self.comfort_plus,
            Tariff::Business => self.business,
        }
    }
}

impl Default for TariffRates {
    fn default() -> Self {
        Self {
            economy: 100.0,
            comfort: 150.0,
            comfort_plus: 200.0,
            business: 300.0,
        }
    }
}

/// Multiplier for each rating level, level 1 first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MultiplierTable([f64; 5]);

impl MultiplierTable {
    pub const fn new(levels: [f64; 5]) -> Self {
        Self(levels)
    }

    pub fn get(&self, rating: Rating) -> f64 {
        self.0[rating.index()]
    }

    pub fn levels(&self) -> &[f64; 5] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Multipliers {
    pub traffic: MultiplierTable,
    pub weather: MultiplierTable,
    pub demand: MultiplierTable,
}

impl Multipliers {
    pub fn table(&self, factor: Factor) -> &MultiplierTable {
        match factor {
            Factor::Traffic => &self.traffic,
            Factor::Weather => &self.weather,
            Factor::Demand => &self.demand,
        }
    }
}

impl Default for Multipliers {
    fn default() -> Self {
        Self {
            // none, light, moderate, heavy, gridlock
            traffic: MultiplierTable::new([1.0, 1.1, 1.25, 1.5, 2.0]),
            // clear, cloudy, rain or snow, downpour or blizzard, storm or ice
            weather: MultiplierTable::new([1.0, 1.05, 1.15, 1.3, 1.5]),
            // idle, normal, elevated, high, extreme
            demand: MultiplierTable::new([1.0, 1.1, 1.25, 1.5, 2.0]),
        }
    }
}

/// Everything the calculator prices with. The default is the standard city rate card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FareSchedule {
    pub min_fare: f64,
    pub rates: TariffRates,
    pub multipliers: Multipliers,
}

impl Default for FareSchedule {
    fn default() -> Self {
        Self {
            min_fare: 50.0,
            rates: TariffRates::default(),
            multipliers: Multipliers::default(),
        }
    }
}

impl Validate for FareSchedule {
    fn validate(&self) -> Result<()> {
        validate_non_negative_amount("schedule.min_fare", self.min_fare)?;

        for tariff in Tariff::ALL {
            validate_positive_amount(
                &format!("schedule.rates.{}", tariff.id()),
                self.rates.rate(tariff),
            )?;
        }

        for factor in [Factor::Traffic, Factor::Weather, Factor::Demand] {
            for (i, value) in self.multipliers.table(factor).levels().iter().enumerate() {
                validate_positive_amount(
                    &format!("schedule.multipliers.{}[{}]", factor, i + 1),
                    *value,
                )?;
            }
        }

        Ok(())
    }
}
