use crate::domain::model::{round_to_kopecks, Distance, Factor, FareQuote, FareRequest, Rating};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One trip row as read from a CSV file, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    /// 1-based line in the source file; the header is line 1.
    #[serde(skip)]
    pub line: u64,
    pub id: String,
    pub distance: String,
    pub tariff: String,
    #[serde(default)]
    pub traffic: Option<String>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub demand: Option<String>,
}

impl TripRecord {
    pub fn to_request(&self) -> Result<FareRequest> {
        Ok(FareRequest {
            distance: Distance::parse(&self.distance)?,
            tariff: self.tariff.parse()?,
            traffic: optional_rating(Factor::Traffic, self.traffic.as_deref())?,
            weather: optional_rating(Factor::Weather, self.weather.as_deref())?,
            demand: optional_rating(Factor::Demand, self.demand.as_deref())?,
        })
    }
}

fn optional_rating(factor: Factor, cell: Option<&str>) -> Result<Rating> {
    match cell.map(str::trim) {
        None | Some("") => Ok(Rating::default()),
        Some(text) => Rating::parse(factor, text),
    }
}

/// Output row of a batch run. Priced rows carry `fare`, rejected rows `error`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareRow {
    pub id: String,
    pub distance: String,
    pub tariff: String,
    pub traffic: String,
    pub weather: String,
    pub demand: String,
    pub fare: Option<f64>,
    pub minimum_applied: Option<bool>,
    pub error: Option<String>,
}

impl FareRow {
    pub fn priced(trip: &TripRecord, quote: &FareQuote) -> Self {
        let request = &quote.request;
        Self {
            id: trip.id.clone(),
            distance: request.distance.to_string(),
            tariff: request.tariff.id().to_string(),
            traffic: request.traffic.to_string(),
            weather: request.weather.to_string(),
            demand: request.demand.to_string(),
            fare: Some(quote.fare),
            minimum_applied: Some(quote.minimum_applied),
            error: None,
        }
    }

    pub fn rejected(trip: &TripRecord, error: String) -> Self {
        Self {
            id: trip.id.clone(),
            distance: trip.distance.clone(),
            tariff: trip.tariff.clone(),
            traffic: trip.traffic.clone().unwrap_or_default(),
            weather: trip.weather.clone().unwrap_or_default(),
            demand: trip.demand.clone().unwrap_or_default(),
            fare: None,
            minimum_applied: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub generated_at: DateTime<Utc>,
    pub trips: usize,
    pub priced: usize,
    pub rejected: usize,
    pub total_revenue: f64,
}

impl BatchSummary {
    pub fn from_rows(rows: &[FareRow]) -> Self {
        let priced: Vec<f64> = rows.iter().filter_map(|r| r.fare).collect();
        let total: f64 = priced.iter().sum();
        Self {
            generated_at: Utc::now(),
            trips: rows.len(),
            priced: priced.len(),
            rejected: rows.len() - priced.len(),
            total_revenue: round_to_kopecks(total),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchResult {
    pub rows: Vec<FareRow>,
    pub summary: BatchSummary,
}
