use crate::core::calculator::TaxiCalculator;
use crate::core::{
    BatchResult, BatchSummary, ConfigProvider, FareRow, Pipeline, Storage, TripRecord,
};
use crate::utils::error::{FareError, Result};
use std::path::Path;

pub const FARES_FILE: &str = "fares.csv";
pub const SUMMARY_FILE: &str = "summary.json";

const FARE_COLUMNS: [&str; 9] = [
    "id",
    "distance",
    "tariff",
    "traffic",
    "weather",
    "demand",
    "fare",
    "minimum_applied",
    "error",
];

/// Prices every trip of a CSV file and writes the results next to a JSON summary.
pub struct CsvFarePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    calculator: TaxiCalculator,
}

impl<S: Storage, C: ConfigProvider> CsvFarePipeline<S, C> {
    pub fn new(storage: S, config: C, calculator: TaxiCalculator) -> Self {
        Self {
            storage,
            config,
            calculator,
        }
    }

    fn output_file(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    fn encode_rows(rows: &[FareRow]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        // serialize() only emits the header with the first row
        if rows.is_empty() {
            writer.write_record(FARE_COLUMNS)?;
        }
        for row in rows {
            writer.serialize(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| FareError::IoError(e.into_error()))
    }
}

fn column_index(headers: &csv::StringRecord, column: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| FareError::MissingColumn {
            column: column.to_string(),
        })
}

/// Reads trip rows; the header must contain at least `id`, `distance` and `tariff`.
///
/// Short rows are accepted and their missing cells read as empty, so a row
/// without ratings prices at level 1 and a row without a tariff is rejected
/// like any other invalid trip.
pub fn parse_trips(data: &[u8]) -> Result<Vec<TripRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let id = column_index(&headers, "id")?;
    let distance = column_index(&headers, "distance")?;
    let tariff = column_index(&headers, "tariff")?;
    let traffic = headers.iter().position(|h| h == "traffic");
    let weather = headers.iter().position(|h| h == "weather");
    let demand = headers.iter().position(|h| h == "demand");

    let mut trips = Vec::new();
    let mut raw = csv::StringRecord::new();
    while reader.read_record(&mut raw)? {
        let cell = |i: usize| raw.get(i).unwrap_or_default().to_string();
        let optional = |i: Option<usize>| i.and_then(|i| raw.get(i)).map(str::to_string);

        trips.push(TripRecord {
            line: raw.position().map(|p| p.line()).unwrap_or_default(),
            id: cell(id),
            distance: cell(distance),
            tariff: cell(tariff),
            traffic: optional(traffic),
            weather: optional(weather),
            demand: optional(demand),
        });
    }

    Ok(trips)
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CsvFarePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<TripRecord>> {
        tracing::debug!("Reading trips from: {}", self.config.input_path());
        let data = self.storage.read_file(self.config.input_path()).await?;
        parse_trips(&data)
    }

    async fn transform(&self, trips: Vec<TripRecord>) -> Result<BatchResult> {
        let mut rows = Vec::with_capacity(trips.len());

        for trip in &trips {
            match trip
                .to_request()
                .and_then(|request| self.calculator.quote(&request))
            {
                Ok(quote) => rows.push(FareRow::priced(trip, &quote)),
                Err(e) if self.config.skip_invalid() => {
                    tracing::warn!("Skipping trip '{}' on line {}: {}", trip.id, trip.line, e);
                    rows.push(FareRow::rejected(trip, e.to_string()));
                }
                Err(e) => {
                    return Err(FareError::InvalidRow {
                        line: trip.line,
                        source: Box::new(e),
                    });
                }
            }
        }

        let summary = BatchSummary::from_rows(&rows);
        Ok(BatchResult { rows, summary })
    }

    async fn load(&self, result: BatchResult) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for format in self.config.output_formats() {
            let (path, data) = match format.as_str() {
                "csv" => (self.output_file(FARES_FILE), Self::encode_rows(&result.rows)?),
                "json" => (
                    self.output_file(SUMMARY_FILE),
                    serde_json::to_vec_pretty(&result.summary)?,
                ),
                other => {
                    return Err(FareError::InvalidConfigValueError {
                        field: "batch.output_formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported format. Valid formats: csv, json".to_string(),
                    });
                }
            };

            tracing::debug!("Writing {} bytes to {}", data.len(), path);
            self.storage.write_file(&path, &data).await?;
            written.push(path);
        }

        Ok(written)
    }
}
