//! Command handlers behind the `taxi-fare` binary.
//!
//! Each handler returns the text to print so it can be exercised without a terminal.

use crate::adapters::storage::LocalStorage;
use crate::app::pipelines::csv_pipeline::CsvFarePipeline;
use crate::config::BatchConfig;
use crate::core::calculator::TaxiCalculator;
use crate::core::engine::BatchEngine;
use crate::core::{ConfigProvider, Pipeline};
use crate::domain::model::{Distance, Factor, FareQuote, FareRequest, Rating, Tariff};
use crate::utils::error::{FareError, Result};
use crate::utils::validation::Validate;
use std::fmt::Write;

pub fn cmd_quote(calc: &TaxiCalculator, request: &FareRequest, json: bool) -> Result<String> {
    let quote = calc.quote(request)?;
    if json {
        return Ok(serde_json::to_string_pretty(&quote)?);
    }
    Ok(render_quote(&quote))
}

fn render_quote(quote: &FareQuote) -> String {
    let request = &quote.request;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Trip: {} km, tariff {} ({} RUB/km)",
        request.distance, request.tariff, quote.rate_per_km
    );
    let _ = writeln!(out, "Base fare: {:.2} RUB", quote.base_fare);
    let _ = writeln!(
        out,
        "Multipliers: traffic {}/5 x{}, weather {}/5 x{}, demand {}/5 x{} (total x{:.4})",
        request.traffic,
        quote.traffic_multiplier,
        request.weather,
        quote.weather_multiplier,
        request.demand,
        quote.demand_multiplier,
        quote.total_multiplier
    );
    if quote.minimum_applied {
        let _ = writeln!(out, "Minimum fare applied");
    }
    let _ = write!(out, "Fare: {:.2} RUB", quote.fare);
    out
}

pub fn cmd_tariffs(calc: &TaxiCalculator, json: bool) -> Result<String> {
    let info = calc.tariff_info();
    if json {
        return Ok(serde_json::to_string_pretty(&info)?);
    }

    let mut out = String::from("Available tariffs:\n");
    for tariff in &info.tariffs {
        let _ = writeln!(
            out,
            "  - {:<13} {:<13} {} RUB/km",
            tariff.id(),
            tariff.local_name(),
            info.rates[tariff]
        );
    }
    let _ = write!(out, "Minimum fare: {} RUB", info.min_fare);
    Ok(out)
}

/// Runs a batch, or with `dry_run` only reads and prices the trips without writing.
pub async fn cmd_batch(calc: TaxiCalculator, batch: BatchConfig, dry_run: bool) -> Result<String> {
    if batch.input_path.is_none() {
        return Err(FareError::MissingConfigError {
            field: "batch.input_path".to_string(),
        });
    }
    batch.validate()?;

    let formats = batch.output_formats().join(", ");
    let output_path = batch.output_path().to_string();
    let pipeline = CsvFarePipeline::new(LocalStorage::default(), batch, calc);

    if dry_run {
        tracing::info!("Dry run: nothing will be written");
        let trips = pipeline.extract().await?;
        let result = pipeline.transform(trips).await?;
        let summary = &result.summary;
        return Ok(format!(
            "Dry run: {} trips, {} priced, {} rejected, revenue {:.2} RUB\nWould write {} to {}",
            summary.trips, summary.priced, summary.rejected, summary.total_revenue, formats, output_path
        ));
    }

    let engine = BatchEngine::new(pipeline);
    let written = engine.run().await?;
    Ok(written
        .iter()
        .map(|path| format!("Output saved to: {}", path))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Worked examples of the standard rate card.
pub fn cmd_demo(calc: &TaxiCalculator) -> Result<String> {
    let traffic = |level| Rating::new(Factor::Traffic, level);
    let weather = |level| Rating::new(Factor::Weather, level);
    let demand = |level| Rating::new(Factor::Demand, level);

    let examples = [
        (
            "10 km, economy, normal conditions",
            FareRequest::new(Distance::new(10.0)?, Tariff::Economy),
        ),
        (
            "15 km, business, traffic 4/5, rain 3/5, demand 2/5",
            FareRequest::new(Distance::new(15.0)?, Tariff::Business)
                .with_traffic(traffic(4)?)
                .with_weather(weather(3)?)
                .with_demand(demand(2)?),
        ),
        (
            "20 km, comfort, worst conditions",
            FareRequest::new(Distance::new(20.0)?, Tariff::Comfort)
                .with_traffic(traffic(5)?)
                .with_weather(weather(5)?)
                .with_demand(demand(5)?),
        ),
        (
            "0.2 km, economy, minimum fare",
            FareRequest::new(Distance::new(0.2)?, Tariff::Economy),
        ),
    ];

    let mut out = String::from("=== Fare examples ===\n\n");
    for (i, (label, request)) in examples.iter().enumerate() {
        let fare = calc.calculate_fare(request)?;
        let _ = writeln!(out, "{}. {}: {:.2} RUB", i + 1, label, fare);
    }
    let _ = writeln!(out, "\n5. Tariffs:");
    out.push_str(&cmd_tariffs(calc, false)?);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_text_mentions_minimum() {
        let calc = TaxiCalculator::new();
        let request = FareRequest::new(Distance::new(0.1).unwrap(), Tariff::Economy);
        let text = cmd_quote(&calc, &request, false).unwrap();
        assert!(text.contains("Minimum fare applied"));
        assert!(text.ends_with("Fare: 50.00 RUB"));
    }

    #[test]
    fn test_quote_json_has_breakdown() {
        let calc = TaxiCalculator::new();
        let request = FareRequest::new(Distance::new(5.0).unwrap(), Tariff::Comfort)
            .with_weather(Rating::new(Factor::Weather, 3).unwrap());
        let json: serde_json::Value =
            serde_json::from_str(&cmd_quote(&calc, &request, true).unwrap()).unwrap();
        assert_eq!(json["request"]["tariff"], "comfort");
        assert_eq!(json["request"]["weather"], 3);
        assert_eq!(json["base_fare"], 750.0);
        assert_eq!(json["fare"], 862.5);
    }

    #[test]
    fn test_tariffs_json() {
        let calc = TaxiCalculator::new();
        let json: serde_json::Value =
            serde_json::from_str(&cmd_tariffs(&calc, true).unwrap()).unwrap();
        assert_eq!(json["tariffs"].as_array().unwrap().len(), 4);
        assert_eq!(json["rates"]["business"], 300.0);
        assert_eq!(json["min_fare"], 50.0);
    }

    #[test]
    fn test_demo_lists_examples() {
        let text = cmd_demo(&TaxiCalculator::new()).unwrap();
        assert!(text.contains("1. 10 km, economy, normal conditions: 1000.00 RUB"));
        assert!(text.contains("3. 20 km, comfort, worst conditions: 18000.00 RUB"));
        assert!(text.contains("4. 0.2 km, economy, minimum fare: 50.00 RUB"));
        assert!(text.contains("комфорт_плюс"));
    }

    #[tokio::test]
    async fn test_batch_requires_input() {
        let err = cmd_batch(TaxiCalculator::new(), BatchConfig::default(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, FareError::MissingConfigError { .. }));
    }
}
