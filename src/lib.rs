pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::storage::LocalStorage;
pub use crate::app::pipelines::csv_pipeline::CsvFarePipeline;
pub use crate::config::{BatchConfig, FareConfig};
pub use crate::core::{calculator::TaxiCalculator, engine::BatchEngine, schedule::FareSchedule};
pub use crate::domain::model::{Distance, Factor, FareQuote, FareRequest, Rating, Tariff, TariffInfo};
pub use crate::utils::error::{FareError, Result};
