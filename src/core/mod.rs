pub mod calculator;
pub mod engine;
pub mod schedule;

pub use crate::domain::batch::{BatchResult, BatchSummary, FareRow, TripRecord};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
