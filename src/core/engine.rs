use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

/// Drives a [`Pipeline`] through extract, transform and load.
pub struct BatchEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> BatchEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Returns the paths written by the load phase.
    pub async fn run(&self) -> Result<Vec<String>> {
        let started = Instant::now();
        tracing::info!("Starting batch pricing");

        let trips = self.pipeline.extract().await?;
        tracing::info!("Extracted {} trips", trips.len());

        let result = self.pipeline.transform(trips).await?;
        tracing::info!(
            priced = result.summary.priced,
            rejected = result.summary.rejected,
            total_revenue = result.summary.total_revenue,
            "Priced trips"
        );

        let written = self.pipeline.load(result).await?;
        for path in &written {
            tracing::info!("Output saved to: {}", path);
        }

        tracing::debug!("Batch finished in {:?}", started.elapsed());
        Ok(written)
    }
}
