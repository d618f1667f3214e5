use crate::core::{Pipeline, TransformResult};
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        let transformed = self.extract_and_transform().await?;

        tracing::info!("Loading data...");
        let output_path = self.pipeline.load(transformed).await?;
        tracing::info!("Finished in {:?}", started.elapsed());

        Ok(output_path)
    }

    /// Runs extract and transform only; nothing is written.
    pub async fn dry_run(&self) -> Result<TransformResult> {
        let transformed = self.extract_and_transform().await?;
        tracing::info!(
            "🔍 Dry run: {} stores would be written",
            transformed.stores.len()
        );
        Ok(transformed)
    }

    async fn extract_and_transform(&self) -> Result<TransformResult> {
        tracing::info!("Extracting data...");
        let stage = Instant::now();
        let raw_data = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} stores in {:?}",
            raw_data.stores.len(),
            stage.elapsed()
        );

        tracing::info!("Transforming data...");
        let stage = Instant::now();
        let transformed = self.pipeline.transform(raw_data).await?;
        tracing::info!(
            "Transformed {} stores in {:?}",
            transformed.stores.len(),
            stage.elapsed()
        );

        Ok(transformed)
    }
}
