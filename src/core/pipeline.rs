use crate::adapters::http::StoreLocatorClient;
use crate::core::decoder::decode_all;
use crate::core::selector::Selector;
use crate::core::{ConfigProvider, Pipeline, SourceData, Storage, TransformResult};
use crate::utils::error::Result;

/// Fetches both store-locator documents, keeps the SC stores, decodes their
/// attribute bits and writes them out as one JSON array.
pub struct StoreLocatorPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: StoreLocatorClient,
}

impl<S: Storage, C: ConfigProvider> StoreLocatorPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = StoreLocatorClient::new(config.request_options())?;
        Ok(Self {
            storage,
            config,
            client,
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for StoreLocatorPipeline<S, C> {
    async fn extract(&self) -> Result<SourceData> {
        tracing::info!(
            "🚀 Fetching stores from {} and attributes from {}",
            self.config.stores_endpoint(),
            self.config.attributes_endpoint()
        );

        // The two documents are independent.
        let (stores, dictionary) = tokio::try_join!(
            self.client.fetch_stores(self.config.stores_endpoint()),
            self.client.fetch_attributes(self.config.attributes_endpoint()),
        )?;

        Ok(SourceData { stores, dictionary })
    }

    async fn transform(&self, data: SourceData) -> Result<TransformResult> {
        let fetched_count = data.stores.len();
        let selector = Selector::from_rule(self.config.selection_rule().as_ref(), &data.dictionary)?;

        let selected = selector.select(data.stores);
        tracing::info!("🔍 Selected {} of {} stores", selected.len(), fetched_count);

        let stores = decode_all(&selected, &data.dictionary)?;
        tracing::info!("✅ Decoded attributes for {} stores", stores.len());

        Ok(TransformResult {
            fetched_count,
            stores,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = self.config.output_path();

        let json_data = if self.config.pretty_output() {
            serde_json::to_vec_pretty(&result.stores)?
        } else {
            serde_json::to_vec(&result.stores)?
        };

        tracing::debug!("Writing {} bytes to storage", json_data.len());
        self.storage.write_file(output_path, &json_data).await?;

        tracing::info!("💾 Saved {} stores to {}", result.stores.len(), output_path);
        Ok(output_path.to_string())
    }
}
