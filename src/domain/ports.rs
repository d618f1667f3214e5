use crate::domain::model::{RequestOptions, SelectionRule, SourceData, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn stores_endpoint(&self) -> &str;
    fn attributes_endpoint(&self) -> &str;
    fn output_path(&self) -> &str;
    fn request_options(&self) -> RequestOptions;
    fn selection_rule(&self) -> Option<SelectionRule>;

    fn pretty_output(&self) -> bool {
        false
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SourceData>;
    async fn transform(&self, data: SourceData) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
