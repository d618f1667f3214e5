pub mod decoder;
pub mod etl;
pub mod pipeline;
pub mod selector;

pub use crate::domain::model::{SourceData, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
