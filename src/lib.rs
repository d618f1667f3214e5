pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{http::StoreLocatorClient, storage::LocalStorage};
pub use config::toml_config::TomlConfig;
pub use crate::core::{decoder, etl::EtlEngine, pipeline::StoreLocatorPipeline, selector};
pub use domain::model::{
    AttributeCategory, AttributeDictionary, DictionaryEntry, NamedAttribute, NormalizedStore,
    RawStore, SelectionRule,
};
pub use utils::error::{DecodeError, EtlError, Result};
