#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub const DEFAULT_STORES_ENDPOINT: &str =
    "https://www.matsukiyococokara-online.com/map/s3/json/stores.json";
pub const DEFAULT_ATTRIBUTES_ENDPOINT: &str =
    "https://www.matsukiyococokara-online.com/map/s3/json/storeAttributes.json";
pub const DEFAULT_OUTPUT_PATH: &str = "dist/matsukiyococokara-list.json";
