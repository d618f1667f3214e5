use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::time::Duration;

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One store as served by the upstream store list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawStore {
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub icon: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub business_company_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub postal_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub longitude: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub closed_day: String,
    pub comment: serde_json::Value,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(rename = "businesshours", deserialize_with = "null_as_default")]
    pub business_hours: String,
    #[serde(deserialize_with = "null_as_default")]
    pub payments: String,
    #[serde(deserialize_with = "null_as_default")]
    pub products: String,
    #[serde(deserialize_with = "null_as_default")]
    pub services: String,
}

impl RawStore {
    pub fn bits(&self, category: AttributeCategory) -> &str {
        match category {
            AttributeCategory::BusinessHours => &self.business_hours,
            AttributeCategory::Services => &self.services,
            AttributeCategory::Products => &self.products,
            AttributeCategory::Payments => &self.payments,
        }
    }
}

/// The bit-encoded store fields, in the order they are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeCategory {
    BusinessHours,
    Services,
    Products,
    Payments,
}

impl AttributeCategory {
    /// JSON key used for this category in both upstream documents and the export.
    pub fn key(self) -> &'static str {
        match self {
            Self::BusinessHours => "businesshours",
            Self::Services => "services",
            Self::Products => "products",
            Self::Payments => "payments",
        }
    }
}

impl fmt::Display for AttributeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A dictionary row. Upstream sends it as a positional array
/// `[code, name, icon, ...]`; trailing positions are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<serde_json::Value>")]
pub struct DictionaryEntry {
    pub code: String,
    pub name: String,
    pub icon: String,
}

impl DictionaryEntry {
    pub fn new(code: impl Into<String>, name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            icon: icon.into(),
        }
    }
}

impl TryFrom<Vec<serde_json::Value>> for DictionaryEntry {
    type Error = String;

    fn try_from(row: Vec<serde_json::Value>) -> std::result::Result<Self, Self::Error> {
        if row.len() < 3 {
            return Err(format!(
                "dictionary entry needs [code, name, icon], got {} positions",
                row.len()
            ));
        }

        let code = match &row[0] {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            other => return Err(format!("position 0 (code) must be a string or number, got {}", other)),
        };
        let text_at = |position: usize, label: &str| match &row[position] {
            serde_json::Value::String(s) => Ok(s.clone()),
            other => Err(format!("position {} ({}) must be a string, got {}", position, label, other)),
        };

        Ok(Self {
            code,
            name: text_at(1, "name")?,
            icon: text_at(2, "icon")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DictionaryConfig {
    #[serde(rename = "iconPath", default)]
    pub icon_path: String,
}

/// Per-category lists giving meaning to each bit position of a store.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AttributeDictionary {
    pub config: DictionaryConfig,
    #[serde(rename = "businesshours")]
    pub business_hours: Vec<DictionaryEntry>,
    pub services: Vec<DictionaryEntry>,
    pub products: Vec<DictionaryEntry>,
    pub payments: Vec<DictionaryEntry>,
    // Not bit-encoded on the store side; kept as served.
    pub icon: Vec<serde_json::Value>,
    pub business_company_id: Vec<serde_json::Value>,
}

impl AttributeDictionary {
    pub fn entries(&self, category: AttributeCategory) -> &[DictionaryEntry] {
        match category {
            AttributeCategory::BusinessHours => &self.business_hours,
            AttributeCategory::Services => &self.services,
            AttributeCategory::Products => &self.products,
            AttributeCategory::Payments => &self.payments,
        }
    }

    /// Bit position of the entry with `code` in `category`.
    pub fn position_of(&self, category: AttributeCategory, code: &str) -> Option<usize> {
        self.entries(category).iter().position(|entry| entry.code == code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedAttribute {
    pub name: String,
    pub icon: String,
}

impl From<&DictionaryEntry> for NamedAttribute {
    fn from(entry: &DictionaryEntry) -> Self {
        Self {
            name: entry.name.clone(),
            icon: entry.icon.clone(),
        }
    }
}

/// A store with every bitstring replaced by its decoded attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedStore {
    pub id: i64,
    pub name: String,
    pub postal_code: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub url: String,
    pub closed_day: String,
    pub comment: serde_json::Value,
    #[serde(rename = "businesshours")]
    pub business_hours: Vec<NamedAttribute>,
    pub services: Vec<NamedAttribute>,
    pub products: Vec<NamedAttribute>,
    pub payments: Vec<NamedAttribute>,
}

/// How stores are picked out of the full list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionRule {
    /// Regular expression matched against the raw services bitstring.
    Pattern(String),
    /// Keep stores whose services bit for this dictionary code is set.
    ServiceCode(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    pub timeout: Duration,
    pub retry_attempts: u32,
    pub retry_delay: Duration,
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry_attempts: 2,
            retry_delay: Duration::from_secs(1),
            headers: Vec::new(),
        }
    }
}

/// Both upstream documents, as fetched for one run.
#[derive(Debug, Clone, Default)]
pub struct SourceData {
    pub stores: Vec<RawStore>,
    pub dictionary: AttributeDictionary,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub fetched_count: usize,
    pub stores: Vec<NormalizedStore>,
}
