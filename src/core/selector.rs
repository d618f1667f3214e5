use crate::domain::model::{AttributeCategory, AttributeDictionary, RawStore, SelectionRule};
use crate::utils::error::{EtlError, Result};
use regex::bytes::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// Services layout that marks an SC store.
///
/// Tied to the current services dictionary order and length: if upstream adds,
/// removes or reorders services, this silently tests a different bit.
pub const SC_SERVICES_PATTERN: &str = r"\d{7}0\d{2}";

static SC_SERVICES: LazyLock<Regex> = LazyLock::new(|| {
    compile_services_pattern(SC_SERVICES_PATTERN).expect("SC services pattern is valid")
});

/// Compiles a services pattern with ASCII-only character classes, so `\d`
/// means `[0-9]` and never another script's digits.
pub fn compile_services_pattern(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern).unicode(false).build()?)
}

#[derive(Debug, Clone)]
enum Matcher {
    Pattern(Regex),
    ServiceBit { position: usize },
}

/// Picks stores out of the raw list by looking at their services bitstring.
#[derive(Debug, Clone)]
pub struct Selector {
    matcher: Matcher,
}

impl Default for Selector {
    fn default() -> Self {
        Self {
            matcher: Matcher::Pattern(SC_SERVICES.clone()),
        }
    }
}

impl Selector {
    pub fn from_pattern(pattern: &str) -> Result<Self> {
        Ok(Self {
            matcher: Matcher::Pattern(compile_services_pattern(pattern)?),
        })
    }

    /// Resolves `code` to its services bit position once, up front.
    pub fn from_service_code(code: &str, dictionary: &AttributeDictionary) -> Result<Self> {
        let position = dictionary
            .position_of(AttributeCategory::Services, code)
            .ok_or_else(|| EtlError::UnknownServiceCode {
                code: code.to_string(),
            })?;

        tracing::debug!("Service code '{}' resolved to bit {}", code, position);
        Ok(Self {
            matcher: Matcher::ServiceBit { position },
        })
    }

    pub fn from_rule(rule: Option<&SelectionRule>, dictionary: &AttributeDictionary) -> Result<Self> {
        match rule {
            None => Ok(Self::default()),
            Some(SelectionRule::Pattern(pattern)) => Self::from_pattern(pattern),
            Some(SelectionRule::ServiceCode(code)) => Self::from_service_code(code, dictionary),
        }
    }

    pub fn matches(&self, store: &RawStore) -> bool {
        match &self.matcher {
            Matcher::Pattern(regex) => regex.is_match(store.services.as_bytes()),
            Matcher::ServiceBit { position } => store.services.chars().nth(*position) == Some('1'),
        }
    }

    pub fn select(&self, stores: Vec<RawStore>) -> Vec<RawStore> {
        stores.into_iter().filter(|store| self.matches(store)).collect()
    }
}

/// Keeps only SC stores, using [`SC_SERVICES_PATTERN`].
pub fn select(stores: Vec<RawStore>) -> Vec<RawStore> {
    Selector::default().select(stores)
}
