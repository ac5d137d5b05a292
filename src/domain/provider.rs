use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Utility providers offered by the comparison page's `choice` parameter.
pub const DEFAULT_PROVIDERS: [&str; 4] = ["Eversource", "Liberty", "NHEC", "Unitil"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid provider choice '{choice}': {reason}")]
pub struct InvalidProvider {
    pub choice: String,
    pub reason: String,
}

/// A utility provider, identified by the value sent as `choice`.
///
/// The choice also names the provider's output file, so it may not be empty
/// or contain path separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UtilityProvider(String);

impl UtilityProvider {
    pub fn choice(&self) -> &str {
        &self.0
    }

    pub fn output_file_name(&self) -> String {
        format!("{}.json", self.0)
    }

    pub fn defaults() -> Vec<Self> {
        DEFAULT_PROVIDERS
            .iter()
            .map(|choice| Self((*choice).to_string()))
            .collect()
    }
}

impl FromStr for UtilityProvider {
    type Err = InvalidProvider;

    fn from_str(choice: &str) -> Result<Self, Self::Err> {
        let trimmed = choice.trim();
        let reason = if trimmed.is_empty() {
            Some("choice is empty")
        } else if trimmed.contains(['/', '\\']) || trimmed.starts_with('.') {
            Some("choice cannot be used as a file name")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(InvalidProvider {
                choice: choice.to_string(),
                reason: reason.to_string(),
            }),
            None => Ok(Self(trimmed.to_string())),
        }
    }
}

impl TryFrom<String> for UtilityProvider {
    type Error = InvalidProvider;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UtilityProvider> for String {
    fn from(provider: UtilityProvider) -> Self {
        provider.0
    }
}

impl fmt::Display for UtilityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
