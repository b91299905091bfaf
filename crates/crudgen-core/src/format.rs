//! Configuration formats for generated routing and service resources

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target configuration format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    #[default]
    Yml,
    Xml,
    Php,
    Annotation,
}

impl ConfigFormat {
    pub const ALL: [ConfigFormat; 4] = [
        ConfigFormat::Yml,
        ConfigFormat::Xml,
        ConfigFormat::Php,
        ConfigFormat::Annotation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigFormat::Yml => "yml",
            ConfigFormat::Xml => "xml",
            ConfigFormat::Php => "php",
            ConfigFormat::Annotation => "annotation",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ConfigFormat::Yml => "YAML",
            ConfigFormat::Xml => "XML",
            ConfigFormat::Php => "PHP",
            ConfigFormat::Annotation => "Annotations",
        }
    }

    /// Lenient parse: unknown values fall back to `yml`.
    ///
    /// The second element is true when the fallback was taken so callers
    /// can surface it instead of hiding it.
    pub fn normalize(value: &str) -> (ConfigFormat, bool) {
        match value.parse() {
            Ok(format) => (format, false),
            Err(_) => (ConfigFormat::Yml, true),
        }
    }

    /// File extension of a standalone config resource in this format.
    ///
    /// Annotation routing lives in the controller, so there is none.
    pub fn resource_extension(&self) -> Option<&'static str> {
        match self {
            ConfigFormat::Annotation => None,
            other => Some(other.as_str()),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        ConfigFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == lowered)
            .ok_or_else(|| format!("unknown configuration format '{}'", s))
    }
}
