//! Channel and metadata configuration
//!
//! The configuration is a YAML document choosing which channels go into the
//! LoadData CSV and which image attributes become extra metadata columns:
//!
//! ```yaml
//! channels:
//!   HOECHST 33342: OrigDNA
//!   Alexa 488: OrigER
//! metadata:
//!   AbsPositionZ: AbsPositionZ
//!   PlaneID: PlaneID
//! ```
//!
//! A document that is a list uses its first element. Spaces are removed
//! from channel keys so they match [`Image::channel_name`](crate::phenix::Image::channel_name).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

/// Errors that can occur while loading a channel configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file does not exist
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),

    /// I/O error reading the file
    #[error("Config failed due to IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML syntax error
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),

    /// The document is an empty list
    #[error("Config document is an empty list")]
    EmptyDocument,

    /// A section is present but is not a mapping
    #[error("Config section '{0}' must be a mapping")]
    NotAMapping(&'static str),

    /// The required `channels` section is absent
    #[error("Config has no 'channels' section")]
    MissingChannels,

    /// The `channels` section has no entries
    #[error("Config 'channels' section is empty")]
    EmptyChannels,

    /// A key or value is a list, mapping or null
    #[error("Config section '{section}' contains a non-scalar entry: {value}")]
    NonScalar {
        /// Section the entry belongs to
        section: &'static str,
        /// Debug rendering of the entry
        value: String,
    },

    /// Two channel keys are identical once spaces are removed
    #[error("Channel key '{0}' appears more than once after removing spaces")]
    DuplicateChannel(String),
}

/// Top level of a configuration file: one document or a list of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConfigDocument {
    Many(Vec<ConfigSections>),
    One(ConfigSections),
}

#[derive(Debug, Deserialize)]
struct ConfigSections {
    #[serde(default)]
    channels: Option<Value>,
    #[serde(default)]
    metadata: Option<Value>,
}

/// Which channels and metadata columns a LoadData CSV contains
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    channels: BTreeMap<String, String>,
    metadata: BTreeMap<String, String>,
}

impl ChannelConfig {
    /// Build a configuration from channel and metadata pairs
    ///
    /// Channel keys are normalized by removing spaces.
    pub fn new<C, M, K, V>(channels: C, metadata: M) -> Result<Self, ConfigError>
    where
        C: IntoIterator<Item = (K, V)>,
        M: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut normalized = BTreeMap::new();
        for (key, label) in channels {
            let key = normalize_channel(&key.into());
            if normalized.insert(key.clone(), label.into()).is_some() {
                return Err(ConfigError::DuplicateChannel(key));
            }
        }
        if normalized.is_empty() {
            return Err(ConfigError::EmptyChannels);
        }

        Ok(Self {
            channels: normalized,
            metadata: metadata
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        })
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::BadFilePath(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a YAML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let sections = match serde_yaml::from_str::<ConfigDocument>(content)? {
            ConfigDocument::Many(documents) => documents
                .into_iter()
                .next()
                .ok_or(ConfigError::EmptyDocument)?,
            ConfigDocument::One(sections) => sections,
        };

        let channels = match &sections.channels {
            Some(Value::Mapping(channels)) => scalar_pairs(channels, "channels")?,
            Some(Value::Null) | None => return Err(ConfigError::MissingChannels),
            Some(_) => return Err(ConfigError::NotAMapping("channels")),
        };
        let metadata = match &sections.metadata {
            Some(Value::Mapping(metadata)) => scalar_pairs(metadata, "metadata")?,
            Some(Value::Null) | None => Vec::new(),
            Some(_) => return Err(ConfigError::NotAMapping("metadata")),
        };

        Self::new(channels, metadata)
    }

    /// Channel key -> output label, sorted by key
    pub fn channels(&self) -> &BTreeMap<String, String> {
        &self.channels
    }

    /// Image attribute -> output column suffix, sorted by attribute
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Whether a (space-free) channel name is configured
    pub fn contains_channel(&self, channel: &str) -> bool {
        self.channels.contains_key(channel)
    }

    /// Output label for a channel key
    pub fn label(&self, channel: &str) -> Option<&str> {
        self.channels.get(channel).map(String::as_str)
    }

    /// Labels in sorted label order
    pub fn sorted_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.channels.values().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }
}

/// Remove spaces from a channel name
pub fn normalize_channel(name: &str) -> String {
    name.replace(' ', "")
}

fn scalar_pairs(
    mapping: &Mapping,
    section: &'static str,
) -> Result<Vec<(String, String)>, ConfigError> {
    mapping
        .iter()
        .map(|(key, value)| Ok((scalar(key, section)?, scalar(value, section)?)))
        .collect()
}

fn scalar(value: &Value, section: &'static str) -> Result<String, ConfigError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ConfigError::NonScalar {
            section,
            value: format!("{other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
channels:
  HOECHST 33342: OrigDNA
  Alexa 488: OrigER
metadata:
  AbsPositionZ: AbsPositionZ
  PlaneID: PlaneID
"#;

        let config = ChannelConfig::from_str(yaml).unwrap();
        assert_eq!(config.label("HOECHST33342"), Some("OrigDNA"));
        assert_eq!(config.label("Alexa488"), Some("OrigER"));
        assert!(!config.contains_channel("HOECHST 33342"));
        assert_eq!(
            config.metadata().keys().collect::<Vec<_>>(),
            vec!["AbsPositionZ", "PlaneID"]
        );
    }

    #[test]
    fn test_list_document_uses_first_element() {
        let yaml = r#"
- channels:
    DNA: OrigDNA
- channels:
    RNA: OrigRNA
"#;

        let config = ChannelConfig::from_str(yaml).unwrap();
        assert_eq!(config.channels().len(), 1);
        assert_eq!(config.label("DNA"), Some("OrigDNA"));
        assert!(config.metadata().is_empty());
    }

    #[test]
    fn test_numeric_keys_are_stringified() {
        let config = ChannelConfig::from_str("channels:\n  488: OrigGFP\n").unwrap();
        assert_eq!(config.label("488"), Some("OrigGFP"));
    }

    #[test]
    fn test_missing_channels() {
        let err = ChannelConfig::from_str("metadata:\n  PlaneID: PlaneID\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingChannels));
    }

    #[test]
    fn test_empty_channels() {
        let err = ChannelConfig::from_str("channels: {}\n").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyChannels));
    }

    #[test]
    fn test_duplicate_after_normalization() {
        let yaml = "channels:\n  Alexa 488: A\n  Alexa488: B\n";
        let err = ChannelConfig::from_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateChannel(key) if key == "Alexa488"));
    }

    #[test]
    fn test_channels_must_be_mapping() {
        let err = ChannelConfig::from_str("channels:\n  - DNA\n").unwrap_err();
        assert!(matches!(err, ConfigError::NotAMapping("channels")));
    }

    #[test]
    fn test_scalar_document_is_rejected() {
        let err = ChannelConfig::from_str("just a string").unwrap_err();
        assert!(matches!(err, ConfigError::ParsingError(_)));
    }

    #[test]
    fn test_empty_list_document() {
        let err = ChannelConfig::from_str("[]").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyDocument));
    }

    #[test]
    fn test_sorted_labels() {
        let config =
            ChannelConfig::new([("b", "OrigZ"), ("a", "OrigA")], Vec::<(&str, &str)>::new())
                .unwrap();
        assert_eq!(config.sorted_labels(), vec!["OrigA", "OrigZ"]);
    }

    #[test]
    fn test_missing_file() {
        let err = ChannelConfig::from_file(Path::new("/nonexistent/config.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::BadFilePath(_)));
    }
}
