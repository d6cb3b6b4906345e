use crate::error::ConfigError;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Environment variable holding the desired tags as a JSON object.
pub const TAGS_ENV_VAR: &str = "TAGS_JSON";

/// The tag set every discovered resource must carry. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredTags(BTreeMap<String, String>);

impl DesiredTags {
    /// Validates a raw configuration value. `None` and `""` both count as unset.
    pub fn parse(raw: Option<&str>) -> Result<Self, ConfigError> {
        let raw = raw.filter(|s| !s.is_empty()).ok_or(ConfigError::Missing)?;

        let value: serde_json::Value = serde_json::from_str(raw)?;
        let object = value.as_object().ok_or(ConfigError::NotAnObject)?;
        if object.is_empty() {
            return Err(ConfigError::Empty);
        }

        object
            .iter()
            .map(|(key, val)| {
                val.as_str()
                    .map(|v| (key.clone(), v.to_string()))
                    .ok_or_else(|| ConfigError::NonStringValue(key.clone()))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Self)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Desired keys whose value on `current` is absent or different.
    pub fn missing_from<'a>(&'a self, current: &HashMap<String, String>) -> Vec<&'a str> {
        self.iter()
            .filter(|(key, value)| current.get(*key).map(String::as_str) != Some(*value))
            .map(|(key, _)| key)
            .collect()
    }

    pub fn to_hash_map(&self) -> HashMap<String, String> {
        self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl fmt::Display for DesiredTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{{{}}}", pairs.join(", "))
    }
}
