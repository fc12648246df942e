use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

mod error;

pub use error::{Error, Result};

/// The maximum allowed length for a [`ContainerID`].
const CONTAINER_ID_MAX_LEN: usize = 255;

/// Number of leading characters of a container id that identify a task.
const SHORT_ID_LEN: usize = 8;

/// A validated container identifier.
///
/// # Examples
///
/// ```
/// # use container_sampler::container::ContainerID;
/// let container_id = ContainerID::new("abcdef1234567890").unwrap();
/// assert_eq!(container_id.as_ref(), "abcdef1234567890");
/// assert_eq!(container_id.short(), "abcdef12");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerID(Arc<str>);

impl ContainerID {
    /// Creates a new `ContainerID` from the given raw id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidContainerID`] if the input is empty or its length exceeds
    /// [`CONTAINER_ID_MAX_LEN`].
    pub fn new(src: impl AsRef<str>) -> Result<Self> {
        let src = src.as_ref();
        if src.is_empty() || src.len() > CONTAINER_ID_MAX_LEN {
            return Err(Error::InvalidContainerID(src.to_owned()));
        }

        Ok(Self(src.into()))
    }

    /// Returns the first eight characters of the id, or the whole id if it is shorter.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(SHORT_ID_LEN) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ContainerID {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ContainerID {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Container metadata as returned by the runtime's inspection endpoint.
///
/// Only the fields consulted during identity resolution are kept. The field names follow the
/// Docker Engine `GET /containers/{id}/json` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContainerInfo {
    /// Canonical (full length) container id.
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Config", default, deserialize_with = "null_as_default")]
    pub config: ContainerConfig,
}

/// The `Config` section of an inspected container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContainerConfig {
    /// Environment in `KEY=value` form.
    #[serde(rename = "Env", default, deserialize_with = "null_as_default")]
    pub env: Vec<String>,
    /// Image reference the container was created from.
    #[serde(rename = "Image", default)]
    pub image: String,
}

impl ContainerConfig {
    /// Returns the value of the first `key=` entry in the environment, if any.
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env.iter().find_map(|entry| {
            entry
                .strip_prefix(key)
                .and_then(|rest| rest.strip_prefix('='))
        })
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_id_validation() {
        assert!(ContainerID::new("").is_err());
        assert!(ContainerID::new("a".repeat(CONTAINER_ID_MAX_LEN + 1)).is_err());
        assert!(ContainerID::new("a".repeat(CONTAINER_ID_MAX_LEN)).is_ok());
    }

    #[test]
    fn test_short_id() {
        let id = ContainerID::new("abcdef1234567890").unwrap();
        assert_eq!(id.short(), "abcdef12");

        let id = ContainerID::new("abc").unwrap();
        assert_eq!(id.short(), "abc");

        let id = ContainerID::new("abcdef12").unwrap();
        assert_eq!(id.short(), "abcdef12");
    }

    #[test]
    fn test_env_var_lookup() {
        let config = ContainerConfig {
            env: vec![
                "PATH=/usr/bin".to_owned(),
                "MARATHON_APP_ID_SUFFIX=nope".to_owned(),
                "MARATHON_APP_ID=/web".to_owned(),
                "MARATHON_APP_ID=/shadowed".to_owned(),
                "EMPTY=".to_owned(),
            ],
            image: String::new(),
        };

        assert_eq!(config.env_var("MARATHON_APP_ID"), Some("/web"));
        assert_eq!(config.env_var("EMPTY"), Some(""));
        assert_eq!(config.env_var("CHRONOS_JOB_NAME"), None);
    }

    #[test]
    fn test_deserialize_inspect_response() {
        let raw = r#"{
            "Id": "abcdef1234567890",
            "Name": "/web-1",
            "Config": {
                "Hostname": "abcdef123456",
                "Env": ["MARATHON_APP_ID=/group/service", "HOME=/root"],
                "Image": "registry.example.com/myapp:1.2"
            }
        }"#;
        let info: ContainerInfo = serde_json::from_str(raw).unwrap();

        assert_eq!(info.id, "abcdef1234567890");
        assert_eq!(info.config.image, "registry.example.com/myapp:1.2");
        assert_eq!(info.config.env.len(), 2);
    }

    #[test]
    fn test_deserialize_missing_env() {
        let raw = r#"{"Id": "abc", "Config": {"Env": null, "Image": "busybox"}}"#;
        let info: ContainerInfo = serde_json::from_str(raw).unwrap();
        assert!(info.config.env.is_empty());

        let raw = r#"{"Id": "abc", "Config": null}"#;
        let info: ContainerInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(info.config, ContainerConfig::default());
    }
}
