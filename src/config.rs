//! Runtime configuration read from environment variables.

use crate::monitor::Interval;

/// Environment variable holding the number of raw samples per forwarded sample.
pub const SAMPLE_INTERVAL_VAR: &str = "SAMPLE_INTERVAL";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("environment variable `{var}` is not valid unicode")]
    NotUnicode { var: &'static str },
    #[error("environment variable `{var}` must be a positive integer, got `{value}`")]
    InvalidInterval { var: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Settings shared by all monitors of a process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    interval: Interval,
}

impl Config {
    pub fn new(interval: Interval) -> Self {
        Self { interval }
    }

    /// Loads the configuration from the process environment.
    ///
    /// An unset `SAMPLE_INTERVAL` forwards every sample.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInterval`] if `SAMPLE_INTERVAL` is not a positive integer.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(std::env::var)
    }

    fn from_lookup(
        lookup: impl Fn(&'static str) -> std::result::Result<String, std::env::VarError>,
    ) -> Result<Self> {
        let interval = match lookup(SAMPLE_INTERVAL_VAR) {
            Ok(value) => parse_interval(&value)?,
            Err(std::env::VarError::NotPresent) => Interval::default(),
            Err(std::env::VarError::NotUnicode(_)) => {
                return Err(Error::NotUnicode {
                    var: SAMPLE_INTERVAL_VAR,
                });
            }
        };
        log::debug!("Sample interval: {}", interval.get());

        Ok(Self { interval })
    }

    /// Samples per forwarded sample, as accepted by [`Monitor::new`](crate::monitor::Monitor::new).
    pub fn interval(&self) -> usize {
        self.interval.get()
    }
}

fn parse_interval(value: &str) -> Result<Interval> {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(Interval::new)
        .ok_or_else(|| Error::InvalidInterval {
            var: SAMPLE_INTERVAL_VAR,
            value: value.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use std::env::VarError;

    use super::*;

    fn lookup(value: Option<&str>) -> impl Fn(&'static str) -> std::result::Result<String, VarError> {
        let value = value.map(str::to_owned);
        move |var| {
            assert_eq!(var, SAMPLE_INTERVAL_VAR);
            value.clone().ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn test_unset_interval_defaults_to_every_sample() {
        let config = Config::from_lookup(lookup(None)).unwrap();
        assert_eq!(config.interval(), 1);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_interval() {
        let config = Config::from_lookup(lookup(Some(" 10\n"))).unwrap();
        assert_eq!(config.interval(), 10);
    }

    #[test]
    fn test_invalid_interval() {
        for value in ["0", "-3", "ten", ""] {
            let err = Config::from_lookup(lookup(Some(value))).unwrap_err();
            assert!(
                matches!(err, Error::InvalidInterval { value: ref v, .. } if v == value),
                "{value:?}: {err}"
            );
        }
    }

    #[test]
    fn test_not_unicode() {
        let err = Config::from_lookup(|_| Err(VarError::NotUnicode("\u{FFFD}".into()))).unwrap_err();
        assert!(matches!(err, Error::NotUnicode { .. }));
    }
}
