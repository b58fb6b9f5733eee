use std::str::FromStr;

use thiserror::Error;

pub const ENV_DIRECTORY_FAILURE_POLICY: &str = "CU_DIRECTORY_FAILURE_POLICY";
pub const ENV_LOAD_CONCURRENCY: &str = "CU_LOAD_CONCURRENCY";
pub const ENV_PROCESS_CACHE_SIZE: &str = "CU_PROCESS_CACHE_SIZE";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: unknown directory failure policy '{value}'")]
    UnknownPolicy { var: &'static str, value: String },
    #[error("{var}: expected a positive integer, got '{value}'")]
    NotPositive { var: &'static str, value: String },
}

/// What a failed directory lookup does to location resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DirectoryFailurePolicy {
    /// Any directory failure degrades to resolving without a scheduler hint.
    #[default]
    Fallback,
    /// A definitive not-found ends the run; transient and malformed answers
    /// still fall back.
    FailFastOnNotFound,
}

impl FromStr for DirectoryFailurePolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fallback" => Ok(Self::Fallback),
            "fail-fast-on-not-found" | "fail_fast_on_not_found" => Ok(Self::FailFastOnNotFound),
            _ => Err(ConfigError::UnknownPolicy {
                var: ENV_DIRECTORY_FAILURE_POLICY,
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub directory_failure: DirectoryFailurePolicy,
    /// Upper bound on concurrent runs in `load_many`.
    pub max_concurrency: usize,
    /// Entries kept by `CachedDirectory`.
    pub directory_cache_capacity: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            directory_failure: DirectoryFailurePolicy::default(),
            max_concurrency: 8,
            directory_cache_capacity: 1024,
        }
    }
}

impl LoaderConfig {
    /// Build from `CU_*` environment variables, defaulting anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_DIRECTORY_FAILURE_POLICY) {
            config.directory_failure = value.parse()?;
        }
        if let Some(value) = lookup(ENV_LOAD_CONCURRENCY) {
            config.max_concurrency = parse_positive(ENV_LOAD_CONCURRENCY, &value)?;
        }
        if let Some(value) = lookup(ENV_PROCESS_CACHE_SIZE) {
            config.directory_cache_capacity = parse_positive(ENV_PROCESS_CACHE_SIZE, &value)?;
        }
        Ok(config)
    }
}

fn parse_positive(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::NotPositive {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(LoaderConfig::from_lookup(lookup(&[])).unwrap(), LoaderConfig::default());
    }

    #[test]
    fn reads_policy_and_limits() {
        let config = LoaderConfig::from_lookup(lookup(&[
            (ENV_DIRECTORY_FAILURE_POLICY, "Fail-Fast-On-Not-Found"),
            (ENV_LOAD_CONCURRENCY, "3"),
            (ENV_PROCESS_CACHE_SIZE, " 16 "),
        ]))
        .unwrap();
        assert_eq!(config.directory_failure, DirectoryFailurePolicy::FailFastOnNotFound);
        assert_eq!(config.max_concurrency, 3);
        assert_eq!(config.directory_cache_capacity, 16);
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(matches!(
            LoaderConfig::from_lookup(lookup(&[(ENV_DIRECTORY_FAILURE_POLICY, "retry")])),
            Err(ConfigError::UnknownPolicy { .. })
        ));
        assert!(matches!(
            LoaderConfig::from_lookup(lookup(&[(ENV_LOAD_CONCURRENCY, "0")])),
            Err(ConfigError::NotPositive { .. })
        ));
    }
}
