//! Feature flags controlling which classification paths run.
//!
//! Every flag is required. Missing or malformed configuration is reported
//! at startup, never during classification.
//!
//! | Variable | Flag |
//! |----------|------|
//! | `FF_RICH_FRAGMENTS` | include rich decoded fragments in responses |
//! | `FF_SWAPS_DECODING` | detect pre-signed swap orders |
//! | `FF_TWAPS_DECODING` | detect TWAP orders |
//! | `FF_NATIVE_STAKING_DECODING` | detect native staking deposits |

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

pub const RICH_FRAGMENTS_ENV: &str = "FF_RICH_FRAGMENTS";
pub const SWAPS_DECODING_ENV: &str = "FF_SWAPS_DECODING";
pub const TWAPS_DECODING_ENV: &str = "FF_TWAPS_DECODING";
pub const NATIVE_STAKING_DECODING_ENV: &str = "FF_NATIVE_STAKING_DECODING";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),
    #[error("Invalid boolean for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Process-wide feature flags, immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FeatureFlags {
    pub rich_fragments: bool,
    pub swaps_decoding: bool,
    pub twaps_decoding: bool,
    pub native_staking_decoding: bool,
}

#[derive(Deserialize)]
struct ConfigFile {
    features: FeatureFlags,
}

impl FeatureFlags {
    /// Read every flag from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read every flag through `lookup`, failing on the first missing key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flags = Self {
            rich_fragments: required_flag(&lookup, RICH_FRAGMENTS_ENV)?,
            swaps_decoding: required_flag(&lookup, SWAPS_DECODING_ENV)?,
            twaps_decoding: required_flag(&lookup, TWAPS_DECODING_ENV)?,
            native_staking_decoding: required_flag(&lookup, NATIVE_STAKING_DECODING_ENV)?,
        };
        info!(?flags, "Loaded feature flags");
        Ok(flags)
    }

    /// Read the `features` section of a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: ConfigFile = serde_json::from_str(raw)?;
        info!(flags = ?config.features, "Loaded feature flags");
        Ok(config.features)
    }
}

fn required_flag<F>(lookup: &F, key: &'static str) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).ok_or(ConfigError::Missing(key))?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_reads_all_flags() {
        let vars = env(&[
            (RICH_FRAGMENTS_ENV, "true"),
            (SWAPS_DECODING_ENV, "FALSE"),
            (TWAPS_DECODING_ENV, " true "),
            (NATIVE_STAKING_DECODING_ENV, "false"),
        ]);
        let flags = FeatureFlags::from_lookup(|key| vars.get(key).cloned()).unwrap();
        assert_eq!(
            flags,
            FeatureFlags {
                rich_fragments: true,
                swaps_decoding: false,
                twaps_decoding: true,
                native_staking_decoding: false,
            }
        );
    }

    #[test]
    fn test_missing_flag_is_an_error() {
        let vars = env(&[
            (RICH_FRAGMENTS_ENV, "true"),
            (SWAPS_DECODING_ENV, "true"),
            (TWAPS_DECODING_ENV, "true"),
        ]);
        let err = FeatureFlags::from_lookup(|key| vars.get(key).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(NATIVE_STAKING_DECODING_ENV)));
    }

    #[test]
    fn test_invalid_flag_is_an_error() {
        let vars = env(&[
            (RICH_FRAGMENTS_ENV, "yes"),
            (SWAPS_DECODING_ENV, "true"),
            (TWAPS_DECODING_ENV, "true"),
            (NATIVE_STAKING_DECODING_ENV, "true"),
        ]);
        let err = FeatureFlags::from_lookup(|key| vars.get(key).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: RICH_FRAGMENTS_ENV, .. }));
    }

    #[test]
    fn test_json_requires_every_flag() {
        let flags = FeatureFlags::from_json_str(
            r#"{"features": {"richFragments": true, "swapsDecoding": true,
                "twapsDecoding": false, "nativeStakingDecoding": true}}"#,
        )
        .unwrap();
        assert!(flags.rich_fragments && flags.swaps_decoding && !flags.twaps_decoding);

        let err = FeatureFlags::from_json_str(
            r#"{"features": {"richFragments": true, "swapsDecoding": true}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
