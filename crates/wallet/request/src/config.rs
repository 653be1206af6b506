//! Decoder configuration.
//!
//! Settings are read from the embedded base configuration and can be overridden through
//! environment variables with the prefix `NCCMULTISIG_`.

use core::num::NonZeroU32;

use config::{ConfigError, Environment, File, FileFormat};
use ncc_multisig_domain::NetworkVersion;
use serde::Deserialize;

use crate::serialization::{DeserializationContext, RequestLimits};

/// Loads the decoder configuration from the base config and environment variables.
///
/// Environment variables use double underscores `__` to denote nested keys.
/// For example, `NCCMULTISIG_LIMITS__MAX_HOURS_DUE` corresponds to `limits.max_hours_due`.
///
/// # Errors
///
/// If the configuration could not be loaded or parsed
pub fn get_configuration() -> Result<Config, ConfigError> {
    config::Config::builder()
        .add_source(File::from_str(include_str!("base_config.ron"), FileFormat::Ron))
        .add_source(
            Environment::with_prefix(Config::CONFIG_ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}

/// Root configuration structure.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Network settings
    pub network: NetworkConfig,

    /// Limits applied to decoded requests
    pub limits: LimitsConfig,
}

/// Network settings.
#[derive(Debug, Deserialize)]
pub struct NetworkConfig {
    /// Network all addresses must belong to. Unset accepts every known network.
    #[serde(default)]
    pub version: Option<NetworkVersion>,
}

/// Limits applied to decoded requests.
#[derive(Debug, Deserialize)]
pub struct LimitsConfig {
    /// Longest accepted validity window, in hours
    pub max_hours_due: NonZeroU32,

    /// Largest number of cosignatory additions plus removals in one request
    pub max_cosignatory_modifications: usize,
}

impl Config {
    const CONFIG_ENV_PREFIX: &str = "NCCMULTISIG";

    /// Returns the context documents should be decoded in.
    pub fn deserialization_context(&self) -> DeserializationContext {
        DeserializationContext::builder()
            .maybe_network(self.network.version)
            .limits(self.limits.to_request_limits())
            .build()
    }
}

impl LimitsConfig {
    fn to_request_limits(&self) -> RequestLimits {
        RequestLimits::builder()
            .max_hours_due(self.max_hours_due)
            .max_cosignatory_modifications(self.max_cosignatory_modifications)
            .build()
    }
}
