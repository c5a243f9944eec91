//! Module: config
//! Responsibility: TOML-backed limits for schema construction and execution.
//! Does not own: where the TOML text comes from.
//! Boundary: validated once, then copied into `SchemaBuilder` / `ExecutionContext`.

use crate::error::{ErrorClass, ErrorOrigin, InternalError};
use serde::Deserialize;
use thiserror::Error as ThisError;

///
/// Defaults
///

pub const DEFAULT_MAX_DEPTH: u32 = 16;
pub const DEFAULT_MAX_ROW_TYPES: u32 = 1024;
pub const DEFAULT_HKEY_SEGMENT_RESERVE: usize = 8;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config value '{field}' is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Config, err.to_string())
    }
}

///
/// Config
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub schema: SchemaConfig,
    pub execution: ExecutionConfig,
}

impl Config {
    /// Parse and validate one TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;

        Ok(config)
    }

    /// Reject values that would make every schema or query fail.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.schema.max_depth == 0 {
            return Err(ConfigError::Invalid {
                field: "schema.max_depth",
                reason: "must allow at least one level",
            });
        }
        if self.schema.max_row_types == 0 {
            return Err(ConfigError::Invalid {
                field: "schema.max_row_types",
                reason: "must allow at least one row type",
            });
        }
        if self.execution.hkey_segment_reserve == 0 {
            return Err(ConfigError::Invalid {
                field: "execution.hkey_segment_reserve",
                reason: "must reserve at least one segment",
            });
        }

        Ok(())
    }
}

///
/// SchemaConfig
///
/// Limits enforced while building a `Schema`.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    /// Deepest allowed table depth (root = 0), exclusive.
    pub max_depth: u32,
    /// Maximum number of table row types in one schema.
    pub max_row_types: u32,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_row_types: DEFAULT_MAX_ROW_TYPES,
        }
    }
}

///
/// ExecutionConfig
///
/// Per-session execution knobs.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutionConfig {
    /// Initial segment capacity of every scratch HKey in the session cache.
    pub hkey_segment_reserve: usize,
    /// Emit plan start/finish trace events from `ExecutionContext::execute`.
    pub trace_plan: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            hkey_segment_reserve: DEFAULT_HKEY_SEGMENT_RESERVE,
            trace_plan: true,
        }
    }
}

///
/// TESTS
///
