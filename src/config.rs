//! Configuration management for Docconv Server

use serde::Deserialize;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

use crate::document::{UnknownFormatPolicy, WhitespacePolicy};
use crate::formats::rtf::{RtfOptions, DEFAULT_CODEPAGE};

/// Default request body cap: 20MB
pub const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub conversion: ConversionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversionConfig {
    pub unknown_format_policy: UnknownFormatPolicy,
    pub default_codepage: u32,
    pub extra_ignored_destinations: Vec<String>,
    pub whitespace: WhitespacePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            },
            conversion: ConversionConfig::default(),
        }
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        ConversionConfig {
            unknown_format_policy: UnknownFormatPolicy::Reject,
            default_codepage: DEFAULT_CODEPAGE,
            extra_ignored_destinations: Vec::new(),
            whitespace: WhitespacePolicy::Preserve,
        }
    }
}

impl ConversionConfig {
    /// RTF pipeline options derived from this configuration
    pub fn rtf_options(&self) -> RtfOptions {
        RtfOptions {
            default_codepage: self.default_codepage,
            whitespace: self.whitespace,
            ..RtfOptions::default()
        }
        .with_extra_destinations(&self.extra_ignored_destinations)
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var(&lookup, "SERVER_PORT")?.unwrap_or(defaults.server.port),
                max_body_bytes: parse_var(&lookup, "MAX_BODY_BYTES")?
                    .unwrap_or(defaults.server.max_body_bytes),
            },
            conversion: ConversionConfig {
                unknown_format_policy: parse_var(&lookup, "UNKNOWN_FORMAT_POLICY")?
                    .unwrap_or(defaults.conversion.unknown_format_policy),
                default_codepage: parse_var(&lookup, "RTF_DEFAULT_CODEPAGE")?
                    .unwrap_or(defaults.conversion.default_codepage),
                extra_ignored_destinations: lookup("RTF_EXTRA_IGNORED_DESTINATIONS")
                    .map(|list| {
                        list.split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
                whitespace: parse_var(&lookup, "TEXT_WHITESPACE_POLICY")?
                    .unwrap_or(defaults.conversion.whitespace),
            },
        })
    }
}

/// Parse an optional variable; blank values count as unset
fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse()
                .map(Some)
                .map_err(|e: T::Err| ConfigError::InvalidValue {
                    name,
                    reason: e.to_string(),
                })
        }
        _ => Ok(None),
    }
}
