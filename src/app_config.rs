use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and defaulting configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Query server connection
    #[serde(default)]
    pub server: ServerConfig,

    /// Measurement run settings
    #[serde(default)]
    pub harness: HarnessConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Connection settings for the query server
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Host name or address of the server
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port of the server
    #[serde(default = "default_port")]
    pub port: u16,

    /// User name used to log in
    #[serde(default = "default_username")]
    pub username: String,

    /// Password used to log in
    #[serde(default = "default_password")]
    pub password: String,
}

impl ServerConfig {
    /// Socket address in `host:port` form
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: default_username(),
            password: default_password(),
        }
    }
}

/// Settings for a single measurement run
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HarnessConfig {
    /// Word list, one word per line
    #[serde(default = "default_words_file")]
    pub words_file: String,

    /// Destination of the `word;total` report
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Prefix used to discover databases when none are listed
    #[serde(default = "default_database_prefix")]
    pub database_prefix: String,

    /// Explicit databases to scan; empty means discover by prefix
    #[serde(default)]
    pub databases: Vec<String>,

    /// Whether the server should produce extended query info
    #[serde(default)]
    pub query_info: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            words_file: default_words_file(),
            output_file: default_output_file(),
            database_prefix: default_database_prefix(),
            databases: Vec::new(),
            query_info: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    1984
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_password() -> String {
    "admin".to_string()
}

fn default_words_file() -> String {
    "words".to_string()
}

fn default_output_file() -> String {
    "words.freq".to_string()
}

fn default_database_prefix() -> String {
    "inex".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(anyhow!("Server host must not be empty"));
        }

        if self.server.port == 0 {
            return Err(anyhow!("Server port must be greater than zero"));
        }

        if self.server.username.is_empty() {
            return Err(anyhow!("User name is required to log in"));
        }

        if self.harness.words_file.trim().is_empty() {
            return Err(anyhow!("Word list path must not be empty"));
        }

        if self.harness.output_file.trim().is_empty() {
            return Err(anyhow!("Output file path must not be empty"));
        }

        if let Some(name) = self.harness.databases.iter().find(|d| d.trim().is_empty()) {
            return Err(anyhow!("Invalid database name: '{}'", name));
        }

        Ok(())
    }

    /// Whether the database set has to be discovered on the server
    pub fn discovers_databases(&self) -> bool {
        self.harness.databases.is_empty()
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            harness: HarnessConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
