// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Runtime configuration.
//!
//! Precedence, lowest first: built-in defaults, `FLOWDESK_*` environment variables, command-line
//! flags.

use std::fmt;
use std::path::PathBuf;

use url::Url;

use crate::api::DEFAULT_API_URL;
use crate::logging;
use crate::model::{CanvasId, IdError};
use crate::store::WriteDurability;

pub const ENV_API_URL: &str = "FLOWDESK_API_URL";
pub const ENV_SESSION_FILE: &str = "FLOWDESK_SESSION_FILE";
pub const ENV_LOG_DIR: &str = "FLOWDESK_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "FLOWDESK_LOG";

const APP_DIR: &str = "flowdesk";

pub fn usage(program: &str) -> String {
    format!(
        "Usage:\n  {program} [--api <url>] [--session-file <path>] [--log-dir <dir>] [--log-level <level>] [--canvas <id>] [--durable-writes]\n\n\
         --api            backend base url (default {DEFAULT_API_URL}, env {ENV_API_URL})\n\
         --session-file   where the login session is kept (env {ENV_SESSION_FILE})\n\
         --log-dir        directory for rotating log files, absolute (env {ENV_LOG_DIR})\n\
         --log-level      trace|debug|info|warn|error|off (env {ENV_LOG_LEVEL})\n\
         --canvas         open this stored canvas after login\n\
         --durable-writes fsync the session file on every write"
    )
}

/// Flags as given on the command line, before merging with the environment.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub api: Option<String>,
    pub session_file: Option<String>,
    pub log_dir: Option<String>,
    pub log_level: Option<String>,
    pub canvas: Option<String>,
    pub durable_writes: bool,
    pub help: bool,
}

/// Rejects unknown, duplicated and value-less flags as well as positional arguments.
pub fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ConfigError> {
    fn set_once(
        slot: &mut Option<String>,
        flag: &str,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<(), ConfigError> {
        if slot.is_some() {
            return Err(ConfigError::Usage(format!("duplicate flag {flag}")));
        }
        let value = args
            .next()
            .ok_or_else(|| ConfigError::Usage(format!("missing value for {flag}")))?;
        *slot = Some(value);
        Ok(())
    }

    let mut options = CliOptions::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--api" => set_once(&mut options.api, "--api", &mut args)?,
            "--session-file" => set_once(&mut options.session_file, "--session-file", &mut args)?,
            "--log-dir" => set_once(&mut options.log_dir, "--log-dir", &mut args)?,
            "--log-level" => set_once(&mut options.log_level, "--log-level", &mut args)?,
            "--canvas" => set_once(&mut options.canvas, "--canvas", &mut args)?,
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(ConfigError::Usage("duplicate flag --durable-writes".to_owned()));
                }
                options.durable_writes = true;
            }
            "-h" | "--help" => options.help = true,
            other => return Err(ConfigError::Usage(format!("unexpected argument {other}"))),
        }
    }
    Ok(options)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: Url,
    pub session_file: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: &'static str,
    pub open_canvas: Option<CanvasId>,
    pub durability: WriteDurability,
}

impl AppConfig {
    /// Merges defaults, environment and flags. `env` is injected so tests need not touch the
    /// process environment.
    pub fn resolve(
        options: CliOptions,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let pick = |flag: Option<String>, var: &str| {
            flag.or_else(|| env(var).filter(|value| !value.trim().is_empty()))
        };

        let api = pick(options.api, ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let api_base_url = parse_api_url(&api)?;

        let session_file = match pick(options.session_file, ENV_SESSION_FILE) {
            Some(path) => PathBuf::from(path),
            None => default_session_file()?,
        };

        let log_dir = match pick(options.log_dir, ENV_LOG_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => default_log_dir()?,
        };
        if !log_dir.is_absolute() {
            return Err(ConfigError::RelativeLogDir { path: log_dir });
        }

        let log_level = match pick(options.log_level, ENV_LOG_LEVEL) {
            Some(level) => logging::normalize_level(&level)
                .map_err(|_| ConfigError::InvalidLogLevel { value: level })?,
            None => logging::default_log_level(),
        };

        let open_canvas = options
            .canvas
            .map(|value| {
                CanvasId::new(value.clone())
                    .map_err(|source| ConfigError::InvalidCanvasId { value, source })
            })
            .transpose()?;

        let durability = if options.durable_writes {
            WriteDurability::Durable
        } else {
            WriteDurability::BestEffort
        };

        Ok(Self {
            api_base_url,
            session_file,
            log_dir,
            log_level,
            open_canvas,
            durability,
        })
    }

    pub fn from_env(options: CliOptions) -> Result<Self, ConfigError> {
        Self::resolve(options, |var| std::env::var(var).ok())
    }
}

fn parse_api_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|source| ConfigError::InvalidApiUrl {
        value: value.to_owned(),
        source: Some(source),
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidApiUrl {
            value: value.to_owned(),
            source: None,
        });
    }
    Ok(url)
}

fn default_session_file() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join("session.json"))
        .ok_or(ConfigError::NoConfigDir)
}

fn default_log_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR).join("logs"))
        .ok_or(ConfigError::NoConfigDir)
}

#[derive(Debug)]
pub enum ConfigError {
    /// Bad command line; the caller prints usage and exits with status 2.
    Usage(String),
    InvalidApiUrl {
        value: String,
        source: Option<url::ParseError>,
    },
    InvalidLogLevel { value: String },
    InvalidCanvasId { value: String, source: IdError },
    RelativeLogDir { path: PathBuf },
    NoConfigDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usage(message) => f.write_str(message),
            Self::InvalidApiUrl { value, .. } => {
                write!(f, "invalid api url `{value}` (expected an http(s) url)")
            }
            Self::InvalidLogLevel { value } => write!(f, "invalid log level `{value}`"),
            Self::InvalidCanvasId { value, source } => {
                write!(f, "invalid canvas id `{value}`: {source}")
            }
            Self::RelativeLogDir { path } => {
                write!(f, "log dir must be absolute, got {}", path.display())
            }
            Self::NoConfigDir => f.write_str("could not determine a config directory"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidApiUrl {
                source: Some(source),
                ..
            } => Some(source),
            Self::InvalidCanvasId { source, .. } => Some(source),
            _ => None,
        }
    }
}
