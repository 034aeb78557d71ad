//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! Required:
//! - `FRONTDESK_BUSINESS_NAME`: Business name used in greetings
//! - `FRONTDESK_BUSINESS_HOURS`: Human-readable hours string
//! - `FRONTDESK_BUSINESS_PHONE`: Callback number quoted to callers
//! - `FRONTDESK_CALENDAR_ID`: Target calendar
//! - `FRONTDESK_TIMEZONE`: IANA timezone name
//!
//! Optional (defaults apply):
//! - `FRONTDESK_OPEN_DAYS`: Comma-separated weekday names
//! - `FRONTDESK_OPEN_HOUR` / `FRONTDESK_CLOSE_HOUR`: 24h bounds
//! - `FRONTDESK_MEETING_DURATION_MINS`
//! - `FRONTDESK_SEARCH_HORIZON_DAYS`
//! - `FRONTDESK_SUGGESTION_COUNT`
//! - `FRONTDESK_DIAL_TIMEOUT_SECS` / `FRONTDESK_JOIN_TIMEOUT_SECS` /
//!   `FRONTDESK_VOICEMAIL_GRACE_SECS`

use std::path::{Path, PathBuf};

use chrono::Weekday;
use chrono_tz::Tz;
use frontdesk_domain::constants::{
    DEFAULT_MEETING_DURATION_MINS, DEFAULT_SEARCH_HORIZON_DAYS, DEFAULT_SUGGESTION_COUNT,
};
use frontdesk_domain::{
    BusinessHoursPolicy, BusinessInfo, CallTimeouts, Config, FrontdeskError, Result,
    SchedulingConfig,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `FrontdeskError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let business = BusinessInfo {
        name: env_var("FRONTDESK_BUSINESS_NAME")?,
        hours_display: env_var("FRONTDESK_BUSINESS_HOURS")?,
        phone: env_var("FRONTDESK_BUSINESS_PHONE")?,
    };

    let open_days = match std::env::var("FRONTDESK_OPEN_DAYS") {
        Ok(raw) => parse_open_days(&raw)?,
        Err(_) => BusinessHoursPolicy::weekdays_nine_to_five().open_days,
    };
    let hours = BusinessHoursPolicy::new(
        open_days,
        env_parse("FRONTDESK_OPEN_HOUR", 9)?,
        env_parse("FRONTDESK_CLOSE_HOUR", 17)?,
        env_parse("FRONTDESK_MEETING_DURATION_MINS", DEFAULT_MEETING_DURATION_MINS)?,
    )?;

    let timezone: Tz = env_var("FRONTDESK_TIMEZONE")?
        .parse()
        .map_err(|e| FrontdeskError::Config(format!("Invalid timezone: {e}")))?;
    let mut scheduling = SchedulingConfig::new(env_var("FRONTDESK_CALENDAR_ID")?, timezone);
    scheduling.search_horizon_days =
        env_parse("FRONTDESK_SEARCH_HORIZON_DAYS", DEFAULT_SEARCH_HORIZON_DAYS)?;
    scheduling.suggestion_count =
        env_parse("FRONTDESK_SUGGESTION_COUNT", DEFAULT_SUGGESTION_COUNT)?;

    let defaults = CallTimeouts::default();
    let timeouts = CallTimeouts {
        dial_secs: env_parse("FRONTDESK_DIAL_TIMEOUT_SECS", defaults.dial_secs)?,
        participant_join_secs: env_parse(
            "FRONTDESK_JOIN_TIMEOUT_SECS",
            defaults.participant_join_secs,
        )?,
        voicemail_grace_secs: env_parse(
            "FRONTDESK_VOICEMAIL_GRACE_SECS",
            defaults.voicemail_grace_secs,
        )?,
    };

    Ok(Config { business, hours, scheduling, timeouts })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(FrontdeskError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            FrontdeskError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| FrontdeskError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from string content, format detected by extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| FrontdeskError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| FrontdeskError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(FrontdeskError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Deserialized configs bypass constructor checks; re-apply them here.
fn validate(config: &Config) -> Result<()> {
    BusinessHoursPolicy::new(
        config.hours.open_days.clone(),
        config.hours.open_hour,
        config.hours.close_hour,
        config.hours.default_duration_mins,
    )
    .map_err(|e| FrontdeskError::Config(format!("Invalid business hours: {e}")))?;
    if config.scheduling.calendar_id.is_empty() {
        return Err(FrontdeskError::Config("calendar_id must not be empty".to_string()));
    }
    Ok(())
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, up to two parent levels, and the
/// executable's directory for `config.{json,toml}` / `frontdesk.{json,toml}`.
pub fn probe_config_paths() -> Option<PathBuf> {
    let names = ["config.json", "config.toml", "frontdesk.json", "frontdesk.toml"];
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        for prefix in ["", "../", "../../"] {
            candidates.extend(names.iter().map(|n| cwd.join(format!("{prefix}{n}"))));
        }
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(names.iter().map(|n| exe_dir.join(n)));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn parse_open_days(raw: &str) -> Result<Vec<Weekday>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Weekday>()
                .map_err(|_| FrontdeskError::Config(format!("Invalid weekday: {s}")))
        })
        .collect()
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        FrontdeskError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional environment variable, falling back to `default`.
fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| FrontdeskError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}
