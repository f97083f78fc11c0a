use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_MANDATE_CONFIG: &str = "MANDATE_CONFIG";

const DEFAULT_LUNCH_FETCH_LIMIT: usize = 3;
const DEFAULT_CALENDAR_CONNECT_DELAY_MS: u64 = 1_500;
const DEFAULT_CHAT_REPLY_DELAY_MS: u64 = 1_000;
const DEFAULT_CLOCK_TICK_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClockMode {
    #[default]
    Fixed,
    Live,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default)]
    pub lunch_store_path: Option<PathBuf>,
    #[serde(default = "default_lunch_fetch_limit")]
    pub lunch_fetch_limit: usize,
    #[serde(default = "default_calendar_connect_delay_ms")]
    pub calendar_connect_delay_ms: u64,
    #[serde(default = "default_chat_reply_delay_ms")]
    pub chat_reply_delay_ms: u64,
    #[serde(default)]
    pub clock_mode: ClockMode,
    #[serde(default = "default_clock_tick_secs")]
    pub clock_tick_secs: u64,
    #[serde(default)]
    pub speech_recognition: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            lunch_store_path: None,
            lunch_fetch_limit: DEFAULT_LUNCH_FETCH_LIMIT,
            calendar_connect_delay_ms: DEFAULT_CALENDAR_CONNECT_DELAY_MS,
            chat_reply_delay_ms: DEFAULT_CHAT_REPLY_DELAY_MS,
            clock_mode: ClockMode::Fixed,
            clock_tick_secs: DEFAULT_CLOCK_TICK_SECS,
            speech_recognition: false,
        }
    }
}

impl AppConfig {
    /// Loads the file named by `MANDATE_CONFIG`, or defaults when unset.
    pub fn load() -> AppResult<Self> {
        match std::env::var_os(ENV_MANDATE_CONFIG) {
            Some(path) => Self::from_path(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|error| {
            AppError::Config(format!("cannot read {}: {}", path.display(), error))
        })?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> AppResult<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        if self.lunch_fetch_limit == 0 {
            return Err(AppError::Config("lunchFetchLimit must be at least 1".to_string()));
        }
        if self.clock_tick_secs == 0 {
            return Err(AppError::Config("clockTickSecs must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn default_lunch_fetch_limit() -> usize {
    DEFAULT_LUNCH_FETCH_LIMIT
}

fn default_calendar_connect_delay_ms() -> u64 {
    DEFAULT_CALENDAR_CONNECT_DELAY_MS
}

fn default_chat_reply_delay_ms() -> u64 {
    DEFAULT_CHAT_REPLY_DELAY_MS
}

fn default_clock_tick_secs() -> u64 {
    DEFAULT_CLOCK_TICK_SECS
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ClockMode};
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let config = AppConfig::from_yaml("").expect("defaults");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.lunch_fetch_limit, 3);
        assert_eq!(config.calendar_connect_delay_ms, 1_500);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = AppConfig::from_yaml("clockMode: live\nchatReplyDelayMs: 0\n").expect("parse");
        assert_eq!(config.clock_mode, ClockMode::Live);
        assert_eq!(config.chat_reply_delay_ms, 0);
        assert_eq!(config.clock_tick_secs, 60);
    }

    #[test]
    fn rejects_zero_fetch_limit() {
        let err = AppConfig::from_yaml("lunchFetchLimit: 0").expect_err("zero limit");
        assert!(err.to_string().contains("lunchFetchLimit"));
    }

    #[test]
    fn reads_config_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "speechRecognition: true").expect("write config");
        let config = AppConfig::from_path(file.path()).expect("load");
        assert!(config.speech_recognition);
    }
}
