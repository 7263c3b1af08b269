//! Configuration loading, validation, and management for HRDesk.
//!
//! Loads configuration from `~/.hrdesk/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use hrdesk_core::agent::AgentConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.hrdesk/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    #[serde(default)]
    pub agent: AgentSection,

    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Knobs of the simulated HR data source
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// How cards show dates and times
    #[serde(default)]
    pub display: DisplayConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    1024
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("agent", &self.agent)
            .field("gateway", &self.gateway)
            .field("simulation", &self.simulation)
            .field("display", &self.display)
            .field("providers", &self.providers)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

/// The `[agent]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSection {
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Replaces the built-in HR instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    #[serde(default = "default_max_tool_iterations")]
    pub max_tool_iterations: u32,
}

fn default_agent_name() -> String {
    "HR Assistant".into()
}
fn default_max_tool_iterations() -> u32 {
    5
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            instructions: None,
            max_tool_iterations: default_max_tool_iterations(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Conversations kept in memory before the oldest is evicted
    #[serde(default = "default_max_conversations")]
    pub max_conversations: usize,
}

fn default_port() -> u16 {
    4111
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_max_conversations() -> usize {
    1000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            max_conversations: default_max_conversations(),
        }
    }
}

/// The `[simulation]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Local hour at which everyone clocks in
    #[serde(default = "default_workday_start")]
    pub workday_start_hour: u32,

    /// Local hour after which nobody is still working
    #[serde(default = "default_workday_end")]
    pub workday_end_hour: u32,

    /// Inclusive bounds of the random hours-worked draw
    #[serde(default = "default_min_hours")]
    pub min_hours_worked: u32,

    #[serde(default = "default_max_hours")]
    pub max_hours_worked: u32,

    #[serde(default = "default_employee_name")]
    pub employee_name: String,

    #[serde(default = "default_weekly_hours")]
    pub weekly_hours: f64,

    #[serde(default = "default_overtime_hours")]
    pub overtime_hours: f64,
}

fn default_workday_start() -> u32 {
    9
}
fn default_workday_end() -> u32 {
    18
}
fn default_min_hours() -> u32 {
    6
}
fn default_max_hours() -> u32 {
    9
}
fn default_employee_name() -> String {
    "John Doe".into()
}
fn default_weekly_hours() -> f64 {
    38.5
}
fn default_overtime_hours() -> f64 {
    2.5
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            workday_start_hour: default_workday_start(),
            workday_end_hour: default_workday_end(),
            min_hours_worked: default_min_hours(),
            max_hours_worked: default_max_hours(),
            employee_name: default_employee_name(),
            weekly_hours: default_weekly_hours(),
            overtime_hours: default_overtime_hours(),
        }
    }
}

/// The `[display]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Fixed offset from UTC for card times. Unset means the host's
    /// local offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.hrdesk/config.toml).
    ///
    /// API keys are also read from the environment, first match wins:
    /// - `HRDESK_API_KEY`
    /// - `OPENAI_API_KEY`
    /// - `OPENROUTER_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = lookup("HRDESK_API_KEY")
                .or_else(|| lookup("OPENAI_API_KEY"))
                .or_else(|| lookup("OPENROUTER_API_KEY"));
        }

        if let Some(provider) = lookup("HRDESK_PROVIDER") {
            self.default_provider = provider;
        }

        if let Some(model) = lookup("HRDESK_MODEL") {
            self.default_model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".hrdesk")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.agent.max_tool_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_tool_iterations must be at least 1".into(),
            ));
        }

        if self.gateway.max_conversations == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.max_conversations must be at least 1".into(),
            ));
        }

        let sim = &self.simulation;
        if sim.workday_start_hour >= sim.workday_end_hour || sim.workday_end_hour > 24 {
            return Err(ConfigError::ValidationError(
                "simulation workday must satisfy start < end <= 24".into(),
            ));
        }
        if sim.min_hours_worked > sim.max_hours_worked || sim.max_hours_worked > 24 {
            return Err(ConfigError::ValidationError(
                "simulation hours worked must satisfy min <= max <= 24".into(),
            ));
        }

        if let Some(offset) = self.display.utc_offset_minutes {
            if offset.abs() > 14 * 60 {
                return Err(ConfigError::ValidationError(
                    "display.utc_offset_minutes must be within +/-840".into(),
                ));
            }
        }

        Ok(())
    }

    /// Agent settings resolved against the top-level defaults.
    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            name: self.agent.name.clone(),
            model: self.default_model.clone(),
            temperature: self.default_temperature,
            max_tool_iterations: self.agent.max_tool_iterations,
            instructions: self.agent.instructions.clone(),
        }
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            agent: AgentSection::default(),
            gateway: GatewayConfig::default(),
            simulation: SimulationConfig::default(),
            display: DisplayConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for hrdesk_core::Error {
    fn from(e: ConfigError) -> Self {
        hrdesk_core::Error::config(e.to_string())
    }
}
