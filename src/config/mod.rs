//! Configuration system for modus
//!
//! Provides a flexible configuration system supporting:
//! - TOML configuration files
//! - Environment variable overrides
//! - Per-solver tuning knobs
//!
//! # Configuration File Locations
//!
//! Configuration files are searched in order (first found wins):
//! 1. `./modus.toml` - Project-local configuration
//! 2. `~/.config/modus/config.toml` - User configuration (XDG)
//! 3. `~/.modus/config.toml` - User configuration (legacy)
//!
//! # Environment Variables
//!
//! - `MODUS_LOG_LEVEL` - Logging verbosity (quiet, normal, verbose, debug)
//! - `MODUS_WALKSAT_P` - WalkSAT random-walk probability
//! - `MODUS_WALKSAT_FLIPS` - WalkSAT flip budget
//! - `MODUS_SEED` - WalkSAT random seed
//! - `MODUS_MAX_DECISIONS` - DPLL decision limit (0 for unlimited)
//! - `MODUS_MAX_ROUNDS` - Resolution round limit (0 for unlimited)
//!
//! # Example Configuration
//!
//! ```toml
//! # modus.toml
//!
//! [general]
//! log_level = "normal"
//!
//! [walksat]
//! p = 0.5
//! max_flips = 10000
//!
//! [dpll]
//! max_decisions = 0
//!
//! [resolution]
//! max_rounds = 0
//! ```

use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, ModusError, ModusResult};

// ============================================================================
// Configuration Schema
// ============================================================================

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ModusConfig {
    /// General settings
    pub general: GeneralConfig,
    /// WalkSAT tuning
    pub walksat: WalkSatConfig,
    /// DPLL tuning
    pub dpll: DpllConfig,
    /// Resolution tuning
    pub resolution: ResolutionConfig,
}

/// General configuration options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Logging level
    pub log_level: LogLevel,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            log_level: LogLevel::Normal,
        }
    }
}

/// Logging verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Quiet,
    Normal,
    Verbose,
    Debug,
}

impl LogLevel {
    /// The tracing env-filter directive for this level.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Quiet => "error",
            LogLevel::Normal => "warn",
            LogLevel::Verbose => "debug",
            LogLevel::Debug => "trace",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ModusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" => Ok(LogLevel::Quiet),
            "normal" => Ok(LogLevel::Normal),
            "verbose" => Ok(LogLevel::Verbose),
            "debug" => Ok(LogLevel::Debug),
            other => Err(ModusError::new(
                ErrorCode::InvalidConfigValue,
                format!("unknown log level: {}", other),
            )
            .with_hint("Available levels: quiet, normal, verbose, debug")),
        }
    }
}

/// WalkSAT configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WalkSatConfig {
    /// Probability of a random (non-greedy) flip
    pub p: f64,
    /// Flip budget per call
    pub max_flips: usize,
    /// Random seed; omit for a different walk every run
    pub seed: Option<u64>,
}

impl Default for WalkSatConfig {
    fn default() -> Self {
        WalkSatConfig {
            p: 0.5,
            max_flips: 10_000,
            seed: None,
        }
    }
}

/// DPLL configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DpllConfig {
    /// Decision limit; 0 means unlimited
    pub max_decisions: usize,
}

impl Default for DpllConfig {
    fn default() -> Self {
        DpllConfig { max_decisions: 0 }
    }
}

/// Resolution configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Round limit; 0 means unlimited
    pub max_rounds: usize,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        ResolutionConfig { max_rounds: 0 }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl ModusConfig {
    /// Load configuration from the first config file found, then apply
    /// environment overrides. Falls back to defaults when no file exists.
    pub fn load() -> ModusResult<Self> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file plus environment overrides.
    pub fn load_from(path: &PathBuf) -> ModusResult<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML string.
    pub fn from_toml_str(input: &str) -> ModusResult<Self> {
        let config: ModusConfig = toml::from_str(input)?;
        Ok(config)
    }

    fn from_file(path: &PathBuf) -> ModusResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    fn find_config_file() -> Option<PathBuf> {
        let mut candidates = vec![PathBuf::from("modus.toml")];
        if let Some(home) = env::var_os("HOME") {
            let home = PathBuf::from(home);
            candidates.push(home.join(".config").join("modus").join("config.toml"));
            candidates.push(home.join(".modus").join("config.toml"));
        }
        candidates.into_iter().find(|p| p.is_file())
    }

    fn apply_env_overrides(&mut self) -> ModusResult<()> {
        if let Ok(level) = env::var("MODUS_LOG_LEVEL") {
            self.general.log_level = level.parse()?;
        }
        if let Ok(p) = env::var("MODUS_WALKSAT_P") {
            self.walksat.p = parse_env("MODUS_WALKSAT_P", &p)?;
        }
        if let Ok(flips) = env::var("MODUS_WALKSAT_FLIPS") {
            self.walksat.max_flips = parse_env("MODUS_WALKSAT_FLIPS", &flips)?;
        }
        if let Ok(seed) = env::var("MODUS_SEED") {
            self.walksat.seed = Some(parse_env("MODUS_SEED", &seed)?);
        }
        if let Ok(decisions) = env::var("MODUS_MAX_DECISIONS") {
            self.dpll.max_decisions = parse_env("MODUS_MAX_DECISIONS", &decisions)?;
        }
        if let Ok(rounds) = env::var("MODUS_MAX_ROUNDS") {
            self.resolution.max_rounds = parse_env("MODUS_MAX_ROUNDS", &rounds)?;
        }
        Ok(())
    }

    /// Reject configurations no solver can honor.
    pub fn validate(&self) -> ModusResult<()> {
        crate::modus_ensure!(
            (0.0..=1.0).contains(&self.walksat.p),
            ErrorCode::InvalidConfigValue,
            "walksat.p must be within [0, 1], got {}",
            self.walksat.p
        );
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> ModusResult<T> {
    value.parse().map_err(|_| {
        ModusError::new(
            ErrorCode::InvalidConfigValue,
            format!("cannot parse {}={:?}", name, value),
        )
    })
}
