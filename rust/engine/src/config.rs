//! Table configuration: defaults, an optional TOML file, then environment overrides.
//!
//! | Source | Key |
//! |--------|-----|
//! | file   | path in `HOLDEM_CONFIG` |
//! | env    | `HOLDEM_SMALL_BLIND`, `HOLDEM_BIG_BLIND`, `HOLDEM_STARTING_STACK`, `HOLDEM_SEED`, `HOLDEM_RNG` |

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::game::{MAX_PLAYERS, MIN_PLAYERS};
use crate::rng::{RandomSource, SecureRandom, SeededRandom};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RngKind {
    /// Reproducible shuffles from `seed`, for tests and hand replay
    Seeded,
    /// OS-seeded shuffles for live play
    Secure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub small_blind: u32,
    pub big_blind: u32,
    pub starting_stack: u32,
    pub max_seats: usize,
    pub seed: Option<u64>,
    pub rng: RngKind,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            small_blind: 50,
            big_blind: 100,
            starting_stack: 10_000,
            max_seats: 9,
            seed: None,
            rng: RngKind::Secure,
        }
    }
}

impl TableConfig {
    /// Builds the configured randomness source.
    pub fn random_source(&self) -> Box<dyn RandomSource> {
        match (self.rng, self.seed) {
            (RngKind::Seeded, Some(seed)) => Box::new(SeededRandom::new(seed)),
            // validation rejects a seeded config without a seed
            _ => Box::new(SecureRandom::new()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.small_blind == 0 || self.big_blind == 0 {
            return Err(ConfigError::Invalid("blinds must be >0".into()));
        }
        if self.small_blind > self.big_blind {
            return Err(ConfigError::Invalid(
                "small_blind must not exceed big_blind".into(),
            ));
        }
        if self.starting_stack < self.big_blind {
            return Err(ConfigError::Invalid(
                "starting_stack must cover the big blind".into(),
            ));
        }
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.max_seats) {
            return Err(ConfigError::Invalid(format!(
                "max_seats must be within {MIN_PLAYERS}..={MAX_PLAYERS}"
            )));
        }
        if self.rng == RngKind::Seeded && self.seed.is_none() {
            return Err(ConfigError::Invalid("seeded rng requires a seed".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigSources {
    pub small_blind: ValueSource,
    pub big_blind: ValueSource,
    pub starting_stack: ValueSource,
    pub max_seats: ValueSource,
    pub seed: ValueSource,
    pub rng: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            small_blind: ValueSource::Default,
            big_blind: ValueSource::Default,
            starting_stack: ValueSource::Default,
            max_seats: ValueSource::Default,
            seed: ValueSource::Default,
            rng: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: TableConfig,
    pub sources: ConfigSources,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    small_blind: Option<u32>,
    #[serde(default)]
    big_blind: Option<u32>,
    #[serde(default)]
    starting_stack: Option<u32>,
    #[serde(default)]
    max_seats: Option<usize>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    rng: Option<RngKind>,
}

pub fn load() -> Result<TableConfig, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = TableConfig::default();
    let mut sources = ConfigSources::default();

    if let Some(path) = env_value("HOLDEM_CONFIG") {
        apply_file(&mut cfg, &mut sources, read_file(path)?);
    }

    if let Some(v) = env_value("HOLDEM_SMALL_BLIND") {
        cfg.small_blind = parse_env("HOLDEM_SMALL_BLIND", &v)?;
        sources.small_blind = ValueSource::Env;
    }
    if let Some(v) = env_value("HOLDEM_BIG_BLIND") {
        cfg.big_blind = parse_env("HOLDEM_BIG_BLIND", &v)?;
        sources.big_blind = ValueSource::Env;
    }
    if let Some(v) = env_value("HOLDEM_STARTING_STACK") {
        cfg.starting_stack = parse_env("HOLDEM_STARTING_STACK", &v)?;
        sources.starting_stack = ValueSource::Env;
    }
    if let Some(v) = env_value("HOLDEM_SEED") {
        cfg.seed = Some(parse_env("HOLDEM_SEED", &v)?);
        sources.seed = ValueSource::Env;
    }
    if let Some(v) = env_value("HOLDEM_RNG") {
        cfg.rng = parse_rng(&v)
            .ok_or_else(|| ConfigError::Invalid(format!("Invalid HOLDEM_RNG: {v}")))?;
        sources.rng = ValueSource::Env;
    }

    cfg.validate()?;
    tracing::debug!(?cfg, ?sources, "table config resolved");
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

/// Loads a TOML file on top of the defaults, without consulting the environment.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<TableConfig, ConfigError> {
    let mut cfg = TableConfig::default();
    apply_file(&mut cfg, &mut ConfigSources::default(), read_file(path)?);
    cfg.validate()?;
    Ok(cfg)
}

fn read_file<P: AsRef<Path>>(path: P) -> Result<FileConfig, ConfigError> {
    let s = fs::read_to_string(path)?;
    Ok(toml::from_str(&s)?)
}

fn apply_file(cfg: &mut TableConfig, sources: &mut ConfigSources, f: FileConfig) {
    if let Some(v) = f.small_blind {
        cfg.small_blind = v;
        sources.small_blind = ValueSource::File;
    }
    if let Some(v) = f.big_blind {
        cfg.big_blind = v;
        sources.big_blind = ValueSource::File;
    }
    if let Some(v) = f.starting_stack {
        cfg.starting_stack = v;
        sources.starting_stack = ValueSource::File;
    }
    if let Some(v) = f.max_seats {
        cfg.max_seats = v;
        sources.max_seats = ValueSource::File;
    }
    if let Some(v) = f.seed {
        cfg.seed = Some(v);
        sources.seed = ValueSource::File;
    }
    if let Some(v) = f.rng {
        cfg.rng = v;
        sources.rng = ValueSource::File;
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, v: &str) -> Result<T, ConfigError> {
    v.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("Invalid {key}: {v}")))
}

fn parse_rng(s: &str) -> Option<RngKind> {
    match s.to_ascii_lowercase().as_str() {
        "seeded" | "deterministic" => Some(RngKind::Seeded),
        "secure" | "os" => Some(RngKind::Secure),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        TableConfig::default().validate().unwrap();
    }

    #[test]
    fn seeded_without_seed_is_rejected() {
        let cfg = TableConfig {
            rng: RngKind::Seeded,
            ..TableConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn parse_rng_accepts_aliases() {
        assert_eq!(parse_rng("SEEDED"), Some(RngKind::Seeded));
        assert_eq!(parse_rng("os"), Some(RngKind::Secure));
        assert_eq!(parse_rng("dice"), None);
    }
}
