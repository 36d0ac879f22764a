//! Engine configuration.
//!
//! Settings come from `chess-ai.toml`, then `CHESS_AI_*` environment
//! variables, then command-line flags, each layer overriding the last.

use anyhow::{Context, Result};
use chess_agents::{SelectConfig, Strategy};
use serde::Deserialize;
use std::f64::consts::SQRT_2;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CHESS_AI_CONFIG";

/// Config file looked for in the working directory.
pub const CONFIG_FILE: &str = "chess-ai.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub strategy: String,
    pub depth: u8,
    pub timeout_ms: u64,
    pub exploration: f64,
    pub seed: u64,
    pub max_iterations: Option<u32>,
    pub rollout_ply_limit: Option<u32>,
    /// MCTS cache node count that triggers a reset. Unbounded if absent.
    pub cache_capacity: Option<usize>,
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: "alphabeta".to_string(),
            depth: 3,
            timeout_ms: 1000,
            exploration: SQRT_2,
            seed: 0,
            max_iterations: None,
            rollout_ply_limit: None,
            cache_capacity: None,
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn strategy(&self) -> Result<Strategy> {
        Ok(self.strategy.parse()?)
    }

    pub fn select_config(&self) -> SelectConfig {
        SelectConfig {
            depth: self.depth,
            timeout: Duration::from_millis(self.timeout_ms),
            exploration_constant: self.exploration,
            max_iterations: self.max_iterations,
            rollout_ply_limit: self.rollout_ply_limit,
        }
    }
}

/// Loads the config file, if any, and applies environment overrides.
///
/// Looks at `$CHESS_AI_CONFIG`, then `./chess-ai.toml`. Returns the path
/// that was read so the caller can log it once tracing is up.
pub fn load_config() -> Result<(EngineConfig, Option<PathBuf>)> {
    let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let path = match explicit {
        Some(path) => Some(path),
        None => Some(PathBuf::from(CONFIG_FILE)).filter(|p| p.exists()),
    };

    let config = match &path {
        Some(path) => load_from_path(path)?,
        None => EngineConfig::default(),
    };

    Ok((apply_env_overrides(config, |key| std::env::var(key).ok()), path))
}

pub fn load_from_path(path: &Path) -> Result<EngineConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

macro_rules! env_override {
    ($config:ident . $field:ident, $lookup:ident, $key:expr) => {
        if let Some(v) = $lookup($key) {
            $config.$field = v;
        }
    };
    ($config:ident . $field:ident, $lookup:ident, $key:expr, parse) => {
        if let Some(v) = $lookup($key).and_then(|s| s.parse().ok()) {
            $config.$field = v;
        }
    };
    ($config:ident . $field:ident, $lookup:ident, $key:expr, optional_parse) => {
        if let Some(v) = $lookup($key).and_then(|s| s.parse().ok()) {
            $config.$field = Some(v);
        }
    };
}

/// Applies `CHESS_AI_<FIELD>` overrides read through `lookup`.
/// Values that fail to parse are ignored.
pub fn apply_env_overrides<F>(mut config: EngineConfig, lookup: F) -> EngineConfig
where
    F: Fn(&str) -> Option<String>,
{
    env_override!(config.strategy, lookup, "CHESS_AI_STRATEGY");
    env_override!(config.depth, lookup, "CHESS_AI_DEPTH", parse);
    env_override!(config.timeout_ms, lookup, "CHESS_AI_TIMEOUT_MS", parse);
    env_override!(config.exploration, lookup, "CHESS_AI_EXPLORATION", parse);
    env_override!(config.seed, lookup, "CHESS_AI_SEED", parse);
    env_override!(
        config.max_iterations,
        lookup,
        "CHESS_AI_MAX_ITERATIONS",
        optional_parse
    );
    env_override!(
        config.rollout_ply_limit,
        lookup,
        "CHESS_AI_ROLLOUT_PLY_LIMIT",
        optional_parse
    );
    env_override!(
        config.cache_capacity,
        lookup,
        "CHESS_AI_CACHE_CAPACITY",
        optional_parse
    );
    env_override!(config.log_level, lookup, "CHESS_AI_LOG_LEVEL");
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.strategy().unwrap(), Strategy::AlphaBeta);
        assert_eq!(config.select_config(), SelectConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            strategy = "mcts"
            timeout_ms = 250
            cache_capacity = 100000
            "#,
        )
        .unwrap();

        assert_eq!(config.strategy().unwrap(), Strategy::Mcts);
        assert_eq!(config.timeout_ms, 250);
        assert_eq!(config.cache_capacity, Some(100_000));
        assert_eq!(config.depth, 3);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("CHESS_AI_DEPTH", "5"),
            ("CHESS_AI_STRATEGY", "minimax"),
            ("CHESS_AI_ROLLOUT_PLY_LIMIT", "60"),
            ("CHESS_AI_SEED", "not a number"),
        ]
        .into_iter()
        .collect();

        let config = apply_env_overrides(EngineConfig::default(), |key| {
            env.get(key).map(|v| v.to_string())
        });

        assert_eq!(config.depth, 5);
        assert_eq!(config.strategy, "minimax");
        assert_eq!(config.rollout_ply_limit, Some(60));
        assert_eq!(config.seed, 0);
    }

    #[test]
    fn test_unknown_strategy_is_an_error() {
        let config = EngineConfig {
            strategy: "negamax".to_string(),
            ..EngineConfig::default()
        };
        assert!(config.strategy().is_err());
    }
}
