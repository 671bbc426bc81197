//! Loads [`HeuristicsConfig`] from a JSON file named by `SHOPSENSE_HEURISTICS`.

use crate::domain::error::DomainError;
use crate::domain::values::heuristics::HeuristicsConfig;
use std::path::Path;

pub const HEURISTICS_ENV: &str = "SHOPSENSE_HEURISTICS";

pub fn load_from_env() -> Result<HeuristicsConfig, DomainError> {
    match std::env::var(HEURISTICS_ENV) {
        Ok(path) if !path.trim().is_empty() => load_from_file(Path::new(path.trim())),
        _ => Ok(HeuristicsConfig::default()),
    }
}

pub fn load_from_file(path: &Path) -> Result<HeuristicsConfig, DomainError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| DomainError::Config(format!("cannot read {}: {e}", path.display())))?;
    let config: HeuristicsConfig = serde_json::from_str(&raw).map_err(|e| {
        DomainError::Config(format!("invalid heuristics file {}: {e}", path.display()))
    })?;
    config.validate()?;
    tracing::info!(path = %path.display(), "loaded heuristics overrides");
    Ok(config)
}
