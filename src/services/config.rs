use crate::domain::constants::DEFAULT_CATALOG_FILE;
use crate::domain::models::{ConfigFile, InvalidInput};
use crate::services::engine::PassPolicy;
use std::path::{Path, PathBuf};

fn default_config_path() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/hazid/config.toml"))
}

/// An explicit path must exist; the default location may be absent.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<ConfigFile> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Ok(p) if p.exists() => p,
            _ => return Ok(ConfigFile::default()),
        },
    };
    let raw = std::fs::read_to_string(&path)
        .map_err(|e| InvalidInput(format!("cannot read config {}: {}", path.display(), e)))?;
    let config: ConfigFile = toml::from_str(&raw)
        .map_err(|e| InvalidInput(format!("invalid config {}: {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Flags win over the config file.
pub fn pass_policy(
    config: &ConfigFile,
    passes: Option<u32>,
    until_stable: bool,
) -> anyhow::Result<PassPolicy> {
    if until_stable || (passes.is_none() && config.engine.until_stable) {
        return Ok(PassPolicy::UntilStable);
    }
    match passes.unwrap_or(config.engine.passes) {
        0 => Err(InvalidInput("passes must be at least 1".to_string()).into()),
        n => Ok(PassPolicy::Fixed(n)),
    }
}

pub fn catalog_path(config: &ConfigFile, flag: Option<&Path>) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| config.catalog.path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_FILE))
}

pub fn confusion_path(config: &ConfigFile, flag: Option<&Path>) -> Option<PathBuf> {
    flag.map(Path::to_path_buf)
        .or_else(|| config.catalog.confusion.clone())
}
