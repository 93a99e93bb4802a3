use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `~/.vyrn/config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub toolchain: ToolchainConfig,
    pub emit: EmitConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// C++ compiler used by `vyrn run`.
    pub compiler: String,
    pub flags: Vec<String>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            compiler: "g++".to_string(),
            flags: vec!["-std=c++17".to_string(), "-O0".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    pub fold_booleans: bool,
    /// Wrap emitted statements in `#include`s and `int main()`.
    pub wrap_program: bool,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self { fold_booleans: true, wrap_program: true }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    // ~\Users\you\.vyrn\config.toml on Windows; ~/.vyrn/config.toml elsewhere
    dirs_next::home_dir().map(|h| h.join(".vyrn").join("config.toml"))
}

pub fn resolve_config_path(cli_path: &Option<PathBuf>) -> Option<PathBuf> {
    if let Some(p) = cli_path {
        return Some(p.clone());
    }
    default_config_path()
}

/// Load the config named on the command line (must exist) or the default
/// one (silently skipped when absent).
pub fn load_config(cli_path: &Option<PathBuf>) -> Result<Config> {
    match (cli_path, resolve_config_path(cli_path)) {
        (Some(_), Some(path)) => read_config(&path),
        (None, Some(path)) if path.exists() => read_config(&path),
        _ => {
            log::debug!("no config file, using defaults");
            Ok(Config::default())
        }
    }
}

pub fn read_config(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Read config {}", path.display()))?;
    let config: Config = toml::from_str(&text)
        .with_context(|| format!("Parse config {}", path.display()))?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Create parent dir {}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[toolchain]\ncompiler = \"clang++\"\n").unwrap();
        let cfg = read_config(&path).unwrap();
        assert_eq!(cfg.toolchain.compiler, "clang++");
        assert_eq!(cfg.toolchain.flags, vec!["-std=c++17", "-O0"]);
        assert!(cfg.emit.fold_booleans);
        assert!(cfg.emit.wrap_program);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let missing = Some(PathBuf::from("/definitely/not/here/vyrn.toml"));
        let err = load_config(&missing).unwrap_err();
        assert!(err.to_string().contains("Read config"), "{err:#}");
    }

    #[test]
    fn bad_toml_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[emit]\nfold_booleans = \"yes\"\n").unwrap();
        let err = read_config(&path).unwrap_err();
        assert!(err.to_string().starts_with("Parse config"), "{err:#}");
    }

    #[test]
    fn ensure_parent_dir_creates_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a").join("b").join("out.cpp");
        ensure_parent_dir(&target).unwrap();
        assert!(dir.path().join("a").join("b").is_dir());
    }
}
