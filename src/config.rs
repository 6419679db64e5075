use crate::error::{RandviewError, Result};
use crate::selection::{SelectionParams, SelectionPolicy};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const RANDVIEW_DIR: &str = ".randview";
const GLOBAL_CONFIG_FILE: &str = ".randview/config.toml";
const LOCAL_CONFIG_FILE: &str = ".randview/config.local.toml";
const DATA_DIR: &str = "data";

/// Central configuration for randview
#[derive(Debug, Clone, PartialEq)]
pub struct RandviewConfig {
    pub selection: SelectionParams,
    pub data_dir: PathBuf,
}

impl Default for RandviewConfig {
    fn default() -> Self {
        Self {
            selection: SelectionParams::default(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(RANDVIEW_DIR).join(DATA_DIR),
        None => PathBuf::from(RANDVIEW_DIR).join(DATA_DIR),
    }
}

/// On-disk shape; every field is optional so files can be layered
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    selection: SelectionSection,
    #[serde(default)]
    storage: StorageSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SelectionSection {
    policy: Option<SelectionPolicy>,
    history_size: Option<usize>,
    frequency_cap: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StorageSection {
    data_dir: Option<PathBuf>,
}

/// Command-line values that take precedence over the files
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub policy: Option<SelectionPolicy>,
    pub history_size: Option<usize>,
    pub frequency_cap: Option<usize>,
    pub data_dir: Option<PathBuf>,
}

impl RandviewConfig {
    /// Defaults, then `~/.randview/config.toml`, then
    /// `<workspace>/.randview/config.local.toml`, then `overrides`.
    pub fn load(workspace: &Path, overrides: &ConfigOverrides) -> Result<Self> {
        let home = std::env::var_os("HOME").map(PathBuf::from);
        Self::load_from(home.as_deref(), workspace, overrides)
    }

    fn load_from(
        home: Option<&Path>,
        workspace: &Path,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let mut config = Self::default();

        if let Some(home) = home {
            config.apply_file(&home.join(GLOBAL_CONFIG_FILE))?;
        }
        config.apply_file(&workspace.join(LOCAL_CONFIG_FILE))?;
        config.apply_overrides(overrides);
        config.validate()?;

        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    fn apply_file(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            RandviewError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let file: ConfigFile = toml::from_str(&content).map_err(|e| {
            RandviewError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        // Relative data dirs are taken relative to the file that names them
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        self.merge(file, base);
        Ok(())
    }

    fn merge(&mut self, file: ConfigFile, base: &Path) {
        if let Some(policy) = file.selection.policy {
            self.selection.policy = policy;
        }
        if let Some(size) = file.selection.history_size {
            self.selection.history_size = size;
        }
        if file.selection.frequency_cap.is_some() {
            self.selection.frequency_cap = file.selection.frequency_cap;
        }
        if let Some(dir) = file.storage.data_dir {
            self.data_dir = if dir.is_absolute() { dir } else { base.join(dir) };
        }
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(policy) = overrides.policy {
            self.selection.policy = policy;
        }
        if let Some(size) = overrides.history_size {
            self.selection.history_size = size;
        }
        if overrides.frequency_cap.is_some() {
            self.selection.frequency_cap = overrides.frequency_cap;
        }
        if let Some(ref dir) = overrides.data_dir {
            self.data_dir = dir.clone();
        }
    }

    fn validate(&self) -> Result<()> {
        if self.selection.history_size == 0 {
            return Err(RandviewError::Config(
                "history_size must be at least 1".to_string(),
            ));
        }
        if self.selection.frequency_cap == Some(0) {
            return Err(RandviewError::Config(
                "frequency_cap must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
