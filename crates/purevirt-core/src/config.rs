//! Configuration file loading for purevirt.
//!
//! Reads `purevirt.json` from a directory and provides typed access to all settings.
//! Falls back to defaults when the config file is missing or incomplete.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::PureVirtualError;

/// Name of the configuration file inside a config directory.
pub const CONFIG_FILE: &str = "purevirt.json";

/// Top-level purevirt configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurevirtConfig {
    pub version: String,
    /// Options applied to declarations created without explicit options.
    #[serde(default)]
    pub defaults: DeclarationConfig,
    #[serde(default)]
    pub enforce: EnforceConfig,
}

/// Options captured by a marker at declaration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationConfig {
    /// Overrides must repeat default values exactly.
    #[serde(default = "default_true")]
    pub strict_defaults: bool,
    /// Overrides must repeat type annotations exactly.
    #[serde(default = "default_true")]
    pub strict_types: bool,
    /// Marked methods fail with `NotImplemented` whenever invoked.
    #[serde(default = "default_true")]
    pub force_not_implemented: bool,
}

/// Enforcement toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnforceConfig {
    #[serde(default = "default_true")]
    pub validate_on_define: bool,
    #[serde(default = "default_true")]
    pub gate_instances: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DeclarationConfig {
    fn default() -> Self {
        Self {
            strict_defaults: true,
            strict_types: true,
            force_not_implemented: true,
        }
    }
}

impl DeclarationConfig {
    pub fn strict_defaults(mut self, on: bool) -> Self {
        self.strict_defaults = on;
        self
    }

    pub fn strict_types(mut self, on: bool) -> Self {
        self.strict_types = on;
        self
    }

    pub fn force_not_implemented(mut self, on: bool) -> Self {
        self.force_not_implemented = on;
        self
    }
}

impl Default for EnforceConfig {
    fn default() -> Self {
        Self {
            validate_on_define: true,
            gate_instances: true,
        }
    }
}

impl Default for PurevirtConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            defaults: DeclarationConfig::default(),
            enforce: EnforceConfig::default(),
        }
    }
}

impl PurevirtConfig {
    /// Load configuration from `purevirt.json` inside the given directory.
    /// Returns defaults if the file doesn't exist or can't be parsed.
    pub fn load(dir: &Path) -> Self {
        match Self::try_load(dir) {
            Ok(Some(cfg)) => cfg,
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("purevirt: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Like [`load`](Self::load) but surfaces unreadable or malformed files.
    /// A missing file is `Ok(None)`.
    pub fn try_load(dir: &Path) -> Result<Option<Self>, PureVirtualError> {
        let config_path = dir.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&config_path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PureVirtualError::Config(format!(
                    "failed to read {}: {}",
                    config_path.display(),
                    e
                )))
            }
        };
        serde_json::from_str(&content).map(Some).map_err(|e| {
            PureVirtualError::Config(format!("failed to parse {}: {}", config_path.display(), e))
        })
    }
}
