use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use pomscope_util::errors::PomscopeError;
use pomscope_util::fs::{expand_tilde, home_dir};

/// Project configuration loaded from `pomscope.toml` in the snapshot root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub repository: RepositoryConfig,
}

/// Snapshot scan settings from `[scan]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Glob patterns, relative to the snapshot root, that the scan skips.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
    #[serde(default, rename = "follow-symlinks")]
    pub follow_symlinks: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude: default_exclude(),
            follow_symlinks: false,
        }
    }
}

fn default_exclude() -> Vec<String> {
    vec!["**/target".to_string(), "**/.git".to_string()]
}

/// Extra local repositories from `[repository]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default)]
    pub paths: Vec<String>,
}

impl SnapshotConfig {
    pub const FILE_NAME: &'static str = "pomscope.toml";

    /// Load `pomscope.toml` from `root`, or return defaults if the file doesn't exist.
    pub fn load(root: &Path) -> miette::Result<Self> {
        let path = root.join(Self::FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| PomscopeError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            PomscopeError::Config {
                message: format!("Failed to parse {}: {e}", Self::FILE_NAME),
            }
            .into()
        })
    }

    /// Configured repository roots, resolved against `root` when relative.
    pub fn repository_paths(&self, root: &Path) -> Vec<PathBuf> {
        self.repository
            .paths
            .iter()
            .map(|p| {
                let path = expand_tilde(p);
                if path.is_absolute() {
                    path
                } else {
                    root.join(path)
                }
            })
            .collect()
    }
}

impl ScanConfig {
    /// Compile the exclude patterns.
    pub fn exclude_set(&self) -> miette::Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            let glob = Glob::new(pattern).map_err(|e| PomscopeError::Config {
                message: format!("Invalid exclude pattern '{pattern}': {e}"),
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|e| {
            PomscopeError::Config {
                message: format!("Invalid exclude patterns: {e}"),
            }
            .into()
        })
    }
}

/// Global user configuration loaded from `~/.pomscope/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default, rename = "local-repository")]
    pub local_repository: Option<String>,
}

impl GlobalConfig {
    /// Load the global configuration, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &Path) -> miette::Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| PomscopeError::Config {
            message: format!("Failed to read global config: {e}"),
        })?;
        toml::from_str(&content).map_err(|e| {
            PomscopeError::Config {
                message: format!("Failed to parse global config: {e}"),
            }
            .into()
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// The user's local Maven repository: the configured path, else
    /// `~/.m2/repository` when it exists.
    pub fn local_repository_path(&self) -> Option<PathBuf> {
        if let Some(ref configured) = self.local_repository {
            return Some(expand_tilde(configured));
        }
        let default = home_dir()?.join(".m2").join("repository");
        default.is_dir().then_some(default)
    }
}

/// Returns the path to the pomscope data directory (`~/.pomscope/`).
pub fn dirs_path() -> PathBuf {
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pomscope")
}
