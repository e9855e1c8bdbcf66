use std::path::{Path, PathBuf};

use anyhow::Context;
use orc_reconcile::ReconcilerConfig;
use orc_types::ObjectDeclaration;
use serde::{Deserialize, Serialize};

/// Store root used when neither `--store` nor the config file names one.
pub const DEFAULT_STORE_ROOT: &str = "objects";

/// Contents of the `--config` file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub store_root: Option<PathBuf>,
    pub reconciler: ReconcilerConfig,
}

impl CliConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// `--store` wins over the config file, which wins over the default.
    pub fn store_root(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.store_root.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_ROOT))
    }
}

/// A list of declarations, written as `[[object]]` tables.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, rename = "object")]
    pub objects: Vec<ObjectDeclaration>,
}

impl Manifest {
    /// Load a manifest. Relative `source_file` paths are taken relative to
    /// the manifest's directory.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading manifest {}", path.display()))?;
        let mut manifest: Manifest = toml::from_str(&text)
            .with_context(|| format!("parsing manifest {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for decl in &mut manifest.objects {
            if let Some(source) = decl.source_file.as_mut() {
                if source.is_relative() && !source.as_os_str().is_empty() {
                    *source = base.join(&*source);
                }
            }
        }
        Ok(manifest)
    }
}
