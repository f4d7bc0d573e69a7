use std::path::Path;

use anyhow::Context;

use super::types::Config;

/// File name looked up in the config directory.
pub const CONFIG_FILE: &str = ".wapcon.yaml";

impl Config {
    /// Load config from a `.wapcon.yaml` file in the given directory.
    pub fn load(dir: &Path) -> anyhow::Result<Option<Self>> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("invalid config in {}", path.display()))?;
        Ok(Some(config))
    }

    /// Like [`Config::load`], falling back to defaults when no file exists.
    pub fn load_or_default(dir: &Path) -> anyhow::Result<Self> {
        Ok(Self::load(dir)?.unwrap_or_default())
    }
}
