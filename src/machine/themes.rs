use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::commands::{StartArgs, theme_mount_point};
use super::{ImageTags, NAME_PREFIX};

/// A local theme directory mounted into the WordPress container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub id: String,
    pub path: PathBuf,
}

/// Caller-facing start options; relative paths are resolved against the
/// current directory by [`StartOptions::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOptions {
    pub tags: ImageTags,
    pub env_file: PathBuf,
    pub http_port: u16,
    pub database_path: Option<PathBuf>,
    pub wordpress_path: Option<PathBuf>,
    pub themes: Vec<Theme>,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self {
            tags: ImageTags::default(),
            env_file: PathBuf::from("./machine-env"),
            http_port: 80,
            database_path: None,
            wordpress_path: None,
            themes: Vec::new(),
        }
    }
}

impl StartOptions {
    /// Make host paths absolute and expand themes into `-v` pairs.
    pub fn resolve(&self) -> std::io::Result<StartArgs> {
        let database_path = self.database_path.as_deref().map(std::path::absolute).transpose()?;
        let wordpress_path = self.wordpress_path.as_deref().map(std::path::absolute).transpose()?;

        let mut theme_volumes = Vec::with_capacity(self.themes.len() * 2);
        for theme in &self.themes {
            let host = std::path::absolute(&theme.path)?;
            theme_volumes.push("-v".to_string());
            theme_volumes.push(format!("{}:{}", host.display(), theme_mount_point(&theme.id)));
        }

        Ok(StartArgs {
            tags: self.tags.resolved(),
            env_file: self.env_file.clone(),
            http_port: self.http_port,
            database_path,
            wordpress_path,
            theme_volumes,
        })
    }
}

/// Remove leftover `wapcon-*` theme mount points under `<wordpress_path>/wp-content/themes`.
///
/// The container creates these as empty directories on the host side of the
/// `/var/www/html` volume, so only empty directories are removed. A missing
/// themes directory is not an error. Returns the removed paths.
pub fn remove_old_theme_directories(wordpress_path: &Path) -> std::io::Result<Vec<PathBuf>> {
    let theme_dir = wordpress_path.join("wp-content").join("themes");
    let entries = match std::fs::read_dir(&theme_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut removed = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_name().to_string_lossy().starts_with(NAME_PREFIX) {
            continue;
        }
        let path = entry.path();
        std::fs::remove_dir(&path)?;
        tracing::debug!("removed stale theme directory {}", path.display());
        removed.push(path);
    }
    removed.sort();
    Ok(removed)
}
