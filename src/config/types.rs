use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::docker::DEFAULT_PROGRAM;
use crate::machine::{ImageTags, StartOptions, Theme};
use crate::pull::DEFAULT_TAG;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Container CLI to invoke (`docker`, `podman`, or an absolute path).
    pub docker: String,
    pub env_file: PathBuf,
    pub wordpress_tag: String,
    pub mysql_tag: String,
    pub http_port: u16,
    pub database_path: Option<PathBuf>,
    pub wordpress_path: Option<PathBuf>,
    pub themes: Vec<Theme>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docker: DEFAULT_PROGRAM.to_string(),
            env_file: PathBuf::from("./machine-env"),
            wordpress_tag: DEFAULT_TAG.to_string(),
            mysql_tag: DEFAULT_TAG.to_string(),
            http_port: 80,
            database_path: None,
            wordpress_path: None,
            themes: Vec::new(),
        }
    }
}

impl Config {
    pub fn image_tags(&self) -> ImageTags {
        ImageTags {
            wordpress: self.wordpress_tag.clone(),
            mysql: self.mysql_tag.clone(),
        }
    }

    pub fn start_options(&self) -> StartOptions {
        StartOptions {
            tags: self.image_tags(),
            env_file: self.env_file.clone(),
            http_port: self.http_port,
            database_path: self.database_path.clone(),
            wordpress_path: self.wordpress_path.clone(),
            themes: self.themes.clone(),
        }
    }
}
