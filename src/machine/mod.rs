// Lifecycle controller for the two-container stack.

pub mod commands;
pub mod lifecycle;
pub mod status;
pub mod themes;

pub use commands::StartArgs;
pub use lifecycle::{StartResult, StopResult};
pub use status::{ImageAvailability, ImageStatus, MachineStatus};
pub use themes::{StartOptions, Theme, remove_old_theme_directories};

use serde::{Deserialize, Serialize};

use crate::pull::normalize_tag;

pub const WORDPRESS_IMAGE: &str = "wordpress";
pub const MYSQL_IMAGE: &str = "mysql";

/// Prefix shared by every container and theme mount this tool creates.
pub const NAME_PREFIX: &str = "wapcon-";
pub const DB_CONTAINER: &str = "wapcon-db";
pub const WP_CONTAINER: &str = "wapcon-wp";

/// Tags of the two images in the stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTags {
    pub wordpress: String,
    pub mysql: String,
}

impl Default for ImageTags {
    fn default() -> Self {
        Self {
            wordpress: crate::pull::DEFAULT_TAG.to_string(),
            mysql: crate::pull::DEFAULT_TAG.to_string(),
        }
    }
}

impl ImageTags {
    /// Copy with empty tags replaced by [`DEFAULT_TAG`](crate::pull::DEFAULT_TAG).
    pub fn resolved(&self) -> Self {
        Self {
            wordpress: normalize_tag(&self.wordpress).to_string(),
            mysql: normalize_tag(&self.mysql).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_fills_empty_tags() {
        let tags = ImageTags {
            wordpress: String::new(),
            mysql: "8.0".into(),
        };
        assert_eq!(
            tags.resolved(),
            ImageTags {
                wordpress: "latest".into(),
                mysql: "8.0".into(),
            }
        );
    }
}
