use serde::Serialize;

use super::commands::{list_containers_args, list_images_args};
use super::{DB_CONTAINER, ImageTags, MYSQL_IMAGE, WORDPRESS_IMAGE, WP_CONTAINER};
use crate::docker::{CommandRunner, Engine};
use crate::error::{Error, Result};
use crate::pull::normalize_tag;

/// Which stack containers are running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MachineStatus {
    pub db_ready: bool,
    pub wp_ready: bool,
    pub all_ready: bool,
}

impl MachineStatus {
    /// Derive readiness from container-name lines. Names must match exactly.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let db_ready = names.iter().any(|n| n.as_ref() == DB_CONTAINER);
        let wp_ready = names.iter().any(|n| n.as_ref() == WP_CONTAINER);
        Self {
            db_ready,
            wp_ready,
            all_ready: db_ready && wp_ready,
        }
    }
}

/// Whether one `repository:tag` is present locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageAvailability {
    pub repository: String,
    pub tag: String,
    pub available: bool,
}

/// Local availability of both stack images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageStatus {
    pub db: bool,
    pub wp: bool,
    pub ok: bool,
}

/// Exact, case-sensitive lookup of `repository:tag` in an image list.
fn is_listed(images: &[String], repository: &str, tag: &str) -> bool {
    let reference = format!("{repository}:{}", normalize_tag(tag));
    images.iter().any(|i| *i == reference)
}

impl<R: CommandRunner> Engine<R> {
    /// Check which stack containers are running.
    ///
    /// Fails with [`Error::BackendUnavailable`] if the listing exits non-zero.
    pub async fn check_status(&self) -> Result<MachineStatus> {
        let result = self.exec(list_containers_args()).await?;
        if !result.success() {
            return Err(Error::BackendUnavailable {
                code: result.exit_code,
            });
        }

        let status = MachineStatus::from_names(&result.stdout_lines());
        tracing::info!(
            db = status.db_ready,
            wp = status.wp_ready,
            "machine status"
        );
        Ok(status)
    }

    /// `repository:tag` of every local image.
    async fn local_images(&self) -> Result<Vec<String>> {
        let result = self.exec(list_images_args()).await?;
        Ok(result.stdout_lines())
    }

    /// Whether `repository:tag` exists locally. An empty tag means `latest`.
    pub async fn check_image_availability(
        &self,
        repository: &str,
        tag: &str,
    ) -> Result<ImageAvailability> {
        let images = self.local_images().await?;
        let tag = normalize_tag(tag);
        Ok(ImageAvailability {
            repository: repository.to_string(),
            tag: tag.to_string(),
            available: is_listed(&images, repository, tag),
        })
    }

    /// Check both stack images with a single listing.
    pub async fn check_image_status(&self, tags: &ImageTags) -> Result<ImageStatus> {
        let images = self.local_images().await?;
        let wp = is_listed(&images, WORDPRESS_IMAGE, &tags.wordpress);
        let db = is_listed(&images, MYSQL_IMAGE, &tags.mysql);
        tracing::info!(db, wp, "image status");
        Ok(ImageStatus { db, wp, ok: db && wp })
    }
}
