use super::commands::{remove_images_args, start_db_args, start_wp_args, stop_args};
use super::themes::{StartOptions, remove_old_theme_directories};
use super::{DB_CONTAINER, ImageTags, MYSQL_IMAGE, WORDPRESS_IMAGE, WP_CONTAINER};
use crate::docker::{CommandResult, CommandRunner, Engine};
use crate::error::{Error, Result};

/// Results of the two `run` commands, database first.
#[derive(Debug)]
pub struct StartResult {
    pub db: CommandResult,
    pub wp: CommandResult,
}

/// Outcome of each `stop`, kept separate so one failure does not hide the other.
#[derive(Debug)]
pub struct StopResult {
    pub db: Result<CommandResult>,
    pub wp: Result<CommandResult>,
}

impl StopResult {
    /// Both commands ran and exited zero.
    pub fn success(&self) -> bool {
        matches!((&self.db, &self.wp), (Ok(db), Ok(wp)) if db.success() && wp.success())
    }
}

impl<R: CommandRunner> Engine<R> {
    /// Start the database container, then the WordPress container.
    ///
    /// Fails with [`Error::NotReady`] before running anything if either image
    /// is missing locally.
    pub async fn start(&self, options: &StartOptions) -> Result<StartResult> {
        let tags = options.tags.resolved();
        let images = self.check_image_status(&tags).await?;
        if !images.ok {
            let mut missing = Vec::new();
            if !images.wp {
                missing.push(format!("{WORDPRESS_IMAGE}:{}", tags.wordpress));
            }
            if !images.db {
                missing.push(format!("{MYSQL_IMAGE}:{}", tags.mysql));
            }
            return Err(Error::NotReady(format!(
                "missing images {}; pull them first",
                missing.join(", ")
            )));
        }

        let args = options.resolve()?;
        if let Some(path) = &args.wordpress_path {
            remove_old_theme_directories(path)?;
        }

        let db = self.exec(start_db_args(&args)).await?;
        if !db.success() {
            tracing::warn!("{DB_CONTAINER} exited with {:?}", db.exit_code);
        }
        let wp = self.exec(start_wp_args(&args)).await?;
        if !wp.success() {
            tracing::warn!("{WP_CONTAINER} exited with {:?}", wp.exit_code);
        }

        Ok(StartResult { db, wp })
    }

    /// Stop both containers concurrently.
    pub async fn stop(&self) -> StopResult {
        let (db, wp) = tokio::join!(
            self.exec(stop_args(DB_CONTAINER)),
            self.exec(stop_args(WP_CONTAINER)),
        );
        StopResult { db, wp }
    }

    /// Delete both stack images.
    pub async fn remove_images(&self, tags: &ImageTags) -> Result<CommandResult> {
        self.exec(remove_images_args(&tags.resolved())).await
    }
}
