//! Image pull progress: reduces `pull` output to per-layer state.

mod parse;
mod tracker;

pub use parse::{LineBuffer, LineKind, PULL_COMPLETE, classify_line};
pub use tracker::{DEFAULT_TAG, PullObserver, StackPullObserver, normalize_tag, pull_args};

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Progress of one image layer. Never goes back from `Complete` to `Working`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerState {
    Working,
    Complete,
}

/// Live and final state of one `pull` invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullStatus {
    pub image: String,
    pub tag: String,
    /// Layers in first-seen order.
    pub progress: IndexMap<String, LayerState>,
    /// Set once a terminal success line was seen.
    pub complete: bool,
    /// Exit code of the pull command, filled in when the process exits.
    pub exit_code: Option<i32>,
}

impl PullStatus {
    pub fn new(image: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            tag: tag.into(),
            progress: IndexMap::new(),
            complete: false,
            exit_code: None,
        }
    }

    /// `image:tag` reference.
    pub fn reference(&self) -> String {
        format!("{}:{}", self.image, self.tag)
    }

    pub fn layer(&self, id: &str) -> Option<LayerState> {
        self.progress.get(id).copied()
    }

    pub fn total_layers(&self) -> usize {
        self.progress.len()
    }

    pub fn completed_layers(&self) -> usize {
        self.progress
            .values()
            .filter(|s| **s == LayerState::Complete)
            .count()
    }

    /// Fold one output line into the state.
    pub fn apply_line(&mut self, line: &str) {
        match classify_line(line) {
            LineKind::Banner | LineKind::Unrecognized => {}
            LineKind::Finished => self.complete = true,
            LineKind::Layer { id, message } => {
                let next = if message == PULL_COMPLETE {
                    LayerState::Complete
                } else {
                    LayerState::Working
                };
                let state = self.progress.entry(id.to_string()).or_insert(next);
                if next == LayerState::Complete {
                    *state = LayerState::Complete;
                }
            }
        }
    }
}

impl fmt::Display for PullStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}/{}",
            self.reference(),
            self.completed_layers(),
            self.total_layers()
        )?;
        if self.complete {
            f.write_str(" (done)")?;
        }
        Ok(())
    }
}

/// Aggregate status while pulling both images of the stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackPullStatus {
    pub wordpress: PullStatus,
    pub mysql: PullStatus,
}

impl StackPullStatus {
    pub fn complete(&self) -> bool {
        self.wordpress.complete && self.mysql.complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_all(status: &mut PullStatus, text: &str) {
        for line in text.lines() {
            status.apply_line(line);
        }
    }

    const WORKING: &str = "\
latest: Pulling from library/wordpress
A00b522d92ff: Pulling fs layer
B0051f247827: Pulling fs layer
C00186f8edb2: Pulling fs layer
A00b522d92ff: Pull complete
B0051f247827: Download complete
";

    const COMPLETE: &str = "\
B0051f247827: Pull complete
C00186f8edb2: Pull complete
Digest: sha256:832e18fa1b902880e3272e57e1d54caa383d3f5d8d72c194ba7f251a5ab12005
Status: Downloaded newer image for wordpress:latest
";

    #[test]
    fn working_stream_tracks_three_layers() {
        let mut status = PullStatus::new("wordpress", "latest");
        apply_all(&mut status, WORKING);

        assert_eq!(status.total_layers(), 3);
        assert_eq!(status.layer("A00b522d92ff"), Some(LayerState::Complete));
        assert_eq!(status.layer("B0051f247827"), Some(LayerState::Working));
        assert_eq!(status.layer("C00186f8edb2"), Some(LayerState::Working));
        assert!(!status.complete);
        assert_eq!(status.completed_layers(), 1);
    }

    #[test]
    fn complete_stream_marks_everything_done() {
        let mut status = PullStatus::new("wordpress", "latest");
        apply_all(&mut status, WORKING);
        apply_all(&mut status, COMPLETE);

        assert_eq!(status.total_layers(), 3);
        assert!(status.progress.values().all(|s| *s == LayerState::Complete));
        assert!(status.complete);
    }

    #[test]
    fn layers_keep_first_seen_order() {
        let mut status = PullStatus::new("wordpress", "latest");
        apply_all(&mut status, WORKING);
        let ids: Vec<&str> = status.progress.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["A00b522d92ff", "B0051f247827", "C00186f8edb2"]);
    }

    #[test]
    fn complete_layer_never_reverts() {
        let mut status = PullStatus::new("mysql", "latest");
        status.apply_line("A00b522d92ff: Pull complete");
        status.apply_line("A00b522d92ff: Verifying Checksum");
        assert_eq!(status.layer("A00b522d92ff"), Some(LayerState::Complete));
    }

    #[test]
    fn layer_first_seen_complete_is_inserted() {
        let mut status = PullStatus::new("mysql", "latest");
        status.apply_line("D00b522d92ff: Pull complete");
        assert_eq!(status.total_layers(), 1);
        assert_eq!(status.layer("D00b522d92ff"), Some(LayerState::Complete));
    }

    #[test]
    fn up_to_date_is_complete_without_layers() {
        let mut status = PullStatus::new("mysql", "latest");
        apply_all(
            &mut status,
            "latest: Pulling from library/mysql\nDigest: sha256:abc\nStatus: Image is up to date for mysql:latest\n",
        );
        assert!(status.complete);
        assert_eq!(status.total_layers(), 0);
    }

    #[test]
    fn display_shows_counts() {
        let mut status = PullStatus::new("wordpress", "latest");
        apply_all(&mut status, WORKING);
        assert_eq!(status.to_string(), "wordpress:latest: 1/3");
        apply_all(&mut status, COMPLETE);
        assert_eq!(status.to_string(), "wordpress:latest: 3/3 (done)");
    }
}
