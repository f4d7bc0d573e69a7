use super::parse::LineBuffer;
use super::{PullStatus, StackPullStatus};
use crate::docker::{CommandRunner, Engine, OutputKind, OutputRecord};
use crate::error::{Error, Result};
use crate::machine::{ImageTags, MYSQL_IMAGE, WORDPRESS_IMAGE};

/// Tag used when the caller leaves it empty.
pub const DEFAULT_TAG: &str = "latest";

/// Called once per processed line with the current status, including lines
/// that changed nothing.
pub type PullObserver<'a> = &'a mut (dyn FnMut(&PullStatus) + Send);

/// Called on every line of either pull with the aggregate status.
pub type StackPullObserver<'a> = &'a mut (dyn FnMut(&StackPullStatus) + Send);

/// Arguments for `<cli> pull image:tag`.
pub fn pull_args(image: &str, tag: &str) -> Vec<String> {
    vec!["pull".into(), format!("{image}:{tag}")]
}

/// `tag`, or [`DEFAULT_TAG`] when it is empty.
pub fn normalize_tag(tag: &str) -> &str {
    if tag.is_empty() { DEFAULT_TAG } else { tag }
}

fn feed(status: &mut PullStatus, line: &str, on_progress: &mut Option<PullObserver<'_>>) {
    status.apply_line(line);
    if let Some(observer) = on_progress.as_deref_mut() {
        observer(status);
    }
}

impl<R: CommandRunner> Engine<R> {
    /// Pull `image:tag`, reporting layer progress as output arrives.
    ///
    /// Resolves when the pull command exits, whatever its exit code and
    /// whether or not a terminal status line was seen. An empty `tag` means
    /// [`DEFAULT_TAG`].
    pub async fn pull_image(
        &self,
        image: &str,
        tag: &str,
        mut on_progress: Option<PullObserver<'_>>,
    ) -> Result<PullStatus> {
        if image.is_empty() {
            return Err(Error::InvalidArgument("image name is required".into()));
        }
        let tag = normalize_tag(tag);

        let mut status = PullStatus::new(image, tag);
        // stdout and stderr are independent streams; each keeps its own partial line.
        let mut stdout_lines = LineBuffer::new();
        let mut stderr_lines = LineBuffer::new();

        let result = {
            let mut on_output = |record: &OutputRecord| {
                let buffer = match record.kind {
                    OutputKind::Stdout => &mut stdout_lines,
                    OutputKind::Stderr => &mut stderr_lines,
                    OutputKind::Command => return,
                };
                for line in buffer.push(&record.text) {
                    feed(&mut status, &line, &mut on_progress);
                }
            };
            self.exec_streamed(pull_args(image, tag), &mut on_output)
                .await?
        };

        for line in [stdout_lines.finish(), stderr_lines.finish()]
            .into_iter()
            .flatten()
        {
            feed(&mut status, &line, &mut on_progress);
        }

        status.exit_code = result.exit_code;
        if !status.complete {
            tracing::warn!(
                "pull of {} exited with {:?} without a completion status",
                status.reference(),
                status.exit_code
            );
        }
        tracing::debug!("pull finished: {status}");
        Ok(status)
    }

    /// Pull the WordPress image, then the MySQL image.
    ///
    /// The observer sees the aggregate status on every line of either pull.
    /// The first failing pull stops the sequence.
    pub async fn pull_images(
        &self,
        tags: &ImageTags,
        mut on_progress: Option<StackPullObserver<'_>>,
    ) -> Result<StackPullStatus> {
        let tags = tags.resolved();
        let mut all = StackPullStatus {
            wordpress: PullStatus::new(WORDPRESS_IMAGE, &tags.wordpress),
            mysql: PullStatus::new(MYSQL_IMAGE, &tags.mysql),
        };

        let wordpress = {
            let mut observer = |status: &PullStatus| {
                all.wordpress = status.clone();
                if let Some(cb) = on_progress.as_deref_mut() {
                    cb(&all);
                }
            };
            self.pull_image(WORDPRESS_IMAGE, &tags.wordpress, Some(&mut observer))
                .await?
        };
        all.wordpress = wordpress;

        let mysql = {
            let mut observer = |status: &PullStatus| {
                all.mysql = status.clone();
                if let Some(cb) = on_progress.as_deref_mut() {
                    cb(&all);
                }
            };
            self.pull_image(MYSQL_IMAGE, &tags.mysql, Some(&mut observer))
                .await?
        };
        all.mysql = mysql;

        Ok(all)
    }
}
