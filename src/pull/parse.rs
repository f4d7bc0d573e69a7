use std::sync::LazyLock;

use regex::Regex;

static BANNER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.+: Pulling from .+$").expect("banner pattern"));
static DOWNLOADED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Status: Downloaded newer image for .+:.+").expect("downloaded pattern")
});
static UP_TO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Status: Image is up to date for .+:.+").expect("up-to-date pattern")
});
static LAYER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.{12}): (.*)$").expect("layer pattern"));

/// Message that marks a layer as finished.
pub const PULL_COMPLETE: &str = "Pull complete";

/// Classification of one line of `pull` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `latest: Pulling from library/wordpress`
    Banner,
    /// `Status: Downloaded newer image for …` or `Status: Image is up to date for …`
    Finished,
    /// `<12-char id>: <message>`
    Layer { id: &'a str, message: &'a str },
    Unrecognized,
}

/// Classify a single line. Precedence: banner, terminal status, layer progress.
///
/// Expects the progress layout the CLI prints when stdout is not a terminal:
/// ```text
/// latest: Pulling from library/wordpress
/// a2abf6c4d29d: Pulling fs layer
/// a2abf6c4d29d: Pull complete
/// Digest: sha256:832e18fa…
/// Status: Downloaded newer image for wordpress:latest
/// ```
pub fn classify_line(line: &str) -> LineKind<'_> {
    if BANNER.is_match(line) {
        return LineKind::Banner;
    }

    if DOWNLOADED.is_match(line) || UP_TO_DATE.is_match(line) {
        return LineKind::Finished;
    }

    match LAYER.captures(line) {
        Some(caps) => match (caps.get(1), caps.get(2)) {
            (Some(id), Some(message)) => LineKind::Layer {
                id: id.as_str(),
                message: message.as_str(),
            },
            _ => LineKind::Unrecognized,
        },
        None => LineKind::Unrecognized,
    }
}

/// Splits a chunked text stream into complete lines.
///
/// A line whose bytes straddle two chunks is held back until its newline
/// arrives, so each line is classified exactly once.
#[derive(Debug, Default)]
pub struct LineBuffer {
    partial: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `chunk` and return every line it completed, without terminators.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.partial.push_str(chunk);

        let Some(last_newline) = self.partial.rfind('\n') else {
            return Vec::new();
        };

        let rest = self.partial.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.partial, rest);
        complete
            .lines()
            .map(|l| l.trim_end_matches('\r').to_string())
            .collect()
    }

    /// Take the unterminated remainder once the stream has ended.
    pub fn finish(&mut self) -> Option<String> {
        if self.partial.is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.partial);
        Some(line.trim_end_matches('\r').to_string())
    }
}
