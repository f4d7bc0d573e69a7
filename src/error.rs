use thiserror::Error;

/// Errors surfaced by the command runner, the pull tracker and the lifecycle controller.
///
/// A non-zero exit code from the external CLI is data, not an error: it is
/// reported through [`CommandResult::exit_code`](crate::docker::CommandResult)
/// and only promoted to [`Error::BackendUnavailable`] by the status check.
#[derive(Debug, Error)]
pub enum Error {
    /// The external process could not be started at all.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A required identifier was empty. Raised before any process is spawned.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The container listing exited non-zero.
    #[error("container backend is unavailable (exit code {}); is the docker daemon running?", fmt_code(.code))]
    BackendUnavailable { code: Option<i32> },

    /// `start` was requested before the required images were present locally.
    #[error("machines are not ready: {0}")]
    NotReady(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn fmt_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "none".to_string(),
    }
}
