use serde::Serialize;

/// One request to execute an external command with fixed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandInvocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Shell-quoted rendering of the invocation, e.g. `docker pull wordpress:latest`.
    pub fn command_line(&self) -> String {
        shell_words::join(std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str)))
    }
}

/// Origin of an output record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Synthetic first record carrying the invocation text.
    Command,
    Stdout,
    Stderr,
}

/// A raw chunk of output, in arrival order. Chunk boundaries are a transport
/// artifact and do not align with lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    pub kind: OutputKind,
    pub text: String,
}

impl OutputRecord {
    pub fn stdout(text: impl Into<String>) -> Self {
        Self {
            kind: OutputKind::Stdout,
            text: text.into(),
        }
    }

    pub fn stderr(text: impl Into<String>) -> Self {
        Self {
            kind: OutputKind::Stderr,
            text: text.into(),
        }
    }
}

/// Outcome of one invocation that ran to process exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Starts with the [`OutputKind::Command`] record, followed by output in arrival order.
    pub records: Vec<OutputRecord>,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// All stdout chunks concatenated.
    pub fn stdout(&self) -> String {
        self.records
            .iter()
            .filter(|r| r.kind == OutputKind::Stdout)
            .map(|r| r.text.as_str())
            .collect()
    }

    /// Non-empty stdout lines, reassembled across chunk boundaries.
    pub fn stdout_lines(&self) -> Vec<String> {
        self.stdout()
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Caller-supplied observer for streamed output.
pub type OutputObserver<'a> = &'a mut (dyn FnMut(&OutputRecord) + Send);
