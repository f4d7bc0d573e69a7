use super::run::CommandRunner;
use super::types::{CommandInvocation, CommandResult, OutputObserver};
use crate::error::Result;

/// Default container CLI.
pub const DEFAULT_PROGRAM: &str = "docker";

/// A container CLI bound to a [`CommandRunner`].
///
/// Every lifecycle and pull operation is a method on `Engine`, so tests swap
/// the runner and production uses [`ProcessRunner`](super::ProcessRunner).
pub struct Engine<R> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> Engine<R> {
    pub fn new(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Build an invocation of the configured CLI.
    pub fn invocation<I, S>(&self, args: I) -> CommandInvocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandInvocation::new(self.program.clone(), args)
    }

    /// Run the CLI with `args` and no output observer.
    pub async fn exec(&self, args: Vec<String>) -> Result<CommandResult> {
        let invocation = self.invocation(args);
        self.runner.run(&invocation, None).await
    }

    /// Run the CLI with `args`, streaming every output chunk to `on_output`.
    pub async fn exec_streamed(
        &self,
        args: Vec<String>,
        on_output: OutputObserver<'_>,
    ) -> Result<CommandResult> {
        let invocation = self.invocation(args);
        self.runner.run(&invocation, Some(on_output)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docker::fake::FakeRunner;
    use crate::docker::{OutputKind, OutputRecord};

    #[tokio::test]
    async fn exec_uses_configured_program() {
        let engine = Engine::new(FakeRunner::new(), "podman");
        engine.exec(vec!["ps".into()]).await.unwrap();

        let calls = engine.runner().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "podman");
        assert_eq!(calls[0].args, vec!["ps"]);
    }

    #[tokio::test]
    async fn exec_streamed_forwards_chunks() {
        let runner = FakeRunner::new().respond(
            "docker logs x",
            0,
            vec![OutputRecord::stdout("a"), OutputRecord::stderr("b")],
        );
        let engine = Engine::new(runner, DEFAULT_PROGRAM);

        let mut seen = Vec::new();
        let result = engine
            .exec_streamed(vec!["logs".into(), "x".into()], &mut |r: &OutputRecord| {
                seen.push(r.text.clone())
            })
            .await
            .unwrap();

        assert_eq!(seen, vec!["a", "b"]);
        assert_eq!(result.records.len(), 3);
    }

    #[tokio::test]
    async fn command_record_is_the_quoted_command_line() {
        let runner = FakeRunner::new().respond(
            "docker ps --filter 'name=wapcon-'",
            0,
            vec![OutputRecord::stdout("wapcon-db\n")],
        );
        let engine = Engine::new(runner, DEFAULT_PROGRAM);
        let args = ["ps", "--filter", "name=wapcon-"];

        let result = engine
            .exec(args.iter().map(|a| a.to_string()).collect())
            .await
            .unwrap();

        assert_eq!(result.records[0].kind, OutputKind::Command);
        assert_eq!(result.records[0].text, engine.invocation(args).command_line());
        assert_eq!(result.stdout(), "wapcon-db\n");
    }
}
