// Command runner: spawns the container CLI and streams its output in arrival order.

pub mod engine;
#[cfg(test)]
pub mod fake;
pub mod run;
pub mod types;

pub use engine::{DEFAULT_PROGRAM, Engine};
pub use run::{CommandRunner, ProcessRunner};
pub use types::{CommandInvocation, CommandResult, OutputKind, OutputObserver, OutputRecord};
