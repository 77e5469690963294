use crate::session::Session;
use anyhow::Result;
use std::io::Write;

/// Continuation signal returned by every command.
///
/// Only `exit` ever produces [`Flow::Terminate`]; every other command, including
/// failed ones, lets the loop carry on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Terminate,
}

/// Output and error streams a command writes to.
///
/// The interactive loop wires these to the process stdout and stderr; tests use
/// in-memory buffers.
pub struct Streams<'a> {
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
}

impl<'a> Streams<'a> {
    pub fn new(stdout: &'a mut dyn Write, stderr: &'a mut dyn Write) -> Self {
        Self { stdout, stderr }
    }
}

/// Read-only state visible to a running command.
pub struct Context<'a> {
    /// The session the shell was started with.
    pub session: &'a Session,
    /// Names of every registered built-in, in registry order.
    pub builtins: &'a [&'static str],
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// Implemented by built-ins via a blanket impl in the `builtin` module.
pub trait ExecutableCommand {
    /// Executes the command.
    ///
    /// An `Err` here means the streams themselves failed; ordinary command
    /// failures are reported on `streams.stderr` and still return a [`Flow`].
    fn execute(self: Box<Self>, streams: &mut Streams<'_>, ctx: &Context<'_>) -> Result<Flow>;
}

/// One entry of the built-in registry.
///
/// A factory knows the exact name it answers to and turns a token sequence into
/// an executable command.
pub trait CommandFactory {
    /// Name matched against the first token, case-sensitively.
    fn name(&self) -> &'static str;

    /// Attempt to create a command instance for the provided tokens.
    ///
    /// Returns `None` when `tokens[0]` is not this factory's name.
    fn try_create(&self, tokens: &[&str]) -> Option<Box<dyn ExecutableCommand>>;
}
