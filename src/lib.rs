//! A small interactive shell.
//!
//! Each input line is split on whitespace. The first token is looked up in a
//! fixed, ordered registry of built-in commands (directory navigation, simple
//! file utilities, informational prints); anything else is launched as an
//! external program and waited for. The loop runs until `exit` or end of input.
//!
//! The main entry point is [`Interpreter`]. The public modules [`command`] and
//! [`external`] expose the traits behind the built-in registry and the process
//! launcher, so either can be replaced.

mod builtin;
pub mod command;
pub mod external;
mod interpreter;
pub mod io_adapters;
pub mod lexer;
pub mod prompt;
pub mod session;

pub use command::{Flow, Streams};
pub use interpreter::{Interpreter, default_commands};
pub use session::Session;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Mutex, MutexGuard, OnceLock};

    /// Serialises tests that read or change the process working directory.
    pub(crate) fn lock_current_dir() -> MutexGuard<'static, ()> {
        static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
        MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
