use log::debug;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;

/// How a waited-for child process finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildStatus {
    /// The child exited normally with this code.
    Exited(i32),
    /// The child was killed by this signal.
    Signaled(i32),
}

/// Reasons an external command could not be run to completion.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("{0}: command not found")]
    NotFound(String),
    #[error("couldn't run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("lost track of {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Runs programs that are not built into the shell.
pub trait Launcher {
    /// Run `argv[0]` with `argv` as its argument vector and block until it finishes.
    ///
    /// `argv` is never empty.
    fn launch(&self, argv: &[&str]) -> Result<ChildStatus, LaunchError>;
}

/// Launcher that spawns real OS processes.
///
/// The child inherits stdin, stdout, stderr, the environment and the current
/// working directory of the shell.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&self, argv: &[&str]) -> Result<ChildStatus, LaunchError> {
        let Some((&name, args)) = argv.split_first() else {
            return Err(LaunchError::NotFound(String::new()));
        };

        let search_paths = std::env::var_os("PATH").unwrap_or_default();
        let program = find_command_path(&search_paths, Path::new(name))
            .ok_or_else(|| LaunchError::NotFound(name.to_string()))?;
        debug!("launching {} as {}", name, program.display());

        let mut cmd = Command::new(&*program);
        cmd.args(args);
        set_argv0(&mut cmd, name);

        let mut child = cmd.spawn().map_err(|source| LaunchError::Spawn {
            program: name.to_string(),
            source,
        })?;
        let exit_status = child.wait().map_err(|source| LaunchError::Wait {
            program: name.to_string(),
            source,
        })?;

        let status = child_status(exit_status);
        debug!("{} (pid {}) finished: {:?}", name, child.id(), status);
        Ok(status)
    }
}

#[cfg(unix)]
fn set_argv0(cmd: &mut Command, name: &str) {
    use std::os::unix::process::CommandExt;
    cmd.arg0(name);
}

#[cfg(not(unix))]
fn set_argv0(_cmd: &mut Command, _name: &str) {}

// `Child::wait` only returns once the child has exited or was killed; a stopped
// child keeps it blocked.
#[cfg(unix)]
fn child_status(exit_status: ExitStatus) -> ChildStatus {
    use std::os::unix::process::ExitStatusExt;
    match (exit_status.code(), exit_status.signal()) {
        (Some(code), _) => ChildStatus::Exited(code),
        (None, Some(signal)) => ChildStatus::Signaled(signal),
        (None, None) => ChildStatus::Exited(-1),
    }
}

#[cfg(not(unix))]
fn child_status(exit_status: ExitStatus) -> ChildStatus {
    ChildStatus::Exited(exit_status.code().unwrap_or(-1))
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it exists.
/// - Relative with multiple components (e.g., `bin/sh`): returns it if it exists.
/// - `./foo` on Unix or any `./`-prefixed path on other platforms: returns it if it exists.
/// - Single path component (no separators): search each directory in `search_paths` (PATH)
///   and return the first existing regular file.
/// - Empty path: returns `None`.
///
/// Returns either a borrowed reference to the provided `path` or an owned `PathBuf`
/// when the result is discovered via PATH lookup.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir && path.exists() {
        return Some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, None) => None,
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|candidate| candidate.is_file())
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.exists() { Some(path) } else { None }
}
