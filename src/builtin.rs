use crate::command::{CommandFactory, Context, ExecutableCommand, Flow, Streams};
use crate::interpreter::Factory;
use crate::prompt;
use anyhow::{Context as _, Result, bail};
use argh::{EarlyExit, FromArgs};
use log::{debug, info};
use std::env;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// When set, every token after the command name is ignored rather than parsed.
    const IGNORES_ARGS: bool = false;

    /// Canonical name of the command, e.g. "dog" or "cd".
    fn name() -> &'static str;

    /// Executes the command, writing regular output to `stdout`.
    ///
    /// Errors are reported to the user by the caller; they never stop the shell.
    fn execute(self, stdout: &mut dyn Write, ctx: &Context<'_>) -> Result<Flow>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, streams: &mut Streams<'_>, ctx: &Context<'_>) -> Result<Flow> {
        match <T as BuiltinCommand>::execute(*self, &mut *streams.stdout, ctx) {
            Ok(flow) => Ok(flow),
            Err(e) => {
                debug!("{} failed: {:#}", T::name(), e);
                writeln!(streams.stderr, "shell: {:#}", e)?;
                Ok(Flow::Continue)
            }
        }
    }
}

/// Usage text or usage error produced by argh instead of a command.
struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(self: Box<Self>, streams: &mut Streams<'_>, _ctx: &Context<'_>) -> Result<Flow> {
        if self.is_error {
            writeln!(streams.stderr, "{}", self.output.trim_end())?;
        } else {
            writeln!(streams.stdout, "{}", self.output.trim_end())?;
        }
        Ok(Flow::Continue)
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn name(&self) -> &'static str {
        T::name()
    }

    fn try_create(&self, tokens: &[&str]) -> Option<Box<dyn ExecutableCommand>> {
        let (&name, args) = tokens.split_first()?;
        if name != T::name() {
            return None;
        }
        // Everything after the name is an operand, even `help` or `-x`; only a
        // lone `--help` asks for usage.
        let args: Vec<&str> = match args {
            _ if T::IGNORES_ARGS => Vec::new(),
            ["--help"] => vec!["--help"],
            _ => std::iter::once("--").chain(args.iter().copied()).collect(),
        };
        Some(match T::from_args(&[name], &args) {
            Ok(cmd) => Box::new(cmd),
            Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                output,
                is_error: status.is_err(),
            }),
        })
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
pub struct ChangeDir {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory.
    pub path: Option<String>,
}

impl BuiltinCommand for ChangeDir {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, _stdout: &mut dyn Write, _ctx: &Context<'_>) -> Result<Flow> {
        let Some(path) = self.path else {
            bail!("expected argument to \"cd\"");
        };
        env::set_current_dir(&path).with_context(|| format!("cd: {}", path))?;
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// List the commands built into the shell.
pub struct Help {}

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    fn execute(self, stdout: &mut dyn Write, ctx: &Context<'_>) -> Result<Flow> {
        writeln!(stdout, "Arn shell")?;
        writeln!(stdout, "The following are built in:")?;
        for name in ctx.builtins {
            writeln!(stdout, "  {}", name)?;
        }
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// Clear the terminal screen.
pub struct ClearScreen {}

impl BuiltinCommand for ClearScreen {
    fn name() -> &'static str {
        "cls"
    }

    fn execute(self, stdout: &mut dyn Write, _ctx: &Context<'_>) -> Result<Flow> {
        stdout.write_all(prompt::CLEAR_SCREEN.as_bytes())?;
        stdout.flush()?;
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// Print a file to standard output.
pub struct PrintFile {
    #[argh(positional)]
    /// file to print.
    pub file: Option<String>,
}

impl BuiltinCommand for PrintFile {
    fn name() -> &'static str {
        "dog"
    }

    fn execute(self, stdout: &mut dyn Write, _ctx: &Context<'_>) -> Result<Flow> {
        let Some(file) = self.file else {
            bail!("please provide a file");
        };
        let mut f = File::open(&file).with_context(|| format!("couldn't open {}", file))?;
        io::copy(&mut f, stdout).with_context(|| format!("couldn't read {}", file))?;
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// Delete a file.
pub struct RemoveFile {
    #[argh(positional)]
    /// file to delete.
    pub file: Option<String>,
}

impl BuiltinCommand for RemoveFile {
    fn name() -> &'static str {
        "frem"
    }

    fn execute(self, stdout: &mut dyn Write, _ctx: &Context<'_>) -> Result<Flow> {
        let Some(file) = self.file else {
            bail!("please provide a file");
        };
        fs::remove_file(&file).with_context(|| format!("unable to delete {}", file))?;
        writeln!(stdout, "Deleted {} successfully", file)?;
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// Create an empty file, truncating it if it already exists.
pub struct CreateFile {
    #[argh(positional)]
    /// file to create.
    pub file: Option<String>,
}

impl BuiltinCommand for CreateFile {
    fn name() -> &'static str {
        "fmk"
    }

    fn execute(self, _stdout: &mut dyn Write, _ctx: &Context<'_>) -> Result<Flow> {
        let Some(file) = self.file else {
            bail!("please provide a file");
        };
        File::create(&file).with_context(|| format!("couldn't create {}", file))?;
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// Copy the contents of one file into another.
pub struct CopyFile {
    #[argh(positional)]
    /// source file, then destination file (created or truncated).
    pub paths: Vec<String>,
}

impl BuiltinCommand for CopyFile {
    fn name() -> &'static str {
        "copy"
    }

    fn execute(self, stdout: &mut dyn Write, _ctx: &Context<'_>) -> Result<Flow> {
        let Some(source) = self.paths.first() else {
            bail!("please provide a source file");
        };
        let Some(destination) = self.paths.get(1) else {
            bail!("please provide a destination file");
        };
        if self.paths.len() > 2 {
            bail!("usage: copy <source> <destination>");
        }

        let mut src = File::open(source).with_context(|| format!("couldn't open {}", source))?;
        let is_dir = src
            .metadata()
            .with_context(|| format!("couldn't read {}", source))?
            .is_dir();
        if is_dir {
            bail!("couldn't copy {}: is a directory", source);
        }
        if is_same_file(source, destination) {
            bail!("{} and {} are the same file", source, destination);
        }
        let mut dst =
            File::create(destination).with_context(|| format!("couldn't open {}", destination))?;

        let copied = io::copy(&mut src, &mut dst)
            .with_context(|| format!("couldn't copy {} to {}", source, destination))?;
        debug!("copied {} bytes from {} to {}", copied, source, destination);
        writeln!(stdout, "File copied successfully.")?;
        Ok(Flow::Continue)
    }
}

// Truncating the destination would wipe the source before it is read.
fn is_same_file(a: &str, b: &str) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[derive(FromArgs)]
/// Print the session display name.
pub struct Hostname {}

impl BuiltinCommand for Hostname {
    fn name() -> &'static str {
        "hostnm"
    }

    fn execute(self, stdout: &mut dyn Write, ctx: &Context<'_>) -> Result<Flow> {
        writeln!(stdout, "{}", ctx.session.display_name())?;
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// Print the current working directory to standard output.
pub struct WorkingDir {}

impl BuiltinCommand for WorkingDir {
    fn name() -> &'static str {
        "dir"
    }

    fn execute(self, stdout: &mut dyn Write, _ctx: &Context<'_>) -> Result<Flow> {
        let cwd = env::current_dir().context("couldn't read the current directory")?;
        writeln!(stdout, "{}", cwd.display())?;
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// Print the first line of a file.
pub struct PrintHead {
    #[argh(positional)]
    /// file to read the first line from.
    pub file: Option<String>,
}

impl BuiltinCommand for PrintHead {
    fn name() -> &'static str {
        "head"
    }

    fn execute(self, stdout: &mut dyn Write, _ctx: &Context<'_>) -> Result<Flow> {
        let Some(file) = self.file else {
            bail!("please provide a file");
        };
        let f = File::open(&file).with_context(|| format!("couldn't open {}", file))?;

        let mut line = Vec::new();
        BufReader::new(f)
            .read_until(b'\n', &mut line)
            .with_context(|| format!("couldn't read {}", file))?;
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        stdout.write_all(&line)?;
        writeln!(stdout)?;
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// Print the current local date and time.
pub struct PrintTime {}

impl BuiltinCommand for PrintTime {
    fn name() -> &'static str {
        "time"
    }

    fn execute(self, stdout: &mut dyn Write, _ctx: &Context<'_>) -> Result<Flow> {
        let now = chrono::Local::now();
        writeln!(stdout, "{}", now.format("%a %b %e %H:%M:%S %Y"))?;
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// Exit the shell. Any arguments are ignored.
pub struct Exit {}

impl BuiltinCommand for Exit {
    const IGNORES_ARGS: bool = true;

    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _stdout: &mut dyn Write, _ctx: &Context<'_>) -> Result<Flow> {
        info!("exit requested");
        Ok(Flow::Terminate)
    }
}
