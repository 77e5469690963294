use crate::command::{CommandFactory, Context, Flow, Streams};
use crate::external::{ChildStatus, Launcher, ProcessLauncher};
use crate::io_adapters::LineSource;
use crate::lexer;
use crate::prompt::Prompt;
use crate::session::Session;
use anyhow::Result;
use log::{debug, info, warn};
use std::io::Write;

/// Factory allows creating instances of ExecutableCommand.
///
/// One `Factory<T>` per built-in type makes up the registry.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// The built-in registry, in dispatch order.
pub fn default_commands() -> Vec<Box<dyn CommandFactory>> {
    use crate::builtin::*;
    vec![
        Box::new(Factory::<ChangeDir>::default()),
        Box::new(Factory::<Help>::default()),
        Box::new(Factory::<ClearScreen>::default()),
        Box::new(Factory::<PrintFile>::default()),
        Box::new(Factory::<RemoveFile>::default()),
        Box::new(Factory::<CreateFile>::default()),
        Box::new(Factory::<CopyFile>::default()),
        Box::new(Factory::<Hostname>::default()),
        Box::new(Factory::<WorkingDir>::default()),
        Box::new(Factory::<PrintHead>::default()),
        Box::new(Factory::<PrintTime>::default()),
        Box::new(Factory::<Exit>::default()),
    ]
}

/// A minimal interactive shell: built-ins first, external programs otherwise.
///
/// The registry, session and launcher are fixed at construction; the only
/// thing that changes while the shell runs is the process working directory.
///
/// Example
/// ```
/// use arn_shell::{Flow, Interpreter, Session, Streams};
/// let sh = Interpreter::new(Session::new("arin"));
/// let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
/// let flow = sh.eval_line("hostnm", &mut Streams::new(&mut out, &mut err));
/// assert_eq!(flow, Flow::Continue);
/// assert_eq!(out, b"arin\n");
/// ```
pub struct Interpreter {
    session: Session,
    commands: Vec<Box<dyn CommandFactory>>,
    names: Vec<&'static str>,
    launcher: Box<dyn Launcher>,
    prompt: Prompt,
}

impl Interpreter {
    /// Interpreter with the default built-ins and a real process launcher.
    pub fn new(session: Session) -> Self {
        Self::with_parts(session, default_commands(), Box::new(ProcessLauncher))
    }

    /// Interpreter with a custom registry and launcher.
    pub fn with_parts(
        session: Session,
        commands: Vec<Box<dyn CommandFactory>>,
        launcher: Box<dyn Launcher>,
    ) -> Self {
        let names = commands.iter().map(|factory| factory.name()).collect();
        Self {
            session,
            commands,
            names,
            launcher,
            prompt: Prompt::new(false),
        }
    }

    /// Replace the prompt style used by [`Interpreter::repl`].
    pub fn with_prompt(mut self, prompt: Prompt) -> Self {
        self.prompt = prompt;
        self
    }

    /// Names of the registered built-ins, in dispatch order.
    pub fn builtin_names(&self) -> &[&'static str] {
        &self.names
    }

    /// Tokenize and dispatch one input line.
    pub fn eval_line(&self, line: &str, streams: &mut Streams<'_>) -> Flow {
        let tokens = lexer::split_into_tokens(line);
        self.dispatch(&tokens, streams)
    }

    /// Route a token sequence to the first matching built-in, or launch it.
    ///
    /// An empty sequence is a no-op. Only a built-in can return
    /// [`Flow::Terminate`]; external commands always continue, whatever their
    /// outcome.
    pub fn dispatch(&self, tokens: &[&str], streams: &mut Streams<'_>) -> Flow {
        let Some(&name) = tokens.first() else {
            return Flow::Continue;
        };

        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(tokens) {
                debug!("{} is a built-in", name);
                let ctx = Context {
                    session: &self.session,
                    builtins: &self.names,
                };
                return match cmd.execute(streams, &ctx) {
                    Ok(flow) => flow,
                    Err(e) => {
                        warn!("{}: couldn't write output: {:#}", name, e);
                        Flow::Continue
                    }
                };
            }
        }

        // the child shares our stdout, so anything buffered must go out first
        if let Err(e) = streams.stdout.flush() {
            warn!("couldn't flush output: {}", e);
        }
        match self.launcher.launch(tokens) {
            Ok(ChildStatus::Exited(code)) => debug!("{} exited with {}", name, code),
            Ok(ChildStatus::Signaled(signal)) => debug!("{} killed by signal {}", name, signal),
            Err(e) => {
                debug!("launch of {} failed: {:?}", name, e);
                if let Err(w) = writeln!(streams.stderr, "shell: {}", e) {
                    warn!("couldn't report launch failure: {}", w);
                }
            }
        }
        Flow::Continue
    }

    /// Read-eval loop: prompt, read, dispatch, until `exit` or end of input.
    ///
    /// End of input stops the loop cleanly. A read error stops it too and is
    /// returned to the caller.
    pub fn repl(&self, source: &mut dyn LineSource, streams: &mut Streams<'_>) -> Result<()> {
        loop {
            let prompt = self.prompt.render(&self.session);
            let line = match source.read_line(&prompt) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    info!("end of input");
                    return Ok(());
                }
                Err(e) => {
                    warn!("couldn't read input: {:#}", e);
                    return Err(e);
                }
            };

            let flow = self.eval_line(&line, streams);
            if let Err(e) = streams.stdout.flush() {
                warn!("couldn't flush output: {}", e);
            }
            if flow == Flow::Terminate {
                info!("shell terminated");
                return Ok(());
            }
        }
    }
}
