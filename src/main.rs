use anyhow::Result;
use arn_shell::io_adapters::{EditorSource, LineSource, PlainSource};
use arn_shell::prompt::Prompt;
use arn_shell::session::DEFAULT_NAME_FILE;
use arn_shell::{Interpreter, Session, Streams};
use argh::FromArgs;
use log::{LevelFilter, debug};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::io::{self, IsTerminal};

fn default_name_file() -> String {
    DEFAULT_NAME_FILE.to_string()
}

#[derive(FromArgs)]
/// Arn shell: a small interactive command interpreter.
struct Args {
    #[argh(option, default = "default_name_file()")]
    /// file holding the display name shown in the prompt.
    name_file: String,

    #[argh(switch)]
    /// print the prompt without colors.
    no_color: bool,

    #[argh(switch, short = 'v')]
    /// log debug information to stderr.
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    if let Err(e) = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("shell: couldn't set up logging: {}", e);
    }
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();
    init_logging(args.verbose);

    let session = Session::load(&args.name_file);
    let colored = !args.no_color && io::stdout().is_terminal();
    let shell = Interpreter::new(session).with_prompt(Prompt::new(colored));

    let mut source: Box<dyn LineSource> = if io::stdin().is_terminal() {
        debug!("reading commands from a terminal");
        Box::new(EditorSource::new()?)
    } else {
        debug!("reading commands from a stream");
        Box::new(PlainSource::new(io::stdin().lock(), io::stdout()))
    };

    let (mut stdout, mut stderr) = (io::stdout(), io::stderr());
    shell.repl(source.as_mut(), &mut Streams::new(&mut stdout, &mut stderr))
}
