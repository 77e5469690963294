//! Prompt rendering and terminal escape codes.

use crate::session::Session;
use std::env;
use std::path::Path;

/// Moves the cursor home and clears the whole screen.
pub const CLEAR_SCREEN: &str = "\x1b[1;1H\x1b[2J";

const GREEN: &str = "\x1b[0;32m";
const BLUE: &str = "\x1b[0;34m";
const RESET: &str = "\x1b[0m";

/// Builds the `Arn@<name>:<cwd>/$ ` prompt.
#[derive(Debug, Clone, Copy)]
pub struct Prompt {
    colored: bool,
}

impl Prompt {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    /// Render the prompt for the current working directory.
    ///
    /// An unreadable working directory (e.g. deleted from under the shell) is
    /// shown as `?`.
    pub fn render(&self, session: &Session) -> String {
        match env::current_dir() {
            Ok(cwd) => self.render_with(session, &cwd),
            Err(_) => self.render_with(session, Path::new("?")),
        }
    }

    pub fn render_with(&self, session: &Session, cwd: &Path) -> String {
        let name = session.display_name();
        let cwd = cwd.display();
        if self.colored {
            format!("{GREEN}Arn@{name}:{BLUE}{cwd}/{GREEN}$ {RESET}")
        } else {
            format!("Arn@{name}:{cwd}/$ ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_prompt() {
        let prompt = Prompt::new(false);
        let rendered = prompt.render_with(&Session::new("arin"), Path::new("/home/arin"));
        assert_eq!(rendered, "Arn@arin:/home/arin/$ ");
    }

    #[test]
    fn test_colored_prompt_resets_at_end() {
        let prompt = Prompt::new(true);
        let rendered = prompt.render_with(&Session::default(), Path::new("/tmp"));
        assert!(rendered.starts_with(GREEN));
        assert!(rendered.contains("Arn@root:"));
        assert!(rendered.contains("/tmp/"));
        assert!(rendered.ends_with(RESET));
    }
}
