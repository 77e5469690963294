use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Maximum number of bytes read from the display name file.
pub const MAX_DISPLAY_NAME_LEN: usize = 25;

/// Display name used when the name file is missing or empty.
pub const FALLBACK_DISPLAY_NAME: &str = "root";

/// Default location of the display name file, relative to the startup directory.
pub const DEFAULT_NAME_FILE: &str = "name.txt";

/// Process-wide, read-only state of one shell session.
///
/// Built once at startup and passed by reference to the interpreter and to any
/// built-in that needs it. Nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    display_name: String,
}

impl Session {
    /// Create a session with an explicit display name.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
        }
    }

    /// Load the display name from `path`.
    ///
    /// Reads at most [`MAX_DISPLAY_NAME_LEN`] bytes. A missing or unreadable
    /// file is not fatal: the session falls back to [`FALLBACK_DISPLAY_NAME`].
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match read_display_name(path) {
            Ok(Some(name)) => {
                debug!("loaded display name {:?} from {}", name, path.display());
                Self::new(name)
            }
            Ok(None) => {
                warn!("{} is empty, using {:?}", path.display(), FALLBACK_DISPLAY_NAME);
                Self::default()
            }
            Err(e) => {
                warn!("{:#}, using {:?}", e, FALLBACK_DISPLAY_NAME);
                Self::default()
            }
        }
    }

    /// The name shown in the prompt and printed by `hostnm`.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(FALLBACK_DISPLAY_NAME)
    }
}

fn read_display_name(path: &Path) -> Result<Option<String>> {
    let file = File::open(path).with_context(|| format!("couldn't open {}", path.display()))?;
    let mut buf = Vec::with_capacity(MAX_DISPLAY_NAME_LEN);
    file.take(MAX_DISPLAY_NAME_LEN as u64)
        .read_to_end(&mut buf)
        .with_context(|| format!("couldn't read {}", path.display()))?;

    let name = String::from_utf8_lossy(&buf);
    let name = name.trim_end();
    if name.is_empty() {
        Ok(None)
    } else {
        Ok(Some(name.to_string()))
    }
}
