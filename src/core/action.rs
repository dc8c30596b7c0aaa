//! Actions performed inside each chapter directory.
//!
//! An action is either an ordered list of shell commands or a callback.
//! Scripts such as `rm -rf tmp*; bash -x make.sh` are split on `;`,
//! leaving separators inside quotes alone.

use std::fmt;
use std::path::PathBuf;

use super::error::BookResult;

/// A chapter being visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// Chapter identifier (e.g. `rules`)
    pub name: String,

    /// Resolved chapter directory
    pub dir: PathBuf,
}

/// Callback invoked once per chapter.
pub type ChapterCallback<'a> = Box<dyn FnMut(&Chapter) -> BookResult<()> + 'a>;

/// What to do in each chapter directory.
pub enum Action<'a> {
    /// Shell commands run in order; the first failure aborts the traversal.
    Commands(Vec<String>),

    /// A callback; its error aborts the traversal.
    Callback(ChapterCallback<'a>),
}

impl<'a> Action<'a> {
    /// Split a `;`-separated script into a command sequence.
    pub fn script(script: &str) -> Self {
        Self::Commands(split_script(script))
    }

    /// Use an explicit command sequence as-is.
    pub fn commands<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Commands(commands.into_iter().map(Into::into).collect())
    }

    /// Wrap a callback.
    pub fn callback<F>(f: F) -> Self
    where
        F: FnMut(&Chapter) -> BookResult<()> + 'a,
    {
        Self::Callback(Box::new(f))
    }
}

impl fmt::Debug for Action<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commands(commands) => f.debug_tuple("Commands").field(commands).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Split a script on `;` into trimmed, non-empty commands.
pub fn split_script(input: &str) -> Vec<String> {
    let mut commands = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            ';' => {
                push_trimmed(&mut commands, &current);
                current.clear();
            }
            // Keep quoted text intact so `echo "a; b"` stays one command
            '"' | '\'' => {
                current.push(c);
                for qc in chars.by_ref() {
                    current.push(qc);
                    if qc == c {
                        break;
                    }
                }
            }
            _ => current.push(c),
        }
    }
    push_trimmed(&mut commands, &current);

    commands
}

fn push_trimmed(commands: &mut Vec<String>, command: &str) {
    let command = command.trim();
    if !command.is_empty() {
        commands.push(command.to_string());
    }
}
