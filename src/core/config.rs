//! Configuration management for Bookpub.
//!
//! Handles loading configuration from TOML files. Every field has a
//! default, so an empty file (or no file at all) describes the stock
//! book layout.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::patterns::DEFAULT_IGNORED_FILES;

/// Name of the per-book config file.
pub const LOCAL_CONFIG_FILE: &str = ".bookpub.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Book layout
    pub book: BookConfig,

    /// External commands
    pub commands: CommandsConfig,

    /// Clean settings
    pub clean: CleanConfig,

    /// Link settings
    pub links: LinksConfig,

    /// Spellcheck settings
    pub spellcheck: SpellcheckConfig,

    /// Source packing settings
    pub pack: PackConfig,
}

/// Book layout settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    /// Chapter identifiers, in traversal order
    pub chapters: Vec<String>,

    /// Directory holding one subdirectory per chapter, relative to the book directory
    pub chapter_dir: String,
}

/// External command templates.
///
/// Scripts may hold several commands separated by `;`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Run in every chapter directory by `clean`
    pub clean: String,

    /// Run once in the book directory by `clean`
    pub clean_global: String,

    /// Run in every chapter directory by `compile`
    pub compile: String,

    /// Run in every chapter directory by `spellcheck` (`{dictionary}` is substituted)
    pub spellcheck: String,

    /// Run in the book directory by `pack` (`{tarfile}` and `{root}` are substituted)
    pub archive: String,
}

/// Clean settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    /// Generated files removed from the book directory
    pub redundant: Vec<String>,
}

/// Link settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Subdirectory kinds linked per chapter (`<kind>-<chapter>`)
    pub kinds: Vec<String>,
}

/// Spellcheck settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellcheckConfig {
    /// Dictionary file, relative to each chapter directory
    pub dictionary: String,
}

/// Source packing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    /// Directory tree the sources are copied into
    pub root: String,

    /// Archive produced from the root tree
    pub tarfile: String,

    /// Glob patterns for files that are never published
    pub ignored: Vec<String>,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.bookpub.toml` in `book_dir`
    /// 2. `~/.config/bookpub/config.toml`
    /// 3. Falls back to defaults
    pub fn load(book_dir: &Path) -> anyhow::Result<Self> {
        let local_config = book_dir.join(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(config_dir) = Self::config_dir() {
            let global_config = config_dir.join("config.toml");
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(crate::APP_NAME))
    }

    /// The chapter directory with `~` expanded.
    pub fn chapter_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.book.chapter_dir).into_owned())
    }

    /// The spellcheck command with the dictionary filled in.
    pub fn spellcheck_command(&self) -> String {
        let dictionary = shell_quote(&self.spellcheck.dictionary);
        render(&self.commands.spellcheck, &[("dictionary", dictionary.as_str())])
    }

    /// The archive command for the given archive and root tree.
    pub fn archive_command(&self, tarfile: &str, root: &str) -> String {
        let (tarfile, root) = (shell_quote(tarfile), shell_quote(root));
        render(&self.commands.archive, &[("tarfile", tarfile.as_str()), ("root", root.as_str())])
    }
}

/// Substitute `{key}` placeholders in a command template.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}

/// Quote `value` as one `sh` word; plain names are left as they are.
pub fn shell_quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value.chars().all(|c| c.is_ascii_alphanumeric() || "-_./+,:@%=".contains(c));
    if plain {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            chapters: ["rules", "preface", "mako"].iter().map(ToString::to_string).collect(),
            chapter_dir: "../chapter".to_string(),
        }
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            clean: "bash -x ../clean.sh".to_string(),
            clean_global: "doconce clean".to_string(),
            compile: "rm -rf tmp*; bash -x make.sh".to_string(),
            spellcheck: "rm -rf tmp*; doconce spellcheck -d {dictionary} *.do.txt".to_string(),
            archive: "tar czf {tarfile} {root}".to_string(),
        }
    }
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self { redundant: vec!["newcommands*.tex".to_string()] }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self { kinds: ["fig", "src", "mov", "exer"].iter().map(ToString::to_string).collect() }
    }
}

impl Default for SpellcheckConfig {
    fn default() -> Self {
        Self { dictionary: ".dict4spell.txt".to_string() }
    }
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            root: "src".to_string(),
            tarfile: "book-examples.tar.gz".to_string(),
            ignored: DEFAULT_IGNORED_FILES.iter().map(ToString::to_string).collect(),
        }
    }
}
