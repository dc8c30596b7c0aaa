//! Book publishing operations.
//!
//! A [`Book`] ties together the book directory, the configuration, and a
//! [`CommandRunner`]. Each operation lives in its own module:
//!
//! - [`clean`](Book::clean) - remove everything that can be regenerated
//! - [`compile_chapters`](Book::compile_chapters) - build every chapter as a stand-alone document
//! - [`make_links`](Book::make_links) - link chapter subdirectories into the book directory
//! - [`spellcheck`](Book::spellcheck) - spellcheck every chapter
//! - [`pack_src`](Book::pack_src) - collect example sources into a tarball

mod clean;
mod compile;
mod links;
mod pack;
mod spellcheck;

pub use pack::PackOptions;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::{run_checked, split_script, BookResult, ChapterVisitor, CommandRunner, Config};

/// A book project rooted at a directory.
#[derive(Debug)]
pub struct Book<R> {
    /// The book directory (where links, the pack root, and the tarball live)
    dir: PathBuf,

    /// Configuration
    config: Config,

    /// Runs external commands
    runner: R,

    /// Print filesystem changes instead of making them
    dry_run: bool,
}

/// Whether a configured chapter exists on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterStatus {
    /// Chapter identifier
    pub name: String,

    /// Resolved chapter directory
    pub path: PathBuf,

    /// Whether the directory exists
    pub exists: bool,
}

impl<R: CommandRunner> Book<R> {
    /// Create a book rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>, config: Config, runner: R) -> Self {
        Self { dir: dir.into(), config, runner, dry_run: false }
    }

    /// Set dry-run mode for filesystem changes.
    ///
    /// External commands are governed by the runner; pair this with
    /// [`DryRunRunner`](crate::core::DryRunRunner).
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Replace the configured chapter list.
    #[must_use]
    pub fn with_chapters(mut self, chapters: Vec<String>) -> Self {
        self.config.book.chapters = chapters;
        self
    }

    /// The book directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The command runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Configured chapters, in traversal order.
    pub fn chapters(&self) -> &[String] {
        &self.config.book.chapters
    }

    /// Directory holding the chapter directories.
    pub fn chapter_root(&self) -> PathBuf {
        self.dir.join(self.config.chapter_dir())
    }

    /// Existence of every configured chapter directory.
    pub fn chapter_status(&self) -> Vec<ChapterStatus> {
        let root = self.chapter_root();
        self.chapters()
            .iter()
            .map(|name| {
                let path = root.join(name);
                ChapterStatus { name: name.clone(), exists: path.is_dir(), path }
            })
            .collect()
    }

    fn visitor<'a>(&'a self, chapter_root: &'a Path) -> ChapterVisitor<'a> {
        ChapterVisitor::new(chapter_root, &self.runner)
    }

    /// Run a script once in the book directory.
    fn run_in_book(&self, script: &str) -> BookResult<()> {
        for command in split_script(script) {
            run_checked(&self.runner, &command, &self.dir, "book directory")?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}
