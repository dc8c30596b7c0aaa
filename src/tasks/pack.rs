//! Publish example sources from the book.
//!
//! Builds a fresh root tree holding one directory per chapter, copied from
//! the chapter's `src-<chapter>` directory after build byproducts are
//! deleted, then archives the tree.

use std::fs;
use std::path::{Component, Path};

use tracing::{debug, info};
use walkdir::WalkDir;

use super::Book;
use crate::core::{Action, BookError, BookResult, CommandRunner, PackConfig, PatternSet};

/// Options for [`Book::pack_src`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackOptions {
    /// Root tree, relative to the book directory
    pub root: String,

    /// Archive file, relative to the book directory
    pub tarfile: String,

    /// Chapters to pack (default: configured chapters)
    pub chapters: Option<Vec<String>>,
}

impl PackOptions {
    /// Options taken from the `[pack]` config section.
    pub fn from_config(config: &PackConfig) -> Self {
        Self { root: config.root.clone(), tarfile: config.tarfile.clone(), chapters: None }
    }

    /// Set the root tree.
    #[must_use]
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// Set the archive file.
    #[must_use]
    pub fn tarfile(mut self, tarfile: impl Into<String>) -> Self {
        self.tarfile = tarfile.into();
        self
    }

    /// Restrict packing to the given chapters.
    #[must_use]
    pub fn chapters(mut self, chapters: Vec<String>) -> Self {
        self.chapters = Some(chapters);
        self
    }
}

impl Default for PackOptions {
    fn default() -> Self {
        Self::from_config(&PackConfig::default())
    }
}

impl<R: CommandRunner> Book<R> {
    /// Copy every chapter's cleaned `src-<chapter>` tree under the root and archive it.
    ///
    /// A chapter without a `src-<chapter>` directory aborts the run before
    /// anything is copied for it. The root must be a relative path below the
    /// book directory, since it is removed before packing.
    pub fn pack_src(&self, options: &PackOptions) -> BookResult<()> {
        if !is_nested_path(&options.root) {
            return Err(BookError::InvalidPackRoot { root: options.root.clone() });
        }

        let ignored = PatternSet::new(&self.config.pack.ignored)?;
        let pack_root = self.dir.join(&options.root);
        let chapters = options.chapters.as_deref().unwrap_or_else(|| self.chapters());

        self.recreate_dir(&pack_root)?;

        let chapter_root = self.chapter_root();
        self.visitor(&chapter_root).visit(
            chapters,
            Action::callback(|chapter| {
                let src_name = format!("src-{}", chapter.name);
                let src = chapter.dir.join(&src_name);
                if !src.is_dir() {
                    return Err(BookError::MissingSourceDirectory {
                        chapter: chapter.name.clone(),
                        path: src,
                    });
                }

                self.remove_ignored(&src, &src_name, &ignored)?;
                self.copy_tree(&src, &pack_root.join(&chapter.name))
            }),
        )?;

        println!("\ndirectory tree with source code files for the book: {}", options.root);

        self.run_in_book(&self.config.archive_command(&options.tarfile, &options.root))?;
        println!("tarfile: {}", options.tarfile);

        info!(root = %options.root, tarfile = %options.tarfile, "packed sources");
        Ok(())
    }

    /// Remove `dir` if present and create it empty.
    fn recreate_dir(&self, dir: &Path) -> BookResult<()> {
        if self.dry_run {
            println!("[DRY RUN] Would recreate {}", dir.display());
            return Ok(());
        }

        if fs::symlink_metadata(dir).is_ok() {
            debug!(dir = %dir.display(), "removing previous tree");
            fs::remove_dir_all(dir)?;
        }
        fs::create_dir_all(dir)?;
        Ok(())
    }

    /// Delete every file below `src` whose name matches `ignored`.
    ///
    /// `label` prefixes the reported paths (e.g. `src-rules`).
    fn remove_ignored(&self, src: &Path, label: &str, ignored: &PatternSet) -> BookResult<()> {
        let mut doomed = Vec::new();
        for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_dir() {
                continue;
            }
            if ignored.matches(&entry.file_name().to_string_lossy()) {
                doomed.push(entry.into_path());
            }
        }

        for path in doomed {
            let relative = path.strip_prefix(src).unwrap_or(&path);
            let shown = Path::new(label).join(relative);
            if self.dry_run {
                println!("[DRY RUN] Would remove {}", shown.display());
            } else {
                fs::remove_file(&path)?;
                println!("removed {}", shown.display());
            }
        }

        Ok(())
    }

    /// Copy the tree at `src` to `dest`, following symlinks.
    fn copy_tree(&self, src: &Path, dest: &Path) -> BookResult<()> {
        if self.dry_run {
            println!("[DRY RUN] Would copy {} to {}", src.display(), dest.display());
            return Ok(());
        }

        for entry in WalkDir::new(src).follow_links(true) {
            let entry = entry?;
            let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
            let target = dest.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                fs::copy(entry.path(), &target)?;
            }
        }

        debug!(src = %src.display(), dest = %dest.display(), "copied tree");
        Ok(())
    }
}

/// Whether `path` is non-empty and made only of normal components.
fn is_nested_path(path: &str) -> bool {
    let mut components = Path::new(path).components().peekable();
    components.peek().is_some() && components.all(|c| matches!(c, Component::Normal(_)))
}
