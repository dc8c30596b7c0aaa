//! Remove everything that can be regenerated.

use std::fs;

use tracing::{debug, info};

use super::Book;
use crate::core::{Action, BookResult, CommandRunner, PatternSet};

impl<R: CommandRunner> Book<R> {
    /// Clean every chapter, then the book directory.
    ///
    /// Runs the chapter clean script in each chapter, the global clean
    /// script here, and finally deletes redundant generated files.
    pub fn clean(&self) -> BookResult<()> {
        let chapter_root = self.chapter_root();
        self.visitor(&chapter_root)
            .visit(self.chapters(), Action::script(&self.config.commands.clean))?;

        self.run_in_book(&self.config.commands.clean_global)?;

        let removed = self.remove_redundant()?;
        info!(removed, "clean finished");
        Ok(())
    }

    /// Delete book-directory files matching the redundant patterns.
    fn remove_redundant(&self) -> BookResult<usize> {
        let patterns = PatternSet::new(&self.config.clean.redundant)?;

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if patterns.matches(&name) {
                names.push(name);
            }
        }
        names.sort();

        for name in &names {
            if self.dry_run {
                println!("[DRY RUN] Would remove {name}");
            } else {
                fs::remove_file(self.dir.join(name))?;
                debug!(file = %name, "removed redundant file");
                println!("removed {name}");
            }
        }

        Ok(names.len())
    }
}
