//! Link chapter subdirectories into the book directory.
//!
//! For chapter `rules` this creates `fig-rules`, `src-rules`, `mov-rules`
//! and `exer-rules`, each pointing at the matching subdirectory of the
//! chapter. Existing entries are never replaced, so re-running is harmless.

use std::fs;

use tracing::{debug, warn};

use super::{symlink_dir, Book};
use crate::core::{BookResult, CommandRunner};

impl<R: CommandRunner> Book<R> {
    /// Create the subdirectory links for `chapters` (default: configured chapters).
    pub fn make_links(&self, chapters: Option<&[String]>) -> BookResult<()> {
        let chapters = chapters.unwrap_or_else(|| self.chapters());
        let chapter_dir = self.config.chapter_dir();

        for chapter in chapters {
            for kind in &self.config.links.kinds {
                let name = format!("{kind}-{chapter}");
                let link = self.dir.join(&name);
                // Relative targets resolve against the book directory, where the link lives
                let target = chapter_dir.join(chapter).join(&name);

                if fs::symlink_metadata(&link).is_ok() {
                    debug!(link = %name, "link name already taken, skipping");
                    continue;
                }

                if !self.dir.join(&target).exists() {
                    warn!(link = %name, target = %target.display(), "link target does not exist");
                }

                if self.dry_run {
                    println!("[DRY RUN] Would create local link {} to {}", name, target.display());
                    continue;
                }

                symlink_dir(&target, &link)?;
                println!("created local link {} to {}", name, target.display());
            }
        }

        Ok(())
    }
}
