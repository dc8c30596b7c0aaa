//! Spellcheck every chapter.

use super::Book;
use crate::core::{Action, BookResult, CommandRunner};

impl<R: CommandRunner> Book<R> {
    /// Run the spellcheck script, with the configured dictionary, in every chapter.
    pub fn spellcheck(&self) -> BookResult<()> {
        let chapter_root = self.chapter_root();
        let script = self.config.spellcheck_command();
        self.visitor(&chapter_root).visit(self.chapters(), Action::script(&script))
    }
}
