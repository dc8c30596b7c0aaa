//! Compile chapters as stand-alone documents.

use tracing::info;

use super::Book;
use crate::core::{Action, BookResult, CommandRunner};

impl<R: CommandRunner> Book<R> {
    /// Run the compile script in every chapter directory.
    ///
    /// The first chapter whose build fails aborts the run.
    pub fn compile_chapters(&self) -> BookResult<()> {
        let chapter_root = self.chapter_root();
        self.visitor(&chapter_root)
            .visit(self.chapters(), Action::script(&self.config.commands.compile))?;

        info!(chapters = self.chapters().len(), "compiled all chapters");
        Ok(())
    }
}
