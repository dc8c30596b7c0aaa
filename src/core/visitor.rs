//! Chapter traversal.
//!
//! Visits chapter directories in order and performs an [`Action`] in each.
//! The chapter directory is handed to commands and callbacks explicitly, so
//! the process working directory is never changed.
//!
//! The first missing directory, failing command, or callback error aborts
//! the traversal; later chapters are not touched.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use super::action::{Action, Chapter};
use super::error::{BookError, BookResult};
use super::executor::CommandRunner;

/// Visits chapter directories under a common root.
#[derive(Debug, Clone, Copy)]
pub struct ChapterVisitor<'a> {
    /// Directory containing one subdirectory per chapter
    chapter_root: &'a Path,

    /// Runs command actions
    runner: &'a dyn CommandRunner,
}

impl<'a> ChapterVisitor<'a> {
    /// Create a visitor for chapters under `chapter_root`.
    pub fn new(chapter_root: &'a Path, runner: &'a dyn CommandRunner) -> Self {
        Self { chapter_root, runner }
    }

    /// Resolve a chapter identifier to its directory.
    pub fn chapter_path(&self, name: &str) -> PathBuf {
        self.chapter_root.join(name)
    }

    /// Resolve a chapter, failing if its directory does not exist.
    ///
    /// The name must be a single directory name, so `""`, `.` and `..`
    /// can never resolve to the chapter root or outside it.
    pub fn resolve(&self, name: &str) -> BookResult<Chapter> {
        if !is_plain_name(name) {
            return Err(BookError::InvalidChapterName { name: name.to_string() });
        }

        let dir = self.chapter_path(name);
        if !dir.is_dir() {
            return Err(BookError::MissingChapterDirectory { path: dir });
        }
        Ok(Chapter { name: name.to_string(), dir })
    }

    /// Perform `action` in every chapter, in order.
    pub fn visit<S: AsRef<str>>(&self, chapters: &[S], mut action: Action<'_>) -> BookResult<()> {
        for name in chapters {
            let chapter = self.resolve(name.as_ref())?;
            info!(chapter = %chapter.name, dir = %chapter.dir.display(), "visiting chapter");

            match &mut action {
                Action::Commands(commands) => self.run_commands(&chapter, commands)?,
                Action::Callback(callback) => callback(&chapter)?,
            }
        }

        debug!(count = chapters.len(), "visited all chapters");
        Ok(())
    }

    fn run_commands(&self, chapter: &Chapter, commands: &[String]) -> BookResult<()> {
        for command in commands {
            run_checked(self.runner, command, &chapter.dir, &chapter.name)?;
        }
        Ok(())
    }
}

/// Whether `name` is exactly one normal path component.
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!((components.next(), components.next()), (Some(Component::Normal(_)), None))
}

/// Echo and run one command, turning a non-zero exit into [`BookError::CommandFailed`].
///
/// `location` names where the command ran (a chapter, or the book itself).
pub fn run_checked(
    runner: &dyn CommandRunner,
    command: &str,
    dir: &Path,
    location: &str,
) -> BookResult<()> {
    println!("{command}");

    let result = runner
        .run(command, dir)
        .map_err(|e| BookError::Spawn { command: command.to_string(), reason: format!("{e:#}") })?;

    if !result.success() {
        return Err(BookError::CommandFailed {
            location: location.to_string(),
            command: command.to_string(),
            code: result.code,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::fs;

    use super::*;
    use crate::core::executor::ExecutionResult;

    /// Records every command and fails the ones it is told to.
    #[derive(Debug, Default)]
    struct RecordingRunner {
        calls: RefCell<Vec<(String, PathBuf)>>,
        failing: Vec<String>,
    }

    impl RecordingRunner {
        fn failing(command: &str) -> Self {
            Self { failing: vec![command.to_string()], ..Self::default() }
        }

        fn dirs(&self) -> Vec<String> {
            self.calls
                .borrow()
                .iter()
                .map(|(_, dir)| dir.file_name().unwrap().to_string_lossy().into_owned())
                .collect()
        }
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, command: &str, dir: &Path) -> anyhow::Result<ExecutionResult> {
            self.calls.borrow_mut().push((command.to_string(), dir.to_path_buf()));
            let code = if self.failing.iter().any(|f| f == command) { 1 } else { 0 };
            Ok(ExecutionResult::with_code(Some(code)))
        }
    }

    fn chapter_root(existing: &[&str]) -> tempfile::TempDir {
        let temp = tempfile::tempdir().unwrap();
        for name in existing {
            fs::create_dir(temp.path().join(name)).unwrap();
        }
        temp
    }

    #[test]
    fn test_runs_commands_in_every_chapter_in_order() {
        let root = chapter_root(&["rules", "preface"]);
        let runner = RecordingRunner::default();
        let visitor = ChapterVisitor::new(root.path(), &runner);

        visitor.visit(&["rules", "preface"], Action::script("a; b")).unwrap();

        let calls = runner.calls.borrow();
        let commands: Vec<_> = calls.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(commands, vec!["a", "b", "a", "b"]);
        assert_eq!(runner.dirs(), vec!["rules", "rules", "preface", "preface"]);
    }

    #[test]
    fn test_working_directory_is_untouched() {
        let root = chapter_root(&["rules", "preface"]);
        let runner = RecordingRunner::default();
        let before = std::env::current_dir().unwrap();

        ChapterVisitor::new(root.path(), &runner)
            .visit(&["rules", "preface"], Action::script("true"))
            .unwrap();

        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_missing_chapter_stops_traversal() {
        let root = chapter_root(&["a", "b", "d"]);
        let runner = RecordingRunner::default();
        let visitor = ChapterVisitor::new(root.path(), &runner);

        let err = visitor.visit(&["a", "b", "c", "d"], Action::script("build")).unwrap_err();

        match err {
            BookError::MissingChapterDirectory { path } => assert!(path.ends_with("c")),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(runner.dirs(), vec!["a", "b"]);
    }

    #[test]
    fn test_first_missing_chapter_runs_nothing() {
        let root = chapter_root(&["b"]);
        let runner = RecordingRunner::default();

        let err = ChapterVisitor::new(root.path(), &runner)
            .visit(&["a", "b"], Action::script("build"))
            .unwrap_err();

        assert!(err.is_missing_directory());
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_failing_command_is_fatal() {
        let root = chapter_root(&["rules", "preface"]);
        let runner = RecordingRunner::failing("bash -x make.sh");
        let visitor = ChapterVisitor::new(root.path(), &runner);

        let err = visitor
            .visit(&["rules", "preface"], Action::script("rm -rf tmp*; bash -x make.sh; echo done"))
            .unwrap_err();

        match err {
            BookError::CommandFailed { location, command, code } => {
                assert_eq!(location, "rules");
                assert_eq!(command, "bash -x make.sh");
                assert_eq!(code, Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
        // Nothing after the failing command, and no later chapter
        assert_eq!(runner.dirs(), vec!["rules", "rules"]);
    }

    #[test]
    fn test_callback_receives_chapter_context() {
        let root = chapter_root(&["rules", "mako"]);
        let runner = RecordingRunner::default();
        let mut seen = Vec::new();

        ChapterVisitor::new(root.path(), &runner)
            .visit(
                &["rules", "mako"],
                Action::callback(|chapter| {
                    assert!(chapter.dir.is_dir());
                    seen.push(chapter.name.clone());
                    Ok(())
                }),
            )
            .unwrap();

        assert_eq!(seen, vec!["rules", "mako"]);
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_callback_error_propagates() {
        let root = chapter_root(&["rules", "mako"]);
        let runner = RecordingRunner::default();
        let mut visited = 0;

        let err = ChapterVisitor::new(root.path(), &runner)
            .visit(
                &["rules", "mako"],
                Action::callback(|_| {
                    visited += 1;
                    Err(BookError::Io(std::io::Error::other("boom")))
                }),
            )
            .unwrap_err();

        assert!(matches!(err, BookError::Io(_)));
        assert_eq!(visited, 1);
    }

    #[test]
    fn test_rejects_names_outside_chapter_root() {
        let root = chapter_root(&["rules"]);
        let runner = RecordingRunner::default();
        let visitor = ChapterVisitor::new(root.path(), &runner);

        for name in ["", ".", "..", "rules/..", "../rules", "/tmp"] {
            let err = visitor.resolve(name).unwrap_err();
            assert!(
                matches!(err, BookError::InvalidChapterName { name: ref n } if n == name),
                "{name:?} should be rejected"
            );
            assert!(!err.is_missing_directory());
        }
        assert_eq!(visitor.resolve("rules").unwrap().name, "rules");
    }

    #[test]
    fn test_trailing_empty_name_runs_nothing_in_root() {
        let root = chapter_root(&["rules"]);
        let runner = RecordingRunner::default();

        let err = ChapterVisitor::new(root.path(), &runner)
            .visit(&["rules", ""], Action::script("rm -rf tmp*"))
            .unwrap_err();

        assert!(matches!(err, BookError::InvalidChapterName { .. }));
        assert_eq!(runner.dirs(), vec!["rules"]);
    }

    #[test]
    fn test_empty_chapter_list() {
        let root = chapter_root(&[]);
        let runner = RecordingRunner::default();
        ChapterVisitor::new(root.path(), &runner)
            .visit(&[] as &[&str], Action::script("build"))
            .unwrap();
        assert!(runner.calls.borrow().is_empty());
    }
}
