//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use bookpub::{CommandRunner, Config, ExecutionResult};
use tempfile::TempDir;

/// Records commands instead of running them; fails those listed in `failing`.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub calls: RefCell<Vec<(String, PathBuf)>>,
    pub failing: Vec<String>,
}

impl RecordingRunner {
    pub fn failing(command: &str) -> Self {
        Self { failing: vec![command.to_string()], ..Self::default() }
    }

    /// Commands run, in order.
    pub fn commands(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(c, _)| c.clone()).collect()
    }

    /// Last path component of the directory each command ran in.
    pub fn dirs(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|(_, d)| d.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &str, dir: &Path) -> anyhow::Result<ExecutionResult> {
        self.calls.borrow_mut().push((command.to_string(), dir.to_path_buf()));
        let code = i32::from(self.failing.iter().any(|f| f == command));
        Ok(ExecutionResult::with_code(Some(code)))
    }
}

/// A scratch project: `<tmp>/book` next to `<tmp>/chapter/<name>` directories.
pub struct Project {
    pub temp: TempDir,
}

impl Project {
    pub fn new(chapters: &[&str]) -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("book")).unwrap();
        for name in chapters {
            fs::create_dir_all(temp.path().join("chapter").join(name)).unwrap();
        }
        Self { temp }
    }

    pub fn book_dir(&self) -> PathBuf {
        self.temp.path().join("book")
    }

    pub fn chapter_dir(&self, name: &str) -> PathBuf {
        self.temp.path().join("chapter").join(name)
    }

    /// Write a file below a chapter directory, creating parents.
    pub fn write_chapter_file(&self, chapter: &str, relative: &str, content: &str) {
        let path = self.chapter_dir(chapter).join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Default config restricted to `chapters`.
    pub fn config(chapters: &[&str]) -> Config {
        let mut config = Config::default();
        config.book.chapters = chapters.iter().map(ToString::to_string).collect();
        config
    }
}
