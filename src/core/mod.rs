//! Core types and functionality for Bookpub.
//!
//! This module contains the building blocks every book operation shares:
//! configuration, errors, command execution, and the chapter visitor.

mod action;
mod config;
mod error;
mod executor;
mod patterns;
mod visitor;

pub use action::{split_script, Action, Chapter, ChapterCallback};
pub use config::{
    render, shell_quote, BookConfig, CleanConfig, CommandsConfig, Config, LinksConfig, PackConfig,
    SpellcheckConfig, LOCAL_CONFIG_FILE,
};
pub use error::{BookError, BookResult};
pub use executor::{CommandRunner, DryRunRunner, ExecutionResult, ShellRunner};
pub use patterns::{PatternSet, DEFAULT_IGNORED_FILES};
pub use visitor::{run_checked, ChapterVisitor};
