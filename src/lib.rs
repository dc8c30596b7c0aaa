//! # Bookpub
//!
//! Publishing chores for multi-chapter book projects.
//!
//! A book lives next to a `chapter` directory holding one subdirectory per
//! chapter. Bookpub visits those chapters in order and cleans, compiles, or
//! spellchecks each one with external tools, links chapter subdirectories
//! into the book directory, and packs example sources into a tarball.
//!
//! ## Quick Start
//!
//! ```bash
//! # Build every chapter as a stand-alone PDF
//! bookpub compile
//!
//! # Link fig-*, src-*, mov-* and exer-* directories
//! bookpub links
//!
//! # Publish the example programs
//! bookpub pack --tarfile book-examples.tar.gz
//! ```
//!
//! Any failing command or missing chapter directory aborts the whole run.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::uninlined_format_args)]

pub mod core;
pub mod tasks;

// Re-export commonly used types
pub use self::core::{
    Action, BookError, BookResult, Chapter, ChapterVisitor, CommandRunner, Config, DryRunRunner,
    ExecutionResult, ShellRunner,
};
pub use tasks::{Book, ChapterStatus, PackOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "bookpub";
