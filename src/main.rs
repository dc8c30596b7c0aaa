//! Bookpub - publishing chores for multi-chapter books.
//!
//! Cleans, compiles, links, spellchecks, and packs the chapters of a book
//! project from the book directory.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bookpub::core::{CommandRunner, Config, DryRunRunner, ShellRunner};
use bookpub::{Book, PackOptions};

/// Publishing chores for multi-chapter book projects
#[derive(Parser)]
#[command(name = "bookpub")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Dry run mode - show what would be executed without running
    #[arg(long, global = true)]
    dry_run: bool,

    /// Config file (defaults to .bookpub.toml, then the user config)
    #[arg(long, global = true, env = "BOOKPUB_CONFIG")]
    config: Option<PathBuf>,

    /// Book directory (defaults to the current directory)
    #[arg(short = 'C', long, global = true)]
    book_dir: Option<PathBuf>,

    /// Chapters to visit, comma separated (overrides the configured list)
    #[arg(long, global = true, value_delimiter = ',')]
    chapters: Option<Vec<String>>,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove all files that can be regenerated
    Clean,

    /// Compile all chapters as stand-alone documents
    Compile,

    /// Link fig-*, src-*, mov-* and exer-* directories of all chapters
    Links,

    /// Spellcheck every chapter
    Spellcheck,

    /// Pack example sources of all chapters into a tarball
    Pack {
        /// Directory tree to collect sources in
        #[arg(long)]
        root: Option<String>,

        /// Archive to create
        #[arg(long)]
        tarfile: Option<String>,
    },

    /// List configured chapters and whether their directories exist
    Chapters {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Show configuration
    Config {
        /// Show config directory path
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    match &cli.command {
        Commands::Clean => open_book(&cli)?.clean()?,
        Commands::Compile => open_book(&cli)?.compile_chapters()?,
        Commands::Links => open_book(&cli)?.make_links(None)?,
        Commands::Spellcheck => open_book(&cli)?.spellcheck()?,
        Commands::Pack { root, tarfile } => {
            cmd_pack(&open_book(&cli)?, root.as_deref(), tarfile.as_deref())?;
        }
        Commands::Chapters { format } => cmd_chapters(&open_book(&cli)?, *format)?,
        Commands::Config { path } => cmd_config(&cli, *path)?,
        Commands::Completions { shell } => cmd_completions(*shell),
    }

    Ok(())
}

/// Build the book from the command-line options.
fn open_book(cli: &Cli) -> Result<Book<Box<dyn CommandRunner>>> {
    let dir = match &cli.book_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load(&dir)?,
    };

    let runner: Box<dyn CommandRunner> =
        if cli.dry_run { Box::new(DryRunRunner) } else { Box::new(ShellRunner::new()) };

    debug!(dir = %dir.display(), dry_run = cli.dry_run, "opening book");

    let mut book = Book::new(dir, config, runner).dry_run(cli.dry_run);
    if let Some(chapters) = &cli.chapters {
        book = book.with_chapters(chapters.clone());
    }
    Ok(book)
}

/// Pack sources, with command-line overrides for the pack settings.
fn cmd_pack<R: CommandRunner>(
    book: &Book<R>,
    root: Option<&str>,
    tarfile: Option<&str>,
) -> Result<()> {
    let mut options = PackOptions::from_config(&book.config().pack);
    if let Some(root) = root {
        options = options.root(root);
    }
    if let Some(tarfile) = tarfile {
        options = options.tarfile(tarfile);
    }

    book.pack_src(&options)?;
    Ok(())
}

/// List chapters and their directories.
fn cmd_chapters<R: CommandRunner>(book: &Book<R>, format: Format) -> Result<()> {
    let status = book.chapter_status();

    match format {
        Format::Json => {
            let json = serde_json::to_string_pretty(&status)?;
            println!("{json}");
        }
        Format::Text => {
            for chapter in &status {
                let mark = if chapter.exists { "ok" } else { "missing" };
                println!("{:<8} {} ({})", mark, chapter.name, chapter.path.display());
            }
            println!("\nTotal: {} chapters", status.len());
        }
    }

    Ok(())
}

/// Show configuration.
fn cmd_config(cli: &Cli, show_path: bool) -> Result<()> {
    if show_path {
        if let Some(path) = Config::config_dir() {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let book = open_book(cli)?;
    let toml = toml::to_string_pretty(book.config())?;
    println!("{toml}");

    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, bookpub::APP_NAME, &mut io::stdout());
}
