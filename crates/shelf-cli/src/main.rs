#![forbid(unsafe_code)]

mod cmd;
mod context;
mod output;
mod tui;

use clap::{CommandFactory, Parser, Subcommand};
use context::Context;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use shelf_core::config;
use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "shelf: personal book catalog backed by a volumes search API",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Catalog database path (overrides SHELF_DB and config).
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    /// The TUI owns the terminal, so its logs go to a file instead of stderr.
    const fn launches_tui(&self) -> bool {
        matches!(self.command, None | Some(Commands::Tui))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Remote",
        about = "Search the volumes API",
        long_about = "Search the volumes API by title, author and/or ISBN and print the flattened results.",
        after_help = "EXAMPLES:\n    # Search by title\n    shelf search --title frankenstein\n\n    # Combine fields and save the first two results\n    shelf search --title dune --author herbert --save 1 2\n\n    # Emit machine-readable output\n    shelf search --isbn 0141439475 --format json"
    )]
    Search(cmd::search::SearchArgs),

    #[command(
        next_help_heading = "Remote",
        about = "Look up an ISBN and save it",
        long_about = "Search the volumes API for one ISBN and save the first match to the catalog.",
        after_help = "EXAMPLES:\n    # Save a book by ISBN\n    shelf lookup 978-0-14-143947-1\n\n    # File it under a genre\n    shelf lookup 0141439475 --genre gothic"
    )]
    Lookup(cmd::lookup::LookupArgs),

    #[command(
        next_help_heading = "Catalog",
        about = "Add a book by hand",
        after_help = "EXAMPLES:\n    shelf add --title \"Frankenstein\" --author \"Mary Shelley\" --year 1818"
    )]
    Add(cmd::add::AddArgs),

    #[command(
        next_help_heading = "Catalog",
        about = "List saved books",
        long_about = "List saved books with optional text/genre filters and sort order.",
        after_help = "EXAMPLES:\n    # Everything, by title\n    shelf list\n\n    # Gothic novels, newest first\n    shelf list --genre gothic --sort added"
    )]
    List(cmd::list::ListArgs),

    #[command(next_help_heading = "Catalog", about = "Show one saved book")]
    Show(cmd::show::ShowArgs),

    #[command(next_help_heading = "Catalog", about = "Remove a saved book")]
    Remove(cmd::remove::RemoveArgs),

    /// Manage genres
    #[command(subcommand)]
    Genre(cmd::genre::GenreCommand),

    #[command(next_help_heading = "Genres", about = "File a book under a genre")]
    Tag(cmd::genre::TagArgs),

    #[command(next_help_heading = "Genres", about = "Clear a book's genre")]
    Untag(cmd::genre::UntagArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Show effective configuration",
        long_about = "Print the effective configuration and the resolved config, catalog and log paths."
    )]
    Config,

    #[command(next_help_heading = "Setup", about = "Generate shell completions")]
    Completions(cmd::completions::CompletionsArgs),

    #[command(
        next_help_heading = "Interactive",
        about = "Open the terminal UI (default)"
    )]
    Tui,
}

fn init_tracing(verbose: bool, to_file: bool) {
    let filter = EnvFilter::try_from_env("SHELF_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "shelf=debug,info"
        } else {
            "shelf=info,warn"
        })
    });

    let format = env::var("SHELF_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let writer = if to_file {
        log_file_writer()
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(writer))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_ansi(!to_file).with_writer(writer))
                .init();
        }
    }
}

fn open_log_file(path: &Path) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Called before the terminal enters raw mode, so a failure can still be
/// reported on stderr.
fn log_file_writer() -> BoxMakeWriter {
    let path = config::log_path();
    match open_log_file(&path) {
        Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
        Err(err) => {
            eprintln!(
                "warning: cannot open log file {}: {err}; TUI logging disabled",
                path.display()
            );
            BoxMakeWriter::new(std::io::sink)
        }
    }
}

fn dispatch(command: Option<Commands>, ctx: &Context) -> anyhow::Result<()> {
    match command {
        Some(Commands::Search(args)) => cmd::search::run_search(&args, ctx),
        Some(Commands::Lookup(args)) => cmd::lookup::run_lookup(&args, ctx),
        Some(Commands::Add(args)) => cmd::add::run_add(args, ctx),
        Some(Commands::List(args)) => cmd::list::run_list(&args, ctx),
        Some(Commands::Show(args)) => cmd::show::run_show(&args, ctx),
        Some(Commands::Remove(args)) => cmd::remove::run_remove(&args, ctx),
        Some(Commands::Genre(command)) => cmd::genre::run_genre(&command, ctx),
        Some(Commands::Tag(args)) => cmd::genre::run_tag(&args, ctx),
        Some(Commands::Untag(args)) => cmd::genre::run_untag(&args, ctx),
        Some(Commands::Config) => cmd::config::run_config(ctx),
        Some(Commands::Completions(args)) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
        Some(Commands::Tui) | None => tui::run(ctx),
    }
}

fn fail(mode: OutputMode, err: &anyhow::Error) -> ExitCode {
    tracing::debug!(error = %format!("{err:#}"), "command failed");
    if render_error(mode, &CliError::from(err)).is_err() {
        eprintln!("error: {err:#}");
    }
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.launches_tui());

    let ctx = match Context::load(cli.db.as_deref(), cli.format, cli.json) {
        Ok(ctx) => ctx,
        Err(err) => return fail(resolve_output_mode(cli.format, cli.json, None), &err),
    };

    match dispatch(cli.command, &ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(ctx.output, &err),
    }
}
