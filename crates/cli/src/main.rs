//! cdiff command-line tool.
//!
//! Two subcommands: `diff` streams the combined diff of one origin file
//! against several target files, and `filter` rewrites the
//! merge-conflict blocks of a file (or standard input) into the same
//! combined-diff view.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cdiff_core::{combined_diff_to_writer, rewrite_conflicts, Filtered, DEFAULT_MARKER_SIZE};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Combined diffs of one origin against many targets.
#[derive(Parser, Debug)]
#[command(
    name = "cdiff",
    version,
    about = "Combined diffs of one origin against many targets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show which lines each target removed or added relative to an
    /// origin.
    Diff {
        /// The origin (base) file.
        origin: PathBuf,

        /// Target files, one marker column each in the output.
        #[arg(required = true)]
        targets: Vec<PathBuf>,
    },

    /// Rewrite merge-conflict blocks as combined diffs of ours/theirs
    /// against their base.
    Filter {
        /// Send results to standard output instead of rewriting the
        /// files.
        #[arg(short = 'p', long = "stdout")]
        to_stdout: bool,

        /// Conflict marker size.
        #[arg(short, long, default_value_t = DEFAULT_MARKER_SIZE)]
        marker_size: usize,

        /// Files to filter; reads standard input when none are given.
        files: Vec<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Diff { origin, targets } => cmd_diff(&origin, &targets),
        Commands::Filter {
            to_stdout,
            marker_size,
            files,
        } => cmd_filter(to_stdout, marker_size, &files),
    }
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn cmd_diff(origin: &Path, targets: &[PathBuf]) -> Result<()> {
    let origin_data = read_input(origin)?;

    let mut target_data = Vec::with_capacity(targets.len());
    for path in targets {
        target_data.push(read_input(path)?);
    }
    let target_refs: Vec<&[u8]> = target_data.iter().map(|t| t.as_slice()).collect();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    combined_diff_to_writer(&origin_data, &target_refs, &mut out)
        .context("combined diff failed")?;
    out.flush().context("failed to flush standard output")?;

    Ok(())
}

fn cmd_filter(to_stdout: bool, marker_size: usize, files: &[PathBuf]) -> Result<()> {
    if to_stdout && files.len() > 1 {
        anyhow::bail!("--stdout works only with a single file argument");
    }

    // No file arguments: read standard input, which implies --stdout.
    let stdin_only = [PathBuf::from("-")];
    let files = if files.is_empty() { &stdin_only[..] } else { files };

    for path in files {
        filter_one(path, marker_size, to_stdout)?;
    }

    Ok(())
}

/// Filter a single file, or standard input for `-`.
///
/// Binary content and malformed conflict markers are recoverable at file
/// granularity: the content is left untouched and a warning names the
/// file.
fn filter_one(path: &Path, marker_size: usize, to_stdout: bool) -> Result<()> {
    let from_stdin = path == Path::new("-");
    let data = read_input(path)?;

    if buffer_is_binary(&data) {
        warn!(file = %path.display(), "skipping binary file");
        return Ok(());
    }

    let rewritten = match rewrite_conflicts(&data, marker_size) {
        Ok(Filtered::Rewritten(bytes)) => Some(bytes),
        Ok(Filtered::Unchanged) => None,
        Err(err) => {
            warn!(file = %path.display(), %err, "no valid conflict blocks, leaving content unchanged");
            None
        }
    };

    if to_stdout || from_stdin {
        let bytes = rewritten.as_deref().unwrap_or(&data);
        io::stdout()
            .write_all(bytes)
            .context("failed to write to standard output")?;
    } else if let Some(bytes) = rewritten {
        std::fs::write(path, bytes)
            .with_context(|| format!("could not write to `{}`", path.display()))?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Utilities
// ---------------------------------------------------------------------------

/// Bytes sniffed for NUL when deciding whether content is binary.
const BINARY_SNIFF_LIMIT: usize = 8000;

fn buffer_is_binary(data: &[u8]) -> bool {
    data[..data.len().min(BINARY_SNIFF_LIMIT)].contains(&0)
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read standard input")?;
        Ok(buf)
    } else {
        std::fs::read(path).with_context(|| format!("can't read `{}`", path.display()))
    }
}
