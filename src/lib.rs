//! dupescan - Interactive Duplicate File Scanner
//!
//! A CLI application that finds files with identical content using
//! SHA-256 digests and walks the operator through each duplicate with a
//! delete / rename / skip decision. The first-discovered copy in each
//! set is always kept.

pub mod actions;
pub mod cli;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod resolver;
pub mod scanner;

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};

use cli::Cli;
use error::ExitCode;
use resolver::Resolver;
use scanner::WalkerConfig;

/// Run the application with real console streams.
///
/// Initializes logging, wires stdin/stdout into the resolver, and
/// returns the process exit code.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let resolver = Resolver::new(stdin.lock(), stdout.lock());
    run_with_io(cli, resolver)
}

/// Run the scan-and-resolve workflow over injected streams.
///
/// Split out from [`run_app`] so the whole workflow can be driven by
/// scripted input in tests.
pub fn run_with_io<R: BufRead, W: Write>(
    cli: Cli,
    mut resolver: Resolver<R, W>,
) -> Result<ExitCode> {
    // Root comes from the CLI or a one-time interactive prompt.
    let root = match cli.path {
        Some(path) => path,
        None => match resolver.prompt_root()? {
            Some(path) => path,
            None => bail!("No directory supplied"),
        },
    };

    scanner::validate_root(&root)
        .with_context(|| format!("Cannot scan '{}'", root.display()))?;

    let config = WalkerConfig::new(
        cli.skip_hidden,
        cli.min_size,
        cli.max_size,
        cli.ignore_patterns,
    );

    resolver.say(&format!(
        "Scanning {} and computing digests...",
        root.display()
    ))?;

    // The whole tree is scanned before any resolution begins.
    let (groups, summary) = duplicates::scan_tree(&root, &config);

    if groups.is_empty() {
        resolver.say("No duplicate files found.")?;
        return Ok(if summary.is_partial() {
            ExitCode::PartialSuccess
        } else {
            ExitCode::NoDuplicates
        });
    }

    resolver.say(&format!(
        "Found {} set(s) of duplicate files.",
        groups.len()
    ))?;

    let report = resolver.resolve_all(&groups)?;
    resolver.print_summary(&report)?;

    Ok(if summary.is_partial() || report.has_failures() {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    })
}
