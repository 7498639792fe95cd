//! CLI entry point for the url2pdf tool.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use tracing::{debug, info, warn};

use url2pdf_core::{
    ChromiumSession, ERROR_LOG_FILE, RenderEngine, TaskQueue, build_direct, build_from_manifest,
    write_error_log,
};

mod cli;

use cli::{Args, Mode};

/// Parses CLI arguments, mapping usage errors to exit code 1.
///
/// Help and version requests keep clap's exit code 0; every other parse
/// failure exits 1 per the CLI contract (clap's own default is 2).
fn parse_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                let _ = err.print();
                std::process::exit(1);
            }
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = parse_args();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    // Build the task list
    let build = match args.mode {
        Mode::File => build_from_manifest(Path::new(&args.input), Path::new(""))?,
        Mode::Direct => {
            let Some(output) = args.output.as_deref() else {
                anyhow::bail!(
                    "direct mode requires an output path: url2pdf --mode d <url> <output.pdf>"
                );
            };
            build_direct(&args.input, Path::new(output))?
        }
    };

    for skipped in &build.skipped {
        info!(path = %skipped.display(), "skipping existing file");
    }

    if build.is_empty() {
        info!("no pages to convert");
        return Ok(());
    }

    info!(tasks = build.len(), "starting conversion");

    // Establishing the browser session is the only fatal acquisition point;
    // everything after runs to completion with per-task failure isolation.
    let session = Arc::new(ChromiumSession::launch().await?);
    let engine = RenderEngine::new(
        usize::from(args.concurrency),
        Duration::from_secs(args.timeout),
    )?;

    let outcome = engine
        .process_queue(session, TaskQueue::new(build.tasks))
        .await?;

    if write_error_log(&outcome.failures, Path::new(ERROR_LOG_FILE))? {
        warn!(
            failures = outcome.failures.len(),
            file = ERROR_LOG_FILE,
            "error report saved"
        );
    }

    info!(
        completed = outcome.stats.completed(),
        failed = outcome.stats.failed(),
        total = outcome.stats.total(),
        "conversion complete"
    );

    Ok(())
}
