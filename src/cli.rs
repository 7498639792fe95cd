//! CLI argument definitions using clap derive macros.

use clap::{Parser, ValueEnum};

use url2pdf_core::{DEFAULT_CONCURRENCY, DEFAULT_TASK_TIMEOUT_SECS};

/// Convert web pages into PDF documents.
///
/// File mode renders a JSON manifest mapping names to URLs (or nested
/// name-to-URL mappings) into a matching directory tree of PDFs. Direct mode
/// renders a single URL to the given output path. Destinations that already
/// exist are skipped, so re-running a partially failed conversion only
/// renders the missing pages.
#[derive(Parser, Debug)]
#[command(name = "url2pdf")]
#[command(author, version, about)]
pub struct Args {
    /// Operation mode (f for file, d for direct)
    #[arg(short, long, value_enum)]
    pub mode: Mode,

    /// Manifest path (file mode) or source URL (direct mode)
    pub input: String,

    /// Destination PDF path (direct mode only)
    pub output: Option<String>,

    /// Maximum concurrent page renders (1-16)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=16))]
    pub concurrency: u8,

    /// Per-page render timeout in seconds (1-600)
    #[arg(short = 't', long, default_value_t = DEFAULT_TASK_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=600))]
    pub timeout: u64,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Operation mode, keeping the original one-letter CLI surface.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Bulk conversion from a JSON manifest
    #[value(name = "f")]
    File,
    /// Single URL conversion
    #[value(name = "d")]
    Direct,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_file_mode_parses() {
        let args = Args::try_parse_from(["url2pdf", "--mode", "f", "courses.json"]).unwrap();
        assert_eq!(args.mode, Mode::File);
        assert_eq!(args.input, "courses.json");
        assert!(args.output.is_none());
    }

    #[test]
    fn test_cli_direct_mode_parses() {
        let args = Args::try_parse_from([
            "url2pdf",
            "--mode",
            "d",
            "https://example.com",
            "output.pdf",
        ])
        .unwrap();
        assert_eq!(args.mode, Mode::Direct);
        assert_eq!(args.input, "https://example.com");
        assert_eq!(args.output.as_deref(), Some("output.pdf"));
    }

    #[test]
    fn test_cli_mode_short_flag() {
        let args = Args::try_parse_from(["url2pdf", "-m", "f", "courses.json"]).unwrap();
        assert_eq!(args.mode, Mode::File);
    }

    #[test]
    fn test_cli_defaults() {
        let args = Args::try_parse_from(["url2pdf", "-m", "f", "courses.json"]).unwrap();
        assert_eq!(args.concurrency, 4); // DEFAULT_CONCURRENCY
        assert_eq!(args.timeout, 120); // DEFAULT_TASK_TIMEOUT_SECS
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_missing_mode_rejected() {
        let result = Args::try_parse_from(["url2pdf", "courses.json"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_invalid_mode_rejected() {
        let result = Args::try_parse_from(["url2pdf", "-m", "x", "courses.json"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        // --help causes early exit, so we check it returns an error with Help kind
        let result = Args::try_parse_from(["url2pdf", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let result = Args::try_parse_from(["url2pdf", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_concurrency_flags() {
        let args =
            Args::try_parse_from(["url2pdf", "-m", "f", "courses.json", "-c", "8"]).unwrap();
        assert_eq!(args.concurrency, 8);

        let args = Args::try_parse_from([
            "url2pdf",
            "-m",
            "f",
            "courses.json",
            "--concurrency",
            "16",
        ])
        .unwrap();
        assert_eq!(args.concurrency, 16);
    }

    #[test]
    fn test_cli_concurrency_zero_rejected() {
        let result = Args::try_parse_from(["url2pdf", "-m", "f", "courses.json", "-c", "0"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_concurrency_over_max_rejected() {
        let result = Args::try_parse_from(["url2pdf", "-m", "f", "courses.json", "-c", "17"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_timeout_flags() {
        let args =
            Args::try_parse_from(["url2pdf", "-m", "f", "courses.json", "-t", "30"]).unwrap();
        assert_eq!(args.timeout, 30);

        let args =
            Args::try_parse_from(["url2pdf", "-m", "f", "courses.json", "--timeout", "600"])
                .unwrap();
        assert_eq!(args.timeout, 600);
    }

    #[test]
    fn test_cli_timeout_zero_rejected() {
        let result = Args::try_parse_from(["url2pdf", "-m", "f", "courses.json", "-t", "0"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["url2pdf", "-m", "f", "courses.json", "-v"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["url2pdf", "-m", "f", "courses.json", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["url2pdf", "-m", "f", "courses.json", "-q"]).unwrap();
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_combined_all_flags() {
        let args = Args::try_parse_from([
            "url2pdf", "-m", "d", "https://example.com", "out.pdf", "-c", "2", "-t", "60", "-q",
        ])
        .unwrap();
        assert_eq!(args.mode, Mode::Direct);
        assert_eq!(args.concurrency, 2);
        assert_eq!(args.timeout, 60);
        assert!(args.quiet);
    }
}
