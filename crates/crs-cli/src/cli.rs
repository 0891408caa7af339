use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// How the final run summary is printed on stdout.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Raw,
}

/// Top-level CLI parser for the `crs-mirror` binary.
///
/// Without a subcommand it mirrors. Every option overrides the
/// corresponding configuration value.
#[derive(Debug, Parser)]
#[command(
    name = "crs-mirror",
    version,
    about = "Mirror code-review-scores directories from a GitLab group tree"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Starting group, by full path or numeric id
    #[arg(short, long)]
    pub group: Option<String>,

    /// Local directory the mirror is written under
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Branch, tag or commit to read (defaults to each project's default branch)
    #[arg(long = "ref", value_name = "REF")]
    pub git_ref: Option<String>,

    /// GitLab API base URL, e.g. https://gitlab.example.com/api/v4
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Download files even when a non-empty local copy exists
    #[arg(long)]
    pub force: bool,

    /// Walk and report, but fetch and write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Summary format: text, json, raw
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Quiet mode (errors only, no spinner)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Read environment variables from this file instead of ./.env
    #[arg(long, global = true, value_name = "PATH")]
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract scores from mirrored review files into JSON and average them
    Extract(ExtractArgs),
}

#[derive(Debug, Default, Args)]
pub struct ExtractArgs {
    /// Directory holding the mirrored reviews (defaults to the mirror root)
    #[arg(short, long, value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Directory the JSON files are written under
    /// (defaults to <mirror root>/extracted_scores)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Command, OutputFormat};

    #[test]
    fn clap_command_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_leave_config_untouched() {
        let cli = Cli::try_parse_from(["crs-mirror"]).expect("cli should parse");

        assert!(cli.group.is_none());
        assert!(cli.output.is_none());
        assert!(cli.git_ref.is_none());
        assert!(cli.api_url.is_none());
        assert!(!cli.force);
        assert!(!cli.dry_run);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_every_option() {
        let cli = Cli::try_parse_from([
            "crs-mirror",
            "--group",
            "otc",
            "--output",
            "mirror",
            "--ref",
            "release/1.0",
            "--api-url",
            "https://gitlab.example.com/api/v4",
            "--force",
            "--dry-run",
            "--format",
            "json",
            "--verbose",
            "--env-file",
            "ci.env",
        ])
        .expect("cli should parse");

        assert_eq!(cli.group.as_deref(), Some("otc"));
        assert_eq!(cli.output, Some("mirror".into()));
        assert_eq!(cli.git_ref.as_deref(), Some("release/1.0"));
        assert_eq!(
            cli.api_url.as_deref(),
            Some("https://gitlab.example.com/api/v4")
        );
        assert!(cli.force);
        assert!(cli.dry_run);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
        assert_eq!(cli.env_file, Some("ci.env".into()));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["crs-mirror", "-q", "-v"]).is_err());
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["crs-mirror", "--format", "table"]).is_err());
    }

    #[test]
    fn parses_extract_subcommand() {
        let cli = Cli::try_parse_from([
            "crs-mirror",
            "extract",
            "--input",
            "docs",
            "-o",
            "scores",
            "--format",
            "json",
            "-q",
        ])
        .expect("cli should parse");

        let Some(Command::Extract(args)) = cli.command else {
            panic!("expected extract subcommand");
        };
        assert_eq!(args.input, Some("docs".into()));
        assert_eq!(args.output, Some("scores".into()));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.quiet);
    }

    #[test]
    fn extract_defaults_to_config_paths() {
        let cli = Cli::try_parse_from(["crs-mirror", "--output", "mirror", "extract"])
            .expect("cli should parse");

        let Some(Command::Extract(args)) = cli.command else {
            panic!("expected extract subcommand");
        };
        assert!(args.input.is_none());
        assert!(args.output.is_none());
        assert_eq!(cli.output, Some("mirror".into()));
    }

    #[test]
    fn extract_rejects_mirror_only_flags() {
        assert!(Cli::try_parse_from(["crs-mirror", "extract", "--dry-run"]).is_err());
    }
}
