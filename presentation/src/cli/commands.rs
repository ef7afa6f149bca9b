//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for council results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full formatted output with all stages
    Full,
    /// Only the final synthesis
    Synthesis,
    /// JSON output
    Json,
}

/// CLI arguments for cxo-council
#[derive(Parser, Debug)]
#[command(name = "cxo-council")]
#[command(author, version, about = "CxO Council - executive review of plans and specifications")]
#[command(long_about = r#"
CxO Council runs a document through a four-stage executive deliberation.

1. Independent Review: every reviewer (CPO, CTO, COO, CISO) reads the document
2. Cross-Domain Questions: reviewers question each other
3. Targeted Responses: only reviewers who were asked something answer
4. Synthesis: the synthesizer seat (CEO by default) writes the decision

Configuration files are loaded from (in priority order):
1. COUNCIL_* environment variables
2. --config <path>     Explicit config file
3. ./council.toml      Project-level config
4. ~/.config/cxo-council/config.toml   Global config

The OpenRouter API key is read from OPENROUTER_API_KEY or COUNCIL_OPENROUTER_API_KEY.

Example:
  cxo-council review plan.md
  cxo-council review plan.md --output full -v
  cxo-council show-config
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a document through the council
    Review(ReviewArgs),
    /// Show configuration sources and the effective configuration
    ShowConfig,
}

#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// Markdown document to review
    pub document: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "synthesis")]
    pub output: OutputFormat,

    /// Webhook URL notified when the job completes or fails
    #[arg(long, value_name = "URL")]
    pub webhook: Option<String>,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Do not write `<stem>-synthesis.md`
    #[arg(long)]
    pub no_save: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_defaults() {
        let cli = Cli::parse_from(["cxo-council", "review", "plan.md"]);
        let Command::Review(args) = cli.command else {
            panic!("expected review");
        };
        assert_eq!(args.document, PathBuf::from("plan.md"));
        assert_eq!(args.output, OutputFormat::Synthesis);
        assert!(!args.quiet);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "cxo-council",
            "review",
            "plan.md",
            "-vv",
            "--config",
            "team.toml",
            "--output",
            "json",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("team.toml")));
        let Command::Review(args) = cli.command else {
            panic!("expected review");
        };
        assert_eq!(args.output, OutputFormat::Json);
    }

    #[test]
    fn test_show_config() {
        let cli = Cli::parse_from(["cxo-council", "show-config"]);
        assert!(matches!(cli.command, Command::ShowConfig));
    }
}
