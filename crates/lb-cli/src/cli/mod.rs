use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `lgb` binary.
#[derive(Debug, Parser)]
#[command(name = "lgb", version, about = "Logbook - personal task-context assistant")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: text, json
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root path (defaults to the current directory)
    #[arg(short, long, global = true)]
    pub project: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            project: self.project.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, GlobalFlags, OutputFormat};
    use crate::cli::root_commands::Workflow;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["lgb", "--format", "json", "--verbose", "apply"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Apply));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["lgb", "apply", "--format", "json", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Apply));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["lgb", "--format", "xml", "apply"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn run_parses_workflow_and_no_cache() {
        let cli = Cli::try_parse_from(["lgb", "run", "briefing", "--no-cache"])
            .expect("cli should parse");
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.workflow, Workflow::Briefing);
        assert!(args.no_cache);
        assert!(args.source.is_empty());
    }

    #[test]
    fn run_collects_repeated_source_filters() {
        let cli = Cli::try_parse_from([
            "lgb", "run", "weekly", "--source", "tracker", "--source", "vcs",
        ])
        .expect("cli should parse");
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(
            args.source,
            vec![
                crate::cli::root_commands::SourceArg::Tracker,
                crate::cli::root_commands::SourceArg::Vcs
            ]
        );
    }

    #[test]
    fn run_rejects_unknown_workflow() {
        let parsed = Cli::try_parse_from(["lgb", "run", "standup"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn task_archive_takes_an_id() {
        let cli =
            Cli::try_parse_from(["lgb", "task", "archive", "billing-migration"])
                .expect("cli should parse");
        let Commands::Task { action } = cli.command else {
            panic!("expected task command");
        };
        let crate::cli::subcommands::TaskCommands::Archive { id } = action else {
            panic!("expected archive subcommand");
        };
        assert_eq!(id, "billing-migration");
    }

    #[test]
    fn review_collects_repeated_decisions() {
        let cli = Cli::try_parse_from([
            "lgb",
            "review",
            "--approve",
            "1",
            "--reject",
            "3",
            "--edit",
            "2=2026-02-10",
        ])
        .expect("cli should parse");
        let Commands::Review(args) = cli.command else {
            panic!("expected review command");
        };
        assert_eq!(args.approve, vec![1]);
        assert_eq!(args.reject, vec![3]);
        assert_eq!(args.edit, vec!["2=2026-02-10".to_string()]);
        assert!(!args.approve_all_auto);
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["lgb", "--project", "/tmp/demo", "apply"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.project.as_deref(), Some("/tmp/demo"));
    }
}
