use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI options
#[derive(Parser, Debug)]
#[command(
    name = "ggpt",
    version,
    about = "LLM-assisted code review, docstrings and variable naming for Git changes"
)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Model name to use (otherwise GGPT_MODEL, the config file, or gpt-4o-mini)
    #[arg(long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask the model to review a diff
    Review(DiffArgs),

    /// Ask the model to write documentation comments for a diff
    Docstring(DiffArgs),

    /// Ask the model for a variable name matching a description
    Naming {
        /// What the variable holds
        prompt: String,

        /// OpenAI API key (otherwise uses OPENAI_API_KEY env var)
        #[arg(long)]
        api_key: Option<String>,
    },

    #[command(external_subcommand)]
    External(Vec<String>),
}

/// Options shared by the diff-based subcommands.
#[derive(Args, Debug, Default)]
pub struct DiffArgs {
    /// OpenAI API key (otherwise uses OPENAI_API_KEY env var)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Path to the Git repository (defaults to the current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Use the changes introduced by this commit
    #[arg(long, conflicts_with = "staged")]
    pub hash: Option<String>,

    /// Use only staged changes
    #[arg(long)]
    pub staged: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_review_options() {
        let cli = Cli::try_parse_from(["ggpt", "-vv", "review", "--path", "/tmp/repo", "--staged"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Review(args) => {
                assert_eq!(args.path, Some(PathBuf::from("/tmp/repo")));
                assert!(args.staged);
                assert_eq!(args.hash, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn hash_and_staged_conflict() {
        let err = Cli::try_parse_from(["ggpt", "docstring", "--hash", "abc123", "--staged"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn naming_takes_positional_prompt() {
        let cli = Cli::try_parse_from(["ggpt", "naming", "number of retries", "--api-key", "k"]).unwrap();
        match cli.command {
            Command::Naming { prompt, api_key } => {
                assert_eq!(prompt, "number of retries");
                assert_eq!(api_key.as_deref(), Some("k"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_subcommand_is_captured() {
        let cli = Cli::try_parse_from(["ggpt", "explain", "--hash", "abc"]).unwrap();
        match cli.command {
            Command::External(args) => assert_eq!(args, ["explain", "--hash", "abc"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
