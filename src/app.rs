use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::cli_args::{Cli, Command, DiffArgs};
use crate::config::{API_KEY_ENV, Config, Overrides};
use crate::console::Console;
use crate::error::GgptError;
use crate::git::{self, DiffSource};
use crate::llm::LlmClient;
use crate::setup;

pub const WAITING_MESSAGE: &str = "Waiting for GPT response...";
pub const RESPONSE_TITLE: &str = "Response";
const API_KEYS_URL: &str = "https://platform.openai.com/account/api-keys";

/// The operations ggpt knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Review,
    Docstring,
    Naming,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Review => "review",
            CommandKind::Docstring => "docstring",
            CommandKind::Naming => "naming",
        }
    }
}

/// Everything one run needs to know, fixed once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: CommandKind,
    pub source: DiffSource,
    pub path: PathBuf,
    pub user_prompt: Option<String>,
    pub api_key: Option<String>,
}

impl Invocation {
    /// Translate parsed CLI arguments, defaulting the path to the current directory.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        match &cli.command {
            Command::Review(args) => Self::for_diff(CommandKind::Review, args),
            Command::Docstring(args) => Self::for_diff(CommandKind::Docstring, args),
            Command::Naming { prompt, api_key } => Ok(Invocation {
                command: CommandKind::Naming,
                source: DiffSource::WorkingTree,
                path: current_dir()?,
                user_prompt: Some(prompt.clone()),
                api_key: api_key.clone(),
            }),
            Command::External(args) => Err(GgptError::UnsupportedCommand {
                name: args.first().cloned().unwrap_or_default(),
            }
            .into()),
        }
    }

    fn for_diff(command: CommandKind, args: &DiffArgs) -> Result<Self> {
        let source = diff_source(args.hash.as_deref(), args.staged)?;
        let path = match &args.path {
            Some(p) => p.clone(),
            None => current_dir()?,
        };

        Ok(Invocation {
            command,
            source,
            path,
            user_prompt: None,
            api_key: args.api_key.clone(),
        })
    }
}

fn current_dir() -> Result<PathBuf> {
    env::current_dir().context("failed to determine the current directory")
}

/// Map the mutually exclusive `--hash` / `--staged` flags onto a [`DiffSource`].
/// A blank hash counts as no hash.
pub fn diff_source(hash: Option<&str>, staged: bool) -> Result<DiffSource, GgptError> {
    let hash = hash.filter(|h| !h.trim().is_empty());
    match (hash, staged) {
        (Some(_), true) => Err(GgptError::ConflictingDiffSources),
        (Some(h), false) => Ok(DiffSource::Commit(h.to_string())),
        (None, true) => Ok(DiffSource::Staged),
        (None, false) => Ok(DiffSource::WorkingTree),
    }
}

/// Dispatches one invocation to the diff extractor and the LLM client.
pub struct Ggpt<'a> {
    invocation: Invocation,
    max_diff_length: usize,
    client: &'a dyn LlmClient,
    console: &'a dyn Console,
}

impl<'a> Ggpt<'a> {
    pub fn new(
        invocation: Invocation,
        max_diff_length: usize,
        client: &'a dyn LlmClient,
        console: &'a dyn Console,
    ) -> Self {
        Ggpt {
            invocation,
            max_diff_length,
            client,
            console,
        }
    }

    /// Run the command and return the text to show.
    pub fn execute(&self) -> Result<String> {
        log::info!(
            "Running {} in {}",
            self.invocation.command.as_str(),
            self.invocation.path.display()
        );

        let _status = self.console.show_status(WAITING_MESSAGE);

        match self.invocation.command {
            CommandKind::Review => self.run_review(),
            CommandKind::Docstring => self.run_docstring(),
            CommandKind::Naming => self.run_naming(),
        }
    }

    fn diff(&self) -> Result<String> {
        git::get_diff(
            &self.invocation.path,
            &self.invocation.source,
            self.max_diff_length,
        )
    }

    fn run_review(&self) -> Result<String> {
        let diff = self.diff()?;
        self.client.request_review(&diff)
    }

    fn run_docstring(&self) -> Result<String> {
        let diff = self.diff()?;
        self.client.request_docstring(&diff)
    }

    fn run_naming(&self) -> Result<String> {
        let prompt = self
            .invocation
            .user_prompt
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();

        if prompt.is_empty() {
            return Err(GgptError::NoContent.into());
        }

        self.client.request_naming(prompt)
    }
}

/// Parse, resolve, dispatch and report. The only place errors are turned
/// into user-visible output.
pub fn run(cli: &Cli, console: &dyn Console) -> ExitCode {
    report(try_run(cli, console), console)
}

fn try_run(cli: &Cli, console: &dyn Console) -> Result<String> {
    let invocation = Invocation::from_cli(cli)?;

    let overrides = Overrides {
        api_key: invocation.api_key.clone(),
        model: cli.model.clone(),
    };
    let config = Config::from_sources(&overrides, invocation.command)?;
    let client = setup::build_llm_client(&config)?;

    Ggpt::new(invocation, config.max_diff_length, client.as_ref(), console).execute()
}

/// Render the outcome of a run and pick the process exit code.
pub fn report(result: Result<String>, console: &dyn Console) -> ExitCode {
    match result {
        Ok(text) => {
            console.print_panel(&text, RESPONSE_TITLE);
            ExitCode::SUCCESS
        }
        Err(err) => match err.downcast_ref::<GgptError>() {
            Some(domain) => {
                log::debug!("Domain error: {domain:?}");
                console.print_error_panel(&user_message(domain));
                ExitCode::from(1)
            }
            None => {
                console.print_traceback_panel(&format!("{err:?}"));
                ExitCode::from(2)
            }
        },
    }
}

/// Explanation and remedy shown for each domain error.
pub fn user_message(err: &GgptError) -> String {
    match err {
        GgptError::NotARepository { path } => format!(
            "The path '{}' is not a valid Git repository.\n\n\
             Please make sure that the path points to a valid Git repository.",
            path.display()
        ),
        GgptError::NoContent => "There is no content to request.".to_string(),
        GgptError::DiffTooLong { length, max } => format!(
            "The length of the diff ({length}) is greater than {max} characters.\n\n\
             The request to GPT may fail due to the limit on the amount of text that can be processed.\n\n\
             To reduce the size of the diff, you may consider the following options:\n\
             - Remove unnecessary or redundant code.\n\
             - Refactor the code to reduce the size of the diff.\n\
             - Split the changes into smaller and more manageable diff blocks."
        ),
        GgptError::MissingCredential { command } => format!(
            "The OpenAI API key is not set. Please set the {API_KEY_ENV} environment variable or use the --api-key option.\n\n\
             To set the API key using the CLI option, please run the command as follows:\n\n\
             \tggpt {command} --api-key <YOUR_API_KEY_HERE>\n\n\
             To set the API key using an environment variable, please add the following line to your shell profile:\n\n\
             \texport {API_KEY_ENV}=<YOUR_API_KEY_HERE>\n\n\
             To generate a new API key, please visit {API_KEYS_URL}"
        ),
        GgptError::InvalidCredential => format!(
            "The OpenAI API key was rejected.\n\n\
             Please check the key passed with --api-key or set in {API_KEY_ENV}.\n\n\
             To generate a new API key, please visit {API_KEYS_URL}"
        ),
        GgptError::UnsupportedCommand { name } => format!("Command '{name}' is not implemented."),
        GgptError::ConflictingDiffSources => "Only one of --hash, --staged can be set.".to_string(),
    }
}
