use std::io;
use std::path::PathBuf;

use chrono::Utc;
use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;
use thiserror::Error;
use tracing::warn;

use crate::classifier::{CategoryClassifier, DisabledClassifier, HttpClassifier};
use crate::cli::commands;
use crate::cli::io as cli_io;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::config::{Config, ConfigManager, Environment};
use crate::core::expense_store::ExpenseStore;
use crate::core::services::{CreateOutcome, ExpenseService};
use crate::core::utils::PathResolver;
use crate::domain::expense::{Expense, ExpenseDraft};
use crate::domain::filter::ExpenseFilter;
use crate::errors::ExpenseError;
use crate::storage::JsonStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Errors raised by individual shell commands. None of them end the session.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] ExpenseError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

/// Errors that stop the shell itself.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] ExpenseError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Everything a command handler can reach: the store, the classifier, the
/// active filter and user preferences.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub store: ExpenseStore,
    pub classifier: Box<dyn CategoryClassifier>,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub environment: Environment,
    pub filter: ExpenseFilter,
    pub theme: ColorfulTheme,
    pub running: bool,
}

impl ShellContext {
    /// Opens the data directory (`EXPENSE_CORE_HOME` or `~/.expense_core`).
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let base = PathResolver::base_dir();
        Self::open_in(mode, base)
    }

    pub fn open_in(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let storage = JsonStorage::new(Some(base.clone()))?;
        let store = ExpenseStore::open(Box::new(storage));
        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load()?;
        let environment = Environment::from_env();
        let classifier = build_classifier(&config, environment);
        Ok(Self::with_components(
            mode,
            store,
            classifier,
            config_manager,
            config,
            environment,
        ))
    }

    pub fn with_components(
        mode: CliMode,
        store: ExpenseStore,
        classifier: Box<dyn CategoryClassifier>,
        config_manager: ConfigManager,
        config: Config,
        environment: Environment,
    ) -> Self {
        Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            store,
            classifier,
            config_manager,
            config,
            environment,
            filter: ExpenseFilter::default(),
            theme: ColorfulTheme::default(),
            running: true,
        }
    }

    pub fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    /// The records matching the active search and category filter, newest first.
    pub fn filtered(&self) -> Vec<Expense> {
        self.filter.apply_owned(self.store.all())
    }

    /// Runs the create flow and reports the outcome.
    pub fn create_expense(&mut self, draft: ExpenseDraft) -> Result<CreateOutcome, CommandError> {
        let outcome =
            ExpenseService::create(&mut self.store, self.classifier.as_ref(), draft, Utc::now())?;
        if let Some(warning) = &outcome.warning {
            cli_io::print_warning(format!("Category assist unavailable: {}", warning));
        }
        Ok(outcome)
    }

    /// Rebuilds the classifier after a configuration change.
    pub fn refresh_classifier(&mut self) {
        self.classifier = build_classifier(&self.config, self.environment);
    }

    pub fn prompt(&self) -> String {
        if self.filter.is_unfiltered() {
            format!("expenses ({})> ", self.store.len())
        } else {
            format!(
                "expenses ({}/{})> ",
                self.filter.apply(self.store.all()).len(),
                self.store.len()
            )
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            other => cli_io::print_error(other),
        }
    }
}

fn build_classifier(config: &Config, environment: Environment) -> Box<dyn CategoryClassifier> {
    if !config.category_assist {
        return Box::new(DisabledClassifier);
    }
    match HttpClassifier::new(environment.classifier_endpoint(), config.request_timeout()) {
        Ok(classifier) => Box::new(classifier),
        Err(err) => {
            warn!(error = %err, "could not build classifier client, category assist disabled");
            Box::new(DisabledClassifier)
        }
    }
}
