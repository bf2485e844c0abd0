//! Shell dispatch, shared context helpers, and CLI error types.

use std::io;

use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;

use crate::{
    config::{Config, ConfigManager},
    core::{
        errors::TrackerError,
        services::{CategoryFilter, CategoryService, ServiceError, TransactionFilter},
        MutationError, TrackerManager,
    },
    domain::{EntryKind, Transaction},
    storage::json_backend::JsonFileStore,
};

pub use crate::cli::shell_context::{CliMode, ShellContext};
pub use crate::core::errors::CliError;

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::io as cli_io;

const ISO_DATE: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    /// Builds a context rooted at the default base directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        Self::with_config_manager(mode, config_manager)
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        if mode == CliMode::Script {
            colored::control::set_override(false);
        }

        let config = config_manager.load()?;
        let store = JsonFileStore::at(config_manager.data_dir(&config))?;
        let manager = TrackerManager::open(Box::new(store))?;

        Ok(ShellContext {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            manager,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            filter: TransactionFilter::default(),
            running: true,
        })
    }

    pub(crate) fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub(crate) fn prompt(&self) -> String {
        if self.filter.is_active() {
            "finance [filtered]> ".to_string()
        } else {
            "finance> ".to_string()
        }
    }

    pub(crate) fn command_usages(&self) -> Vec<(&'static str, &'static str)> {
        self.registry
            .iter()
            .map(|definition| (definition.name, definition.usage))
            .collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
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

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, &tokens[0], &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action("Exit shell?").map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Unsaved(message) => {
                self.print_warning(&format!("Change applied but not saved: {}", message));
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        cli_io::print_hint(message);
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager
            .save(&self.config)
            .map_err(CommandError::from_core)
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn format_date(&self, date: NaiveDate) -> String {
        self.config.format_date(date)
    }

    /// Signed display amount: `+` for income, `-` for expense. Stored
    /// negative amounts keep their own sign after the prefix.
    pub(crate) fn format_signed(&self, txn: &Transaction) -> String {
        format!("{}{}", txn.kind.sign(), self.config.format_amount(txn.amount))
    }

    pub(crate) fn format_amount(&self, amount: f64) -> String {
        self.config.format_amount(amount)
    }

    /// Maps a category filter given by name onto the category id.
    pub(crate) fn resolve_filter(&self, mut filter: TransactionFilter) -> TransactionFilter {
        if let CategoryFilter::Id(token) = &filter.category {
            if let Some(category) = CategoryService::resolve(self.manager.tracker(), token) {
                filter.category = CategoryFilter::Id(category.id.clone());
            }
        }
        filter
    }

    /// Finds a transaction by full id or unique id prefix.
    pub(crate) fn resolve_transaction_id(&self, token: &str) -> Result<String, CommandError> {
        let tracker = self.manager.tracker();
        if let Some(txn) = tracker.transaction(token) {
            return Ok(txn.id.clone());
        }
        let matches: Vec<&Transaction> = tracker
            .transactions
            .iter()
            .filter(|txn| txn.id.starts_with(token))
            .collect();
        match matches.as_slice() {
            [only] => Ok(only.id.clone()),
            [] => Err(CommandError::InvalidArguments(format!(
                "no transaction matches `{}`",
                token
            ))),
            _ => Err(CommandError::InvalidArguments(format!(
                "`{}` matches {} transactions; use more characters",
                token,
                matches.len()
            ))),
        }
    }
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input, ISO_DATE).map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

pub(crate) fn parse_amount(input: &str) -> Result<f64, CommandError> {
    let cleaned = input.trim().trim_start_matches('$').replace(',', "");
    cleaned
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid amount `{}`", input)))
}

pub(crate) fn parse_kind(input: &str) -> Result<EntryKind, CommandError> {
    input
        .parse::<EntryKind>()
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

pub(crate) fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Unsaved(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] TrackerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error("exit requested")]
    ExitRequested,
}

impl CommandError {
    pub(crate) fn from_core(error: TrackerError) -> Self {
        CommandError::Core(error)
    }
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(err) => CommandError::Core(err),
            ServiceError::Invalid(message) => CommandError::InvalidArguments(message),
        }
    }
}

impl From<MutationError> for CommandError {
    fn from(err: MutationError) -> Self {
        match err {
            MutationError::Rejected(message) => CommandError::InvalidArguments(message),
            MutationError::Persist { source } => CommandError::Unsaved(source.to_string()),
        }
    }
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Command(message) => CommandError::InvalidArguments(message),
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_script(
    config_manager: ConfigManager,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::with_config_manager(CliMode::Script, config_manager)?;
    for line in lines {
        match app.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => app.report_error(err)?,
        }
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::KindFilter;
    use tempfile::TempDir;

    fn script(dir: &TempDir, lines: &[&str]) -> ShellContext {
        let config_manager =
            ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("config manager");
        process_script(config_manager, lines).expect("script runs")
    }

    #[test]
    fn add_and_delete_through_dispatch() {
        let dir = TempDir::new().unwrap();
        let app = script(
            &dir,
            &[
                "add income 1200 Salary 2024-01-31 \"January pay\"",
                "add expense 15.5 food 2024-02-01",
            ],
        );
        let tracker = app.manager.tracker();
        assert_eq!(tracker.transactions.len(), 2);
        assert_eq!(tracker.transactions[0].notes.as_deref(), Some("January pay"));
        assert_eq!(tracker.transactions[1].category_id, "3");

        let id = tracker.transactions[0].id.clone();
        let app = script(&dir, &[&format!("delete {}", &id[..8])]);
        assert_eq!(app.manager.tracker().transactions.len(), 1);
        assert!(app.manager.tracker().transaction(&id).is_none());
    }

    #[test]
    fn rejected_input_leaves_state_untouched() {
        let dir = TempDir::new().unwrap();
        let app = script(
            &dir,
            &[
                "add expense -5 Food",
                "add expense abc Food",
                "add expense 10 Nowhere",
                "category-add expense \"   \"",
            ],
        );
        assert!(app.manager.tracker().transactions.is_empty());
        assert_eq!(app.manager.tracker().categories.len(), 5);
    }

    #[test]
    fn mismatched_category_kind_is_still_recorded() {
        let dir = TempDir::new().unwrap();
        let app = script(&dir, &["add income 10 Food 2024-01-01"]);
        let tracker = app.manager.tracker();
        assert_eq!(tracker.transactions.len(), 1);
        assert_eq!(tracker.transactions[0].kind, EntryKind::Income);
        assert_eq!(tracker.transactions[0].category_id, "3");
    }

    #[test]
    fn filter_command_updates_session_filter() {
        let dir = TempDir::new().unwrap();
        let app = script(&dir, &["filter type=income category=Salary from=2024-01-01"]);
        assert_eq!(app.filter.kind, KindFilter::Only(EntryKind::Income));
        assert_eq!(app.filter.category, CategoryFilter::Id("1".into()));
        assert!(app.filter.start_date.is_some());
        assert_eq!(app.prompt(), "finance [filtered]> ");

        let app = script(&dir, &["filter type=expense", "filter clear"]);
        assert!(!app.filter.is_active());
    }

    #[test]
    fn exit_stops_processing() {
        let dir = TempDir::new().unwrap();
        let app = script(&dir, &["exit", "add income 5 Salary"]);
        assert!(app.manager.tracker().transactions.is_empty());
    }

    #[test]
    fn config_set_persists_between_sessions() {
        let dir = TempDir::new().unwrap();
        script(&dir, &["config set currency_symbol EUR "]);
        let app = script(&dir, &[]);
        assert_eq!(app.config().currency_symbol, "EUR");
    }

    #[test]
    fn format_date_falls_back_on_bad_pattern() {
        let dir = TempDir::new().unwrap();
        let mut app = script(&dir, &[]);
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(app.format_date(date), "Jan 05, 2024");
        app.config.date_format = "%Q".into();
        assert_eq!(app.format_date(date), "2024-01-05");
    }

    #[test]
    fn time_only_date_format_is_refused_and_shell_keeps_working() {
        let dir = TempDir::new().unwrap();
        let app = script(
            &dir,
            &[
                "config set date_format %H:%M",
                "add income 5 Salary 2024-01-01",
                "list",
            ],
        );
        assert_eq!(app.config().date_format, "%b %d, %Y");
        assert_eq!(app.manager.tracker().transactions.len(), 1);

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut app = script(&dir, &[]);
        assert_eq!(app.config().date_format, "%b %d, %Y");
        app.config.date_format = "%T".into();
        assert_eq!(app.format_date(date), "2024-01-01");
    }

    #[test]
    fn signed_amount_keeps_stored_sign() {
        let dir = TempDir::new().unwrap();
        let app = script(&dir, &[]);
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let income = Transaction::new(EntryKind::Income, 20.0, date, "1", None);
        let legacy = Transaction::new(EntryKind::Income, -20.0, date, "1", None);
        let expense = Transaction::new(EntryKind::Expense, 35.5, date, "3", None);
        assert_eq!(app.format_signed(&income), "+$20.00");
        assert_eq!(app.format_signed(&legacy), "+-$20.00");
        assert_eq!(app.format_signed(&expense), "-$35.50");
    }

    #[test]
    fn amount_parser_accepts_symbols_and_grouping() {
        assert_eq!(parse_amount("$1,250.75").unwrap(), 1250.75);
        assert!(parse_amount("ten").is_err());
    }
}
