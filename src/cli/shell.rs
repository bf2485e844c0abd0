use std::{
    borrow::Cow,
    fmt,
    io::{self, BufRead},
};

use colored::Colorize;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output::info as output_info;

/// Reads commands from stdin, one per line, without prompts or colors.
pub const SCRIPT_MODE_ENV: &str = "FINANCE_TRACKER_CLI_SCRIPT";

/// Commands whose first argument is an entry type.
const KIND_COMMANDS: [&str; 3] = ["add", "categories", "category-add"];
const KIND_WORDS: [&str; 2] = ["income", "expense"];

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_MODE_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_usages())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    let tracker = context.manager.tracker();
    output_info(format!(
        "Finance Tracker: {} transactions, {} categories. Type `help` for commands.",
        tracker.transactions.len(),
        tracker.categories.len()
    ));

    while context.running {
        let prompt = context.prompt();
        match editor.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                editor.add_history_entry(trimmed).ok();

                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match handle_line(context, trimmed) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&err.to_string());
            return Ok(LoopControl::Continue);
        }
    };

    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let command = raw.to_lowercase();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    tracing::debug!(command = %command, args = args.len(), "dispatching");

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

/// Completes command names and entry types; hints the usage line once a
/// command name is typed.
struct CommandHelper {
    commands: Vec<(String, &'static str)>,
}

impl CommandHelper {
    fn new(entries: Vec<(&'static str, &'static str)>) -> Self {
        let mut commands: Vec<(String, &'static str)> = entries
            .into_iter()
            .map(|(name, usage)| (name.to_ascii_lowercase(), usage))
            .collect();
        commands.sort_by(|a, b| a.0.cmp(&b.0));
        commands.dedup_by(|a, b| a.0 == b.0);
        Self { commands }
    }

    fn usage(&self, name: &str) -> Option<&'static str> {
        self.commands
            .iter()
            .find(|(command, _)| command == name)
            .map(|(_, usage)| *usage)
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let needle = prefix[start..].to_ascii_lowercase();
        let words: Vec<&str> = prefix[..start].split_whitespace().collect();

        let options: Vec<&str> = match words.as_slice() {
            [] => self.commands.iter().map(|(name, _)| name.as_str()).collect(),
            [command] if KIND_COMMANDS.contains(&command.to_ascii_lowercase().as_str()) => {
                KIND_WORDS.to_vec()
            }
            _ => Vec::new(),
        };

        let candidates = options
            .into_iter()
            .filter(|option| option.starts_with(&needle))
            .map(|option| Pair {
                display: option.to_string(),
                replacement: option.to_string(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let command = line.strip_suffix(' ')?;
        if command.contains(char::is_whitespace) {
            return None;
        }
        let usage = self.usage(&command.to_ascii_lowercase())?;
        let rest = usage.split_once(' ').map(|(_, rest)| rest)?;
        Some(rest.to_string())
    }
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not parse command: {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper() -> CommandHelper {
        CommandHelper::new(vec![
            ("summary", "summary"),
            ("add", "add <income|expense> <amount> <category>"),
            ("Summary", "summary"),
        ])
    }

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens =
            parse_command_line(r#"add expense 12 Food 2024-03-01 "lunch with Sam""#).unwrap();
        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens[5], "lunch with Sam");
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        let err = parse_command_line(r#"add expense 12 "Food"#).unwrap_err();
        assert!(err.to_string().starts_with("could not parse command"));
    }

    #[test]
    fn helper_dedups_command_names() {
        let names: Vec<_> = helper().commands.into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["add".to_string(), "summary".to_string()]);
    }

    #[test]
    fn completes_names_then_kinds() {
        let history = DefaultHistory::new();
        let ctx = ReadlineContext::new(&history);
        let helper = helper();

        let (start, pairs) = helper.complete("su", 2, &ctx).unwrap();
        assert_eq!(start, 0);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].replacement, "summary");

        let (start, pairs) = helper.complete("add in", 6, &ctx).unwrap();
        assert_eq!(start, 4);
        assert_eq!(pairs[0].replacement, "income");

        let (_, pairs) = helper.complete("add income 1", 12, &ctx).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn hints_usage_after_command_name() {
        let history = DefaultHistory::new();
        let ctx = ReadlineContext::new(&history);
        let helper = helper();
        assert_eq!(
            helper.hint("add ", 4, &ctx).as_deref(),
            Some("<income|expense> <amount> <category>")
        );
        assert_eq!(helper.hint("summary ", 8, &ctx), None);
        assert_eq!(helper.hint("add", 3, &ctx), None);
    }
}
