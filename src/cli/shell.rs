//! The read-dispatch loop. Interactive sessions read through rustyline with
//! completion over commands, categories and record ids; script sessions read
//! stdin line by line. Both feed the same [`drive`] loop.

use std::io::{self, BufRead, Lines};
use std::iter;

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::formatters::short_id;
use crate::cli::io as cli_io;
use crate::config::Config;
use crate::core::services::SummaryService;
use crate::domain::filter::ALL_CATEGORIES;

/// Presence of this variable switches the shell to line-by-line stdin mode.
pub const SCRIPT_MODE_VAR: &str = "EXPENSE_CORE_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_MODE_VAR).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => {
            let mut source = PromptSource::new(&context)?;
            cli_io::print_info(format!(
                "{} expenses loaded. Type `help` to get started.",
                context.store.len()
            ));
            drive(&mut context, &mut source)
        }
        CliMode::Script => drive(&mut context, &mut ScriptSource::new(io::stdin().lock())),
    }
}

enum NextLine {
    Line(String),
    Interrupted,
    Finished,
}

trait LineSource {
    fn next_line(&mut self, context: &ShellContext) -> Result<NextLine, CliError>;
}

fn drive(context: &mut ShellContext, source: &mut dyn LineSource) -> Result<(), CliError> {
    while context.running {
        match source.next_line(context)? {
            NextLine::Line(line) => match handle_line(context, &line) {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Exit) => break,
                Err(err) => context.report_error(err),
            },
            NextLine::Interrupted => {
                if context.confirm_exit()? {
                    break;
                }
            }
            NextLine::Finished => break,
        }
    }
    Ok(())
}

/// Splits one input line and runs the named command. Malformed quoting is a
/// warning; only `exit` stops the loop.
pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            cli_io::print_warning(format!("Could not read `{}`: {}", line.trim(), err));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    let control = context.dispatch(&raw.to_lowercase(), raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

struct ScriptSource<R> {
    lines: Lines<R>,
}

impl<R: BufRead> ScriptSource<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> LineSource for ScriptSource<R> {
    fn next_line(&mut self, _context: &ShellContext) -> Result<NextLine, CliError> {
        match self.lines.next() {
            Some(line) => Ok(NextLine::Line(line?)),
            None => Ok(NextLine::Finished),
        }
    }
}

struct PromptSource {
    editor: Editor<ExpenseCompleter, DefaultHistory>,
}

impl PromptSource {
    fn new(context: &ShellContext) -> Result<Self, CliError> {
        let mut editor = Editor::<ExpenseCompleter, DefaultHistory>::new()?;
        editor.set_helper(Some(ExpenseCompleter::new(context.command_names())));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
        Ok(Self { editor })
    }
}

impl LineSource for PromptSource {
    fn next_line(&mut self, context: &ShellContext) -> Result<NextLine, CliError> {
        if let Some(helper) = self.editor.helper_mut() {
            helper.refresh(context);
        }
        loop {
            match self.editor.readline(&context.prompt()) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    self.editor.add_history_entry(trimmed).ok();
                    return Ok(NextLine::Line(trimmed.to_string()));
                }
                Err(ReadlineError::Interrupted) => return Ok(NextLine::Interrupted),
                Err(ReadlineError::Eof) => {
                    cli_io::print_info("Exiting shell.");
                    return Ok(NextLine::Finished);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// Tab completion: command names first, then arguments that depend on the
/// command (categories for `filter` and `--category`, ids for `edit` and
/// `delete`, setting keys for `config`).
struct ExpenseCompleter {
    commands: Vec<String>,
    categories: Vec<String>,
    ids: Vec<String>,
}

impl ExpenseCompleter {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names.into_iter().map(str::to_ascii_lowercase).collect();
        commands.sort();
        commands.dedup();
        Self {
            commands,
            categories: Vec::new(),
            ids: Vec::new(),
        }
    }

    fn refresh(&mut self, context: &ShellContext) {
        self.categories = SummaryService::categories(context.store.all());
        self.ids = context.store.all().iter().map(short_id).collect();
    }

    /// Returns the byte offset where the completed word starts and the
    /// replacements for it.
    fn candidates(&self, prefix: &str) -> (usize, Vec<String>) {
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let needle = prefix[start..].to_lowercase();
        let before: Vec<String> = prefix[..start]
            .split_whitespace()
            .map(str::to_ascii_lowercase)
            .collect();

        let pool: Vec<&str> = match before.as_slice() {
            [] => self.commands.iter().map(String::as_str).collect(),
            [.., flag] if flag == "--category" || flag == "-c" => {
                self.categories.iter().map(String::as_str).collect()
            }
            [command] => match command.as_str() {
                "filter" => iter::once(ALL_CATEGORIES)
                    .chain(self.categories.iter().map(String::as_str))
                    .collect(),
                "edit" | "delete" => self.ids.iter().map(String::as_str).collect(),
                "help" => self.commands.iter().map(String::as_str).collect(),
                "config" => ["show", "set"]
                    .into_iter()
                    .chain(Config::KEYS.iter().copied())
                    .collect(),
                _ => Vec::new(),
            },
            [command, action] if command == "config" && action == "set" => {
                Config::KEYS.to_vec()
            }
            _ => Vec::new(),
        };

        let matches = pool
            .into_iter()
            .filter(|word| word.to_lowercase().starts_with(&needle))
            .map(|word| shell_words::quote(word).into_owned())
            .collect();
        (start, matches)
    }
}

impl Helper for ExpenseCompleter {}

impl Completer for ExpenseCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = self.candidates(&line[..pos]);
        let pairs = words
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ExpenseCompleter {
    type Hint = String;
}

impl Highlighter for ExpenseCompleter {}

impl Validator for ExpenseCompleter {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::DisabledClassifier;
    use crate::config::{ConfigManager, Environment};
    use crate::core::expense_store::ExpenseStore;
    use crate::storage::MemoryStorage;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> ShellContext {
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        ShellContext::with_components(
            CliMode::Script,
            ExpenseStore::new(Box::new(MemoryStorage::new())),
            Box::new(DisabledClassifier),
            manager,
            Config::default(),
            Environment::Development,
        )
    }

    fn completer(ctx: &ShellContext) -> ExpenseCompleter {
        let mut completer = ExpenseCompleter::new(ctx.command_names());
        completer.refresh(ctx);
        completer
    }

    #[test]
    fn quoted_description_stays_one_argument() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        handle_line(&mut ctx, r#"add "Lunch with team" 450 -c Food"#).unwrap();
        assert_eq!(ctx.store.all()[0].description, "Lunch with team");
    }

    #[test]
    fn unbalanced_quotes_are_a_warning() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let control = handle_line(&mut ctx, r#"add "coffee 120 -c Food"#).unwrap();
        assert_eq!(control, LoopControl::Continue);
        assert!(ctx.store.is_empty());
    }

    #[test]
    fn script_stops_at_exit() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let input = "add Tea 30 -c Drinks\nlst\nadd Lunch 0\nexit\nadd Late 10 -c Food\n";
        drive(&mut ctx, &mut ScriptSource::new(Cursor::new(input))).unwrap();

        assert_eq!(ctx.store.len(), 1);
        assert_eq!(ctx.store.all()[0].description, "Tea");
        assert!(!ctx.running);
    }

    #[test]
    fn first_word_completes_commands() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let (start, words) = completer(&ctx).candidates("de");
        assert_eq!(start, 0);
        assert_eq!(words, vec!["delete".to_string()]);
    }

    #[test]
    fn filter_completes_known_categories() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        handle_line(&mut ctx, "add Flight 9000 -c Travel").unwrap();
        handle_line(&mut ctx, r#"add Dinner 800 -c "Food & Dining""#).unwrap();
        let completer = completer(&ctx);

        let (start, words) = completer.candidates("filter ");
        assert_eq!(start, 7);
        assert_eq!(words[0], "all");
        assert!(words.contains(&"Travel".to_string()));
        assert!(words.iter().any(|word| word.starts_with("'Food & Dining")));

        let (_, words) = completer.candidates("filter tr");
        assert_eq!(words, vec!["Travel".to_string()]);

        let (_, words) = completer.candidates("add Taxi 300 --category T");
        assert_eq!(words, vec!["Travel".to_string()]);
    }

    #[test]
    fn edit_and_delete_complete_short_ids() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        handle_line(&mut ctx, "add Coffee 120 -c Food").unwrap();
        let id = short_id(&ctx.store.all()[0]);
        let completer = completer(&ctx);

        assert_eq!(completer.candidates("edit ").1, vec![id.clone()]);
        assert_eq!(completer.candidates(&format!("delete {}", &id[..3])).1, vec![id]);
        assert!(completer.candidates("list ").1.is_empty());
    }

    #[test]
    fn config_set_completes_keys() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let (_, words) = completer(&ctx).candidates("config set curr");
        assert_eq!(words, vec!["currency_symbol".to_string()]);
    }
}
