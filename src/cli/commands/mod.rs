pub mod config;
pub mod expense;
pub mod system;
pub mod view;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandEntry;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(expense::definitions());
    commands.extend(view::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

/// Positional arguments plus the optional `--flag value` pairs shared by the
/// expense commands.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ParsedArgs {
    pub positional: Vec<String>,
    pub description: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
}

impl ParsedArgs {
    pub fn has_flags(&self) -> bool {
        self.description.is_some()
            || self.amount.is_some()
            || self.category.is_some()
            || self.date.is_some()
    }
}

pub(crate) fn parse_flags(args: &[&str]) -> Result<ParsedArgs, CommandError> {
    let mut parsed = ParsedArgs::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let slot = match *arg {
            "--description" => &mut parsed.description,
            "--amount" | "-a" => &mut parsed.amount,
            "--category" | "-c" => &mut parsed.category,
            "--date" | "-d" => &mut parsed.date,
            flag if flag.starts_with("--") => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `{}`",
                    flag
                )))
            }
            value => {
                parsed.positional.push(value.to_string());
                continue;
            }
        };
        let value = iter.next().ok_or_else(|| {
            CommandError::InvalidArguments(format!("`{}` expects a value", arg))
        })?;
        *slot = Some(value.to_string());
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_and_positionals_are_split() {
        let parsed = parse_flags(&["Lunch", "450", "-c", "Food", "--date", "2024-06-01"]).unwrap();
        assert_eq!(parsed.positional, vec!["Lunch", "450"]);
        assert_eq!(parsed.category.as_deref(), Some("Food"));
        assert_eq!(parsed.date.as_deref(), Some("2024-06-01"));
        assert!(parsed.has_flags());
    }

    #[test]
    fn dangling_flag_is_an_error() {
        assert!(matches!(
            parse_flags(&["Lunch", "--category"]),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(parse_flags(&["--colour", "red"]).is_err());
    }

    #[test]
    fn command_names_are_unique() {
        let definitions = all_definitions();
        let mut names: Vec<_> = definitions.iter().map(|entry| entry.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), definitions.len());
    }
}
