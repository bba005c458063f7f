use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{line, section};
use crate::cli::registry::CommandEntry;
use crate::config::Config;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change preferences",
        "config [show|set <key> <value>|<key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    let rest = if args[0].eq_ignore_ascii_case("set") {
        &args[1..]
    } else {
        args
    };
    if rest.len() < 2 {
        return Err(CommandError::InvalidArguments(format!(
            "usage: config set <{}> <value>",
            Config::KEYS.join("|")
        )));
    }
    let key = rest[0].to_lowercase();
    let value = rest[1..].join(" ");
    set_config_value(context, &key, value.trim())
}

fn show_config(context: &ShellContext) -> CommandResult {
    section("Configuration");
    for (key, value) in context.config.entries() {
        line(format!("  {:<22} {}", key, value));
    }
    io::print_info(format!("  Environment            {}", context.environment));
    io::print_info(format!(
        "  Config file            {}",
        context.config_manager.path().display()
    ));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let mut updated = context.config.clone();
    updated.set(key, value)?;
    context.config_manager.save(&updated)?;
    context.config = updated;

    if matches!(key, "category_assist" | "request_timeout_secs") {
        context.refresh_classifier();
    }
    io::print_success(format!("`{}` updated.", key));
    Ok(())
}
