use super::CommandDefinition;
use crate::cli::output::{info, line, section};
use crate::cli::{CliContext, CommandError, CommandResult};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "help",
        "Show available commands",
        "help [command]",
        cmd_help,
    )]
}

fn cmd_help(context: &mut CliContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first().map(|name| name.to_lowercase()) {
        let entry = context
            .registry
            .get(&name)
            .ok_or(CommandError::UnknownCommand(name))?;
        section(format!("Help: {}", entry.name));
        line(format!("  Description: {}", entry.description));
        line(format!("  Usage: {}", entry.usage));
        return Ok(());
    }

    section("Available commands");
    for entry in context.registry.iter() {
        line(format!("  {:<10} {}", entry.name, entry.description));
    }
    info("Use `help <command>` for details. `--snapshot PATH` selects the subscription file.");
    Ok(())
}
