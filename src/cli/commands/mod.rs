use std::collections::HashMap;

pub mod listing;
pub mod money;
pub mod settings;
pub mod system;
pub mod views;

use super::{CliContext, CommandError, CommandResult};

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(views::definitions());
    commands.extend(listing::definitions());
    commands.extend(money::definitions());
    commands.extend(settings::definitions());
    commands.extend(system::definitions());
    commands
}

pub type CommandHandler = fn(&mut CliContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }
}

/// Positional arguments plus `--name value` / `--name=value` options.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs<'a> {
    pub positional: Vec<&'a str>,
    options: HashMap<&'static str, &'a str>,
}

impl<'a> ParsedArgs<'a> {
    pub fn option(&self, name: &str) -> Option<&'a str> {
        self.options.get(name).copied()
    }

    pub fn count(&self, name: &str) -> Result<Option<usize>, CommandError> {
        self.option(name)
            .map(|raw| {
                raw.parse::<usize>().map_err(|_| {
                    CommandError::InvalidArguments(format!(
                        "`--{name}` expects a whole number, got `{raw}`"
                    ))
                })
            })
            .transpose()
    }
}

pub(crate) fn parse_args<'a>(
    args: &[&'a str],
    known: &[&'static str],
) -> Result<ParsedArgs<'a>, CommandError> {
    let mut parsed = ParsedArgs::default();
    let mut iter = args.iter().copied();
    while let Some(arg) = iter.next() {
        let Some(flag) = arg.strip_prefix("--") else {
            parsed.positional.push(arg);
            continue;
        };
        let (name, inline) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (flag, None),
        };
        let key = known
            .iter()
            .copied()
            .find(|candidate| *candidate == name)
            .ok_or_else(|| CommandError::InvalidArguments(format!("unknown option `--{name}`")))?;
        let value = match inline {
            Some(value) => value,
            None => iter.next().ok_or_else(|| {
                CommandError::InvalidArguments(format!("`--{key}` needs a value"))
            })?,
        };
        parsed.options.insert(key, value);
    }
    Ok(parsed)
}

/// `YYYY-MM` into a year and a 1-based month.
pub(crate) fn parse_year_month(raw: &str) -> Result<(i32, u32), CommandError> {
    let invalid = || CommandError::InvalidArguments(format!("expected YYYY-MM, got `{raw}`"));
    let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
    let year = year.parse::<i32>().map_err(|_| invalid())?;
    let month = month.parse::<u32>().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

pub(crate) fn parse_year(raw: &str) -> Result<i32, CommandError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| CommandError::InvalidArguments(format!("expected YYYY, got `{raw}`")))
}

pub(crate) fn require<'a>(
    positional: &[&'a str],
    index: usize,
    usage: &str,
) -> Result<&'a str, CommandError> {
    positional
        .get(index)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {usage}")))
}
