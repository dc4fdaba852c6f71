use super::{parse_args, require, CommandDefinition};
use crate::cli::output::{line, section, success};
use crate::cli::{CliContext, CommandError, CommandResult};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "settings",
        "Show or change preferences",
        "settings show | settings set KEY VALUE",
        cmd_settings,
    )]
}

fn cmd_settings(context: &mut CliContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "settings show | settings set KEY VALUE";
    let parsed = parse_args(args, &[])?;
    match parsed.positional.first().copied().unwrap_or("show") {
        "show" => {
            show(context);
            Ok(())
        }
        "set" => {
            let key = require(&parsed.positional, 1, USAGE)?;
            let value = require(&parsed.positional, 2, USAGE)?;
            context.settings.apply(key, value)?;
            context.save_settings()?;
            success(format!("Updated {key}."));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown settings action `{other}`; usage: {USAGE}"
        ))),
    }
}

fn show(context: &CliContext) {
    let settings = &context.settings;
    section("Settings");
    line(format!("currency_code    {}", settings.currency_code));
    line(format!("currency_symbol  {}", settings.currency_symbol));
    line(format!(
        "limit_on         {}",
        if settings.limit_on { "on" } else { "off" }
    ));
    line(format!("limit_val        {}", settings.limit_val));
    line(format!(
        "high_contrast    {}",
        if settings.accessibility.high_contrast { "on" } else { "off" }
    ));
    line(format!(
        "speech           {}",
        if settings.accessibility.speech { "on" } else { "off" }
    ));
    line(format!("font_scale       {:.1}", settings.accessibility.font_scale));
    line(format!("file             {}", context.config.path().display()));
}
