use super::{parse_args, CommandDefinition};
use crate::cli::output::{info, line, section};
use crate::cli::{CliContext, CommandError, CommandResult};
use crate::domain::{filter_by_name, sort_subscriptions, SortOption};
use crate::schedule::next_occurrence_on_or_after;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "list",
        "List subscriptions with their next payment",
        "list [--filter TEXT] [--sort name-asc|name-desc|price-asc|price-desc|date-asc|date-desc]",
        cmd_list,
    )]
}

fn cmd_list(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let parsed = parse_args(args, &["filter", "sort"])?;
    let sort = match parsed.option("sort") {
        Some(raw) => raw.parse::<SortOption>().map_err(CommandError::from)?,
        None => SortOption::NameAsc,
    };
    let subs = context.subscriptions()?;
    let mut rows = filter_by_name(&subs, parsed.option("filter").unwrap_or(""));
    sort_subscriptions(&mut rows, sort);

    section(format!("Subscriptions ({})", rows.len()));
    if rows.is_empty() {
        info("No subscriptions match.");
        return Ok(());
    }
    for sub in rows {
        let next = if sub.active {
            next_occurrence_on_or_after(sub.anchor_str(), sub.period, context.today)
                .map_or_else(|| "-".to_string(), |date| date.to_string())
        } else {
            "inactive".to_string()
        };
        line(format!(
            "{:<6} {:<24} {:>12}  {:<7}  next {}",
            sub.id,
            sub.name,
            context.money(sub.price),
            sub.period.as_str(),
            next
        ));
    }
    Ok(())
}
