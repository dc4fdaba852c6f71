use std::fs;

use chrono::Utc;

use super::{parse_args, require, CommandDefinition};
use crate::cli::output::{info, line, section, success, warning};
use crate::cli::{CliContext, CommandError, CommandResult};
use crate::currency::{convert, format_amount, parse_amount, RateSnapshot, RATE_CACHE_TTL_HOURS};
use crate::errors::CoreError;
use crate::storage::SnapshotStore;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "convert",
            "Convert an amount between currencies with the cached rates",
            "convert AMOUNT FROM TO",
            cmd_convert,
        ),
        CommandDefinition::new(
            "rates",
            "Import or inspect the cached exchange-rate table",
            "rates import FILE | rates show",
            cmd_rates,
        ),
    ]
}

fn cached_rates(context: &CliContext) -> Result<RateSnapshot, CommandError> {
    let snapshot = context.store.load_rates()?.ok_or_else(|| {
        CoreError::NotFound("cached exchange rates; run `rates import FILE` first".into())
    })?;
    if !snapshot.is_fresh(Utc::now()) {
        warning(format!(
            "Cached rates are older than {RATE_CACHE_TTL_HOURS} hours (fetched {}).",
            snapshot.fetched_at.format("%Y-%m-%d %H:%M UTC")
        ));
    }
    Ok(snapshot)
}

fn cmd_convert(context: &mut CliContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "convert AMOUNT FROM TO";
    let parsed = parse_args(args, &[])?;
    let amount = parse_amount(require(&parsed.positional, 0, USAGE)?);
    let from = require(&parsed.positional, 1, USAGE)?.to_uppercase();
    let to = require(&parsed.positional, 2, USAGE)?.to_uppercase();

    let snapshot = cached_rates(context)?;
    for code in [&from, &to] {
        if snapshot.rates.rate(code).is_none() {
            warning(format!("No rate for {code}; the result is 0."));
        }
    }
    let converted = convert(amount, &from, &to, &snapshot.rates);
    line(format!(
        "{} = {}",
        format_amount(amount, &from),
        format_amount(converted, &to)
    ));
    Ok(())
}

fn cmd_rates(context: &mut CliContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "rates import FILE | rates show";
    let parsed = parse_args(args, &[])?;
    match require(&parsed.positional, 0, USAGE)? {
        "import" => {
            let path = require(&parsed.positional, 1, USAGE)?;
            let payload = fs::read_to_string(path)?;
            let snapshot = RateSnapshot::from_nbp_payload(&payload, Utc::now())?;
            context.store.save_rates(&snapshot)?;
            success(format!(
                "Imported {} rates (effective {}).",
                snapshot.rates.len(),
                snapshot.effective_date.as_deref().unwrap_or("unknown")
            ));
            Ok(())
        }
        "show" => {
            let snapshot = cached_rates(context)?;
            section(format!(
                "Rates (effective {})",
                snapshot.effective_date.as_deref().unwrap_or("unknown")
            ));
            for code in snapshot.rates.codes() {
                if let Some(rate) = snapshot.rates.rate(code) {
                    line(format!("{code}  {rate:>10.4}"));
                }
            }
            info("Values are PLN per unit.");
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown rates action `{other}`; usage: {USAGE}"
        ))),
    }
}
