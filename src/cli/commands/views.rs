use chrono::{Datelike, NaiveDate};

use super::{parse_args, parse_year, parse_year_month, require, CommandDefinition};
use crate::aggregate::{
    calendar_month_with_highlight, month_grid, month_totals_by_subscription, upcoming, year_totals,
    CalendarMonth, TOP_SPENDERS, UPCOMING_HORIZON_DAYS, UPCOMING_LIMIT,
};
use crate::cli::output::{info, line, section, warning};
use crate::cli::{CliContext, CommandResult};
use crate::schedule::{earliest_across_all, iso_key};
use crate::summary::spending_summary;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "calendar",
            "Show a month grid with the payments of each day",
            "calendar YYYY-MM",
            cmd_calendar,
        ),
        CommandDefinition::new(
            "year",
            "Show billed totals for every month of a year",
            "year YYYY",
            cmd_year,
        ),
        CommandDefinition::new(
            "month",
            "Show what each subscription costs in a month",
            "month YYYY-MM [--top N]",
            cmd_month,
        ),
        CommandDefinition::new(
            "upcoming",
            "List payments due soon",
            "upcoming [--days N] [--limit N]",
            cmd_upcoming,
        ),
        CommandDefinition::new("next", "Show the nearest due payment", "next", cmd_next),
        CommandDefinition::new(
            "summary",
            "Show this month's spending against the limit",
            "summary",
            cmd_summary,
        ),
    ]
}

fn cmd_calendar(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let parsed = parse_args(args, &[])?;
    let (year, month) = parse_year_month(require(&parsed.positional, 0, "calendar YYYY-MM")?)?;
    let subs = context.subscriptions()?;
    let Some(view) = calendar_month_with_highlight(&subs, year, month, context.today) else {
        return Ok(());
    };

    section(format!("Calendar {year}-{month:02}"));
    for row in render_grid(&view, context.today) {
        line(row);
    }
    line("");
    if view.days.is_empty() {
        info("No payments this month.");
    }
    for (day, cell) in &view.days {
        let names: Vec<String> = cell
            .events
            .iter()
            .map(|event| format!("{} ({})", event.name, event.period.label()))
            .collect();
        line(format!(
            "{day}  {:>12}  {}",
            context.money(cell.total),
            names.join(", ")
        ));
    }
    line(format!("Month total: {}", context.money(view.total())));
    if let Some(nearest) = &view.nearest_due {
        line(format!("Next payment: {nearest}"));
    }
    Ok(())
}

/// Six Monday-first week rows. `*` marks days with payments, `!` the nearest
/// due date and `[]` today; days of neighbouring months show as `.`.
fn render_grid(view: &CalendarMonth, today: NaiveDate) -> Vec<String> {
    let Some(cells) = month_grid(view.year, view.month) else {
        return Vec::new();
    };
    let nearest = view.nearest_due.as_deref();
    let mut rows = vec![" Mo   Tu   We   Th   Fr   Sa   Su".to_string()];
    for week in cells.chunks(7) {
        let row: Vec<String> = week
            .iter()
            .map(|date| {
                if date.month() != view.month {
                    return "  .  ".to_string();
                }
                let key = iso_key(*date);
                let mark = if nearest == Some(key.as_str()) {
                    '!'
                } else if view.days.contains_key(&key) {
                    '*'
                } else {
                    ' '
                };
                if *date == today {
                    format!("[{:>2}]{mark}", date.day())
                } else {
                    format!(" {:>2} {mark}", date.day())
                }
            })
            .collect();
        rows.push(row.join("").trim_end().to_string());
    }
    rows
}

fn cmd_year(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let parsed = parse_args(args, &[])?;
    let year = parse_year(require(&parsed.positional, 0, "year YYYY")?)?;
    let subs = context.subscriptions()?;
    let totals = year_totals(&subs, year);

    section(format!("Year {year}"));
    for (name, amount) in MONTH_NAMES.iter().zip(totals.months.iter()) {
        line(format!("{name}  {:>12}", context.money(*amount)));
    }
    line(format!("Total {:>12}", context.money(totals.total())));
    Ok(())
}

fn cmd_month(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let parsed = parse_args(args, &["top"])?;
    let (year, month) =
        parse_year_month(require(&parsed.positional, 0, "month YYYY-MM [--top N]")?)?;
    let top = parsed.count("top")?.unwrap_or(TOP_SPENDERS);
    let subs = context.subscriptions()?;
    let totals = month_totals_by_subscription(&subs, year, month, Some(top));

    section(format!("Spending {year}-{month:02}"));
    if totals.is_empty() {
        info("No payments this month.");
        return Ok(());
    }
    for entry in &totals {
        line(format!(
            "{:<24} x{}  {:>12}",
            entry.name,
            entry.occurrences,
            context.money(entry.amount)
        ));
    }
    Ok(())
}

fn cmd_upcoming(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let parsed = parse_args(args, &["days", "limit"])?;
    let days = parsed
        .count("days")?
        .map_or(UPCOMING_HORIZON_DAYS, |days| {
            u32::try_from(days).unwrap_or(u32::MAX)
        });
    let limit = parsed.count("limit")?.unwrap_or(UPCOMING_LIMIT);
    let subs = context.subscriptions()?;
    let payments = upcoming(&subs, context.today, days, Some(limit));

    section(format!("Upcoming payments (next {days} days)"));
    if payments.is_empty() {
        info("No upcoming payments.");
        return Ok(());
    }
    for payment in &payments {
        line(format!(
            "{}  {:<10}  {:<24} {:>12}",
            payment.date,
            relative_day(payment.days_from_today),
            payment.subscription.name,
            context.money(payment.subscription.price)
        ));
    }
    Ok(())
}

fn cmd_next(context: &mut CliContext, _args: &[&str]) -> CommandResult {
    let subs = context.subscriptions()?;
    match earliest_across_all(&subs, context.today) {
        Some(next) => line(format!(
            "Next payment: {} on {} ({}), {}",
            next.subscription.name,
            next.date,
            relative_day(next.days_until),
            context.money(next.subscription.price)
        )),
        None => info("No upcoming payments."),
    }
    Ok(())
}

fn cmd_summary(context: &mut CliContext, _args: &[&str]) -> CommandResult {
    let subs = context.subscriptions()?;
    let summary = spending_summary(&subs, &context.settings, context.today);

    section(format!("Summary {}-{:02}", summary.year, summary.month));
    line(format!("Active subscriptions: {}", summary.active_count));
    line(format!("Billed this month: {}", context.money(summary.month_total)));
    match summary.limit {
        Some(limit) if summary.over_limit => warning(format!(
            "Monthly limit {} exceeded by {}",
            context.money(limit),
            context.money(summary.month_total - limit)
        )),
        Some(limit) => line(format!("Monthly limit: {}", context.money(limit))),
        None => line("Monthly limit: off"),
    }
    for entry in &summary.top {
        line(format!("  {:<24} {:>12}", entry.name, context.money(entry.amount)));
    }
    if let Some(next) = &summary.next_due {
        line(format!(
            "Next payment: {} on {} ({})",
            next.subscription.name,
            next.date,
            relative_day(next.days_until)
        ));
    }
    Ok(())
}

fn relative_day(days: i64) -> String {
    match days {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        n => format!("in {n} days"),
    }
}
