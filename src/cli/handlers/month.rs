use crate::calendar::{self, CalendarDay};
use crate::storage::EntryStore;
use crate::validation;
use anyhow::{Context, Result};
use chrono::Datelike;
use colored::Colorize;

use super::CommandContext;
use super::utils::print_status_line;

/// Which month to show relative to the one named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthStep {
    Previous,
    Current,
    Next,
}

pub fn handle_month(
    ctx: &CommandContext,
    year: Option<i32>,
    month: Option<u32>,
    step: MonthStep,
    json: bool,
) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let year = year.unwrap_or(today.year());
    let month = month.unwrap_or(today.month());
    validation::validate_year_month(year, month)?;
    let (year, month) = match step {
        MonthStep::Previous => calendar::previous_month(year, month),
        MonthStep::Current => (year, month),
        MonthStep::Next => calendar::next_month(year, month),
    };

    // the month listing is also the availability probe
    let summaries = ctx
        .journal
        .list_by_month(year, month)
        .context("Failed to load month.")?;
    let grid = calendar::month_grid(year, month, today, &summaries)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "year": year,
                "month": month,
                "connected": ctx.journal.is_available(),
                "entries": summaries,
            }))?
        );
        return Ok(());
    }

    println!("{}", calendar::month_title(year, month).bold());
    println!("{}", WEEKDAYS.map(|d| format!("{:<3}", d)).join(" ").dimmed());
    for week in grid.chunks(7) {
        let line: Vec<String> = week.iter().map(render_day).collect();
        println!("{}", line.join(" "));
    }
    println!();
    println!(
        "{} {}",
        summaries.len(),
        if summaries.len() == 1 { "entry" } else { "entries" }
    );
    print_status_line(&ctx.journal);
    Ok(())
}

const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// Three columns per day: the day number and a dot when an entry exists,
/// colored by mood.
fn render_day(day: &CalendarDay) -> String {
    let marker = if day.has_entry && !day.outside { "•" } else { " " };
    let label = format!("{:>2}{}", day.date.day(), marker);
    let styled = if day.outside {
        label.dimmed()
    } else if day.has_entry {
        match day.mood {
            Some(m) if m <= 2 => label.yellow().bold(),
            Some(m) if m >= 4 => label.green().bold(),
            _ => label.cyan().bold(),
        }
    } else {
        label.normal()
    };
    if day.is_today {
        styled.underline().to_string()
    } else {
        styled.to_string()
    }
}
