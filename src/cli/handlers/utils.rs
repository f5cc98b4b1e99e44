use crate::model::{Entry, SearchHit};
use anyhow::Result;
use colored::Colorize;
use std::io::{self, Read};

use super::Journal;

/// Resolve entry text from a CLI arg, reading stdin for '-'
pub fn resolve_content(content: Option<String>) -> Result<Option<String>> {
    match content {
        Some(c) if c == "-" => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(Some(text.trim().to_string()))
        }
        Some(c) => Ok(Some(c.trim().to_string())),
        None => Ok(None),
    }
}

/// Flatten `--tag a --tag "b, c"` into `[a, b, c]`, dropping blanks
pub fn parse_tags(raw: &[String]) -> Vec<String> {
    raw.iter()
        .flat_map(|t| t.split(','))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Format a mood rating with color coding
pub fn format_mood(mood: Option<i64>) -> colored::ColoredString {
    match mood {
        None => "-".dimmed(),
        Some(m) if m <= 1 => m.to_string().red(),
        Some(2) => "2".yellow(),
        Some(3) => "3".white(),
        Some(4) => "4".green(),
        Some(m) => m.to_string().bright_green().bold(),
    }
}

pub fn print_status_line(journal: &Journal) {
    let label = journal.status_label();
    if journal.is_available() {
        println!("{}", label.green());
    } else {
        println!("{}", label.yellow());
    }
}

/// Print a single entry with details
pub fn print_entry(entry: &Entry) {
    let title = if entry.title.is_empty() {
        "(untitled)".dimmed().to_string()
    } else {
        entry.title.bold().to_string()
    };
    println!("{} {}", entry.date.cyan().bold(), title);
    println!("ID:       {}", entry.id.dimmed());
    println!("Mood:     {}", format_mood(entry.mood));
    if !entry.tags.is_empty() {
        println!("Tags:     {}", entry.tags.join(", ").magenta());
    }
    println!(
        "Created:  {}",
        entry.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
    );
    println!(
        "Updated:  {}",
        entry.updated_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
    );

    if !entry.content.is_empty() {
        println!();
        println!("{}", entry.content);
    }
}

/// Print search hits (compact format)
pub fn print_hit_list(hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("No entries found.");
        return;
    }

    for hit in hits {
        let first_line = hit.snippet.lines().next().unwrap_or_default();
        println!(
            "{} [{}] {} {}",
            hit.date.cyan(),
            format_mood(hit.mood),
            hit.title.bold(),
            first_line.dimmed()
        );
    }
}
