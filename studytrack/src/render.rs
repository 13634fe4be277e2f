//! Output rendering for the CLI views (text, markdown, JSON).

use anyhow::Result;
use serde::Serialize;
use serde_json::json;
use studytrack_core::analytics::{
    percent_of, Bucket, Comparison, DashboardSummary, Granularity, RunningTotal, Split,
    SubjectShare, Window, YearCursor, YearTotals,
};
use studytrack_core::format::{bar, format_hours, format_percent, weekday_name};
use studytrack_core::StudySession;

use crate::Format;

const BAR_WIDTH: usize = 20;

pub struct Renderer {
    format: Format,
}

impl Renderer {
    pub fn new(format: Format) -> Self {
        Self { format }
    }

    /// `years` bounds year-zoom navigation.
    pub fn series(
        &self,
        window: &Window,
        granularity: Granularity,
        series: &[Bucket],
        years: &[i32],
    ) -> Result<()> {
        let (previous, next) = (
            window.can_previous_within(years),
            window.can_next_within(years),
        );
        if self.format == Format::Json {
            return print_json(&json!({
                "window": window,
                "granularity": granularity,
                "canPrevious": previous,
                "canNext": next,
                "buckets": series,
            }));
        }

        let title = format!("{} by {}", span_title(window, series), granularity);
        let max = series
            .iter()
            .map(|b| b.totals.total_hours)
            .fold(0.0_f64, f64::max);
        let rows: Vec<Vec<String>> = series
            .iter()
            .map(|b| {
                vec![
                    b.period_label.clone(),
                    format_hours(b.totals.total_hours),
                    format_hours(b.totals.theoretical_hours),
                    format_hours(b.totals.practical_hours),
                    bar(percent_of(b.totals.total_hours, max), BAR_WIDTH),
                ]
            })
            .collect();
        let total: f64 = series.iter().map(|b| b.totals.total_hours).sum();

        self.table(
            &title,
            &["Period", "Total", "Theoretical", "Practical", ""],
            &rows,
        );
        self.footer(&format!("Total: {}", format_hours(total)));
        if let Some(hint) = navigation_hint(previous, next, "--shift") {
            self.footer(&hint);
        }
        Ok(())
    }

    pub fn running(&self, window: &Window, running: &[RunningTotal]) -> Result<()> {
        if self.format == Format::Json {
            return print_json(&json!({ "window": window, "running": running }));
        }

        let rows: Vec<Vec<String>> = running
            .iter()
            .map(|r| {
                vec![
                    r.period_label.clone(),
                    format_hours(r.hours),
                    format_hours(r.cumulative_hours),
                ]
            })
            .collect();
        self.table(
            &format!("Running total ({})", window.zoom),
            &["Period", "Hours", "Cumulative"],
            &rows,
        );
        Ok(())
    }

    pub fn history(&self, granularity: Granularity, history: &[Bucket]) -> Result<()> {
        if self.format == Format::Json {
            return print_json(&json!({ "granularity": granularity, "periods": history }));
        }
        if history.is_empty() {
            println!("No sessions found.");
            return Ok(());
        }

        let rows: Vec<Vec<String>> = history
            .iter()
            .map(|b| {
                vec![
                    b.period_label.clone(),
                    format_hours(b.totals.total_hours),
                    format_hours(b.totals.theoretical_hours),
                    format_hours(b.totals.practical_hours),
                    b.totals.session_count.to_string(),
                ]
            })
            .collect();
        self.table(
            &format!("History by {}", granularity),
            &["Period", "Total", "Theoretical", "Practical", "Sessions"],
            &rows,
        );
        Ok(())
    }

    pub fn sessions(&self, sessions: &[&StudySession]) -> Result<()> {
        if self.format == Format::Json {
            return print_json(&json!({ "sessions": sessions }));
        }
        if sessions.is_empty() {
            println!("No sessions found.");
            return Ok(());
        }

        let rows: Vec<Vec<String>> = sessions
            .iter()
            .map(|s| {
                let day = s
                    .date_key()
                    .map(|d| format!("{} {}", weekday_name(d.weekday()), s.date))
                    .unwrap_or_else(|_| s.date.clone());
                vec![
                    day,
                    s.subject_name().unwrap_or("-").to_string(),
                    format_hours(s.effective_hours()),
                    s.study_type
                        .map(|t| t.display_name().to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    s.id.clone(),
                ]
            })
            .collect();
        self.table("Sessions", &["Date", "Subject", "Hours", "Type", "Id"], &rows);
        Ok(())
    }

    pub fn subjects(&self, shares: &[SubjectShare]) -> Result<()> {
        if self.format == Format::Json {
            return print_json(&json!({ "subjects": shares }));
        }
        if shares.is_empty() {
            println!("No study time recorded for any subject.");
            return Ok(());
        }

        let rows: Vec<Vec<String>> = shares
            .iter()
            .map(|s| {
                vec![
                    s.name.clone(),
                    format_hours(s.hours),
                    format_percent(s.percent),
                    bar(s.percent, BAR_WIDTH),
                ]
            })
            .collect();
        self.table("Hours by subject", &["Subject", "Hours", "Share", ""], &rows);
        Ok(())
    }

    pub fn split(&self, split: &Split) -> Result<()> {
        if self.format == Format::Json {
            return print_json(split);
        }

        let rows = vec![
            vec![
                "Theoretical".to_string(),
                format_hours(split.theoretical_hours),
                format_percent(split.theoretical_percent),
                bar(split.theoretical_percent, BAR_WIDTH),
            ],
            vec![
                "Practical".to_string(),
                format_hours(split.practical_hours),
                format_percent(split.practical_percent),
                bar(split.practical_percent, BAR_WIDTH),
            ],
        ];
        self.table("Theoretical vs practical", &["Type", "Hours", "Share", ""], &rows);
        Ok(())
    }

    pub fn years(&self, cursor: &YearCursor, totals: &[YearTotals]) -> Result<()> {
        let selected = cursor.selected();
        if self.format == Format::Json {
            return print_json(&json!({
                "selected": selected,
                "canPrevious": cursor.can_previous(),
                "canNext": cursor.can_next(),
                "years": totals,
            }));
        }
        if totals.is_empty() {
            println!("No sessions found.");
            return Ok(());
        }

        let rows: Vec<Vec<String>> = totals
            .iter()
            .map(|t| {
                let marker = if Some(t.year) == selected { "*" } else { "" };
                vec![
                    format!("{}{}", t.year, marker),
                    format_hours(t.totals.total_hours),
                    format_hours(t.totals.theoretical_hours),
                    format_hours(t.totals.practical_hours),
                ]
            })
            .collect();
        self.table(
            "Totals per year",
            &["Year", "Total", "Theoretical", "Practical"],
            &rows,
        );
        if let Some(hint) = navigation_hint(cursor.can_previous(), cursor.can_next(), "--step") {
            self.footer(&hint);
        }
        Ok(())
    }

    pub fn comparison(&self, first: i32, second: i32, comparison: &Comparison) -> Result<()> {
        if self.format == Format::Json {
            return print_json(comparison);
        }

        match (comparison.rows(), comparison) {
            (Some(rows), _) => {
                let rows: Vec<Vec<String>> = rows
                    .iter()
                    .map(|row| {
                        vec![
                            capitalize(row.category),
                            format_hours(row.first),
                            format_hours(row.second),
                        ]
                    })
                    .collect();
                let (a, b) = (first.to_string(), second.to_string());
                self.table(
                    &format!("{} vs {}", first, second),
                    &["Category", a.as_str(), b.as_str()],
                    &rows,
                );
            }
            (None, Comparison::Unavailable { reason }) => {
                println!("Comparison unavailable: {}", reason);
            }
            (None, Comparison::Available { .. }) => {}
        }
        Ok(())
    }

    pub fn summary(&self, summary: &DashboardSummary) -> Result<()> {
        if self.format == Format::Json {
            return print_json(summary);
        }

        let rows = vec![
            vec![
                format!("This month ({})", summary.month_label),
                format_hours(summary.month_total.total_hours),
            ],
            vec![
                format!("This year ({})", summary.today.year()),
                format_hours(summary.year_total.total_hours),
            ],
            vec![
                "All time".to_string(),
                format_hours(summary.all_time.total_hours),
            ],
            vec![
                "Theoretical".to_string(),
                format!(
                    "{} ({})",
                    format_hours(summary.split.theoretical_hours),
                    format_percent(summary.split.theoretical_percent)
                ),
            ],
            vec![
                "Practical".to_string(),
                format!(
                    "{} ({})",
                    format_hours(summary.split.practical_hours),
                    format_percent(summary.split.practical_percent)
                ),
            ],
        ];
        self.table(&format!("Summary for {}", summary.today), &["", "Hours"], &rows);

        if !summary.subjects.is_empty() {
            println!();
            self.subjects(&summary.subjects)?;
        }
        Ok(())
    }

    /// Confirmation after a write.
    pub fn message(&self, text: &str, id: &str) -> Result<()> {
        match self.format {
            Format::Json => print_json(&json!({ "id": id, "message": text })),
            _ => {
                println!("{}", text);
                Ok(())
            }
        }
    }

    fn table(&self, title: &str, headers: &[&str], rows: &[Vec<String>]) {
        match self.format {
            Format::Md => print_markdown_table(title, headers, rows),
            _ => print_text_table(title, headers, rows),
        }
    }

    fn footer(&self, text: &str) {
        match self.format {
            Format::Md => println!("\n**{}**", text),
            _ => println!("{}", text),
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_text_table(title: &str, headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<w$}", cell, w = w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    println!("{}", title);
    println!("{}", "─".repeat(title.chars().count()));
    println!("{}", line(headers.to_vec()));
    for row in rows {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
}

fn print_markdown_table(title: &str, headers: &[&str], rows: &[Vec<String>]) {
    println!("## {}", title);
    println!();
    println!("| {} |", headers.join(" | "));
    println!(
        "|{}|",
        headers.iter().map(|_| "---").collect::<Vec<_>>().join("|")
    );
    for row in rows {
        println!("| {} |", row.join(" | "));
    }
}

fn span_title(window: &Window, series: &[Bucket]) -> String {
    match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() > 1 || first.key.start() != last.key.end() => {
            format!("{} to {}", first.key.start(), last.key.end())
        }
        (Some(first), _) => first.key.start().to_string(),
        _ => format!("No data ({})", window.zoom),
    }
}

fn navigation_hint(previous: bool, next: bool, flag: &str) -> Option<String> {
    match (previous, next) {
        (true, true) => Some(format!("{flag} -1 for older, {flag} 1 for newer")),
        (true, false) => Some(format!("{flag} -1 for older")),
        (false, true) => Some(format!("{flag} 1 for newer")),
        (false, false) => None,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
