//! studytrack - Study time tracker CLI
//!
//! Reads a session snapshot and prints chart series, history listings and
//! derived metrics as text, markdown or JSON.

mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use studytrack_core::analytics::{
    compute_available_years, compute_history, compute_series, compute_subject_distribution,
    compute_summary, compute_theoretical_practical_split, compute_year_comparison,
    default_comparison, running_totals, sorted_listing, yearly_totals, Granularity, Window,
    YearCursor, ZoomLevel,
};
use studytrack_core::{Config, DateKey, SessionDraft, SnapshotFile, StudyType};

use crate::render::Renderer;

#[derive(Parser, Debug)]
#[command(name = "studytrack")]
#[command(about = "Study time tracker - series, history and comparisons")]
#[command(version)]
struct Args {
    /// Snapshot file (default: configured snapshot path)
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Reference date as DD-MM-YYYY (default: today)
    #[arg(long, global = true)]
    today: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Md,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Chart series for a window, oldest first
    Series {
        /// day, week, month, year or all (default: from config)
        #[arg(long)]
        zoom: Option<ZoomLevel>,
        /// Bucket size (default depends on the zoom level)
        #[arg(long)]
        granularity: Option<Granularity>,
        /// Anchor month, 1-12 (default: current month)
        #[arg(long)]
        month: Option<u32>,
        /// Anchor year (default: current year)
        #[arg(long)]
        year: Option<i32>,
        /// Steps forward (positive) or back (negative) from the anchor
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        shift: i64,
        /// Add cumulative totals
        #[arg(long)]
        running: bool,
    },
    /// Periods with data, newest first
    History {
        /// day, week, month or year
        #[arg(long, default_value = "month")]
        granularity: Granularity,
        /// Only periods in this year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Session listing, newest first
    Sessions {
        /// Only this month, 1-12 (requires --year or uses the current year)
        #[arg(long)]
        month: Option<u32>,
        /// Only this year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Hours per subject
    Subjects,
    /// Theoretical vs practical hours
    Split,
    /// Totals per year
    Years {
        /// Year to select (default: current or most recent year)
        #[arg(long)]
        year: Option<i32>,
        /// Steps to newer (positive) or older (negative) years with data
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        step: i64,
    },
    /// Compare two years side by side
    Compare {
        /// First year (default: current or most recent year)
        first: Option<i32>,
        /// Second year (default: most recent other year)
        second: Option<i32>,
    },
    /// Dashboard summary for the reference date
    Summary,
    /// Log a new session
    Add {
        /// Session date as DD-MM-YYYY (default: reference date)
        #[arg(long)]
        date: Option<String>,
        /// Catalog subject name
        #[arg(long)]
        subject: Option<String>,
        /// Hours studied, greater than 0 and at most 24
        #[arg(long)]
        hours: f64,
        /// theoretical or practical (accented Spanish labels accepted)
        #[arg(long = "type")]
        study_type: StudyType,
    },
    /// Soft-delete a session
    Delete {
        /// Session id
        id: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard =
        studytrack_core::logging::init(&config.logging).context("failed to initialize logging")?;

    let today = match &args.today {
        Some(s) => DateKey::parse(s).context("invalid --today")?,
        None => DateKey::today(),
    };
    let file = SnapshotFile::new(args.input.clone().unwrap_or_else(|| config.snapshot_path()));
    let out = Renderer::new(args.format);

    tracing::info!(command = ?args.command, path = %file.path().display(), %today, "studytrack starting");

    match args.command {
        Command::Series {
            zoom,
            granularity,
            month,
            year,
            shift,
            running,
        } => {
            let snapshot = load(&file)?;
            let zoom = zoom.unwrap_or(config.dashboard.default_zoom);
            let granularity = granularity.unwrap_or_else(|| default_granularity(zoom));

            if let Some(month) = month {
                check_month(month)?;
            }
            let mut window = match (month, year) {
                (None, None) => Window::new(zoom, today),
                (month, year) => Window::at_month(
                    zoom,
                    month.unwrap_or(today.month()),
                    year.unwrap_or(today.year()),
                ),
            };
            let years = compute_available_years(&snapshot.sessions);
            for _ in 0..shift.unsigned_abs() {
                window = if shift > 0 {
                    window.next_within(&years)
                } else {
                    window.previous_within(&years)
                };
            }

            let series = compute_series(&snapshot.sessions, granularity, &window, today);
            if running {
                out.running(&window, &running_totals(&series))?;
            } else {
                out.series(&window, granularity, &series, &years)?;
            }
        }
        Command::History { granularity, year } => {
            let snapshot = load(&file)?;
            let mut history = compute_history(&snapshot.sessions, granularity);
            if let Some(year) = year {
                history.retain(|bucket| bucket.key.year() == year);
            }
            out.history(granularity, &history)?;
        }
        Command::Sessions { month, year } => {
            let snapshot = load(&file)?;
            let filter = match (month, year) {
                (Some(month), year) => {
                    check_month(month)?;
                    Some((year.unwrap_or(today.year()), month))
                }
                (None, _) => None,
            };
            let mut listing = sorted_listing(&snapshot.sessions, filter);
            if let (None, Some(year)) = (month, year) {
                listing.retain(|s| s.date_key().map_or(false, |d| d.year() == year));
            }
            out.sessions(&listing)?;
        }
        Command::Subjects => {
            let snapshot = load(&file)?;
            let shares = compute_subject_distribution(&snapshot.sessions, &snapshot.subjects);
            out.subjects(&shares)?;
        }
        Command::Split => {
            let snapshot = load(&file)?;
            out.split(&compute_theoretical_practical_split(&snapshot.sessions))?;
        }
        Command::Years { year, step } => {
            let snapshot = load(&file)?;
            let years = compute_available_years(&snapshot.sessions);
            let mut cursor = YearCursor::new(years, today);
            if let Some(year) = year {
                cursor = cursor.select(year);
            }
            for _ in 0..step.unsigned_abs() {
                cursor = if step > 0 {
                    cursor.next()
                } else {
                    cursor.previous()
                };
            }
            out.years(&cursor, &yearly_totals(&snapshot.sessions))?;
        }
        Command::Compare { first, second } => {
            let snapshot = load(&file)?;
            let years = compute_available_years(&snapshot.sessions);
            let (first, second) = match (first, second) {
                (Some(a), Some(b)) => (a, b),
                (Some(a), None) => (a, years.iter().copied().find(|&y| y != a).unwrap_or(a)),
                // Unavailable either way; the comparison reports why.
                (None, _) => default_comparison(&years, today).unwrap_or((today.year(), today.year())),
            };
            let comparison = compute_year_comparison(&snapshot.sessions, first, second);
            out.comparison(first, second, &comparison)?;
        }
        Command::Summary => {
            let snapshot = load(&file)?;
            out.summary(&compute_summary(&snapshot.sessions, &snapshot.subjects, today))?;
        }
        Command::Add {
            date,
            subject,
            hours,
            study_type,
        } => {
            let mut snapshot = file
                .load_or_default()
                .with_context(|| format!("failed to load {}", file.path().display()))?;
            let draft = SessionDraft {
                date: date.unwrap_or_else(|| today.to_string()),
                subject,
                hours,
                study_type,
            };
            let session = draft
                .into_session(&snapshot.subjects, today, None)
                .context("session rejected")?;
            let id = session.id.clone();
            snapshot.add_session(session)?;
            file.save(&snapshot).context("failed to save snapshot")?;
            out.message(&format!("Added session {}", id), &id)?;
        }
        Command::Delete { id } => {
            let mut snapshot = load(&file)?;
            snapshot
                .soft_delete_session(&id)
                .with_context(|| format!("cannot delete session {}", id))?;
            file.save(&snapshot).context("failed to save snapshot")?;
            out.message(&format!("Deleted session {}", id), &id)?;
        }
    }

    Ok(())
}

fn load(file: &SnapshotFile) -> Result<studytrack_core::Snapshot> {
    file.load()
        .with_context(|| format!("failed to load snapshot {}", file.path().display()))
}

fn check_month(month: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        anyhow::bail!("Month must be between 1 and 12");
    }
    Ok(())
}

/// Bucket size a zoom level is charted at by default.
fn default_granularity(zoom: ZoomLevel) -> Granularity {
    match zoom {
        ZoomLevel::Day | ZoomLevel::Week | ZoomLevel::Month => Granularity::Day,
        ZoomLevel::Year | ZoomLevel::All => Granularity::Month,
    }
}
