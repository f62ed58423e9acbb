use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use week_scheduler::time_dial::is_minute_step;
use week_scheduler::{
    dates_to_selection, enumerate_minutes, selection_to_dates, week_of, DayMapping,
    SchedulerOptions, Selection, WeekScheduler,
};

#[derive(Parser)]
#[command(
    name = "weeksched",
    version,
    about = "Resolve weekly schedule selections into concrete dates"
)]
struct Cli {
    /// JSON file with widget options (camelCase keys)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// First day of week, 0 = Sunday .. 6 = Saturday
    #[arg(long, global = true, allow_negative_numbers = true)]
    first_day: Option<i32>,

    /// Last day of week, must be the day before the first day
    #[arg(long, global = true, allow_negative_numbers = true)]
    last_day: Option<i32>,

    /// Log at debug level to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the week containing a date
    WeekOf {
        /// YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS]
        date: String,
    },
    /// List the selectable weeks between two dates
    Weeks {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },
    /// Turn a week, days and time into concrete dates
    Dates {
        /// Any day in the week
        #[arg(long)]
        week: NaiveDate,
        /// Comma-separated weekday indices, 0 = Sunday
        #[arg(long, value_delimiter = ',', required = true)]
        days: Vec<u8>,
        #[arg(long, default_value_t = 0)]
        hour: u32,
        #[arg(long, default_value_t = 0)]
        minute: u32,
    },
    /// Rebuild the selection shared by a set of dates
    Selection {
        /// YYYY-MM-DDTHH:MM[:SS] values
        #[arg(required = true)]
        dates: Vec<String>,
    },
    /// List the minute dial steps
    Minutes {
        /// Overrides minutesPrecision from the config file
        #[arg(long, allow_negative_numbers = true)]
        precision: Option<i32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut options = load_options(cli.config.as_ref())?;
    if let Some(first) = cli.first_day {
        options.first_day_of_week = first;
    }
    if let Some(last) = cli.last_day {
        options.last_day_of_week = last;
    }

    match cli.command {
        Command::WeekOf { date } => {
            let mapping = options.validate()?;
            let date = parse_datetime(&date)?;
            let week = week_of(date, mapping.first_day(), mapping.last_day())?;
            print_json(&week)
        }
        Command::Weeks { from, to } => {
            options.start_date = from;
            options.end_date = to;
            let widget = WeekScheduler::new(options)?;
            print_json(&widget.week_options())
        }
        Command::Dates {
            week,
            days,
            hour,
            minute,
        } => {
            let mapping = options.validate()?;
            if !is_minute_step(minute, options.minutes_precision) {
                bail!(
                    "minute {minute} is not a multiple of the {}-minute precision",
                    options.minutes_precision
                );
            }
            let selection = Selection {
                week: week_of(
                    week.and_time(NaiveTime::MIN),
                    mapping.first_day(),
                    mapping.last_day(),
                )?,
                days: days.into_iter().collect(),
                hour,
                minute,
            };
            let dates = selection_to_dates(&selection, &mapping)?;
            print_json(&dates)
        }
        Command::Selection { dates } => {
            let mapping: DayMapping = options.validate()?;
            let dates = dates
                .iter()
                .map(String::as_str)
                .map(parse_datetime)
                .collect::<Result<Vec<_>>>()?;
            let selection = dates_to_selection(&dates, &mapping)?;
            print_json(&selection)
        }
        Command::Minutes { precision } => {
            let precision = precision.unwrap_or(options.minutes_precision);
            print_json(&enumerate_minutes(precision)?)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_options(path: Option<&PathBuf>) -> Result<SchedulerOptions> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            let options = SchedulerOptions::from_json(&json)
                .with_context(|| format!("invalid config {}", path.display()))?;
            debug!(config = %path.display(), "loaded options");
            Ok(options)
        }
        None => {
            let today = Local::now().date_naive();
            Ok(SchedulerOptions::new(today, today))
        }
    }
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("cannot parse '{s}' as a date or datetime"))?;
    Ok(date.and_time(NaiveTime::MIN))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}
