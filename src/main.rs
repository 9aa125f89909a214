mod calc;
mod calendar;
mod cmd;
mod data;
mod picker;
mod telemetry;
mod ui;

use crate::data::model::{ViewKind, WeekStart};
use crate::data::DatepickerConfig;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "datepick", about = "terminal date and date range picker")]
struct Cli {
    /// Path to the data directory containing config.yaml and selection.json (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,

    /// Log file for the interactive picker (default: <data-dir>/datepick.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    overrides: ConfigArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Command-line overrides for values read from config.yaml.
#[derive(Args)]
struct ConfigArgs {
    /// Locale id (en, en-GB, de, fr)
    #[arg(long, global = true)]
    locale: Option<String>,
    /// First day of the week (monday, saturday, sunday)
    #[arg(long, global = true, value_parser = parse_week_start)]
    week_start: Option<WeekStart>,
    /// Earliest selectable date (YYYY-MM-DD)
    #[arg(long, global = true)]
    min_date: Option<NaiveDate>,
    /// Latest selectable date (YYYY-MM-DD)
    #[arg(long, global = true)]
    max_date: Option<NaiveDate>,
    /// Custom input format, e.g. dd.MM.yyyy
    #[arg(long, global = true)]
    date_format: Option<String>,
    #[arg(long, global = true)]
    show_time: bool,
    #[arg(long, global = true)]
    show_seconds: bool,
    /// Always include the time; hides the ignore-time switch
    #[arg(long, global = true)]
    mandatory_time: bool,
    #[arg(long, global = true)]
    hide_week_numbers: bool,
    /// Pick months instead of days
    #[arg(long, global = true)]
    only_month: bool,
    /// Right-to-left arrow keys
    #[arg(long, global = true)]
    rtl: bool,
}

impl ConfigArgs {
    fn apply(&self, config: &mut DatepickerConfig) {
        if let Some(locale) = &self.locale {
            config.locale.clone_from(locale);
        }
        if self.week_start.is_some() {
            config.week_start_day = self.week_start;
        }
        if self.min_date.is_some() {
            config.min_date = self.min_date;
        }
        if self.max_date.is_some() {
            config.max_date = self.max_date;
        }
        if self.date_format.is_some() {
            config.date_format.clone_from(&self.date_format);
        }
        config.show_time |= self.show_time;
        config.show_seconds |= self.show_seconds;
        config.mandatory_time |= self.mandatory_time;
        config.hide_week_numbers |= self.hide_week_numbers;
        config.only_month_selection |= self.only_month;
        config.rtl |= self.rtl;
    }
}

fn parse_week_start(value: &str) -> Result<WeekStart, String> {
    WeekStart::parse(value).ok_or_else(|| format!("unknown week start '{value}'"))
}

#[derive(Clone, Copy, ValueEnum)]
enum GridView {
    Day,
    Month,
    Year,
}

impl From<GridView> for ViewKind {
    fn from(view: GridView) -> Self {
        match view {
            GridView::Day => ViewKind::Day,
            GridView::Month => ViewKind::Month,
            GridView::Year => ViewKind::Year,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config.yaml
    Init,
    /// Pick a single date interactively (the default)
    Pick {
        /// Start from the last saved selection
        #[arg(long)]
        resume: bool,
    },
    /// Pick a date range interactively
    Range {
        /// Show two calendars side by side
        #[arg(long)]
        two_month: bool,
        #[arg(long)]
        resume: bool,
    },
    /// Print a calendar page
    Grid {
        #[arg(long, value_enum, default_value = "day")]
        view: GridView,
        /// Date to focus (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Print the grid as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse and validate typed input as the date field would
    Parse {
        input: String,
        /// End of a range; switches to range validation
        #[arg(long)]
        end: Option<String>,
    },
    /// Show the week number and week bounds of a date
    Week {
        date: Option<NaiveDate>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Resolve data_dir to an absolute path so file I/O works regardless of
    // future directory changes within the process.
    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    data::persistence::set_data_dir(data_dir.clone());

    // Auto-init when the data directory is missing or empty and the user did not
    // explicitly invoke the `init` subcommand.
    let is_init_command = matches!(cli.command, Some(Commands::Init));
    if !is_init_command && dir_needs_init(&data_dir) {
        eprintln!(
            "Data directory '{}' is missing or empty, running init...",
            data_dir.display()
        );
        cmd::init::run()?;
    }

    let interactive = matches!(
        cli.command,
        None | Some(Commands::Pick { .. }) | Some(Commands::Range { .. })
    );
    let log_file = interactive.then(|| {
        cli.log_file
            .clone()
            .unwrap_or_else(|| data_dir.join("datepick.log"))
    });
    telemetry::init_tracing(log_file.as_deref())?;

    let mut config = DatepickerConfig::load()?;
    cli.overrides.apply(&mut config);
    debug!(data_dir = %data_dir.display(), locale = %config.locale, "config loaded");

    match cli.command {
        None => cmd::root::run(config, false),
        Some(Commands::Init) => cmd::init::run(),
        Some(Commands::Pick { resume }) => cmd::root::run(config, resume),
        Some(Commands::Range { two_month, resume }) => {
            config.enable_date_range = true;
            config.enable_two_month_date_range |= two_month;
            cmd::root::run(config, resume)
        }
        Some(Commands::Grid { view, date, json }) => cmd::grid::run(&config, view.into(), date, json),
        Some(Commands::Parse { input, end }) => cmd::parse::run(&config, &input, end.as_deref()),
        Some(Commands::Week { date }) => cmd::week::run(&config, date),
    }
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &std::path::Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
