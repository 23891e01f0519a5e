use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use dccalendar::{apply_schedule, HolidayRunDetector, HolidayRunInfo, MonthGrid};
use dcchrono::{DateProvider, FixedDateProvider, SystemDateProvider};

use crate::util::settings::load_settings;

use super::Cmd;

// -----------------------------------------------------------------------------
// Args
// -----------------------------------------------------------------------------
#[derive(Debug, clap::Args)]
pub struct Args {
    /// Pivot date (YYYY-MM-DD). Defaults to today
    #[clap(short = 'd', long = "date")]
    pub date: Option<NaiveDate>,

    /// Days scanned ahead, the pivot included. Overrides the settings file
    #[clap(long = "depth")]
    pub depth: Option<u32>,

    /// Settings file (.json or .yaml) whose schedules are applied
    #[clap(short = 's', long = "settings")]
    pub settings: Option<PathBuf>,

    /// Print the result as JSON
    #[clap(long = "json")]
    pub json: bool,
}

impl Args {
    fn provider(&self) -> Box<dyn DateProvider> {
        match self.date {
            Some(date) => Box::new(FixedDateProvider(date)),
            None => Box::new(SystemDateProvider),
        }
    }
}

impl Cmd for Args {
    fn run(&self) -> anyhow::Result<()> {
        let mut settings = load_settings(self.settings.as_deref())?;
        if let Some(depth) = self.depth {
            settings = settings.with_search_depth(depth)?;
        }
        let provider = self.provider();
        let pivot = provider.today();

        let mut grid = MonthGrid::current(&provider)?;
        apply_schedule(&mut grid, settings.schedules())?;
        let info = HolidayRunDetector::new(&grid).run(pivot, settings.search_depth())?;
        log::debug!(
            "{pivot} in {}-{:02}: {info:?}",
            grid.year(),
            grid.month()
        );

        if self.json {
            println!("{}", serde_json::to_string_pretty(&info)?);
        } else {
            print!("{}", describe(&grid, pivot, &info));
        }
        Ok(())
    }
}

/// Human readable report with one line per day of the run.
pub fn describe(grid: &MonthGrid, pivot: NaiveDate, info: &HolidayRunInfo) -> String {
    let mut out = format!("{pivot} ({}): {info}\n", pivot.weekday());
    let Some(first) = info.start_date(pivot) else {
        return out;
    };
    for date in first.iter_days().take(info.total_days as usize) {
        let entry = grid.entry_or_default(date);
        let note = match entry.information() {
            "" => String::new(),
            s => format!(" {s}"),
        };
        out.push_str(&format!("  {date} {}{note}\n", date.weekday()));
    }
    out
}
