use std::path::PathBuf;

use chrono::{Datelike, Weekday};
use dccalendar::{apply_schedule, CalendarEntry, MonthGrid};
use dcchrono::{DateProvider, SystemDateProvider};
use itertools::Itertools;

use crate::util::settings::load_settings;

use super::Cmd;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

// -----------------------------------------------------------------------------
// Args
// -----------------------------------------------------------------------------
#[derive(Debug, clap::Args)]
pub struct Args {
    /// Year of the month to print. Defaults to the current one
    #[clap(short = 'y', long = "year")]
    pub year: Option<i32>,

    /// Month to print, 1 to 12. Defaults to the current one
    #[clap(short = 'm', long = "month")]
    pub month: Option<u32>,

    /// Settings file (.json or .yaml) whose schedules are applied
    #[clap(short = 's', long = "settings")]
    pub settings: Option<PathBuf>,
}

impl Cmd for Args {
    fn run(&self) -> anyhow::Result<()> {
        let today = SystemDateProvider.today();
        let year = self.year.unwrap_or(today.year());
        let month = self.month.unwrap_or(today.month());
        let settings = load_settings(self.settings.as_deref())?;

        let mut grid = MonthGrid::new(year, month)?;
        apply_schedule(&mut grid, settings.schedules())?;
        print!("{}", render(&grid));
        Ok(())
    }
}

/// Displayed weeks as text, followed by the information of the days in the month.
///
/// Days outside the month are in parentheses,
/// holidays are followed by `*` and scheduled days by `+`.
pub fn render(grid: &MonthGrid) -> String {
    let mut out = format!("{:^35}\n", format!("{}-{:02}", grid.year(), grid.month()));
    out.push_str(&WEEKDAYS.iter().map(|w| format!(" {w} ")).join(""));
    out.push('\n');
    for week in grid.weeks() {
        out.push_str(&week.iter().map(render_cell).join(""));
        out.push('\n');
    }

    let notes = grid
        .values()
        .filter(|e| !e.is_outside_month() && !e.information().is_empty())
        .map(|e| format!("{} {}", e.date(), e.information()))
        .join("\n");
    if !notes.is_empty() {
        out.push('\n');
        out.push_str(&notes);
        out.push('\n');
    }
    out
}

fn render_cell(entry: &CalendarEntry) -> String {
    let day = entry.date().day();
    let mark = if entry.is_non_working_day() {
        '*'
    } else if entry.is_scheduled_day() {
        '+'
    } else {
        ' '
    };
    if entry.is_outside_month() {
        format!("({day:>2}){mark}")
    } else {
        format!(" {day:>2}{mark} ")
    }
}
