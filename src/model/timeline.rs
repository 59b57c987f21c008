use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::task::{offset_days, Task};

/// Average month length used for month-granularity geometry. Month cells are
/// drawn at a constant width, so bar positions approximate the calendar
/// instead of tracking 28-31 day months exactly.
pub const AVG_DAYS_PER_MONTH: f32 = 30.44;

/// Calendar unit of one header cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
}

impl Granularity {
    pub fn all() -> &'static [Granularity] {
        &[Granularity::Day, Granularity::Week, Granularity::Month]
    }

    /// Calendar days covered by one cell.
    pub fn days_per_cell(&self) -> f32 {
        match self {
            Granularity::Day => 1.0,
            Granularity::Week => 7.0,
            Granularity::Month => AVG_DAYS_PER_MONTH,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Granularity::Day => "Day",
            Granularity::Week => "Week",
            Granularity::Month => "Month",
        }
    }
}

/// First day of a week column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// The week start on or before `date`.
    pub fn align(&self, date: NaiveDate) -> NaiveDate {
        let back = match self {
            WeekStart::Sunday => date.weekday().num_days_from_sunday(),
            WeekStart::Monday => date.weekday().num_days_from_monday(),
        };
        date - chrono::Duration::days(back as i64)
    }
}

/// Maps calendar dates to horizontal pixel offsets for one granularity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calendar {
    /// Date drawn at x = 0: the first axis tick.
    pub origin: NaiveDate,
    pub granularity: Granularity,
    /// Pixel width of one header cell.
    pub cell_width: f32,
}

impl Calendar {
    pub fn new(origin: NaiveDate, granularity: Granularity, cell_width: f32) -> Self {
        Self {
            origin,
            granularity,
            cell_width,
        }
    }

    pub fn pixels_per_day(&self) -> f32 {
        self.cell_width / self.granularity.days_per_cell()
    }

    /// Convert a date to an x-pixel offset from the origin.
    pub fn date_to_x(&self, date: NaiveDate) -> f32 {
        let days = (date - self.origin).num_days() as f32;
        days * self.pixels_per_day()
    }

    /// Pixel width spanned from `start` to `end`. Negative when inverted.
    pub fn span_width(&self, start: NaiveDate, end: NaiveDate) -> f32 {
        (end - start).num_days() as f32 * self.pixels_per_day()
    }

    /// Convert a pointer delta to whole days, rounding to the nearest day.
    /// A degenerate scale (zero, negative or non-finite cell width) moves
    /// nothing.
    pub fn drag_days(&self, delta_x: f32) -> i64 {
        let pixels_per_day = self.pixels_per_day();
        if !(pixels_per_day.is_finite() && pixels_per_day > 0.0) {
            return 0;
        }
        let days = (delta_x / pixels_per_day).round();
        if days.is_finite() {
            days as i64
        } else {
            0
        }
    }
}

/// Visible date window derived from every task's actual and baseline dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimelineRange {
    /// Span every recorded date, then pad by `lead_days` before and
    /// `tail_days` after. With no tasks the range is anchored on `today`.
    pub fn resolve(tasks: &[Task], today: NaiveDate, lead_days: i64, tail_days: i64) -> Self {
        let dates = tasks.iter().flat_map(|t| {
            [
                Some(t.start_date),
                Some(t.end_date),
                t.planned_start,
                t.planned_end,
            ]
            .into_iter()
            .flatten()
        });

        let (min, max) = dates.fold((None, None), |(min, max): (Option<NaiveDate>, Option<NaiveDate>), d| {
            (
                Some(min.map_or(d, |m| m.min(d))),
                Some(max.map_or(d, |m| m.max(d))),
            )
        });

        let min = min.unwrap_or(today);
        let max = max.unwrap_or(today);
        // Padding that would leave the calendar is dropped.
        Self {
            start: lead_days
                .checked_neg()
                .and_then(|back| offset_days(min, back))
                .unwrap_or(min),
            end: offset_days(max, tail_days).unwrap_or(max),
        }
    }
}

/// Tick dates covering a range at one granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateAxis {
    pub range: TimelineRange,
    pub granularity: Granularity,
    pub week_start: WeekStart,
}

impl DateAxis {
    pub fn new(range: TimelineRange, granularity: Granularity, week_start: WeekStart) -> Self {
        Self {
            range,
            granularity,
            week_start,
        }
    }

    /// The first tick, which is also x = 0 for the calendar.
    pub fn origin(&self) -> NaiveDate {
        let start = self.range.start;
        match self.granularity {
            Granularity::Day => start,
            Granularity::Week => self.week_start.align(start),
            Granularity::Month => start.with_day(1).unwrap_or(start),
        }
    }

    /// A fresh pass over the tick dates. Each call restarts from the origin.
    pub fn ticks(&self) -> AxisTicks {
        AxisTicks {
            next: Some(self.origin()),
            end: self.range.end,
            granularity: self.granularity,
        }
    }

    pub fn calendar(&self, cell_width: f32) -> Calendar {
        Calendar::new(self.origin(), self.granularity, cell_width)
    }
}

/// Lazy iterator over tick dates, stepping one cell until past the range end.
#[derive(Debug, Clone)]
pub struct AxisTicks {
    next: Option<NaiveDate>,
    end: NaiveDate,
    granularity: Granularity,
}

impl Iterator for AxisTicks {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.filter(|d| *d <= self.end)?;
        self.next = match self.granularity {
            Granularity::Day => current.succ_opt(),
            Granularity::Week => current.checked_add_signed(chrono::Duration::days(7)),
            Granularity::Month => current.checked_add_months(Months::new(1)),
        };
        Some(current)
    }
}

/// Header cell text for a tick.
pub fn tick_label(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day => date.day().to_string(),
        Granularity::Week => format!("W{}", (date.day() + 6) / 7),
        Granularity::Month => date.format("%b").to_string(),
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    date.weekday().num_days_from_monday() >= 5
}

/// Consecutive ticks sharing a year and month, drawn as one upper header cell.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGroup {
    pub year: i32,
    pub month: u32,
    pub x: f32,
    pub width: f32,
}

impl MonthGroup {
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_default()
    }
}

/// Merge ticks into month groups, each tick contributing `cell_width`.
pub fn month_groups(ticks: impl IntoIterator<Item = NaiveDate>, cell_width: f32) -> Vec<MonthGroup> {
    let mut groups: Vec<MonthGroup> = Vec::new();
    for (i, date) in ticks.into_iter().enumerate() {
        match groups.last_mut() {
            Some(last) if last.year == date.year() && last.month == date.month() => {
                last.width += cell_width;
            }
            _ => groups.push(MonthGroup {
                year: date.year(),
                month: date.month(),
                x: i as f32 * cell_width,
                width: cell_width,
            }),
        }
    }
    groups
}
