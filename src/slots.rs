//! Bookable hour-long slots over a date range.

use chrono::{Datelike, NaiveDate, NaiveTime, TimeDelta, Weekday};
use log::warn;

use crate::data::TimetableRequest;
use crate::error::{SchedulerError, SchedulerResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Occupancy unit shared by teachers and classrooms.
///
/// Ordered by date first, so all keys of one day form a contiguous range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub date: NaiveDate,
    pub start: NaiveTime,
}

impl SlotKey {
    /// The earliest possible key on `date`.
    pub fn start_of_day(date: NaiveDate) -> SlotKey {
        SlotKey {
            date,
            start: NaiveTime::MIN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn key(&self) -> SlotKey {
        SlotKey {
            date: self.date,
            start: self.start,
        }
    }

    pub fn day_name(&self) -> &'static str {
        day_name(self.weekday)
    }

    pub fn date_label(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    pub fn start_label(&self) -> String {
        self.start.format(TIME_FORMAT).to_string()
    }

    pub fn end_label(&self) -> String {
        self.end.format(TIME_FORMAT).to_string()
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Typed form of the date range, working days and daily window of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub working_days: Vec<Weekday>,
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
}

impl ScheduleWindow {
    pub fn from_request(request: &TimetableRequest) -> SchedulerResult<Self> {
        let start_date = parse_date("start_date", &request.start_date)?;
        let end_date = parse_date("end_date", &request.end_date)?;
        if end_date < start_date {
            return Err(SchedulerError::InvalidRequest(format!(
                "end_date {end_date} is before start_date {start_date}"
            )));
        }

        let day_start = parse_time("start_time", &request.start_time)?;
        let day_end = parse_time("end_time", &request.end_time)?;
        if day_start >= day_end {
            return Err(SchedulerError::InvalidRequest(format!(
                "start_time {} must be before end_time {}",
                request.start_time, request.end_time
            )));
        }

        // Exact full names only; anything else never matches a date.
        let working_days = request
            .working_days
            .iter()
            .filter_map(|name| {
                let weekday = WEEK.into_iter().find(|d| day_name(*d) == name.as_str());
                if weekday.is_none() {
                    warn!("Ignoring unrecognised working day {name:?}");
                }
                weekday
            })
            .collect();

        Ok(Self {
            start_date,
            end_date,
            working_days,
            day_start,
            day_end,
        })
    }
}

fn parse_date(field: &str, value: &str) -> SchedulerResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| {
        SchedulerError::InvalidRequest(format!("{field} {value:?} is not YYYY-MM-DD: {e}"))
    })
}

fn parse_time(field: &str, value: &str) -> SchedulerResult<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|e| SchedulerError::InvalidRequest(format!("{field} {value:?} is not HH:MM: {e}")))
}

/// Enumerates one-hour slots, date ascending then start ascending.
///
/// A slot is kept only if it ends by `day_end`; slots that would run past
/// midnight are dropped. Days outside `working_days` contribute nothing.
pub fn enumerate_slots(window: &ScheduleWindow) -> Vec<TimeSlot> {
    let step = TimeDelta::hours(1);
    let mut slots = Vec::new();

    for date in window
        .start_date
        .iter_days()
        .take_while(|d| *d <= window.end_date)
    {
        let weekday = date.weekday();
        if !window.working_days.contains(&weekday) {
            continue;
        }

        let mut current = window.day_start;
        while current < window.day_end {
            let (end, wrapped) = current.overflowing_add_signed(step);
            if wrapped != 0 || end > window.day_end {
                break;
            }
            slots.push(TimeSlot {
                date,
                weekday,
                start: current,
                end,
            });
            current = end;
        }
    }

    slots
}
