use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

/// The calendar used to bucket instants into days. Two instants share a
/// bucket iff their calendar date in this zone is the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarZone {
    Local,
    Fixed(FixedOffset),
}

impl CalendarZone {
    pub fn utc() -> Self {
        CalendarZone::Fixed(Utc.fix())
    }

    pub fn truncate_to_day(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            CalendarZone::Local => instant.with_timezone(&Local).date_naive(),
            CalendarZone::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }

    /// `None` when the timestamp is outside the representable range.
    pub fn day_of_epoch(&self, secs: i64) -> Option<NaiveDate> {
        DateTime::from_timestamp(secs, 0).map(|instant| self.truncate_to_day(instant))
    }

    pub fn year_label(&self, secs: i64) -> Option<String> {
        self.day_of_epoch(secs).map(|d| format!("{:04}", d.year()))
    }

    pub fn today(&self) -> NaiveDate {
        self.truncate_to_day(Utc::now())
    }

    /// Interprets a wall-clock time in this zone. Ambiguous local times
    /// resolve to the earlier instant.
    pub fn local_to_epoch(&self, naive: NaiveDateTime) -> Option<i64> {
        match self {
            CalendarZone::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.timestamp()),
            CalendarZone::Fixed(offset) => offset
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.timestamp()),
        }
    }
}

pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Exactly `days` consecutive dates ending at `end`, ascending.
pub fn rolling_window(end: NaiveDate, days: usize) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = std::iter::successors(Some(end), |d| d.pred_opt())
        .take(days)
        .collect();
    dates.reverse();
    dates
}
