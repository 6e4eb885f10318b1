use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use super::{filled, IdInput};

#[derive(Debug, Deserialize, Default)]
pub struct CreateBookingReq {
    #[serde(rename = "bookingType")]
    pub booking_type: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub photographer_id: Option<IdInput>,
    pub user_id: Option<IdInput>,
}

/// A create request with every field present.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingFields<'a> {
    pub booking_type: &'a str,
    pub date: &'a str,
    pub time: &'a str,
    pub photographer_id: &'a IdInput,
    pub user_id: &'a IdInput,
}

impl CreateBookingReq {
    /// `None` if any of the five fields is absent or blank.
    pub fn fields(&self) -> Option<BookingFields<'_>> {
        Some(BookingFields {
            booking_type: filled(&self.booking_type)?,
            date: filled(&self.date)?,
            time: filled(&self.time)?,
            photographer_id: present(&self.photographer_id)?,
            user_id: present(&self.user_id)?,
        })
    }
}

fn present(id: &Option<IdInput>) -> Option<&IdInput> {
    id.as_ref().filter(|i| !i.is_blank())
}

/// Session start: calendar day of `date` with the `HH:MM` of `time`,
/// seconds and sub-seconds zeroed, in UTC.
///
/// `date` is `YYYY-MM-DD` or a full RFC 3339 timestamp, of which only the
/// UTC calendar day is kept.
pub fn compose_instant(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(date.trim())
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })?;
    let t = time.trim();
    // strict HH:MM, chrono would otherwise accept "7:5"
    if t.len() != 5 || t.as_bytes()[2] != b':' {
        return None;
    }
    let hm = NaiveTime::parse_from_str(t, "%H:%M").ok()?;
    Some(day.and_time(hm).and_utc())
}
