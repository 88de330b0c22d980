//! Civil-timezone conversions for human-entered wall-clock times.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// UTC offset in effect at local noon of `date`.
///
/// Noon never falls inside a DST transition; every wall-clock time entered
/// for that date shares this one offset.
pub fn offset_for_date(tz: Tz, date: NaiveDate) -> chrono::FixedOffset {
    let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN));
    match tz.from_local_datetime(&noon).earliest() {
        Some(dt) => dt.offset().fix(),
        None => tz.from_utc_datetime(&noon).offset().fix(),
    }
}

/// Convert a local `HH:mm` on `date` into an absolute instant using the
/// date's noon offset.
pub fn local_hm_to_utc(tz: Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let offset = offset_for_date(tz, date);
    let local = date.and_time(time);
    (local - Duration::seconds(i64::from(offset.local_minus_utc()))).and_utc()
}

/// Absolute instant of local midnight at the start of `date`.
pub fn local_midnight(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight: NaiveDateTime = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        // midnight skipped by a transition: the day starts one hour later
        None => local_hm_to_utc(tz, date, NaiveTime::MIN),
    }
}

/// `[dayStart, dayEnd]` of `date` in `tz`, inclusive, extended one day when
/// the window crosses midnight.
pub fn day_window(tz: Tz, date: NaiveDate, crosses_midnight: bool) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = local_midnight(tz, date);
    let last_day = if crosses_midnight {
        date.succ_opt().unwrap_or(date)
    } else {
        date
    };
    let next = last_day.succ_opt().unwrap_or(last_day);
    let end = local_midnight(tz, next) - Duration::milliseconds(1);
    (start, end)
}

/// Calendar date of an instant in `tz`.
pub fn local_date(tz: Tz, ts: &DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&tz).date_naive()
}
