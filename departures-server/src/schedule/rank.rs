//! Ordering of departure board entries.
//!
//! The portal mixes two time formats on one board: imminent trains are shown
//! as "N min" and the rest as a bare "HH:MM" with no date. To order them we
//! map both onto an absolute instant relative to "now". A bare clock time
//! that is already behind "now" belongs to tomorrow, since the board only
//! ever covers a rolling window of less than a day.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::adif::DepartureRecord;

static MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("minutes regex is valid"));

/// Map a displayed departure time onto an absolute instant.
///
/// - `"N min"` (any case) ranks at `now + N minutes`. If the number can't be
///   read, the entry ranks first so it is still visible at the top.
/// - `"HH:MM"` ranks at that clock time today, or tomorrow if that is
///   already earlier than `now`. If the time can't be read, the entry ranks
///   last.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use departures_server::schedule::rank;
///
/// let now = NaiveDate::from_ymd_opt(2024, 1, 1)
///     .unwrap()
///     .and_hms_opt(23, 55, 0)
///     .unwrap();
///
/// assert_eq!(rank("5 min", now), now + chrono::Duration::minutes(5));
///
/// let tomorrow = NaiveDate::from_ymd_opt(2024, 1, 2)
///     .unwrap()
///     .and_hms_opt(23, 50, 0)
///     .unwrap();
/// assert_eq!(rank("23:50", now), tomorrow);
/// ```
pub fn rank(display_time: &str, now: NaiveDateTime) -> NaiveDateTime {
    if display_time.to_lowercase().contains("min") {
        return relative_instant(display_time, now).unwrap_or(NaiveDateTime::MIN);
    }
    clock_instant(display_time, now).unwrap_or(NaiveDateTime::MAX)
}

fn relative_instant(display_time: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let minutes: i64 = MINUTES.find(display_time)?.as_str().parse().ok()?;
    now.checked_add_signed(Duration::try_minutes(minutes)?)
}

fn clock_instant(display_time: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let (hour, minute) = display_time.split_once(':')?;
    let hour: u32 = hour.trim().parse().ok()?;
    let minute: u32 = minute.trim().parse().ok()?;
    let candidate = now.date().and_time(NaiveTime::from_hms_opt(hour, minute, 0)?);

    if candidate < now {
        candidate.checked_add_signed(Duration::days(1))
    } else {
        Some(candidate)
    }
}

/// Sort departures soonest-first.
///
/// The sort is stable: entries that rank equally keep their board order.
pub fn sort_departures(departures: &mut [DepartureRecord], now: NaiveDateTime) {
    departures.sort_by_key(|d| rank(&d.hora, now));
}


#[cfg(test)]
mod proptests {
    use chrono::{NaiveDate, Timelike};
    use proptest::prelude::*;

    use super::*;

    fn any_now() -> impl Strategy<Value = NaiveDateTime> {
        (1u32..=28, 0u32..24, 0u32..60, 0u32..60).prop_map(|(day, h, m, s)| {
            NaiveDate::from_ymd_opt(2024, 2, day)
                .unwrap()
                .and_hms_opt(h, m, s)
                .unwrap()
        })
    }

    proptest! {
        /// A valid clock time always lands within the next 24 hours.
        #[test]
        fn clock_time_within_next_day(now in any_now(), h in 0u32..24, m in 0u32..60) {
            let ranked = rank(&format!("{h:02}:{m:02}"), now);
            prop_assert!(ranked >= now);
            prop_assert!(ranked < now + Duration::days(1));
            prop_assert_eq!(ranked.hour(), h);
            prop_assert_eq!(ranked.minute(), m);
            prop_assert_eq!(ranked.second(), 0);
        }

        /// Relative times are exactly N minutes after now.
        #[test]
        fn relative_is_offset(now in any_now(), n in 0i64..1000) {
            prop_assert_eq!(rank(&format!("{n} min"), now), now + Duration::minutes(n));
        }

        /// Ranking never panics and is deterministic for a fixed now.
        #[test]
        fn deterministic(now in any_now(), text in ".{0,12}") {
            prop_assert_eq!(rank(&text, now), rank(&text, now));
        }
    }
}
