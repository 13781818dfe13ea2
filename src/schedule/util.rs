use super::ScheduleError;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const NANOS_PER_SEC: i64 = 1_000_000_000;
pub(crate) const DAY_NANOS: i64 = 24 * 60 * 60 * NANOS_PER_SEC;

/// Longueur de l'intersection de `[a_start, a_end)` et `[b_start, b_end)`, bornée à zéro.
pub(crate) fn overlap_nanos(a_start: i64, a_end: i64, b_start: i64, b_end: i64) -> i64 {
    (a_end.min(b_end) - a_start.max(b_start)).max(0)
}

pub(crate) fn overlap(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> Duration {
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);
    if end > start {
        end - start
    } else {
        Duration::zero()
    }
}

/// Position dans la journée en nanosecondes ; une seconde intercalaire est ramenée à 24:00.
pub(crate) fn nanos_of(time: NaiveTime) -> i64 {
    let nanos = i64::from(time.num_seconds_from_midnight()) * NANOS_PER_SEC
        + i64::from(time.nanosecond());
    nanos.min(DAY_NANOS)
}

/// Durée en nanosecondes, ramenée à `[0, 24h]`.
pub(crate) fn day_span(duration: Duration) -> i64 {
    duration
        .num_nanoseconds()
        .map_or(DAY_NANOS, |n| n.clamp(0, DAY_NANOS))
}

pub(crate) fn next_day(date: NaiveDate) -> Result<NaiveDate, ScheduleError> {
    date.succ_opt().ok_or(ScheduleError::DateOverflow)
}

pub(crate) fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// `start + duration`, en erreur hors de la plage de dates.
pub(crate) fn end_of(start: NaiveDateTime, duration: Duration) -> Result<NaiveDateTime, ScheduleError> {
    start
        .checked_add_signed(duration)
        .ok_or(ScheduleError::DateOverflow)
}
