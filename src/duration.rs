//! Durées ISO-8601 (`PT8H`, `PT30M`, `P1DT2H`) au format du service.

use chrono::Duration;
use thiserror::Error;

const NANOS_PER_SEC: i128 = 1_000_000_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid ISO-8601 duration: {0}")]
pub struct ParseDurationError(String);

/// Formate une durée comme `java.time.Duration` (heures, minutes, secondes, jamais de jours).
pub fn format(duration: Duration) -> String {
    if duration == Duration::zero() {
        return "PT0S".to_string();
    }

    let negative = duration < Duration::zero();
    let abs = if negative { -duration } else { duration };
    let secs = abs.num_seconds();
    let nanos = (abs - Duration::seconds(secs))
        .num_nanoseconds()
        .unwrap_or(0);

    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    let mut out = String::from(if negative { "-PT" } else { "PT" });
    if hours > 0 {
        out.push_str(&format!("{hours}H"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}M"));
    }
    if nanos > 0 {
        let frac = format!("{nanos:09}");
        out.push_str(&format!("{seconds}.{}S", frac.trim_end_matches('0')));
    } else if seconds > 0 {
        out.push_str(&format!("{seconds}S"));
    }
    out
}

/// Parse `[-]P[nD][T[nH][nM][n[.f]S]]`.
pub fn parse(raw: &str) -> Result<Duration, ParseDurationError> {
    let err = || ParseDurationError(raw.to_string());
    let s = raw.trim();

    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let s = s
        .strip_prefix(|c: char| c.eq_ignore_ascii_case(&'P'))
        .ok_or_else(err)?;

    let (date_part, time_part) = match s.split_once(|c: char| c.eq_ignore_ascii_case(&'T')) {
        Some((date, time)) => (date, Some(time)),
        None => (s, None),
    };

    let mut total: i128 = 0;
    let mut seen = false;

    if !date_part.is_empty() {
        let days = date_part
            .strip_suffix(|c: char| c.eq_ignore_ascii_case(&'D'))
            .ok_or_else(err)?;
        total = accumulate(total, scaled(days, 86_400 * NANOS_PER_SEC)).ok_or_else(err)?;
        seen = true;
    }

    if let Some(mut rest) = time_part {
        if rest.is_empty() {
            return Err(err());
        }
        for (unit, factor) in [('H', 3600), ('M', 60)] {
            if let Some(pos) = rest.find(|c: char| c.eq_ignore_ascii_case(&unit)) {
                let (num, tail) = rest.split_at(pos);
                total = accumulate(total, scaled(num, factor * NANOS_PER_SEC)).ok_or_else(err)?;
                rest = &tail[1..];
                seen = true;
            }
        }
        if !rest.is_empty() {
            let secs = rest
                .strip_suffix(|c: char| c.eq_ignore_ascii_case(&'S'))
                .ok_or_else(err)?;
            total = accumulate(total, parse_seconds(secs)).ok_or_else(err)?;
            seen = true;
        }
    }

    if !seen {
        return Err(err());
    }
    if negative {
        total = -total;
    }
    let nanos = i64::try_from(total).map_err(|_| err())?;
    Ok(Duration::nanoseconds(nanos))
}

fn accumulate(total: i128, part: Option<i128>) -> Option<i128> {
    total.checked_add(part?)
}

fn scaled(num: &str, factor: i128) -> Option<i128> {
    parse_whole(num)?.checked_mul(factor)
}

fn parse_whole(num: &str) -> Option<i128> {
    if num.is_empty() || !num.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    num.parse().ok()
}

fn parse_seconds(num: &str) -> Option<i128> {
    match num.split_once(['.', ',']) {
        Some((whole, frac)) => {
            if frac.is_empty() || frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let whole = if whole.is_empty() { 0 } else { parse_whole(whole)? };
            let frac: i128 = format!("{frac:0<9}").parse().ok()?;
            whole.checked_mul(NANOS_PER_SEC)?.checked_add(frac)
        }
        None => scaled(num, NANOS_PER_SEC),
    }
}

/// Adaptateur serde : `#[serde(with = "crate::duration::iso8601")]`.
pub mod iso8601 {
    use chrono::Duration;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format(*duration))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse(&raw).map_err(de::Error::custom)
    }

    /// Variante pour `Option<Duration>`.
    pub mod option {
        use chrono::Duration;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            duration: &Option<Duration>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match duration {
                Some(duration) => super::serialize(duration, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Duration>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| crate::duration::parse(&raw).map_err(de::Error::custom))
                .transpose()
        }
    }
}
