//! Jours fériés suédois, sous forme de périodes non travaillées de 24 h.

use crate::model::PeriodId;
use crate::schedule::util::midnight;
use crate::schedule::{ScheduleError, WorkSchedule};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holiday {
    /// Nom suédois.
    pub name: &'static str,
    /// Nom anglais, utilisé comme description.
    pub english: &'static str,
    pub date: NaiveDate,
}

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate, ScheduleError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(ScheduleError::DateOverflow)
}

fn offset(day: NaiveDate, days: i64) -> Result<NaiveDate, ScheduleError> {
    day.checked_add_signed(Duration::days(days))
        .ok_or(ScheduleError::DateOverflow)
}

/// Premier `weekday` de la fenêtre `[from, from + 6]`.
fn first_weekday_from(from: NaiveDate, weekday: Weekday) -> Result<NaiveDate, ScheduleError> {
    let ahead = (7 + weekday.num_days_from_monday() as i64
        - from.weekday().num_days_from_monday() as i64)
        % 7;
    offset(from, ahead)
}

/// Dimanche de Pâques (calendrier grégorien, algorithme anonyme).
pub fn easter_sunday(year: i32) -> Result<NaiveDate, ScheduleError> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    date(year, month as u32, day as u32)
}

/// Fériés de l'année, triés par date.
pub fn swedish_holidays(year: i32) -> Result<Vec<Holiday>, ScheduleError> {
    let easter = easter_sunday(year)?;
    // veille : vendredi entre le 19 et le 25 juin
    let midsummer_eve = first_weekday_from(date(year, 6, 19)?, Weekday::Fri)?;
    // samedi entre le 31 octobre et le 6 novembre
    let all_saints = first_weekday_from(date(year, 10, 31)?, Weekday::Sat)?;

    let mut out = vec![
        Holiday { name: "Nyårsdagen", english: "New Year's Day", date: date(year, 1, 1)? },
        Holiday { name: "Trettondedag jul", english: "Epiphany", date: date(year, 1, 6)? },
        Holiday { name: "Långfredagen", english: "Good Friday", date: offset(easter, -2)? },
        Holiday { name: "Påskafton", english: "Easter Saturday", date: offset(easter, -1)? },
        Holiday { name: "Påskdagen", english: "Easter Sunday", date: easter },
        Holiday { name: "Annandag påsk", english: "Easter Monday", date: offset(easter, 1)? },
        Holiday { name: "Första maj", english: "May Day", date: date(year, 5, 1)? },
        Holiday { name: "Kristi himmelsfärdsdag", english: "Ascension Day", date: offset(easter, 39)? },
        Holiday { name: "Sveriges nationaldag", english: "National Day of Sweden", date: date(year, 6, 6)? },
        Holiday { name: "Midsommarafton", english: "Midsummer Eve", date: midsummer_eve },
        Holiday { name: "Midsommardagen", english: "Midsummer Day", date: offset(midsummer_eve, 1)? },
        Holiday { name: "Alla helgons dag", english: "All Saints' Day", date: all_saints },
        Holiday { name: "Julafton", english: "Christmas Eve", date: date(year, 12, 24)? },
        Holiday { name: "Juldagen", english: "Christmas Day", date: date(year, 12, 25)? },
        Holiday { name: "Annandag jul", english: "Boxing Day", date: date(year, 12, 26)? },
        Holiday { name: "Nyårsafton", english: "New Year's Eve", date: date(year, 12, 31)? },
    ];
    out.sort_by_key(|h| h.date);
    Ok(out)
}

impl WorkSchedule {
    /// Ajoute les fériés de `year`, nommés `"<férié> <année>"` ; tout ou rien.
    pub fn add_swedish_holidays(&mut self, year: i32) -> Result<Vec<PeriodId>, ScheduleError> {
        let holidays = swedish_holidays(year)?;
        let mut draft = self.clone();
        let mut ids = Vec::with_capacity(holidays.len());
        for holiday in &holidays {
            ids.push(draft.create_non_working_period(
                format!("{} {}", holiday.name, year),
                holiday.english,
                midnight(holiday.date),
                Duration::hours(24),
            )?);
        }
        debug!(year, count = ids.len(), "swedish holidays added");
        *self = draft;
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_weekday_from_same_day() {
        let friday = NaiveDate::from_ymd_opt(2026, 6, 19).unwrap();
        assert_eq!(first_weekday_from(friday, Weekday::Fri).unwrap(), friday);
        let saturday = NaiveDate::from_ymd_opt(2026, 6, 20).unwrap();
        assert_eq!(
            first_weekday_from(friday, Weekday::Sat).unwrap(),
            saturday
        );
    }
}
