use super::PeriodId;
use crate::schedule::util::{end_of, midnight, next_day, overlap};
use crate::schedule::ScheduleError;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Période non travaillée datée (férié, arrêt planifié), hors rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonWorkingPeriod {
    pub id: PeriodId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start: NaiveDateTime,
    #[serde(with = "crate::duration::iso8601")]
    pub duration: Duration,
}

impl NonWorkingPeriod {
    pub(crate) fn new(
        name: String,
        description: String,
        start: NaiveDateTime,
        duration: Duration,
    ) -> Result<Self, ScheduleError> {
        if name.trim().is_empty() {
            return Err(ScheduleError::EmptyName {
                entity: "non-working period",
            });
        }
        let period = Self {
            id: PeriodId::random(),
            name,
            description,
            start,
            duration,
        };
        period.check()?;
        Ok(period)
    }

    /// Durée positive, fin représentable.
    pub(crate) fn check(&self) -> Result<(), ScheduleError> {
        if self.duration <= Duration::zero() {
            return Err(ScheduleError::NonPositiveDuration {
                entity: "non-working period",
                name: self.name.clone(),
            });
        }
        end_of(self.start, self.duration).map(|_| ())
    }

    /// Fin de la période, saturée à la dernière date représentable.
    pub fn end(&self) -> NaiveDateTime {
        end_of(self.start, self.duration).unwrap_or(NaiveDateTime::MAX)
    }

    /// Chevauchement avec `[from, to)`, nul si disjoint.
    pub fn overlap(&self, from: NaiveDateTime, to: NaiveDateTime) -> Duration {
        overlap(self.start, self.end(), from, to)
    }

    /// Vrai si la journée entière `[D 00:00, D+1 00:00)` est couverte.
    pub fn covers_day(&self, day: NaiveDate) -> Result<bool, ScheduleError> {
        let day_start = midnight(day);
        let day_end = midnight(next_day(day)?);
        Ok(self.start <= day_start && self.end() >= day_end)
    }

    /// Vrai si la période touche au moins une partie de la journée.
    pub fn is_in_period(&self, day: NaiveDate) -> Result<bool, ScheduleError> {
        let day_end = midnight(next_day(day)?);
        Ok(self.overlap(midnight(day), day_end) > Duration::zero())
    }
}
