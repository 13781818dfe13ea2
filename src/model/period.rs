use super::ShiftId;
use crate::schedule::util::{day_span, nanos_of, overlap_nanos, DAY_NANOS};
use crate::schedule::ScheduleError;
use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    Working,
    NonWorking,
}

/// Période nommée récurrente : heure de début dans la journée + durée.
pub trait TimePeriod {
    fn name(&self) -> &str;
    fn start(&self) -> NaiveTime;
    fn duration(&self) -> Duration;
    fn kind(&self) -> PeriodKind;

    fn is_working(&self) -> bool {
        self.kind() == PeriodKind::Working
    }

    /// Heure de fin (modulo 24 h).
    fn end(&self) -> NaiveTime {
        self.start() + self.duration()
    }

    /// Vrai si la période déborde sur le lendemain.
    fn spans_midnight(&self) -> bool {
        nanos_of(self.start()) + day_span(self.duration()) > DAY_NANOS
    }
}

fn validate_period(
    entity: &'static str,
    name: &str,
    duration: Duration,
) -> Result<(), ScheduleError> {
    if name.trim().is_empty() {
        return Err(ScheduleError::EmptyName { entity });
    }
    if duration <= Duration::zero() {
        return Err(ScheduleError::NonPositiveDuration {
            entity,
            name: name.to_string(),
        });
    }
    if duration > Duration::days(1) {
        return Err(ScheduleError::DurationTooLong {
            entity,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Pause récurrente (repas...) rattachée à un seul shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Break {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start: NaiveTime,
    #[serde(with = "crate::duration::iso8601")]
    pub duration: Duration,
}

impl Break {
    pub fn new<N: Into<String>, D: Into<String>>(
        name: N,
        description: D,
        start: NaiveTime,
        duration: Duration,
    ) -> Result<Self, ScheduleError> {
        let name = name.into();
        validate_period("break", &name, duration)?;
        Ok(Self {
            name,
            description: description.into(),
            start,
            duration,
        })
    }
}

impl TimePeriod for Break {
    fn name(&self) -> &str {
        &self.name
    }
    fn start(&self) -> NaiveTime {
        self.start
    }
    fn duration(&self) -> Duration {
        self.duration
    }
    fn kind(&self) -> PeriodKind {
        PeriodKind::NonWorking
    }
}

/// Période de travail planifiée, avec ses pauses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start: NaiveTime,
    #[serde(with = "crate::duration::iso8601")]
    pub duration: Duration,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    breaks: Vec<Break>,
}

impl Shift {
    pub(crate) fn new(
        name: String,
        description: String,
        start: NaiveTime,
        duration: Duration,
    ) -> Result<Self, ScheduleError> {
        validate_period("shift", &name, duration)?;
        Ok(Self {
            id: ShiftId::random(),
            name,
            description,
            start,
            duration,
            breaks: Vec::new(),
        })
    }

    pub fn breaks(&self) -> &[Break] {
        &self.breaks
    }

    /// Crée une pause ; le nom est unique dans le shift et le total des pauses
    /// ne dépasse pas la durée du shift.
    pub fn create_break<N: Into<String>, D: Into<String>>(
        &mut self,
        name: N,
        description: D,
        start: NaiveTime,
        duration: Duration,
    ) -> Result<&Break, ScheduleError> {
        let period = Break::new(name, description, start, duration)?;
        if self.breaks.iter().any(|b| b.name == period.name) {
            return Err(ScheduleError::DuplicateName {
                entity: "break",
                name: period.name,
            });
        }
        if self.break_time() + period.duration > self.duration {
            return Err(ScheduleError::BreaksExceedShift {
                shift: self.name.clone(),
            });
        }
        self.breaks.push(period);
        Ok(&self.breaks[self.breaks.len() - 1])
    }

    pub fn remove_break(&mut self, name: &str) -> Result<Break, ScheduleError> {
        let pos = self
            .breaks
            .iter()
            .position(|b| b.name == name)
            .ok_or_else(|| ScheduleError::not_found("break", name))?;
        Ok(self.breaks.remove(pos))
    }

    /// Revérifie les invariants d'un shift relu depuis un support.
    pub(crate) fn check(&self) -> Result<(), ScheduleError> {
        validate_period("shift", &self.name, self.duration)?;
        let mut names = HashSet::new();
        for period in &self.breaks {
            validate_period("break", &period.name, period.duration)?;
            if !names.insert(period.name.as_str()) {
                return Err(ScheduleError::DuplicateName {
                    entity: "break",
                    name: period.name.clone(),
                });
            }
        }
        if self.break_time() > self.duration {
            return Err(ScheduleError::BreaksExceedShift {
                shift: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Somme des durées de pause.
    pub fn break_time(&self) -> Duration {
        self.breaks
            .iter()
            .fold(Duration::zero(), |acc, b| acc + b.duration)
    }

    /// Temps de travail net du shift complet (durée moins pauses).
    pub fn working_time(&self) -> Duration {
        (self.duration - self.break_time()).max(Duration::zero())
    }

    /// Temps du shift compris dans la fenêtre `[from, to)` d'une même journée.
    ///
    /// Pour un shift qui passe minuit, `wrap` choisit l'occurrence : `false` ne
    /// compte que la partie `[start, 24:00)` du shift commencé ce jour-là,
    /// `true` ajoute la partie `[00:00, fin)` du shift commencé la veille.
    pub fn calculate_working_time(
        &self,
        from: NaiveTime,
        to: NaiveTime,
        wrap: bool,
    ) -> Result<Duration, ScheduleError> {
        if to < from {
            return Err(ScheduleError::end_before_start(from, to));
        }
        let (lo, hi) = (nanos_of(from), nanos_of(to));
        let mut nanos = self.own_nanos(lo, hi);
        if wrap {
            nanos += self.carry_nanos(lo, hi);
        }
        Ok(Duration::nanoseconds(nanos))
    }

    /// Comme [`Shift::calculate_working_time`], pauses déduites (jamais négatif).
    pub fn calculate_net_working_time(
        &self,
        from: NaiveTime,
        to: NaiveTime,
        wrap: bool,
    ) -> Result<Duration, ScheduleError> {
        let gross = self.calculate_working_time(from, to, wrap)?;
        Ok((gross - self.break_time()).max(Duration::zero()))
    }

    /// Vrai si l'heure tombe dans le créneau quotidien `[start, fin)`.
    pub fn is_in_shift(&self, time: NaiveTime) -> bool {
        let t = nanos_of(time);
        self.own_nanos(t, t + 1) + self.carry_nanos(t, t + 1) > 0
    }

    /// Partie du shift commencé ce jour, ramenée à `[0, 24h)` en nanosecondes.
    pub(crate) fn own_nanos(&self, lo: i64, hi: i64) -> i64 {
        let start = nanos_of(self.start);
        let end = (start + day_span(self.duration)).min(DAY_NANOS);
        overlap_nanos(start, end, lo, hi)
    }

    /// Partie débordant après minuit du shift commencé la veille.
    pub(crate) fn carry_nanos(&self, lo: i64, hi: i64) -> i64 {
        let spill = nanos_of(self.start) + day_span(self.duration) - DAY_NANOS;
        if spill <= 0 {
            return 0;
        }
        overlap_nanos(0, spill, lo, hi)
    }
}

impl TimePeriod for Shift {
    fn name(&self) -> &str {
        &self.name
    }
    fn start(&self) -> NaiveTime {
        self.start
    }
    fn duration(&self) -> Duration {
        self.duration
    }
    fn kind(&self) -> PeriodKind {
        PeriodKind::Working
    }
}
