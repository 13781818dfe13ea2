use super::util::{end_of, nanos_of, next_day, DAY_NANOS};
use super::{ScheduleError, ShiftInstance, WorkSchedule};
use crate::model::{Rotation, RotationDay, Shift, Team};
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Équipe résolue : l'équipe, sa rotation et le planning propriétaire.
#[derive(Debug, Clone, Copy)]
pub struct TeamView<'a> {
    schedule: &'a WorkSchedule,
    team: &'a Team,
    rotation: &'a Rotation,
}

impl<'a> TeamView<'a> {
    pub(super) fn new(schedule: &'a WorkSchedule, team: &'a Team) -> Result<Self, ScheduleError> {
        let rotation = schedule
            .rotation(team.rotation())
            .ok_or_else(|| ScheduleError::DanglingReference {
                entity: "rotation",
                id: team.rotation().to_string(),
            })?;
        Ok(Self {
            schedule,
            team,
            rotation,
        })
    }

    pub fn team(&self) -> &'a Team {
        self.team
    }

    pub fn rotation(&self) -> &'a Rotation {
        self.rotation
    }

    pub fn day_in_rotation(&self, date: NaiveDate) -> Result<usize, ScheduleError> {
        self.rotation
            .day_in_rotation(self.team.rotation_start(), date)
    }

    /// Shift affecté à `date`, `None` si jour de repos.
    pub fn assignment_for_day(&self, date: NaiveDate) -> Result<Option<&'a Shift>, ScheduleError> {
        let index = self.day_in_rotation(date)?;
        match self.rotation.day(index) {
            Some(RotationDay::On(id)) => self
                .schedule
                .shift(id)
                .map(Some)
                .ok_or_else(|| ScheduleError::DanglingReference {
                    entity: "shift",
                    id: id.to_string(),
                }),
            Some(RotationDay::Off) | None => Ok(None),
        }
    }

    pub fn shift_instance_for_day(
        &self,
        date: NaiveDate,
    ) -> Result<Option<ShiftInstance>, ScheduleError> {
        let Some(shift) = self.assignment_for_day(date)? else {
            return Ok(None);
        };
        let start = date.and_time(shift.start);
        Ok(Some(ShiftInstance {
            team: self.team.id.clone(),
            team_name: self.team.name.clone(),
            shift: shift.id.clone(),
            shift_name: shift.name.clone(),
            start,
            end: end_of(start, shift.duration)?,
        }))
    }

    /// Temps de travail brut de l'équipe sur `[from, to)`.
    ///
    /// Chaque jour calendaire de l'intervalle est traité à part : fenêtre partielle
    /// le premier et le dernier jour, journée complète entre les deux. Un jour reçoit
    /// la partie propre de son shift et le débordement du shift de la veille.
    pub fn calculate_working_time(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Duration, ScheduleError> {
        if to < from {
            return Err(ScheduleError::end_before_start(from, to));
        }

        let first = from.date();
        let last = to.date();

        let mut previous = match first.pred_opt() {
            Some(day) if day >= self.team.rotation_start() => self.assignment_for_day(day)?,
            _ => None,
        };

        let mut total = Duration::zero();
        let mut day = first;
        loop {
            let lo = if day == first { nanos_of(from.time()) } else { 0 };
            let hi = if day == last { nanos_of(to.time()) } else { DAY_NANOS };

            let current = self.assignment_for_day(day)?;
            let mut nanos = 0;
            if let Some(shift) = previous {
                nanos += shift.carry_nanos(lo, hi);
            }
            if let Some(shift) = current {
                nanos += shift.own_nanos(lo, hi);
            }
            total = total + Duration::nanoseconds(nanos);

            if day == last {
                break;
            }
            previous = current;
            day = next_day(day)?;
        }

        Ok(total)
    }

    pub fn rotation_duration(&self) -> Duration {
        self.rotation.duration()
    }

    pub fn rotation_working_time(&self) -> Duration {
        self.rotation.working_time(self.schedule)
    }

    /// Part du cycle travaillée, en pourcentage.
    pub fn percentage_worked(&self) -> f64 {
        let total = self.rotation_duration().num_seconds();
        if total == 0 {
            return 0.0;
        }
        self.rotation_working_time().num_seconds() as f64 / total as f64 * 100.0
    }

    /// Moyenne hebdomadaire des heures travaillées sur le cycle.
    pub fn hours_worked_per_week(&self) -> Duration {
        let days = self.rotation.day_count() as i64;
        if days == 0 {
            return Duration::zero();
        }
        Duration::seconds(self.rotation_working_time().num_seconds() * 7 / days)
    }
}
