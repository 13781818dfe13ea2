use super::util::next_day;
use super::{ScheduleError, ShiftInstance, WorkSchedule};
use crate::model::{NonWorkingPeriod, TeamMember};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::debug;

impl WorkSchedule {
    /// Shifts commençant le jour `day`, triés par heure de début.
    ///
    /// Un jour entièrement couvert par une période non travaillée ne produit rien.
    pub fn shift_instances_for_day(&self, day: NaiveDate) -> Result<Vec<ShiftInstance>, ScheduleError> {
        if self.is_non_working_day(day)? {
            debug!(%day, "day covered by a non-working period");
            return Ok(Vec::new());
        }

        let mut instances = Vec::new();
        for view in self.team_views()? {
            if let Some(instance) = view.shift_instance_for_day(day)? {
                instances.push(instance);
            }
        }
        instances.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.team_name.cmp(&b.team_name)));
        Ok(instances)
    }

    /// Shifts en cours à l'instant `at`, y compris ceux commencés la veille.
    pub fn shift_instances_for_time(
        &self,
        at: NaiveDateTime,
    ) -> Result<Vec<ShiftInstance>, ScheduleError> {
        let day = at.date();
        let mut candidates = self.shift_instances_for_day(day)?;

        if let Some(before) = day.pred_opt() {
            if !self.is_non_working_day(before)? {
                for view in self.team_views()? {
                    if before < view.team().rotation_start() {
                        continue;
                    }
                    if let Some(instance) = view.shift_instance_for_day(before)? {
                        candidates.push(instance);
                    }
                }
            }
        }

        let mut active: Vec<ShiftInstance> = candidates
            .into_iter()
            .filter(|instance| instance.contains(at))
            .collect();
        active.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.team_name.cmp(&b.team_name)));
        Ok(active)
    }

    /// Effectif d'une occurrence, exceptions de l'équipe appliquées.
    pub fn members_for_instance(
        &self,
        instance: &ShiftInstance,
    ) -> Result<Vec<TeamMember>, ScheduleError> {
        let team = self
            .team(&instance.team)
            .ok_or_else(|| ScheduleError::not_found("team", instance.team.as_str()))?;
        Ok(team.members_at(instance.start))
    }

    /// Somme du temps de travail de toutes les équipes sur `[from, to)`.
    pub fn calculate_working_time(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Duration, ScheduleError> {
        if to < from {
            return Err(ScheduleError::end_before_start(from, to));
        }
        self.team_views()?
            .iter()
            .try_fold(Duration::zero(), |acc, view| {
                Ok(acc + view.calculate_working_time(from, to)?)
            })
    }

    /// Chevauchement cumulé des périodes non travaillées avec `[from, to)`.
    pub fn calculate_non_working_time(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Duration, ScheduleError> {
        if to < from {
            return Err(ScheduleError::end_before_start(from, to));
        }
        Ok(self
            .non_working_periods
            .iter()
            .fold(Duration::zero(), |acc, period| acc + period.overlap(from, to)))
    }

    /// Temps de travail moins temps non travaillé, jamais négatif.
    pub fn calculate_net_working_time(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Duration, ScheduleError> {
        let working = self.calculate_working_time(from, to)?;
        let non_working = self.calculate_non_working_time(from, to)?;
        Ok((working - non_working).max(Duration::zero()))
    }

    /// Somme des durées de cycle de toutes les équipes.
    pub fn rotation_duration(&self) -> Result<Duration, ScheduleError> {
        Ok(self
            .team_views()?
            .iter()
            .fold(Duration::zero(), |acc, view| acc + view.rotation_duration()))
    }

    /// Somme du temps de travail par cycle de toutes les équipes.
    pub fn rotation_working_time(&self) -> Result<Duration, ScheduleError> {
        Ok(self
            .team_views()?
            .iter()
            .fold(Duration::zero(), |acc, view| acc + view.rotation_working_time()))
    }

    /// Couverture : somme des pourcentages travaillés (100 % = une équipe en permanence).
    pub fn coverage_percentage(&self) -> Result<f64, ScheduleError> {
        Ok(self
            .team_views()?
            .iter()
            .map(|view| view.percentage_worked())
            .sum())
    }

    /// Jours `[start, end]` inclus, pour les rapports.
    pub fn shift_instances_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(NaiveDate, Vec<ShiftInstance>)>, ScheduleError> {
        if end < start {
            return Err(ScheduleError::end_before_start(start, end));
        }
        let mut days = Vec::new();
        let mut day = start;
        loop {
            days.push((day, self.shift_instances_for_day(day)?));
            if day == end {
                break;
            }
            day = next_day(day)?;
        }
        Ok(days)
    }

    fn is_non_working_day(&self, day: NaiveDate) -> Result<bool, ScheduleError> {
        for period in &self.non_working_periods {
            if period.covers_day(day)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Périodes touchant la journée, même partiellement.
    pub fn non_working_periods_on(&self, day: NaiveDate) -> Result<Vec<&NonWorkingPeriod>, ScheduleError> {
        let mut out = Vec::new();
        for period in &self.non_working_periods {
            if period.is_in_period(day)? {
                out.push(period);
            }
        }
        Ok(out)
    }
}
