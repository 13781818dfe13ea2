use super::{ScheduleError, WorkSchedule};
use crate::model::{
    Break, MemberException, NonWorkingPeriod, PeriodId, Rotation, RotationId, RotationSegment,
    Shift, ShiftId, Team, TeamId, TeamMember,
};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, warn};

impl WorkSchedule {
    /// Crée un shift (nom unique, durée dans `]0, 24h]`).
    pub fn create_shift<N: Into<String>, D: Into<String>>(
        &mut self,
        name: N,
        description: D,
        start: NaiveTime,
        duration: Duration,
    ) -> Result<ShiftId, ScheduleError> {
        let shift = Shift::new(name.into(), description.into(), start, duration)?;
        if self.shift_by_name(&shift.name).is_some() {
            return Err(ScheduleError::DuplicateName {
                entity: "shift",
                name: shift.name,
            });
        }
        debug!(shift = %shift.name, %start, "creating shift");
        let id = shift.id.clone();
        self.shifts.push(shift);
        Ok(id)
    }

    pub fn create_break<N: Into<String>, D: Into<String>>(
        &mut self,
        shift: &ShiftId,
        name: N,
        description: D,
        start: NaiveTime,
        duration: Duration,
    ) -> Result<Break, ScheduleError> {
        let target = self.shift_mut(shift)?;
        let created = target.create_break(name, description, start, duration)?.clone();
        debug!(shift = %target.name, break_name = %created.name, "creating break");
        Ok(created)
    }

    pub fn remove_break(&mut self, shift: &ShiftId, name: &str) -> Result<Break, ScheduleError> {
        self.shift_mut(shift)?.remove_break(name)
    }

    /// Supprime un shift ; refusé tant qu'un segment de rotation le référence.
    pub fn delete_shift(&mut self, id: &ShiftId) -> Result<Shift, ScheduleError> {
        let pos = self
            .shifts
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| ScheduleError::not_found("shift", id.as_str()))?;
        if let Some(rotation) = self.rotations.iter().find(|r| r.references_shift(id)) {
            warn!(shift = %self.shifts[pos].name, rotation = %rotation.name, "shift still in use");
            return Err(ScheduleError::InUse {
                entity: "shift",
                name: self.shifts[pos].name.clone(),
                by: format!("rotation '{}'", rotation.name),
            });
        }
        debug!(shift = %self.shifts[pos].name, "deleting shift");
        Ok(self.shifts.remove(pos))
    }

    pub fn create_rotation<N: Into<String>, D: Into<String>>(
        &mut self,
        name: N,
        description: D,
    ) -> Result<RotationId, ScheduleError> {
        let rotation = Rotation::new(name.into(), description.into())?;
        if self.rotation_by_name(&rotation.name).is_some() {
            return Err(ScheduleError::DuplicateName {
                entity: "rotation",
                name: rotation.name,
            });
        }
        debug!(rotation = %rotation.name, "creating rotation");
        let id = rotation.id.clone();
        self.rotations.push(rotation);
        Ok(id)
    }

    /// Ajoute un segment (shift, jours travaillés, jours de repos) ; renvoie sa séquence.
    pub fn add_segment(
        &mut self,
        rotation: &RotationId,
        shift: &ShiftId,
        days_on: u32,
        days_off: u32,
    ) -> Result<u32, ScheduleError> {
        if self.shift(shift).is_none() {
            return Err(ScheduleError::not_found("shift", shift.as_str()));
        }
        let target = self.rotation_mut(rotation)?;
        let sequence = target.add_segment(shift.clone(), days_on, days_off);
        debug!(rotation = %target.name, sequence, days_on, days_off, "adding segment");
        Ok(sequence)
    }

    /// Retire un segment ; refusé s'il viderait une rotation encore utilisée.
    pub fn remove_segment(
        &mut self,
        rotation: &RotationId,
        sequence: u32,
    ) -> Result<RotationSegment, ScheduleError> {
        let target = self
            .rotation(rotation)
            .ok_or_else(|| ScheduleError::not_found("rotation", rotation.as_str()))?;
        let remaining: usize = target
            .segments()
            .iter()
            .filter(|s| s.sequence != sequence)
            .map(|s| s.days_on as usize + s.days_off as usize)
            .sum();
        if remaining == 0 {
            if let Some(team) = self.teams.iter().find(|t| t.rotation() == rotation) {
                return Err(ScheduleError::InUse {
                    entity: "rotation",
                    name: target.name.clone(),
                    by: format!("team '{}'", team.name),
                });
            }
        }
        self.rotation_mut(rotation)?.remove_segment(sequence)
    }

    /// Supprime une rotation ; refusé tant qu'une équipe la référence.
    pub fn delete_rotation(&mut self, id: &RotationId) -> Result<Rotation, ScheduleError> {
        let pos = self
            .rotations
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| ScheduleError::not_found("rotation", id.as_str()))?;
        if let Some(team) = self.teams.iter().find(|t| t.rotation() == id) {
            warn!(rotation = %self.rotations[pos].name, team = %team.name, "rotation still in use");
            return Err(ScheduleError::InUse {
                entity: "rotation",
                name: self.rotations[pos].name.clone(),
                by: format!("team '{}'", team.name),
            });
        }
        debug!(rotation = %self.rotations[pos].name, "deleting rotation");
        Ok(self.rotations.remove(pos))
    }

    pub fn create_team<N: Into<String>, D: Into<String>>(
        &mut self,
        name: N,
        description: D,
        rotation: &RotationId,
        rotation_start: NaiveDate,
    ) -> Result<TeamId, ScheduleError> {
        let team = Team::new(name.into(), description.into(), rotation.clone(), rotation_start)?;
        if self.team_by_name(&team.name).is_some() {
            return Err(ScheduleError::DuplicateName {
                entity: "team",
                name: team.name,
            });
        }
        let target = self
            .rotation(rotation)
            .ok_or_else(|| ScheduleError::not_found("rotation", rotation.as_str()))?;
        if target.day_count() == 0 {
            return Err(ScheduleError::EmptyRotation(target.name.clone()));
        }
        debug!(team = %team.name, rotation = %target.name, %rotation_start, "creating team");
        let id = team.id.clone();
        self.teams.push(team);
        Ok(id)
    }

    pub fn delete_team(&mut self, id: &TeamId) -> Result<Team, ScheduleError> {
        let pos = self
            .teams
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| ScheduleError::not_found("team", id.as_str()))?;
        debug!(team = %self.teams[pos].name, "deleting team");
        Ok(self.teams.remove(pos))
    }

    /// Affecte un membre à l'équipe ; matricule unique dans l'équipe.
    pub fn add_team_member(&mut self, team: &TeamId, member: TeamMember) -> Result<(), ScheduleError> {
        let target = self.team_mut(team)?;
        debug!(team = %target.name, member = %member.member_id, "adding team member");
        target.add_member(member)
    }

    pub fn remove_team_member(
        &mut self,
        team: &TeamId,
        member_id: &str,
    ) -> Result<TeamMember, ScheduleError> {
        let target = self.team_mut(team)?;
        debug!(team = %target.name, member = member_id, "removing team member");
        target.remove_member(member_id)
    }

    /// Enregistre un changement d'effectif ; le retrait doit viser un membre affecté.
    pub fn add_member_exception(
        &mut self,
        team: &TeamId,
        exception: MemberException,
    ) -> Result<(), ScheduleError> {
        let target = self.team_mut(team)?;
        if let Some(removed) = &exception.removal {
            if !target.has_member(&removed.member_id) {
                return Err(ScheduleError::not_found("team member", removed.member_id.as_str()));
            }
        }
        debug!(team = %target.name, start = %exception.start, reason = %exception.reason, "adding member exception");
        target.add_member_exception(exception);
        Ok(())
    }

    pub fn create_non_working_period<N: Into<String>, D: Into<String>>(
        &mut self,
        name: N,
        description: D,
        start: NaiveDateTime,
        duration: Duration,
    ) -> Result<PeriodId, ScheduleError> {
        let period = NonWorkingPeriod::new(name.into(), description.into(), start, duration)?;
        if self.non_working_period_by_name(&period.name).is_some() {
            return Err(ScheduleError::DuplicateName {
                entity: "non-working period",
                name: period.name,
            });
        }
        debug!(period = %period.name, %start, "creating non-working period");
        let id = period.id.clone();
        self.non_working_periods.push(period);
        self.non_working_periods.sort_by_key(|p| p.start);
        Ok(id)
    }

    pub fn delete_non_working_period(
        &mut self,
        id: &PeriodId,
    ) -> Result<NonWorkingPeriod, ScheduleError> {
        let pos = self
            .non_working_periods
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| ScheduleError::not_found("non-working period", id.as_str()))?;
        debug!(period = %self.non_working_periods[pos].name, "deleting non-working period");
        Ok(self.non_working_periods.remove(pos))
    }

    fn shift_mut(&mut self, id: &ShiftId) -> Result<&mut Shift, ScheduleError> {
        self.shifts
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| ScheduleError::not_found("shift", id.as_str()))
    }

    fn team_mut(&mut self, id: &TeamId) -> Result<&mut Team, ScheduleError> {
        self.teams
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| ScheduleError::not_found("team", id.as_str()))
    }

    fn rotation_mut(&mut self, id: &RotationId) -> Result<&mut Rotation, ScheduleError> {
        self.rotations
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| ScheduleError::not_found("rotation", id.as_str()))
    }
}
