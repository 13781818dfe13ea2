mod mutate;
mod query;
mod team;
mod types;
pub(crate) mod util;

pub use team::TeamView;
pub use types::{ErrorKind, ScheduleError, ShiftInstance};

use crate::model::{
    NonWorkingPeriod, PeriodId, Rotation, RotationId, ScheduleId, Shift, ShiftId, ShiftLookup,
    Team, TeamId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Racine d'agrégat : possède shifts, rotations, équipes et périodes non travaillées.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkSchedule {
    pub id: ScheduleId,
    name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    shifts: Vec<Shift>,
    #[serde(default)]
    rotations: Vec<Rotation>,
    #[serde(default)]
    teams: Vec<Team>,
    #[serde(default)]
    non_working_periods: Vec<NonWorkingPeriod>,
}

impl WorkSchedule {
    pub fn new<N: Into<String>, D: Into<String>>(
        name: N,
        description: D,
    ) -> Result<Self, ScheduleError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ScheduleError::EmptyName { entity: "schedule" });
        }
        Ok(Self {
            id: ScheduleId::random(),
            name,
            description: description.into(),
            shifts: Vec::new(),
            rotations: Vec::new(),
            teams: Vec::new(),
            non_working_periods: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }
    pub fn rotations(&self) -> &[Rotation] {
        &self.rotations
    }
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }
    /// Triées par date de début.
    pub fn non_working_periods(&self) -> &[NonWorkingPeriod] {
        &self.non_working_periods
    }

    pub fn shift(&self, id: &ShiftId) -> Option<&Shift> {
        self.shifts.iter().find(|s| &s.id == id)
    }
    pub fn rotation(&self, id: &RotationId) -> Option<&Rotation> {
        self.rotations.iter().find(|r| &r.id == id)
    }
    pub fn team(&self, id: &TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| &t.id == id)
    }
    pub fn non_working_period(&self, id: &PeriodId) -> Option<&NonWorkingPeriod> {
        self.non_working_periods.iter().find(|p| &p.id == id)
    }

    pub fn shift_by_name(&self, name: &str) -> Option<&Shift> {
        self.shifts.iter().find(|s| s.name == name)
    }
    pub fn rotation_by_name(&self, name: &str) -> Option<&Rotation> {
        self.rotations.iter().find(|r| r.name == name)
    }
    pub fn team_by_name(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }
    pub fn non_working_period_by_name(&self, name: &str) -> Option<&NonWorkingPeriod> {
        self.non_working_periods.iter().find(|p| p.name == name)
    }

    /// Vue d'une équipe avec sa rotation, pour les calculs de temps de travail.
    pub fn team_view(&self, id: &TeamId) -> Result<TeamView<'_>, ScheduleError> {
        let team = self
            .team(id)
            .ok_or_else(|| ScheduleError::not_found("team", id.as_str()))?;
        TeamView::new(self, team)
    }

    pub fn team_view_by_name(&self, name: &str) -> Result<TeamView<'_>, ScheduleError> {
        let team = self
            .team_by_name(name)
            .ok_or_else(|| ScheduleError::not_found("team", name))?;
        TeamView::new(self, team)
    }

    pub fn team_views(&self) -> Result<Vec<TeamView<'_>>, ScheduleError> {
        self.teams.iter().map(|t| TeamView::new(self, t)).collect()
    }

    /// Vérifie un graphe chargé depuis un support : mêmes règles que les fabriques
    /// (durées, pauses, séquences, membres), noms uniques, références résolues.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        for shift in &self.shifts {
            shift.check()?;
        }
        for rotation in &self.rotations {
            rotation.check()?;
        }
        for team in &self.teams {
            team.check()?;
        }
        for period in &self.non_working_periods {
            period.check()?;
        }

        unique_names("shift", self.shifts.iter().map(|s| s.name.as_str()))?;
        unique_names("rotation", self.rotations.iter().map(|r| r.name.as_str()))?;
        unique_names("team", self.teams.iter().map(|t| t.name.as_str()))?;
        unique_names(
            "non-working period",
            self.non_working_periods.iter().map(|p| p.name.as_str()),
        )?;

        for rotation in &self.rotations {
            for segment in rotation.segments() {
                if self.shift(&segment.shift).is_none() {
                    return Err(ScheduleError::DanglingReference {
                        entity: "shift",
                        id: segment.shift.to_string(),
                    });
                }
            }
        }
        for team in &self.teams {
            let rotation = self.rotation(team.rotation()).ok_or_else(|| {
                ScheduleError::DanglingReference {
                    entity: "rotation",
                    id: team.rotation().to_string(),
                }
            })?;
            if rotation.day_count() == 0 {
                return Err(ScheduleError::EmptyRotation(rotation.name.clone()));
            }
        }
        Ok(())
    }
}

impl ShiftLookup for WorkSchedule {
    fn shift(&self, id: &ShiftId) -> Option<&Shift> {
        WorkSchedule::shift(self, id)
    }
}

fn unique_names<'a>(
    entity: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), ScheduleError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ScheduleError::DuplicateName {
                entity,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}
