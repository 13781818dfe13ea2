use super::{RotationId, Shift, ShiftId};
use crate::schedule::ScheduleError;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Résolution d'une référence de shift (implémenté par `WorkSchedule`).
pub trait ShiftLookup {
    fn shift(&self, id: &ShiftId) -> Option<&Shift>;
}

/// Bloc atomique : `days_on` jours du shift puis `days_off` jours de repos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationSegment {
    pub sequence: u32,
    pub shift: ShiftId,
    pub days_on: u32,
    pub days_off: u32,
}

/// Un jour du cycle : travaillé sur un shift, ou repos.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationDay {
    On(ShiftId),
    Off,
}

impl RotationDay {
    pub fn is_working(&self) -> bool {
        matches!(self, RotationDay::On(_))
    }

    pub fn shift(&self) -> Option<&ShiftId> {
        match self {
            RotationDay::On(id) => Some(id),
            RotationDay::Off => None,
        }
    }
}

/// Déroule les segments (triés par séquence) en une suite de jours.
pub fn expand(segments: &[RotationSegment]) -> Vec<RotationDay> {
    let mut ordered: Vec<&RotationSegment> = segments.iter().collect();
    ordered.sort_by_key(|s| s.sequence);

    let mut days = Vec::new();
    for segment in ordered {
        days.extend((0..segment.days_on).map(|_| RotationDay::On(segment.shift.clone())));
        days.extend((0..segment.days_off).map(|_| RotationDay::Off));
    }
    days
}

/// Rotation partagée par référence entre plusieurs équipes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rotation {
    pub id: RotationId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    segments: Vec<RotationSegment>,
    #[serde(skip)]
    periods: OnceLock<Vec<RotationDay>>,
}

impl Rotation {
    pub(crate) fn new(name: String, description: String) -> Result<Self, ScheduleError> {
        if name.trim().is_empty() {
            return Err(ScheduleError::EmptyName { entity: "rotation" });
        }
        Ok(Self {
            id: RotationId::random(),
            name,
            description,
            segments: Vec::new(),
            periods: OnceLock::new(),
        })
    }

    pub fn segments(&self) -> &[RotationSegment] {
        &self.segments
    }

    pub(crate) fn add_segment(&mut self, shift: ShiftId, days_on: u32, days_off: u32) -> u32 {
        let sequence = self.segments.iter().map(|s| s.sequence).max().unwrap_or(0) + 1;
        self.segments.push(RotationSegment {
            sequence,
            shift,
            days_on,
            days_off,
        });
        self.periods = OnceLock::new();
        sequence
    }

    pub(crate) fn remove_segment(&mut self, sequence: u32) -> Result<RotationSegment, ScheduleError> {
        let pos = self
            .segments
            .iter()
            .position(|s| s.sequence == sequence)
            .ok_or_else(|| ScheduleError::not_found("rotation segment", sequence.to_string()))?;
        self.periods = OnceLock::new();
        Ok(self.segments.remove(pos))
    }

    /// Séquences de segments uniques.
    pub(crate) fn check(&self) -> Result<(), ScheduleError> {
        let mut seen = HashSet::new();
        for segment in &self.segments {
            if !seen.insert(segment.sequence) {
                return Err(ScheduleError::DuplicateName {
                    entity: "rotation segment",
                    name: format!("{} #{}", self.name, segment.sequence),
                });
            }
        }
        Ok(())
    }

    /// Jours du cycle, calculés une fois puis mémorisés.
    pub fn periods(&self) -> &[RotationDay] {
        self.periods.get_or_init(|| expand(&self.segments))
    }

    /// Longueur du cycle en jours.
    pub fn day_count(&self) -> usize {
        self.segments
            .iter()
            .map(|s| s.days_on as usize + s.days_off as usize)
            .sum()
    }

    pub fn duration(&self) -> Duration {
        Duration::days(self.day_count() as i64)
    }

    pub fn references_shift(&self, id: &ShiftId) -> bool {
        self.segments.iter().any(|s| &s.shift == id)
    }

    /// Temps de travail brut d'un cycle complet.
    pub fn working_time<L: ShiftLookup + ?Sized>(&self, lookup: &L) -> Duration {
        self.periods()
            .iter()
            .filter_map(RotationDay::shift)
            .filter_map(|id| lookup.shift(id))
            .fold(Duration::zero(), |acc, shift| acc + shift.duration)
    }

    /// Index 0-based du jour `date` dans le cycle ancré à `anchor`.
    pub fn day_in_rotation(&self, anchor: NaiveDate, date: NaiveDate) -> Result<usize, ScheduleError> {
        if date < anchor {
            return Err(ScheduleError::BeforeAnchor { anchor, date });
        }
        let cycle = self.day_count();
        if cycle == 0 {
            return Err(ScheduleError::EmptyRotation(self.name.clone()));
        }
        let delta = (date - anchor).num_days() as u64;
        Ok((delta % cycle as u64) as usize)
    }

    pub fn day(&self, index: usize) -> Option<&RotationDay> {
        self.periods().get(index)
    }
}
