use crate::model::{ShiftId, TeamId};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Famille d'erreur, pour que l'appelant distingue les cas récupérables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Range,
    ReferentialIntegrity,
    NotFound,
    Invariant,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("{entity} name must not be empty")]
    EmptyName { entity: &'static str },
    #[error("{entity} '{name}': duration must be positive")]
    NonPositiveDuration { entity: &'static str, name: String },
    #[error("{entity} '{name}': duration cannot exceed 24 hours")]
    DurationTooLong { entity: &'static str, name: String },
    #[error("{entity} '{name}' already exists")]
    DuplicateName { entity: &'static str, name: String },
    #[error("breaks of shift '{shift}' exceed its duration")]
    BreaksExceedShift { shift: String },
    #[error("rotation '{0}' has no days")]
    EmptyRotation(String),
    #[error("member exception at {start} neither adds nor removes a member")]
    EmptyMemberException { start: NaiveDateTime },
    #[error("end precedes start: {start} > {end}")]
    EndBeforeStart { start: String, end: String },
    #[error("rotation anchor must precede query date: anchor {anchor}, date {date}")]
    BeforeAnchor { anchor: NaiveDate, date: NaiveDate },
    #[error("date out of supported range")]
    DateOverflow,
    #[error("{entity} '{name}' is still referenced by {by}")]
    InUse {
        entity: &'static str,
        name: String,
        by: String,
    },
    #[error("unknown {entity}: {name}")]
    NotFound { entity: &'static str, name: String },
    #[error("dangling {entity} reference: {id}")]
    DanglingReference { entity: &'static str, id: String },
}

impl ScheduleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyName { .. }
            | Self::NonPositiveDuration { .. }
            | Self::DurationTooLong { .. }
            | Self::DuplicateName { .. }
            | Self::BreaksExceedShift { .. }
            | Self::EmptyRotation(_)
            | Self::EmptyMemberException { .. } => ErrorKind::Validation,
            Self::EndBeforeStart { .. } | Self::BeforeAnchor { .. } | Self::DateOverflow => {
                ErrorKind::Range
            }
            Self::InUse { .. } => ErrorKind::ReferentialIntegrity,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::DanglingReference { .. } => ErrorKind::Invariant,
        }
    }

    pub(crate) fn end_before_start<T: ToString>(start: T, end: T) -> Self {
        Self::EndBeforeStart {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    pub(crate) fn not_found<S: Into<String>>(entity: &'static str, name: S) -> Self {
        Self::NotFound {
            entity,
            name: name.into(),
        }
    }
}

/// Occurrence concrète d'un shift travaillé par une équipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftInstance {
    pub team: TeamId,
    pub team_name: String,
    pub shift: ShiftId,
    pub shift_name: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ShiftInstance {
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at < self.end
    }
}
