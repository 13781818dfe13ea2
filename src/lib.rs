#![forbid(unsafe_code)]
//! Roulement : bibliothèque de rotations d'équipes et de temps de travail (sans BD).
//!
//! - Shifts, pauses, rotations cycliques partagées entre équipes.
//! - Calcul du temps de travail, y compris pour les shifts qui passent minuit.
//! - Périodes non travaillées datées (fériés suédois fournis).
//! - Stockage fichiers (JSON/CSV) ; heures locales naïves, sans fuseau.

pub mod duration;
pub mod holidays;
pub mod io;
pub mod model;
pub mod report;
pub mod repository;
pub mod schedule;
pub mod storage;

pub use model::{
    Break, MemberException, NonWorkingPeriod, PeriodId, PeriodKind, Rotation, RotationDay,
    RotationId, RotationSegment, ScheduleId, Shift, ShiftId, ShiftLookup, Team, TeamId,
    TeamMember, TimePeriod,
};
pub use report::{Locale, ReportRenderer, TextReport};
pub use repository::ScheduleRepository;
pub use schedule::{ErrorKind, ScheduleError, ShiftInstance, TeamView, WorkSchedule};
pub use storage::{JsonStorage, Storage};
