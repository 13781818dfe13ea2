mod ids;
mod nonworking;
mod period;
mod rotation;
mod team;

pub use ids::{PeriodId, RotationId, ScheduleId, ShiftId, TeamId};
pub use nonworking::NonWorkingPeriod;
pub use period::{Break, PeriodKind, Shift, TimePeriod};
pub use rotation::{expand, Rotation, RotationDay, RotationSegment, ShiftLookup};
pub use team::{MemberException, Team, TeamMember};
