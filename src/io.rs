use crate::duration;
use crate::model::{MemberException, TeamMember};
use crate::schedule::{ScheduleError, ShiftInstance, WorkSchedule};
use anyhow::Context;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Forme échangée d'un planning : références par nom, durées ISO-8601.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDocument {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub shifts: Vec<ShiftDocument>,
    #[serde(default)]
    pub rotations: Vec<RotationDocument>,
    #[serde(default)]
    pub teams: Vec<TeamDocument>,
    #[serde(default)]
    pub non_working_periods: Vec<NonWorkingPeriodDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakDocument {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start: NaiveTime,
    #[serde(with = "duration::iso8601")]
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftDocument {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start: NaiveTime,
    #[serde(with = "duration::iso8601")]
    pub duration: Duration,
    #[serde(default)]
    pub breaks: Vec<BreakDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentDocument {
    pub shift_name: String,
    pub days_on: u32,
    pub days_off: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationDocument {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub segments: Vec<SegmentDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDocument {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub rotation_name: String,
    pub rotation_start: NaiveDate,
    #[serde(default)]
    pub members: Vec<TeamMemberDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub member_exceptions: Vec<MemberExceptionDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberDocument {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "memberID", alias = "memberId")]
    pub member_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberExceptionDocument {
    pub date_time: NaiveDateTime,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addition: Option<TeamMemberDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removal: Option<TeamMemberDocument>,
}

impl TeamMemberDocument {
    fn to_member(&self) -> Result<TeamMember, ScheduleError> {
        TeamMember::new(&self.name, describe(&self.name, &self.description), &self.member_id)
    }

    fn from_member(member: &TeamMember) -> Self {
        Self {
            name: member.name.clone(),
            description: Some(member.description.clone()),
            member_id: member.member_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonWorkingPeriodDocument {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date_time: NaiveDateTime,
    #[serde(with = "duration::iso8601")]
    pub duration: Duration,
}

fn describe(name: &str, description: &Option<String>) -> String {
    description.clone().unwrap_or_else(|| name.to_string())
}

impl ScheduleDocument {
    /// Construit le planning via les fabriques : mêmes validations qu'à la main.
    ///
    /// Ordre : shifts, rotations, équipes, périodes non travaillées.
    pub fn into_schedule(self) -> Result<WorkSchedule, ScheduleError> {
        let mut schedule = WorkSchedule::new(&self.name, describe(&self.name, &self.description))?;

        for doc in &self.shifts {
            let id = schedule.create_shift(
                &doc.name,
                describe(&doc.name, &doc.description),
                doc.start,
                doc.duration,
            )?;
            for b in &doc.breaks {
                schedule.create_break(&id, &b.name, describe(&b.name, &b.description), b.start, b.duration)?;
            }
        }

        for doc in &self.rotations {
            let id = schedule.create_rotation(&doc.name, describe(&doc.name, &doc.description))?;
            for segment in &doc.segments {
                let shift = schedule
                    .shift_by_name(&segment.shift_name)
                    .map(|s| s.id.clone())
                    .ok_or_else(|| ScheduleError::not_found("shift", segment.shift_name.as_str()))?;
                schedule.add_segment(&id, &shift, segment.days_on, segment.days_off)?;
            }
        }

        for doc in &self.teams {
            let rotation = schedule
                .rotation_by_name(&doc.rotation_name)
                .map(|r| r.id.clone())
                .ok_or_else(|| ScheduleError::not_found("rotation", doc.rotation_name.as_str()))?;
            let team = schedule.create_team(
                &doc.name,
                describe(&doc.name, &doc.description),
                &rotation,
                doc.rotation_start,
            )?;
            for member in &doc.members {
                schedule.add_team_member(&team, member.to_member()?)?;
            }
            for exception in &doc.member_exceptions {
                let exception = MemberException::new(
                    exception.date_time,
                    exception.reason.clone().unwrap_or_default(),
                    exception.addition.as_ref().map(TeamMemberDocument::to_member).transpose()?,
                    exception.removal.as_ref().map(TeamMemberDocument::to_member).transpose()?,
                )?;
                schedule.add_member_exception(&team, exception)?;
            }
        }

        for doc in &self.non_working_periods {
            schedule.create_non_working_period(
                &doc.name,
                describe(&doc.name, &doc.description),
                doc.start_date_time,
                doc.duration,
            )?;
        }

        Ok(schedule)
    }

    /// Document équivalent ; les identifiants sont remplacés par les noms.
    pub fn from_schedule(schedule: &WorkSchedule) -> Result<Self, ScheduleError> {
        let shifts = schedule
            .shifts()
            .iter()
            .map(|s| ShiftDocument {
                name: s.name.clone(),
                description: Some(s.description.clone()),
                start: s.start,
                duration: s.duration,
                breaks: s
                    .breaks()
                    .iter()
                    .map(|b| BreakDocument {
                        name: b.name.clone(),
                        description: Some(b.description.clone()),
                        start: b.start,
                        duration: b.duration,
                    })
                    .collect(),
            })
            .collect();

        let mut rotations = Vec::new();
        for rotation in schedule.rotations() {
            let mut ordered: Vec<_> = rotation.segments().iter().collect();
            ordered.sort_by_key(|s| s.sequence);
            let mut segments = Vec::new();
            for segment in ordered {
                let shift = schedule.shift(&segment.shift).ok_or_else(|| {
                    ScheduleError::DanglingReference {
                        entity: "shift",
                        id: segment.shift.to_string(),
                    }
                })?;
                segments.push(SegmentDocument {
                    shift_name: shift.name.clone(),
                    days_on: segment.days_on,
                    days_off: segment.days_off,
                });
            }
            rotations.push(RotationDocument {
                name: rotation.name.clone(),
                description: Some(rotation.description.clone()),
                segments,
            });
        }

        let mut teams = Vec::new();
        for view in schedule.team_views()? {
            teams.push(TeamDocument {
                name: view.team().name.clone(),
                description: Some(view.team().description.clone()),
                rotation_name: view.rotation().name.clone(),
                rotation_start: view.team().rotation_start(),
                members: view
                    .team()
                    .members()
                    .iter()
                    .map(TeamMemberDocument::from_member)
                    .collect(),
                member_exceptions: view
                    .team()
                    .member_exceptions()
                    .iter()
                    .map(|e| MemberExceptionDocument {
                        date_time: e.start,
                        reason: Some(e.reason.clone()),
                        addition: e.addition.as_ref().map(TeamMemberDocument::from_member),
                        removal: e.removal.as_ref().map(TeamMemberDocument::from_member),
                    })
                    .collect(),
            });
        }

        let non_working_periods = schedule
            .non_working_periods()
            .iter()
            .map(|p| NonWorkingPeriodDocument {
                name: p.name.clone(),
                description: Some(p.description.clone()),
                start_date_time: p.start,
                duration: p.duration,
            })
            .collect();

        Ok(Self {
            name: schedule.name().to_string(),
            description: Some(schedule.description.clone()),
            shifts,
            rotations,
            teams,
            non_working_periods,
        })
    }
}

/// Import d'un document JSON (références par nom).
pub fn load_document<P: AsRef<Path>>(path: P) -> anyhow::Result<WorkSchedule> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let doc: ScheduleDocument = serde_json::from_slice(&data)
        .with_context(|| format!("parsing schedule document {}", path.display()))?;
    let name = doc.name.clone();
    let schedule = doc
        .into_schedule()
        .with_context(|| format!("building schedule '{name}'"))?;
    debug!(schedule = %name, teams = schedule.teams().len(), "document imported");
    Ok(schedule)
}

/// Export JSON du document (jolie mise en forme)
pub fn export_document_json<P: AsRef<Path>>(path: P, schedule: &WorkSchedule) -> anyhow::Result<()> {
    let doc = ScheduleDocument::from_schedule(schedule)?;
    let s = serde_json::to_string_pretty(&doc)?;
    fs::write(path, s)?;
    Ok(())
}

/// Résultat d'un calcul de temps sur `[from, to)`.
///
/// Pour une seule équipe, `team` est renseigné et le temps non travaillé,
/// propre au planning, est omis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
    #[serde(with = "duration::iso8601")]
    pub working_time: Duration,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "duration::iso8601::option"
    )]
    pub non_working_time: Option<Duration>,
}

impl WorkingTime {
    pub fn compute(
        schedule: &WorkSchedule,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Self, ScheduleError> {
        Ok(Self {
            team: None,
            from,
            to,
            working_time: schedule.calculate_working_time(from, to)?,
            non_working_time: Some(schedule.calculate_non_working_time(from, to)?),
        })
    }

    /// Temps de la seule équipe `team` ; les autres équipes ne sont pas évaluées.
    pub fn compute_for_team(
        schedule: &WorkSchedule,
        team: &str,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Self, ScheduleError> {
        let view = schedule.team_view_by_name(team)?;
        Ok(Self {
            team: Some(view.team().name.clone()),
            from,
            to,
            working_time: view.calculate_working_time(from, to)?,
            non_working_time: None,
        })
    }
}

/// Export CSV des occurrences: header `day,team,shift,start,end,duration_minutes`
pub fn write_shift_instances_csv<W: Write>(
    out: W,
    days: &[(NaiveDate, Vec<ShiftInstance>)],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(out);
    w.write_record(["day", "team", "shift", "start", "end", "duration_minutes"])?;
    let mut minutes = itoa::Buffer::new();
    for (day, instances) in days {
        let day = day.to_string();
        for instance in instances {
            let start = instance.start.to_string();
            let end = instance.end.to_string();
            let length = minutes.format((instance.end - instance.start).num_minutes());
            w.write_record([
                day.as_str(),
                instance.team_name.as_str(),
                instance.shift_name.as_str(),
                start.as_str(),
                end.as_str(),
                length,
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}

pub fn export_shift_instances_csv<P: AsRef<Path>>(
    path: P,
    days: &[(NaiveDate, Vec<ShiftInstance>)],
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_shift_instances_csv(file, days)
}
