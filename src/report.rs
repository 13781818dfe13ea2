use crate::duration;
use crate::model::TimePeriod;
use crate::schedule::{ScheduleError, ShiftInstance, WorkSchedule};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Langue des libellés ; passée explicitement, jamais globale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    English,
    Swedish,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale: {0} (expected en or sv)")]
pub struct UnknownLocale(String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" | "english" => Ok(Locale::English),
            "sv" | "sv-se" | "swedish" | "svenska" => Ok(Locale::Swedish),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Locale::English => "en",
            Locale::Swedish => "sv",
        })
    }
}

/// Libellés d'une langue.
#[derive(Debug)]
pub struct Messages {
    pub working_shifts: &'static str,
    pub day: &'static str,
    pub team: &'static str,
    pub shift: &'static str,
    pub start: &'static str,
    pub end: &'static str,
    pub non_working: &'static str,
    pub schedule: &'static str,
    pub rotation: &'static str,
    pub rotation_duration: &'static str,
    pub working_time: &'static str,
    pub duration: &'static str,
    pub breaks: &'static str,
    pub shifts: &'static str,
    pub teams: &'static str,
    pub per_week: &'static str,
    pub coverage: &'static str,
    pub non_working_periods: &'static str,
    pub total_non_working: &'static str,
}

static ENGLISH: Messages = Messages {
    working_shifts: "Working shifts",
    day: "Day",
    team: "Team",
    shift: "Shift",
    start: "Start",
    end: "End",
    non_working: "Non-working",
    schedule: "Schedule",
    rotation: "Rotation",
    rotation_duration: "Rotation duration",
    working_time: "Working time",
    duration: "Duration",
    breaks: "Breaks",
    shifts: "Shifts",
    teams: "Teams",
    per_week: "per week",
    coverage: "Coverage",
    non_working_periods: "Non-working periods",
    total_non_working: "Total non-working time",
};

static SWEDISH: Messages = Messages {
    working_shifts: "Arbetspass",
    day: "Dag",
    team: "Lag",
    shift: "Pass",
    start: "Start",
    end: "Slut",
    non_working: "Ledig",
    schedule: "Schema",
    rotation: "Rotation",
    rotation_duration: "Rotationens längd",
    working_time: "Arbetstid",
    duration: "Längd",
    breaks: "Raster",
    shifts: "Pass",
    teams: "Lag",
    per_week: "per vecka",
    coverage: "Täckning",
    non_working_periods: "Lediga perioder",
    total_non_working: "Total ledig tid",
};

impl Locale {
    pub fn messages(self) -> &'static Messages {
        match self {
            Locale::English => &ENGLISH,
            Locale::Swedish => &SWEDISH,
        }
    }
}

/// Permet de customiser le rendu (texte, markdown...).
pub trait ReportRenderer {
    fn render_schedule(&self, schedule: &WorkSchedule) -> Result<String, ScheduleError>;

    fn render_shift_instances(
        &self,
        schedule: &WorkSchedule,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<String, ScheduleError>;
}

/// Rendu texte brut, une ligne par élément.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReport {
    pub locale: Locale,
}

impl TextReport {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    fn instance_line(&self, index: usize, instance: &ShiftInstance) -> String {
        let m = self.locale.messages();
        format!(
            "   ({index}) {team}: {team_name}, {shift}: {shift_name}, {start}: {from}, {end}: {to}\n",
            team = m.team,
            team_name = instance.team_name,
            shift = m.shift,
            shift_name = instance.shift_name,
            start = m.start,
            from = instance.start,
            end = m.end,
            to = instance.end,
        )
    }
}

impl ReportRenderer for TextReport {
    fn render_schedule(&self, schedule: &WorkSchedule) -> Result<String, ScheduleError> {
        let m = self.locale.messages();
        let mut out = format!("{}: {}", m.schedule, schedule.name());
        if !schedule.description.is_empty() && schedule.description != schedule.name() {
            out.push_str(&format!(" ({})", schedule.description));
        }
        out.push('\n');
        out.push_str(&format!(
            "{}: {}, {}: {}\n",
            m.rotation_duration,
            duration::format(schedule.rotation_duration()?),
            m.working_time,
            duration::format(schedule.rotation_working_time()?),
        ));

        out.push_str(&format!("{}:\n", m.shifts));
        for (i, shift) in schedule.shifts().iter().enumerate() {
            out.push_str(&format!(
                "   ({}) {}, {}: {}, {}: {}, {}: {}",
                i + 1,
                shift.name,
                m.start,
                shift.start,
                m.end,
                shift.end(),
                m.duration,
                duration::format(shift.duration),
            ));
            if !shift.breaks().is_empty() {
                out.push_str(&format!(", {}: {}", m.breaks, duration::format(shift.break_time())));
            }
            out.push('\n');
        }

        out.push_str(&format!("{}:\n", m.teams));
        for (i, view) in schedule.team_views()?.iter().enumerate() {
            out.push_str(&format!(
                "   ({}) {}, {}: {}, {}: {}, {:.2}%, {} {}\n",
                i + 1,
                view.team().name,
                m.rotation,
                view.rotation().name,
                m.start,
                view.team().rotation_start(),
                view.percentage_worked(),
                duration::format(view.hours_worked_per_week()),
                m.per_week,
            ));
        }
        out.push_str(&format!("{}: {:.2}%\n", m.coverage, schedule.coverage_percentage()?));

        let periods = schedule.non_working_periods();
        if !periods.is_empty() {
            out.push_str(&format!("{}:\n", m.non_working_periods));
            for (i, period) in periods.iter().enumerate() {
                out.push_str(&format!(
                    "   ({}) {}, {}: {}, {}: {}\n",
                    i + 1,
                    period.name,
                    m.start,
                    period.start,
                    m.duration,
                    duration::format(period.duration),
                ));
            }
            let total = periods
                .iter()
                .fold(chrono::Duration::zero(), |acc, p| acc + p.duration);
            out.push_str(&format!("{}: {}\n", m.total_non_working, duration::format(total)));
        }
        Ok(out)
    }

    fn render_shift_instances(
        &self,
        schedule: &WorkSchedule,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<String, ScheduleError> {
        let m = self.locale.messages();
        let days = schedule.shift_instances_between(start, end)?;

        let mut out = format!("{}\n", m.working_shifts);
        for (i, (day, instances)) in days.iter().enumerate() {
            out.push_str(&format!("[{}] {}: {}\n", i + 1, m.day, day));
            if instances.is_empty() {
                out.push_str(&format!("   {}\n", m.non_working));
                continue;
            }
            for (k, instance) in instances.iter().enumerate() {
                out.push_str(&self.instance_line(k + 1, instance));
            }
        }
        Ok(out)
    }
}
