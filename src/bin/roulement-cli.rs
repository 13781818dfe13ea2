#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand, ValueEnum};
use roulement::{
    duration, io,
    report::{Locale, ReportRenderer, TextReport},
    storage::{JsonStorage, Storage},
    TeamMember, WorkSchedule,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de rotations d'équipes et de temps de travail (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du planning
    #[arg(long, global = true, default_value = "schedule.json")]
    schedule: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Entity {
    Shift,
    Rotation,
    Team,
    Period,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Créer un planning vide
    Init {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Écrase un fichier existant
        #[arg(long)]
        force: bool,
    },

    /// Importer un document JSON (références par nom)
    Import {
        #[arg(long)]
        document: String,
    },

    /// Exporter le planning en document JSON
    Export {
        #[arg(long)]
        out: String,
    },

    /// Créer un shift
    CreateShift {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// HH:MM[:SS]
        #[arg(long)]
        start: String,
        /// ISO-8601, ex. PT8H
        #[arg(long)]
        duration: String,
    },

    /// Ajouter une pause à un shift
    CreateBreak {
        #[arg(long)]
        shift: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        duration: String,
    },

    /// Créer une rotation vide
    CreateRotation {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Ajouter un segment à une rotation
    AddSegment {
        #[arg(long)]
        rotation: String,
        #[arg(long)]
        shift: String,
        #[arg(long)]
        days_on: u32,
        #[arg(long, default_value_t = 0)]
        days_off: u32,
    },

    /// Créer une équipe sur une rotation
    CreateTeam {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        rotation: String,
        /// Date d'ancrage YYYY-MM-DD
        #[arg(long)]
        start: String,
    },

    /// Affecter un membre à une équipe
    AddMember {
        #[arg(long)]
        team: String,
        #[arg(long)]
        name: String,
        /// Matricule, unique dans l'équipe
        #[arg(long)]
        id: String,
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Retirer un membre d'une équipe
    RemoveMember {
        #[arg(long)]
        team: String,
        #[arg(long)]
        id: String,
    },

    /// Créer une période non travaillée
    CreatePeriod {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// YYYY-MM-DDTHH:MM[:SS]
        #[arg(long)]
        start: String,
        #[arg(long)]
        duration: String,
    },

    /// Supprimer une entité par son nom
    Delete {
        #[arg(value_enum)]
        entity: Entity,
        #[arg(long)]
        name: String,
    },

    /// Ajouter les jours fériés suédois d'une année
    Holidays {
        #[arg(long)]
        year: i32,
    },

    /// Lister les shifts d'un jour
    Day {
        #[arg(long)]
        date: String,
    },

    /// Lister les shifts en cours à un instant
    At {
        #[arg(long)]
        time: String,
    },

    /// Temps de travail et temps non travaillé sur `[from, to)` (JSON)
    WorkingTime {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Temps de cette seule équipe, sans temps non travaillé
        #[arg(long)]
        team: Option<String>,
    },

    /// Rapport jour par jour, export CSV optionnel
    Report {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long, default_value = "en")]
        locale: Locale,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Décrire le planning
    Describe {
        #[arg(long, default_value = "en")]
        locale: Locale,
    },
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date (YYYY-MM-DD): {raw}"))
}

fn parse_time(raw: &str) -> Result<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .with_context(|| format!("invalid time (HH:MM[:SS]): {raw}"))
}

fn parse_datetime(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(dt);
        }
    }
    let date = parse_date(raw).with_context(|| format!("invalid date/datetime: {raw}"))?;
    Ok(date.and_time(NaiveTime::MIN))
}

fn parse_duration(raw: &str) -> Result<chrono::Duration> {
    Ok(duration::parse(raw)?)
}

fn load(storage: &JsonStorage) -> Result<WorkSchedule> {
    if !storage.exists() {
        bail!(
            "no schedule at {}; run `init` or `import` first",
            storage.path().display()
        );
    }
    storage.load()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let storage = JsonStorage::open(&cli.schedule)?;

    match cli.cmd {
        Commands::Init {
            name,
            description,
            force,
        } => {
            if storage.exists() && !force {
                bail!("{} already exists (use --force)", storage.path().display());
            }
            let schedule = WorkSchedule::new(name, description)?;
            storage.save(&schedule)?;
            println!("Schedule '{}' created", schedule.name());
        }
        Commands::Import { document } => {
            let schedule = io::load_document(document)?;
            storage.save(&schedule)?;
            println!(
                "Schedule '{}' imported: {} shift(s), {} rotation(s), {} team(s)",
                schedule.name(),
                schedule.shifts().len(),
                schedule.rotations().len(),
                schedule.teams().len()
            );
        }
        Commands::Export { out } => {
            let schedule = load(&storage)?;
            io::export_document_json(out, &schedule)?;
        }
        Commands::CreateShift {
            name,
            description,
            start,
            duration,
        } => {
            let mut schedule = load(&storage)?;
            let id = schedule.create_shift(name, description, parse_time(&start)?, parse_duration(&duration)?)?;
            storage.save(&schedule)?;
            println!("{id}");
        }
        Commands::CreateBreak {
            shift,
            name,
            description,
            start,
            duration,
        } => {
            let mut schedule = load(&storage)?;
            let id = schedule
                .shift_by_name(&shift)
                .map(|s| s.id.clone())
                .ok_or_else(|| anyhow::anyhow!("unknown shift: {shift}"))?;
            schedule.create_break(&id, name, description, parse_time(&start)?, parse_duration(&duration)?)?;
            storage.save(&schedule)?;
        }
        Commands::CreateRotation { name, description } => {
            let mut schedule = load(&storage)?;
            let id = schedule.create_rotation(name, description)?;
            storage.save(&schedule)?;
            println!("{id}");
        }
        Commands::AddSegment {
            rotation,
            shift,
            days_on,
            days_off,
        } => {
            let mut schedule = load(&storage)?;
            let rotation_id = schedule
                .rotation_by_name(&rotation)
                .map(|r| r.id.clone())
                .ok_or_else(|| anyhow::anyhow!("unknown rotation: {rotation}"))?;
            let shift_id = schedule
                .shift_by_name(&shift)
                .map(|s| s.id.clone())
                .ok_or_else(|| anyhow::anyhow!("unknown shift: {shift}"))?;
            let sequence = schedule.add_segment(&rotation_id, &shift_id, days_on, days_off)?;
            storage.save(&schedule)?;
            println!("{sequence}");
        }
        Commands::CreateTeam {
            name,
            description,
            rotation,
            start,
        } => {
            let mut schedule = load(&storage)?;
            let rotation_id = schedule
                .rotation_by_name(&rotation)
                .map(|r| r.id.clone())
                .ok_or_else(|| anyhow::anyhow!("unknown rotation: {rotation}"))?;
            let id = schedule.create_team(name, description, &rotation_id, parse_date(&start)?)?;
            storage.save(&schedule)?;
            println!("{id}");
        }
        Commands::AddMember {
            team,
            name,
            id,
            description,
        } => {
            let mut schedule = load(&storage)?;
            let team_id = schedule
                .team_by_name(&team)
                .map(|t| t.id.clone())
                .ok_or_else(|| anyhow::anyhow!("unknown team: {team}"))?;
            schedule.add_team_member(&team_id, TeamMember::new(name, description, id)?)?;
            storage.save(&schedule)?;
        }
        Commands::RemoveMember { team, id } => {
            let mut schedule = load(&storage)?;
            let team_id = schedule
                .team_by_name(&team)
                .map(|t| t.id.clone())
                .ok_or_else(|| anyhow::anyhow!("unknown team: {team}"))?;
            let removed = schedule.remove_team_member(&team_id, &id)?;
            storage.save(&schedule)?;
            println!("{} removed from {team}", removed.name);
        }
        Commands::CreatePeriod {
            name,
            description,
            start,
            duration,
        } => {
            let mut schedule = load(&storage)?;
            let id = schedule.create_non_working_period(
                name,
                description,
                parse_datetime(&start)?,
                parse_duration(&duration)?,
            )?;
            storage.save(&schedule)?;
            println!("{id}");
        }
        Commands::Delete { entity, name } => {
            let mut schedule = load(&storage)?;
            let unknown = || anyhow::anyhow!("unknown {entity:?}: {name}");
            match entity {
                Entity::Shift => {
                    let id = schedule.shift_by_name(&name).map(|s| s.id.clone()).ok_or_else(unknown)?;
                    schedule.delete_shift(&id)?;
                }
                Entity::Rotation => {
                    let id = schedule.rotation_by_name(&name).map(|r| r.id.clone()).ok_or_else(unknown)?;
                    schedule.delete_rotation(&id)?;
                }
                Entity::Team => {
                    let id = schedule.team_by_name(&name).map(|t| t.id.clone()).ok_or_else(unknown)?;
                    schedule.delete_team(&id)?;
                }
                Entity::Period => {
                    let id = schedule
                        .non_working_period_by_name(&name)
                        .map(|p| p.id.clone())
                        .ok_or_else(unknown)?;
                    schedule.delete_non_working_period(&id)?;
                }
            }
            storage.save(&schedule)?;
        }
        Commands::Holidays { year } => {
            let mut schedule = load(&storage)?;
            let ids = schedule.add_swedish_holidays(year)?;
            storage.save(&schedule)?;
            println!("{} holiday(s) added for {year}", ids.len());
        }
        Commands::Day { date } => {
            let schedule = load(&storage)?;
            for instance in schedule.shift_instances_for_day(parse_date(&date)?)? {
                println!(
                    "{} | {} | {} → {}",
                    instance.team_name, instance.shift_name, instance.start, instance.end
                );
            }
        }
        Commands::At { time } => {
            let schedule = load(&storage)?;
            for instance in schedule.shift_instances_for_time(parse_datetime(&time)?)? {
                println!(
                    "{} | {} | {} → {}",
                    instance.team_name, instance.shift_name, instance.start, instance.end
                );
            }
        }
        Commands::WorkingTime { from, to, team } => {
            let schedule = load(&storage)?;
            let (from, to) = (parse_datetime(&from)?, parse_datetime(&to)?);
            let result = match team {
                Some(team) => io::WorkingTime::compute_for_team(&schedule, &team, from, to)?,
                None => io::WorkingTime::compute(&schedule, from, to)?,
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Report {
            from,
            to,
            locale,
            out_csv,
        } => {
            let schedule = load(&storage)?;
            let (from, to) = (parse_date(&from)?, parse_date(&to)?);
            if let Some(path) = out_csv {
                io::export_shift_instances_csv(path, &schedule.shift_instances_between(from, to)?)?;
            }
            print!("{}", TextReport::new(locale).render_shift_instances(&schedule, from, to)?);
        }
        Commands::Describe { locale } => {
            let schedule = load(&storage)?;
            print!("{}", TextReport::new(locale).render_schedule(&schedule)?);
        }
    }

    Ok(())
}
