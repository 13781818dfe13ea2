use crate::schedule::WorkSchedule;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

pub trait Storage {
    /// Charge un planning depuis un support, graphe vérifié.
    fn load(&self) -> anyhow::Result<WorkSchedule>;
    /// Sauvegarde de manière atomique.
    fn save(&self, schedule: &WorkSchedule) -> anyhow::Result<()>;
}

/// Un planning par fichier JSON (forme interne, références par identifiant).
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Répertoire du fichier temporaire : celui de la cible, pour que le renommage reste atomique.
    fn staging_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

/// Désérialise puis applique les règles des fabriques au graphe relu.
fn decode(data: &[u8], origin: &Path) -> anyhow::Result<WorkSchedule> {
    let schedule: WorkSchedule =
        serde_json::from_slice(data).with_context(|| format!("parsing {}", origin.display()))?;
    schedule
        .validate()
        .with_context(|| format!("schedule in {} is inconsistent", origin.display()))?;
    Ok(schedule)
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<WorkSchedule> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let schedule = decode(&data, &self.path)?;
        debug!(
            path = %self.path.display(),
            schedule = schedule.name(),
            teams = schedule.teams().len(),
            "schedule loaded"
        );
        Ok(schedule)
    }

    fn save(&self, schedule: &WorkSchedule) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(schedule)?;
        let mut staged = NamedTempFile::new_in(self.staging_dir())
            .with_context(|| format!("staging {}", self.path.display()))?;
        staged.write_all(&json)?;
        staged.as_file().sync_all()?;
        staged
            .persist(&self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        debug!(path = %self.path.display(), bytes = json.len(), "schedule saved");
        Ok(())
    }
}
