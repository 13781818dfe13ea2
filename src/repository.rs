use crate::schedule::{ScheduleError, WorkSchedule};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

type Shared = Arc<RwLock<WorkSchedule>>;

/// Registre des plannings nommés, partageable entre threads.
///
/// Chaque planning a son propre verrou : lectures concurrentes, écriture exclusive.
/// Une écriture travaille sur une copie, installée seulement si la closure réussit.
#[derive(Debug, Default)]
pub struct ScheduleRepository {
    schedules: RwLock<HashMap<String, Shared>>,
}

impl ScheduleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistre un planning sous son nom ; refusé si le nom est déjà pris.
    pub fn insert(&self, schedule: WorkSchedule) -> Result<(), ScheduleError> {
        let mut map = self.schedules.write().unwrap_or_else(PoisonError::into_inner);
        let name = schedule.name().to_string();
        if map.contains_key(&name) {
            return Err(ScheduleError::DuplicateName {
                entity: "schedule",
                name,
            });
        }
        debug!(schedule = %name, "registering schedule");
        map.insert(name, Arc::new(RwLock::new(schedule)));
        Ok(())
    }

    /// Crée puis enregistre un planning vide.
    pub fn create<N: Into<String>, D: Into<String>>(
        &self,
        name: N,
        description: D,
    ) -> Result<(), ScheduleError> {
        self.insert(WorkSchedule::new(name, description)?)
    }

    /// Copie instantanée du planning.
    pub fn get(&self, name: &str) -> Result<WorkSchedule, ScheduleError> {
        self.read(name, WorkSchedule::clone)
    }

    /// Noms enregistrés, triés.
    pub fn names(&self) -> Vec<String> {
        let map = self.schedules.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = map.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn remove(&self, name: &str) -> Result<WorkSchedule, ScheduleError> {
        let mut map = self.schedules.write().unwrap_or_else(PoisonError::into_inner);
        let shared = map
            .remove(name)
            .ok_or_else(|| ScheduleError::not_found("schedule", name))?;
        debug!(schedule = %name, "removing schedule");
        let schedule = shared.read().unwrap_or_else(PoisonError::into_inner).clone();
        Ok(schedule)
    }

    /// Exécute une lecture sous verrou partagé.
    pub fn read<T, F>(&self, name: &str, f: F) -> Result<T, ScheduleError>
    where
        F: FnOnce(&WorkSchedule) -> T,
    {
        let shared = self.lookup(name)?;
        let guard = shared.read().unwrap_or_else(PoisonError::into_inner);
        Ok(f(&guard))
    }

    /// Exécute une mutation sous verrou exclusif, tout ou rien.
    pub fn write<T, F>(&self, name: &str, f: F) -> Result<T, ScheduleError>
    where
        F: FnOnce(&mut WorkSchedule) -> Result<T, ScheduleError>,
    {
        let shared = self.lookup(name)?;
        let mut guard = shared.write().unwrap_or_else(PoisonError::into_inner);
        let mut draft = guard.clone();
        let out = f(&mut draft)?;
        *guard = draft;
        Ok(out)
    }

    fn lookup(&self, name: &str) -> Result<Shared, ScheduleError> {
        let map = self.schedules.read().unwrap_or_else(PoisonError::into_inner);
        let shared = map.get(name).cloned();
        shared.ok_or_else(|| ScheduleError::not_found("schedule", name))
    }
}
