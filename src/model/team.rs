use super::{RotationId, TeamId};
use crate::schedule::ScheduleError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Personne affectée à une équipe, identifiée par son matricule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub member_id: String,
}

impl TeamMember {
    pub fn new<N: Into<String>, D: Into<String>, I: Into<String>>(
        name: N,
        description: D,
        member_id: I,
    ) -> Result<Self, ScheduleError> {
        let member = Self {
            name: name.into(),
            description: description.into(),
            member_id: member_id.into(),
        };
        member.check()?;
        Ok(member)
    }

    fn check(&self) -> Result<(), ScheduleError> {
        if self.name.trim().is_empty() {
            return Err(ScheduleError::EmptyName {
                entity: "team member",
            });
        }
        if self.member_id.trim().is_empty() {
            return Err(ScheduleError::EmptyName { entity: "member id" });
        }
        Ok(())
    }
}

/// Ajout et/ou retrait d'un membre pour une seule occurrence de shift,
/// repérée par son début.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberException {
    pub start: NaiveDateTime,
    #[serde(default)]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addition: Option<TeamMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removal: Option<TeamMember>,
}

impl MemberException {
    pub fn new<R: Into<String>>(
        start: NaiveDateTime,
        reason: R,
        addition: Option<TeamMember>,
        removal: Option<TeamMember>,
    ) -> Result<Self, ScheduleError> {
        let exception = Self {
            start,
            reason: reason.into(),
            addition,
            removal,
        };
        exception.check()?;
        Ok(exception)
    }

    fn check(&self) -> Result<(), ScheduleError> {
        if self.addition.is_none() && self.removal.is_none() {
            return Err(ScheduleError::EmptyMemberException { start: self.start });
        }
        for member in self.addition.iter().chain(&self.removal) {
            member.check()?;
        }
        Ok(())
    }
}

/// Équipe : une rotation (partagée) ancrée à une date de départ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    rotation: RotationId,
    rotation_start: NaiveDate,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    members: Vec<TeamMember>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    member_exceptions: Vec<MemberException>,
}

impl Team {
    pub(crate) fn new(
        name: String,
        description: String,
        rotation: RotationId,
        rotation_start: NaiveDate,
    ) -> Result<Self, ScheduleError> {
        if name.trim().is_empty() {
            return Err(ScheduleError::EmptyName { entity: "team" });
        }
        Ok(Self {
            id: TeamId::random(),
            name,
            description,
            rotation,
            rotation_start,
            members: Vec::new(),
            member_exceptions: Vec::new(),
        })
    }

    pub fn rotation(&self) -> &RotationId {
        &self.rotation
    }

    /// Date d'ancrage, jour 0 du cycle.
    pub fn rotation_start(&self) -> NaiveDate {
        self.rotation_start
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn has_member(&self, member_id: &str) -> bool {
        self.members.iter().any(|m| m.member_id == member_id)
    }

    pub(crate) fn add_member(&mut self, member: TeamMember) -> Result<(), ScheduleError> {
        if self.has_member(&member.member_id) {
            return Err(ScheduleError::DuplicateName {
                entity: "team member",
                name: member.member_id,
            });
        }
        self.members.push(member);
        Ok(())
    }

    pub(crate) fn remove_member(&mut self, member_id: &str) -> Result<TeamMember, ScheduleError> {
        let pos = self
            .members
            .iter()
            .position(|m| m.member_id == member_id)
            .ok_or_else(|| ScheduleError::not_found("team member", member_id))?;
        Ok(self.members.remove(pos))
    }

    /// Triées par début d'occurrence ; plusieurs exceptions peuvent viser la même.
    pub fn member_exceptions(&self) -> &[MemberException] {
        &self.member_exceptions
    }

    pub(crate) fn add_member_exception(&mut self, exception: MemberException) {
        self.member_exceptions.push(exception);
        self.member_exceptions.sort_by_key(|e| e.start);
    }

    /// Effectif de l'occurrence qui commence à `start` : membres affectés,
    /// puis retraits et ajouts de ses exceptions, dans l'ordre d'enregistrement.
    pub fn members_at(&self, start: NaiveDateTime) -> Vec<TeamMember> {
        let mut members = self.members.clone();
        for exception in self.member_exceptions.iter().filter(|e| e.start == start) {
            if let Some(removed) = &exception.removal {
                members.retain(|m| m.member_id != removed.member_id);
            }
            if let Some(added) = &exception.addition {
                if !members.iter().any(|m| m.member_id == added.member_id) {
                    members.push(added.clone());
                }
            }
        }
        members
    }

    /// Matricules uniques, membres et exceptions bien formés.
    pub(crate) fn check(&self) -> Result<(), ScheduleError> {
        let mut seen = HashSet::new();
        for member in &self.members {
            member.check()?;
            if !seen.insert(member.member_id.as_str()) {
                return Err(ScheduleError::DuplicateName {
                    entity: "team member",
                    name: member.member_id.clone(),
                });
            }
        }
        for exception in &self.member_exceptions {
            exception.check()?;
        }
        Ok(())
    }
}
