use thiserror::Error;

use crate::model::entity::{AttributeDef, Group, Id, Location, Person, SkillLevel};
use crate::model::settings::Settings;

/// Mutation of the roster. Ids carried by `Add*` payloads are ignored; the
/// roster assigns a fresh one.
#[derive(Debug, Clone)]
pub enum Action {
    AddPerson(Person),
    UpdatePerson(Person),
    RemovePerson(Id),
    SetPresent { person: Id, present: bool },
    ResetPresence,
    AddGroup(Group),
    UpdateGroup(Group),
    RemoveGroup(Id),
    AddLocation(Location),
    UpdateLocation(Location),
    RemoveLocation(Id),
    DefineAttribute(AttributeDef),
    RemoveAttribute(String),
    UpdateSettings(Settings),
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Unknown person {0}")]
    UnknownPerson(Id),
    #[error("Unknown group {0}")]
    UnknownGroup(Id),
    #[error("Unknown location {0}")]
    UnknownLocation(Id),
    #[error("Unknown attribute {0:?}")]
    UnknownAttribute(String),
    #[error("Attribute {0:?} is already defined")]
    DuplicateAttribute(String),
    #[error("Skill level {0} outside 1..=5")]
    InvalidSkill(SkillLevel),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
