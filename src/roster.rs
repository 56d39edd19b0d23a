use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::action::{Action, RosterError};
use crate::model::entity::{AttributeDef, Group, Id, Location, Person, MAX_SKILL, MIN_SKILL};
use crate::model::settings::Settings;


/// What the team tools read from wherever the roster lives.
pub trait RosterStore {
    fn present_people(&self, selection: &Selection) -> Vec<Person>;
    fn attribute_definitions(&self) -> &[AttributeDef];
    fn settings(&self) -> &Settings;
}

/// Scope for present people. Every constraint that is set must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Selection {
    pub location: Option<Id>,
    pub group: Option<Id>,
    pub members: Option<BTreeSet<Id>>,
}

impl Selection {
    pub fn location(id: Id) -> Selection {
        Selection { location: Some(id), ..Default::default() }
    }
    pub fn group(id: Id) -> Selection {
        Selection { group: Some(id), ..Default::default() }
    }
    pub fn members(ids: impl IntoIterator<Item = Id>) -> Selection {
        Selection { members: Some(ids.into_iter().collect()), ..Default::default() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Roster {
    people: Vec<Person>,
    groups: Vec<Group>,
    locations: Vec<Location>,
    attributes: Vec<AttributeDef>,
    settings: Settings,
    next_id: Id,
}

impl Roster {
    pub fn new(settings: Settings) -> Roster {
        Roster { settings, ..Default::default() }
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }
    pub fn person(&self, id: Id) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }
    pub fn group(&self, id: Id) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    fn allocate_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }

    /// A stored `nextId` may be missing or stale; never hand out an id at or
    /// below one already in use.
    fn resync_next_id(mut self) -> Roster {
        let highest = self.people.iter().map(|p| p.id)
            .chain(self.groups.iter().map(|g| g.id))
            .chain(self.locations.iter().map(|l| l.id))
            .max()
            .unwrap_or(0);
        self.next_id = self.next_id.max(highest);
        self
    }

    fn check_person(&self, person: &Person) -> Result<(), RosterError> {
        if !(MIN_SKILL..=MAX_SKILL).contains(&person.skill_level) {
            return Err(RosterError::InvalidSkill(person.skill_level));
        }
        match person.group_id {
            Some(group) if self.group(group).is_none() => Err(RosterError::UnknownGroup(group)),
            _ => Ok(()),
        }
    }

    fn check_group(&self, group: &Group) -> Result<(), RosterError> {
        match group.location_id {
            Some(location) if !self.locations.iter().any(|l| l.id == location) => {
                Err(RosterError::UnknownLocation(location))
            }
            _ => Ok(()),
        }
    }

    fn detach_group(&mut self, group: Id) {
        self.people
            .iter_mut()
            .filter(|p| p.group_id == Some(group))
            .for_each(|p| p.group_id = None);
    }

    /// Applies one mutation. Returns the id assigned by `Add*` actions.
    pub fn act(&mut self, action: Action) -> Result<Option<Id>, RosterError> {
        match action {
            Action::AddPerson(mut person) => {
                self.check_person(&person)?;
                person.id = self.allocate_id();
                let id = person.id;
                self.people.push(person);
                Ok(Some(id))
            }
            Action::UpdatePerson(person) => {
                self.check_person(&person)?;
                let slot = self.people.iter_mut().find(|p| p.id == person.id).ok_or(RosterError::UnknownPerson(person.id))?;
                *slot = person;
                Ok(None)
            }
            Action::RemovePerson(id) => {
                let index = self.people.iter().position(|p| p.id == id).ok_or(RosterError::UnknownPerson(id))?;
                self.people.remove(index);
                Ok(None)
            }
            Action::SetPresent { person, present } => {
                let slot = self.people.iter_mut().find(|p| p.id == person).ok_or(RosterError::UnknownPerson(person))?;
                slot.present = present;
                Ok(None)
            }
            Action::ResetPresence => {
                self.people.iter_mut().for_each(|p| p.present = false);
                Ok(None)
            }
            Action::AddGroup(mut group) => {
                self.check_group(&group)?;
                group.id = self.allocate_id();
                let id = group.id;
                self.groups.push(group);
                Ok(Some(id))
            }
            Action::UpdateGroup(group) => {
                self.check_group(&group)?;
                let slot = self.groups.iter_mut().find(|g| g.id == group.id).ok_or(RosterError::UnknownGroup(group.id))?;
                *slot = group;
                Ok(None)
            }
            Action::RemoveGroup(id) => {
                let index = self.groups.iter().position(|g| g.id == id).ok_or(RosterError::UnknownGroup(id))?;
                self.groups.remove(index);
                self.detach_group(id);
                Ok(None)
            }
            Action::AddLocation(mut location) => {
                location.id = self.allocate_id();
                let id = location.id;
                self.locations.push(location);
                Ok(Some(id))
            }
            Action::UpdateLocation(location) => {
                let slot = self.locations.iter_mut().find(|l| l.id == location.id).ok_or(RosterError::UnknownLocation(location.id))?;
                *slot = location;
                Ok(None)
            }
            Action::RemoveLocation(id) => {
                let index = self.locations.iter().position(|l| l.id == id).ok_or(RosterError::UnknownLocation(id))?;
                self.locations.remove(index);
                let orphaned: Vec<Id> = self.groups.iter().filter(|g| g.location_id == Some(id)).map(|g| g.id).collect();
                self.groups.retain(|g| g.location_id != Some(id));
                for group in orphaned {
                    self.detach_group(group);
                }
                Ok(None)
            }
            Action::DefineAttribute(def) => {
                if self.attributes.iter().any(|a| a.key == def.key) {
                    return Err(RosterError::DuplicateAttribute(def.key));
                }
                self.attributes.push(def);
                Ok(None)
            }
            Action::RemoveAttribute(key) => {
                let index = self.attributes.iter().position(|a| a.key == key).ok_or_else(|| RosterError::UnknownAttribute(key.clone()))?;
                self.attributes.remove(index);
                self.people.iter_mut().for_each(|p| {
                    p.attributes.remove(&key);
                });
                Ok(None)
            }
            Action::UpdateSettings(settings) => {
                self.settings = settings;
                Ok(None)
            }
        }
    }

    pub fn to_json(&self) -> Result<String, RosterError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Roster, RosterError> {
        let roster: Roster = serde_json::from_str(json)?;
        Ok(roster.resync_next_id())
    }

    pub fn save(&self, path: &Path) -> Result<(), RosterError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        info!("saved roster with {} people to {}", self.people.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Roster, RosterError> {
        let reader = BufReader::new(File::open(path)?);
        let roster = Roster::resync_next_id(serde_json::from_reader(reader)?);
        info!("loaded roster with {} people from {}", roster.people.len(), path.display());
        Ok(roster)
    }

    fn in_selection(&self, person: &Person, selection: &Selection) -> bool {
        if let Some(members) = &selection.members {
            if !members.contains(&person.id) {
                return false;
            }
        }
        if let Some(group) = selection.group {
            if person.group_id != Some(group) {
                return false;
            }
        }
        if let Some(location) = selection.location {
            let group_location = person.group_id.and_then(|g| self.group(g)).and_then(|g| g.location_id);
            if group_location != Some(location) {
                return false;
            }
        }
        true
    }
}

impl RosterStore for Roster {
    fn present_people(&self, selection: &Selection) -> Vec<Person> {
        self.people
            .iter()
            .filter(|p| p.present && self.in_selection(p, selection))
            .cloned()
            .collect()
    }

    fn attribute_definitions(&self) -> &[AttributeDef] {
        &self.attributes
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entity::{AttributeKind, Gender};
    use crate::model::settings::ClampRule;

    struct Fixture {
        roster: Roster,
        north: Id,
        under12: Id,
        seniors: Id,
    }

    fn fixture() -> Fixture {
        let mut roster = Roster::new(Settings::default());
        let north = roster.act(Action::AddLocation(Location { id: 0, name: "North".into() })).unwrap().unwrap();
        let under12 = roster
            .act(Action::AddGroup(Group { id: 0, name: "U12".into(), location_id: Some(north) }))
            .unwrap()
            .unwrap();
        let seniors = roster
            .act(Action::AddGroup(Group { id: 0, name: "Seniors".into(), location_id: None }))
            .unwrap()
            .unwrap();
        for (i, group) in [Some(under12), Some(under12), Some(seniors), None].iter().enumerate() {
            let mut person = Person::new(0, &format!("p{}", i), 2010, Gender::Female, 3);
            person.group_id = *group;
            roster.act(Action::AddPerson(person)).unwrap();
        }
        Fixture { roster, north, under12, seniors }
    }

    #[test]
    fn adds_assign_fresh_ids() {
        let f = fixture();
        let ids: BTreeSet<Id> = f.roster.people().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 4);
        assert!(!ids.contains(&f.north) && !ids.contains(&f.under12));
    }

    #[test]
    fn rejects_bad_skill_and_dangling_group() {
        let mut f = fixture();
        let err = f.roster.act(Action::AddPerson(Person::new(0, "x", 2000, Gender::Male, 6))).unwrap_err();
        assert!(matches!(err, RosterError::InvalidSkill(6)));
        let mut person = Person::new(0, "x", 2000, Gender::Male, 3);
        person.group_id = Some(999);
        assert!(matches!(f.roster.act(Action::AddPerson(person)), Err(RosterError::UnknownGroup(999))));
        assert!(matches!(f.roster.act(Action::RemovePerson(999)), Err(RosterError::UnknownPerson(999))));
    }

    #[test]
    fn selection_scopes_present_people() {
        let mut f = fixture();
        assert_eq!(f.roster.present_people(&Selection::default()).len(), 4);
        assert_eq!(f.roster.present_people(&Selection::location(f.north)).len(), 2);
        assert_eq!(f.roster.present_people(&Selection::group(f.seniors)).len(), 1);

        let first = f.roster.people()[0].id;
        f.roster.act(Action::SetPresent { person: first, present: false }).unwrap();
        assert_eq!(f.roster.present_people(&Selection::group(f.under12)).len(), 1);
        assert!(f.roster.present_people(&Selection::members([first])).is_empty());

        f.roster.act(Action::ResetPresence).unwrap();
        assert!(f.roster.present_people(&Selection::default()).is_empty());
    }

    #[test]
    fn removing_location_cascades_to_groups() {
        let mut f = fixture();
        f.roster.act(Action::RemoveLocation(f.north)).unwrap();
        assert!(f.roster.group(f.under12).is_none());
        assert!(f.roster.group(f.seniors).is_some());
        assert_eq!(f.roster.people().iter().filter(|p| p.group_id.is_none()).count(), 3);
    }

    #[test]
    fn attribute_definitions_strip_values_on_removal() {
        let mut f = fixture();
        let def = AttributeDef { key: "jersey".into(), label: "Jersey".into(), kind: AttributeKind::Number };
        f.roster.act(Action::DefineAttribute(def.clone())).unwrap();
        assert!(matches!(f.roster.act(Action::DefineAttribute(def)), Err(RosterError::DuplicateAttribute(_))));

        let person = f.roster.people()[0].clone().with_attribute("jersey", 9.0);
        f.roster.act(Action::UpdatePerson(person)).unwrap();
        assert_eq!(f.roster.attribute_definitions().len(), 1);

        f.roster.act(Action::RemoveAttribute("jersey".into())).unwrap();
        assert!(f.roster.attribute_definitions().is_empty());
        assert!(f.roster.people().iter().all(|p| p.attributes.is_empty()));
    }

    #[test]
    fn save_and_load_restore_roster() {
        let mut f = fixture();
        f.roster.act(Action::UpdateSettings(Settings { team_clamp_rule: ClampRule::Relaxed })).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.json");
        f.roster.save(&path).unwrap();
        let restored = Roster::load(&path).unwrap();
        assert_eq!(restored, f.roster);
        assert_eq!(restored.settings().team_clamp_rule, ClampRule::Relaxed);

        let mut restored = restored;
        let id = restored.act(Action::AddLocation(Location { id: 0, name: "South".into() })).unwrap().unwrap();
        assert!(f.roster.people().iter().all(|p| p.id != id));
    }

    #[test]
    fn loading_without_next_id_does_not_reuse_ids() {
        let json = r#"{
            "people": [{"id": 1, "name": "Ana", "birthYear": 2012, "gender": "Female", "skillLevel": 4}],
            "groups": [{"id": 5, "name": "U12"}]
        }"#;
        let mut roster = Roster::from_json(json).unwrap();
        let id = roster.act(Action::AddPerson(Person::new(0, "Bea", 2011, Gender::Female, 3))).unwrap().unwrap();
        assert_eq!(id, 6);
        assert_eq!(roster.people().iter().filter(|p| p.id == 1).count(), 1);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stale.json");
        std::fs::write(&path, json.replace("\"groups\"", "\"nextId\": 2, \"groups\"")).unwrap();
        let mut loaded = Roster::load(&path).unwrap();
        let id = loaded.act(Action::AddLocation(Location { id: 0, name: "Gym".into() })).unwrap().unwrap();
        assert_eq!(id, 6);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(Roster::load(&dir.path().join("missing.json")), Err(RosterError::Io(_))));
    }

    #[test]
    fn json_round_trip_accepts_mixed_attributes() {
        let json = r#"{
            "people": [{
                "id": 1, "name": "Ana", "birthYear": 2012, "gender": "Female", "skillLevel": 4,
                "present": true,
                "attributes": {"jersey": 7, "captain": true, "position": "wing", "tags": ["fast", "left"]}
            }],
            "settings": {"teamClampRule": "relaxed"},
            "nextId": 1
        }"#;
        let roster = Roster::from_json(json).unwrap();
        let ana = roster.person(1).unwrap();
        assert_eq!(ana.attribute("jersey"), Some(&crate::model::entity::AttributeValue::Number(7.0)));
        assert_eq!(ana.attribute("tags"), Some(&crate::model::entity::AttributeValue::from(vec!["fast", "left"])));
        assert_eq!(roster.settings().team_clamp_rule, ClampRule::Relaxed);
        assert_eq!(Roster::from_json(&roster.to_json().unwrap()).unwrap(), roster);
    }
}
