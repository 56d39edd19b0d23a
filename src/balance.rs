use std::cmp::Reverse;

use itertools::Itertools;
use log::debug;
use rand::Rng;
use uuid::Uuid;

use crate::filter::Filter;
use crate::model::entity::{Gender, Person};
use crate::model::criteria::{FilterCriteria, GenderSelection};
use crate::model::options::{GenerationOptions, TeamType};
use crate::model::team::{GenderRatio, Team};
use crate::sampler::shuffle;


impl Team {
    pub fn from_members(name: String, members: Vec<Person>) -> Team {
        let average_skill = average_skill(&members);
        let gender_ratio = gender_ratio(&members);
        Team {
            id: Uuid::new_v4().to_string(),
            name,
            members,
            average_skill,
            gender_ratio,
        }
    }
}

/// Mean skill rounded to one decimal; zero for an empty team.
pub fn average_skill(members: &[Person]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    let sum: u32 = members.iter().map(|m| m.skill_level as u32).sum();
    (sum as f64 / members.len() as f64 * 10.0).round() / 10.0
}

pub fn gender_ratio(members: &[Person]) -> GenderRatio {
    if members.is_empty() {
        return GenderRatio::default();
    }
    let counts = members.iter().counts_by(|m| m.gender);
    let percent = |gender: Gender| {
        let count = counts.get(&gender).copied().unwrap_or(0);
        (count as f64 / members.len() as f64 * 100.0).round() as u32
    };
    GenderRatio {
        male: percent(Gender::Male),
        female: percent(Gender::Female),
        other: percent(Gender::Other),
    }
}

/// Narrows the pool according to the team type.
pub fn prefilter(people: &[Person], options: &GenerationOptions, current_year: i32) -> Vec<Person> {
    let criteria = match options.team_type {
        TeamType::Balanced | TeamType::Random => return people.to_vec(),
        TeamType::SingleGenderFemale => FilterCriteria {
            genders: GenderSelection::only(Gender::Female),
            ..Default::default()
        },
        TeamType::SingleGenderMale => FilterCriteria {
            genders: GenderSelection::only(Gender::Male),
            ..Default::default()
        },
        TeamType::AgeFiltered => FilterCriteria { age_range: options.age_range, ..Default::default() },
        TeamType::SkillFiltered => FilterCriteria { skill_range: options.skill_range, ..Default::default() },
    };
    Filter::new(&criteria, current_year).apply(people)
}

/// Team index for the `index`-th pick of a snake draft over `n_teams`.
/// `n_teams` must be non-zero.
pub(crate) fn snake_slot(index: usize, n_teams: usize) -> usize {
    let round = index / n_teams;
    let offset = index % n_teams;
    if round % 2 == 0 { offset } else { n_teams - 1 - offset }
}

/// Stable sort by skill descending, then snake draft.
pub fn assign_snake(pool: &[Person], n_teams: usize) -> Vec<Vec<Person>> {
    let mut slots = vec![Vec::new(); n_teams];
    if n_teams == 0 {
        return slots;
    }
    pool.iter()
        .sorted_by_key(|p| Reverse(p.skill_level))
        .enumerate()
        .for_each(|(index, person)| slots[snake_slot(index, n_teams)].push(person.clone()));
    slots
}

/// Shuffle, then deal round-robin by index modulo `n_teams`.
pub fn assign_round_robin<R: Rng + ?Sized>(pool: &[Person], n_teams: usize, rng: &mut R) -> Vec<Vec<Person>> {
    let mut slots = vec![Vec::new(); n_teams];
    if n_teams == 0 {
        return slots;
    }
    for (index, person) in shuffle(pool, rng).into_iter().enumerate() {
        slots[index % n_teams].push(person);
    }
    slots
}

/// Splits an already narrowed pool. `label` prefixes team names.
pub(crate) fn build_teams<R: Rng + ?Sized>(
    pool: &[Person],
    team_type: TeamType,
    n_teams: usize,
    label: Option<&str>,
    rng: &mut R,
) -> Vec<Team> {
    if pool.is_empty() || n_teams == 0 {
        return Vec::new();
    }
    let slots = match team_type {
        TeamType::Balanced => assign_snake(pool, n_teams),
        _ => assign_round_robin(pool, n_teams, rng),
    };
    debug!("split {} people into {} teams ({:?})", pool.len(), n_teams, team_type);
    slots
        .into_iter()
        .enumerate()
        .map(|(index, members)| {
            let name = match label {
                Some(label) => format!("{} Team {}", label, index + 1),
                None => format!("Team {}", index + 1),
            };
            Team::from_members(name, members)
        })
        .collect()
}

pub fn generate_teams<R: Rng + ?Sized>(
    people: &[Person],
    options: &GenerationOptions,
    current_year: i32,
    rng: &mut R,
) -> Vec<Team> {
    let pool = prefilter(people, options, current_year);
    build_teams(&pool, options.team_type, options.number_of_teams, None, rng)
}
