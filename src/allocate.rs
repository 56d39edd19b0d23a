//! Gender-separated team generation.
//!
//! The requested team count is apportioned across the genders present in the
//! pool with the largest-remainder (Hamilton) method, after every represented
//! gender has been seeded with one team. Each gender's sub-pool is then
//! balanced on its own.

use std::cmp::Reverse;

use itertools::Itertools;
use log::{debug, error};
use rand::Rng;

use crate::balance::build_teams;
use crate::error::TeamError;
use crate::model::entity::{Gender, Person};
use crate::model::options::TeamType;
use crate::model::team::Team;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allotment {
    pub gender: Gender,
    pub pool_size: usize,
    pub teams: usize,
}

/// Sub-pools in gender order, represented genders only.
pub fn partition_by_gender(people: &[Person]) -> Vec<(Gender, Vec<Person>)> {
    Gender::ALL
        .iter()
        .map(|gender| {
            let pool: Vec<Person> = people.iter().filter(|p| p.gender == *gender).cloned().collect();
            (*gender, pool)
        })
        .filter(|(_, pool)| !pool.is_empty())
        .collect()
}

pub fn represented_genders(people: &[Person]) -> usize {
    people.iter().map(|p| p.gender).unique().count()
}

/// Splits `requested` teams across `(gender, pool size)` pairs. Pools of size
/// zero must not be passed in.
pub fn apportion(pools: &[(Gender, usize)], requested: usize) -> Result<Vec<Allotment>, TeamError> {
    let represented = pools.len();
    if requested < represented {
        return Err(TeamError::InsufficientTeams { required: represented, requested });
    }
    let mut allotments: Vec<Allotment> = pools
        .iter()
        .map(|(gender, pool_size)| Allotment { gender: *gender, pool_size: *pool_size, teams: 1 })
        .collect();

    let remaining = requested - represented;
    let total: usize = pools.iter().map(|(_, size)| size).sum();
    if remaining > 0 && total > 0 {
        // Integer quotas keep the remainders exact.
        let remainders: Vec<usize> = allotments
            .iter_mut()
            .map(|allotment| {
                let share = remaining * allotment.pool_size;
                allotment.teams += share / total;
                share % total
            })
            .collect();
        let granted: usize = allotments.iter().map(|a| a.teams - 1).sum();
        let leftover = remaining - granted;
        remainders
            .iter()
            .enumerate()
            .sorted_by_key(|(_, remainder)| Reverse(**remainder))
            .take(leftover)
            .for_each(|(index, _)| allotments[index].teams += 1);
    }

    let allocated: usize = allotments.iter().map(|a| a.teams).sum();
    if allocated != requested {
        error!("apportionment produced {} teams for {} requested: {:?}", allocated, requested, allotments);
        return Err(TeamError::AllocationMismatch { requested, allocated });
    }
    debug!("apportioned {} teams: {:?}", requested, allotments);
    Ok(allotments)
}

/// Balances each gender separately; teams are named "<Gender> Team <n>" and
/// returned in gender order.
pub fn allocate_separated<R: Rng + ?Sized>(
    people: &[Person],
    requested: usize,
    rng: &mut R,
) -> Result<Vec<Team>, TeamError> {
    if people.is_empty() {
        return Ok(Vec::new());
    }
    let pools = partition_by_gender(people);
    let sizes: Vec<(Gender, usize)> = pools.iter().map(|(gender, pool)| (*gender, pool.len())).collect();
    let allotments = apportion(&sizes, requested)?;

    Ok(pools
        .iter()
        .zip(allotments)
        .flat_map(|((gender, pool), allotment)| {
            build_teams(pool, TeamType::Balanced, allotment.teams, Some(gender.label()), rng)
        })
        .collect())
}
