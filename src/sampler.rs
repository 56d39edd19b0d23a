use rand::distributions::{Distribution, WeightedIndex};
use rand::prelude::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::filter::Filter;
use crate::model::entity::Person;
use crate::model::criteria::{FilterCriteria, PickCriteria};


/// Returns a uniformly shuffled copy of `items` (Fisher–Yates).
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// Picks up to `count` people matching `criteria`. Asking for more than the
/// filtered pool holds returns the whole pool in random order.
pub fn pick_random<R: Rng + ?Sized>(
    people: &[Person],
    count: usize,
    criteria: PickCriteria,
    current_year: i32,
    rng: &mut R,
) -> Vec<Person> {
    let criteria = FilterCriteria::from(criteria);
    let filtered = Filter::new(&criteria, current_year).apply(people);
    let mut picked = shuffle(&filtered, rng);
    picked.truncate(count);
    picked
}

/// Picks one entry with probability proportional to its weight. Negative and
/// non-finite weights count as zero; `None` when nothing has weight.
pub fn weighted_pick<'a, T, R: Rng + ?Sized>(entries: &'a [(T, f64)], rng: &mut R) -> Option<&'a T> {
    let weights = entries
        .iter()
        .map(|(_, w)| if w.is_finite() && *w > 0.0 { *w } else { 0.0 });
    let index = WeightedIndex::new(weights).ok()?;
    entries.get(index.sample(rng)).map(|(item, _)| item)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinSide {
    Heads,
    Tails,
}

pub fn coin_toss<R: Rng + ?Sized>(rng: &mut R) -> CoinSide {
    if rng.gen_bool(0.5) { CoinSide::Heads } else { CoinSide::Tails }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinTally {
    pub heads: usize,
    pub tails: usize,
    pub sequence: Vec<CoinSide>,
}

pub fn toss_coins<R: Rng + ?Sized>(count: usize, rng: &mut R) -> CoinTally {
    let sequence: Vec<CoinSide> = (0..count).map(|_| coin_toss(rng)).collect();
    let heads = sequence.iter().filter(|side| **side == CoinSide::Heads).count();
    CoinTally { heads, tails: count - heads, sequence }
}
