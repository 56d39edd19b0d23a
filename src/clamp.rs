use log::debug;
use serde::{Deserialize, Serialize};

use crate::model::settings::ClampRule;

pub const MIN_TEAMS: usize = 2;
pub const MAX_TEAMS: usize = 8;
/// Smallest pool worth splitting at all.
pub const MIN_POOL: usize = 2;

/// Inclusive bounds for a requestable team count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamCountRange {
    pub min: usize,
    pub max: usize,
}

impl TeamCountRange {
    pub fn contains(&self, count: usize) -> bool {
        self.min <= count && count <= self.max
    }

    pub fn clamp(&self, count: usize) -> usize {
        count.clamp(self.min, self.max)
    }
}

/// Result of fitting a held team-count selection into the current range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClampOutcome {
    pub requested: usize,
    pub effective: usize,
    pub range: TeamCountRange,
}

impl ClampOutcome {
    pub fn adjusted(&self) -> bool {
        self.requested != self.effective
    }
}

/// The pool size floor does not apply here: even a pool of one reports a
/// maximum of two, so callers gate generation on `pool_size >= 2` themselves.
pub fn valid_range(pool_size: usize, rule: ClampRule, separated: bool, represented: usize) -> TeamCountRange {
    let base_max = (pool_size / rule.divisor()).clamp(MIN_TEAMS, MAX_TEAMS);
    if separated {
        let min = MIN_TEAMS.max(represented);
        TeamCountRange { min, max: min.max(base_max) }
    } else {
        TeamCountRange { min: MIN_TEAMS, max: base_max }
    }
}

pub fn clamp_selection(requested: usize, range: TeamCountRange) -> ClampOutcome {
    let effective = range.clamp(requested);
    if effective != requested {
        debug!("team count {} adjusted to {} (allowed {}..={})", requested, effective, range.min, range.max);
    }
    ClampOutcome { requested, effective, range }
}
