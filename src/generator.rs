use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::allocate::{allocate_separated, represented_genders};
use crate::balance::{build_teams, prefilter};
use crate::clamp::{clamp_selection, valid_range, ClampOutcome, TeamCountRange, MIN_POOL};
use crate::error::TeamError;
use crate::filter::Filter;
use crate::model::entity::{current_year, Person};
use crate::model::criteria::{FilterCriteria, PickCriteria};
use crate::model::options::{GenderMode, GenerationOptions};
use crate::model::settings::Settings;
use crate::model::team::Team;
use crate::roster::RosterStore;
use crate::sampler::pick_random;


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    pub teams: Vec<Team>,
    /// Requested and effective team counts; callers reflect `effective` back
    /// into whatever holds the selection.
    pub team_count: ClampOutcome,
    pub eligible: usize,
}

/// Runs filter, clamp and split against one settings snapshot. Holds no
/// roster state of its own.
#[derive(Debug, Clone)]
pub struct TeamGenerator {
    settings: Settings,
    current_year: i32,
}

impl TeamGenerator {
    pub fn new(settings: Settings) -> TeamGenerator {
        TeamGenerator { settings, current_year: current_year() }
    }

    pub fn from_store<S: RosterStore + ?Sized>(store: &S) -> TeamGenerator {
        TeamGenerator::new(store.settings().clone())
    }

    pub fn at_year(mut self, year: i32) -> TeamGenerator {
        self.current_year = year;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// People left after the criteria and the team type's own narrowing.
    pub fn eligible(&self, pool: &[Person], criteria: &FilterCriteria, options: &GenerationOptions) -> Vec<Person> {
        let filtered = Filter::new(criteria, self.current_year).apply(pool);
        prefilter(&filtered, options, self.current_year)
    }

    pub fn team_count_range(&self, eligible: &[Person], options: &GenerationOptions) -> TeamCountRange {
        valid_range(
            eligible.len(),
            self.settings.team_clamp_rule,
            options.gender_mode == GenderMode::Separated,
            represented_genders(eligible),
        )
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        pool: &[Person],
        criteria: &FilterCriteria,
        options: &GenerationOptions,
        rng: &mut R,
    ) -> Result<Generation, TeamError> {
        let eligible = self.eligible(pool, criteria, options);
        let range = self.team_count_range(&eligible, options);
        let separated = options.gender_mode == GenderMode::Separated;

        if separated {
            let required = represented_genders(&eligible);
            if options.number_of_teams < required {
                return Err(TeamError::InsufficientTeams { required, requested: options.number_of_teams });
            }
        }
        let team_count = clamp_selection(options.number_of_teams, range);
        if eligible.len() < MIN_POOL {
            debug!("{} eligible people, nothing to split", eligible.len());
            return Ok(Generation { teams: Vec::new(), team_count, eligible: eligible.len() });
        }

        let teams = if separated {
            allocate_separated(&eligible, team_count.effective, rng)?
        } else {
            build_teams(&eligible, options.team_type, team_count.effective, None, rng)
        };
        debug!("generated {} teams from {} eligible of {}", teams.len(), eligible.len(), pool.len());
        Ok(Generation { teams, team_count, eligible: eligible.len() })
    }

    pub fn pick<R: Rng + ?Sized>(&self, pool: &[Person], count: usize, criteria: PickCriteria, rng: &mut R) -> Vec<Person> {
        pick_random(pool, count, criteria, self.current_year, rng)
    }
}
