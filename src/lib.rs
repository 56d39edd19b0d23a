//! Team splitting for rosters of people.
//!
//! A pool of present people is narrowed by [`filter::Filter`], the requested
//! team count is fitted by [`clamp::valid_range`], and the pool is split by
//! [`balance::generate_teams`] or, per gender, by
//! [`allocate::allocate_separated`]. [`generator::TeamGenerator`] runs the
//! whole sequence. All of it is pure: callers pass the random source in.

pub mod action;
pub mod allocate;
pub mod balance;
pub mod clamp;
pub mod error;
pub mod filter;
pub mod generator;
pub mod model;
pub mod roster;
pub mod sampler;

pub use crate::action::{Action, RosterError};
pub use crate::error::TeamError;
pub use crate::generator::{Generation, TeamGenerator};
pub use crate::model::criteria::{AgeBand, CustomRule, FilterCriteria, GenderSelection, PickCriteria, Range, RuleOp};
pub use crate::model::entity::{AttributeValue, Gender, Id, Person};
pub use crate::model::options::{GenderMode, GenerationOptions, TeamType};
pub use crate::model::settings::{ClampRule, Settings};
pub use crate::model::team::{GenderRatio, Team};
pub use crate::roster::{Roster, RosterStore, Selection};
