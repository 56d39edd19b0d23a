pub mod entity {
    use std::collections::BTreeMap;
    use std::fmt;

    use chrono::Datelike;
    use serde::{Deserialize, Serialize};

    pub type Id = u32;
    pub type SkillLevel = u8;

    pub const MIN_SKILL: SkillLevel = 1;
    pub const MAX_SKILL: SkillLevel = 5;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    pub enum Gender {
        Male,
        Female,
        Other,
    }

    impl Gender {
        /// Iteration order used wherever results are grouped by gender.
        pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

        pub fn label(self) -> &'static str {
            match self {
                Gender::Male => "Male",
                Gender::Female => "Female",
                Gender::Other => "Other",
            }
        }
    }

    impl fmt::Display for Gender {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.label())
        }
    }

    /// Value of a custom attribute. Variant order matters for untagged decoding.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum AttributeValue {
        Bool(bool),
        Number(f64),
        Text(String),
        List(Vec<String>),
    }

    impl From<&str> for AttributeValue {
        fn from(value: &str) -> Self {
            AttributeValue::Text(value.to_string())
        }
    }

    impl From<f64> for AttributeValue {
        fn from(value: f64) -> Self {
            AttributeValue::Number(value)
        }
    }

    impl From<bool> for AttributeValue {
        fn from(value: bool) -> Self {
            AttributeValue::Bool(value)
        }
    }

    impl From<Vec<&str>> for AttributeValue {
        fn from(value: Vec<&str>) -> Self {
            AttributeValue::List(value.into_iter().map(String::from).collect())
        }
    }

    pub type Attributes = BTreeMap<String, AttributeValue>;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Person {
        pub id: Id,
        pub name: String,
        pub birth_year: i32,
        pub gender: Gender,
        pub skill_level: SkillLevel,
        #[serde(default)]
        pub present: bool,
        #[serde(default)]
        pub group_id: Option<Id>,
        #[serde(default)]
        pub attributes: Attributes,
    }

    impl Person {
        pub fn new(id: Id, name: &str, birth_year: i32, gender: Gender, skill_level: SkillLevel) -> Person {
            Person {
                id,
                name: name.to_string(),
                birth_year,
                gender,
                skill_level,
                present: true,
                group_id: None,
                attributes: Attributes::new(),
            }
        }

        pub fn with_attribute(mut self, key: &str, value: impl Into<AttributeValue>) -> Person {
            self.attributes.insert(key.to_string(), value.into());
            self
        }

        /// Age in whole years; a birth year in the future counts as zero.
        pub fn age(&self, current_year: i32) -> u32 {
            current_year.saturating_sub(self.birth_year).max(0) as u32
        }

        pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
            self.attributes.get(key)
        }
    }

    pub fn current_year() -> i32 {
        chrono::Local::now().year()
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Group {
        pub id: Id,
        pub name: String,
        #[serde(default)]
        pub location_id: Option<Id>,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Location {
        pub id: Id,
        pub name: String,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum AttributeKind {
        Text,
        Number,
        Boolean,
        List,
    }

    /// Schema entry describing a custom attribute key.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AttributeDef {
        pub key: String,
        pub label: String,
        pub kind: AttributeKind,
    }
}


pub mod criteria {
    use serde::{Deserialize, Serialize};
    use super::entity::{AttributeValue, Gender};

    /// Inclusive range.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Range {
        pub min: u32,
        pub max: u32,
    }

    impl Range {
        pub fn new(min: u32, max: u32) -> Range {
            Range { min, max }
        }
        pub fn contains(&self, value: u32) -> bool {
            self.min <= value && value <= self.max
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AgeBand {
        pub label: String,
        #[serde(flatten)]
        pub range: Range,
    }

    impl AgeBand {
        pub fn new(label: &str, min: u32, max: u32) -> AgeBand {
            AgeBand { label: label.to_string(), range: Range::new(min, max) }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct GenderSelection {
        pub male: bool,
        pub female: bool,
        pub other: bool,
    }

    impl Default for GenderSelection {
        fn default() -> Self {
            GenderSelection { male: true, female: true, other: true }
        }
    }

    impl GenderSelection {
        pub fn only(gender: Gender) -> GenderSelection {
            GenderSelection {
                male: gender == Gender::Male,
                female: gender == Gender::Female,
                other: gender == Gender::Other,
            }
        }
        pub fn includes(&self, gender: Gender) -> bool {
            match gender {
                Gender::Male => self.male,
                Gender::Female => self.female,
                Gender::Other => self.other,
            }
        }
        pub fn is_all(&self) -> bool {
            self.male && self.female && self.other
        }
    }

    /// Comparison operator of a custom rule. Names outside the known set are
    /// kept verbatim in `Other` and always pass.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(from = "String", into = "String")]
    pub enum RuleOp {
        Equals,
        Contains,
        Gte,
        Lte,
        In,
        Is,
        Other(String),
    }

    impl From<&str> for RuleOp {
        fn from(name: &str) -> Self {
            match name {
                "equals" => RuleOp::Equals,
                "contains" => RuleOp::Contains,
                "gte" => RuleOp::Gte,
                "lte" => RuleOp::Lte,
                "in" => RuleOp::In,
                "is" => RuleOp::Is,
                other => RuleOp::Other(other.to_string()),
            }
        }
    }

    impl From<String> for RuleOp {
        fn from(name: String) -> Self {
            RuleOp::from(name.as_str())
        }
    }

    impl From<RuleOp> for String {
        fn from(op: RuleOp) -> Self {
            match op {
                RuleOp::Equals => "equals".to_string(),
                RuleOp::Contains => "contains".to_string(),
                RuleOp::Gte => "gte".to_string(),
                RuleOp::Lte => "lte".to_string(),
                RuleOp::In => "in".to_string(),
                RuleOp::Is => "is".to_string(),
                RuleOp::Other(name) => name,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct CustomRule {
        pub key: String,
        pub op: RuleOp,
        pub value: AttributeValue,
    }

    impl CustomRule {
        pub fn new(key: &str, op: impl Into<RuleOp>, value: impl Into<AttributeValue>) -> CustomRule {
            CustomRule { key: key.to_string(), op: op.into(), value: value.into() }
        }
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct FilterCriteria {
        pub genders: GenderSelection,
        pub age_range: Option<Range>,
        pub age_bands: Vec<AgeBand>,
        pub skill_range: Option<Range>,
        pub rules: Vec<CustomRule>,
    }

    /// Criteria accepted by the random picker: no bands, no custom rules.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct PickCriteria {
        pub genders: GenderSelection,
        pub age_range: Option<Range>,
        pub skill_range: Option<Range>,
    }

    impl From<PickCriteria> for FilterCriteria {
        fn from(pick: PickCriteria) -> Self {
            FilterCriteria {
                genders: pick.genders,
                age_range: pick.age_range,
                age_bands: Vec::new(),
                skill_range: pick.skill_range,
                rules: Vec::new(),
            }
        }
    }
}


pub mod team {
    use serde::{Deserialize, Serialize};
    use super::entity::{Gender, Person};

    /// Per-gender share of a team in whole percent. Each value is rounded on
    /// its own, so the three need not add up to 100.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct GenderRatio {
        pub male: u32,
        pub female: u32,
        pub other: u32,
    }

    impl GenderRatio {
        pub fn get(&self, gender: Gender) -> u32 {
            match gender {
                Gender::Male => self.male,
                Gender::Female => self.female,
                Gender::Other => self.other,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Team {
        pub id: String,
        pub name: String,
        pub members: Vec<Person>,
        pub average_skill: f64,
        pub gender_ratio: GenderRatio,
    }

    impl Team {
        pub fn size(&self) -> usize {
            self.members.len()
        }
        pub fn skill_sum(&self) -> u32 {
            self.members.iter().map(|m| m.skill_level as u32).sum()
        }
    }
}


pub mod options {
    use serde::{Deserialize, Serialize};
    use super::criteria::Range;

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub enum TeamType {
        #[default]
        #[serde(rename = "balanced")]
        Balanced,
        #[serde(rename = "random")]
        Random,
        #[serde(rename = "single-gender-female")]
        SingleGenderFemale,
        #[serde(rename = "single-gender-male")]
        SingleGenderMale,
        #[serde(rename = "age-filtered")]
        AgeFiltered,
        #[serde(rename = "skill-filtered")]
        SkillFiltered,
    }

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum GenderMode {
        #[default]
        Mixed,
        Separated,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GenerationOptions {
        pub team_type: TeamType,
        pub number_of_teams: usize,
        #[serde(default)]
        pub age_range: Option<Range>,
        #[serde(default)]
        pub skill_range: Option<Range>,
        #[serde(default)]
        pub gender_mode: GenderMode,
    }

    impl GenerationOptions {
        pub fn new(team_type: TeamType, number_of_teams: usize) -> GenerationOptions {
            GenerationOptions {
                team_type,
                number_of_teams,
                age_range: None,
                skill_range: None,
                gender_mode: GenderMode::Mixed,
            }
        }
        pub fn separated(mut self) -> GenerationOptions {
            self.gender_mode = GenderMode::Separated;
            self
        }
        pub fn with_age_range(mut self, range: Range) -> GenerationOptions {
            self.age_range = Some(range);
            self
        }
        pub fn with_skill_range(mut self, range: Range) -> GenerationOptions {
            self.skill_range = Some(range);
            self
        }
    }
}


pub mod settings {
    use serde::{Deserialize, Serialize};

    /// How aggressively the team count may grow with pool size.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum ClampRule {
        /// At least two people per team.
        #[default]
        Conservative,
        /// One person per team is enough.
        Relaxed,
    }

    impl ClampRule {
        pub fn divisor(self) -> usize {
            match self {
                ClampRule::Conservative => 2,
                ClampRule::Relaxed => 1,
            }
        }
    }

    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct Settings {
        pub team_clamp_rule: ClampRule,
    }

    impl Settings {
        pub fn from_json(json: &str) -> serde_json::Result<Settings> {
            serde_json::from_str(json)
        }
    }
}
