use log::warn;

use crate::model::entity::{current_year, AttributeValue, Person};
use crate::model::criteria::{CustomRule, FilterCriteria, RuleOp};


impl AttributeValue {
    /// String coercion used by `contains`.
    pub fn to_text(&self) -> String {
        match self {
            AttributeValue::Bool(b) => b.to_string(),
            AttributeValue::Number(n) if n.is_infinite() => {
                if *n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
            }
            // -0 prints as "0"
            AttributeValue::Number(n) if *n == 0.0 => "0".to_string(),
            AttributeValue::Number(n) => n.to_string(),
            AttributeValue::Text(s) => s.clone(),
            AttributeValue::List(items) => items.join(","),
        }
    }

    /// Numeric coercion used by `gte` and `lte`. Unparseable input is NaN.
    pub fn to_number(&self) -> f64 {
        match self {
            AttributeValue::Bool(b) => if *b { 1.0 } else { 0.0 },
            AttributeValue::Number(n) => *n,
            AttributeValue::Text(s) => parse_number(s),
            AttributeValue::List(items) => match items.as_slice() {
                [] => 0.0,
                [single] => parse_number(single),
                _ => f64::NAN,
            },
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            AttributeValue::Bool(b) => *b,
            AttributeValue::Number(n) => *n != 0.0 && !n.is_nan(),
            AttributeValue::Text(s) => !s.is_empty(),
            AttributeValue::List(_) => true,
        }
    }
}

fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => f64::NAN,
        _ => trimmed.parse().unwrap_or(f64::NAN),
    }
}

impl CustomRule {
    /// Evaluates the rule against a possibly absent attribute value.
    pub fn matches(&self, value: Option<&AttributeValue>) -> bool {
        match &self.op {
            RuleOp::Equals => value == Some(&self.value),
            RuleOp::Contains => {
                let haystack = value.map(AttributeValue::to_text).unwrap_or_default().to_lowercase();
                haystack.contains(&self.value.to_text().to_lowercase())
            }
            RuleOp::Gte => value.map_or(f64::NAN, AttributeValue::to_number) >= self.value.to_number(),
            RuleOp::Lte => value.map_or(f64::NAN, AttributeValue::to_number) <= self.value.to_number(),
            RuleOp::In => match (&self.value, value) {
                (AttributeValue::List(items), Some(AttributeValue::Text(text))) => items.contains(text),
                _ => false,
            },
            RuleOp::Is => value.map_or(false, AttributeValue::is_truthy) == self.value.is_truthy(),
            RuleOp::Other(_) => true,
        }
    }
}


/// Criteria bound to the year ages are computed against.
pub struct Filter<'a> {
    criteria: &'a FilterCriteria,
    current_year: i32,
}

impl<'a> Filter<'a> {
    pub fn new(criteria: &'a FilterCriteria, current_year: i32) -> Filter<'a> {
        for rule in &criteria.rules {
            if let RuleOp::Other(name) = &rule.op {
                warn!("unknown operator {:?} in rule on {:?}; rule always passes", name, rule.key);
            }
        }
        Filter { criteria, current_year }
    }

    pub fn matches(&self, person: &Person) -> bool {
        self.matches_gender(person)
            && self.matches_age(person)
            && self.matches_skill(person)
            && self.criteria.rules.iter().all(|rule| rule.matches(person.attribute(&rule.key)))
    }

    pub fn apply(&self, people: &[Person]) -> Vec<Person> {
        people.iter().filter(|p| self.matches(p)).cloned().collect()
    }

    fn matches_gender(&self, person: &Person) -> bool {
        self.criteria.genders.includes(person.gender)
    }

    fn matches_age(&self, person: &Person) -> bool {
        let age = person.age(self.current_year);
        if !self.criteria.age_bands.is_empty() {
            return self.criteria.age_bands.iter().any(|band| band.range.contains(age));
        }
        self.criteria.age_range.map_or(true, |range| range.contains(age))
    }

    fn matches_skill(&self, person: &Person) -> bool {
        self.criteria.skill_range.map_or(true, |range| range.contains(person.skill_level as u32))
    }
}

/// Filters against the current calendar year.
pub fn filter_people(people: &[Person], criteria: &FilterCriteria) -> Vec<Person> {
    Filter::new(criteria, current_year()).apply(people)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entity::Gender;
    use crate::model::criteria::{AgeBand, GenderSelection, Range};

    const YEAR: i32 = 2024;

    fn person(id: u32, age: i32, gender: Gender, skill: u8) -> Person {
        Person::new(id, &format!("p{}", id), YEAR - age, gender, skill)
    }

    fn ids(people: &[Person]) -> Vec<u32> {
        people.iter().map(|p| p.id).collect()
    }

    #[test]
    fn empty_criteria_keeps_everyone() {
        let people = vec![person(1, 10, Gender::Male, 3), person(2, 30, Gender::Other, 1)];
        let out = Filter::new(&FilterCriteria::default(), YEAR).apply(&people);
        assert_eq!(ids(&out), vec![1, 2]);
    }

    #[test]
    fn gender_selection_excludes() {
        let people = vec![
            person(1, 10, Gender::Male, 3),
            person(2, 10, Gender::Female, 3),
            person(3, 10, Gender::Other, 3),
        ];
        let criteria = FilterCriteria {
            genders: GenderSelection { male: false, female: true, other: true },
            ..Default::default()
        };
        assert_eq!(ids(&Filter::new(&criteria, YEAR).apply(&people)), vec![2, 3]);
    }

    #[test]
    fn age_bands_are_ored() {
        let people = vec![person(1, 15, Gender::Male, 3), person(2, 20, Gender::Male, 3), person(3, 8, Gender::Male, 3)];
        let criteria = FilterCriteria {
            age_bands: vec![AgeBand::new("kids", 8, 12), AgeBand::new("young adults", 18, 25)],
            ..Default::default()
        };
        assert_eq!(ids(&Filter::new(&criteria, YEAR).apply(&people)), vec![2, 3]);
    }

    #[test]
    fn bands_take_precedence_over_legacy_range() {
        let people = vec![person(1, 15, Gender::Male, 3), person(2, 40, Gender::Male, 3)];
        let criteria = FilterCriteria {
            age_range: Some(Range::new(10, 20)),
            age_bands: vec![AgeBand::new("adults", 30, 50)],
            ..Default::default()
        };
        assert_eq!(ids(&Filter::new(&criteria, YEAR).apply(&people)), vec![2]);
    }

    #[test]
    fn legacy_age_and_skill_ranges_are_inclusive() {
        let people = vec![
            person(1, 10, Gender::Male, 2),
            person(2, 20, Gender::Male, 4),
            person(3, 21, Gender::Male, 4),
            person(4, 15, Gender::Male, 5),
        ];
        let criteria = FilterCriteria {
            age_range: Some(Range::new(10, 20)),
            skill_range: Some(Range::new(2, 4)),
            ..Default::default()
        };
        assert_eq!(ids(&Filter::new(&criteria, YEAR).apply(&people)), vec![1, 2]);
    }

    #[test]
    fn gte_on_missing_attribute_fails() {
        let rule = CustomRule::new("jersey", "gte", 10.0);
        assert!(!rule.matches(None));
        assert!(rule.matches(Some(&AttributeValue::Number(10.0))));
        assert!(rule.matches(Some(&AttributeValue::Text("12".into()))));
        assert!(!rule.matches(Some(&AttributeValue::Text("twelve".into()))));
    }

    #[test]
    fn lte_coerces_booleans_and_empty_text() {
        let rule = CustomRule::new("level", "lte", 0.0);
        assert!(rule.matches(Some(&AttributeValue::Bool(false))));
        assert!(rule.matches(Some(&AttributeValue::Text("  ".into()))));
        assert!(!rule.matches(Some(&AttributeValue::Bool(true))));
    }

    #[test]
    fn equals_is_type_sensitive() {
        let rule = CustomRule::new("jersey", "equals", 7.0);
        assert!(rule.matches(Some(&AttributeValue::Number(7.0))));
        assert!(!rule.matches(Some(&AttributeValue::Text("7".into()))));
        assert!(!rule.matches(None));
    }

    #[test]
    fn contains_is_case_insensitive_and_treats_absent_as_empty() {
        let rule = CustomRule::new("position", "contains", "KEEP");
        assert!(rule.matches(Some(&AttributeValue::Text("Goalkeeper".into()))));
        assert!(!rule.matches(None));
        let empty = CustomRule::new("position", "contains", "");
        assert!(empty.matches(None));
        let number = CustomRule::new("jersey", "contains", "1");
        assert!(number.matches(Some(&AttributeValue::Number(10.0))));
        let negative_zero = CustomRule::new("score", "contains", "-");
        assert!(!negative_zero.matches(Some(&AttributeValue::Number(-0.0))));
        assert_eq!(AttributeValue::Number(-0.0).to_text(), "0");
        let list = CustomRule::new("tags", "contains", "b,c");
        assert!(list.matches(Some(&AttributeValue::from(vec!["a", "b", "c"]))));
    }

    #[test]
    fn in_requires_list_rule_value() {
        let rule = CustomRule::new("team", "in", vec!["red", "blue"]);
        assert!(rule.matches(Some(&AttributeValue::Text("blue".into()))));
        assert!(!rule.matches(Some(&AttributeValue::Text("green".into()))));
        assert!(!rule.matches(None));
        let scalar = CustomRule::new("team", "in", "blue");
        assert!(!scalar.matches(Some(&AttributeValue::Text("blue".into()))));
    }

    #[test]
    fn is_compares_truthiness() {
        let rule = CustomRule::new("captain", "is", true);
        assert!(rule.matches(Some(&AttributeValue::Bool(true))));
        assert!(rule.matches(Some(&AttributeValue::Text("yes".into()))));
        assert!(!rule.matches(Some(&AttributeValue::Number(0.0))));
        assert!(!rule.matches(None));
        let falsy = CustomRule::new("captain", "is", false);
        assert!(falsy.matches(None));
    }

    #[test]
    fn unknown_operator_passes() {
        let rule = CustomRule::new("anything", "startsWith", "x");
        assert!(rule.matches(None));
        assert_eq!(rule.op, RuleOp::Other("startsWith".to_string()));
    }

    #[test]
    fn rules_are_anded() {
        let people = vec![
            person(1, 20, Gender::Male, 3).with_attribute("jersey", 12.0).with_attribute("captain", true),
            person(2, 20, Gender::Male, 3).with_attribute("jersey", 12.0),
            person(3, 20, Gender::Male, 3).with_attribute("jersey", 4.0).with_attribute("captain", true),
        ];
        let criteria = FilterCriteria {
            rules: vec![CustomRule::new("jersey", "gte", 10.0), CustomRule::new("captain", "is", true)],
            ..Default::default()
        };
        assert_eq!(ids(&Filter::new(&criteria, YEAR).apply(&people)), vec![1]);
    }

    #[test]
    fn extreme_birth_years_do_not_overflow() {
        let ancient = Person::new(1, "a", i32::MIN, Gender::Male, 3);
        assert_eq!(ancient.age(YEAR), i32::MAX as u32);
        let distant = Person::new(2, "b", i32::MAX, Gender::Male, 3);
        assert_eq!(distant.age(-5), 0);
    }

    #[test]
    fn future_birth_year_is_age_zero() {
        let people = vec![person(1, -3, Gender::Male, 3)];
        let criteria = FilterCriteria { age_range: Some(Range::new(0, 0)), ..Default::default() };
        assert_eq!(ids(&Filter::new(&criteria, YEAR).apply(&people)), vec![1]);
    }
}
