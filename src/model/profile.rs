use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_AGE: u8 = 1;
pub const MAX_AGE: u8 = 15;

/// A child identity. Profiles are created and edited by a guardian and
/// scope both module availability and progress tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub age: u8,
    pub created: DateTime<Utc>,
}

impl Profile {
    pub fn new(name: impl Into<String>, age: u8) -> Self {
        let created = Utc::now();
        Self {
            id: created.timestamp_millis().to_string(),
            name: name.into(),
            age,
            created,
        }
    }
}

pub fn is_valid_age(age: u8) -> bool {
    (MIN_AGE..=MAX_AGE).contains(&age)
}

/// Developmental bucket derived from a profile's age. Prompt templates are
/// keyed by these rather than by raw age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeRange {
    Toddler,
    Preschool,
    School,
    Preteen,
    Teen,
}

impl AgeRange {
    pub fn from_age(age: u8) -> Option<Self> {
        match age {
            1..=3 => Some(AgeRange::Toddler),
            4..=6 => Some(AgeRange::Preschool),
            7..=9 => Some(AgeRange::School),
            10..=12 => Some(AgeRange::Preteen),
            13..=15 => Some(AgeRange::Teen),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeRange::Toddler => "1-3",
            AgeRange::Preschool => "4-6",
            AgeRange::School => "7-9",
            AgeRange::Preteen => "10-12",
            AgeRange::Teen => "13-15",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_ranges_cover_every_valid_age() {
        for age in MIN_AGE..=MAX_AGE {
            assert!(AgeRange::from_age(age).is_some(), "age {age} has no range");
        }
        assert_eq!(AgeRange::from_age(0), None);
        assert_eq!(AgeRange::from_age(16), None);
    }

    #[test]
    fn age_range_boundaries() {
        assert_eq!(AgeRange::from_age(3), Some(AgeRange::Toddler));
        assert_eq!(AgeRange::from_age(4), Some(AgeRange::Preschool));
        assert_eq!(AgeRange::from_age(7), Some(AgeRange::School));
        assert_eq!(AgeRange::from_age(8), Some(AgeRange::School));
        assert_eq!(AgeRange::from_age(12), Some(AgeRange::Preteen));
        assert_eq!(AgeRange::from_age(13), Some(AgeRange::Teen));
    }
}
