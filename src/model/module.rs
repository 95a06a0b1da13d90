use serde::{Deserialize, Serialize};

/// One subject/activity type offered to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleType {
    Reading,
    Math,
    Logic,
    Rhyming,
    Spelling,
    EmojiRiddles,
    Coding,
    Ai,
    Science,
    Phonics,
}

/// Home-screen grouping for module cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleCategory {
    NumbersLogic,
    WordsSounds,
    Discovery,
}

impl ModuleCategory {
    pub const ALL: [ModuleCategory; 3] = [
        ModuleCategory::NumbersLogic,
        ModuleCategory::WordsSounds,
        ModuleCategory::Discovery,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ModuleCategory::NumbersLogic => "Numbers & Logic",
            ModuleCategory::WordsSounds => "Words & Sounds",
            ModuleCategory::Discovery => "Discovery",
        }
    }
}

/// Inclusive age window inside which a module is offered.
#[derive(Debug, Clone, Copy)]
pub struct AgeRule {
    pub min_age: u8,
    pub max_age: u8,
}

impl ModuleType {
    pub const ALL: [ModuleType; 10] = [
        ModuleType::Reading,
        ModuleType::Math,
        ModuleType::Logic,
        ModuleType::Rhyming,
        ModuleType::Spelling,
        ModuleType::EmojiRiddles,
        ModuleType::Coding,
        ModuleType::Ai,
        ModuleType::Science,
        ModuleType::Phonics,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ModuleType::Reading => "Reading",
            ModuleType::Math => "Math",
            ModuleType::Logic => "Logic",
            ModuleType::Rhyming => "Rhyming",
            ModuleType::Spelling => "Spelling",
            ModuleType::EmojiRiddles => "Emoji Riddles",
            ModuleType::Coding => "Coding",
            ModuleType::Ai => "AI",
            ModuleType::Science => "Science",
            ModuleType::Phonics => "Phonics",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ModuleType::Reading => "📖",
            ModuleType::Math => "🔢",
            ModuleType::Logic => "🧩",
            ModuleType::Rhyming => "🎤",
            ModuleType::Spelling => "🐝",
            ModuleType::EmojiRiddles => "🤔",
            ModuleType::Coding => "🤖",
            ModuleType::Ai => "💡",
            ModuleType::Science => "🔬",
            ModuleType::Phonics => "🎵",
        }
    }

    pub fn category(self) -> ModuleCategory {
        match self {
            ModuleType::Math | ModuleType::Logic | ModuleType::Coding => {
                ModuleCategory::NumbersLogic
            }
            ModuleType::Reading
            | ModuleType::Rhyming
            | ModuleType::Spelling
            | ModuleType::EmojiRiddles
            | ModuleType::Phonics => ModuleCategory::WordsSounds,
            ModuleType::Ai | ModuleType::Science => ModuleCategory::Discovery,
        }
    }

    pub fn age_rule(self) -> Option<AgeRule> {
        let (min_age, max_age) = match self {
            ModuleType::Reading => (4, 9),
            ModuleType::Math => (1, 15),
            ModuleType::Logic => (1, 15),
            ModuleType::Rhyming => (4, 7),
            ModuleType::Spelling => (10, 15),
            ModuleType::EmojiRiddles => (5, 7),
            ModuleType::Coding => (5, 15),
            ModuleType::Ai => (5, 15),
            ModuleType::Science => (5, 15),
            ModuleType::Phonics => (3, 7),
        };
        Some(AgeRule { min_age, max_age })
    }

    /// A module with no age rule defaults to always-visible.
    pub fn is_available(self, age: u8) -> bool {
        match self.age_rule() {
            Some(rule) => age >= rule.min_age && age <= rule.max_age,
            None => true,
        }
    }
}

pub fn available_modules(age: u8) -> Vec<ModuleType> {
    ModuleType::ALL
        .into_iter()
        .filter(|m| m.is_available(age))
        .collect()
}

/// A narrative skin for generated content. Phonics themes additionally pick
/// the template; all other themes are substituted into the prompt text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeDef {
    pub id: &'static str,
    pub name: &'static str,
}

const STORY_THEMES: &[ThemeDef] = &[
    ThemeDef { id: "animals", name: "Animal Friends" },
    ThemeDef { id: "space", name: "Outer Space" },
    ThemeDef { id: "ocean", name: "Under the Sea" },
    ThemeDef { id: "dinosaurs", name: "Dinosaurs" },
    ThemeDef { id: "fairy-tale", name: "Fairy Tales" },
    ThemeDef { id: "sports", name: "Sports Day" },
];

const PHONICS_THEMES: &[ThemeDef] = &[
    ThemeDef { id: "abc", name: "Letter Sounds" },
    ThemeDef { id: "words", name: "Making Words" },
    ThemeDef { id: "digraphs", name: "Super Sounds" },
    ThemeDef { id: "vowel-teams", name: "Vowel Teams" },
    ThemeDef { id: "blends", name: "Blending Sounds" },
];

pub fn themes_for(module: ModuleType) -> &'static [ThemeDef] {
    match module {
        ModuleType::Phonics => PHONICS_THEMES,
        _ => STORY_THEMES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_matches_the_rule_table() {
        let expected: &[(ModuleType, u8, u8)] = &[
            (ModuleType::Reading, 4, 9),
            (ModuleType::Math, 1, 15),
            (ModuleType::Logic, 1, 15),
            (ModuleType::Rhyming, 4, 7),
            (ModuleType::Spelling, 10, 15),
            (ModuleType::EmojiRiddles, 5, 7),
            (ModuleType::Coding, 5, 15),
            (ModuleType::Ai, 5, 15),
            (ModuleType::Science, 5, 15),
            (ModuleType::Phonics, 3, 7),
        ];
        for &(module, min, max) in expected {
            for age in 1..=15u8 {
                assert_eq!(
                    module.is_available(age),
                    age >= min && age <= max,
                    "{module:?} at age {age}"
                );
            }
        }
    }

    #[test]
    fn toddler_sees_only_math_and_logic() {
        assert_eq!(
            available_modules(2),
            vec![ModuleType::Math, ModuleType::Logic]
        );
    }

    #[test]
    fn every_module_belongs_to_a_category() {
        for category in ModuleCategory::ALL {
            assert!(
                ModuleType::ALL.iter().any(|m| m.category() == category),
                "empty category {category:?}"
            );
        }
    }

    #[test]
    fn module_type_serializes_kebab_case() {
        let json = serde_json::to_string(&ModuleType::EmojiRiddles).unwrap();
        assert_eq!(json, "\"emoji-riddles\"");
        let back: ModuleType = serde_json::from_str("\"phonics\"").unwrap();
        assert_eq!(back, ModuleType::Phonics);
    }

    #[test]
    fn phonics_gets_its_own_theme_list() {
        assert!(themes_for(ModuleType::Phonics)
            .iter()
            .any(|t| t.id == "digraphs"));
        assert!(themes_for(ModuleType::Math).iter().any(|t| t.id == "space"));
    }
}
