use serde::{Deserialize, Serialize};

pub const OPTIONS_PER_QUESTION: usize = 4;

/// A single multiple-choice question. `answer` is the 0-based index of the
/// correct option; the decoder guarantees it is in range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub answer: usize,
}

/// A phonics question carries the sound or word to vocalize on request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhonicsQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: usize,
    pub speak: String,
}

/// The structured result of one generation request. The shape depends on
/// the module that requested it.
#[derive(Debug, Clone)]
pub enum ModuleContent {
    Quiz {
        story: String,
        questions: Vec<Question>,
    },
    Spelling {
        story: String,
        words: Vec<String>,
    },
    Phonics {
        story: String,
        questions: Vec<PhonicsQuestion>,
    },
}

impl ModuleContent {
    pub fn story(&self) -> &str {
        match self {
            ModuleContent::Quiz { story, .. }
            | ModuleContent::Spelling { story, .. }
            | ModuleContent::Phonics { story, .. } => story,
        }
    }

    /// Number of scoreable items (questions or spelling words).
    pub fn item_count(&self) -> usize {
        match self {
            ModuleContent::Quiz { questions, .. } => questions.len(),
            ModuleContent::Spelling { words, .. } => words.len(),
            ModuleContent::Phonics { questions, .. } => questions.len(),
        }
    }
}
