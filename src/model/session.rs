use crate::model::content::ModuleContent;
use crate::model::module::{ModuleType, ThemeDef};
use crate::model::profile::Profile;

/// What the child has entered for one question card.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerSlot {
    /// Selected option index, if any. Unanswered counts as incorrect.
    Choice(Option<usize>),
    /// Typed spelling attempt.
    Typed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionPhase {
    Loading,
    Ready,
    Failed { message: String },
    Scored { summary: ScoreSummary, results: Vec<bool> },
}

/// One run through a module, from the moment the child picks it until they
/// leave the quiz screen. Lives entirely in memory.
#[derive(Debug)]
pub struct ModuleSession {
    pub id: u64,
    pub profile_name: String,
    pub age: u8,
    pub module: ModuleType,
    pub theme: Option<ThemeDef>,
    pub difficulty: u8,
    pub content: Option<ModuleContent>,
    pub answers: Vec<AnswerSlot>,
    pub phase: SessionPhase,
}

impl ModuleSession {
    pub fn new(
        id: u64,
        profile: &Profile,
        module: ModuleType,
        theme: Option<ThemeDef>,
        difficulty: u8,
    ) -> Self {
        Self {
            id,
            profile_name: profile.name.clone(),
            age: profile.age,
            module,
            theme,
            difficulty,
            content: None,
            answers: Vec::new(),
            phase: SessionPhase::Loading,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::Loading
    }

    /// Content arrived: build one empty answer slot per item and become
    /// interactive. Ignored outside of Loading (a stale reply).
    pub fn content_ready(&mut self, content: ModuleContent) {
        if self.phase != SessionPhase::Loading {
            return;
        }
        self.answers = match &content {
            ModuleContent::Spelling { words, .. } => {
                vec![AnswerSlot::Typed(String::new()); words.len()]
            }
            ModuleContent::Quiz { questions, .. } => {
                vec![AnswerSlot::Choice(None); questions.len()]
            }
            ModuleContent::Phonics { questions, .. } => {
                vec![AnswerSlot::Choice(None); questions.len()]
            }
        };
        self.content = Some(content);
        self.phase = SessionPhase::Ready;
    }

    pub fn content_failed(&mut self, message: String) {
        if self.phase != SessionPhase::Loading {
            return;
        }
        self.phase = SessionPhase::Failed { message };
    }

    pub fn select_option(&mut self, question: usize, option: usize) {
        if self.phase != SessionPhase::Ready {
            return;
        }
        if let Some(slot) = self.answers.get_mut(question) {
            *slot = AnswerSlot::Choice(Some(option));
        }
    }

    pub fn set_typed(&mut self, question: usize, text: String) {
        if self.phase != SessionPhase::Ready {
            return;
        }
        if let Some(slot) = self.answers.get_mut(question) {
            *slot = AnswerSlot::Typed(text);
        }
    }

    /// Grade every card and move to Scored. Returns the summary so the
    /// caller can record progress.
    pub fn submit(&mut self) -> Option<ScoreSummary> {
        if self.phase != SessionPhase::Ready {
            return None;
        }
        let content = self.content.as_ref()?;
        let results = grade(content, &self.answers);
        let summary = ScoreSummary {
            score: results.iter().filter(|c| **c).count(),
            total: results.len(),
        };
        self.phase = SessionPhase::Scored {
            summary,
            results,
        };
        Some(summary)
    }
}

/// Per-item correctness. Multiple choice compares the selected index with
/// the stored answer; spelling compares typed text case-insensitively.
pub fn grade(content: &ModuleContent, answers: &[AnswerSlot]) -> Vec<bool> {
    match content {
        ModuleContent::Quiz { questions, .. } => questions
            .iter()
            .enumerate()
            .map(|(i, q)| matches!(answers.get(i), Some(AnswerSlot::Choice(Some(s))) if *s == q.answer))
            .collect(),
        ModuleContent::Phonics { questions, .. } => questions
            .iter()
            .enumerate()
            .map(|(i, q)| matches!(answers.get(i), Some(AnswerSlot::Choice(Some(s))) if *s == q.answer))
            .collect(),
        ModuleContent::Spelling { words, .. } => words
            .iter()
            .enumerate()
            .map(|(i, word)| match answers.get(i) {
                Some(AnswerSlot::Typed(text)) => {
                    text.trim().eq_ignore_ascii_case(word.trim())
                }
                _ => false,
            })
            .collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSummary {
    pub score: usize,
    pub total: usize,
}

impl ScoreSummary {
    pub fn percent(self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.score as f64 / self.total as f64 * 100.0
        }
    }

    pub fn display(self) -> String {
        format!("{} / {}", self.score, self.total)
    }

    pub fn is_perfect(self) -> bool {
        self.total > 0 && self.score == self.total
    }

    pub fn encouragement(self) -> &'static str {
        let percent = self.percent();
        if self.is_perfect() {
            "Perfect score! You're a superstar! 🌟"
        } else if percent >= 80.0 {
            "Amazing work! So close to perfect! 🎉"
        } else if percent >= 60.0 {
            "Great job! You're really getting it! 💪"
        } else {
            "Good try! Every practice makes you stronger! 🌱"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::content::Question;

    fn quiz(answers: &[usize]) -> ModuleContent {
        ModuleContent::Quiz {
            story: "## Test".into(),
            questions: answers
                .iter()
                .map(|&a| Question {
                    question: "?".into(),
                    options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    answer: a,
                })
                .collect(),
        }
    }

    fn profile() -> Profile {
        Profile::new("Maya", 8)
    }

    #[test]
    fn scores_count_only_correct_selections() {
        let mut session =
            ModuleSession::new(1, &profile(), ModuleType::Math, None, 1);
        session.content_ready(quiz(&[1, 2, 0]));
        session.select_option(0, 1); // correct
        session.select_option(1, 3); // wrong
        session.select_option(2, 0); // correct
        let summary = session.submit().unwrap();
        assert_eq!(summary.score, 2);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.display(), "2 / 3");
    }

    #[test]
    fn unanswered_questions_count_as_incorrect() {
        let mut session =
            ModuleSession::new(1, &profile(), ModuleType::Math, None, 1);
        session.content_ready(quiz(&[0, 0]));
        session.select_option(0, 0);
        let summary = session.submit().unwrap();
        assert_eq!(summary.score, 1);
        assert_eq!(summary.total, 2);
    }

    #[test]
    fn spelling_comparison_ignores_case_and_whitespace() {
        let content = ModuleContent::Spelling {
            story: "## Spell".into(),
            words: vec!["Friend".into(), "because".into()],
        };
        let answers = vec![
            AnswerSlot::Typed(" friend ".into()),
            AnswerSlot::Typed("becuase".into()),
        ];
        assert_eq!(grade(&content, &answers), vec![true, false]);
    }

    #[test]
    fn submit_is_single_shot() {
        let mut session =
            ModuleSession::new(1, &profile(), ModuleType::Math, None, 1);
        session.content_ready(quiz(&[0]));
        assert!(session.submit().is_some());
        assert!(session.submit().is_none());
        // Answers are frozen once scored.
        session.select_option(0, 0);
        assert!(matches!(session.phase, SessionPhase::Scored { .. }));
    }

    #[test]
    fn stale_replies_are_ignored_after_failure() {
        let mut session =
            ModuleSession::new(1, &profile(), ModuleType::Math, None, 1);
        session.content_failed("oops".into());
        session.content_ready(quiz(&[0]));
        assert!(matches!(session.phase, SessionPhase::Failed { .. }));
    }

    #[test]
    fn encouragement_bands() {
        let s = |score, total| ScoreSummary { score, total };
        assert!(s(5, 5).encouragement().contains("Perfect"));
        assert!(s(4, 5).encouragement().contains("Amazing"));
        assert!(s(3, 5).encouragement().contains("Great"));
        assert!(s(1, 5).encouragement().contains("Good try"));
        assert!(s(5, 5).is_perfect());
        assert!(!s(4, 5).is_perfect());
    }
}
