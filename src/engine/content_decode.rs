use serde::Deserialize;

use crate::engine::error::ContentError;
use crate::model::content::{
    ModuleContent, PhonicsQuestion, Question, OPTIONS_PER_QUESTION,
};
use crate::model::module::ModuleType;

/// Raw payload as the generator returns it, before shape checks. The model
/// is instructed to emit plain JSON but routinely wraps it in code fences.
#[derive(Debug, Deserialize)]
struct RawPayload {
    #[serde(default)]
    story: String,
    questions: Option<Vec<RawQuestion>>,
    words: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    question: String,
    #[serde(default)]
    options: Vec<String>,
    answer: i64,
    speak: Option<String>,
}

/// Decode and validate generated text into the content shape the given
/// module expects.
pub fn decode_module_content(
    raw: &str,
    module: ModuleType,
) -> Result<ModuleContent, ContentError> {
    let cleaned = strip_code_fences(raw);
    let payload: RawPayload = serde_json::from_str(&cleaned)
        .map_err(|e| ContentError::Parse(e.to_string()))?;

    match module {
        ModuleType::Spelling => {
            let words = payload
                .words
                .ok_or_else(|| ContentError::Validation("missing \"words\"".into()))?;
            if words.is_empty() {
                return Err(ContentError::Validation("\"words\" is empty".into()));
            }
            Ok(ModuleContent::Spelling {
                story: payload.story,
                words,
            })
        }
        ModuleType::Phonics => {
            let raw_questions = payload
                .questions
                .ok_or_else(|| ContentError::Validation("missing \"questions\"".into()))?;
            let mut questions = Vec::with_capacity(raw_questions.len());
            for (i, q) in raw_questions.into_iter().enumerate() {
                let speak = q.speak.clone().ok_or_else(|| {
                    ContentError::Validation(format!("question {} is missing \"speak\"", i + 1))
                })?;
                let base = check_question(q, i)?;
                questions.push(PhonicsQuestion {
                    question: base.question,
                    options: base.options,
                    answer: base.answer,
                    speak,
                });
            }
            if questions.is_empty() {
                return Err(ContentError::Validation("\"questions\" is empty".into()));
            }
            Ok(ModuleContent::Phonics {
                story: payload.story,
                questions,
            })
        }
        _ => {
            let raw_questions = payload
                .questions
                .ok_or_else(|| ContentError::Validation("missing \"questions\"".into()))?;
            let mut questions = Vec::with_capacity(raw_questions.len());
            for (i, q) in raw_questions.into_iter().enumerate() {
                questions.push(check_question(q, i)?);
            }
            if questions.is_empty() {
                return Err(ContentError::Validation("\"questions\" is empty".into()));
            }
            Ok(ModuleContent::Quiz {
                story: payload.story,
                questions,
            })
        }
    }
}

fn check_question(q: RawQuestion, index: usize) -> Result<Question, ContentError> {
    if q.options.len() != OPTIONS_PER_QUESTION {
        return Err(ContentError::Validation(format!(
            "question {} has {} options, expected {}",
            index + 1,
            q.options.len(),
            OPTIONS_PER_QUESTION
        )));
    }
    if q.answer < 0 || q.answer as usize >= OPTIONS_PER_QUESTION {
        return Err(ContentError::Validation(format!(
            "question {} answer {} is out of range",
            index + 1,
            q.answer
        )));
    }
    Ok(Question {
        question: q.question,
        options: q.options,
        answer: q.answer as usize,
    })
}

fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATH_PAYLOAD: &str = r###"{"story":"## Brainy Math! 🧠","questions":[{"question":"4 x 5 = ?","options":["18","20","9","24"],"answer":1}]}"###;

    #[test]
    fn decodes_a_quiz_payload() {
        let content = decode_module_content(MATH_PAYLOAD, ModuleType::Math).unwrap();
        let ModuleContent::Quiz { story, questions } = content else {
            panic!("expected quiz content");
        };
        assert_eq!(story, "## Brainy Math! 🧠");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].options.len(), 4);
        assert_eq!(questions[0].answer, 1);
    }

    #[test]
    fn strips_markdown_code_fences() {
        let fenced = format!("```json\n{MATH_PAYLOAD}\n```");
        assert!(decode_module_content(&fenced, ModuleType::Math).is_ok());
    }

    #[test]
    fn decodes_a_spelling_payload() {
        let raw = r###"{"story":"## Spelling Bee! 🐝","words":["friend","because","beautiful","enough","thought"]}"###;
        let content = decode_module_content(raw, ModuleType::Spelling).unwrap();
        let ModuleContent::Spelling { words, .. } = content else {
            panic!("expected spelling content");
        };
        assert_eq!(words.len(), 5);
    }

    #[test]
    fn decodes_a_phonics_payload() {
        let raw = r###"{"story":"## ABC Sound Party! 🎉","questions":[{"question":"The letter 'B' makes a sound like a...","options":["Ball ⚽","Cat 🐈","Dog 🐕","Fish 🐠"],"answer":0,"speak":"buh"}]}"###;
        let content = decode_module_content(raw, ModuleType::Phonics).unwrap();
        let ModuleContent::Phonics { questions, .. } = content else {
            panic!("expected phonics content");
        };
        assert_eq!(questions[0].speak, "buh");
        assert_eq!(questions[0].answer, 0);
    }

    #[test]
    fn rejects_invalid_json() {
        let err = decode_module_content("not json at all", ModuleType::Math).unwrap_err();
        assert!(matches!(err, ContentError::Parse(_)));
    }

    #[test]
    fn rejects_wrong_option_count() {
        let raw = r#"{"story":"x","questions":[{"question":"?","options":["a","b","c"],"answer":0}]}"#;
        let err = decode_module_content(raw, ModuleType::Logic).unwrap_err();
        assert!(matches!(err, ContentError::Validation(_)));
    }

    #[test]
    fn rejects_answer_out_of_range() {
        let raw = r#"{"story":"x","questions":[{"question":"?","options":["a","b","c","d"],"answer":4}]}"#;
        let err = decode_module_content(raw, ModuleType::Logic).unwrap_err();
        assert!(matches!(err, ContentError::Validation(_)));

        let raw = r#"{"story":"x","questions":[{"question":"?","options":["a","b","c","d"],"answer":-1}]}"#;
        assert!(decode_module_content(raw, ModuleType::Logic).is_err());
    }

    #[test]
    fn rejects_spelling_without_words() {
        let err = decode_module_content(r#"{"story":"x"}"#, ModuleType::Spelling).unwrap_err();
        assert!(matches!(err, ContentError::Validation(_)));
    }

    #[test]
    fn rejects_phonics_without_speak() {
        let raw = r#"{"story":"x","questions":[{"question":"?","options":["a","b","c","d"],"answer":0}]}"#;
        let err = decode_module_content(raw, ModuleType::Phonics).unwrap_err();
        assert!(matches!(err, ContentError::Validation(_)));
    }

    #[test]
    fn error_text_in_generated_content_is_just_text() {
        let raw = r###"{"story":"## Error Detectives! 🔍","questions":[{"question":"An error in a program is called a...","options":["bug","bird","boat","ball"],"answer":0}]}"###;
        assert!(decode_module_content(raw, ModuleType::Coding).is_ok());
    }
}
