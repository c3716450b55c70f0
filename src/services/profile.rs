use std::collections::BTreeMap;

use crate::models::{AnswerOption, Answers, QuestionSet, Slot, TasteVector, WeightVector};

use super::DiagnosisError;

/// Target vector per answered slot
pub type TargetProfiles = BTreeMap<Slot, TasteVector>;

/// Checks every recorded answer against the question set.
///
/// Unknown keys and indices past the end of a question's options are rejected;
/// skipped (null) answers are always accepted.
pub fn validate_answers(questions: &QuestionSet, answers: &Answers) -> Result<(), DiagnosisError> {
    for (key, index) in answers.iter() {
        let question = questions
            .by_key(key)
            .ok_or_else(|| DiagnosisError::UnknownQuestion(key.to_string()))?;

        if let Some(index) = index {
            if index >= question.options.len() {
                return Err(DiagnosisError::AnswerOutOfRange {
                    key: key.to_string(),
                    index,
                    options: question.options.len(),
                });
            }
        }
    }
    Ok(())
}

/// Builds one target per slot whose question was answered.
///
/// Expects answers already checked by [`validate_answers`].
pub fn build_target_profiles(questions: &QuestionSet, answers: &Answers) -> TargetProfiles {
    questions
        .slot_questions()
        .filter_map(|(slot, question)| {
            let index = answers.get(&question.key)?;
            match question.options.get(index)? {
                AnswerOption::Target { target, .. } => Some((slot, *target)),
                AnswerOption::Weight { .. } => None,
            }
        })
        .collect()
}

/// Weight vector chosen on the modifier question, or identity when it was skipped
pub fn resolve_weights(questions: &QuestionSet, answers: &Answers) -> WeightVector {
    questions
        .weight_question()
        .and_then(|question| {
            let index = answers.get(&question.key)?;
            match question.options.get(index)? {
                AnswerOption::Weight { weights, .. } => Some(*weights),
                AnswerOption::Target { .. } => None,
            }
        })
        .unwrap_or_default()
}
