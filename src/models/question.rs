use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;
use thiserror::Error;

use super::{Axis, TasteVector, WeightVector};

/// Time-of-day context a recommendation is made for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Morning,
    Day,
    Night,
}

impl Slot {
    /// All slots in result order
    pub const ALL: [Slot; 3] = [Slot::Morning, Slot::Day, Slot::Night];

    /// Upper-case label shown on result cards
    pub fn label(&self) -> &'static str {
        match self {
            Slot::Morning => "MORNING",
            Slot::Day => "DAY",
            Slot::Night => "NIGHT",
        }
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Slot::Morning => "morning",
            Slot::Day => "day",
            Slot::Night => "night",
        };
        write!(f, "{}", name)
    }
}

/// A selectable option of a quiz question.
///
/// Slot questions carry target options; the modifier question carries
/// weight options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerOption {
    Target { label: String, target: TasteVector },
    Weight { label: String, weights: WeightVector },
}

impl AnswerOption {
    pub fn label(&self) -> &str {
        match self {
            AnswerOption::Target { label, .. } | AnswerOption::Weight { label, .. } => label,
        }
    }
}

/// A quiz question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    /// Key answers are recorded under (e.g., "q1")
    pub key: String,
    /// Slot this question sets the target for; `None` for the weight modifier
    pub slot: Option<Slot>,
    #[serde(default)]
    pub skippable: bool,
    pub prompt: String,
    pub options: Vec<AnswerOption>,
}

/// Problems found while assembling a question set
#[derive(Debug, Error, PartialEq)]
pub enum QuestionSetError {
    #[error("Duplicate question key: {0}")]
    DuplicateKey(String),
    #[error("Question {0} has no options")]
    NoOptions(String),
    #[error("Slot {0} has no question")]
    MissingSlot(Slot),
    #[error("Slot {slot} is targeted by more than one question (second: {key})")]
    DuplicateSlot { slot: Slot, key: String },
    #[error("More than one weight modifier question (second: {0})")]
    DuplicateModifier(String),
    #[error("Question {key} option {index} has the wrong kind for its question")]
    OptionKindMismatch { key: String, index: usize },
    #[error("Question {key} option {index}: {axis} target {value} is outside 1-5")]
    TargetOutOfRange {
        key: String,
        index: usize,
        axis: Axis,
        value: u8,
    },
    #[error("Question {key} option {index}: {axis} weight {value} must be positive")]
    InvalidWeight {
        key: String,
        index: usize,
        axis: Axis,
        value: f64,
    },
}

/// Ordered, validated list of quiz questions
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(transparent)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Validates and wraps a list of questions
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionSetError> {
        let mut keys = HashSet::new();
        let mut slots = HashSet::new();
        let mut has_modifier = false;

        for question in &questions {
            if !keys.insert(question.key.as_str()) {
                return Err(QuestionSetError::DuplicateKey(question.key.clone()));
            }
            if question.options.is_empty() {
                return Err(QuestionSetError::NoOptions(question.key.clone()));
            }

            match question.slot {
                Some(slot) => {
                    if !slots.insert(slot) {
                        return Err(QuestionSetError::DuplicateSlot {
                            slot,
                            key: question.key.clone(),
                        });
                    }
                }
                None => {
                    if has_modifier {
                        return Err(QuestionSetError::DuplicateModifier(question.key.clone()));
                    }
                    has_modifier = true;
                }
            }

            for (index, option) in question.options.iter().enumerate() {
                validate_option(question, index, option)?;
            }
        }

        if let Some(slot) = Slot::ALL.iter().find(|s| !slots.contains(*s)) {
            return Err(QuestionSetError::MissingSlot(*slot));
        }

        Ok(Self { questions })
    }

    /// The built-in four-question diagnosis
    pub fn builtin() -> Result<Self, QuestionSetError> {
        Self::new(builtin_questions())
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, step: usize) -> Option<&Question> {
        self.questions.get(step)
    }

    pub fn by_key(&self, key: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.key == key)
    }

    /// Questions that set a slot target, in declaration order
    pub fn slot_questions(&self) -> impl Iterator<Item = (Slot, &Question)> {
        self.questions
            .iter()
            .filter_map(|q| q.slot.map(|slot| (slot, q)))
    }

    /// The weight modifier question, if the set has one
    pub fn weight_question(&self) -> Option<&Question> {
        self.questions.iter().find(|q| q.slot.is_none())
    }
}

fn validate_option(
    question: &Question,
    index: usize,
    option: &AnswerOption,
) -> Result<(), QuestionSetError> {
    match (question.slot, option) {
        (Some(_), AnswerOption::Target { target, .. }) => {
            if let Some((axis, value)) = target.out_of_range_axis() {
                return Err(QuestionSetError::TargetOutOfRange {
                    key: question.key.clone(),
                    index,
                    axis,
                    value,
                });
            }
            Ok(())
        }
        (None, AnswerOption::Weight { weights, .. }) => {
            if let Some((axis, value)) = weights.non_positive_axis() {
                return Err(QuestionSetError::InvalidWeight {
                    key: question.key.clone(),
                    index,
                    axis,
                    value,
                });
            }
            Ok(())
        }
        _ => Err(QuestionSetError::OptionKindMismatch {
            key: question.key.clone(),
            index,
        }),
    }
}

/// Selected option index per question key; `None` marks a skipped question.
///
/// A key that is absent and a key mapped to `None` mean the same thing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Answers(BTreeMap<String, Option<usize>>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a selection (or a skip) for a question
    pub fn set(&mut self, key: impl Into<String>, index: Option<usize>) {
        self.0.insert(key.into(), index);
    }

    /// Builder-style variant of [`Answers::set`]
    pub fn with(mut self, key: impl Into<String>, index: Option<usize>) -> Self {
        self.set(key, index);
        self
    }

    /// Selected index for a question, if one was chosen
    pub fn get(&self, key: &str) -> Option<usize> {
        self.0.get(key).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<usize>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

fn target(label: &str, target: TasteVector) -> AnswerOption {
    AnswerOption::Target {
        label: label.to_string(),
        target,
    }
}

fn weight(label: &str, weights: WeightVector) -> AnswerOption {
    AnswerOption::Weight {
        label: label.to_string(),
        weights,
    }
}

fn builtin_questions() -> Vec<Question> {
    vec![
        Question {
            key: "q1".to_string(),
            slot: Some(Slot::Morning),
            skippable: false,
            prompt: "朝のコーヒーは、どんな始まりにしたいですか？".to_string(),
            options: vec![
                target("ゆっくりと、一日を始めたい", TasteVector::new(4, 4, 2, 1, 3)),
                target("すっと気持ちを切り替えて動き出したい", TasteVector::new(3, 2, 5, 2, 2)),
                target("頭の中をクリアにして始めたい", TasteVector::new(3, 2, 4, 2, 1)),
                target("気分を整えながら始めたい", TasteVector::new(4, 3, 3, 1, 3)),
            ],
        },
        Question {
            key: "q2".to_string(),
            slot: Some(Slot::Day),
            skippable: false,
            prompt: "日中のコーヒーは、どんな時間に寄り添ってほしいですか？".to_string(),
            options: vec![
                target("集中して取り組む時間に", TasteVector::new(2, 1, 2, 5, 3)),
                target("今の状態を保ちながら進めたい時間に", TasteVector::new(2, 2, 2, 2, 2)),
                target("気持ちを切り替えたい時間に", TasteVector::new(3, 2, 4, 2, 1)),
                target("落ち着いて向き合いたい時間に", TasteVector::new(3, 3, 2, 3, 4)),
            ],
        },
        Question {
            key: "q3".to_string(),
            slot: Some(Slot::Night),
            skippable: false,
            prompt: "夜のコーヒーは、どんな時間にしたいですか？".to_string(),
            options: vec![
                target("一日をほどきながら、ゆっくり過ごしたい", TasteVector::new(5, 5, 1, 1, 4)),
                target("自分の時間を楽しみたい", TasteVector::new(5, 4, 2, 1, 3)),
                target("気持ちを落ち着けたい", TasteVector::new(4, 4, 1, 1, 5)),
                target("もう少しだけ、静かに続けたい", TasteVector::new(3, 2, 2, 3, 2)),
            ],
        },
        Question {
            key: "q4".to_string(),
            slot: None,
            skippable: true,
            prompt: "コーヒーを選ぶとき、どちらを大切にしますか？".to_string(),
            options: vec![
                weight("香りを楽しみたい", WeightVector::new(1.3, 1.0, 1.0, 1.0, 1.0)),
                weight("すっきりと飲みたい", WeightVector::new(1.0, 1.0, 1.0, 1.3, 1.3)),
                weight("しっかりとした味わいが好き", WeightVector::new(1.0, 1.0, 1.0, 1.3, 1.3)),
                weight("バランスの取れた味わいが好き", WeightVector::identity()),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot_question(key: &str, slot: Slot) -> Question {
        Question {
            key: key.to_string(),
            slot: Some(slot),
            skippable: false,
            prompt: String::new(),
            options: vec![target("a", TasteVector::new(3, 3, 3, 3, 3))],
        }
    }

    #[test]
    fn test_builtin_question_set_is_valid() {
        let set = QuestionSet::builtin().unwrap();
        assert_eq!(set.len(), 4);
        let slots: Vec<Slot> = set.slot_questions().map(|(s, _)| s).collect();
        assert_eq!(slots, vec![Slot::Morning, Slot::Day, Slot::Night]);
        let modifier = set.weight_question().unwrap();
        assert_eq!(modifier.key, "q4");
        assert!(modifier.skippable);
    }

    #[test]
    fn test_slot_names() {
        let labels: Vec<&str> = Slot::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["MORNING", "DAY", "NIGHT"]);
        assert_eq!(serde_json::to_string(&Slot::Day).unwrap(), r#""day""#);
        assert_eq!(Slot::Night.to_string(), "night");
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let questions = vec![
            slot_question("q1", Slot::Morning),
            slot_question("q1", Slot::Day),
        ];
        assert_eq!(
            QuestionSet::new(questions),
            Err(QuestionSetError::DuplicateKey("q1".to_string()))
        );
    }

    #[test]
    fn test_missing_slot_rejected() {
        let questions = vec![
            slot_question("q1", Slot::Morning),
            slot_question("q2", Slot::Day),
        ];
        assert_eq!(
            QuestionSet::new(questions),
            Err(QuestionSetError::MissingSlot(Slot::Night))
        );
    }

    #[test]
    fn test_option_kind_mismatch_rejected() {
        let mut questions = vec![
            slot_question("q1", Slot::Morning),
            slot_question("q2", Slot::Day),
            slot_question("q3", Slot::Night),
        ];
        questions[1]
            .options
            .push(weight("w", WeightVector::identity()));
        assert_eq!(
            QuestionSet::new(questions),
            Err(QuestionSetError::OptionKindMismatch {
                key: "q2".to_string(),
                index: 1
            })
        );
    }

    #[test]
    fn test_target_out_of_range_rejected() {
        let mut questions = vec![
            slot_question("q1", Slot::Morning),
            slot_question("q2", Slot::Day),
            slot_question("q3", Slot::Night),
        ];
        questions[2].options = vec![target("bad", TasteVector::new(3, 3, 3, 3, 6))];
        assert!(matches!(
            QuestionSet::new(questions),
            Err(QuestionSetError::TargetOutOfRange {
                axis: Axis::Body,
                value: 6,
                ..
            })
        ));
    }

    #[test]
    fn test_zero_weight_rejected() {
        let questions = vec![
            slot_question("q1", Slot::Morning),
            slot_question("q2", Slot::Day),
            slot_question("q3", Slot::Night),
            Question {
                key: "q4".to_string(),
                slot: None,
                skippable: true,
                prompt: String::new(),
                options: vec![weight("zero", WeightVector::new(1.0, 0.0, 1.0, 1.0, 1.0))],
            },
        ];
        assert!(matches!(
            QuestionSet::new(questions),
            Err(QuestionSetError::InvalidWeight {
                axis: Axis::Sweetness,
                ..
            })
        ));
    }

    #[test]
    fn test_answers_absent_and_null_are_equivalent() {
        let answers = Answers::new().with("q1", Some(2)).with("q4", None);
        assert_eq!(answers.get("q1"), Some(2));
        assert_eq!(answers.get("q4"), None);
        assert_eq!(answers.get("q9"), None);
    }

    #[test]
    fn test_answers_json_shape() {
        let answers: Answers = serde_json::from_str(r#"{"q1":0,"q2":3,"q4":null}"#).unwrap();
        assert_eq!(answers.get("q2"), Some(3));
        assert_eq!(answers.get("q4"), None);
        assert_eq!(
            serde_json::to_string(&answers).unwrap(),
            r#"{"q1":0,"q2":3,"q4":null}"#
        );
    }

    #[test]
    fn test_answer_option_tagged_serialization() {
        let option = weight("w", WeightVector::identity());
        let value = serde_json::to_value(&option).unwrap();
        assert_eq!(value["kind"], "weight");
        assert_eq!(value["weights"]["body"], 1.0);
    }
}
