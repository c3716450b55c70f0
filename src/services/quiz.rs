use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Answers, Question, QuestionSet};

/// Errors raised when an event does not apply to the current session
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("Cannot apply {event} while {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },

    #[error("Session step {step} is out of range ({questions} questions)")]
    StepOutOfRange { step: usize, questions: usize },

    #[error("Option {index} is out of range for {key} ({options} options)")]
    OptionOutOfRange {
        key: String,
        index: usize,
        options: usize,
    },

    #[error("Question {0} cannot be skipped")]
    NotSkippable(String),
}

/// Where the user is in the quiz
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuizState {
    #[default]
    NotStarted,
    Answering {
        step: usize,
    },
    ShowingResult,
}

impl QuizState {
    fn name(&self) -> &'static str {
        match self {
            QuizState::NotStarted => "not_started",
            QuizState::Answering { .. } => "answering",
            QuizState::ShowingResult => "showing_result",
        }
    }
}

/// User input driving the quiz forward or back
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuizEvent {
    Start,
    Select { index: usize },
    Back,
    Skip,
    Retry,
}

impl QuizEvent {
    fn name(&self) -> &'static str {
        match self {
            QuizEvent::Start => "start",
            QuizEvent::Select { .. } => "select",
            QuizEvent::Back => "back",
            QuizEvent::Skip => "skip",
            QuizEvent::Retry => "retry",
        }
    }
}

/// Serializable progress through the quiz.
///
/// The client keeps this between requests; the server never stores it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizSession {
    pub state: QuizState,
    #[serde(default)]
    pub answers: Answers,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an event, returning the next session
    pub fn apply(mut self, event: QuizEvent, questions: &QuestionSet) -> Result<Self, QuizError> {
        if let QuizState::Answering { step } = self.state {
            if step >= questions.len() {
                return Err(QuizError::StepOutOfRange {
                    step,
                    questions: questions.len(),
                });
            }
        }

        match (self.state, event) {
            (_, QuizEvent::Retry) => {
                self.answers.clear();
                self.state = QuizState::NotStarted;
            }
            (QuizState::NotStarted, QuizEvent::Start) if !questions.is_empty() => {
                self.state = QuizState::Answering { step: 0 };
            }
            (QuizState::Answering { step }, QuizEvent::Select { index }) => {
                let question = &questions.questions()[step];
                if index >= question.options.len() {
                    return Err(QuizError::OptionOutOfRange {
                        key: question.key.clone(),
                        index,
                        options: question.options.len(),
                    });
                }
                self.answers.set(question.key.clone(), Some(index));
                self.state = advance(step, questions);
            }
            (QuizState::Answering { step }, QuizEvent::Skip) => {
                let question = &questions.questions()[step];
                if !question.skippable {
                    return Err(QuizError::NotSkippable(question.key.clone()));
                }
                self.answers.set(question.key.clone(), None);
                self.state = advance(step, questions);
            }
            (QuizState::Answering { step }, QuizEvent::Back) => {
                self.state = match step {
                    0 => QuizState::NotStarted,
                    _ => QuizState::Answering { step: step - 1 },
                };
            }
            (state, event) => {
                return Err(QuizError::InvalidTransition {
                    state: state.name(),
                    event: event.name(),
                });
            }
        }

        Ok(self)
    }

    /// The question currently on screen, if any
    pub fn current_question<'a>(&self, questions: &'a QuestionSet) -> Option<&'a Question> {
        match self.state {
            QuizState::Answering { step } => questions.get(step),
            _ => None,
        }
    }
}

fn advance(step: usize, questions: &QuestionSet) -> QuizState {
    if step + 1 < questions.len() {
        QuizState::Answering { step: step + 1 }
    } else {
        QuizState::ShowingResult
    }
}

/// Progress through the slot questions, e.g. "2 / 3"
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

/// What a client needs to render one question
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QuestionView {
    /// Display number, e.g. "Q1"
    pub number: String,
    pub key: String,
    pub prompt: String,
    pub options: Vec<OptionView>,
    pub selected: Option<usize>,
    pub skippable: bool,
    pub can_go_back: bool,
    /// Absent on the weight modifier question
    pub progress: Option<Progress>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OptionView {
    /// Letter shown beside the option ("A", "B", ...)
    pub letter: String,
    pub label: String,
}

impl QuestionView {
    /// Builds the view for the session's current question
    pub fn for_session(session: &QuizSession, questions: &QuestionSet) -> Option<Self> {
        let QuizState::Answering { step } = session.state else {
            return None;
        };
        let question = session.current_question(questions)?;
        let slot_total = questions.slot_questions().count();

        Some(Self {
            number: format!("Q{}", step + 1),
            key: question.key.clone(),
            prompt: question.prompt.clone(),
            options: question
                .options
                .iter()
                .zip('A'..='Z')
                .map(|(option, letter)| OptionView {
                    letter: letter.to_string(),
                    label: option.label().to_string(),
                })
                .collect(),
            selected: session.answers.get(&question.key),
            skippable: question.skippable,
            can_go_back: step > 0,
            progress: question.slot.map(|_| Progress {
                current: step + 1,
                total: slot_total,
            }),
        })
    }
}
