mod axis;
mod bean;
mod question;

pub use axis::{Axis, TasteVector, WeightVector, AXIS_MAX, AXIS_MIN};
pub use bean::{Bean, Process, RoastLevel};
pub use question::{AnswerOption, Answers, Question, QuestionSet, QuestionSetError, Slot};
