pub mod catalog;
pub mod clock;
pub mod copy;
pub mod diagnosis;
pub mod filter;
pub mod matcher;
pub mod profile;
pub mod quiz;

pub use catalog::{Catalog, CatalogError};
pub use clock::{Clock, FixedClock, SystemClock};
pub use copy::{generate_copy, CardCopy};
pub use diagnosis::{
    DiagnosisEngine, DiagnosisError, DiagnosisResults, DiagnosisSettings, SlotResult,
};
pub use filter::{filter_beans, FreshnessConstraints};
pub use matcher::{compute_distance, pick_best_bean};
pub use profile::{build_target_profiles, resolve_weights, TargetProfiles};
pub use quiz::{QuestionView, QuizError, QuizEvent, QuizSession, QuizState};
