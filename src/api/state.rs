use std::sync::Arc;

use crate::error::AppResult;
use crate::models::QuestionSet;
use crate::services::{Catalog, Clock, DiagnosisSettings, SystemClock};

/// Shared, read-only application state.
///
/// Requests never mutate it; every diagnosis is computed from scratch.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub questions: Arc<QuestionSet>,
    pub settings: DiagnosisSettings,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Creates state from already-loaded configuration data
    pub fn new(
        catalog: Catalog,
        questions: QuestionSet,
        settings: DiagnosisSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            questions: Arc::new(questions),
            settings,
            clock,
        }
    }

    /// Bundled catalog and questions, default thresholds, wall-clock time
    pub fn builtin() -> AppResult<Self> {
        Ok(Self::new(
            Catalog::builtin()?,
            QuestionSet::builtin()?,
            DiagnosisSettings::default(),
            Arc::new(SystemClock),
        ))
    }

    /// Replaces the clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
