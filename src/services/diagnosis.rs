use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Answers, Bean, QuestionSet, Slot, TasteVector};

use super::copy::{generate_copy, CardCopy};
use super::filter::{filter_beans, FreshnessConstraints};
use super::matcher::pick_best_bean;
use super::profile::{build_target_profiles, resolve_weights, validate_answers};

/// Contract violations in the answers handed to the engine
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiagnosisError {
    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Answer {index} for {key} is out of range ({options} options)")]
    AnswerOutOfRange {
        key: String,
        index: usize,
        options: usize,
    },

    #[error("No answer for the {0} question")]
    MissingTarget(Slot),
}

/// Stock and freshness thresholds used when narrowing the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosisSettings {
    pub min_stock_grams: u32,
    /// Age bound tried first
    pub primary_max_age_days: i64,
    /// Wider age bound used when nothing passes the primary one
    pub fallback_max_age_days: i64,
}

impl Default for DiagnosisSettings {
    fn default() -> Self {
        Self {
            min_stock_grams: 150,
            primary_max_age_days: 30,
            fallback_max_age_days: 60,
        }
    }
}

/// Recommendation for a single slot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlotResult {
    /// Card heading, e.g. "MORNING"
    pub label: String,
    /// Roaster and bean name for the card title
    pub display_name: String,
    pub bean: Bean,
    pub target: TasteVector,
    pub copy: CardCopy,
}

/// One recommendation per slot, keyed in slot order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct DiagnosisResults(BTreeMap<Slot, SlotResult>);

impl DiagnosisResults {
    pub fn get(&self, slot: Slot) -> Option<&SlotResult> {
        self.0.get(&slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, &SlotResult)> {
        self.0.iter().map(|(slot, result)| (*slot, result))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Turns quiz answers into per-slot bean recommendations
pub struct DiagnosisEngine<'a> {
    questions: &'a QuestionSet,
    settings: &'a DiagnosisSettings,
}

impl<'a> DiagnosisEngine<'a> {
    pub fn new(questions: &'a QuestionSet, settings: &'a DiagnosisSettings) -> Self {
        Self {
            questions,
            settings,
        }
    }

    /// Beans that pass stock and freshness checks.
    ///
    /// Tries the primary age bound, then the fallback bound. Empty only when
    /// both come up empty.
    pub fn candidates<'b>(&self, beans: &'b [Bean], now: DateTime<Utc>) -> Vec<&'b Bean> {
        let primary = FreshnessConstraints {
            min_stock_grams: self.settings.min_stock_grams,
            max_age_days: self.settings.primary_max_age_days,
            reference: now,
        };
        let candidates = filter_beans(beans, &primary);
        if !candidates.is_empty() {
            return candidates;
        }

        let fallback = FreshnessConstraints {
            max_age_days: self.settings.fallback_max_age_days,
            ..primary
        };
        let candidates = filter_beans(beans, &fallback);
        tracing::info!(
            primary_days = primary.max_age_days,
            fallback_days = fallback.max_age_days,
            candidates = candidates.len(),
            "No beans within primary freshness window, using fallback"
        );
        candidates
    }

    /// Computes one recommendation per slot.
    ///
    /// Returns `Ok(None)` when no bean passes even the fallback freshness
    /// window. Fails when an answer is malformed or a slot question is
    /// unanswered.
    pub fn compute_results(
        &self,
        answers: &Answers,
        beans: &[Bean],
        now: DateTime<Utc>,
    ) -> Result<Option<DiagnosisResults>, DiagnosisError> {
        validate_answers(self.questions, answers)?;

        let profiles = build_target_profiles(self.questions, answers);
        let weights = resolve_weights(self.questions, answers);

        let mut targets = Vec::with_capacity(Slot::ALL.len());
        for slot in Slot::ALL {
            let target = profiles
                .get(&slot)
                .copied()
                .ok_or(DiagnosisError::MissingTarget(slot))?;
            targets.push((slot, target));
        }

        let candidates = self.candidates(beans, now);
        if candidates.is_empty() {
            tracing::info!(catalog = beans.len(), "No beans currently fit");
            return Ok(None);
        }

        let mut results = BTreeMap::new();
        for (slot, target) in targets {
            let Some(bean) = pick_best_bean(&candidates, &target, &weights) else {
                return Ok(None);
            };
            tracing::debug!(slot = %slot, sku_id = %bean.sku_id, "Matched bean");

            let copy = generate_copy(slot, &target, bean);
            results.insert(
                slot,
                SlotResult {
                    label: slot.label().to_string(),
                    display_name: bean.display_name(),
                    bean: bean.clone(),
                    target,
                    copy,
                },
            );
        }

        Ok(Some(DiagnosisResults(results)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::Catalog;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn first_options() -> Answers {
        Answers::new()
            .with("q1", Some(0))
            .with("q2", Some(0))
            .with("q3", Some(0))
    }

    fn skus(results: &DiagnosisResults) -> Vec<(Slot, String)> {
        results
            .iter()
            .map(|(slot, r)| (slot, r.bean.sku_id.clone()))
            .collect()
    }

    #[test]
    fn test_full_diagnosis() {
        let questions = QuestionSet::builtin().unwrap();
        let settings = DiagnosisSettings::default();
        let catalog = Catalog::builtin().unwrap();
        let engine = DiagnosisEngine::new(&questions, &settings);

        let results = engine
            .compute_results(&first_options(), catalog.beans(), at(2026, 2, 15))
            .unwrap()
            .unwrap();

        assert_eq!(
            skus(&results),
            vec![
                (Slot::Morning, "SKU-005".to_string()),
                // SKU-004 and SKU-007 tie; catalog order decides
                (Slot::Day, "SKU-004".to_string()),
                (Slot::Night, "SKU-012".to_string()),
            ]
        );

        let morning = results.get(Slot::Morning).unwrap();
        assert_eq!(morning.target, TasteVector::new(4, 4, 2, 1, 3));
        assert_eq!(morning.copy.line2, "香りと甘味が特徴的なタイプ。");
        assert_eq!(morning.label, "MORNING");
        assert_eq!(morning.display_name, "ONIBUS COFFEE コロンビア ウイラ");

        let night = results.get(Slot::Night).unwrap();
        assert_eq!(night.label, "NIGHT");
        assert_eq!(night.display_name, "KOFFEE MAMEYA エチオピア シダモ ナチュラル");
    }

    #[test]
    fn test_fallback_window_used_when_primary_is_empty() {
        let questions = QuestionSet::builtin().unwrap();
        let settings = DiagnosisSettings::default();
        let catalog = Catalog::builtin().unwrap();
        let engine = DiagnosisEngine::new(&questions, &settings);

        // every bean is 34+ days old here
        let now = at(2026, 3, 20);
        assert_eq!(engine.candidates(catalog.beans(), now).len(), 11);

        let results = engine
            .compute_results(&first_options(), catalog.beans(), now)
            .unwrap()
            .unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results.get(Slot::Night).unwrap().bean.sku_id, "SKU-012");
    }

    #[test]
    fn test_no_result_when_everything_is_stale() {
        let questions = QuestionSet::builtin().unwrap();
        let settings = DiagnosisSettings::default();
        let catalog = Catalog::builtin().unwrap();
        let engine = DiagnosisEngine::new(&questions, &settings);

        let results = engine
            .compute_results(&first_options(), catalog.beans(), at(2026, 6, 1))
            .unwrap();
        assert!(results.is_none());
    }

    #[test]
    fn test_missing_target_fails_fast() {
        let questions = QuestionSet::builtin().unwrap();
        let settings = DiagnosisSettings::default();
        let catalog = Catalog::builtin().unwrap();
        let engine = DiagnosisEngine::new(&questions, &settings);

        let answers = Answers::new().with("q1", Some(0)).with("q3", Some(1));
        let err = engine
            .compute_results(&answers, catalog.beans(), at(2026, 2, 15))
            .unwrap_err();
        assert_eq!(err, DiagnosisError::MissingTarget(Slot::Day));
    }

    #[test]
    fn test_malformed_index_fails_fast() {
        let questions = QuestionSet::builtin().unwrap();
        let settings = DiagnosisSettings::default();
        let catalog = Catalog::builtin().unwrap();
        let engine = DiagnosisEngine::new(&questions, &settings);

        let answers = first_options().with("q4", Some(7));
        let err = engine
            .compute_results(&answers, catalog.beans(), at(2026, 2, 15))
            .unwrap_err();
        assert!(matches!(err, DiagnosisError::AnswerOutOfRange { index: 7, .. }));
    }

    #[test]
    fn test_results_are_deterministic() {
        let questions = QuestionSet::builtin().unwrap();
        let settings = DiagnosisSettings::default();
        let catalog = Catalog::builtin().unwrap();
        let engine = DiagnosisEngine::new(&questions, &settings);
        let answers = Answers::new()
            .with("q1", Some(3))
            .with("q2", Some(2))
            .with("q3", Some(1))
            .with("q4", Some(0));

        let first = engine.compute_results(&answers, catalog.beans(), at(2026, 2, 15));
        let second = engine.compute_results(&answers, catalog.beans(), at(2026, 2, 15));
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first.unwrap()).unwrap(),
            serde_json::to_string(&second.unwrap()).unwrap()
        );
    }

    #[test]
    fn test_duplicate_attribute_pair_resolves_to_first() {
        let questions = QuestionSet::builtin().unwrap();
        let settings = DiagnosisSettings::default();
        let engine = DiagnosisEngine::new(&questions, &settings);

        let base = Catalog::builtin().unwrap().get("SKU-005").unwrap().clone();
        let mut twin = base.clone();
        twin.sku_id = "SKU-TWIN".to_string();
        let beans = vec![twin, base];

        let results = engine
            .compute_results(&first_options(), &beans, at(2026, 2, 15))
            .unwrap()
            .unwrap();
        assert!(results.iter().all(|(_, r)| r.bean.sku_id == "SKU-TWIN"));
    }

    #[test]
    fn test_custom_settings_respected() {
        let questions = QuestionSet::builtin().unwrap();
        let settings = DiagnosisSettings {
            min_stock_grams: 500,
            primary_max_age_days: 30,
            fallback_max_age_days: 60,
        };
        let catalog = Catalog::builtin().unwrap();
        let engine = DiagnosisEngine::new(&questions, &settings);

        let candidates = engine.candidates(catalog.beans(), at(2026, 2, 15));
        let ids: Vec<&str> = candidates.iter().map(|b| b.sku_id.as_str()).collect();
        assert_eq!(ids, vec!["SKU-001", "SKU-007"]);
    }

    #[test]
    fn test_modifier_answer_changes_the_winner() {
        let questions = QuestionSet::builtin().unwrap();
        let settings = DiagnosisSettings::default();
        let engine = DiagnosisEngine::new(&questions, &settings);

        // morning target is 4,4,2,1,3: A misses aroma by 2, B misses bitterness and body by 1
        let base = Catalog::builtin().unwrap().get("SKU-005").unwrap().clone();
        let mut a = base.clone();
        a.sku_id = "A".to_string();
        a.profile = TasteVector::new(2, 4, 2, 1, 3);
        let mut b = base;
        b.sku_id = "B".to_string();
        b.profile = TasteVector::new(4, 4, 2, 2, 4);
        let beans = vec![a, b];

        let morning = |answers: Answers| {
            engine
                .compute_results(&answers, &beans, at(2026, 2, 15))
                .unwrap()
                .unwrap()
                .get(Slot::Morning)
                .unwrap()
                .bean
                .sku_id
                .clone()
        };

        assert_eq!(morning(first_options()), "A");
        assert_eq!(morning(first_options().with("q4", None)), "A");
        assert_eq!(morning(first_options().with("q4", Some(0))), "B");
        assert_eq!(morning(first_options().with("q4", Some(1))), "A");
    }
}
