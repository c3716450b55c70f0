use chrono::{DateTime, Utc};

use crate::models::Bean;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Stock and freshness bounds a bean must satisfy to be recommended
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreshnessConstraints {
    /// Minimum stock on hand in grams (inclusive)
    pub min_stock_grams: u32,
    /// Maximum age since roasting in whole days (inclusive)
    pub max_age_days: i64,
    /// Instant ages are measured from
    pub reference: DateTime<Utc>,
}

/// Whole days between roasting and `reference`, floored. Negative for beans roasted after it.
pub fn age_in_days(bean: &Bean, reference: DateTime<Utc>) -> i64 {
    let elapsed = reference.timestamp_millis() - bean.roasted_at().timestamp_millis();
    elapsed.div_euclid(MILLIS_PER_DAY)
}

/// Beans with enough stock and an age in `0..=max_age_days`, in catalog order
pub fn filter_beans<'a>(beans: &'a [Bean], constraints: &FreshnessConstraints) -> Vec<&'a Bean> {
    beans
        .iter()
        .filter(|bean| bean.stock_grams >= constraints.min_stock_grams)
        .filter(|bean| {
            let age = age_in_days(bean, constraints.reference);
            (0..=constraints.max_age_days).contains(&age)
        })
        .collect()
}
