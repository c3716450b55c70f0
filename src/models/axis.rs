use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Lowest value an axis may take on the taste scale
pub const AXIS_MIN: u8 = 1;
/// Highest value an axis may take on the taste scale
pub const AXIS_MAX: u8 = 5;

/// One of the five taste dimensions a bean is scored on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Aroma,
    Sweetness,
    Acidity,
    Bitterness,
    Body,
}

impl Axis {
    /// All axes in canonical order. Ties in copy ranking resolve in this order.
    pub const ALL: [Axis; 5] = [
        Axis::Aroma,
        Axis::Sweetness,
        Axis::Acidity,
        Axis::Bitterness,
        Axis::Body,
    ];

    /// Human-readable label used in generated copy
    pub fn label(&self) -> &'static str {
        match self {
            Axis::Aroma => "香り",
            Axis::Sweetness => "甘味",
            Axis::Acidity => "酸味",
            Axis::Bitterness => "苦み",
            Axis::Body => "コク",
        }
    }
}

impl Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Axis::Aroma => "aroma",
            Axis::Sweetness => "sweetness",
            Axis::Acidity => "acidity",
            Axis::Bitterness => "bitterness",
            Axis::Body => "body",
        };
        write!(f, "{}", name)
    }
}

/// A five-axis taste profile on the 1-5 scale.
///
/// Used both for the attributes of a catalog bean and for the target a
/// quiz answer asks for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TasteVector {
    pub aroma: u8,
    pub sweetness: u8,
    pub acidity: u8,
    pub bitterness: u8,
    pub body: u8,
}

impl TasteVector {
    pub const fn new(aroma: u8, sweetness: u8, acidity: u8, bitterness: u8, body: u8) -> Self {
        Self {
            aroma,
            sweetness,
            acidity,
            bitterness,
            body,
        }
    }

    /// Value on a single axis
    pub fn get(&self, axis: Axis) -> u8 {
        match axis {
            Axis::Aroma => self.aroma,
            Axis::Sweetness => self.sweetness,
            Axis::Acidity => self.acidity,
            Axis::Bitterness => self.bitterness,
            Axis::Body => self.body,
        }
    }

    /// Returns the first axis whose value falls outside the taste scale
    pub fn out_of_range_axis(&self) -> Option<(Axis, u8)> {
        Axis::ALL
            .iter()
            .map(|axis| (*axis, self.get(*axis)))
            .find(|(_, value)| !(AXIS_MIN..=AXIS_MAX).contains(value))
    }
}

/// Per-axis importance multipliers applied during distance computation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WeightVector {
    pub aroma: f64,
    pub sweetness: f64,
    pub acidity: f64,
    pub bitterness: f64,
    pub body: f64,
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::identity()
    }
}

impl WeightVector {
    pub const fn new(aroma: f64, sweetness: f64, acidity: f64, bitterness: f64, body: f64) -> Self {
        Self {
            aroma,
            sweetness,
            acidity,
            bitterness,
            body,
        }
    }

    /// Every axis weighted equally at 1.0
    pub const fn identity() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0, 1.0)
    }

    /// Weight applied to a single axis
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Aroma => self.aroma,
            Axis::Sweetness => self.sweetness,
            Axis::Acidity => self.acidity,
            Axis::Bitterness => self.bitterness,
            Axis::Body => self.body,
        }
    }

    /// Returns the first axis whose weight is not a finite positive number
    pub fn non_positive_axis(&self) -> Option<(Axis, f64)> {
        Axis::ALL
            .iter()
            .map(|axis| (*axis, self.get(*axis)))
            .find(|(_, weight)| !(weight.is_finite() && *weight > 0.0))
    }
}
