use serde::{Deserialize, Serialize};

use crate::models::{Axis, Bean, Slot, TasteVector};

/// Three lines of descriptive text shown on a result card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardCopy {
    pub line1: String,
    pub line2: String,
    pub line3: String,
}

struct SlotTemplate {
    context: &'static str,
    suggestion: &'static str,
}

fn slot_template(slot: Slot) -> SlotTemplate {
    match slot {
        Slot::Morning => SlotTemplate {
            context: "朝の時間",
            suggestion: "最初の一杯は、香りをひと呼吸してから。",
        },
        Slot::Day => SlotTemplate {
            context: "日中のひととき",
            suggestion: "気分に合わせて、温度を変えても楽しめます。",
        },
        Slot::Night => SlotTemplate {
            context: "夜のくつろぎ",
            suggestion: "お気に入りの器で、ゆっくりとお楽しみください。",
        },
    }
}

/// Axes ordered by target value, highest first; equal values keep canonical axis order
pub fn rank_axes(target: &TasteVector) -> [Axis; 5] {
    let mut axes = Axis::ALL;
    axes.sort_by(|a, b| target.get(*b).cmp(&target.get(*a)));
    axes
}

/// Generates the result copy for a slot.
///
/// Text depends only on the slot and the target's two strongest axes; the
/// matched bean is accepted so callers can pass the full result triple.
pub fn generate_copy(slot: Slot, target: &TasteVector, _bean: &Bean) -> CardCopy {
    let template = slot_template(slot);
    let ranked = rank_axes(target);

    CardCopy {
        line1: format!("{}に向いた味わいです。", template.context),
        line2: format!(
            "{}と{}が特徴的なタイプ。",
            ranked[0].label(),
            ranked[1].label()
        ),
        line3: template.suggestion.to_string(),
    }
}
