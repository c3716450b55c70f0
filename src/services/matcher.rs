use crate::models::{Axis, Bean, TasteVector, WeightVector};

/// Weighted L1 distance: sum over axes of `weight * |profile - target|`
pub fn compute_distance(profile: &TasteVector, target: &TasteVector, weights: &WeightVector) -> f64 {
    Axis::ALL
        .iter()
        .map(|axis| {
            let diff = profile.get(*axis).abs_diff(target.get(*axis));
            weights.get(*axis) * f64::from(diff)
        })
        .sum()
}

/// Picks the candidate closest to `target`.
///
/// On equal distance the earlier candidate wins. Returns `None` for an empty candidate list.
pub fn pick_best_bean<'a>(
    candidates: &[&'a Bean],
    target: &TasteVector,
    weights: &WeightVector,
) -> Option<&'a Bean> {
    let mut best: Option<(&'a Bean, f64)> = None;

    for bean in candidates {
        let distance = compute_distance(&bean.profile, target, weights);
        // strict comparison keeps the first of equally distant beans
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((*bean, distance));
        }
    }

    best.map(|(bean, _)| bean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::Catalog;

    fn bean(sku_id: &str, profile: TasteVector) -> Bean {
        let mut bean = Catalog::builtin().unwrap().beans()[0].clone();
        bean.sku_id = sku_id.to_string();
        bean.profile = profile;
        bean
    }

    #[test]
    fn test_distance_is_weighted_l1() {
        let target = TasteVector::new(5, 5, 1, 1, 4);
        let a = TasteVector::new(5, 4, 1, 1, 4);
        let b = TasteVector::new(3, 5, 2, 2, 3);
        let weights = WeightVector::identity();

        assert_eq!(compute_distance(&a, &target, &weights), 1.0);
        assert_eq!(compute_distance(&b, &target, &weights), 5.0);

        let weights = WeightVector::new(2.0, 1.0, 1.0, 1.0, 0.5);
        assert_eq!(compute_distance(&b, &target, &weights), 4.0 + 0.0 + 1.0 + 1.0 + 0.5);
    }

    #[test]
    fn test_distance_uses_absolute_difference() {
        let low = TasteVector::new(1, 1, 1, 1, 1);
        let high = TasteVector::new(3, 3, 3, 3, 3);
        let weights = WeightVector::identity();
        assert_eq!(
            compute_distance(&low, &high, &weights),
            compute_distance(&high, &low, &weights)
        );
    }

    #[test]
    fn test_distance_zero_only_when_identical() {
        let target = TasteVector::new(2, 3, 4, 5, 1);
        let weights = WeightVector::new(1.3, 1.0, 1.0, 1.3, 1.3);
        assert_eq!(compute_distance(&target, &target, &weights), 0.0);
        assert!(compute_distance(&TasteVector::new(2, 3, 4, 5, 2), &target, &weights) > 0.0);
    }

    #[test]
    fn test_picks_minimum_distance() {
        let a = bean("A", TasteVector::new(5, 4, 1, 1, 4));
        let b = bean("B", TasteVector::new(3, 5, 2, 2, 3));
        let candidates = vec![&b, &a];

        let best = pick_best_bean(
            &candidates,
            &TasteVector::new(5, 5, 1, 1, 4),
            &WeightVector::identity(),
        )
        .unwrap();
        assert_eq!(best.sku_id, "A");
    }

    #[test]
    fn test_tie_goes_to_first_candidate() {
        let first = bean("FIRST", TasteVector::new(3, 3, 3, 3, 3));
        let second = bean("SECOND", TasteVector::new(3, 3, 3, 3, 3));
        let target = TasteVector::new(4, 4, 2, 1, 3);

        let best = pick_best_bean(&[&first, &second], &target, &WeightVector::identity()).unwrap();
        assert_eq!(best.sku_id, "FIRST");

        let best = pick_best_bean(&[&second, &first], &target, &WeightVector::identity()).unwrap();
        assert_eq!(best.sku_id, "SECOND");
    }

    #[test]
    fn test_weights_change_the_winner() {
        // A is off by 3 on aroma, B is off by 1 on acidity and 1 on body
        let a = bean("A", TasteVector::new(2, 3, 3, 3, 3));
        let b = bean("B", TasteVector::new(5, 3, 4, 3, 4));
        let target = TasteVector::new(5, 3, 3, 3, 3);

        let even = pick_best_bean(&[&a, &b], &target, &WeightVector::identity()).unwrap();
        assert_eq!(even.sku_id, "B");

        let body_heavy = WeightVector::new(1.0, 1.0, 1.0, 1.0, 3.0);
        let best = pick_best_bean(&[&a, &b], &target, &body_heavy).unwrap();
        assert_eq!(best.sku_id, "A");
    }

    #[test]
    fn test_empty_candidates_yield_none() {
        let best = pick_best_bean(&[], &TasteVector::new(3, 3, 3, 3, 3), &WeightVector::identity());
        assert!(best.is_none());
    }
}
