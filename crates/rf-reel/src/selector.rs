//! Weighted winner selection
//!
//! Walks the roster accumulating weight and returns the first item whose
//! cumulative weight exceeds the draw. A draw that lands exactly on a
//! boundary belongs to the next item. When rounding (or an under-normalized
//! roster) leaves the draw uncovered, the last item wins.

use rand::Rng;

use crate::roster::RosterItem;

/// Resolve a draw in `[0, 1)` to a roster index.
///
/// Returns `None` only for an empty roster.
pub fn select_index_with_draw(items: &[RosterItem], draw: f64) -> Option<usize> {
    let last = items.len().checked_sub(1)?;

    let mut cumulative = 0.0;
    for (index, item) in items.iter().enumerate() {
        cumulative += item.probability;
        if draw < cumulative {
            return Some(index);
        }
    }

    Some(last)
}

/// Draw once from `rng` and resolve it to a roster index
pub fn select_index<R: Rng + ?Sized>(items: &[RosterItem], rng: &mut R) -> Option<usize> {
    if items.is_empty() {
        return None;
    }
    let draw: f64 = rng.random();
    select_index_with_draw(items, draw)
}

/// Draw once from `rng` and return the winning item
pub fn select<'a, R: Rng + ?Sized>(items: &'a [RosterItem], rng: &mut R) -> Option<&'a RosterItem> {
    select_index(items, rng).map(|index| &items[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn roster(weights: &[f64]) -> Vec<RosterItem> {
        weights
            .iter()
            .enumerate()
            .map(|(i, &w)| RosterItem::new(format!("p{i}"), format!("Player {i}"), "", w))
            .collect()
    }

    #[test]
    fn test_empty_roster() {
        assert_eq!(select_index_with_draw(&[], 0.3), None);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(select(&[], &mut rng).is_none());
    }

    #[test]
    fn test_single_item_always_wins() {
        let items = roster(&[1.0]);
        for draw in [0.0, 0.25, 0.5, 0.999_999] {
            assert_eq!(select_index_with_draw(&items, draw), Some(0));
        }
        // Even a broken weight can't starve the only item
        let items = roster(&[0.0]);
        assert_eq!(select_index_with_draw(&items, 0.7), Some(0));
    }

    #[test]
    fn test_boundary_belongs_to_next_item() {
        // Dyadic weights keep every cumulative sum exact
        let partitions: [&[f64]; 4] = [
            &[0.5, 0.5],
            &[0.25, 0.25, 0.5],
            &[0.125, 0.375, 0.25, 0.25],
            &[0.0625, 0.0625, 0.125, 0.25, 0.5],
        ];

        for weights in partitions {
            let items = roster(weights);
            let mut boundary = 0.0;
            for k in 0..weights.len() - 1 {
                boundary += weights[k];
                assert_eq!(
                    select_index_with_draw(&items, boundary),
                    Some(k + 1),
                    "draw {} on boundary of {:?}",
                    boundary,
                    weights
                );
                assert_eq!(select_index_with_draw(&items, boundary - 1e-9), Some(k));
            }
        }
    }

    #[test]
    fn test_zero_weight_items_are_skipped() {
        let items = roster(&[0.5, 0.0, 0.5]);
        assert_eq!(select_index_with_draw(&items, 0.5), Some(2));
        assert_eq!(select_index_with_draw(&items, 0.49), Some(0));
    }

    #[test]
    fn test_under_normalized_falls_back_to_last() {
        let items = roster(&[0.3, 0.3, 0.3]);
        assert_eq!(select_index_with_draw(&items, 0.95), Some(2));

        // Seven sevenths rarely sum to exactly 1.0
        let items = roster(&[1.0 / 7.0; 7]);
        assert_eq!(select_index_with_draw(&items, 1.0 - f64::EPSILON / 2.0), Some(6));
    }

    #[test]
    fn test_distribution_converges() {
        let weights = [0.5, 0.3, 0.15, 0.05];
        let items = roster(&weights);
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let samples = 200_000;

        let mut counts = [0usize; 4];
        for _ in 0..samples {
            let index = select_index(&items, &mut rng).unwrap();
            counts[index] += 1;
        }

        for (i, &weight) in weights.iter().enumerate() {
            let observed = counts[i] as f64 / samples as f64;
            assert!(
                (observed - weight).abs() < 0.01,
                "item {} observed {} expected {}",
                i,
                observed,
                weight
            );
        }
    }

    #[test]
    fn test_equal_weights_converge() {
        let items = roster(&[1.0 / 7.0; 7]);
        let mut rng = StdRng::seed_from_u64(42);
        let samples = 140_000;

        let mut counts = [0usize; 7];
        for _ in 0..samples {
            let winner = select(&items, &mut rng).unwrap();
            let index = items.iter().position(|i| i.id == winner.id).unwrap();
            counts[index] += 1;
        }

        for count in counts {
            let observed = count as f64 / samples as f64;
            assert!((observed - 1.0 / 7.0).abs() < 0.01);
        }
    }
}
