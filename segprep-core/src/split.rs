// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

use rand::Rng;
use rand::seq::SliceRandom;

/// Shuffle items uniformly and cut them into (train, val) partitions
///
/// The cut index is `floor(total * percentage / 100)`, so for N items and
/// percentage P the training partition holds exactly floor(N * P / 100)
/// items and validation holds the remainder. The partitions are disjoint
/// and together cover the input.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use segprep_core::split::split_at_percentage;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let (train, val) = split_at_percentage((0..10).collect(), 80, &mut rng);
///
/// assert_eq!(train.len(), 8);
/// assert_eq!(val.len(), 2);
/// ```
pub fn split_at_percentage<T, R: Rng>(
    mut items: Vec<T>,
    percentage: u8,
    rng: &mut R,
) -> (Vec<T>, Vec<T>) {
    items.shuffle(rng);

    let cut = items.len() * percentage.min(100) as usize / 100;
    let val = items.split_off(cut);

    (items, val)
}

#[cfg(test)]
mod test {

    use std::collections::BTreeSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_split_sizes() {
        for (total, percentage, expected) in [(100, 80, 80), (7, 50, 3), (3, 33, 0), (10, 0, 0)] {
            let mut rng = StdRng::seed_from_u64(0);
            let (train, val) = split_at_percentage((0..total).collect(), percentage, &mut rng);

            assert_eq!(train.len(), expected);
            assert_eq!(val.len(), total - expected);
        }
    }

    #[test]
    fn test_split_partition() {
        let mut rng = StdRng::seed_from_u64(7);
        let items: Vec<usize> = (0..57).collect();

        let (train, val) = split_at_percentage(items.clone(), 70, &mut rng);

        let train_set: BTreeSet<usize> = train.iter().copied().collect();
        let val_set: BTreeSet<usize> = val.iter().copied().collect();

        assert!(train_set.is_disjoint(&val_set));

        let union: BTreeSet<usize> = train_set.union(&val_set).copied().collect();
        assert_eq!(union, items.into_iter().collect());
    }

    #[test]
    fn test_split_seed_reproducible() {
        let items: Vec<usize> = (0..20).collect();

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);

        let split_a = split_at_percentage(items.clone(), 60, &mut rng_a);
        let split_b = split_at_percentage(items, 60, &mut rng_b);

        assert_eq!(split_a, split_b);
    }

    #[test]
    fn test_split_everything_to_train() {
        let mut rng = StdRng::seed_from_u64(1);
        let (train, val) = split_at_percentage(vec![1, 2, 3], 100, &mut rng);

        assert_eq!(train.len(), 3);
        assert!(val.is_empty());
    }
}
