// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

use crate::error::SegprepError;
use crate::im::ClassMask;

/// Per-class pixel counts accumulated over one or more masks
///
/// Accumulation is commutative, so per-file histograms computed in parallel
/// can be merged in any order and always produce the same totals.
///
/// # Examples
///
/// ```
/// use segprep_core::im::ClassMask;
/// use segprep_core::tally::ClassHistogram;
///
/// let mask = ClassMask::new(2, 2, vec![0, 0, 1, 2]).unwrap();
/// let histogram = ClassHistogram::from_mask(&mask, 3).unwrap();
///
/// assert_eq!(histogram.count(0), 2);
/// assert_eq!(histogram.total(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHistogram {
    counts: Vec<u64>,
}

impl ClassHistogram {
    pub fn new(num_classes: usize) -> ClassHistogram {
        ClassHistogram {
            counts: vec![0; num_classes],
        }
    }

    /// Tally the pixels of a single mask over `num_classes` classes
    ///
    /// Fails with an out-of-domain error if any pixel holds a class index
    /// at or above `num_classes`.
    pub fn from_mask(mask: &ClassMask, num_classes: usize) -> Result<ClassHistogram, SegprepError> {
        let mut counts = vec![0u64; num_classes];

        for &pixel in mask.as_raw() {
            if pixel as usize >= num_classes {
                return Err(SegprepError::OutOfDomainError(pixel));
            }

            counts[pixel as usize] += 1;
        }

        Ok(ClassHistogram { counts })
    }

    /// Fold another histogram into this one
    pub fn merge(&mut self, other: &ClassHistogram) {
        if other.counts.len() > self.counts.len() {
            self.counts.resize(other.counts.len(), 0);
        }

        for (count, &other_count) in self.counts.iter_mut().zip(&other.counts) {
            *count += other_count;
        }
    }

    pub fn count(&self, index: usize) -> u64 {
        self.counts.get(index).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn num_classes(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Fraction of all pixels held by a class, in [0, 1]
    pub fn fraction(&self, index: usize) -> f64 {
        let total = self.total();

        if total == 0 {
            return 0.0;
        }

        self.count(index) as f64 / total as f64
    }

    /// Per-class percentages summing to 100 (within float tolerance)
    pub fn percentages(&self) -> Vec<f64> {
        let total = self.total();

        if total == 0 {
            return vec![0.0; self.counts.len()];
        }

        self.counts
            .iter()
            .map(|&count| count as f64 / total as f64 * 100.0)
            .collect()
    }
}
