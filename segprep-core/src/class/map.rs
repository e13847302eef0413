// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::SegprepError;

/// Policy applied when a pixel value falls outside the mapping domain
///
/// `Strict` surfaces an error so the caller can warn and skip the file;
/// `Clamp` sends unmapped values to the background class (0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemapPolicy {
    Strict,
    Clamp,
}

/// A static original-class-index to reduced-class-index mapping
///
/// The mapping is realized as a full 256-entry lookup table over the u8
/// pixel domain. Entries absent from the source table are unmapped and
/// are resolved according to a [`RemapPolicy`] at remap time.
///
/// # Examples
///
/// ```
/// use segprep_core::class::ClassMap;
///
/// let map = ClassMap::from_pairs([(0, 0), (1, 1), (2, 1)]);
///
/// assert_eq!(map.get(2), Some(1));
/// assert_eq!(map.get(3), None);
/// ```
#[derive(Debug, Clone)]
pub struct ClassMap {
    table: [Option<u8>; 256],
}

impl ClassMap {
    /// Build a mapping from (original, reduced) index pairs
    pub fn from_pairs<I>(pairs: I) -> ClassMap
    where
        I: IntoIterator<Item = (u8, u8)>,
    {
        let mut table = [None; 256];

        for (original, reduced) in pairs {
            table[original as usize] = Some(reduced);
        }

        ClassMap { table }
    }

    /// Build an identity mapping over the first `num_classes` indices
    pub fn identity(num_classes: usize) -> ClassMap {
        ClassMap::from_pairs((0..num_classes.min(256)).map(|i| (i as u8, i as u8)))
    }

    /// Load a mapping from a JSON object of `{"original": reduced}` entries
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use segprep_core::class::ClassMap;
    /// let map = ClassMap::open("mapping.json").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<ClassMap, SegprepError> {
        let contents = std::fs::read_to_string(&path)
            .map_err(|_| SegprepError::NoFileError(path.as_ref().display().to_string()))?;

        let pairs: BTreeMap<u8, u8> = serde_json::from_str(&contents)
            .map_err(|err| SegprepError::ClassMapError(err.to_string()))?;

        if pairs.is_empty() {
            return Err(SegprepError::ClassMapError(
                "Mapping table contains no entries".to_string(),
            ));
        }

        Ok(ClassMap::from_pairs(pairs))
    }

    /// Reduced class index for an original pixel value, if mapped
    pub fn get(&self, value: u8) -> Option<u8> {
        self.table[value as usize]
    }

    /// Number of mapped entries in the original class domain
    pub fn domain_size(&self) -> usize {
        self.table.iter().filter(|entry| entry.is_some()).count()
    }

    /// Number of classes in the reduced set (maximum reduced index + 1)
    pub fn reduced_classes(&self) -> usize {
        self.table
            .iter()
            .flatten()
            .map(|&reduced| reduced as usize + 1)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_map_from_pairs() {
        let map = ClassMap::from_pairs([(0, 0), (4, 1), (7, 1), (9, 2)]);

        assert_eq!(map.get(0), Some(0));
        assert_eq!(map.get(4), Some(1));
        assert_eq!(map.get(7), Some(1));
        assert_eq!(map.get(9), Some(2));
        assert_eq!(map.get(1), None);

        assert_eq!(map.domain_size(), 4);
        assert_eq!(map.reduced_classes(), 3);
    }

    #[test]
    fn test_map_identity() {
        let map = ClassMap::identity(5);

        for i in 0..5u8 {
            assert_eq!(map.get(i), Some(i));
        }

        assert_eq!(map.get(5), None);
        assert_eq!(map.reduced_classes(), 5);
    }

    #[test]
    fn test_map_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.json");

        std::fs::write(&path, r#"{"0": 0, "1": 1, "2": 1, "3": 0}"#).unwrap();

        let map = ClassMap::open(&path).unwrap();

        assert_eq!(map.get(2), Some(1));
        assert_eq!(map.get(3), Some(0));
        assert_eq!(map.domain_size(), 4);
    }

    #[test]
    fn test_map_open_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.json");

        std::fs::write(&path, "{}").unwrap();

        assert!(ClassMap::open(&path).is_err());
    }
}
