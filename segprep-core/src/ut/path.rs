// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::SegprepError;

/// Ensure a directory (and its parents) exists, reusing it if present
///
/// The split output layout has fixed names (`train/source`, ...) consumed
/// downstream, so an existing directory is reused rather than renamed.
pub fn ensure_directory<P: AsRef<Path>>(directory: P) -> Result<PathBuf, SegprepError> {
    let directory = directory.as_ref();

    std::fs::create_dir_all(directory)
        .map_err(|err| SegprepError::DirError(format!("{}: {}", directory.display(), err)))?;

    Ok(directory.to_path_buf())
}

/// Collect file paths from a directory with an optional substring filter
///
/// Paths are returned sorted by filename so directory-scan order is stable
/// across platforms.
///
/// # Examples
///
/// ```no_run
/// use segprep_core::constant::SUPPORTED_IMAGE_FORMATS;
/// use segprep_core::ut::path::collect_file_paths;
///
/// let masks = collect_file_paths("masks/", SUPPORTED_IMAGE_FORMATS.as_slice(), None);
/// ```
pub fn collect_file_paths<P: AsRef<Path>>(
    directory: P,
    valid_ext: &[&str],
    substring: Option<String>,
) -> Result<Vec<PathBuf>, SegprepError> {
    let message = directory.as_ref().display().to_string();

    let mut files: Vec<PathBuf> = std::fs::read_dir(&directory)
        .map_err(|_| SegprepError::DirError(message))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.to_lowercase())
                    .is_some_and(|ext| valid_ext.contains(&ext.as_str()))
        })
        .collect();

    if let Some(substring) = substring {
        files.retain(|file| {
            file.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.contains(&substring))
        });
    }

    files.sort_unstable();

    Ok(files)
}

/// Collect subdirectories of a directory (the tissue-type layout)
pub fn collect_subdirectories<P: AsRef<Path>>(
    directory: P,
) -> Result<Vec<PathBuf>, SegprepError> {
    let message = directory.as_ref().display().to_string();

    let mut dirs: Vec<PathBuf> = std::fs::read_dir(&directory)
        .map_err(|_| SegprepError::DirError(message))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();

    dirs.sort_unstable();

    Ok(dirs)
}

/// Image/mask pairs sharing a stem, plus the files left without a partner
#[derive(Debug, Clone, Default)]
pub struct FilePairs {
    /// (identifier, image path, mask path), sorted by identifier
    pub pairs: Vec<(String, PathBuf, PathBuf)>,
    /// Files from either side with no matching partner
    pub unpaired: Vec<PathBuf>,
}

/// Pair image and mask files by shared stem
///
/// The optional substrings are stripped from stems before matching, so
/// `tile_7_HE.png` pairs with `tile_7_mask.png` under substrings `_HE` and
/// `_mask`. Unpaired files on either side are returned for warning rather
/// than dropped silently.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use segprep_core::ut::path::pair_files;
///
/// let images = [PathBuf::from("d/tile_1_HE.png"), PathBuf::from("d/tile_2_HE.png")];
/// let masks = [PathBuf::from("d/tile_1_mask.png")];
///
/// let paired = pair_files(
///     &images,
///     &masks,
///     Some("_HE".to_string()),
///     Some("_mask".to_string()),
/// );
///
/// assert_eq!(paired.pairs.len(), 1);
/// assert_eq!(paired.unpaired.len(), 1);
/// ```
pub fn pair_files(
    images: &[PathBuf],
    masks: &[PathBuf],
    image_substring: Option<String>,
    mask_substring: Option<String>,
) -> FilePairs {
    let image_substring = image_substring.unwrap_or_default();
    let mask_substring = mask_substring.unwrap_or_default();

    let stem = |file: &PathBuf, substring: &str| -> Option<String> {
        file.file_stem()
            .map(|stem| stem.to_string_lossy().replace(substring, ""))
    };

    let mut image_map: HashMap<String, PathBuf> = HashMap::with_capacity(images.len());

    for image in images {
        if let Some(name) = stem(image, &image_substring) {
            image_map.insert(name, image.clone());
        }
    }

    let mut paired = FilePairs::default();

    for mask in masks {
        match stem(mask, &mask_substring).and_then(|name| {
            image_map
                .remove(&name)
                .map(|image| (name, image, mask.clone()))
        }) {
            Some(pair) => paired.pairs.push(pair),
            None => paired.unpaired.push(mask.clone()),
        }
    }

    // Images left in the map never matched a mask
    paired.unpaired.extend(image_map.into_values());

    paired.pairs.sort_unstable();
    paired.unpaired.sort_unstable();

    paired
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_collect_file_paths() {
        let dir = tempfile::tempdir().unwrap();

        for name in ["a_mask.png", "b_mask.png", "b_HE.png", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let all = collect_file_paths(dir.path(), &["png"], None).unwrap();
        assert_eq!(all.len(), 3);

        let masks = collect_file_paths(dir.path(), &["png"], Some("_mask".to_string())).unwrap();
        assert_eq!(masks.len(), 2);

        // Sorted by filename
        assert!(masks[0].ends_with("a_mask.png"));
    }

    #[test]
    fn test_collect_file_paths_missing_dir() {
        assert!(collect_file_paths("DOES_NOT_EXIST", &["png"], None).is_err());
    }

    #[test]
    fn test_pair_files() {
        let images = [
            PathBuf::from("d/tile_1_HE.png"),
            PathBuf::from("d/tile_2_HE.png"),
            PathBuf::from("d/tile_3_HE.png"),
        ];

        let masks = [
            PathBuf::from("d/tile_1_mask.png"),
            PathBuf::from("d/tile_3_mask.png"),
            PathBuf::from("d/tile_4_mask.png"),
        ];

        let paired = pair_files(
            &images,
            &masks,
            Some("_HE".to_string()),
            Some("_mask".to_string()),
        );

        assert_eq!(paired.pairs.len(), 2);
        assert_eq!(paired.pairs[0].0, "tile_1");
        assert_eq!(paired.pairs[1].0, "tile_3");

        // One image and one mask without partners
        assert_eq!(paired.unpaired.len(), 2);
    }

    #[test]
    fn test_pair_files_no_substrings() {
        let images = [PathBuf::from("images/tile_1.png")];
        let masks = [PathBuf::from("masks/tile_1.png")];

        let paired = pair_files(&images, &masks, None, None);

        assert_eq!(paired.pairs.len(), 1);
        assert!(paired.unpaired.is_empty());
    }

    #[test]
    fn test_ensure_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("train").join("source");

        let created = ensure_directory(&nested).unwrap();
        assert!(created.is_dir());

        // Reused, not renamed
        let reused = ensure_directory(&nested).unwrap();
        assert_eq!(created, reused);
    }
}
