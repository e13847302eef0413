// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SegprepError;

/// One prompt manifest record linking a mask, its paired image, and the
/// generated description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub source: String,
    pub target: String,
    pub prompt: String,
}

/// Write manifest entries as a JSON array, replacing any previous manifest
///
/// # Examples
///
/// ```no_run
/// use segprep_core::io::{ManifestEntry, write_manifest};
///
/// let entries = vec![ManifestEntry {
///     source: "source/tile_0.png".to_string(),
///     target: "target/tile_0.png".to_string(),
///     prompt: "pathology image: 8% epithelium".to_string(),
/// }];
///
/// write_manifest("prompts.json", &entries).unwrap();
/// ```
pub fn write_manifest<P: AsRef<Path>>(
    path: P,
    entries: &[ManifestEntry],
) -> Result<(), SegprepError> {
    let file = File::create(&path).map_err(|err| {
        SegprepError::ManifestWriteError(format!(
            "{}: {}",
            path.as_ref().display(),
            err
        ))
    })?;

    serde_json::to_writer_pretty(BufWriter::new(file), entries)
        .map_err(|err| SegprepError::ManifestWriteError(err.to_string()))
}

/// Read a manifest previously written by [`write_manifest`]
pub fn read_manifest<P: AsRef<Path>>(path: P) -> Result<Vec<ManifestEntry>, SegprepError> {
    let file = File::open(&path)
        .map_err(|_| SegprepError::NoFileError(path.as_ref().display().to_string()))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|err| SegprepError::OtherError(format!("Failed to parse manifest: {}", err)))
}
