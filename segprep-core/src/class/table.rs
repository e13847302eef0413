// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

use std::path::Path;

use crate::constant;
use crate::error::SegprepError;

/// Clean a raw label for prompt use
///
/// Underscores and commas become single spaces and the result is lowercased,
/// so a TSV label like `Smooth_muscle_cells,_myofibroblast` reads naturally
/// inside a generated sentence.
pub fn clean_class_name(name: &str) -> String {
    name.replace(['_', ','], " ")
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}

/// A class-index to human-readable name table
///
/// # Examples
///
/// ```
/// use segprep_core::class::ClassTable;
///
/// let table = ClassTable::segpath();
///
/// assert_eq!(table.name(0), Some("background"));
/// assert_eq!(table.name(3), Some("lymphocyte"));
/// ```
#[derive(Debug, Clone)]
pub struct ClassTable {
    names: Vec<String>,
}

impl ClassTable {
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> ClassTable {
        ClassTable {
            names: names
                .iter()
                .map(|name| clean_class_name(name.as_ref()))
                .collect(),
        }
    }

    /// The built-in SegPath class table (background + 8 classes)
    pub fn segpath() -> ClassTable {
        ClassTable::from_names(&constant::SEGPATH_CLASS_NAMES)
    }

    /// Load a table from a two-column TSV of `code <TAB> label` rows
    ///
    /// The first row is treated as a header and skipped. Codes may arrive in
    /// any order; gaps in the code range are filled with placeholder names.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use segprep_core::class::ClassTable;
    /// let table = ClassTable::open_tsv("labels.tsv").unwrap();
    /// ```
    pub fn open_tsv<P: AsRef<Path>>(path: P) -> Result<ClassTable, SegprepError> {
        let contents = std::fs::read_to_string(&path)
            .map_err(|_| SegprepError::NoFileError(path.as_ref().display().to_string()))?;

        let mut entries: Vec<(usize, String)> = Vec::new();

        for line in contents.lines().skip(1) {
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            let mut fields = line.split('\t');

            let code = fields
                .next()
                .and_then(|field| field.trim().parse::<usize>().ok())
                .ok_or_else(|| {
                    SegprepError::ClassTableError(format!("Invalid class code in row: {}", line))
                })?;

            let label = fields.next().map(str::trim).ok_or_else(|| {
                SegprepError::ClassTableError(format!("Missing label in row: {}", line))
            })?;

            entries.push((code, clean_class_name(label)));
        }

        if entries.is_empty() {
            return Err(SegprepError::ClassTableError(
                "Class table contains no rows".to_string(),
            ));
        }

        let size = entries.iter().map(|(code, _)| code + 1).max().unwrap_or(0);
        let mut names: Vec<String> = (0..size).map(|code| format!("class {}", code)).collect();

        for (code, label) in entries {
            names[code] = label;
        }

        Ok(ClassTable { names })
    }

    /// Cleaned name for a class index, if within the table
    pub fn name(&self, index: u8) -> Option<&str> {
        self.names.get(index as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
