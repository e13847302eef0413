// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

mod manifest;
mod table;

pub use manifest::{ManifestEntry, read_manifest, write_manifest};
pub use table::{write_table, write_table_csv, write_table_tsv};
