// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

//! Core building blocks for the segprep dataset-preparation pipeline:
//! class-index masks, class tables and palettes, pixel tallies, train/val
//! splitting, prompt synthesis, and table/manifest I/O.

pub mod class;
pub mod constant;
pub mod error;
pub mod im;
pub mod io;
pub mod prompt;
pub mod split;
pub mod tally;
pub mod ut;
