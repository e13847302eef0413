// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

//! The `segprep` command line: one subcommand per pipeline stage.

pub mod colorize;
pub mod count;
pub mod prompt;
pub mod reduce;
pub mod split;
