// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

pub mod path;
pub mod track;
