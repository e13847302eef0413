// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

mod map;
mod palette;
mod table;

pub use map::{ClassMap, RemapPolicy};
pub use palette::Palette;
pub use table::{ClassTable, clean_class_name};
