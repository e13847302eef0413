// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

mod mask;

pub use mask::ClassMask;
