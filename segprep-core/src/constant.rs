// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

// All currently supported mask/image formats readable through the image crate
pub const SUPPORTED_IMAGE_FORMATS: [&str; 9] = [
    "bmp", "jpeg", "jpg", "png", "pgm", "tif", "tiff", "webp", "qoi",
];

// Valid extensions for statistics tables
pub const SUPPORTED_TABLE_FORMATS: [&str; 3] = ["csv", "tsv", "txt"];

// Output layout consumed by the downstream training collaborator
pub const SPLIT_SUBDIRS: [&str; 4] = [
    "train/source",
    "train/target",
    "val/source",
    "val/target",
];

// SegPath reduced class set: background plus eight cell/tissue types
pub const SEGPATH_CLASS_NAMES: [&str; 9] = [
    "background",
    "epithelium",
    "smooth muscle",
    "lymphocyte",
    "leukocyte",
    "endothelial cell",
    "plasma cell",
    "myeloid cell",
    "red blood cell",
];

// Default visualization palette, one hex triple per SegPath class
pub const SEGPATH_PALETTE_HEX: [&str; 9] = [
    "#000000", // background
    "#e6194b", // epithelium
    "#f58231", // smooth muscle
    "#ffe119", // lymphocyte
    "#3cb44b", // leukocyte
    "#4363d8", // endothelial cell
    "#911eb4", // plasma cell
    "#42d4f4", // myeloid cell
    "#f032e6", // red blood cell
];

// Prompt synthesis defaults
pub const DEFAULT_PROMPT_TEMPLATE: &str = "pathology image: {class_descriptions}";
pub const PROMPT_PLACEHOLDER: &str = "{class_descriptions}";
pub const EMPTY_MASK_DESCRIPTION: &str = "background";
pub const DEFAULT_EMPTY_MASK_THRESHOLD: f64 = 0.98;
pub const DEFAULT_MIN_CLASS_PERCENTAGE: f64 = 1.0;

// Prompts at or above this word count are left unaugmented
pub const AUGMENT_MAX_WORDS: usize = 55;

// Dataset context sentences appended by the optional prompt augmentation
pub const AUGMENT_CONTEXTS: [&str; 10] = [
    "SegPath is a large-scale dataset for semantic segmentation of cancer histology images.",
    "Annotations were generated with a restaining-based workflow combining H&E and immunofluorescence staining.",
    "The dataset covers eight major cell and tissue types across 18 organs.",
    "Immunofluorescence-derived masks avoid the morphological bias of manual annotation.",
    "Segmentation masks were refined iteratively from immunofluorescence intensity cut-offs.",
    "The dataset contains over 158,000 annotated patches from 1,583 patients.",
    "Masks were aligned to H&E tiles with multi-step image registration.",
    "Models trained on this data support quantitative tumor microenvironment analysis.",
    "Each mask pixel encodes one tissue or cell class as an integer index.",
    "The annotations target accurate tissue and cell segmentation in pathology.",
];
