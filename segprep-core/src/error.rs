// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

use std::fmt;

#[derive(Debug, Clone)]
pub enum SegprepError {
    BufferSizeError,
    MaskReadError(String),
    MaskWriteError(String),
    MaskFormatError,
    MaskExtensionError,
    OutOfDomainError(u8),
    ClassTableError(String),
    ClassMapError(String),
    PaletteError(String),
    TemplateError(String),
    ManifestWriteError(String),
    TableWriteError(String),
    NoFileError(String),
    DirError(String),
    EmptyInputError(String),
    OtherError(String),
}

impl fmt::Display for SegprepError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SegprepError::BufferSizeError => {
                write!(
                    f,
                    "[segprep::BufferSizeError] The mask buffer does not match the provided dimensions."
                )
            }
            SegprepError::MaskReadError(path) => {
                write!(f, "[segprep::MaskReadError] Failed to read mask: {}.", path)
            }
            SegprepError::MaskWriteError(path) => {
                write!(
                    f,
                    "[segprep::MaskWriteError] Failed to write mask: {}.",
                    path
                )
            }
            SegprepError::MaskFormatError => {
                write!(
                    f,
                    "[segprep::MaskFormatError] Only single-channel 8-bit class index masks are supported."
                )
            }
            SegprepError::MaskExtensionError => {
                write!(
                    f,
                    "[segprep::MaskExtensionError] Could not detect a valid image extension for input."
                )
            }
            SegprepError::OutOfDomainError(value) => {
                write!(
                    f,
                    "[segprep::OutOfDomainError] Pixel value {} is outside the class mapping domain.",
                    value
                )
            }
            SegprepError::ClassTableError(message) => {
                write!(
                    f,
                    "[segprep::ClassTableError] Failed to load class table. {}.",
                    message
                )
            }
            SegprepError::ClassMapError(message) => {
                write!(
                    f,
                    "[segprep::ClassMapError] Failed to load class mapping. {}.",
                    message
                )
            }
            SegprepError::PaletteError(message) => {
                write!(
                    f,
                    "[segprep::PaletteError] Failed to load palette. {}.",
                    message
                )
            }
            SegprepError::TemplateError(message) => {
                write!(
                    f,
                    "[segprep::TemplateError] Invalid prompt template. {}.",
                    message
                )
            }
            SegprepError::ManifestWriteError(message) => {
                write!(
                    f,
                    "[segprep::ManifestWriteError] Failed to write prompt manifest. {}.",
                    message
                )
            }
            SegprepError::TableWriteError(message) => {
                write!(
                    f,
                    "[segprep::TableWriteError] Failed to write table. {}.",
                    message
                )
            }
            SegprepError::NoFileError(message) => {
                write!(
                    f,
                    "[segprep::NoFileError] File could not be found. {}.",
                    message
                )
            }
            SegprepError::DirError(message) => {
                write!(
                    f,
                    "[segprep::DirError] Directory could not be read. {}.",
                    message
                )
            }
            SegprepError::EmptyInputError(message) => {
                write!(
                    f,
                    "[segprep::EmptyInputError] No input files were found. {}.",
                    message
                )
            }
            SegprepError::OtherError(message) => {
                write!(f, "[segprep::OtherError] Error: {}.", message)
            }
        }
    }
}

impl std::error::Error for SegprepError {}
