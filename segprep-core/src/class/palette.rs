// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

use std::path::Path;

use crate::constant;
use crate::error::SegprepError;

/// A fixed class-index to RGB color lookup for mask visualization
///
/// # Examples
///
/// ```
/// use segprep_core::class::Palette;
///
/// let palette = Palette::from_hex(&["#000000", "#ff0000"]).unwrap();
///
/// assert_eq!(palette.color(1), Some([255, 0, 0]));
/// assert_eq!(palette.index_of([255, 0, 0]), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<[u8; 3]>,
}

impl Palette {
    pub fn new(colors: Vec<[u8; 3]>) -> Palette {
        Palette { colors }
    }

    /// The built-in SegPath palette (background + 8 classes)
    pub fn segpath() -> Palette {
        Palette::from_hex(&constant::SEGPATH_PALETTE_HEX)
            .expect("built-in palette entries are valid hex")
    }

    /// Parse a palette from `#rrggbb` hex strings, one per class index
    pub fn from_hex<S: AsRef<str>>(hex: &[S]) -> Result<Palette, SegprepError> {
        let colors = hex
            .iter()
            .map(|color| parse_hex(color.as_ref()))
            .collect::<Result<Vec<[u8; 3]>, SegprepError>>()?;

        Ok(Palette { colors })
    }

    /// Load a palette from a JSON array of `#rrggbb` strings
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use segprep_core::class::Palette;
    /// let palette = Palette::open("palette.json").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Palette, SegprepError> {
        let contents = std::fs::read_to_string(&path)
            .map_err(|_| SegprepError::NoFileError(path.as_ref().display().to_string()))?;

        let hex: Vec<String> = serde_json::from_str(&contents)
            .map_err(|err| SegprepError::PaletteError(err.to_string()))?;

        if hex.is_empty() {
            return Err(SegprepError::PaletteError(
                "Palette contains no colors".to_string(),
            ));
        }

        Palette::from_hex(&hex)
    }

    /// RGB color for a class index, if within the palette
    pub fn color(&self, index: u8) -> Option<[u8; 3]> {
        self.colors.get(index as usize).copied()
    }

    /// Class index for a color. First match wins when colors repeat.
    pub fn index_of(&self, rgb: [u8; 3]) -> Option<u8> {
        self.colors
            .iter()
            .position(|&color| color == rgb)
            .map(|index| index as u8)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

fn parse_hex(hex: &str) -> Result<[u8; 3], SegprepError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);

    if digits.len() != 6 || !digits.is_ascii() {
        return Err(SegprepError::PaletteError(format!(
            "Invalid hex color: {}",
            hex
        )));
    }

    let mut rgb = [0u8; 3];

    for (i, channel) in rgb.iter_mut().enumerate() {
        *channel = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
            .map_err(|_| SegprepError::PaletteError(format!("Invalid hex color: {}", hex)))?;
    }

    Ok(rgb)
}
