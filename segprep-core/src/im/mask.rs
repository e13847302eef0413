// Copyright (c) 2025, segprep developers
// Licensed under the MIT License

use std::path::Path;

use image::{DynamicImage, ImageBuffer, Luma, Rgb, RgbImage, open as open_dynamic};

use crate::class::{ClassMap, Palette, RemapPolicy};
use crate::constant;
use crate::error::SegprepError;

/// A row-major container storing class-index mask pixels
///
/// Each pixel holds an 8-bit class index. The length of the container must
/// be equal to the product of `width` * `height`.
///
/// # Examples
///
/// ```
/// use segprep_core::im::ClassMask;
///
/// let mask = ClassMask::new(10, 10, vec![0u8; 100]);
/// assert_eq!(mask.unwrap().len(), 100);
/// ```
///
/// ```
/// use segprep_core::im::ClassMask;
///
/// let mask = ClassMask::new(10, 10, vec![0u8; 1000]);
/// assert!(mask.is_err()); // Buffer size does not match dimensions
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

// >>> I/O METHODS

impl ClassMask {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<ClassMask, SegprepError> {
        if data.len() != (width as usize) * (height as usize) {
            return Err(SegprepError::BufferSizeError);
        }

        Ok(ClassMask {
            width,
            height,
            data,
        })
    }

    /// Open a mask from a provided path
    ///
    /// # Arguments
    ///
    /// * `path` - A path to a single-channel 8-bit image with a valid extension
    ///
    /// ```no_run
    /// use segprep_core::im::ClassMask;
    /// let mask = ClassMask::open("mask.png");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<ClassMask, SegprepError> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        let Some(extension) = extension else {
            return Err(SegprepError::MaskExtensionError);
        };

        if !constant::SUPPORTED_IMAGE_FORMATS.iter().any(|e| e == &extension) {
            return Err(SegprepError::MaskExtensionError);
        }

        let image = open_dynamic(&path)
            .map_err(|_| SegprepError::MaskReadError(path.as_ref().display().to_string()))?;

        Self::new_from_dynamic(image)
    }

    /// Initialize a mask from a DynamicImage
    ///
    /// # Arguments
    ///
    /// * `image` - An 8-bit grayscale DynamicImage, with or without alpha
    pub fn new_from_dynamic(image: DynamicImage) -> Result<ClassMask, SegprepError> {
        let width = image.width();
        let height = image.height();

        match image {
            DynamicImage::ImageLuma8(buffer) => ClassMask::new(width, height, buffer.into_raw()),
            DynamicImage::ImageLumaA8(buffer) => ClassMask::new(
                width,
                height,
                buffer
                    .into_raw()
                    .chunks_exact(2)
                    .map(|pixel| pixel[0])
                    .collect(),
            ),
            _ => Err(SegprepError::MaskFormatError),
        }
    }

    /// Save the mask to a provided path
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SegprepError> {
        let buffer: ImageBuffer<Luma<u8>, Vec<u8>> =
            ImageBuffer::from_raw(self.width, self.height, self.data.clone())
                .ok_or(SegprepError::BufferSizeError)?;

        buffer
            .save(&path)
            .map_err(|_| SegprepError::MaskWriteError(path.as_ref().display().to_string()))
    }
}

// <<< I/O METHODS

// >>> ACCESS METHODS

impl ClassMask {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Largest class index present in the mask
    pub fn max_class(&self) -> u8 {
        self.data.iter().copied().max().unwrap_or(0)
    }
}

// <<< ACCESS METHODS

// >>> TRANSFORM METHODS

impl ClassMask {
    /// Remap every pixel through a class mapping table
    ///
    /// Spatial dimensions are preserved. Pixels outside the mapping domain
    /// are resolved by `policy`: an error under [`RemapPolicy::Strict`] or
    /// background (0) under [`RemapPolicy::Clamp`].
    ///
    /// # Examples
    ///
    /// ```
    /// use segprep_core::class::{ClassMap, RemapPolicy};
    /// use segprep_core::im::ClassMask;
    ///
    /// let mask = ClassMask::new(2, 2, vec![0, 1, 2, 2]).unwrap();
    /// let map = ClassMap::from_pairs([(0, 0), (1, 1), (2, 1)]);
    ///
    /// let reduced = mask.remap(&map, RemapPolicy::Strict).unwrap();
    /// assert_eq!(reduced.as_raw(), &[0, 1, 1, 1]);
    /// ```
    pub fn remap(&self, map: &ClassMap, policy: RemapPolicy) -> Result<ClassMask, SegprepError> {
        let data = self
            .data
            .iter()
            .map(|&pixel| match (map.get(pixel), policy) {
                (Some(reduced), _) => Ok(reduced),
                (None, RemapPolicy::Clamp) => Ok(0),
                (None, RemapPolicy::Strict) => Err(SegprepError::OutOfDomainError(pixel)),
            })
            .collect::<Result<Vec<u8>, SegprepError>>()?;

        ClassMask::new(self.width, self.height, data)
    }

    /// Render the mask as a 3-channel visualization through a palette
    ///
    /// Pixels whose class index falls outside the palette are resolved by
    /// `policy` the same way as in [`ClassMask::remap`].
    pub fn colorize(
        &self,
        palette: &Palette,
        policy: RemapPolicy,
    ) -> Result<RgbImage, SegprepError> {
        let background = palette
            .color(0)
            .ok_or_else(|| SegprepError::PaletteError("Palette contains no colors".to_string()))?;

        let mut data: Vec<u8> = Vec::with_capacity(self.data.len() * 3);

        for &pixel in &self.data {
            let color = match (palette.color(pixel), policy) {
                (Some(color), _) => color,
                (None, RemapPolicy::Clamp) => background,
                (None, RemapPolicy::Strict) => {
                    return Err(SegprepError::OutOfDomainError(pixel));
                }
            };

            data.extend_from_slice(&color);
        }

        RgbImage::from_raw(self.width, self.height, data).ok_or(SegprepError::BufferSizeError)
    }

    /// Recover a class mask from a palette-colored visualization
    ///
    /// Inverse of [`ClassMask::colorize`] for palettes with distinct colors.
    pub fn from_colorized(image: &RgbImage, palette: &Palette) -> Result<ClassMask, SegprepError> {
        let data = image
            .pixels()
            .map(|&Rgb(rgb)| {
                palette.index_of(rgb).ok_or_else(|| {
                    SegprepError::PaletteError(format!(
                        "Color ({}, {}, {}) is not present in the palette",
                        rgb[0], rgb[1], rgb[2]
                    ))
                })
            })
            .collect::<Result<Vec<u8>, SegprepError>>()?;

        ClassMask::new(image.width(), image.height(), data)
    }
}

// <<< TRANSFORM METHODS

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_mask_save_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");

        let mask = ClassMask::new(2, 2, vec![0, 3, 8, 1]).unwrap();
        mask.save(&path).unwrap();

        let opened = ClassMask::open(&path).unwrap();

        assert_eq!(opened.width(), 2);
        assert_eq!(opened.height(), 2);
        assert_eq!(opened.as_raw(), mask.as_raw());
    }

    #[test]
    fn test_mask_open_invalid_extension() {
        assert!(ClassMask::open("mask.npy").is_err());
        assert!(ClassMask::open("mask").is_err());
    }

    #[test]
    fn test_mask_remap_strict() {
        let mask = ClassMask::new(2, 2, vec![0, 1, 2, 9]).unwrap();
        let map = ClassMap::from_pairs([(0, 0), (1, 1), (2, 1)]);

        let result = mask.remap(&map, RemapPolicy::Strict);
        assert!(result.is_err());
    }

    #[test]
    fn test_mask_remap_clamp() {
        let mask = ClassMask::new(2, 2, vec![0, 1, 2, 9]).unwrap();
        let map = ClassMap::from_pairs([(0, 0), (1, 1), (2, 1)]);

        let reduced = mask.remap(&map, RemapPolicy::Clamp).unwrap();
        assert_eq!(reduced.as_raw(), &[0, 1, 1, 0]);
    }

    #[test]
    fn test_mask_remap_identity_idempotent() {
        let mask = ClassMask::new(3, 1, vec![0, 2, 4]).unwrap();
        let map = ClassMap::identity(5);

        let once = mask.remap(&map, RemapPolicy::Strict).unwrap();
        let twice = once.remap(&map, RemapPolicy::Strict).unwrap();

        assert_eq!(once, mask);
        assert_eq!(twice, mask);
    }

    #[test]
    fn test_mask_colorize_round_trip() {
        let palette = Palette::segpath();
        let mask = ClassMask::new(3, 3, vec![0, 1, 2, 3, 4, 5, 6, 7, 8]).unwrap();

        let colored = mask.colorize(&palette, RemapPolicy::Strict).unwrap();
        let recovered = ClassMask::from_colorized(&colored, &palette).unwrap();

        assert_eq!(recovered, mask);
    }

    #[test]
    fn test_mask_colorize_out_of_domain() {
        let palette = Palette::from_hex(&["#000000", "#ff0000"]).unwrap();
        let mask = ClassMask::new(2, 1, vec![1, 5]).unwrap();

        assert!(mask.colorize(&palette, RemapPolicy::Strict).is_err());

        let clamped = mask.colorize(&palette, RemapPolicy::Clamp).unwrap();
        assert_eq!(clamped.as_raw(), &[255, 0, 0, 0, 0, 0]);
    }
}
