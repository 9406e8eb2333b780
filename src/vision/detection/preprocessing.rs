// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the YOLO detector

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use ndarray::Array4;

/// Square input size of the YOLOv8 export
pub const YOLO_INPUT_SIZE: u32 = 640;

/// Gray used to pad the letterboxed image
pub const LETTERBOX_FILL: u8 = 114;

/// Geometry of a letterbox transform, used to map model-space boxes back
/// onto the source image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxInfo {
    /// Scale factor applied to the source image
    pub scale: f32,
    /// X offset from padding
    pub offset_x: u32,
    /// Y offset from padding
    pub offset_y: u32,
    /// Source image width
    pub original_width: u32,
    /// Source image height
    pub original_height: u32,
}

impl LetterboxInfo {
    /// Compute the letterbox geometry for an image of the given size
    pub fn new(width: u32, height: u32, target_size: u32) -> Self {
        if width == 0 || height == 0 {
            return Self {
                scale: 1.0,
                offset_x: 0,
                offset_y: 0,
                original_width: width,
                original_height: height,
            };
        }

        let scale = (target_size as f32 / width as f32).min(target_size as f32 / height as f32);
        let (new_w, new_h) = scaled_dimensions(width, height, scale);

        Self {
            scale,
            offset_x: (target_size - new_w) / 2,
            offset_y: (target_size - new_h) / 2,
            original_width: width,
            original_height: height,
        }
    }

    /// Map a model-space point back to the source image, clamped to its bounds
    pub fn map_to_original(&self, x: f32, y: f32) -> (f32, f32) {
        let orig_x = (x - self.offset_x as f32) / self.scale;
        let orig_y = (y - self.offset_y as f32) / self.scale;
        (
            orig_x.clamp(0.0, self.original_width as f32),
            orig_y.clamp(0.0, self.original_height as f32),
        )
    }
}

fn scaled_dimensions(width: u32, height: u32, scale: f32) -> (u32, u32) {
    let new_w = ((width as f32 * scale).round() as u32).max(1);
    let new_h = ((height as f32 * scale).round() as u32).max(1);
    (new_w, new_h)
}

/// Resize preserving aspect ratio and pad to `target_size` square
pub fn letterbox(image: &DynamicImage, target_size: u32) -> (RgbImage, LetterboxInfo) {
    let (orig_w, orig_h) = image.dimensions();
    let info = LetterboxInfo::new(orig_w, orig_h, target_size);

    let mut output = RgbImage::from_pixel(
        target_size,
        target_size,
        Rgb([LETTERBOX_FILL, LETTERBOX_FILL, LETTERBOX_FILL]),
    );

    if orig_w == 0 || orig_h == 0 {
        return (output, info);
    }

    let (new_w, new_h) = scaled_dimensions(orig_w, orig_h, info.scale);
    let resized = image
        .resize_exact(new_w, new_h, FilterType::Triangle)
        .to_rgb8();

    image::imageops::replace(
        &mut output,
        &resized,
        i64::from(info.offset_x),
        i64::from(info.offset_y),
    );

    (output, info)
}

/// Preprocess an image for YOLO detection
///
/// Steps:
/// 1. Letterbox to `target_size` square
/// 2. Scale RGB values to [0, 1]
/// 3. Lay out as NCHW tensor [1, 3, H, W]
pub fn preprocess_for_detection(
    image: &DynamicImage,
    target_size: u32,
) -> (Array4<f32>, LetterboxInfo) {
    let (rgb, info) = letterbox(image, target_size);
    let size = target_size as usize;

    let mut tensor = Array4::zeros((1, 3, size, size));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }

    (tensor, info)
}
