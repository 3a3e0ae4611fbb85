//! Image normalization for classifier input.
//!
//! Pixels are scaled to `[0, 1]` and then standardized per channel with
//! `(x - mean) / std`. Both steps are folded into one multiply-add per value:
//! `x * alpha + beta` with `alpha = scale / std` and `beta = -mean / std`.

use crate::core::{ClassifierError, IMAGENET_MEAN, IMAGENET_STD, PIXEL_SCALE, Tensor4D};
use image::RgbImage;

/// Normalizes RGB images into CHW tensors.
#[derive(Debug, Clone)]
pub struct NormalizeImage {
    /// Scaling factors for each channel (alpha = scale / std)
    pub alpha: [f32; 3],
    /// Offset values for each channel (beta = -mean / std)
    pub beta: [f32; 3],
}

impl NormalizeImage {
    /// Creates a new NormalizeImage instance with the specified parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * Scale is less than or equal to 0
    /// * Any standard deviation value is less than or equal to 0
    pub fn new(scale: f32, mean: [f32; 3], std: [f32; 3]) -> Result<Self, ClassifierError> {
        if scale <= 0.0 {
            return Err(ClassifierError::config_error("Scale must be greater than 0"));
        }

        for (i, &s) in std.iter().enumerate() {
            if s <= 0.0 {
                return Err(ClassifierError::config_error(format!(
                    "Standard deviation at index {i} must be greater than 0, got {s}"
                )));
            }
        }

        let alpha = std.map(|s| scale / s);
        let beta = [0, 1, 2].map(|c| -mean[c] / std[c]);

        Ok(Self { alpha, beta })
    }

    /// ImageNet statistics with 8-bit to unit scaling.
    pub fn imagenet() -> Self {
        Self {
            alpha: IMAGENET_STD.map(|s| PIXEL_SCALE / s),
            beta: [0, 1, 2].map(|c| -IMAGENET_MEAN[c] / IMAGENET_STD[c]),
        }
    }

    /// Normalizes a single image and returns it as a `1 x 3 x H x W` tensor.
    pub fn normalize_to(&self, img: &RgbImage) -> Tensor4D {
        let (width, height) = img.dimensions();
        let (h, w) = (height as usize, width as usize);
        let mut tensor = Tensor4D::zeros((1, 3, h, w));

        for (x, y, pixel) in img.enumerate_pixels() {
            for c in 0..3 {
                tensor[[0, c, y as usize, x as usize]] =
                    pixel[c] as f32 * self.alpha[c] + self.beta[c];
            }
        }

        tensor
    }
}

impl Default for NormalizeImage {
    fn default() -> Self {
        Self::imagenet()
    }
}
