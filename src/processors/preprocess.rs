//! Decoding and resizing of uploaded images into classifier input.

use super::normalization::NormalizeImage;
use crate::core::{ClassifierError, ClassifierResult, INPUT_SIZE, Tensor4D};
use image::{DynamicImage, imageops::FilterType};

/// Turns raw image bytes into a normalized `1 x 3 x 224 x 224` tensor.
///
/// Decoding accepts any encoding the `image` crate was built with. Alpha and
/// grayscale inputs are coerced to RGB, and the image is resized to a square
/// without preserving its aspect ratio. The transformation is pure and
/// deterministic for a given input.
#[derive(Debug, Clone)]
pub struct ImagePreprocessor {
    input_size: u32,
    resize_filter: FilterType,
    normalizer: NormalizeImage,
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self {
            input_size: INPUT_SIZE,
            // Bilinear, matching the torchvision resize the weights were trained with.
            resize_filter: FilterType::Triangle,
            normalizer: NormalizeImage::imagenet(),
        }
    }
}

impl ImagePreprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes and normalizes raw image bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::Decode`] when the payload is empty or is not
    /// a supported image encoding.
    pub fn preprocess(&self, raw: &[u8]) -> ClassifierResult<Tensor4D> {
        if raw.is_empty() {
            return Err(ClassifierError::decode_rejected("image payload is empty"));
        }

        let img = image::load_from_memory(raw).map_err(|e| {
            ClassifierError::decode(format!("{} byte payload", raw.len()), e)
        })?;

        Ok(self.preprocess_image(&img))
    }

    /// Normalizes an already decoded image.
    pub fn preprocess_image(&self, img: &DynamicImage) -> Tensor4D {
        tracing::debug!(
            width = img.width(),
            height = img.height(),
            color = ?img.color(),
            "preprocessing image"
        );
        let rgb = img.to_rgb8();
        let resized = image::imageops::resize(
            &rgb,
            self.input_size,
            self.input_size,
            self.resize_filter,
        );
        self.normalizer.normalize_to(&resized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ErrorKind, MODEL_INPUT_SHAPE};
    use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
        buf
    }

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    #[test]
    fn test_preprocess_produces_fixed_shape() {
        let preprocessor = ImagePreprocessor::new();
        for (w, h) in [(500, 500), (31, 640), (1, 1)] {
            let bytes = encode(DynamicImage::ImageRgb8(gradient(w, h)), ImageFormat::Png);
            let tensor = preprocessor.preprocess(&bytes).unwrap();
            assert_eq!(tensor.shape(), &MODEL_INPUT_SHAPE[..]);
            assert!(tensor.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_preprocess_coerces_gray_and_alpha_to_rgb() {
        let preprocessor = ImagePreprocessor::new();

        let gray = GrayImage::from_pixel(40, 30, Luma([128]));
        let bytes = encode(DynamicImage::ImageLuma8(gray), ImageFormat::Png);
        let tensor = preprocessor.preprocess(&bytes).unwrap();
        assert_eq!(tensor.shape(), &MODEL_INPUT_SHAPE[..]);

        let rgba = RgbaImage::from_pixel(40, 30, Rgba([10, 20, 30, 0]));
        let bytes = encode(DynamicImage::ImageRgba8(rgba), ImageFormat::Png);
        let tensor = preprocessor.preprocess(&bytes).unwrap();
        assert_eq!(tensor.shape(), &MODEL_INPUT_SHAPE[..]);
    }

    #[test]
    fn test_uniform_image_normalizes_to_expected_value() {
        let preprocessor = ImagePreprocessor::new();
        let img = RgbImage::from_pixel(300, 200, Rgb([255, 255, 255]));
        let bytes = encode(DynamicImage::ImageRgb8(img), ImageFormat::Png);
        let tensor = preprocessor.preprocess(&bytes).unwrap();

        let expected = [
            (1.0 - 0.485) / 0.229,
            (1.0 - 0.456) / 0.224,
            (1.0 - 0.406) / 0.225,
        ];
        for (c, want) in expected.iter().enumerate() {
            let got = tensor[[0, c, 100, 100]];
            assert!((got - want).abs() < 1e-4, "channel {c}: {got} vs {want}");
        }
    }

    #[test]
    fn test_empty_payload_is_decode_error() {
        let err = ImagePreprocessor::new().preprocess(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_malformed_payloads_are_decode_errors() {
        let preprocessor = ImagePreprocessor::new();

        let err = preprocessor.preprocess(b"definitely not an image").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);

        let bytes = encode(DynamicImage::ImageRgb8(gradient(64, 64)), ImageFormat::Png);
        let truncated = &bytes[..bytes.len() / 2];
        let err = preprocessor.preprocess(truncated).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_preprocess_is_deterministic() {
        let preprocessor = ImagePreprocessor::new();
        let bytes = encode(DynamicImage::ImageRgb8(gradient(123, 77)), ImageFormat::Png);
        let a = preprocessor.preprocess(&bytes).unwrap();
        let b = preprocessor.preprocess(&bytes).unwrap();
        assert!(a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits()));
    }
}
