//! Constants used throughout the classification pipeline.
//!
//! The input geometry and normalization statistics are fixed properties of the
//! pipeline. They are never derived from the image being classified.

/// Side length, in pixels, of the square image fed to the classifier.
pub const INPUT_SIZE: u32 = 224;

/// Number of color channels in the classifier input (RGB).
pub const INPUT_CHANNELS: usize = 3;

/// Full input tensor shape: batch of one, CHW.
pub const MODEL_INPUT_SHAPE: [usize; 4] = [1, INPUT_CHANNELS, INPUT_SIZE as usize, INPUT_SIZE as usize];

/// Per-channel ImageNet mean, RGB order.
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// Per-channel ImageNet standard deviation, RGB order.
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Scale applied to 8-bit pixel values before standardization.
pub const PIXEL_SCALE: f32 = 1.0 / 255.0;

/// Public ImageNet class list, one label per line.
pub const DEFAULT_LABELS_URL: &str =
    "https://raw.githubusercontent.com/pytorch/hub/master/imagenet_classes.txt";

/// Upper bound on downloading the label vocabulary at startup.
pub const LABELS_FETCH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Multipart field that carries the uploaded image.
pub const UPLOAD_FIELD_NAME: &str = "file";

/// Default cap on request bodies accepted by the HTTP boundary (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Column width of the persisted `image_name` and `predicted_class` fields.
pub const MAX_RECORD_TEXT_LEN: usize = 120;

/// Records kept by the in-memory sink before the oldest are evicted.
pub const MEMORY_SINK_CAPACITY: usize = 10_000;
