use image::{DynamicImage, GrayImage, Luma, Rgb};
use crate::{
    config::{PreprocessConfig, MAX_BLUR_KERNEL_SIZE},
    error::{EvalError, Result},
    traits::ImagePreprocessor,
};

/// Convert any decoded image to single-channel intensity.
///
/// Uses BT.601 luma weights (0.299, 0.587, 0.114) in 14-bit fixed point,
/// rounded to nearest. Alpha is ignored.
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    imageproc::map::map_colors(&image.to_rgb8(), |p: Rgb<u8>| {
        let [r, g, b] = p.0.map(u32::from);
        Luma([((r * 4899 + g * 9617 + b * 1868 + (1 << 13)) >> 14) as u8])
    })
}

/// Fixed global threshold: intensity >= cutoff becomes 255, everything else 0
#[derive(Debug, Clone)]
pub struct ThresholdPreprocessor {
    pub threshold: u8,
}

impl Default for ThresholdPreprocessor {
    fn default() -> Self {
        Self { threshold: 128 }
    }
}

impl ImagePreprocessor for ThresholdPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        let cutoff = self.threshold;
        Ok(imageproc::map::map_colors(image, |p: Luma<u8>| {
            if p[0] >= cutoff { Luma([255u8]) } else { Luma([0u8]) }
        }))
    }
}

/// Square binomial smoothing blur with edge clamping.
///
/// A kernel size of 5 gives the classic `[1, 4, 6, 4, 1] / 16` Gaussian
/// approximation. Both passes accumulate integer weights and the result is
/// rounded once, so a value like 127.875 lands on 128 rather than 127.
#[derive(Debug, Clone)]
pub struct BinomialBlurPreprocessor {
    weights: Vec<u64>,
}

impl BinomialBlurPreprocessor {
    pub fn new(kernel_size: u32) -> Result<Self> {
        if kernel_size == 0 || kernel_size % 2 == 0 || kernel_size > MAX_BLUR_KERNEL_SIZE {
            return Err(EvalError::InvalidConfig(format!(
                "blur kernel size must be odd and between 1 and {MAX_BLUR_KERNEL_SIZE}, got {kernel_size}"
            )));
        }
        Ok(Self { weights: binomial_weights(kernel_size as usize) })
    }

    /// Unnormalized weights; they sum to `2^(size - 1)`
    pub fn weights(&self) -> &[u64] {
        &self.weights
    }
}

impl Default for BinomialBlurPreprocessor {
    fn default() -> Self {
        Self { weights: binomial_weights(5) }
    }
}

impl ImagePreprocessor for BinomialBlurPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        let (width, height) = image.dimensions();
        if self.weights.len() == 1 || width == 0 || height == 0 {
            return Ok(image.clone());
        }

        let radius = (self.weights.len() / 2) as i64;
        let row_sum: u64 = self.weights.iter().sum();
        let norm = row_sum * row_sum;

        // Horizontal pass, kept at full precision
        let mut rows = vec![0u64; width as usize * height as usize];
        for y in 0..height {
            for x in 0..width {
                rows[(y * width + x) as usize] = self
                    .weights
                    .iter()
                    .enumerate()
                    .map(|(k, w)| {
                        let sx = clamp_index(x as i64 + k as i64 - radius, width);
                        w * u64::from(image.get_pixel(sx, y)[0])
                    })
                    .sum();
            }
        }

        Ok(GrayImage::from_fn(width, height, |x, y| {
            let acc: u64 = self
                .weights
                .iter()
                .enumerate()
                .map(|(k, w)| {
                    let sy = clamp_index(y as i64 + k as i64 - radius, height);
                    w * rows[(sy * width + x) as usize]
                })
                .sum();
            Luma([((acc + norm / 2) / norm) as u8])
        }))
    }
}

fn clamp_index(index: i64, len: u32) -> u32 {
    index.clamp(0, i64::from(len) - 1) as u32
}

/// Row of Pascal's triangle with `size` entries
fn binomial_weights(size: usize) -> Vec<u64> {
    let mut row = vec![1u64];
    for _ in 1..size {
        let mut next = Vec::with_capacity(row.len() + 1);
        next.push(1);
        next.extend(row.windows(2).map(|w| w[0] + w[1]));
        next.push(1);
        row = next;
    }
    row
}

/// Build the standard grayscale-to-mask chain: blur, then threshold
pub fn preprocessors_from_config(config: &PreprocessConfig) -> Result<Vec<Box<dyn ImagePreprocessor>>> {
    let blur: Box<dyn ImagePreprocessor> = Box::new(BinomialBlurPreprocessor::new(config.blur_kernel_size)?);
    let threshold: Box<dyn ImagePreprocessor> = Box::new(ThresholdPreprocessor { threshold: config.threshold });
    Ok(vec![blur, threshold])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binomial_weights() {
        assert_eq!(binomial_weights(1), vec![1]);
        assert_eq!(binomial_weights(3), vec![1, 2, 1]);
        assert_eq!(binomial_weights(5), vec![1, 4, 6, 4, 1]);
    }

    #[test]
    fn test_blur_rejects_even_kernel() {
        assert!(BinomialBlurPreprocessor::new(4).is_err());
        assert!(BinomialBlurPreprocessor::new(0).is_err());
        assert!(BinomialBlurPreprocessor::new(MAX_BLUR_KERNEL_SIZE + 2).is_err());
        assert_eq!(BinomialBlurPreprocessor::new(5).expect("odd size").weights().len(), 5);
    }

    #[test]
    fn test_blur_keeps_uniform_image() {
        let image = GrayImage::from_pixel(12, 9, Luma([200u8]));
        let blurred = BinomialBlurPreprocessor::default()
            .preprocess(&image)
            .expect("Should blur");
        assert_eq!(blurred.dimensions(), (12, 9));
        assert!(blurred.pixels().all(|p| p[0] == 200));
    }

    #[test]
    fn test_blur_spreads_single_pixel() {
        let mut image = GrayImage::new(11, 11);
        image.put_pixel(5, 5, Luma([255u8]));
        let blurred = BinomialBlurPreprocessor::default()
            .preprocess(&image)
            .expect("Should blur");

        // 255 * 36 / 256 = 35.86, 255 * 24 / 256 = 23.9
        assert_eq!(blurred.get_pixel(5, 5)[0], 36);
        assert_eq!(blurred.get_pixel(6, 5)[0], 24);
        assert_eq!(blurred.get_pixel(8, 5)[0], 0);
    }

    #[test]
    fn test_blur_rounds_step_edge() {
        let image = GrayImage::from_fn(20, 20, |x, _| if x < 10 { Luma([0u8]) } else { Luma([186u8]) });
        let blurred = BinomialBlurPreprocessor::default()
            .preprocess(&image)
            .expect("Should blur");

        // 186 * 11 / 16 = 127.875
        assert_eq!(blurred.get_pixel(10, 7)[0], 128);
        // 186 * 5 / 16 = 58.125
        assert_eq!(blurred.get_pixel(9, 7)[0], 58);

        let mask = ThresholdPreprocessor::default()
            .preprocess(&blurred)
            .expect("Should threshold");
        assert_eq!(mask.get_pixel(10, 7)[0], 255);
        assert_eq!(mask.get_pixel(9, 7)[0], 0);
    }

    #[test]
    fn test_blur_clamps_at_borders() {
        let image = GrayImage::from_fn(6, 6, |x, _| Luma([if x == 0 { 160u8 } else { 0 }]));
        let blurred = BinomialBlurPreprocessor::default()
            .preprocess(&image)
            .expect("Should blur");

        // Column 0 sees itself three times through the clamped edge: 160 * 11 / 16 = 110
        assert_eq!(blurred.get_pixel(0, 0)[0], 110);
        assert_eq!(blurred.get_pixel(0, 5)[0], 110);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut image = GrayImage::new(3, 1);
        image.put_pixel(0, 0, Luma([127u8]));
        image.put_pixel(1, 0, Luma([128u8]));
        image.put_pixel(2, 0, Luma([250u8]));

        let mask = ThresholdPreprocessor::default()
            .preprocess(&image)
            .expect("Should threshold");
        assert_eq!(mask.get_pixel(0, 0)[0], 0);
        assert_eq!(mask.get_pixel(1, 0)[0], 255);
        assert_eq!(mask.get_pixel(2, 0)[0], 255);
    }

    #[test]
    fn test_color_image_to_grayscale() {
        let rgb = image::RgbImage::from_pixel(4, 4, image::Rgb([255, 255, 255]));
        let gray = to_grayscale(&DynamicImage::ImageRgb8(rgb));
        assert_eq!(gray.dimensions(), (4, 4));
        assert!(gray.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn test_grayscale_uses_bt601_weights() {
        let mut rgb = image::RgbImage::new(5, 1);
        rgb.put_pixel(0, 0, Rgb([255, 0, 0]));
        rgb.put_pixel(1, 0, Rgb([0, 255, 0]));
        rgb.put_pixel(2, 0, Rgb([0, 0, 255]));
        rgb.put_pixel(3, 0, Rgb([255, 70, 255]));
        rgb.put_pixel(4, 0, Rgb([90, 90, 90]));

        let gray = to_grayscale(&DynamicImage::ImageRgb8(rgb));
        let values: Vec<u8> = gray.pixels().map(|p| p[0]).collect();
        assert_eq!(values, vec![76, 150, 29, 146, 90]);
    }
}
