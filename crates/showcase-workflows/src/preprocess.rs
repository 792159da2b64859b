//! Image-to-tensor helpers shared by the workflow variants.
//!
//! All tensors are nested JSON-ready `Vec`s of `f32` normalized to
//! `[0, 1]`, matching what the served models were trained on.

use image::imageops::FilterType;
use image::DynamicImage;

/// Resize to `width`×`height`, convert to grayscale, normalize.
///
/// Returns `height` rows of `width` values.
pub fn grayscale_tensor(image: &DynamicImage, width: u32, height: u32) -> Vec<Vec<f32>> {
    let gray = image
        .resize_exact(width, height, FilterType::Triangle)
        .to_luma8();

    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| f32::from(gray.get_pixel(x, y).0[0]) / 255.0)
                .collect()
        })
        .collect()
}

/// Resize to `width`×`height`, keep RGB channels, normalize.
///
/// Returns `height` rows of `width` pixels of 3 channel values.
pub fn rgb_tensor(image: &DynamicImage, width: u32, height: u32) -> Vec<Vec<Vec<f32>>> {
    let rgb = image
        .resize_exact(width, height, FilterType::Triangle)
        .to_rgb8();

    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| {
                    rgb.get_pixel(x, y)
                        .0
                        .iter()
                        .map(|&c| f32::from(c) / 255.0)
                        .collect()
                })
                .collect()
        })
        .collect()
}

/// Index and value of the largest score.
///
/// Returns `None` for an empty slice. Ties resolve to the first
/// occurrence, which keeps the result deterministic.
pub fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, v)| match best {
            Some((_, bv)) if bv >= v => best,
            _ => Some((i, v)),
        })
}

/// Parse a JSON array of numbers into scores.
pub fn scores_from(value: &serde_json::Value) -> Option<Vec<f32>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_f64().map(|f| f as f32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn solid_image(r: u8, g: u8, b: u8) -> DynamicImage {
        let mut img = RgbImage::new(4, 4);
        for pixel in img.pixels_mut() {
            pixel.0 = [r, g, b];
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn grayscale_tensor_has_requested_shape_and_range() {
        let tensor = grayscale_tensor(&solid_image(255, 255, 255), 28, 28);
        assert_eq!(tensor.len(), 28);
        assert_eq!(tensor[0].len(), 28);
        assert!((tensor[14][14] - 1.0).abs() < 1e-6);

        let black = grayscale_tensor(&solid_image(0, 0, 0), 28, 28);
        assert!(black[0][0].abs() < 1e-6);
    }

    #[test]
    fn rgb_tensor_keeps_channels() {
        let tensor = rgb_tensor(&solid_image(255, 0, 0), 8, 8);
        assert_eq!(tensor.len(), 8);
        assert_eq!(tensor[0].len(), 8);
        assert_eq!(tensor[0][0].len(), 3);
        assert!((tensor[0][0][0] - 1.0).abs() < 1e-6);
        assert!(tensor[0][0][1].abs() < 1e-6);
    }

    #[test]
    fn argmax_picks_largest_and_first_on_tie() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some((1, 0.7)));
        assert_eq!(argmax(&[0.5, 0.5]), Some((0, 0.5)));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn scores_from_rejects_non_numeric_entries() {
        assert_eq!(
            scores_from(&serde_json::json!([0.25, 0.75])),
            Some(vec![0.25, 0.75])
        );
        assert_eq!(scores_from(&serde_json::json!(["a", 0.5])), None);
        assert_eq!(scores_from(&serde_json::json!("not-an-array")), None);
    }
}
