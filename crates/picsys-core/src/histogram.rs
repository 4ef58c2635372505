//! Per-channel intensity histogram of a processed image.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::PicsysError;

/// Number of intensity bins per channel.
pub const BINS: usize = 256;

/// A color channel of an RGB image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// All channels in RGB order.
    pub const ALL: [Self; 3] = [Self::Red, Self::Green, Self::Blue];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Blue => "Blue",
        }
    }
}

/// Counts of each 8-bit intensity in the red, green, and blue channels.
///
/// Every pixel increments exactly one bin per channel, so each array sums
/// to the pixel count. Alpha is ignored; grayscale images contribute the
/// same value to all three channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    #[serde(with = "bins")]
    pub red: [u32; BINS],
    #[serde(with = "bins")]
    pub green: [u32; BINS],
    #[serde(with = "bins")]
    pub blue: [u32; BINS],
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            red: [0; BINS],
            green: [0; BINS],
            blue: [0; BINS],
        }
    }
}

impl Histogram {
    /// Tally the RGB values of every pixel of `image`.
    #[must_use]
    pub fn from_image(image: &DynamicImage) -> Self {
        let rgb = image.to_rgb8();
        let mut histogram = Self::default();
        for pixel in rgb.pixels() {
            let [r, g, b] = pixel.0;
            histogram.red[usize::from(r)] += 1;
            histogram.green[usize::from(g)] += 1;
            histogram.blue[usize::from(b)] += 1;
        }
        histogram
    }

    /// Decode an encoded image (format sniffed from its bytes) and tally it.
    ///
    /// # Errors
    ///
    /// Returns [`PicsysError::EmptyInput`] if `bytes` is empty and
    /// [`PicsysError::ImageDecode`] if the data is not a decodable image.
    pub fn from_encoded(bytes: &[u8]) -> Result<Self, PicsysError> {
        if bytes.is_empty() {
            return Err(PicsysError::EmptyInput);
        }
        let image = image::load_from_memory(bytes)?;
        Ok(Self::from_image(&image))
    }

    /// Bins of one channel.
    #[must_use]
    pub const fn channel(&self, channel: Channel) -> &[u32; BINS] {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
        }
    }

    /// Number of pixels tallied.
    #[must_use]
    pub fn pixel_count(&self) -> u64 {
        self.red.iter().map(|&c| u64::from(c)).sum()
    }

    /// Largest bin across all channels (the chart's vertical scale).
    #[must_use]
    pub fn max_count(&self) -> u32 {
        Channel::ALL
            .iter()
            .flat_map(|&c| self.channel(c).iter().copied())
            .max()
            .unwrap_or(0)
    }

    /// Mean intensity of a channel, or `None` for an empty histogram.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self, channel: Channel) -> Option<f64> {
        let total = self.pixel_count();
        if total == 0 {
            return None;
        }
        let weighted: u64 = self
            .channel(channel)
            .iter()
            .zip(0u64..)
            .map(|(&count, value)| u64::from(count) * value)
            .sum();
        Some(weighted as f64 / total as f64)
    }

    /// Lowest and highest intensity present in a channel.
    #[must_use]
    pub fn range(&self, channel: Channel) -> Option<(u8, u8)> {
        let bins = self.channel(channel);
        let lo = bins.iter().position(|&c| c > 0)?;
        let hi = bins.iter().rposition(|&c| c > 0)?;
        Some((u8::try_from(lo).ok()?, u8::try_from(hi).ok()?))
    }
}

/// Serde adapter for fixed-size bin arrays (serde only derives up to 32).
mod bins {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::BINS;

    pub fn serialize<S: Serializer>(bins: &[u32; BINS], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(bins.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u32; BINS], D::Error> {
        let values = Vec::<u32>::deserialize(deserializer)?;
        let len = values.len();
        values
            .try_into()
            .map_err(|_| D::Error::invalid_length(len, &"256 bins"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use image::{ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};

    use super::*;

    /// Encode an RGBA image as PNG bytes.
    fn encode_png(img: &RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        image::codecs::png::PngEncoder::new(&mut buf)
            .write_image(
                img.as_raw(),
                img.width(),
                img.height(),
                image::ExtendedColorType::Rgba8,
            )
            .unwrap();
        buf
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn each_channel_sums_to_pixel_count() {
        let img = RgbImage::from_fn(13, 7, |x, y| {
            Rgb([(x * 19) as u8, (y * 31) as u8, ((x + y) * 7) as u8])
        });
        let h = Histogram::from_image(&DynamicImage::ImageRgb8(img));
        for channel in Channel::ALL {
            let sum: u64 = h.channel(channel).iter().map(|&c| u64::from(c)).sum();
            assert_eq!(sum, 13 * 7, "{channel:?}");
        }
        assert_eq!(h.pixel_count(), 91);
    }

    #[test]
    fn uniform_color_fills_one_bin_per_channel() {
        let img = RgbImage::from_pixel(4, 5, Rgb([10, 200, 255]));
        let h = Histogram::from_image(&DynamicImage::ImageRgb8(img));
        assert_eq!(h.red[10], 20);
        assert_eq!(h.green[200], 20);
        assert_eq!(h.blue[255], 20);
        assert_eq!(h.max_count(), 20);
        assert_eq!(h.range(Channel::Green), Some((200, 200)));
        assert_eq!(h.mean(Channel::Red), Some(10.0));
    }

    #[test]
    fn grayscale_counts_the_same_in_every_channel() {
        let img = image::GrayImage::from_fn(8, 8, |x, _| image::Luma([u8::try_from(x * 30).unwrap()]));
        let h = Histogram::from_image(&DynamicImage::ImageLuma8(img));
        assert_eq!(h.red, h.green);
        assert_eq!(h.green, h.blue);
        assert_eq!(h.red[0], 8);
        assert_eq!(h.red[210], 8);
    }

    #[test]
    fn alpha_is_ignored() {
        let img = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([50, 60, 70, 0])
            } else {
                Rgba([50, 60, 70, 255])
            }
        });
        let h = Histogram::from_encoded(&encode_png(&img)).unwrap();
        assert_eq!(h.red[50], 2);
        assert_eq!(h.green[60], 2);
        assert_eq!(h.blue[70], 2);
    }

    #[test]
    fn zero_sized_image_gives_empty_histogram() {
        let h = Histogram::from_image(&DynamicImage::ImageRgb8(RgbImage::new(0, 0)));
        assert_eq!(h, Histogram::default());
        assert_eq!(h.pixel_count(), 0);
        assert_eq!(h.mean(Channel::Blue), None);
        assert_eq!(h.range(Channel::Blue), None);
        assert_eq!(h.max_count(), 0);
    }

    #[test]
    fn empty_bytes_are_rejected() {
        assert!(matches!(
            Histogram::from_encoded(&[]),
            Err(PicsysError::EmptyInput)
        ));
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        assert!(matches!(
            Histogram::from_encoded(b"<html>502 Bad Gateway</html>"),
            Err(PicsysError::ImageDecode(_))
        ));
    }

    #[test]
    fn json_has_three_arrays_of_256() {
        let img = RgbImage::from_pixel(1, 1, Rgb([1, 2, 3]));
        let h = Histogram::from_image(&DynamicImage::ImageRgb8(img));
        let value = serde_json::to_value(&h).unwrap();
        for key in ["red", "green", "blue"] {
            assert_eq!(value[key].as_array().unwrap().len(), 256);
        }
        let back: Histogram = serde_json::from_value(value).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn short_bin_array_is_rejected() {
        let json = r#"{"red": [1, 2], "green": [], "blue": []}"#;
        assert!(serde_json::from_str::<Histogram>(json).is_err());
    }
}
