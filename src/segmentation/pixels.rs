//! RGBA pixel storage shared by segmentation and extraction

use crate::io::error::{Result, decode_error};
use image::{ImageBuffer, Rgba, RgbaImage};
use ndarray::{Array3, Axis};

/// Samples per pixel (R, G, B, A)
pub const CHANNELS: usize = 4;

/// Decoded raster image stored as `(height, width, channel)`
///
/// Owned by the caller and read-only during segmentation. Extraction
/// produces new buffers rather than mutating the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Array3<u8>,
}

impl PixelBuffer {
    /// Create a fully transparent black buffer
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: Array3::zeros((height, width, CHANNELS)),
        }
    }

    /// Create a buffer where every pixel has the same RGBA value
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        Self {
            data: Array3::from_shape_fn((height, width, CHANNELS), |(_, _, c)| {
                rgba.get(c).copied().unwrap_or(0)
            }),
        }
    }

    /// Wrap raw interleaved RGBA samples
    ///
    /// # Errors
    ///
    /// Returns an `ImageDecode` error if the sample count is not
    /// `width * height * 4`
    pub fn from_raw(width: usize, height: usize, samples: Vec<u8>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(CHANNELS))
            .ok_or_else(|| {
                decode_error(&format!("{width}x{height} RGBA exceeds addressable memory"))
            })?;
        if samples.len() != expected {
            return Err(decode_error(&format!(
                "expected {expected} samples for {width}x{height} RGBA, found {}",
                samples.len()
            )));
        }
        let data = Array3::from_shape_vec((height, width, CHANNELS), samples)
            .map_err(|e| decode_error(&e))?;
        Ok(Self { data })
    }

    /// Copy pixels out of a decoded `image` buffer
    pub fn from_rgba_image(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            data: Array3::from_shape_fn(
                (height as usize, width as usize, CHANNELS),
                |(y, x, c)| {
                    image
                        .get_pixel(x as u32, y as u32)
                        .0
                        .get(c)
                        .copied()
                        .unwrap_or(0)
                },
            ),
        }
    }

    /// Convert into an `image` buffer for encoding
    pub fn to_rgba_image(&self) -> RgbaImage {
        ImageBuffer::from_fn(self.width() as u32, self.height() as u32, |x, y| {
            Rgba(self.pixel(x as usize, y as usize).unwrap_or([0, 0, 0, 0]))
        })
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// Test whether the buffer holds no pixels
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// RGBA value at a position, or `None` outside the buffer
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        Some([
            *self.data.get((y, x, 0))?,
            *self.data.get((y, x, 1))?,
            *self.data.get((y, x, 2))?,
            *self.data.get((y, x, 3))?,
        ])
    }

    /// Overwrite one pixel; positions outside the buffer are ignored
    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        for (c, value) in rgba.into_iter().enumerate() {
            if let Some(sample) = self.data.get_mut((y, x, c)) {
                *sample = value;
            }
        }
    }

    /// Overwrite the alpha channel of one pixel
    pub fn set_alpha(&mut self, x: usize, y: usize, alpha: u8) {
        if let Some(sample) = self.data.get_mut((y, x, CHANNELS - 1)) {
            *sample = alpha;
        }
    }

    /// Copy a rectangle into a new buffer
    ///
    /// Returns `None` when the rectangle does not lie entirely inside the buffer.
    pub fn crop(&self, left: usize, top: usize, width: usize, height: usize) -> Option<Self> {
        let right = left.checked_add(width)?;
        let bottom = top.checked_add(height)?;
        if right > self.width() || bottom > self.height() {
            return None;
        }
        Some(Self {
            data: Array3::from_shape_fn((height, width, CHANNELS), |(y, x, c)| {
                self.data.get((top + y, left + x, c)).copied().unwrap_or(0)
            }),
        })
    }

    /// Copy another buffer onto this one with its top-left at `(left, top)`
    ///
    /// Pixels falling outside this buffer are dropped.
    pub fn paste(&mut self, other: &Self, left: usize, top: usize) {
        for y in 0..other.height() {
            for x in 0..other.width() {
                if let Some(rgba) = other.pixel(x, y) {
                    self.set_pixel(left + x, top + y, rgba);
                }
            }
        }
    }

    /// Number of pixels with non-zero alpha
    pub fn opaque_pixel_count(&self) -> usize {
        self.data
            .index_axis(Axis(2), CHANNELS - 1)
            .iter()
            .filter(|&&alpha| alpha > 0)
            .count()
    }

    /// Borrow the underlying sample array
    pub const fn samples(&self) -> &Array3<u8> {
        &self.data
    }
}
