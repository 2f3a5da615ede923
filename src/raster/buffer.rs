use crate::foundation::{
    core::Rgba8,
    error::{MorphError, MorphResult},
};

/// A `width x height` grid of straight-alpha RGBA8 pixels.
///
/// Rows are tightly packed and row-major, with **row 0 at the bottom**: `(x, y)` uses the same
/// lower-left origin as feature coordinates, so a feature endpoint indexes the pixel it was
/// drawn on. Codecs flip rows at the file boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Image {
    /// A new image cleared to [`Rgba8::TRANSPARENT`].
    pub fn new(width: u32, height: u32) -> MorphResult<Self> {
        Self::filled(width, height, Rgba8::TRANSPARENT)
    }

    /// A new image where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> MorphResult<Self> {
        let len = buffer_len(width, height)?;
        let data = color.to_array().repeat(len / 4);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap an existing RGBA8 buffer laid out bottom row first.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> MorphResult<Self> {
        let len = buffer_len(width, height)?;
        if data.len() != len {
            return Err(MorphError::validation(format!(
                "rgba8 buffer has {} bytes, expected {len} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA8 bytes, bottom row first.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Consume the image and return its raw bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    pub fn get(&self, x: i64, y: i64) -> Option<Rgba8> {
        let idx = self.checked_index(x, y)?;
        Some(Rgba8::from_array([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]))
    }

    /// Write the pixel at `(x, y)`. Returns `false` (and writes nothing) outside the image.
    pub fn set(&mut self, x: i64, y: i64, color: Rgba8) -> bool {
        match self.checked_index(x, y) {
            Some(idx) => {
                self.data[idx..idx + 4].copy_from_slice(&color.to_array());
                true
            }
            None => false,
        }
    }

    /// Bytes per row.
    pub(crate) fn stride(&self) -> usize {
        self.width as usize * 4
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn checked_index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }
}

fn buffer_len(width: u32, height: u32) -> MorphResult<usize> {
    if width == 0 || height == 0 {
        return Err(MorphError::validation(format!(
            "image dimensions must be positive, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| MorphError::validation("image buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/buffer.rs"]
mod tests;
