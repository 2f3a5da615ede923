use std::path::Path;

use anyhow::Context as _;
use image::ImageFormat;

use crate::{
    foundation::error::{MorphError, MorphResult},
    raster::buffer::Image,
};

/// File formats the codec layer reads and writes, chosen by file extension.
pub fn image_format_for_path(path: &Path) -> MorphResult<ImageFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Ok(ImageFormat::Png),
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        "ppm" => Ok(ImageFormat::Pnm),
        _ => Err(MorphError::codec(format!(
            "unknown image file type '{}' (expected png, jpg or ppm)",
            path.display()
        ))),
    }
}

/// Read and decode an image file into lower-left-origin RGBA8.
#[tracing::instrument(level = "debug")]
pub fn load_image(path: &Path) -> MorphResult<Image> {
    let format = image_format_for_path(path)?;
    let bytes = std::fs::read(path)
        .map_err(|e| MorphError::io(format!("read image '{}'", path.display()), e))?;
    let img = decode_image(&bytes, format)
        .map_err(|e| MorphError::codec(format!("'{}': {e:#}", path.display())))?;
    tracing::debug!(width = img.width(), height = img.height(), "loaded image");
    Ok(img)
}

/// Decode encoded bytes of a known format.
pub fn decode_image(bytes: &[u8], format: ImageFormat) -> MorphResult<Image> {
    let dyn_img =
        image::load_from_memory_with_format(bytes, format).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut data = rgba.into_raw();
    flip_rows_in_place(&mut data, width as usize * 4);
    Image::from_rgba8(width, height, data)
}

/// Encode `image` in the format implied by `path` and write it, creating parent directories.
///
/// PNG keeps alpha. PPM and JPEG have no alpha channel, so it is dropped.
pub fn save_image(image: &Image, path: &Path) -> MorphResult<()> {
    let format = image_format_for_path(path)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| MorphError::io(format!("create output dir '{}'", parent.display()), e))?;
    }

    let mut data = image.as_raw().to_vec();
    flip_rows_in_place(&mut data, image.stride());
    let rgba = image::RgbaImage::from_raw(image.width(), image.height(), data)
        .ok_or_else(|| MorphError::codec("image buffer does not match its dimensions"))?;

    let written = match format {
        ImageFormat::Png => rgba.save_with_format(path, format),
        _ => image::DynamicImage::ImageRgba8(rgba)
            .to_rgb8()
            .save_with_format(path, format),
    };
    written.map_err(|e| MorphError::codec(format!("write '{}': {e}", path.display())))
}

fn flip_rows_in_place(data: &mut [u8], stride: usize) {
    if stride == 0 {
        return;
    }
    let rows = data.len() / stride;
    for y in 0..rows / 2 {
        let (head, tail) = data.split_at_mut((rows - 1 - y) * stride);
        head[y * stride..(y + 1) * stride].swap_with_slice(&mut tail[..stride]);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/codec.rs"]
mod tests;
