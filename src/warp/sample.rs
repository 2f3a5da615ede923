use crate::{
    foundation::core::{Point, Rgba8, RgbaF},
    raster::buffer::Image,
};

/// Bilinearly interpolated color at a fractional position.
///
/// The four neighbours are `(floor, floor)`, `(ceil, floor)`, `(floor, ceil)` and
/// `(ceil, ceil)`. Any neighbour outside the image contributes [`Rgba8::TRANSPARENT`].
/// At integer coordinates all four collapse onto the same pixel, which is returned unchanged.
pub fn sample_bilinear(image: &Image, at: Point) -> Rgba8 {
    let x0 = at.x.floor();
    let y0 = at.y.floor();
    let x1 = at.x.ceil();
    let y1 = at.y.ceil();

    let corner = |x: f64, y: f64| -> RgbaF {
        image
            .get(x as i64, y as i64)
            .unwrap_or(Rgba8::TRANSPARENT)
            .into()
    };

    let s = (at.x - x0) as f32;
    let t = (at.y - y0) as f32;
    let bottom = corner(x0, y0).lerp(corner(x1, y0), s);
    let top = corner(x0, y1).lerp(corner(x1, y1), s);
    bottom.lerp(top, t).into()
}

#[cfg(test)]
#[path = "../../tests/unit/warp/sample.rs"]
mod tests;
