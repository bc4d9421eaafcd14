//! Mirror reflection effect shared by all visual items.

use crate::model::{Pixmap, is_null_pixmap};
use image::{Rgba, imageops};

/// Stateless reflection helper. One instance per controller, shared by
/// every visual item.
#[derive(Debug, Default)]
pub struct Reflection;

impl Reflection {
    pub fn new() -> Self {
        Self
    }

    /// Append a fading mirror image below `image`.
    ///
    /// The result is twice as tall as the source. The mirror starts at
    /// `opacity` percent just below the seam and fades to transparent over
    /// `offset` percent of the source height; rows past that stay transparent.
    pub fn reflect(&self, image: &Pixmap, offset: i32, opacity: i32) -> Pixmap {
        if is_null_pixmap(image) {
            return image.clone();
        }
        let (width, height) = image.dimensions();
        let mut result = Pixmap::new(width, height * 2);
        imageops::replace(&mut result, image, 0, 0);

        let opacity = f64::from(opacity.clamp(0, 100)) / 100.0;
        let fade_rows = (u64::from(height) * offset.clamp(1, 100) as u64 / 100).max(1) as u32;
        for row in 0..fade_rows {
            let factor = opacity * (1.0 - f64::from(row) / f64::from(fade_rows));
            let source_y = height - 1 - row;
            for x in 0..width {
                let Rgba([r, g, b, a]) = *image.get_pixel(x, source_y);
                let alpha = (f64::from(a) * factor).round() as u8;
                result.put_pixel(x, height + row, Rgba([r, g, b, alpha]));
            }
        }
        result
    }
}
